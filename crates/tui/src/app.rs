use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use gamevault_core::{
    auth::{AuthService, RegisterRole},
    config::AppConfig,
    connectivity::{ConnectivityEvent, ConnectivityReport},
    inventory::{InventoryStore, MovementKind},
    models::Game,
    reports::{ExportEntry, InventoryReport, ReportExporter, ReportPeriod},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::{spawn, sync::mpsc};
use tracing::{error, info, warn};

use crate::{
    editors,
    forms::{Form, FormAction},
    list::ListCursor,
    theme::Theme,
};

mod render;

const TICK_RATE: Duration = Duration::from_millis(250);
const ADMIN_REQUIRED: &str = "Administrator access required";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Login,
    Dashboard,
    Games,
    Inventory,
    Reports,
    Users,
}

impl Screen {
    const NAV: [Screen; 5] = [
        Screen::Dashboard,
        Screen::Games,
        Screen::Inventory,
        Screen::Reports,
        Screen::Users,
    ];

    fn title(self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Dashboard => "Dashboard",
            Screen::Games => "Games",
            Screen::Inventory => "Inventory",
            Screen::Reports => "Reports",
            Screen::Users => "Users",
        }
    }

    fn from_digit(ch: char) -> Option<Screen> {
        let index = ch.to_digit(10)?.checked_sub(1)? as usize;
        Self::NAV.get(index).copied()
    }
}

/// Screen actually shown when `requested` is asked for.
fn resolve_screen(requested: Screen, authenticated: bool, admin: bool) -> Screen {
    if !authenticated {
        return Screen::Login;
    }
    match requested {
        Screen::Login => Screen::Dashboard,
        Screen::Users if !admin => Screen::Dashboard,
        other => other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InventoryTab {
    Overview,
    Recent,
    Movement,
}

impl InventoryTab {
    fn title(self) -> &'static str {
        match self {
            InventoryTab::Overview => "Overview",
            InventoryTab::Recent => "Recent",
            InventoryTab::Movement => "Add movement",
        }
    }

    /// Tabs offered to the current user.
    fn available(admin: bool) -> &'static [InventoryTab] {
        if admin {
            &[
                InventoryTab::Overview,
                InventoryTab::Recent,
                InventoryTab::Movement,
            ]
        } else {
            &[InventoryTab::Overview, InventoryTab::Recent]
        }
    }

    fn step(self, delta: isize, admin: bool) -> Self {
        let tabs = Self::available(admin);
        let index = tabs.iter().position(|tab| *tab == self).unwrap_or(0) as isize;
        let len = tabs.len() as isize;
        tabs[(index + delta).rem_euclid(len) as usize]
    }
}

enum Modal {
    GameForm { editing: Option<i64>, form: Form },
    ConfirmDelete { id: i64, title: String },
}

enum AppEvent {
    Input(Event),
    Tick,
    AuthFinished { success: bool },
    DataLoaded,
    GameSaved {
        created: bool,
        result: std::result::Result<Game, String>,
    },
    GameDeleted(std::result::Result<i64, String>),
    MovementRecorded(std::result::Result<MovementKind, String>),
}

struct LoginState {
    form: Form,
    registering: bool,
    error: Option<String>,
}

impl Default for LoginState {
    fn default() -> Self {
        Self {
            form: editors::login_form(false),
            registering: false,
            error: None,
        }
    }
}

#[derive(Default)]
struct GamesView {
    visible: Vec<Game>,
    cursor: ListCursor,
    filter: String,
    filtering: bool,
    genre: Option<String>,
}

impl GamesView {
    fn current(&self) -> Option<&Game> {
        self.visible.get(self.cursor.cursor)
    }
}

struct UiState {
    screen: Screen,
    status: String,
    should_quit: bool,
    busy: Option<&'static str>,
    login: LoginState,
    games: GamesView,
    inventory_tab: InventoryTab,
    stock: ListCursor,
    recent: ListCursor,
    movement: Form,
    report_period: ReportPeriod,
    exports: Vec<ExportEntry>,
    modal: Option<Modal>,
    connection: Option<ConnectivityReport>,
    checking: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            screen: Screen::Login,
            status: "Ready".to_string(),
            should_quit: false,
            busy: None,
            login: LoginState::default(),
            games: GamesView::default(),
            inventory_tab: InventoryTab::Overview,
            stock: ListCursor::default(),
            recent: ListCursor::default(),
            movement: Form::default(),
            report_period: ReportPeriod::default(),
            exports: Vec::new(),
            modal: None,
            connection: None,
            checking: false,
        }
    }
}

impl UiState {
    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }
}

/// Terminal front end for the inventory backend.
pub struct GameVaultApp {
    config: AppConfig,
    auth: AuthService,
    store: InventoryStore,
    exporter: ReportExporter,
    theme: Theme,
    state: UiState,
    event_tx: Option<mpsc::Sender<AppEvent>>,
    connectivity_rx: Option<mpsc::Receiver<ConnectivityEvent>>,
}

impl GameVaultApp {
    pub fn new(config: AppConfig, auth: AuthService, store: InventoryStore) -> Self {
        let (theme, theme_note) = Theme::from_config(&config.theme);
        let mut state = UiState::default();
        if let Some(note) = theme_note {
            warn!("{note}");
            state.set_status(note);
        }
        Self {
            exporter: ReportExporter::new(config.reports_dir()),
            config,
            auth,
            store,
            theme,
            state,
            event_tx: None,
            connectivity_rx: None,
        }
    }

    pub fn attach_connectivity(&mut self, receiver: mpsc::Receiver<ConnectivityEvent>) {
        self.connectivity_rx = Some(receiver);
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx.clone());
        self.event_tx = Some(event_tx);

        self.refresh_exports();
        if self.auth.state().is_authenticated {
            self.navigate(Screen::Dashboard);
            self.spawn_load();
        }

        let mut connectivity_rx = self.connectivity_rx.take();

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.state.should_quit {
                break;
            }

            if let Some(rx) = connectivity_rx.as_mut() {
                let mut closed = false;
                tokio::select! {
                    maybe_event = event_rx.recv() => {
                        if !self.process_app_event(maybe_event) {
                            break;
                        }
                    }
                    maybe_check = rx.recv() => {
                        match maybe_check {
                            Some(event) => self.handle_connectivity(event),
                            None => closed = true,
                        }
                    }
                }
                if closed {
                    connectivity_rx = None;
                }
            } else {
                let maybe_event = event_rx.recv().await;
                if !self.process_app_event(maybe_event) {
                    break;
                }
            }

            if self.state.should_quit {
                break;
            }
        }

        restore_terminal(&mut terminal)?;
        self.event_tx = None;
        Ok(())
    }

    fn process_app_event(&mut self, maybe_event: Option<AppEvent>) -> bool {
        match maybe_event {
            Some(AppEvent::Input(Event::Key(key))) => {
                if key.kind != KeyEventKind::Release {
                    self.handle_key(key);
                }
            }
            Some(AppEvent::Input(_)) => {}
            Some(AppEvent::Tick) => {}
            Some(AppEvent::AuthFinished { success }) => self.handle_auth_finished(success),
            Some(AppEvent::DataLoaded) => self.handle_data_loaded(),
            Some(AppEvent::GameSaved { created, result }) => {
                self.handle_game_saved(created, result)
            }
            Some(AppEvent::GameDeleted(result)) => self.handle_game_deleted(result),
            Some(AppEvent::MovementRecorded(result)) => self.handle_movement_recorded(result),
            None => return false,
        }
        true
    }

    fn handle_connectivity(&mut self, event: ConnectivityEvent) {
        match event {
            ConnectivityEvent::Checking => self.state.checking = true,
            ConnectivityEvent::Checked(report) => {
                let was_connected = self
                    .state
                    .connection
                    .as_ref()
                    .map(|previous| previous.status.is_connected());
                let connected = report.status.is_connected();
                if was_connected != Some(connected) {
                    info!(connected, "backend connectivity changed");
                }
                self.state.checking = false;
                self.state.connection = Some(report);
            }
        }
    }

    // Navigation

    fn navigate(&mut self, requested: Screen) {
        let screen = resolve_screen(
            requested,
            self.auth.state().is_authenticated,
            self.auth.is_admin(),
        );
        if requested == Screen::Users && screen != Screen::Users {
            self.state.set_status(ADMIN_REQUIRED);
        }
        if screen == Screen::Inventory
            && !InventoryTab::available(self.auth.is_admin()).contains(&self.state.inventory_tab)
        {
            self.state.inventory_tab = InventoryTab::Overview;
        }
        if screen == Screen::Reports {
            self.refresh_exports();
        }
        self.state.screen = screen;
    }

    fn logout(&mut self) {
        self.auth.logout();
        self.store.reset();
        let connection = self.state.connection.take();
        self.state = UiState {
            connection,
            ..UiState::default()
        };
        self.state.set_status("Logged out");
    }

    // Background work

    fn spawn_load(&mut self) {
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        self.state.busy = Some("Loading inventory data");
        let store = self.store.clone();
        spawn(async move {
            store.load_all().await;
            let _ = tx.send(AppEvent::DataLoaded).await;
        });
    }

    fn submit_login(&mut self) {
        if self.auth.state().is_loading {
            return;
        }
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        self.auth.clear_error();
        self.state.login.error = None;
        let auth = self.auth.clone();

        if self.state.login.registering {
            let request = match editors::register_request(&self.state.login.form) {
                Ok(request) => request,
                Err(err) => {
                    self.state.login.error = Some(err.to_string());
                    return;
                }
            };
            self.state.set_status("Creating account...");
            spawn(async move {
                let success = auth
                    .register(&request.email, &request.password, &request.name, request.role)
                    .await;
                let _ = tx.send(AppEvent::AuthFinished { success }).await;
            });
        } else {
            let (email, password) = match editors::login_request(&self.state.login.form) {
                Ok(credentials) => credentials,
                Err(err) => {
                    self.state.login.error = Some(err.to_string());
                    return;
                }
            };
            self.state.set_status("Signing in...");
            spawn(async move {
                let success = auth.login(&email, &password).await;
                let _ = tx.send(AppEvent::AuthFinished { success }).await;
            });
        }
    }

    fn submit_game_form(&mut self) {
        let Some(Modal::GameForm { editing, form }) = &self.state.modal else {
            return;
        };
        let editing = *editing;
        let draft = match editors::game_draft(form) {
            Ok(draft) => draft,
            Err(err) => {
                self.state.set_status(err.to_string());
                return;
            }
        };
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        self.state.busy = Some("Saving game");
        let store = self.store.clone();
        spawn(async move {
            let outcome = match editing {
                Some(id) => store.update_game(id, &draft).await,
                None => store.add_game(&draft).await,
            };
            let result = outcome.map_err(|err| err.user_message("Failed to save game"));
            let _ = tx
                .send(AppEvent::GameSaved {
                    created: editing.is_none(),
                    result,
                })
                .await;
        });
    }

    fn delete_game(&mut self, id: i64) {
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        self.state.busy = Some("Deleting game");
        let store = self.store.clone();
        spawn(async move {
            let result = store
                .delete_game(id)
                .await
                .map(|_| id)
                .map_err(|err| err.user_message("Failed to delete game"));
            let _ = tx.send(AppEvent::GameDeleted(result)).await;
        });
    }

    fn submit_movement(&mut self) {
        let request = match editors::movement_request(&self.state.movement) {
            Ok(request) => request,
            Err(err) => {
                self.state.set_status(err.to_string());
                return;
            }
        };
        let Some(tx) = self.event_tx.clone() else {
            return;
        };
        self.state.busy = Some("Recording movement");
        let store = self.store.clone();
        spawn(async move {
            let kind = request.kind();
            let fallback = match kind {
                MovementKind::Transferencia => "Failed to record stock transfer",
                _ => "Failed to record stock movement",
            };
            let result = store
                .submit_movement(&request)
                .await
                .map(|_| kind)
                .map_err(|err| err.user_message(fallback));
            let _ = tx.send(AppEvent::MovementRecorded(result)).await;
        });
    }

    fn export_report(&mut self) {
        let snapshot = self.store.snapshot();
        let report = InventoryReport::build(
            &snapshot.inventory,
            &snapshot.games,
            self.state.report_period,
            self.config.inventory.low_stock_threshold,
        );
        match self.exporter.export(&report) {
            Ok(entry) => {
                self.state
                    .set_status(format!("Report exported to {}", entry.path.display()));
                self.refresh_exports();
            }
            Err(err) => {
                error!(?err, "report export failed");
                self.state.set_status(format!("Export failed: {err}"));
            }
        }
    }

    fn refresh_exports(&mut self) {
        match self.exporter.entries() {
            Ok(entries) => self.state.exports = entries,
            Err(err) => warn!(?err, "failed to list exported reports"),
        }
    }

    // Results

    fn handle_auth_finished(&mut self, success: bool) {
        if !success {
            self.state.set_status("Authentication failed");
            return;
        }
        let name = self
            .auth
            .state()
            .user
            .map(|user| user.name)
            .unwrap_or_default();
        self.state.login = LoginState::default();
        self.navigate(Screen::Dashboard);
        self.state.set_status(format!("Welcome, {name}"));
        self.spawn_load();
    }

    fn handle_data_loaded(&mut self) {
        self.state.busy = None;
        self.apply_games_filter();
        let snapshot = self.store.snapshot();
        self.state.stock.clamp(snapshot.inventory.len());
        if self.state.inventory_tab == InventoryTab::Movement
            && editors::movement_options_missing(&self.state.movement)
        {
            self.state.movement = editors::movement_form(&snapshot);
        }
        match snapshot.error {
            Some(message) => self.state.set_status(message),
            None => self.state.set_status(format!(
                "Loaded {} games and {} stock rows",
                snapshot.games.len(),
                snapshot.inventory.len()
            )),
        }
    }

    fn handle_game_saved(&mut self, created: bool, result: std::result::Result<Game, String>) {
        self.state.busy = None;
        match result {
            Ok(game) => {
                self.state.modal = None;
                self.apply_games_filter();
                if let Some(index) = self.state.games.visible.iter().position(|g| g.id == game.id)
                {
                    let len = self.state.games.visible.len();
                    self.state.games.cursor.move_to(index, len);
                }
                let verb = if created { "created" } else { "updated" };
                self.state.set_status(format!("Game {verb}: {}", game.title));
            }
            Err(message) => self.state.set_status(message),
        }
    }

    fn handle_game_deleted(&mut self, result: std::result::Result<i64, String>) {
        self.state.busy = None;
        match result {
            Ok(id) => {
                info!(id, "game removed from catalog");
                self.apply_games_filter();
                self.state.set_status("Game deleted");
            }
            Err(message) => self.state.set_status(message),
        }
    }

    fn handle_movement_recorded(&mut self, result: std::result::Result<MovementKind, String>) {
        self.state.busy = None;
        match result {
            Ok(kind) => {
                self.state.movement = editors::movement_form(&self.store.snapshot());
                self.state.stock.clamp(self.store.inventory().len());
                self.state.set_status(format!("{} recorded", kind.label()));
            }
            Err(message) => self.state.set_status(message),
        }
    }

    // Input

    fn handle_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
        {
            self.state.should_quit = true;
            return;
        }

        if self.state.screen == Screen::Login {
            self.handle_login_key(key);
            return;
        }
        if self.state.modal.is_some() {
            self.handle_modal_key(key);
            return;
        }
        if self.state.screen == Screen::Games && self.state.games.filtering {
            self.handle_filter_key(key);
            return;
        }
        if self.state.screen == Screen::Inventory
            && self.state.inventory_tab == InventoryTab::Movement
        {
            self.handle_movement_key(key);
            return;
        }

        if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
            match key.code {
                KeyCode::Char('q') => {
                    self.state.should_quit = true;
                    return;
                }
                KeyCode::Char('r') => {
                    self.spawn_load();
                    return;
                }
                KeyCode::Char('x') => {
                    self.logout();
                    return;
                }
                KeyCode::Char(ch) if ch.is_ascii_digit() => {
                    if let Some(screen) = Screen::from_digit(ch) {
                        self.navigate(screen);
                    }
                    return;
                }
                _ => {}
            }
        }

        match self.state.screen {
            Screen::Games => self.handle_games_key(key),
            Screen::Inventory => self.handle_inventory_key(key),
            Screen::Reports => self.handle_reports_key(key),
            Screen::Login | Screen::Dashboard | Screen::Users => {}
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('t') {
            let login = &mut self.state.login;
            login.registering = !login.registering;
            login.error = None;
            editors::set_registering(&mut login.form, login.registering);
            self.auth.clear_error();
            return;
        }
        match self.state.login.form.handle_key(key) {
            FormAction::Submit => self.submit_login(),
            FormAction::Cancel => {
                self.state.login.error = None;
                self.auth.clear_error();
            }
            FormAction::Edited | FormAction::None => {}
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) {
        match self.state.modal.as_mut() {
            Some(Modal::GameForm { form, .. }) => match form.handle_key(key) {
                FormAction::Submit => self.submit_game_form(),
                FormAction::Cancel => {
                    self.state.modal = None;
                    self.state.set_status("Edit cancelled");
                }
                FormAction::Edited | FormAction::None => {}
            },
            Some(Modal::ConfirmDelete { id, .. }) => {
                let id = *id;
                match key.code {
                    KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                        self.state.modal = None;
                        self.delete_game(id);
                    }
                    KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                        self.state.modal = None;
                        self.state.set_status("Delete cancelled");
                    }
                    _ => {}
                }
            }
            None => {}
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        let games = &mut self.state.games;
        match key.code {
            KeyCode::Esc => {
                games.filtering = false;
                games.filter.clear();
                self.apply_games_filter();
                self.state.set_status("Filter cleared");
            }
            KeyCode::Enter => {
                games.filtering = false;
                let message = format!("Filter applied: {}", games.filter);
                self.state.set_status(message);
            }
            KeyCode::Backspace => {
                games.filter.pop();
                self.apply_games_filter();
            }
            KeyCode::Char(c)
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT =>
            {
                games.filter.push(c);
                self.apply_games_filter();
            }
            _ => {}
        }
    }

    fn handle_games_key(&mut self, key: KeyEvent) {
        let len = self.state.games.visible.len();
        let cursor = &mut self.state.games.cursor;
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => cursor.move_cursor(1, len),
            KeyCode::Char('k') | KeyCode::Up => cursor.move_cursor(-1, len),
            KeyCode::Char('g') | KeyCode::Home => cursor.move_to(0, len),
            KeyCode::Char('G') | KeyCode::End => cursor.move_to_end(len),
            KeyCode::PageDown => cursor.page_down(len),
            KeyCode::PageUp => cursor.page_up(len),
            KeyCode::Char('/') => {
                self.state.games.filtering = true;
                self.state.set_status("Type to filter by title, genre or developer");
            }
            KeyCode::Char('f') => self.cycle_genre(),
            KeyCode::Char('n') => {
                if self.require_admin() {
                    self.state.modal = Some(Modal::GameForm {
                        editing: None,
                        form: editors::game_form(None),
                    });
                }
            }
            KeyCode::Char('e') => {
                if self.require_admin() {
                    if let Some(game) = self.state.games.current().cloned() {
                        self.state.modal = Some(Modal::GameForm {
                            editing: Some(game.id),
                            form: editors::game_form(Some(&game)),
                        });
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if self.require_admin() {
                    if let Some(game) = self.state.games.current() {
                        self.state.modal = Some(Modal::ConfirmDelete {
                            id: game.id,
                            title: game.title.clone(),
                        });
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_inventory_key(&mut self, key: KeyEvent) {
        let admin = self.auth.is_admin();
        match key.code {
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
                self.set_inventory_tab(self.state.inventory_tab.step(1, admin));
            }
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => {
                self.set_inventory_tab(self.state.inventory_tab.step(-1, admin));
            }
            KeyCode::Char('m') => {
                if self.require_admin() {
                    self.set_inventory_tab(InventoryTab::Movement);
                }
            }
            code => {
                let (cursor, len) = match self.state.inventory_tab {
                    InventoryTab::Overview => (&mut self.state.stock, self.store.inventory().len()),
                    InventoryTab::Recent => (
                        &mut self.state.recent,
                        self.config
                            .inventory
                            .recent_limit
                            .min(self.store.inventory().len()),
                    ),
                    InventoryTab::Movement => return,
                };
                match code {
                    KeyCode::Char('j') | KeyCode::Down => cursor.move_cursor(1, len),
                    KeyCode::Char('k') | KeyCode::Up => cursor.move_cursor(-1, len),
                    KeyCode::Char('g') | KeyCode::Home => cursor.move_to(0, len),
                    KeyCode::Char('G') | KeyCode::End => cursor.move_to_end(len),
                    KeyCode::PageDown => cursor.page_down(len),
                    KeyCode::PageUp => cursor.page_up(len),
                    _ => {}
                }
            }
        }
    }

    fn handle_movement_key(&mut self, key: KeyEvent) {
        if self.state.busy.is_some() && key.code == KeyCode::Enter {
            return;
        }
        let focus = self.state.movement.focus;
        match self.state.movement.handle_key(key) {
            FormAction::Submit => self.submit_movement(),
            FormAction::Cancel => self.set_inventory_tab(InventoryTab::Overview),
            FormAction::Edited if focus == editors::MOVE_KIND => {
                editors::sync_movement_fields(&mut self.state.movement);
            }
            FormAction::Edited | FormAction::None => {}
        }
    }

    fn handle_reports_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Right | KeyCode::Char(']') | KeyCode::Char('l') => {
                self.state.report_period = self.state.report_period.next();
            }
            KeyCode::Left | KeyCode::Char('[') | KeyCode::Char('h') => {
                self.state.report_period = self.state.report_period.previous();
            }
            KeyCode::Char('e') => self.export_report(),
            _ => {}
        }
    }

    fn set_inventory_tab(&mut self, tab: InventoryTab) {
        if tab == InventoryTab::Movement && self.state.inventory_tab != InventoryTab::Movement {
            self.state.movement = editors::movement_form(&self.store.snapshot());
        }
        self.state.inventory_tab = tab;
    }

    fn require_admin(&mut self) -> bool {
        let admin = self.auth.is_admin();
        if !admin {
            self.state.set_status(ADMIN_REQUIRED);
        }
        admin
    }

    fn cycle_genre(&mut self) {
        let genres = self.store.genres();
        let games = &mut self.state.games;
        games.genre = match &games.genre {
            None => genres.first().cloned(),
            Some(current) => genres
                .iter()
                .position(|genre| genre == current)
                .and_then(|index| genres.get(index + 1))
                .cloned(),
        };
        let message = match &games.genre {
            Some(genre) => format!("Genre: {genre}"),
            None => "All genres".to_string(),
        };
        self.apply_games_filter();
        self.state.set_status(message);
    }

    fn apply_games_filter(&mut self) {
        let games = &mut self.state.games;
        games.visible = self
            .store
            .games_matching(&games.filter, games.genre.as_deref());
        games.cursor.clamp(games.visible.len());
    }

    fn register_role_hint(&self) -> &'static str {
        let role = editors::register_request(&self.state.login.form)
            .map(|request| request.role)
            .unwrap_or_default();
        match role {
            RegisterRole::Admin => "Administrators can manage the catalog and stock",
            RegisterRole::User => "Users can browse the catalog and stock",
        }
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}
