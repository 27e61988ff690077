use chrono::Local;
use gamevault_core::{
    connectivity::ConnectionStatus,
    models::{InventoryItem, User},
    reports::{self, format_money, DashboardStats, InventoryReport, PlatformShare},
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table,
        TableState, Tabs, Wrap,
    },
    Frame,
};

use super::{GameVaultApp, InventoryTab, Modal, Screen};
use crate::{
    forms::{FieldInput, Form},
    list::ListCursor,
    theme::Theme,
};

const BAR_WIDTH: usize = 24;

impl GameVaultApp {
    pub(super) fn draw(&mut self, frame: &mut Frame) {
        let area = frame.size();
        if self.state.screen == Screen::Login {
            self.draw_login(frame, area);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(5),
            ])
            .split(area);

        self.render_nav(frame, chunks[0]);
        match self.state.screen {
            Screen::Dashboard => self.draw_dashboard(frame, chunks[1]),
            Screen::Games => self.draw_games(frame, chunks[1]),
            Screen::Inventory => self.draw_inventory(frame, chunks[1]),
            Screen::Reports => self.draw_reports(frame, chunks[1]),
            Screen::Users => self.draw_users(frame, chunks[1]),
            Screen::Login => {}
        }
        self.render_status(frame, chunks[2]);

        match &self.state.modal {
            Some(Modal::GameForm { editing, form }) => {
                let title = if editing.is_some() {
                    "Edit game"
                } else {
                    "New game"
                };
                render_form_modal(&self.theme, frame, area, title, form);
            }
            Some(Modal::ConfirmDelete { title, .. }) => {
                self.render_confirm(frame, area, title);
            }
            None => {}
        }
    }

    fn draw_login(&self, frame: &mut Frame, area: Rect) {
        let login = &self.state.login;
        let auth = self.auth.state();
        let title = if login.registering {
            "GameVault · Create account"
        } else {
            "GameVault · Sign in"
        };

        let mut lines = vec![Line::from("")];
        lines.extend(form_lines(&self.theme, &login.form));
        lines.push(Line::from(""));
        if login.registering {
            lines.push(Line::from(Span::styled(
                self.register_role_hint(),
                Style::default().fg(self.theme.muted),
            )));
        }
        if auth.is_loading {
            lines.push(Line::from(Span::styled(
                "Please wait...",
                Style::default().fg(self.theme.warning),
            )));
        }
        if let Some(message) = login.error.as_ref().or(auth.error.as_ref()) {
            lines.push(Line::from(Span::styled(
                message.clone(),
                Style::default().fg(self.theme.danger),
            )));
        }
        lines.push(Line::from(""));
        let toggle = if login.registering {
            "Ctrl+T sign in instead"
        } else {
            "Ctrl+T create an account"
        };
        lines.push(Line::from(Span::styled(
            format!("Enter submit · Tab next field · {toggle} · Ctrl+C quit"),
            Style::default().fg(self.theme.muted),
        )));

        let height = lines.len() as u16 + 2;
        let popup = centered_rect(64, height, area);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(self.theme.accent));
        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, popup);

        if let Some(report) = &self.state.connection {
            let footer = Rect::new(area.x, area.bottom().saturating_sub(1), area.width, 1);
            let line = Paragraph::new(connection_span(&self.theme, &report.status))
                .alignment(Alignment::Center);
            frame.render_widget(line, footer);
        }
    }

    fn render_nav(&self, frame: &mut Frame, area: Rect) {
        let titles: Vec<Line> = Screen::NAV
            .iter()
            .enumerate()
            .map(|(index, screen)| Line::from(format!("{} {}", index + 1, screen.title())))
            .collect();
        let selected = Screen::NAV
            .iter()
            .position(|screen| *screen == self.state.screen)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("GameVault"))
            .select(selected)
            .style(Style::default().fg(self.theme.muted))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_dashboard(&self, frame: &mut Frame, area: Rect) {
        let items = self.store.inventory();
        let stats = DashboardStats::compute(&items, self.config.inventory.low_stock_threshold);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(6),
                Constraint::Length(9),
            ])
            .split(area);

        let boxes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(rows[0]);
        let summary = &stats.summary;
        let stat_boxes = [
            ("Stock rows", summary.lines.to_string(), self.theme.accent),
            ("Units", summary.total_units.to_string(), self.theme.accent),
            (
                "Total value",
                format_money(summary.total_value),
                self.theme.success,
            ),
            (
                "Low stock",
                summary.low_stock_count.to_string(),
                if summary.low_stock_count > 0 {
                    self.theme.warning
                } else {
                    self.theme.success
                },
            ),
        ];
        for ((label, value, color), rect) in stat_boxes.into_iter().zip(boxes.iter()) {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(label));
            frame.render_widget(paragraph, *rect);
        }

        let middle = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);

        let low_lines: Vec<Line> = if stats.low_stock.is_empty() {
            vec![Line::from(Span::styled(
                "No items with low stock",
                Style::default().fg(self.theme.success),
            ))]
        } else {
            stats
                .low_stock
                .iter()
                .map(|item| {
                    Line::from(vec![
                        Span::styled(
                            format!("{:>3} ", item.quantity),
                            Style::default()
                                .fg(self.theme.warning)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(item.title_label().to_string()),
                        Span::styled(
                            format!(" · {} · {}", item.platform_label(), item.deposit_label()),
                            Style::default().fg(self.theme.muted),
                        ),
                    ])
                })
                .collect()
        };
        let low = Paragraph::new(low_lines)
            .block(Block::default().borders(Borders::ALL).title("Low stock"))
            .wrap(Wrap { trim: true });
        frame.render_widget(low, middle[0]);

        let bars = share_lines(&self.theme, &stats.platforms, |amount| {
            format!("{amount:.0} un")
        });
        let platforms = Paragraph::new(bars)
            .block(Block::default().borders(Borders::ALL).title("Units by platform"));
        frame.render_widget(platforms, middle[1]);

        let recent = stock_table(&self.theme, &stats.recent, "Latest stock rows", false);
        frame.render_widget(recent, rows[2]);
    }

    fn draw_games(&mut self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);
        self.render_game_list(frame, columns[0]);
        self.render_game_info(frame, columns[1]);
    }

    fn render_game_list(&mut self, frame: &mut Frame, area: Rect) {
        let games = &mut self.state.games;
        games.cursor.height = area.height.saturating_sub(2) as usize;
        games.cursor.clamp(games.visible.len());

        let range = games.cursor.visible(games.visible.len());
        let mut list_state = ListState::default();
        if !range.is_empty() {
            list_state.select(Some(games.cursor.relative()));
        }
        let items: Vec<ListItem> = games.visible[range.clone()]
            .iter()
            .enumerate()
            .map(|(idx, game)| {
                let selected = games.cursor.cursor == range.start + idx;
                let marker = if selected {
                    Span::styled(
                        "▶ ",
                        Style::default()
                            .fg(self.theme.accent)
                            .add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::raw("  ")
                };
                ListItem::new(Line::from(vec![
                    marker,
                    Span::styled(
                        game.title.clone(),
                        Style::default()
                            .fg(self.theme.primary_fg)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!(" · {}", game.genre),
                        Style::default().fg(self.theme.muted),
                    ),
                ]))
            })
            .collect();

        let mut title = format!("Games ({})", games.visible.len());
        if let Some(genre) = &games.genre {
            title.push_str(&format!(" · {genre}"));
        }
        if !games.filter.is_empty() {
            title.push_str(&format!(" · /{}", games.filter));
        }
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().bg(self.theme.selection_bg));
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn render_game_info(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Game Details");
        let Some(game) = self.state.games.current() else {
            let message = if self.store.is_loading() {
                "Loading games..."
            } else {
                "No games available"
            };
            frame.render_widget(Paragraph::new(message).block(block), area);
            return;
        };

        let label = |text: &str| Span::styled(format!("{text}: "), Style::default().fg(self.theme.muted));
        let mut lines = vec![
            Line::from(Span::styled(
                game.title.clone(),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![label("Genre"), Span::raw(game.genre.clone())]),
            Line::from(vec![label("Developer"), Span::raw(game.developer.clone())]),
            Line::from(vec![label("Publisher"), Span::raw(game.publisher.clone())]),
            Line::from(vec![
                label("Suggested price"),
                Span::raw(format_money(game.suggested_price)),
            ]),
        ];
        if let Some(url) = game.cover_url.as_deref().filter(|url| !url.is_empty()) {
            lines.push(Line::from(vec![label("Cover"), Span::raw(url.to_string())]));
        }
        if let Some(description) = game.description.as_deref().filter(|d| !d.is_empty()) {
            lines.push(Line::from(""));
            lines.push(Line::from(description.to_string()));
        }

        lines.push(Line::from(""));
        let stock: Vec<InventoryItem> = self
            .store
            .inventory()
            .into_iter()
            .filter(|item| item.game_id == game.id)
            .collect();
        if stock.is_empty() {
            lines.push(Line::from(Span::styled(
                "No stock recorded",
                Style::default().fg(self.theme.muted),
            )));
        } else {
            let units: i64 = stock.iter().map(|item| item.quantity).sum();
            lines.push(Line::from(vec![
                label("In stock"),
                Span::styled(
                    format!("{units} units"),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
            for item in &stock {
                lines.push(Line::from(format!(
                    "  {} @ {}: {} × {}",
                    item.platform_label(),
                    item.deposit_label(),
                    item.quantity,
                    format_money(item.unit_price)
                )));
            }
        }

        let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_inventory(&mut self, frame: &mut Frame, area: Rect) {
        let admin = self.auth.is_admin();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(area);

        let available = InventoryTab::available(admin);
        let titles: Vec<Line> = available.iter().map(|tab| Line::from(tab.title())).collect();
        let selected = available
            .iter()
            .position(|tab| *tab == self.state.inventory_tab)
            .unwrap_or(0);
        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("Inventory"))
            .select(selected)
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);

        match self.state.inventory_tab {
            InventoryTab::Overview => {
                let items = self.store.inventory();
                let table = stock_table(&self.theme, &items, "Stock", true);
                render_scrolled(frame, chunks[1], table, &mut self.state.stock, items.len());
            }
            InventoryTab::Recent => {
                let items = reports::recent_items(
                    &self.store.inventory(),
                    self.config.inventory.recent_limit,
                );
                let table = stock_table(&self.theme, &items, "Most recent", true);
                render_scrolled(frame, chunks[1], table, &mut self.state.recent, items.len());
            }
            InventoryTab::Movement => {
                let mut lines = form_lines(&self.theme, &self.state.movement);
                lines.push(Line::from(""));
                let hint = match self.state.busy {
                    Some(busy) => format!("{busy}..."),
                    None => "Enter record · ←/→ change choice · Esc back".to_string(),
                };
                lines.push(Line::from(Span::styled(
                    hint,
                    Style::default().fg(self.theme.muted),
                )));
                let paragraph = Paragraph::new(lines)
                    .block(Block::default().borders(Borders::ALL).title("Stock movement"))
                    .wrap(Wrap { trim: false });
                frame.render_widget(paragraph, chunks[1]);
            }
        }
    }

    fn draw_reports(&self, frame: &mut Frame, area: Rect) {
        let snapshot = self.store.snapshot();
        let report = InventoryReport::build(
            &snapshot.inventory,
            &snapshot.games,
            self.state.report_period,
            self.config.inventory.low_stock_threshold,
        );

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(6),
                Constraint::Min(6),
                Constraint::Length(10),
            ])
            .split(area);

        let summary = &report.summary;
        let summary_lines = vec![
            Line::from(vec![
                Span::styled("Period: ", Style::default().fg(self.theme.muted)),
                Span::styled(
                    format!("◀ {} ▶", report.period.label()),
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(format!(
                "{} stock rows · {} units · {} in stock",
                summary.lines,
                summary.total_units,
                format_money(summary.total_value)
            )),
            Line::from(format!(
                "Average unit value {} · {} rows with low stock",
                format_money(summary.average_unit_value),
                summary.low_stock_count
            )),
            Line::from(Span::styled(
                "[/] change period · e export JSON",
                Style::default().fg(self.theme.muted),
            )),
        ];
        frame.render_widget(
            Paragraph::new(summary_lines)
                .block(Block::default().borders(Borders::ALL).title("Report")),
            rows[0],
        );

        let shares = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[1]);
        let units = share_lines(&self.theme, &report.platform_distribution, |amount| {
            format!("{amount:.0} un")
        });
        frame.render_widget(
            Paragraph::new(units)
                .block(Block::default().borders(Borders::ALL).title("Units by platform")),
            shares[0],
        );
        let value = share_lines(&self.theme, &report.value_by_platform, format_money);
        frame.render_widget(
            Paragraph::new(value)
                .block(Block::default().borders(Borders::ALL).title("Value by platform")),
            shares[1],
        );

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[2]);
        let top_rows: Vec<Row> = report
            .top_games
            .iter()
            .enumerate()
            .map(|(rank, game)| {
                Row::new(vec![
                    Cell::from(format!("{}.", rank + 1)),
                    Cell::from(game.title.clone()),
                    Cell::from(game.units.to_string()),
                    Cell::from(format_money(game.value)),
                ])
            })
            .collect();
        let top = Table::new(
            top_rows,
            [
                Constraint::Length(4),
                Constraint::Min(12),
                Constraint::Length(7),
                Constraint::Length(14),
            ],
        )
        .header(header_row(&self.theme, &["#", "Game", "Units", "Value"]))
        .block(Block::default().borders(Borders::ALL).title("Top games by value"));
        frame.render_widget(top, bottom[0]);

        let export_lines: Vec<Line> = if self.state.exports.is_empty() {
            vec![Line::from(Span::styled(
                "No exports yet",
                Style::default().fg(self.theme.muted),
            ))]
        } else {
            self.state
                .exports
                .iter()
                .map(|entry| {
                    let name = entry
                        .path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    Line::from(vec![
                        Span::raw(
                            entry
                                .generated_at
                                .with_timezone(&Local)
                                .format("%Y-%m-%d %H:%M ")
                                .to_string(),
                        ),
                        Span::styled(
                            format!("{} · {name}", entry.period.label()),
                            Style::default().fg(self.theme.muted),
                        ),
                    ])
                })
                .collect()
        };
        frame.render_widget(
            Paragraph::new(export_lines)
                .block(Block::default().borders(Borders::ALL).title("Exports")),
            bottom[1],
        );
    }

    fn draw_users(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "User management",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("Coming soon."),
        ];
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Users"));
        frame.render_widget(paragraph, area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL).title("Status");

        let mut primary: Vec<Span> = match &self.state.connection {
            Some(report) => vec![
                connection_span(&self.theme, &report.status),
                Span::styled(
                    format!(
                        " (checked {})",
                        report.checked_at.with_timezone(&Local).format("%H:%M:%S")
                    ),
                    Style::default().fg(self.theme.muted),
                ),
            ],
            None => vec![Span::styled(
                "Checking backend...",
                Style::default().fg(self.theme.muted),
            )],
        };
        if self.state.checking {
            primary.push(Span::styled(" ⟳", Style::default().fg(self.theme.muted)));
        }
        if let Some(user) = self.auth.state().user {
            primary.extend(user_spans(&self.theme, user));
        }

        let message = match self.state.busy {
            Some(busy) => Span::styled(format!("{busy}..."), Style::default().fg(self.theme.warning)),
            None if self.state.games.filtering => {
                Span::raw(format!("Filter: {}", self.state.games.filter))
            }
            None => Span::raw(self.state.status.clone()),
        };
        let hints = Span::styled(self.key_hints(), Style::default().fg(self.theme.muted));

        let paragraph = Paragraph::new(vec![
            Line::from(primary),
            Line::from(message),
            Line::from(hints),
        ])
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn key_hints(&self) -> String {
        let admin = self.auth.is_admin();
        let screen = match self.state.screen {
            Screen::Games if self.state.games.filtering => "Enter keep filter · Esc clear",
            Screen::Games if admin => "j/k move · / filter · f genre · n new · e edit · d delete",
            Screen::Games => "j/k move · / filter · f genre",
            Screen::Inventory if admin => "Tab switch view · j/k move · m movement",
            Screen::Inventory => "Tab switch view · j/k move",
            Screen::Reports => "[/] period · e export",
            Screen::Login | Screen::Dashboard | Screen::Users => "",
        };
        let global = "1-5 screens · r reload · x logout · q quit";
        if screen.is_empty() {
            global.to_string()
        } else {
            format!("{screen} · {global}")
        }
    }

    fn render_confirm(&self, frame: &mut Frame, area: Rect, title: &str) {
        let popup = centered_rect(56, 7, area);
        frame.render_widget(Clear, popup);
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Delete game")
            .border_style(Style::default().fg(self.theme.danger));
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(format!("Delete \"{title}\" from the catalog?")),
            Line::from(""),
            Line::from(Span::styled(
                "y confirm · n cancel",
                Style::default().fg(self.theme.muted),
            )),
        ])
        .alignment(Alignment::Center)
        .block(block)
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, popup);
    }
}

fn render_form_modal(theme: &Theme, frame: &mut Frame, area: Rect, title: &str, form: &Form) {
    let mut lines = form_lines(theme, form);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter save · Tab next field · Esc cancel",
        Style::default().fg(theme.muted),
    )));
    let popup = centered_rect(72, lines.len() as u16 + 2, area);
    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(Style::default().fg(theme.accent));
    let paragraph = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup);
}

/// One line per visible field, with the focused field and its cursor highlighted.
fn form_lines(theme: &Theme, form: &Form) -> Vec<Line<'static>> {
    let label_width = form
        .fields
        .iter()
        .filter(|field| field.visible)
        .map(|field| field.label.chars().count())
        .max()
        .unwrap_or(0);

    form.fields
        .iter()
        .enumerate()
        .filter(|(_, field)| field.visible)
        .map(|(index, field)| {
            let focused = index == form.focus;
            let marker = if focused {
                Span::styled("▶ ", Style::default().fg(theme.accent))
            } else {
                Span::raw("  ")
            };
            let label = Span::styled(
                format!("{:<width$} ", field.label, width = label_width),
                if focused {
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.muted)
                },
            );
            let mut spans = vec![marker, label];
            match (&field.input, focused) {
                (FieldInput::Text(input), true) => {
                    let display: Vec<char> = input.display().chars().collect();
                    let at = input.cursor().min(display.len());
                    let before: String = display[..at].iter().collect();
                    let under = display.get(at).copied().unwrap_or(' ');
                    let after: String = display.get(at + 1..).unwrap_or_default().iter().collect();
                    spans.push(Span::raw(before));
                    spans.push(Span::styled(
                        under.to_string(),
                        Style::default().add_modifier(Modifier::REVERSED),
                    ));
                    spans.push(Span::raw(after));
                }
                (_, true) => spans.push(Span::styled(
                    field.display(),
                    Style::default().fg(theme.primary_fg).add_modifier(Modifier::BOLD),
                )),
                (_, false) => spans.push(Span::raw(field.display())),
            }
            Line::from(spans)
        })
        .collect()
}

fn stock_table<'a>(
    theme: &Theme,
    items: &[InventoryItem],
    title: &'a str,
    counted: bool,
) -> Table<'a> {
    let rows: Vec<Row> = items
        .iter()
        .map(|item| {
            Row::new(vec![
                Cell::from(item.title_label().to_string()),
                Cell::from(item.platform_label().to_string()),
                Cell::from(item.deposit_label().to_string()),
                Cell::from(item.quantity.to_string()),
                Cell::from(format_money(item.unit_price)),
                Cell::from(format_money(item.stock_value())),
            ])
        })
        .collect();
    let title = if counted {
        format!("{title} ({})", items.len())
    } else {
        title.to_string()
    };
    Table::new(
        rows,
        [
            Constraint::Min(16),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Length(14),
        ],
    )
    .header(header_row(
        theme,
        &["Game", "Platform", "Deposit", "Qty", "Unit", "Value"],
    ))
    .block(Block::default().borders(Borders::ALL).title(title))
    .highlight_style(
        Style::default()
            .bg(theme.selection_bg)
            .fg(theme.selection_fg),
    )
}

fn render_scrolled(
    frame: &mut Frame,
    area: Rect,
    table: Table,
    cursor: &mut ListCursor,
    len: usize,
) {
    // Borders plus the header row.
    cursor.height = area.height.saturating_sub(3) as usize;
    cursor.clamp(len);
    let mut state = TableState::default().with_offset(cursor.offset);
    if len > 0 {
        state.select(Some(cursor.cursor));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn header_row<'a>(theme: &Theme, labels: &[&'a str]) -> Row<'a> {
    Row::new(labels.iter().map(|label| Cell::from(*label))).style(
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD),
    )
}

fn share_lines(
    theme: &Theme,
    shares: &[PlatformShare],
    amount: impl Fn(f64) -> String,
) -> Vec<Line<'static>> {
    if shares.is_empty() {
        return vec![Line::from(Span::styled(
            "No stock recorded",
            Style::default().fg(theme.muted),
        ))];
    }
    let name_width = shares
        .iter()
        .map(|share| share.platform.chars().count())
        .max()
        .unwrap_or(0);
    shares
        .iter()
        .map(|share| {
            let filled = ((share.percentage / 100.0) * BAR_WIDTH as f64).round() as usize;
            let filled = filled.min(BAR_WIDTH);
            Line::from(vec![
                Span::raw(format!("{:<name_width$} ", share.platform)),
                Span::styled("█".repeat(filled), Style::default().fg(theme.accent)),
                Span::styled(
                    "░".repeat(BAR_WIDTH - filled),
                    Style::default().fg(theme.muted),
                ),
                Span::raw(format!(" {:>5.1}% ", share.percentage)),
                Span::styled(amount(share.amount), Style::default().fg(theme.muted)),
            ])
        })
        .collect()
}

/// Name and role label shown in the status bar.
fn user_spans(theme: &Theme, user: User) -> Vec<Span<'static>> {
    let role = user.role_label();
    vec![
        Span::raw("  ·  "),
        Span::styled(user.name, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!(" ({role})"), Style::default().fg(theme.muted)),
    ]
}

fn connection_span(theme: &Theme, status: &ConnectionStatus) -> Span<'static> {
    let color = if status.is_connected() {
        theme.success
    } else {
        theme.danger
    };
    let text = match status {
        ConnectionStatus::Connected => format!("● {}", status.label()),
        ConnectionStatus::Disconnected { reason } => format!("● {} ({reason})", status.label()),
    };
    Span::styled(text, Style::default().fg(color))
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
