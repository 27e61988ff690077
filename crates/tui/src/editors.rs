//! Builders that turn core data into forms and forms back into requests.

use gamevault_core::{
    auth::{LoginForm, RegisterForm, RegisterRole},
    inventory::{InventorySnapshot, MovementForm, MovementKind, MovementRequest},
    models::{Game, GameDraft},
    validation::{self, FormError},
};

use crate::forms::{ChoiceOption, Field, FieldInput, Form};

pub const LOGIN_NAME: usize = 0;
pub const LOGIN_EMAIL: usize = 1;
pub const LOGIN_PASSWORD: usize = 2;
pub const LOGIN_ROLE: usize = 3;

pub fn login_form(registering: bool) -> Form {
    let roles = [RegisterRole::User, RegisterRole::Admin]
        .into_iter()
        .map(|role| ChoiceOption::new(role.role_name(), role.label()))
        .collect();
    let mut form = Form::new(vec![
        Field::text("Name", ""),
        Field::text("E-mail", ""),
        Field::secret("Password"),
        Field::choice("Role", roles, Some(0)),
    ]);
    set_registering(&mut form, registering);
    form
}

/// Show or hide the registration-only fields.
pub fn set_registering(form: &mut Form, registering: bool) {
    form.set_visible(LOGIN_NAME, registering);
    form.set_visible(LOGIN_ROLE, registering);
    if !registering && form.focus == LOGIN_NAME {
        form.focus = LOGIN_EMAIL;
    }
}

pub fn login_request(form: &Form) -> Result<(String, String), FormError> {
    LoginForm {
        email: form.value(LOGIN_EMAIL),
        password: form.value(LOGIN_PASSWORD),
    }
    .validate()
}

pub fn register_request(form: &Form) -> Result<RegisterForm, FormError> {
    let role = if form.value(LOGIN_ROLE) == RegisterRole::Admin.role_name() {
        RegisterRole::Admin
    } else {
        RegisterRole::User
    };
    let request = RegisterForm {
        name: form.value(LOGIN_NAME).trim().to_string(),
        email: form.value(LOGIN_EMAIL).trim().to_string(),
        password: form.value(LOGIN_PASSWORD),
        role,
    };
    request.validate()?;
    Ok(request)
}

const GAME_TITLE: usize = 0;
const GAME_GENRE: usize = 1;
const GAME_DEVELOPER: usize = 2;
const GAME_PUBLISHER: usize = 3;
const GAME_PRICE: usize = 4;
const GAME_DESCRIPTION: usize = 5;
const GAME_COVER: usize = 6;

/// Form for a new game, or prefilled from `game` when editing.
pub fn game_form(game: Option<&Game>) -> Form {
    let draft = game.map(Game::to_draft).unwrap_or_default();
    let price = game
        .map(|_| format!("{:.2}", draft.suggested_price))
        .unwrap_or_default();
    Form::new(vec![
        Field::text("Title", draft.title),
        Field::text("Genre", draft.genre),
        Field::text("Developer", draft.developer),
        Field::text("Publisher", draft.publisher),
        Field::text("Suggested price", price),
        Field::text("Description", draft.description.unwrap_or_default()),
        Field::text("Cover URL", draft.cover_url.unwrap_or_default()),
    ])
}

pub fn game_draft(form: &Form) -> Result<GameDraft, FormError> {
    let draft = GameDraft {
        title: form.value(GAME_TITLE),
        genre: form.value(GAME_GENRE),
        developer: form.value(GAME_DEVELOPER),
        publisher: form.value(GAME_PUBLISHER),
        suggested_price: validation::decimal("Suggested price", &form.value(GAME_PRICE))?,
        description: Some(form.value(GAME_DESCRIPTION)),
        cover_url: Some(form.value(GAME_COVER)),
    };
    draft.validate()
}

pub const MOVE_KIND: usize = 0;
const MOVE_GAME: usize = 1;
const MOVE_PLATFORM: usize = 2;
const MOVE_ORIGIN: usize = 3;
const MOVE_DESTINATION: usize = 4;
const MOVE_QUANTITY: usize = 5;
const MOVE_UNIT_PRICE: usize = 6;
const MOVE_NOTE: usize = 7;

/// Movement form offering the games, platforms and deposits in `data`.
pub fn movement_form(data: &InventorySnapshot) -> Form {
    let kinds = MovementKind::ALL
        .iter()
        .map(|kind| ChoiceOption::new(kind_value(*kind), kind.label()))
        .collect();
    let games = data
        .games
        .iter()
        .map(|game| ChoiceOption::new(game.id.to_string(), game.title.clone()))
        .collect();
    let platforms = data
        .platforms
        .iter()
        .map(|platform| ChoiceOption::new(platform.id.to_string(), platform.name.clone()))
        .collect::<Vec<_>>();
    let deposits = data
        .deposits
        .iter()
        .map(|deposit| ChoiceOption::new(deposit.id.to_string(), deposit.name.clone()))
        .collect::<Vec<_>>();

    let mut form = Form::new(vec![
        Field::choice("Type", kinds, Some(0)),
        Field::choice("Game", games, None),
        Field::choice("Platform", platforms, None),
        Field::choice("Origin deposit", deposits.clone(), None),
        Field::choice("Destination deposit", deposits, None),
        Field::text("Quantity", "1"),
        Field::text("Unit price", ""),
        Field::text("Note", ""),
    ]);
    sync_movement_fields(&mut form);
    form
}

/// Whether the form was built before any games were loaded.
pub fn movement_options_missing(form: &Form) -> bool {
    match form.fields.get(MOVE_GAME).map(|field| &field.input) {
        Some(FieldInput::Choice { options, .. }) => options.is_empty(),
        _ => true,
    }
}

/// Kind currently chosen in a movement form.
pub fn movement_kind(form: &Form) -> MovementKind {
    let value = form.value(MOVE_KIND);
    MovementKind::ALL
        .into_iter()
        .find(|kind| kind_value(*kind) == value)
        .unwrap_or_default()
}

/// Show only the deposit fields the chosen kind needs.
pub fn sync_movement_fields(form: &mut Form) {
    let kind = movement_kind(form);
    form.set_visible(MOVE_ORIGIN, kind.needs_origin());
    form.set_visible(MOVE_DESTINATION, kind.needs_destination());
    form.set_visible(MOVE_UNIT_PRICE, kind != MovementKind::Transferencia);
}

pub fn movement_request(form: &Form) -> Result<MovementRequest, FormError> {
    let kind = movement_kind(form);
    let visible = |index: usize| {
        form.fields
            .get(index)
            .filter(|field| field.visible)
            .map(|field| field.value())
            .unwrap_or_default()
    };
    MovementForm {
        kind,
        game_id: form.value(MOVE_GAME),
        platform_id: form.value(MOVE_PLATFORM),
        origin_deposit_id: visible(MOVE_ORIGIN),
        destination_deposit_id: visible(MOVE_DESTINATION),
        quantity: form.value(MOVE_QUANTITY),
        unit_price: visible(MOVE_UNIT_PRICE),
        note: form.value(MOVE_NOTE),
    }
    .validate()
}

fn kind_value(kind: MovementKind) -> &'static str {
    match kind {
        MovementKind::Entrada => "ENTRADA",
        MovementKind::Saida => "SAIDA",
        MovementKind::AjustePositivo => "AJUSTE_POSITIVO",
        MovementKind::AjusteNegativo => "AJUSTE_NEGATIVO",
        MovementKind::Transferencia => "TRANSFERENCIA",
    }
}
