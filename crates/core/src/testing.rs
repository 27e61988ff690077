//! In-process fake of the inventory backend used by unit tests.

use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};

use crate::{
    api::ApiClient,
    models::{Deposit, Game, GameDraft, InventoryItem, Platform},
};

#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: Value,
}

#[derive(Default)]
struct BackendState {
    games: Vec<Game>,
    inventory: Vec<InventoryItem>,
    platforms: Vec<Platform>,
    deposits: Vec<Deposit>,
    next_id: i64,
    requests: Vec<RecordedRequest>,
    failures: HashMap<String, (u16, Value)>,
    text_replies: HashMap<String, String>,
    last_authorization: Option<String>,
    login_response: Option<Value>,
    register_response: Option<Value>,
}

pub(crate) struct FakeBackend {
    addr: SocketAddr,
    state: Arc<Mutex<BackendState>>,
}

impl FakeBackend {
    /// Start a backend seeded with two games, two platforms, three deposits
    /// and three stock rows.
    pub async fn start() -> Result<Self> {
        let state = Arc::new(Mutex::new(seeded_state()));
        let app = Router::new()
            .fallback(handle)
            .with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        Ok(Self { addr, state })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}/api", self.addr)
    }

    pub fn client(&self) -> ApiClient {
        let http = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("build test http client");
        ApiClient::with_client(&self.base_url(), http)
    }

    /// Make the next request to `path` fail with `status` and `body`.
    pub fn fail_next(&self, path: &str, status: u16, body: Value) {
        self.state
            .lock()
            .failures
            .insert(path.to_string(), (status, body));
    }

    /// Answer the next request to `path` with `200 OK` and a plain-text body.
    pub fn reply_text_next(&self, path: &str, text: &str) {
        self.state
            .lock()
            .text_replies
            .insert(path.to_string(), text.to_string());
    }

    pub fn set_login_response(&self, body: Value) {
        self.state.lock().login_response = Some(body);
    }

    pub fn set_register_response(&self, body: Value) {
        self.state.lock().register_response = Some(body);
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state.lock().last_authorization.clone()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }

    pub fn inventory(&self) -> Vec<InventoryItem> {
        self.state.lock().inventory.clone()
    }
}

fn seeded_state() -> BackendState {
    let games = vec![
        sample_game(101, "Cyberpunk 2077", "RPG", "CD Projekt Red", 199.9),
        sample_game(102, "Grand Theft Auto V", "Ação", "Rockstar North", 99.5),
    ];
    let platforms = vec![
        Platform {
            id: 1,
            name: "Playstation".to_string(),
        },
        Platform {
            id: 4,
            name: "PC".to_string(),
        },
    ];
    let deposits = vec![
        Deposit {
            id: 1,
            name: "Depósito Central".to_string(),
            location: "Rua Principal, 123".to_string(),
        },
        Deposit {
            id: 2,
            name: "Filial Zona Norte".to_string(),
            location: "Avenida Secundária, 456".to_string(),
        },
        Deposit {
            id: 3,
            name: "Galpão Industrial".to_string(),
            location: "Distrito Industrial, 789".to_string(),
        },
    ];
    let inventory = vec![
        stock_row(1, &games[0], &platforms[0], &deposits[0], 5),
        stock_row(2, &games[1], &platforms[1], &deposits[1], 3),
        stock_row(3, &games[0], &platforms[1], &deposits[2], 1),
    ];
    BackendState {
        games,
        inventory,
        platforms,
        deposits,
        next_id: 200,
        ..BackendState::default()
    }
}

pub(crate) fn sample_game(id: i64, title: &str, genre: &str, developer: &str, price: f64) -> Game {
    Game {
        id,
        title: title.to_string(),
        description: None,
        suggested_price: price,
        genre: genre.to_string(),
        developer: developer.to_string(),
        publisher: developer.to_string(),
        cover_url: None,
    }
}

fn stock_row(
    id: i64,
    game: &Game,
    platform: &Platform,
    deposit: &Deposit,
    quantity: i64,
) -> InventoryItem {
    InventoryItem {
        id,
        game_id: game.id,
        game_title: Some(game.title.clone()),
        platform_id: platform.id,
        platform_name: Some(platform.name.clone()),
        deposit_id: deposit.id,
        deposit_name: Some(deposit.name.clone()),
        quantity,
        unit_price: game.suggested_price,
    }
}

async fn handle(
    State(state): State<Arc<Mutex<BackendState>>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix("/api")
        .unwrap_or(uri.path())
        .to_string();
    let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);

    let mut guard = state.lock();
    let state = &mut *guard;
    state.last_authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state.requests.push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        body: body.clone(),
    });

    if let Some((status, payload)) = state.failures.remove(&path) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return (status, Json(payload)).into_response();
    }
    if let Some(text) = state.text_replies.remove(&path) {
        return (StatusCode::OK, text).into_response();
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    match (method.as_str(), segments.as_slice()) {
        ("GET", ["jogos"]) => Json(state.games.clone()).into_response(),
        ("POST", ["jogos"]) => match serde_json::from_value::<GameDraft>(body) {
            Ok(draft) => {
                state.next_id += 1;
                let game = game_from_draft(state.next_id, draft);
                state.games.push(game.clone());
                (StatusCode::CREATED, Json(game)).into_response()
            }
            Err(err) => bad_request(&err.to_string()),
        },
        ("PUT", ["jogos", id]) => {
            let Ok(id) = id.parse::<i64>() else {
                return bad_request("invalid id");
            };
            let Ok(draft) = serde_json::from_value::<GameDraft>(body) else {
                return bad_request("invalid game");
            };
            let game = game_from_draft(id, draft);
            match state.games.iter_mut().find(|existing| existing.id == id) {
                Some(existing) => {
                    *existing = game.clone();
                    for row in state.inventory.iter_mut().filter(|row| row.game_id == id) {
                        row.game_title = Some(game.title.clone());
                    }
                    Json(game).into_response()
                }
                None => not_found(),
            }
        }
        ("DELETE", ["jogos", id]) => {
            let Ok(id) = id.parse::<i64>() else {
                return bad_request("invalid id");
            };
            let before = state.games.len();
            state.games.retain(|game| game.id != id);
            if state.games.len() == before {
                return not_found();
            }
            state.inventory.retain(|row| row.game_id != id);
            StatusCode::NO_CONTENT.into_response()
        }
        ("GET", ["plataformas"]) => Json(state.platforms.clone()).into_response(),
        ("GET", ["depositos"]) => Json(state.deposits.clone()).into_response(),
        ("GET", ["estoque", "consultar"]) => Json(state.inventory.clone()).into_response(),
        ("POST", ["estoque", "movimentar"]) => {
            let quantity = body["quantidade"].as_i64().unwrap_or(0);
            let game_id = body["jogoId"].as_i64().unwrap_or(0);
            let platform_id = body["plataformaId"].as_i64().unwrap_or(0);
            let (deposit, delta) = match body["tipo"].as_str() {
                Some("ENTRADA") | Some("AJUSTE_POSITIVO") => {
                    (body["depositoDestinoId"].as_i64(), quantity)
                }
                Some("SAIDA") | Some("AJUSTE_NEGATIVO") => {
                    (body["depositoOrigemId"].as_i64(), -quantity)
                }
                _ => return bad_request("tipo inválido"),
            };
            let Some(deposit) = deposit else {
                return bad_request("depósito obrigatório");
            };
            apply_delta(state, game_id, platform_id, deposit, delta);
            Json(json!({"status": "ok"})).into_response()
        }
        ("POST", ["estoque", "transferir"]) => {
            if body.get("tipo").is_some() {
                return bad_request("transferência não aceita tipo");
            }
            let quantity = body["quantidade"].as_i64().unwrap_or(0);
            let game_id = body["jogoId"].as_i64().unwrap_or(0);
            let platform_id = body["plataformaId"].as_i64().unwrap_or(0);
            let (Some(origin), Some(destination)) = (
                body["depositoOrigemId"].as_i64(),
                body["depositoDestinoId"].as_i64(),
            ) else {
                return bad_request("depósitos obrigatórios");
            };
            apply_delta(state, game_id, platform_id, origin, -quantity);
            apply_delta(state, game_id, platform_id, destination, quantity);
            Json(json!({"status": "ok"})).into_response()
        }
        ("POST", ["auth", "login"]) => {
            if body["password"].as_str() == Some("wrong") {
                return (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"message": "Credenciais inválidas"})),
                )
                    .into_response();
            }
            let response = state.login_response.clone().unwrap_or_else(|| {
                json!({
                    "accessToken": "token-login",
                    "id": 7,
                    "username": body["username"],
                    "nomeCompleto": "Ana Souza",
                    "roles": ["ROLE_ADMIN"],
                })
            });
            Json(response).into_response()
        }
        ("POST", ["auth", "registrar"]) => {
            let role = body["roleName"].as_str().unwrap_or("USUARIO");
            let response = state.register_response.clone().unwrap_or_else(|| {
                json!({
                    "accessToken": "token-register",
                    "id": 8,
                    "username": body["email"],
                    "nomeCompleto": body["username"],
                    "roles": [format!("ROLE_{role}")],
                })
            });
            Json(response).into_response()
        }
        _ => not_found(),
    }
}

fn game_from_draft(id: i64, draft: GameDraft) -> Game {
    Game {
        id,
        title: draft.title,
        description: draft.description,
        suggested_price: draft.suggested_price,
        genre: draft.genre,
        developer: draft.developer,
        publisher: draft.publisher,
        cover_url: draft.cover_url,
    }
}

fn apply_delta(state: &mut BackendState, game_id: i64, platform_id: i64, deposit_id: i64, delta: i64) {
    if let Some(row) = state.inventory.iter_mut().find(|row| {
        row.game_id == game_id && row.platform_id == platform_id && row.deposit_id == deposit_id
    }) {
        row.quantity += delta;
        return;
    }
    state.next_id += 1;
    let id = state.next_id;
    let game = state.games.iter().find(|game| game.id == game_id).cloned();
    let platform = state.platforms.iter().find(|p| p.id == platform_id).cloned();
    let deposit = state.deposits.iter().find(|d| d.id == deposit_id).cloned();
    state.inventory.push(InventoryItem {
        id,
        game_id,
        game_title: game.as_ref().map(|game| game.title.clone()),
        platform_id,
        platform_name: platform.map(|platform| platform.name),
        deposit_id,
        deposit_name: deposit.map(|deposit| deposit.name),
        quantity: delta,
        unit_price: game.map(|game| game.suggested_price).unwrap_or_default(),
    });
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"message": "not found"}))).into_response()
}
