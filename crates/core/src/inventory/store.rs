use std::sync::Arc;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::movement::{MovementRequest, StockMovementRequest, StockTransferRequest};
use crate::{
    api::{routes, ApiClient, ApiError},
    models::{Deposit, Game, GameDraft, InventoryItem, Platform},
    validation::FormError,
};

const MOVEMENT_FAILED: &str = "Failed to record stock movement";
const TRANSFER_FAILED: &str = "Failed to record stock transfer";
const SAVE_GAME_FAILED: &str = "Failed to save game";
const DELETE_GAME_FAILED: &str = "Failed to delete game";

fn load_failed(collection: &str) -> String {
    format!("Failed to load {collection} from the backend")
}

/// Failure of a catalog mutation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The draft was rejected before any request was made.
    #[error(transparent)]
    Invalid(#[from] FormError),
    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl StoreError {
    /// Message suitable for the status line.
    pub fn user_message(&self, default: &str) -> String {
        match self {
            StoreError::Invalid(err) => err.to_string(),
            StoreError::Api(err) => err.user_message(default),
        }
    }
}

/// Owned copy of everything the store holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySnapshot {
    #[allow(missing_docs)]
    pub games: Vec<Game>,
    #[allow(missing_docs)]
    pub inventory: Vec<InventoryItem>,
    #[allow(missing_docs)]
    pub platforms: Vec<Platform>,
    #[allow(missing_docs)]
    pub deposits: Vec<Deposit>,
    /// A full reload is in flight.
    pub is_loading: bool,
    /// Last failure, if any.
    pub error: Option<String>,
}

/// Client-side cache of the backend collections.
///
/// Clones share the same data, so one handle can be moved into a spawned task
/// while the UI keeps reading from another.
#[derive(Clone)]
pub struct InventoryStore {
    client: ApiClient,
    inner: Arc<RwLock<InventorySnapshot>>,
}

impl InventoryStore {
    /// Create an empty store.
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            inner: Arc::new(RwLock::new(InventorySnapshot::default())),
        }
    }

    /// Reload all four collections concurrently.
    ///
    /// Collections whose request fails keep their previous contents and the
    /// failures are joined into [`InventoryStore::error`].
    pub async fn load_all(&self) {
        {
            let mut inner = self.inner.write();
            inner.is_loading = true;
            inner.error = None;
        }

        let (games, inventory, platforms, deposits) = tokio::join!(
            self.client.get::<Vec<Game>>(routes::GAMES),
            self.client.get::<Vec<InventoryItem>>(routes::INVENTORY),
            self.client.get::<Vec<Platform>>(routes::PLATFORMS),
            self.client.get::<Vec<Deposit>>(routes::DEPOSITS),
        );

        let mut failures = Vec::new();
        let mut inner = self.inner.write();
        match games {
            Ok(games) => inner.games = games,
            Err(err) => failures.push(log_load_failure("games", &err)),
        }
        match inventory {
            Ok(inventory) => inner.inventory = inventory,
            Err(err) => failures.push(log_load_failure("inventory", &err)),
        }
        match platforms {
            Ok(platforms) => inner.platforms = platforms,
            Err(err) => failures.push(log_load_failure("platforms", &err)),
        }
        match deposits {
            Ok(deposits) => inner.deposits = deposits,
            Err(err) => failures.push(log_load_failure("deposits", &err)),
        }
        inner.is_loading = false;
        inner.error = (!failures.is_empty()).then(|| failures.join("; "));
        info!(
            games = inner.games.len(),
            inventory = inner.inventory.len(),
            platforms = inner.platforms.len(),
            deposits = inner.deposits.len(),
            failures = failures.len(),
            "inventory data loaded"
        );
    }

    /// Reload the game catalog.
    pub async fn fetch_games(&self) -> Result<Vec<Game>, ApiError> {
        let games = self.fetch(routes::GAMES, "games").await?;
        self.inner.write().games = games.clone();
        Ok(games)
    }

    /// Reload stock levels.
    pub async fn fetch_inventory(&self) -> Result<Vec<InventoryItem>, ApiError> {
        let inventory = self.fetch(routes::INVENTORY, "inventory").await?;
        self.inner.write().inventory = inventory.clone();
        Ok(inventory)
    }

    /// Reload platforms.
    pub async fn fetch_platforms(&self) -> Result<Vec<Platform>, ApiError> {
        let platforms = self.fetch(routes::PLATFORMS, "platforms").await?;
        self.inner.write().platforms = platforms.clone();
        Ok(platforms)
    }

    /// Reload deposits.
    pub async fn fetch_deposits(&self) -> Result<Vec<Deposit>, ApiError> {
        let deposits = self.fetch(routes::DEPOSITS, "deposits").await?;
        self.inner.write().deposits = deposits.clone();
        Ok(deposits)
    }

    /// Create a game and return the backend's record.
    pub async fn add_game(&self, draft: &GameDraft) -> Result<Game, StoreError> {
        let draft = draft.validate()?;
        let game: Game = self
            .client
            .post(routes::GAMES, &draft)
            .await
            .map_err(|err| self.record_failure(err, SAVE_GAME_FAILED))?;
        info!(id = game.id, title = %game.title, "game created");
        self.inner.write().games.push(game.clone());
        self.refresh_inventory().await;
        Ok(game)
    }

    /// Replace the game with `id` and return the backend's record.
    pub async fn update_game(&self, id: i64, draft: &GameDraft) -> Result<Game, StoreError> {
        let draft = draft.validate()?;
        let game: Game = self
            .client
            .put(&routes::game(id), &draft)
            .await
            .map_err(|err| self.record_failure(err, SAVE_GAME_FAILED))?;
        info!(id, title = %game.title, "game updated");
        {
            let mut inner = self.inner.write();
            match inner.games.iter_mut().find(|existing| existing.id == id) {
                Some(existing) => *existing = game.clone(),
                None => inner.games.push(game.clone()),
            }
        }
        self.refresh_inventory().await;
        Ok(game)
    }

    /// Delete the game with `id`.
    pub async fn delete_game(&self, id: i64) -> Result<(), StoreError> {
        self.client
            .delete(&routes::game(id))
            .await
            .map_err(|err| self.record_failure(err, DELETE_GAME_FAILED))?;
        info!(id, "game deleted");
        self.inner.write().games.retain(|game| game.id != id);
        self.refresh_inventory().await;
        Ok(())
    }

    /// Record an inbound, outbound or adjustment movement.
    pub async fn add_stock_movement(
        &self,
        request: &StockMovementRequest,
    ) -> Result<Value, ApiError> {
        let response = self
            .client
            .post_value(routes::MOVEMENTS, request)
            .await
            .map_err(|err| self.record_failure(err, MOVEMENT_FAILED))?;
        info!(
            kind = ?request.tipo,
            game = request.jogo_id,
            quantity = request.quantidade,
            "stock movement recorded"
        );
        self.refresh_inventory().await;
        Ok(response)
    }

    /// Move stock between two deposits.
    pub async fn transfer_stock(&self, request: &StockTransferRequest) -> Result<Value, ApiError> {
        let response = self
            .client
            .post_value(routes::TRANSFERS, request)
            .await
            .map_err(|err| self.record_failure(err, TRANSFER_FAILED))?;
        info!(
            game = request.jogo_id,
            from = request.deposito_origem_id,
            to = request.deposito_destino_id,
            quantity = request.quantidade,
            "stock transfer recorded"
        );
        self.refresh_inventory().await;
        Ok(response)
    }

    /// Send a validated form to the matching endpoint.
    pub async fn submit_movement(&self, request: &MovementRequest) -> Result<Value, ApiError> {
        match request {
            MovementRequest::Movement(request) => self.add_stock_movement(request).await,
            MovementRequest::Transfer(request) => self.transfer_stock(request).await,
        }
    }

    #[allow(missing_docs)]
    pub fn games(&self) -> Vec<Game> {
        self.inner.read().games.clone()
    }

    #[allow(missing_docs)]
    pub fn inventory(&self) -> Vec<InventoryItem> {
        self.inner.read().inventory.clone()
    }

    #[allow(missing_docs)]
    pub fn platforms(&self) -> Vec<Platform> {
        self.inner.read().platforms.clone()
    }

    #[allow(missing_docs)]
    pub fn deposits(&self) -> Vec<Deposit> {
        self.inner.read().deposits.clone()
    }

    /// Whether a full reload is in flight.
    pub fn is_loading(&self) -> bool {
        self.inner.read().is_loading
    }

    /// Last recorded failure.
    pub fn error(&self) -> Option<String> {
        self.inner.read().error.clone()
    }

    /// Dismiss the last failure.
    pub fn clear_error(&self) {
        self.inner.write().error = None;
    }

    /// Copy of the whole store.
    pub fn snapshot(&self) -> InventorySnapshot {
        self.inner.read().clone()
    }

    /// Drop all cached data, e.g. after logout.
    pub fn reset(&self) {
        *self.inner.write() = InventorySnapshot::default();
    }

    /// Games whose title, genre or developer contains `query`
    /// (case-insensitive), optionally restricted to one genre.
    pub fn games_matching(&self, query: &str, genre: Option<&str>) -> Vec<Game> {
        let needle = query.trim().to_lowercase();
        self.inner
            .read()
            .games
            .iter()
            .filter(|game| genre.map(|genre| game.genre == genre).unwrap_or(true))
            .filter(|game| {
                needle.is_empty()
                    || game.title.to_lowercase().contains(&needle)
                    || game.genre.to_lowercase().contains(&needle)
                    || game.developer.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Distinct non-empty genres in catalog order.
    pub fn genres(&self) -> Vec<String> {
        let mut genres: Vec<String> = Vec::new();
        for game in &self.inner.read().games {
            let genre = game.genre.trim();
            if !genre.is_empty() && !genres.iter().any(|known| known == genre) {
                genres.push(genre.to_string());
            }
        }
        genres
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        collection: &str,
    ) -> Result<Vec<T>, ApiError> {
        self.inner.write().error = None;
        match self.client.get::<Vec<T>>(path).await {
            Ok(items) => {
                debug!(collection, count = items.len(), "collection fetched");
                Ok(items)
            }
            Err(err) => {
                self.inner.write().error = Some(log_load_failure(collection, &err));
                Err(err)
            }
        }
    }

    /// Refetch stock after a mutation; failures are recorded but not returned.
    async fn refresh_inventory(&self) {
        if let Err(err) = self.fetch_inventory().await {
            warn!(%err, "inventory refresh after mutation failed");
        }
    }

    fn record_failure(&self, err: ApiError, default: &str) -> ApiError {
        warn!(%err, "{default}");
        self.inner.write().error = Some(err.user_message(default));
        err
    }
}

fn log_load_failure(collection: &str, err: &ApiError) -> String {
    warn!(collection, %err, "failed to load collection");
    load_failed(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        inventory::movement::{MovementForm, MovementKind},
        testing::{sample_game, FakeBackend},
    };
    use anyhow::Result;
    use serde_json::json;

    async fn loaded_store(backend: &FakeBackend) -> InventoryStore {
        let store = InventoryStore::new(backend.client());
        store.load_all().await;
        store
    }

    fn quantity_at(store: &InventoryStore, game: i64, platform: i64, deposit: i64) -> i64 {
        store
            .inventory()
            .iter()
            .filter(|row| {
                row.game_id == game && row.platform_id == platform && row.deposit_id == deposit
            })
            .map(|row| row.quantity)
            .sum()
    }

    fn draft(title: &str) -> GameDraft {
        GameDraft {
            title: title.to_string(),
            suggested_price: 149.0,
            genre: "Roguelike".to_string(),
            developer: "Supergiant".to_string(),
            publisher: "Supergiant".to_string(),
            ..GameDraft::default()
        }
    }

    #[tokio::test]
    async fn load_all_fills_every_collection() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let store = loaded_store(&backend).await;

        let snapshot = store.snapshot();
        assert_eq!(snapshot.games.len(), 2);
        assert_eq!(snapshot.inventory.len(), 3);
        assert_eq!(snapshot.platforms.len(), 2);
        assert_eq!(snapshot.deposits.len(), 3);
        assert!(!snapshot.is_loading);
        assert_eq!(snapshot.error, None);
        Ok(())
    }

    #[tokio::test]
    async fn failed_collection_keeps_previous_contents() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let store = loaded_store(&backend).await;

        backend.fail_next("/plataformas", 500, json!({}));
        store.load_all().await;

        assert_eq!(store.platforms().len(), 2);
        assert_eq!(store.games().len(), 2);
        assert_eq!(
            store.error().as_deref(),
            Some("Failed to load platforms from the backend")
        );
        assert!(!store.is_loading());

        store.clear_error();
        assert_eq!(store.error(), None);
        Ok(())
    }

    #[tokio::test]
    async fn fetch_failure_is_returned_and_recorded() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let store = InventoryStore::new(backend.client());

        backend.fail_next("/jogos", 503, json!({"message": "indisponível"}));
        let err = store.fetch_games().await.expect_err("fetch should fail");
        assert_eq!(err.status(), Some(503));
        assert_eq!(
            store.error().as_deref(),
            Some("Failed to load games from the backend")
        );

        assert_eq!(store.fetch_deposits().await?.len(), 3);
        assert_eq!(store.error(), None);
        Ok(())
    }

    #[tokio::test]
    async fn add_game_appends_record_and_refetches_inventory() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let store = loaded_store(&backend).await;
        let before = backend.requests_to("/estoque/consultar").len();

        let game = store.add_game(&draft("Hades")).await?;
        assert_eq!(game.id, 201);
        assert_eq!(store.games().last().map(|g| g.title.as_str()), Some("Hades"));
        assert_eq!(backend.requests_to("/estoque/consultar").len(), before + 1);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_backend() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let store = InventoryStore::new(backend.client());

        let err = store
            .add_game(&draft("  "))
            .await
            .expect_err("blank title is rejected");
        assert!(matches!(err, StoreError::Invalid(FormError::Missing("Title"))));
        assert!(backend.requests_to("/jogos").is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn update_and_delete_game() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let store = loaded_store(&backend).await;

        let mut edit = sample_game(101, "Cyberpunk 2077: Ultimate", "RPG", "CD Projekt Red", 249.9)
            .to_draft();
        edit.description = Some("Inclui Phantom Liberty".to_string());
        let updated = store.update_game(101, &edit).await?;
        assert_eq!(updated.title, "Cyberpunk 2077: Ultimate");
        assert_eq!(store.games().len(), 2);
        assert!(store
            .inventory()
            .iter()
            .filter(|row| row.game_id == 101)
            .all(|row| row.title_label() == "Cyberpunk 2077: Ultimate"));

        store.delete_game(102).await?;
        assert!(store.games().iter().all(|game| game.id != 102));
        assert!(store.inventory().iter().all(|row| row.game_id != 102));

        let err = store.delete_game(999).await.expect_err("unknown id");
        assert_eq!(err.user_message(DELETE_GAME_FAILED), "not found");
        Ok(())
    }

    #[tokio::test]
    async fn movement_updates_stock() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let store = loaded_store(&backend).await;

        let request = MovementForm {
            kind: MovementKind::Entrada,
            game_id: "101".to_string(),
            platform_id: "1".to_string(),
            destination_deposit_id: "1".to_string(),
            quantity: "3".to_string(),
            ..MovementForm::default()
        }
        .validate()?;
        let response = store.submit_movement(&request).await?;
        assert_eq!(response["status"], "ok");
        assert_eq!(quantity_at(&store, 101, 1, 1), 8);
        Ok(())
    }

    #[tokio::test]
    async fn transfer_moves_stock_between_deposits() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let store = loaded_store(&backend).await;

        let request = MovementForm {
            kind: MovementKind::Transferencia,
            game_id: "101".to_string(),
            platform_id: "1".to_string(),
            origin_deposit_id: "1".to_string(),
            destination_deposit_id: "3".to_string(),
            quantity: "2".to_string(),
            ..MovementForm::default()
        }
        .validate()?;
        store.submit_movement(&request).await?;

        assert_eq!(quantity_at(&store, 101, 1, 1), 3);
        assert_eq!(quantity_at(&store, 101, 1, 3), 2);
        assert!(backend.requests_to("/estoque/movimentar").is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn plain_text_confirmation_counts_as_success() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let store = loaded_store(&backend).await;
        let refetches = backend.requests_to("/estoque/consultar").len();
        let request = StockMovementRequest {
            tipo: MovementKind::Entrada,
            jogo_id: 102,
            plataforma_id: 4,
            deposito_origem_id: None,
            deposito_destino_id: Some(2),
            quantidade: 1,
            preco_unitario_momento: None,
            observacao: None,
        };

        backend.reply_text_next("/estoque/movimentar", "Movimentação registrada com sucesso");
        let response = store.add_stock_movement(&request).await?;
        assert_eq!(response, json!("Movimentação registrada com sucesso"));
        assert_eq!(store.error(), None);
        assert_eq!(
            backend.requests_to("/estoque/consultar").len(),
            refetches + 1
        );
        Ok(())
    }

    #[tokio::test]
    async fn movement_failure_prefers_backend_message() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let store = loaded_store(&backend).await;
        let request = StockMovementRequest {
            tipo: MovementKind::Saida,
            jogo_id: 101,
            plataforma_id: 1,
            deposito_origem_id: Some(1),
            deposito_destino_id: None,
            quantidade: 50,
            preco_unitario_momento: None,
            observacao: None,
        };

        backend.fail_next("/estoque/movimentar", 422, json!({"message": "Estoque insuficiente"}));
        assert!(store.add_stock_movement(&request).await.is_err());
        assert_eq!(store.error().as_deref(), Some("Estoque insuficiente"));

        backend.fail_next("/estoque/movimentar", 500, json!({}));
        assert!(store.add_stock_movement(&request).await.is_err());
        assert_eq!(store.error().as_deref(), Some(MOVEMENT_FAILED));
        assert_eq!(quantity_at(&store, 101, 1, 1), 5);
        Ok(())
    }

    #[tokio::test]
    async fn refetch_failure_does_not_fail_mutation() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let store = loaded_store(&backend).await;
        let request = StockTransferRequest {
            jogo_id: 102,
            plataforma_id: 4,
            deposito_origem_id: 2,
            deposito_destino_id: 1,
            quantidade: 1,
            observacao: None,
        };

        backend.fail_next("/estoque/consultar", 500, json!({}));
        store.transfer_stock(&request).await?;
        assert_eq!(
            store.error().as_deref(),
            Some("Failed to load inventory from the backend")
        );
        assert_eq!(quantity_at(&store, 102, 4, 2), 3);
        assert_eq!(
            backend
                .inventory()
                .iter()
                .find(|row| row.id == 2)
                .map(|row| row.quantity),
            Some(2)
        );
        Ok(())
    }

    #[tokio::test]
    async fn catalog_queries() -> Result<()> {
        let backend = FakeBackend::start().await?;
        let store = loaded_store(&backend).await;

        assert_eq!(store.games_matching("", None).len(), 2);
        let by_developer = store.games_matching("rockstar", None);
        assert_eq!(by_developer.len(), 1);
        assert_eq!(by_developer[0].id, 102);
        assert_eq!(store.games_matching("rpg", None).len(), 1);
        assert!(store.games_matching("cyber", Some("Ação")).is_empty());
        assert_eq!(store.games_matching("", Some("RPG")).len(), 1);
        assert_eq!(store.genres(), vec!["RPG".to_string(), "Ação".to_string()]);

        store.reset();
        assert!(store.games().is_empty());
        Ok(())
    }
}
