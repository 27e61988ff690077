//! Shared domain models mirrored from the backend DTOs.
//!
//! Field names on the wire follow the backend (`titulo`, `quantidade`, ...);
//! the Rust side uses English names.

use serde::{Deserialize, Serialize};

/// Role string granted to administrators.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";
/// Role string granted to regular users.
pub const ROLE_USER: &str = "ROLE_USUARIO";

/// Catalog entry for a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Backend identifier.
    pub id: i64,
    /// Game title.
    #[serde(rename = "titulo")]
    pub title: String,
    /// Free-form description.
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    /// Suggested retail price.
    #[serde(rename = "precoSugerido", default)]
    pub suggested_price: f64,
    /// Genre label.
    #[serde(rename = "genero", default)]
    pub genre: String,
    /// Developer studio.
    #[serde(rename = "desenvolvedora", default)]
    pub developer: String,
    /// Publisher.
    #[serde(rename = "publicadora", default)]
    pub publisher: String,
    /// Cover image URL.
    #[serde(rename = "urlImagemCapa", default)]
    pub cover_url: Option<String>,
}

impl Game {
    /// Editable copy of the catalog fields.
    pub fn to_draft(&self) -> GameDraft {
        GameDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            suggested_price: self.suggested_price,
            genre: self.genre.clone(),
            developer: self.developer.clone(),
            publisher: self.publisher.clone(),
            cover_url: self.cover_url.clone(),
        }
    }
}

/// Body used to create or update a game.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameDraft {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "precoSugerido")]
    pub suggested_price: f64,
    #[serde(rename = "genero")]
    pub genre: String,
    #[serde(rename = "desenvolvedora")]
    pub developer: String,
    #[serde(rename = "publicadora")]
    pub publisher: String,
    #[serde(rename = "urlImagemCapa", skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
}

/// Stock of one game on one platform at one deposit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Backend identifier; higher ids are more recent.
    pub id: i64,
    /// Catalog id of the game.
    #[serde(rename = "jogoId")]
    pub game_id: i64,
    /// Denormalised game title.
    #[serde(rename = "jogoTitulo", default)]
    pub game_title: Option<String>,
    /// Platform id.
    #[serde(rename = "plataformaId")]
    pub platform_id: i64,
    /// Denormalised platform name.
    #[serde(rename = "plataformaNome", default)]
    pub platform_name: Option<String>,
    /// Deposit id.
    #[serde(rename = "depositoId")]
    pub deposit_id: i64,
    /// Denormalised deposit name.
    #[serde(rename = "depositoNome", default)]
    pub deposit_name: Option<String>,
    /// Units on hand.
    #[serde(rename = "quantidade")]
    pub quantity: i64,
    /// Current unit price; missing values count as zero.
    #[serde(rename = "precoUnitarioAtual", default)]
    pub unit_price: f64,
}

impl InventoryItem {
    /// Quantity times unit price.
    pub fn stock_value(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }

    /// Game title or `N/A`.
    pub fn title_label(&self) -> &str {
        label_or_na(self.game_title.as_deref())
    }

    /// Platform name or `N/A`.
    pub fn platform_label(&self) -> &str {
        label_or_na(self.platform_name.as_deref())
    }

    /// Deposit name or `N/A`.
    pub fn deposit_label(&self) -> &str {
        label_or_na(self.deposit_name.as_deref())
    }
}

fn label_or_na(value: Option<&str>) -> &str {
    match value {
        Some(value) if !value.trim().is_empty() => value,
        _ => "N/A",
    }
}

/// Hardware or storefront classification.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
}

/// Warehouse location holding stock.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "localizacao", default)]
    pub location: String,
}

/// Authenticated user as kept by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Backend identifier.
    pub id: i64,
    /// Login e-mail.
    pub email: String,
    /// Full name.
    pub name: String,
    /// Role strings such as `ROLE_ADMIN`.
    #[serde(default)]
    pub roles: Vec<String>,
}

impl User {
    /// Whether the user carries the given role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|candidate| candidate == role)
    }

    /// Label shown next to the user name.
    pub fn role_label(&self) -> &'static str {
        if self.has_role(ROLE_ADMIN) {
            "Administrator"
        } else {
            "User"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    #[test]
    fn inventory_item_reads_backend_payload() -> Result<()> {
        let item: InventoryItem = serde_json::from_value(json!({
            "id": 7,
            "jogoId": 101,
            "jogoTitulo": "Cyberpunk 2077",
            "plataformaId": 3,
            "plataformaNome": "Nintendo Switch",
            "depositoId": 1,
            "depositoNome": null,
            "quantidade": 4,
            "precoUnitarioAtual": 10.5
        }))?;
        assert_eq!(item.title_label(), "Cyberpunk 2077");
        assert_eq!(item.deposit_label(), "N/A");
        assert!((item.stock_value() - 42.0).abs() < f64::EPSILON);

        let no_price: InventoryItem = serde_json::from_value(json!({
            "id": 8, "jogoId": 1, "plataformaId": 1, "depositoId": 1, "quantidade": 2
        }))?;
        assert_eq!(no_price.stock_value(), 0.0);
        Ok(())
    }

    #[test]
    fn draft_omits_missing_optionals() -> Result<()> {
        let draft = GameDraft {
            title: "Hades".to_string(),
            suggested_price: 89.9,
            genre: "Roguelike".to_string(),
            developer: "Supergiant".to_string(),
            publisher: "Supergiant".to_string(),
            ..GameDraft::default()
        };
        let value = serde_json::to_value(&draft)?;
        assert_eq!(value["titulo"], json!("Hades"));
        assert_eq!(value["precoSugerido"], json!(89.9));
        assert!(value.get("descricao").is_none());
        assert!(value.get("urlImagemCapa").is_none());
        Ok(())
    }

    #[test]
    fn role_label_prefers_admin() {
        let user = User {
            id: 1,
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            roles: vec![ROLE_USER.to_string(), ROLE_ADMIN.to_string()],
        };
        assert!(user.has_role(ROLE_ADMIN));
        assert_eq!(user.role_label(), "Administrator");
    }
}
