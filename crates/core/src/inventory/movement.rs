//! Stock movement requests and the form that builds them.
//!
//! Transfers go to their own endpoint and carry no `tipo`; every other kind
//! is posted to the movement endpoint with exactly one deposit field.

use serde::{Deserialize, Serialize};

use crate::{
    models::GameDraft,
    validation::{self, FormError},
};

/// Kind of stock change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementKind {
    /// Goods received into a deposit.
    #[default]
    Entrada,
    /// Goods leaving a deposit.
    Saida,
    /// Upward stock correction.
    AjustePositivo,
    /// Downward stock correction.
    AjusteNegativo,
    /// Move stock between two deposits.
    Transferencia,
}

impl MovementKind {
    /// Every kind, in the order the form cycles through them.
    pub const ALL: [MovementKind; 5] = [
        MovementKind::Entrada,
        MovementKind::Saida,
        MovementKind::Transferencia,
        MovementKind::AjustePositivo,
        MovementKind::AjusteNegativo,
    ];

    /// Display label.
    pub fn label(self) -> &'static str {
        match self {
            MovementKind::Entrada => "Inbound",
            MovementKind::Saida => "Outbound",
            MovementKind::AjustePositivo => "Positive adjustment",
            MovementKind::AjusteNegativo => "Negative adjustment",
            MovementKind::Transferencia => "Transfer",
        }
    }

    /// Whether the form must ask for an origin deposit.
    pub fn needs_origin(self) -> bool {
        matches!(
            self,
            MovementKind::Saida | MovementKind::AjusteNegativo | MovementKind::Transferencia
        )
    }

    /// Whether the form must ask for a destination deposit.
    pub fn needs_destination(self) -> bool {
        matches!(
            self,
            MovementKind::Entrada | MovementKind::AjustePositivo | MovementKind::Transferencia
        )
    }

    /// Next kind in [`MovementKind::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|kind| *kind == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

/// Body of `POST /estoque/movimentar`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementRequest {
    /// Never [`MovementKind::Transferencia`].
    pub tipo: MovementKind,
    #[allow(missing_docs)]
    pub jogo_id: i64,
    #[allow(missing_docs)]
    pub plataforma_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub deposito_origem_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub deposito_destino_id: Option<i64>,
    #[allow(missing_docs)]
    pub quantidade: i64,
    /// Unit price at the moment of the movement.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preco_unitario_momento: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[allow(missing_docs)]
    pub observacao: Option<String>,
}

/// Body of `POST /estoque/transferir`.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockTransferRequest {
    pub jogo_id: i64,
    pub plataforma_id: i64,
    pub deposito_origem_id: i64,
    pub deposito_destino_id: i64,
    pub quantidade: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacao: Option<String>,
}

/// A validated request, already routed to its endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum MovementRequest {
    /// Inbound, outbound or adjustment.
    Movement(StockMovementRequest),
    /// Transfer between deposits.
    Transfer(StockTransferRequest),
}

impl MovementRequest {
    /// Kind of the underlying request.
    pub fn kind(&self) -> MovementKind {
        match self {
            MovementRequest::Movement(request) => request.tipo,
            MovementRequest::Transfer(_) => MovementKind::Transferencia,
        }
    }
}

/// Raw inputs of the movement form.
///
/// Ids are kept as text exactly as selected or typed.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementForm {
    #[allow(missing_docs)]
    pub kind: MovementKind,
    #[allow(missing_docs)]
    pub game_id: String,
    #[allow(missing_docs)]
    pub platform_id: String,
    #[allow(missing_docs)]
    pub origin_deposit_id: String,
    #[allow(missing_docs)]
    pub destination_deposit_id: String,
    #[allow(missing_docs)]
    pub quantity: String,
    #[allow(missing_docs)]
    pub unit_price: String,
    #[allow(missing_docs)]
    pub note: String,
}

impl Default for MovementForm {
    fn default() -> Self {
        Self {
            kind: MovementKind::Entrada,
            game_id: String::new(),
            platform_id: String::new(),
            origin_deposit_id: String::new(),
            destination_deposit_id: String::new(),
            quantity: "1".to_string(),
            unit_price: String::new(),
            note: String::new(),
        }
    }
}

impl MovementForm {
    /// Check required fields and build the request for the chosen kind.
    pub fn validate(&self) -> Result<MovementRequest, FormError> {
        let game_id = validation::required_id("Game", &self.game_id)?;
        let platform_id = validation::required_id("Platform", &self.platform_id)?;
        let quantity: i64 = validation::required("Quantity", &self.quantity)?
            .parse()
            .map_err(|_| FormError::NotANumber("Quantity"))?;
        if quantity < 1 {
            return Err(FormError::BelowMinimum {
                field: "Quantity",
                min: 1,
            });
        }
        let origin = validation::optional_id("Origin deposit", &self.origin_deposit_id)?;
        let destination =
            validation::optional_id("Destination deposit", &self.destination_deposit_id)?;
        let note = validation::optional(&self.note);

        if self.kind == MovementKind::Transferencia {
            let origin = origin.ok_or(FormError::Missing("Origin deposit"))?;
            let destination = destination.ok_or(FormError::Missing("Destination deposit"))?;
            return Ok(MovementRequest::Transfer(StockTransferRequest {
                jogo_id: game_id,
                plataforma_id: platform_id,
                deposito_origem_id: origin,
                deposito_destino_id: destination,
                quantidade: quantity,
                observacao: note,
            }));
        }

        let unit_price = validation::optional_decimal("Unit price", &self.unit_price)?;

        let (origin, destination) = if self.kind.needs_origin() {
            (Some(origin.ok_or(FormError::Missing("Origin deposit"))?), None)
        } else {
            (None, Some(destination.ok_or(FormError::Missing("Destination deposit"))?))
        };

        Ok(MovementRequest::Movement(StockMovementRequest {
            tipo: self.kind,
            jogo_id: game_id,
            plataforma_id: platform_id,
            deposito_origem_id: origin,
            deposito_destino_id: destination,
            quantidade: quantity,
            preco_unitario_momento: unit_price,
            observacao: note,
        }))
    }
}

impl GameDraft {
    /// Check the catalog's required fields and return a trimmed copy.
    pub fn validate(&self) -> Result<GameDraft, FormError> {
        let title = validation::required("Title", &self.title)?.to_string();
        let genre = validation::required("Genre", &self.genre)?.to_string();
        let developer = validation::required("Developer", &self.developer)?.to_string();
        let publisher = validation::required("Publisher", &self.publisher)?.to_string();
        if !self.suggested_price.is_finite() || self.suggested_price < 0.0 {
            return Err(FormError::BelowMinimum {
                field: "Suggested price",
                min: 0,
            });
        }
        Ok(GameDraft {
            title,
            description: self.description.as_deref().and_then(validation::optional),
            suggested_price: self.suggested_price,
            genre,
            developer,
            publisher,
            cover_url: self.cover_url.as_deref().and_then(validation::optional),
        })
    }
}
