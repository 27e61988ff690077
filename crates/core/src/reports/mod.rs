//! Aggregations over fetched inventory used by the dashboard and reports.
//!
//! Everything here is pure: callers pass slices taken from an
//! [`InventorySnapshot`](crate::inventory::InventorySnapshot).

use std::{cmp::Ordering, collections::BTreeMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Game, InventoryItem};

mod export;

pub use export::{ExportEntry, ReportExporter};

/// Items at or below this quantity count as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 2;
/// Recent rows shown on the dashboard.
pub const DASHBOARD_RECENT: usize = 5;
/// Recent rows included in a report.
pub const REPORT_RECENT: usize = 20;
/// Entries in the top games ranking.
pub const TOP_GAMES: usize = 10;

/// Totals over a set of stock rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InventorySummary {
    /// Number of stock rows.
    pub lines: usize,
    /// Sum of quantities.
    pub total_units: i64,
    /// Sum of quantity times unit price.
    pub total_value: f64,
    /// Rows at or below the low stock threshold.
    pub low_stock_count: usize,
    /// `total_value / total_units`, zero when there are no units.
    pub average_unit_value: f64,
}

impl InventorySummary {
    /// Summarise `items`.
    pub fn compute(items: &[InventoryItem], threshold: i64) -> Self {
        let total_units: i64 = items.iter().map(|item| item.quantity).sum();
        let total_value: f64 = items.iter().map(InventoryItem::stock_value).sum();
        let low_stock_count = items
            .iter()
            .filter(|item| is_low_stock(item, threshold))
            .count();
        let average_unit_value = if total_units > 0 {
            total_value / total_units as f64
        } else {
            0.0
        };
        Self {
            lines: items.len(),
            total_units,
            total_value,
            low_stock_count,
            average_unit_value,
        }
    }
}

/// Whether `item` is at or below `threshold`.
pub fn is_low_stock(item: &InventoryItem, threshold: i64) -> bool {
    item.quantity <= threshold
}

/// Rows at or below `threshold`, in their original order.
pub fn low_stock_items(items: &[InventoryItem], threshold: i64) -> Vec<InventoryItem> {
    items
        .iter()
        .filter(|item| is_low_stock(item, threshold))
        .cloned()
        .collect()
}

/// The `limit` rows with the highest ids.
pub fn recent_items(items: &[InventoryItem], limit: usize) -> Vec<InventoryItem> {
    let mut recent = items.to_vec();
    recent.sort_by(|a, b| b.id.cmp(&a.id));
    recent.truncate(limit);
    recent
}

/// One platform's share of a total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformShare {
    /// Platform name, `N/A` when the row had none.
    pub platform: String,
    /// Units or money, depending on the breakdown.
    pub amount: f64,
    /// Share of the total in percent.
    pub percentage: f64,
}

/// Units held per platform.
pub fn platform_distribution(items: &[InventoryItem]) -> Vec<PlatformShare> {
    shares(items, |item| item.quantity as f64)
}

/// Stock value held per platform.
pub fn value_by_platform(items: &[InventoryItem]) -> Vec<PlatformShare> {
    shares(items, InventoryItem::stock_value)
}

fn shares(items: &[InventoryItem], amount: impl Fn(&InventoryItem) -> f64) -> Vec<PlatformShare> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for item in items {
        *totals.entry(item.platform_label()).or_default() += amount(item);
    }
    let total: f64 = totals.values().sum();

    let mut shares: Vec<PlatformShare> = totals
        .into_iter()
        .map(|(platform, amount)| PlatformShare {
            platform: platform.to_string(),
            amount,
            percentage: percentage(amount, total),
        })
        .collect();
    shares.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.platform.cmp(&b.platform))
    });
    shares
}

fn percentage(part: f64, total: f64) -> f64 {
    if total > 0.0 {
        part / total * 100.0
    } else {
        0.0
    }
}

/// Stock held for one game across platforms and deposits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameValue {
    #[allow(missing_docs)]
    pub game_id: i64,
    #[allow(missing_docs)]
    pub title: String,
    #[allow(missing_docs)]
    pub units: i64,
    #[allow(missing_docs)]
    pub value: f64,
}

/// The `limit` games holding the most stock value.
///
/// Titles come from the catalog, falling back to the title on the stock row.
pub fn top_games_by_value(
    items: &[InventoryItem],
    games: &[Game],
    limit: usize,
) -> Vec<GameValue> {
    let mut grouped: BTreeMap<i64, GameValue> = BTreeMap::new();
    for item in items {
        let entry = grouped.entry(item.game_id).or_insert_with(|| GameValue {
            game_id: item.game_id,
            title: games
                .iter()
                .find(|game| game.id == item.game_id)
                .map(|game| game.title.clone())
                .unwrap_or_else(|| item.title_label().to_string()),
            units: 0,
            value: 0.0,
        });
        entry.units += item.quantity;
        entry.value += item.stock_value();
    }

    let mut ranked: Vec<GameValue> = grouped.into_values().collect();
    ranked.sort_by(|a, b| match b.value.total_cmp(&a.value) {
        Ordering::Equal => a.title.cmp(&b.title),
        other => other,
    });
    ranked.truncate(limit);
    ranked
}

/// Figures shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    #[allow(missing_docs)]
    pub summary: InventorySummary,
    #[allow(missing_docs)]
    pub low_stock: Vec<InventoryItem>,
    #[allow(missing_docs)]
    pub recent: Vec<InventoryItem>,
    #[allow(missing_docs)]
    pub platforms: Vec<PlatformShare>,
}

impl DashboardStats {
    #[allow(missing_docs)]
    pub fn compute(items: &[InventoryItem], threshold: i64) -> Self {
        Self {
            summary: InventorySummary::compute(items, threshold),
            low_stock: low_stock_items(items, threshold),
            recent: recent_items(items, DASHBOARD_RECENT),
            platforms: platform_distribution(items),
        }
    }
}

/// Period a report is labelled with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportPeriod {
    /// Last 7 days.
    Week,
    /// Last 30 days.
    #[default]
    Month,
    /// Last 90 days.
    Quarter,
    /// Last 365 days.
    Year,
}

impl ReportPeriod {
    /// Every period, shortest first.
    pub const ALL: [ReportPeriod; 4] = [
        ReportPeriod::Week,
        ReportPeriod::Month,
        ReportPeriod::Quarter,
        ReportPeriod::Year,
    ];

    /// Length in days.
    pub fn days(self) -> u32 {
        match self {
            ReportPeriod::Week => 7,
            ReportPeriod::Month => 30,
            ReportPeriod::Quarter => 90,
            ReportPeriod::Year => 365,
        }
    }

    /// Selector label.
    pub fn label(self) -> &'static str {
        match self {
            ReportPeriod::Week => "Last 7 days",
            ReportPeriod::Month => "Last 30 days",
            ReportPeriod::Quarter => "Last 90 days",
            ReportPeriod::Year => "Last year",
        }
    }

    /// Next longer period, wrapping to the shortest.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }

    /// Next shorter period, wrapping to the longest.
    pub fn previous(self) -> Self {
        let index = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(index + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Everything shown on the reports screen, ready to export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryReport {
    #[allow(missing_docs)]
    pub generated_at: DateTime<Utc>,
    #[allow(missing_docs)]
    pub period: ReportPeriod,
    #[allow(missing_docs)]
    pub summary: InventorySummary,
    /// Units per platform.
    pub platform_distribution: Vec<PlatformShare>,
    /// Value per platform.
    pub value_by_platform: Vec<PlatformShare>,
    #[allow(missing_docs)]
    pub top_games: Vec<GameValue>,
    #[allow(missing_docs)]
    pub low_stock: Vec<InventoryItem>,
    /// Most recent rows first.
    pub recent: Vec<InventoryItem>,
}

impl InventoryReport {
    /// Assemble a report stamped with the current time.
    pub fn build(
        items: &[InventoryItem],
        games: &[Game],
        period: ReportPeriod,
        threshold: i64,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            period,
            summary: InventorySummary::compute(items, threshold),
            platform_distribution: platform_distribution(items),
            value_by_platform: value_by_platform(items),
            top_games: top_games_by_value(items, games, TOP_GAMES),
            low_stock: low_stock_items(items, threshold),
            recent: recent_items(items, REPORT_RECENT),
        }
    }
}

/// Render an amount of money, e.g. `R$ 1234.50`.
pub fn format_money(value: f64) -> String {
    format!("R$ {value:.2}")
}
