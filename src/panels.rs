use crate::adapter::{normalize, normalize_product_sales, normalize_purchases};
use crate::client::SalesBackend;
use crate::models::{DashboardView, Normalized, ProductSeries, RankedList};
use serde::Serialize;
use std::fmt;
use tracing::{error, warn};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataSource {
    Statistics,
    Purchases,
    ProductSales(String),
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Statistics => f.write_str("estadisticas"),
            DataSource::Purchases => f.write_str("compras"),
            DataSource::ProductSales(id) => write!(f, "ventas/{id}"),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", content = "view", rename_all = "snake_case")]
pub enum PanelData {
    Statistics(DashboardView),
    Purchases(RankedList),
    ProductSales(ProductSeries),
}

/// `Loading` until the single fetch settles; the other states stay put until
/// an explicit refresh.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum FetchState {
    Loading,
    Loaded(PanelData),
    Empty,
    Failed,
}

impl FetchState {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }
}

/// Runs one fetch for `source` and maps the outcome onto a settled state.
///
/// Backend failures are logged here and never reach the page beyond
/// `FetchState::Failed`.
pub async fn load_panel(backend: &dyn SalesBackend, source: &DataSource) -> FetchState {
    let state = match source {
        DataSource::Statistics => backend.statistics().await.map(|payload| {
            match normalize(payload.as_ref()) {
                Normalized::View(view) => FetchState::Loaded(PanelData::Statistics(view)),
                Normalized::NoData => FetchState::Empty,
            }
        }),
        DataSource::Purchases => backend.purchases().await.map(|rows| {
            if rows.is_empty() {
                FetchState::Empty
            } else {
                FetchState::Loaded(PanelData::Purchases(normalize_purchases(&rows)))
            }
        }),
        DataSource::ProductSales(id) => backend.product_sales(id).await.map(|rows| {
            if rows.is_empty() {
                FetchState::Empty
            } else {
                FetchState::Loaded(PanelData::ProductSales(normalize_product_sales(id, &rows)))
            }
        }),
    };

    match state {
        Ok(FetchState::Empty) => {
            warn!(%source, "backend returned no records");
            FetchState::Empty
        }
        Ok(state) => state,
        Err(err) => {
            error!(%source, error = %err, "failed to load panel data");
            FetchState::Failed
        }
    }
}
