use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NormalizedProduct {
    pub name: String,
    pub quantity: u64,
    pub brand: String,
    pub image_ref: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NormalizedMonthlySales {
    pub month_label: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DerivedMetrics {
    pub average_monthly: f64,
    /// Always at least 1 so it can be used as a bar-width denominator.
    pub max_product_quantity: u64,
}

/// Everything the statistics page needs, rebuilt from scratch on every fetch.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardView {
    pub total_sales: f64,
    pub products: Vec<NormalizedProduct>,
    pub monthly: Vec<NormalizedMonthlySales>,
    pub average_monthly: f64,
    pub max_product_quantity: u64,
}

/// Output of the statistics adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalized {
    NoData,
    View(DashboardView),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedRow {
    pub name: String,
    pub quantity: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedList {
    pub rows: Vec<RankedRow>,
    pub max_quantity: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SeriesPoint {
    pub label: String,
    pub quantity: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ProductSeries {
    pub product_id: String,
    pub points: Vec<SeriesPoint>,
    pub total_quantity: u64,
    pub average_quantity: f64,
}
