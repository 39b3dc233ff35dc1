use crate::format::{format_day, format_month};
use crate::metrics::{average_rounded, derive_metrics, max_quantity};
use crate::models::{
    DashboardView, NormalizedMonthlySales, NormalizedProduct, Normalized, ProductSeries,
    RankedList, RankedRow, SeriesPoint,
};
use crate::payload::{PurchaseEntry, RawMonthlySales, RawProduct, SalePoint, StatisticsPayload};

/// Shown when a product or purchase row has no name.
pub const MISSING_NAME: &str = "—";

pub fn normalize(raw: Option<&StatisticsPayload>) -> Normalized {
    let Some(raw) = raw else {
        return Normalized::NoData;
    };

    let products: Vec<NormalizedProduct> = raw
        .productos_mas_vendidos
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(normalize_product)
        .collect();

    let monthly: Vec<NormalizedMonthlySales> = raw
        .ventas_por_mes
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(normalize_month)
        .collect();

    let metrics = derive_metrics(&monthly, &products);

    Normalized::View(DashboardView {
        total_sales: raw.total_ventas.unwrap_or(0.0),
        products,
        monthly,
        average_monthly: metrics.average_monthly,
        max_product_quantity: metrics.max_product_quantity,
    })
}

fn normalize_product(raw: &RawProduct) -> NormalizedProduct {
    NormalizedProduct {
        name: name_or_placeholder(raw.nombre.as_deref()),
        quantity: to_quantity(raw.cantidad),
        brand: raw.marca.clone().unwrap_or_default(),
        image_ref: raw.img.clone().unwrap_or_default(),
    }
}

fn normalize_month(raw: &RawMonthlySales) -> NormalizedMonthlySales {
    NormalizedMonthlySales {
        month_label: format_month(raw.mes.as_deref().unwrap_or_default()),
        amount: raw.total_ventas.unwrap_or(0.0).max(0.0),
    }
}

pub fn normalize_purchases(rows: &[PurchaseEntry]) -> RankedList {
    let rows: Vec<RankedRow> = rows
        .iter()
        .map(|row| RankedRow {
            name: name_or_placeholder(row.nombre.as_deref()),
            quantity: to_quantity(row.cantidad),
        })
        .collect();
    let max_quantity = max_quantity(rows.iter().map(|row| row.quantity));

    RankedList { rows, max_quantity }
}

pub fn normalize_product_sales(product_id: &str, rows: &[SalePoint]) -> ProductSeries {
    let points: Vec<SeriesPoint> = rows
        .iter()
        .map(|row| SeriesPoint {
            label: format_day(row.fecha.as_deref().unwrap_or_default()),
            quantity: to_quantity(row.cantidad),
        })
        .collect();

    let total_quantity = points
        .iter()
        .fold(0u64, |sum, point| sum.saturating_add(point.quantity));
    let average_quantity = average_rounded(points.iter().map(|point| point.quantity as f64));

    ProductSeries {
        product_id: product_id.to_string(),
        points,
        total_quantity,
        average_quantity,
    }
}

fn name_or_placeholder(name: Option<&str>) -> String {
    name.unwrap_or(MISSING_NAME).to_string()
}

/// Non-negative whole units; fractions are truncated.
fn to_quantity(raw: Option<f64>) -> u64 {
    match raw {
        Some(value) if value.is_finite() && value > 0.0 => value.trunc() as u64,
        _ => 0,
    }
}
