use crate::models::{DerivedMetrics, NormalizedMonthlySales, NormalizedProduct};

pub fn derive_metrics(
    monthly: &[NormalizedMonthlySales],
    products: &[NormalizedProduct],
) -> DerivedMetrics {
    DerivedMetrics {
        average_monthly: average_rounded(monthly.iter().map(|month| month.amount)),
        max_product_quantity: max_quantity(products.iter().map(|product| product.quantity)),
    }
}

/// Mean of `values` rounded to the nearest integer, 0 for an empty input.
pub fn average_rounded(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0u64), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        return 0.0;
    }
    (sum / count as f64).round()
}

/// Largest quantity, floored at 1.
pub fn max_quantity(quantities: impl IntoIterator<Item = u64>) -> u64 {
    quantities.into_iter().max().unwrap_or(0).max(1)
}

/// Proportional bar width in percent, capped at 100 and kept to two decimals.
pub fn bar_width(quantity: u64, max_quantity: u64) -> f64 {
    let denom = max_quantity.max(1) as f64;
    let percent = (quantity as f64 / denom * 100.0).min(100.0);
    (percent * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(quantity: u64) -> NormalizedProduct {
        NormalizedProduct {
            name: format!("p{quantity}"),
            quantity,
            brand: String::new(),
            image_ref: String::new(),
        }
    }

    fn month(amount: f64) -> NormalizedMonthlySales {
        NormalizedMonthlySales {
            month_label: String::new(),
            amount,
        }
    }

    #[test]
    fn empty_inputs_avoid_division_by_zero() {
        let metrics = derive_metrics(&[], &[]);
        assert_eq!(metrics.average_monthly, 0.0);
        assert_eq!(metrics.max_product_quantity, 1);
    }

    #[test]
    fn average_of_monthly_amounts() {
        let monthly = [month(100.0), month(200.0), month(300.0)];
        assert_eq!(derive_metrics(&monthly, &[]).average_monthly, 200.0);
    }

    #[test]
    fn average_rounds_to_nearest_integer() {
        assert_eq!(average_rounded([1.0, 2.0]), 2.0);
        assert_eq!(average_rounded([10.0, 10.0, 11.0]), 10.0);
    }

    #[test]
    fn max_quantity_is_floored_at_one() {
        let products = [product(0), product(0)];
        assert_eq!(derive_metrics(&[], &products).max_product_quantity, 1);

        let products = [product(5), product(10), product(2)];
        assert_eq!(derive_metrics(&[], &products).max_product_quantity, 10);
    }

    #[test]
    fn bar_widths_are_proportional_to_the_max() {
        let widths: Vec<f64> = [5, 10, 2].iter().map(|q| bar_width(*q, 10)).collect();
        assert_eq!(widths, vec![50.0, 100.0, 20.0]);
    }

    #[test]
    fn bar_width_keeps_two_decimals_and_caps_at_100() {
        assert_eq!(bar_width(1, 3), 33.33);
        assert_eq!(bar_width(2, 3), 66.67);
        assert_eq!(bar_width(12, 10), 100.0);
        assert_eq!(bar_width(0, 0), 0.0);
    }
}
