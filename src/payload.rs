use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct StatisticsPayload {
    #[serde(rename = "totalVentas", default, deserialize_with = "lenient_number")]
    pub total_ventas: Option<f64>,
    #[serde(
        rename = "productosMasVendidos",
        default,
        deserialize_with = "lenient_list"
    )]
    pub productos_mas_vendidos: Option<Vec<RawProduct>>,
    #[serde(rename = "ventasPorMes", default, deserialize_with = "lenient_list")]
    pub ventas_por_mes: Option<Vec<RawMonthlySales>>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawProduct {
    #[serde(default, deserialize_with = "lenient_text")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cantidad: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub marca: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub img: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct RawMonthlySales {
    #[serde(default, deserialize_with = "lenient_text")]
    pub mes: Option<String>,
    #[serde(rename = "totalVentas", default, deserialize_with = "lenient_number")]
    pub total_ventas: Option<f64>,
}

/// One row of `/zapatos/getTodasCompras`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PurchaseEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cantidad: Option<f64>,
}

/// One row of `/ventas/{id}`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SalePoint {
    #[serde(default, deserialize_with = "lenient_text")]
    pub fecha: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub cantidad: Option<f64>,
}

/// Decodes a list body where individual rows may be malformed.
///
/// Non-object rows are kept as all-absent entries so the row count matches
/// what the backend sent.
pub fn decode_rows<T>(values: Vec<Value>) -> Vec<T>
where
    T: DeserializeOwned + Default,
{
    values
        .into_iter()
        .map(|value| match value {
            Value::Object(_) => serde_json::from_value(value).unwrap_or_default(),
            _ => T::default(),
        })
        .collect()
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    })
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => Some(decode_rows(items)),
        _ => None,
    })
}

/// Reads a finite number out of a JSON number or a numeric string.
pub fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn statistics_decodes_well_formed_body() {
        let payload: StatisticsPayload = serde_json::from_value(json!({
            "totalVentas": 1500000,
            "productosMasVendidos": [{ "nombre": "Bota X", "cantidad": 40, "marca": "Acme" }],
            "ventasPorMes": [{ "mes": "2025-1", "totalVentas": 500000 }]
        }))
        .unwrap();

        assert_eq!(payload.total_ventas, Some(1_500_000.0));
        let products = payload.productos_mas_vendidos.unwrap();
        assert_eq!(products[0].nombre.as_deref(), Some("Bota X"));
        assert_eq!(products[0].marca.as_deref(), Some("Acme"));
        assert_eq!(products[0].img, None);
        assert_eq!(payload.ventas_por_mes.unwrap()[0].mes.as_deref(), Some("2025-1"));
    }

    #[test]
    fn malformed_fields_become_absent() {
        let payload: StatisticsPayload = serde_json::from_value(json!({
            "totalVentas": "not a number",
            "productosMasVendidos": { "oops": true },
            "ventasPorMes": "2025-1"
        }))
        .unwrap();

        assert_eq!(payload, StatisticsPayload::default());
    }

    #[test]
    fn numeric_strings_and_numeric_names_are_accepted() {
        let row: PurchaseEntry =
            serde_json::from_value(json!({ "nombre": 77, "cantidad": " 12 " })).unwrap();
        assert_eq!(row.nombre.as_deref(), Some("77"));
        assert_eq!(row.cantidad, Some(12.0));
    }

    #[test]
    fn nested_values_are_not_names() {
        let row: RawProduct =
            serde_json::from_value(json!({ "nombre": { "a": 1 }, "marca": ["x"], "img": true })).unwrap();
        assert_eq!(row.nombre, None);
        assert_eq!(row.marca, None);
        assert_eq!(row.img.as_deref(), Some("true"));
    }

    #[test]
    fn non_object_rows_keep_their_slot() {
        let payload: StatisticsPayload = serde_json::from_value(json!({
            "productosMasVendidos": [null, 3, { "nombre": "Sandalia" }]
        }))
        .unwrap();

        let products = payload.productos_mas_vendidos.unwrap();
        assert_eq!(products.len(), 3);
        assert_eq!(products[0], RawProduct::default());
        assert_eq!(products[2].nombre.as_deref(), Some("Sandalia"));
    }
}
