use crate::config::DashboardConfig;
use crate::payload::{decode_rows, PurchaseEntry, SalePoint, StatisticsPayload};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid backend base url {base:?}: {reason}")]
    InvalidBase { base: String, reason: String },
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("unexpected body from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// The three reads the dashboard makes against the sales backend.
#[async_trait]
pub trait SalesBackend: Send + Sync {
    /// `Ok(None)` when the backend answers `null`.
    async fn statistics(&self) -> Result<Option<StatisticsPayload>, ClientError>;

    async fn purchases(&self) -> Result<Vec<PurchaseEntry>, ClientError>;

    async fn product_sales(&self, product_id: &str) -> Result<Vec<SalePoint>, ClientError>;
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &DashboardConfig) -> Result<Self, ClientError> {
        let base = Url::parse(&config.backend_base).map_err(|err| ClientError::InvalidBase {
            base: config.backend_base.clone(),
            reason: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ClientError::InvalidBase {
                base: config.backend_base.clone(),
                reason: "url cannot carry a path".to_string(),
            });
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|source| ClientError::Transport {
            url: config.backend_base.clone(),
            source,
        })?;

        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // `new` rejects bases that cannot carry a path.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json(&self, url: Url) -> Result<Value, ClientError> {
        debug!(%url, "GET");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport {
                url: url.to_string(),
                source,
            })?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(|err| ClientError::Decode {
            url: url.to_string(),
            reason: err.to_string(),
        })
    }
}

#[async_trait]
impl SalesBackend for ApiClient {
    async fn statistics(&self) -> Result<Option<StatisticsPayload>, ClientError> {
        let url = self.endpoint(&["zapatos", "estadisticas"]);
        let body = self.get_json(url.clone()).await?;
        decode_statistics(body).map_err(|reason| ClientError::Decode {
            url: url.to_string(),
            reason,
        })
    }

    async fn purchases(&self) -> Result<Vec<PurchaseEntry>, ClientError> {
        let url = self.endpoint(&["zapatos", "getTodasCompras"]);
        let body = self.get_json(url.clone()).await?;
        decode_list(body).map_err(|reason| ClientError::Decode {
            url: url.to_string(),
            reason,
        })
    }

    async fn product_sales(&self, product_id: &str) -> Result<Vec<SalePoint>, ClientError> {
        let url = self.endpoint(&["ventas", product_id]);
        let body = self.get_json(url.clone()).await?;
        decode_list(body).map_err(|reason| ClientError::Decode {
            url: url.to_string(),
            reason,
        })
    }
}

/// Accepts an object or `null`; anything else is a shape error.
pub fn decode_statistics(body: Value) -> Result<Option<StatisticsPayload>, String> {
    match body {
        Value::Null => Ok(None),
        Value::Object(_) => serde_json::from_value(body)
            .map(Some)
            .map_err(|err| err.to_string()),
        other => Err(format!("expected an object, got {}", kind(&other))),
    }
}

/// Accepts an array or `null` (treated as no rows).
pub fn decode_list<T>(body: Value) -> Result<Vec<T>, String>
where
    T: serde::de::DeserializeOwned + Default,
{
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(decode_rows(items)),
        other => Err(format!("expected an array, got {}", kind(&other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&DashboardConfig {
            backend_base: base.to_string(),
            ..DashboardConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn endpoints_are_joined_under_the_base() {
        let api = client("http://backend.test");
        assert_eq!(
            api.endpoint(&["zapatos", "estadisticas"]).as_str(),
            "http://backend.test/zapatos/estadisticas"
        );

        let api = client("http://backend.test/api");
        assert_eq!(
            api.endpoint(&["zapatos", "getTodasCompras"]).as_str(),
            "http://backend.test/api/zapatos/getTodasCompras"
        );
    }

    #[test]
    fn product_ids_are_escaped() {
        let api = client("http://backend.test");
        assert_eq!(
            api.endpoint(&["ventas", "a/b c"]).as_str(),
            "http://backend.test/ventas/a%2Fb%20c"
        );
    }

    #[test]
    fn invalid_base_is_rejected() {
        let err = ApiClient::new(&DashboardConfig {
            backend_base: "not a url".to_string(),
            ..DashboardConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::InvalidBase { .. }));
    }

    #[test]
    fn statistics_shape() {
        assert_eq!(decode_statistics(Value::Null).unwrap(), None);
        assert!(decode_statistics(json!({})).unwrap().is_some());
        assert!(decode_statistics(json!([1, 2])).is_err());
        assert!(decode_statistics(json!("oops")).is_err());
    }

    #[test]
    fn list_shape() {
        let rows: Vec<PurchaseEntry> = decode_list(json!([{ "nombre": "Bota", "cantidad": 2 }])).unwrap();
        assert_eq!(rows.len(), 1);

        let rows: Vec<PurchaseEntry> = decode_list(Value::Null).unwrap();
        assert!(rows.is_empty());

        assert!(decode_list::<SalePoint>(json!({ "fecha": "2025-01-01" })).is_err());
    }
}
