//! Remote client - typed wrapper over the record JSON API

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::config::Config;
use crate::constants::{PATH_CREATE, PATH_DELETE, PATH_ITEMS, PATH_LIST, PATH_UPDATE};
use crate::error::{ApiError, Operation};
use crate::models::{ApiDialect, Record, RecordFields};

/// One request per call, no caching, no retries
#[derive(Clone, Debug)]
pub struct RemoteClient {
    http: reqwest::Client,
    config: Config,
}

impl RemoteClient {
    pub fn new(config: &Config) -> Self {
        RemoteClient {
            http: create_client(Duration::from_secs(config.timeout_secs)),
            config: config.clone(),
        }
    }

    /// Client against an arbitrary server root with the default timeout
    pub fn with_base_url(base_url: impl Into<String>, dialect: ApiDialect) -> Self {
        let config = Config {
            base_url: base_url.into(),
            dialect,
            ..Config::default()
        };
        Self::new(&config)
    }

    pub fn dialect(&self) -> ApiDialect {
        self.config.dialect
    }

    fn url(&self, path: &str) -> String {
        self.config.url(path)
    }

    fn item_url(&self, id: i64) -> String {
        self.url(&format!("{}/{}", PATH_ITEMS, id))
    }

    /// `GET /api/list`
    pub async fn list(&self) -> Result<Vec<Record>, ApiError> {
        let op = Operation::List;
        let resp = send(op, self.http.get(self.url(PATH_LIST))).await?;
        decode(op, resp).await
    }

    /// `GET /api/items/{id}`
    pub async fn get(&self, id: i64) -> Result<Record, ApiError> {
        let op = Operation::Get;
        let resp = send(op, self.http.get(self.item_url(id))).await?;
        decode(op, resp).await
    }

    /// `POST /api/create`; returns the record if the server echoes one
    pub async fn create(&self, fields: &RecordFields) -> Result<Option<Record>, ApiError> {
        let op = Operation::Create;
        let body = fields.to_payload(self.dialect());
        let resp = send(op, self.http.post(self.url(PATH_CREATE)).json(&body)).await?;
        echoed_record(op, resp).await
    }

    /// `PUT /api/items/{id}` (items) or `POST /api/update` with the id in the body (todos)
    pub async fn update(&self, id: i64, fields: &RecordFields) -> Result<Option<Record>, ApiError> {
        let op = Operation::Update;
        let mut body = fields.to_payload(self.dialect());

        let builder = match self.dialect() {
            ApiDialect::Items => self.http.put(self.item_url(id)),
            ApiDialect::Todos => {
                if let Value::Object(map) = &mut body {
                    map.insert("id".into(), json!(id));
                }
                self.http.post(self.url(PATH_UPDATE))
            }
        };

        let resp = send(op, builder.json(&body)).await?;
        echoed_record(op, resp).await
    }

    /// `POST /api/delete` with `{"id": id}`
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let op = Operation::Delete;
        let body = json!({ "id": id });
        send(op, self.http.post(self.url(PATH_DELETE)).json(&body)).await?;
        Ok(())
    }
}

/// Send a request, turning transport errors and non-2xx statuses into `ApiError`
async fn send(op: Operation, builder: reqwest::RequestBuilder) -> Result<reqwest::Response, ApiError> {
    let start = Instant::now();
    let resp = builder
        .send()
        .await
        .map_err(|source| ApiError::Transport { operation: op, source })?;

    let status = resp.status();
    tracing::info!(op = %op, status = status.as_u16(), elapsed_ms = start.elapsed().as_millis() as u64, "Request completed");

    if !status.is_success() {
        return Err(ApiError::RequestFailed {
            operation: op,
            status: status.as_u16(),
        });
    }
    Ok(resp)
}

async fn read_body(op: Operation, resp: reqwest::Response) -> Result<String, ApiError> {
    resp.text()
        .await
        .map_err(|source| ApiError::Transport { operation: op, source })
}

async fn decode<T: DeserializeOwned>(op: Operation, resp: reqwest::Response) -> Result<T, ApiError> {
    let body = read_body(op, resp).await?;
    serde_json::from_str(&body).map_err(|e| ApiError::Decode {
        operation: op,
        message: e.to_string(),
    })
}

/// Servers either echo the stored record or answer with an acknowledgement
/// such as `{"message": "..."}`; only the former yields a record.
async fn echoed_record(op: Operation, resp: reqwest::Response) -> Result<Option<Record>, ApiError> {
    let body = read_body(op, resp).await?;
    if body.trim().is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(&body).map_err(|e| ApiError::Decode {
        operation: op,
        message: e.to_string(),
    })?;

    let has_id = value.get("id").map(|id| !id.is_null()).unwrap_or(false);
    if !has_id {
        return Ok(None);
    }

    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| ApiError::Decode {
            operation: op,
            message: e.to_string(),
        })
}

/// Create an HTTP client with the given timeout
pub fn create_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
