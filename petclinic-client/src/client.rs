//! The HTTP choke point.
//!
//! Builds absolute URLs, attaches JSON headers and bodies, decodes the
//! response body and classifies failures.

use crate::config::ClientConfig;
use crate::error::{ApiError, ClientError, ClientResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

const JSON_MIME: &str = "application/json";

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `204 No Content`, or a JSON response with an empty body.
    Empty,
    /// The body was declared as JSON and parsed.
    Json(Value),
    /// Any other content type, as text.
    Text(String),
}

impl Payload {
    /// Collapses the payload into a JSON value: `Empty` is `null`, text is a
    /// JSON string.
    pub fn into_value(self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Json(value) => value,
            Self::Text(text) => Value::String(text),
        }
    }

    /// Decodes the payload into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> ClientResult<T> {
        Ok(serde_json::from_value(self.into_value())?)
    }
}

/// Extra per-request settings.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Headers sent as-is. An `Accept` header here replaces the JSON default.
    pub headers: HeaderMap,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header, replacing any previous value for the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// JSON client bound to one base URL.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for `config.base_url`. A single trailing slash on the
    /// base is dropped so joined URLs never contain `//`.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        let base_url = config
            .base_url
            .strip_suffix('/')
            .unwrap_or(&config.base_url)
            .to_string();

        Ok(Self { client, base_url })
    }

    /// The base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolves `path` against the base URL. Paths that already carry an
    /// `http:`/`https:` scheme are returned unchanged.
    pub fn resolve_url(&self, path: &str) -> String {
        if has_http_scheme(path) {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(Method::GET, path, None::<&()>, RequestOptions::default())
            .await
    }

    pub async fn post<T, D>(&self, path: &str, data: &D) -> ClientResult<T>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(data), RequestOptions::default())
            .await
    }

    pub async fn put<T, D>(&self, path: &str, data: &D) -> ClientResult<T>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(data), RequestOptions::default())
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.request(Method::DELETE, path, None::<&()>, RequestOptions::default())
            .await
    }

    /// Sends a request and decodes a successful body into `T`.
    pub async fn request<T, D>(
        &self,
        method: Method,
        path: &str,
        data: Option<&D>,
        options: RequestOptions,
    ) -> ClientResult<T>
    where
        T: DeserializeOwned,
        D: Serialize + ?Sized,
    {
        let body = data
            .map(serde_json::to_vec)
            .transpose()
            .map_err(ClientError::Encode)?;
        self.send(method, path, body, options).await?.decode()
    }

    /// Sends a request and returns the raw decoded payload of a successful
    /// response. Non-2xx responses become [`ClientError::Api`].
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        options: RequestOptions,
    ) -> ClientResult<Payload> {
        let url = self.resolve_url(path);

        let mut headers = options.headers;
        if !headers.contains_key(ACCEPT) {
            headers.insert(ACCEPT, HeaderValue::from_static(JSON_MIME));
        }
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MIME));
        }

        debug!(%method, %url, "sending request");

        let mut builder = self.client.request(method.clone(), &url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(%method, %url, error = %e, "request failed before a response");
            ClientError::Transport(e)
        })?;

        let status = response.status();
        let payload = read_payload(response).await?;

        if !status.is_success() {
            let error = ApiError::from_response(status, &payload);
            warn!(
                %method,
                %url,
                status = status.as_u16(),
                error = %error,
                "request rejected"
            );
            return Err(error.into());
        }

        debug!(%method, %url, status = status.as_u16(), "request succeeded");
        Ok(payload)
    }
}

fn has_http_scheme(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.starts_with("http:") || lower.starts_with("https:")
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().contains(JSON_MIME))
}

/// Decodes the body according to its declared content type. A `204` is
/// never read.
///
/// A rejected response whose JSON body does not parse is kept as text so it
/// can still be classified by status; on a successful response the parse
/// error is returned. Likewise a rejected response whose body cannot be read
/// at all is treated as empty: the status already arrived, so the failure is
/// an API error, not a transport one.
async fn read_payload(response: Response) -> ClientResult<Payload> {
    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        return Ok(Payload::Empty);
    }

    let json = is_json(&response);
    let text = match response.text().await {
        Ok(text) => text,
        Err(e) if !status.is_success() => {
            debug!(status = status.as_u16(), error = %e, "error body unreadable");
            return Ok(Payload::Empty);
        }
        Err(e) => return Err(ClientError::Transport(e)),
    };

    if !json {
        return Ok(Payload::Text(text));
    }
    if text.trim().is_empty() {
        return Ok(Payload::Empty);
    }

    match serde_json::from_str(&text) {
        Ok(value) => Ok(Payload::Json(value)),
        Err(_) if !status.is_success() => Ok(Payload::Text(text)),
        Err(e) => Err(ClientError::Decode(e)),
    }
}
