use futures::TryStreamExt as _;
use reqwest::{Method, RequestBuilder, Response, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::ClientConfig;
use crate::errors::SploxError;
use crate::stream::{EventParser, EventStream};
use crate::wait::WaitScope;

/// Ordered query parameters. Unset values are never added.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Query(Vec<(&'static str, String)>);

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, key: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.0.push((key, value.to_string()));
        }
        self
    }

    pub fn positive(mut self, key: &'static str, value: Option<u32>) -> Self {
        if let Some(value) = value.filter(|v| *v > 0) {
            self.0.push((key, value.to_string()));
        }
        self
    }

    pub fn amount(mut self, key: &'static str, value: Option<f64>) -> Self {
        if let Some(value) = value.filter(|v| *v > 0.0) {
            self.0.push((key, format!("{value:.6}")));
        }
        self
    }

    fn pairs(&self) -> &[(&'static str, String)] {
        &self.0
    }
}

/// One outgoing JSON request.
pub(crate) struct Call<'a, B: Serialize + ?Sized = ()> {
    method: Method,
    path: String,
    query: Query,
    body: Option<&'a B>,
    headers: Vec<(&'static str, String)>,
}

impl<'a> Call<'a, ()> {
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Query::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn json<B: Serialize + ?Sized>(self, body: &'a B) -> Call<'a, B> {
        Call {
            method: self.method,
            path: self.path,
            query: self.query,
            body: Some(body),
            headers: self.headers,
        }
    }
}

impl<'a, B: Serialize + ?Sized> Call<'a, B> {
    pub fn query(mut self, query: Query) -> Self {
        self.query = query;
        self
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }
}

/// HTTP plumbing shared by every service.
pub(crate) struct Transport {
    http: reqwest::Client,
    stream_http: reqwest::Client,
    config: ClientConfig,
}

impl Transport {
    pub fn new(config: ClientConfig) -> Result<Self, SploxError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| SploxError::Config(format!("failed to build HTTP client: {e}")))?;
        // Listen streams stay open for as long as the execution runs, so they
        // get a client without the request timeout.
        let stream_http = reqwest::Client::builder()
            .connect_timeout(config.timeout)
            .build()
            .map_err(|e| SploxError::Config(format!("failed to build stream client: {e}")))?;
        Ok(Self {
            http,
            stream_http,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends a request and decodes the JSON body into `T`.
    pub async fn send_json<T, B>(&self, call: Call<'_, B>) -> Result<T, SploxError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let path = call.path.clone();
        let response = self.execute(call).await?;
        let body = response.text().await.map_err(SploxError::connection)?;
        serde_json::from_str(&body)
            .map_err(|e| SploxError::decode(format!("failed to decode response from {path}: {e}")))
    }

    /// Sends a request and discards the response body.
    pub async fn send_unit<B>(&self, call: Call<'_, B>) -> Result<(), SploxError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(call).await.map(drop)
    }

    async fn execute<B>(&self, call: Call<'_, B>) -> Result<Response, SploxError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.url(&call.path);
        debug!(method = %call.method, path = %call.path, "sending request");

        let mut req = self
            .authorize(self.http.request(call.method.clone(), &url))
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json");
        if !call.query.pairs().is_empty() {
            req = req.query(call.query.pairs());
        }
        if let Some(body) = call.body {
            req = req.json(body);
        }
        for (name, value) in &call.headers {
            req = req.header(*name, value);
        }

        let response = req.send().await.map_err(SploxError::connection)?;
        let response = check_status(response).await?;
        debug!(method = %call.method, path = %call.path, status = response.status().as_u16(), "request succeeded");
        Ok(response)
    }

    /// Opens a long-lived `text/event-stream` response as an [`EventStream`].
    pub async fn open_stream(&self, path: &str, scope: WaitScope) -> Result<EventStream, SploxError> {
        let url = self.config.url(path);
        debug!(path = %path, "opening event stream");
        let req = self
            .authorize(self.stream_http.get(&url))
            .header(header::ACCEPT, "text/event-stream");
        let response = match scope.bound(req.send()).await {
            Some(sent) => sent.map_err(SploxError::connection)?,
            None => {
                return Err(SploxError::Timeout {
                    timeout: scope.timeout().unwrap_or_default(),
                });
            }
        };
        let response = check_status(response).await?;

        let bytes = response.bytes_stream().map_err(std::io::Error::other);
        Ok(EventStream::new(EventParser::new(Box::pin(bytes)), scope))
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        match self.config.bearer() {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }
}

/// Passes 2xx responses through and maps everything else to a typed error.
async fn check_status(response: Response) -> Result<Response, SploxError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let retry_after = (status == StatusCode::TOO_MANY_REQUESTS)
        .then(|| response.headers().get(header::RETRY_AFTER))
        .flatten()
        .and_then(|v| v.to_str().ok())
        .map(ToOwned::to_owned);
    let body = response.text().await.unwrap_or_default();
    debug!(status = status.as_u16(), "request failed");
    Err(SploxError::from_status(status.as_u16(), body, retry_after))
}
