use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::ClientError;
use crate::session::SessionContext;

/// Chunked binary body, e.g. a spreadsheet export
pub type ByteStream = BoxStream<'static, Result<Bytes, ClientError>>;

/// The one authenticated HTTP client every service goes through
///
/// Attaches the bearer token from the session context to each request and
/// normalizes failures. A 401 from any endpoint invalidates the session before
/// the error reaches the caller.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<SessionContext>,
}

impl ApiClient {
    pub fn new(base_url: &str, session: Arc<SessionContext>) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(crate::config::config().request_timeout())
            .build()?;
        Self::with_http(http, base_url, session)
    }

    pub fn with_http(
        http: reqwest::Client,
        base_url: &str,
        session: Arc<SessionContext>,
    ) -> Result<Self, ClientError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Decode(format!("invalid API base URL '{}': {}", base_url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::Decode(format!("invalid path '{}': {}", path, e)))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.url(path)?;
        if crate::config::config().api.enable_request_logging {
            tracing::info!(%method, %url, "dispatching request");
        } else {
            tracing::debug!(%method, %url, "dispatching request");
        }
        let mut builder = self.http.request(method, url).header(ACCEPT, "application/json");
        if let Some(token) = self.session.token() {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        Ok(builder)
    }

    /// Send and turn any non-2xx response into a `ClientError`
    async fn send(&self, builder: RequestBuilder) -> Result<Response, ClientError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.bytes().await.unwrap_or_default();
        let err = ClientError::from_response(status.as_u16(), &body);
        if status == StatusCode::UNAUTHORIZED {
            self.session.invalidate();
        } else {
            tracing::warn!(status = status.as_u16(), "request failed: {}", err);
        }
        Err(err)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let body = response.bytes().await?;
        if body.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(serde_json::from_value(Value::Null)?);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ClientError> {
        let builder = self.request(Method::GET, path)?.query(query);
        let response = self.send(builder).await?;
        Self::read_json(response).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let builder = self.request(Method::POST, path)?.json(body);
        let response = self.send(builder).await?;
        Self::read_json(response).await
    }

    pub async fn put_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let builder = self.request(Method::PUT, path)?.json(body);
        let response = self.send(builder).await?;
        Self::read_json(response).await
    }

    pub async fn patch_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ClientError> {
        let builder = self.request(Method::PATCH, path)?.json(body);
        let response = self.send(builder).await?;
        Self::read_json(response).await
    }

    /// JSON write where any 2xx counts; a body that is not JSON reads as `Null`
    pub async fn write_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Value, ClientError> {
        let builder = self.request(method, path)?.json(body);
        let response = self.send(builder).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ClientError> {
        let builder = self.request(Method::DELETE, path)?;
        let response = self.send(builder).await?;
        Self::read_json(response).await
    }

    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<T, ClientError> {
        let builder = self.request(Method::POST, path)?.multipart(form);
        let response = self.send(builder).await?;
        Self::read_json(response).await
    }

    pub async fn get_stream(&self, path: &str) -> Result<ByteStream, ClientError> {
        let builder = self.request(Method::GET, path)?;
        let response = self.send(builder).await?;
        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(ClientError::from))
            .boxed())
    }
}

/// Single-resource responses may or may not be wrapped in `{data: …}`
pub fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.get("data").map_or(false, |d| !d.is_null()) => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwrap_data_prefers_inner_object() {
        assert_eq!(unwrap_data(json!({"data": {"id": 1}})), json!({"id": 1}));
        assert_eq!(unwrap_data(json!({"id": 1})), json!({"id": 1}));
        assert_eq!(unwrap_data(json!({"data": null, "id": 2})), json!({"data": null, "id": 2}));
    }

    #[test]
    fn paths_join_below_api_prefix() {
        let session = Arc::new(SessionContext::in_memory());
        let client = ApiClient::with_http(reqwest::Client::new(), "http://localhost:8000/api", session).unwrap();
        assert_eq!(
            client.url("/master-data/7/toggle-status").unwrap().as_str(),
            "http://localhost:8000/api/master-data/7/toggle-status"
        );
        assert_eq!(client.url("me").unwrap().as_str(), "http://localhost:8000/api/me");
    }
}
