use std::time::Duration;

use reqwest::header::CONTENT_LENGTH;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::{AppError, AppResult};

/// Path below the Graph version root, kept as raw segments so ids are
/// percent-encoded when the URL is assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    segments: Vec<String>,
}

impl Endpoint {
    pub fn root<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Endpoint under the signed-in user, `/me/...`.
    pub fn me<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut endpoint = Self::root(["me"]);
        endpoint
            .segments
            .extend(segments.into_iter().map(Into::into));
        endpoint
    }

    pub fn join(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Percent-encoded path below the version root, as `$batch` sub-requests expect.
    pub fn path(&self) -> AppResult<String> {
        let mut url = Url::parse("https://graph.invalid/")?;
        self.append_to(&mut url)?;
        Ok(url.path().to_string())
    }

    fn append_to(&self, url: &mut Url) -> AppResult<()> {
        url.path_segments_mut()
            .map_err(|_| AppError::Config("graph url cannot carry a path".to_string()))?
            .pop_if_empty()
            .extend(&self.segments);
        Ok(())
    }
}

/// One Graph call: verb, endpoint, optional body and the statuses that count as success.
#[derive(Debug, Clone)]
pub struct GraphRequest {
    method: Method,
    endpoint: Endpoint,
    query: Vec<(String, String)>,
    headers: Vec<(&'static str, String)>,
    body: Option<Value>,
    accepted: Option<&'static [u16]>,
    timeout: Option<Duration>,
}

impl GraphRequest {
    pub fn new(method: Method, endpoint: Endpoint) -> Self {
        Self {
            method,
            endpoint,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            accepted: None,
            timeout: None,
        }
    }

    pub fn get(endpoint: Endpoint) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: Endpoint, body: Value) -> Self {
        Self::new(Method::POST, endpoint).body(body)
    }

    /// POST with an empty body, for action endpoints such as `/send`.
    pub fn action(endpoint: Endpoint) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn patch(endpoint: Endpoint, body: Value) -> Self {
        Self::new(Method::PATCH, endpoint).body(body)
    }

    pub fn delete(endpoint: Endpoint) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn client_request_id(self, id: Option<&str>) -> Self {
        match id.map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => self.header("client-request-id", id),
            None => self,
        }
    }

    /// Restricts success to exactly these statuses instead of any 2xx.
    pub fn accept(mut self, statuses: &'static [u16]) -> Self {
        self.accepted = Some(statuses);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone)]
pub struct GraphResponse {
    pub status: StatusCode,
    /// `Value::Null` when the response had no body.
    pub body: Value,
}

#[derive(Debug, Clone)]
pub struct GraphClient {
    http: Client,
    base_url: String,
}

impl GraphClient {
    pub fn new(base_url: &str, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn execute(&self, access_token: &str, request: GraphRequest) -> AppResult<GraphResponse> {
        let url = self.endpoint_url(&request.endpoint)?;
        tracing::debug!(method = %request.method, path = %url.path(), "graph request");

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .bearer_auth(access_token);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }
        match &request.body {
            Some(body) => builder = builder.json(body),
            None if request.method == Method::POST => {
                builder = builder.header(CONTENT_LENGTH, "0");
            }
            None => {}
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(map_api_error(status, &text));
        }
        if let Some(accepted) = request.accepted {
            if !accepted.contains(&status.as_u16()) {
                return Err(AppError::Api {
                    status: status.as_u16(),
                    message: format!("unexpected status code: {}", status.as_u16()),
                });
            }
        }

        Ok(GraphResponse {
            status,
            body: parse_body(&text)?,
        })
    }

    /// Like `execute`, returning only the decoded body.
    pub async fn send_json(&self, access_token: &str, request: GraphRequest) -> AppResult<Value> {
        Ok(self.execute(access_token, request).await?.body)
    }

    fn endpoint_url(&self, endpoint: &Endpoint) -> AppResult<Url> {
        let mut url = Url::parse(&self.base_url)?;
        endpoint.append_to(&mut url)?;
        Ok(url)
    }
}

fn parse_body(text: &str) -> AppResult<Value> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(text)?)
}

#[derive(Debug, Deserialize)]
struct GraphErrorEnvelope {
    error: GraphError,
}

#[derive(Debug, Deserialize)]
struct GraphError {
    code: Option<String>,
    message: Option<String>,
}

fn map_api_error(status: StatusCode, body: &str) -> AppError {
    let message = parse_api_error_message(body).unwrap_or_else(|| {
        let body = body.trim();
        if body.is_empty() {
            "no error details in response body".to_string()
        } else {
            body.to_string()
        }
    });

    if status == StatusCode::UNAUTHORIZED {
        return AppError::Auth(message);
    }

    AppError::Api {
        status: status.as_u16(),
        message,
    }
}

fn parse_api_error_message(body: &str) -> Option<String> {
    let envelope = serde_json::from_str::<GraphErrorEnvelope>(body).ok()?;
    match (envelope.error.message, envelope.error.code) {
        (Some(message), Some(code)) => Some(format!("{message} (code={code})")),
        (Some(message), None) => Some(message),
        (None, Some(code)) => Some(format!("code={code}")),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_unauthorized_as_auth_error() {
        let error = map_api_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"code":"InvalidAuthenticationToken","message":"Access token has expired or is not yet valid."}}"#,
        );

        match error {
            AppError::Auth(message) => {
                assert!(message.contains("Access token has expired"));
                assert!(message.contains("InvalidAuthenticationToken"));
            }
            other => panic!("expected auth error, got {other:?}"),
        }
    }

    #[test]
    fn maps_forbidden_as_api_error() {
        let error = map_api_error(
            StatusCode::FORBIDDEN,
            r#"{"error":{"code":"ErrorAccessDenied","message":"Access is denied."}}"#,
        );

        match error {
            AppError::Api { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("Access is denied"));
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn falls_back_to_raw_body() {
        match map_api_error(StatusCode::BAD_GATEWAY, "upstream timeout") {
            AppError::Api { message, .. } => assert_eq!(message, "upstream timeout"),
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn empty_body_decodes_to_null() {
        assert_eq!(parse_body("").expect("empty"), Value::Null);
        assert_eq!(parse_body("  \n").expect("blank"), Value::Null);
    }

    #[test]
    fn endpoint_url_keeps_version_prefix_and_escapes_ids() {
        let client = GraphClient::new("https://graph.microsoft.com/v1.0/", Duration::from_secs(10))
            .expect("client builds");
        let url = client
            .endpoint_url(&Endpoint::me(["calendars", "AAMk/a=="]))
            .expect("url");

        assert_eq!(
            url.as_str(),
            "https://graph.microsoft.com/v1.0/me/calendars/AAMk%2Fa=="
        );
    }

    #[test]
    fn relative_path_escapes_ids_like_full_urls() {
        let endpoint = Endpoint::me(["mailFolders", "AAMk/a=="]);
        assert_eq!(endpoint.path().expect("path"), "/me/mailFolders/AAMk%2Fa==");

        let endpoint = Endpoint::me(["mailFolders", "x?y#z"]);
        assert_eq!(endpoint.path().expect("path"), "/me/mailFolders/x%3Fy%23z");
    }
}
