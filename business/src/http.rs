//! Platform-abstracted HTTP client with Send-safe futures.
//!
//! On wasm32 `reqwest::Response` holds JS values and is not `Send`. Requests there run on
//! the JS thread via `wasm_bindgen_futures::spawn_local` and hand their result back over a
//! `flume` channel, so [`RequestBuilder::send`] is `Send` on every target and resource
//! clients can spawn it the same way everywhere.

use std::collections::HashMap;

/// HTTP verbs the backend understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully buffered response that contains only Send-safe data.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u16,
    /// Lowercased header names.
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Media type without parameters, e.g. `application/json` for
    /// `application/json; charset=utf-8`.
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
            .and_then(|value| value.split(';').next())
            .map(str::trim)
    }

    /// True for `application/json` and `+json` suffixed media types.
    pub fn is_json(&self) -> bool {
        self.content_type().is_some_and(|media| {
            let media = media.to_ascii_lowercase();
            media == "application/json" || media.ends_with("+json")
        })
    }

    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Transport-level failure: the request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HttpError {
    pub message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    headers: HashMap<String, String>,
    body: Option<Vec<u8>>,
}

impl RequestBuilder {
    fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Serialise `value` as the body and set `content-type: application/json`.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        self.body = Some(serde_json::to_vec(value)?);
        self.headers
            .insert("content-type".to_string(), "application/json".to_string());
        Ok(self)
    }

    pub async fn send(self) -> HttpResult<Response> {
        log::debug!("{} {}", self.method, self.url);

        #[cfg(not(target_arch = "wasm32"))]
        {
            self.execute().await
        }

        #[cfg(target_arch = "wasm32")]
        {
            let (tx, rx) = flume::bounded::<HttpResult<Response>>(1);
            wasm_bindgen_futures::spawn_local(async move {
                let _ = tx.send_async(self.execute().await).await;
            });
            rx.recv_async()
                .await
                .map_err(|_| HttpError::new("request dropped before completion"))?
        }
    }

    async fn execute(self) -> HttpResult<Response> {
        let client = reqwest::Client::new();
        let mut request = match self.method {
            Method::Get => client.get(&self.url),
            Method::Post => client.post(&self.url),
            Method::Put => client.put(&self.url),
            Method::Delete => client.delete(&self.url),
        };

        for (name, value) in &self.headers {
            request = request.header(name, value);
        }
        if let Some(body) = self.body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_lowercase(), v.to_string()))
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?
            .to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

/// Entry point for building requests.
pub struct Client;

impl Client {
    pub fn request(method: Method, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(method, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response_with_type(content_type: &str) -> Response {
        Response {
            status: 200,
            headers: HashMap::from([("content-type".to_string(), content_type.to_string())]),
            body: Vec::new(),
        }
    }

    #[test]
    fn success_range() {
        for (status, ok) in [(199, false), (200, true), (204, true), (299, true), (404, false)] {
            let response = Response {
                status,
                ..Default::default()
            };
            assert_eq!(response.is_success(), ok, "status {status}");
        }
    }

    #[test]
    fn header_lookup_ignores_case() {
        let response = response_with_type("application/pdf");
        assert_eq!(response.header("Content-Type"), Some("application/pdf"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/pdf"));
    }

    #[test]
    fn json_detection_strips_parameters() {
        assert!(response_with_type("application/json; charset=utf-8").is_json());
        assert!(response_with_type("application/problem+json").is_json());
        assert!(!response_with_type("application/pdf").is_json());
        assert!(!Response::default().is_json());
    }

    #[test]
    fn method_display() {
        assert_eq!(Method::Delete.to_string(), "DELETE");
        assert_eq!(format!("{} failed", Method::Put), "PUT failed");
    }

    #[test]
    fn json_body_sets_content_type() {
        let builder = Client::request(Method::Put, "http://localhost/plans/4")
            .json(&serde_json::json!({"name": "Gold"}))
            .expect("serialisable body");

        assert_eq!(builder.method(), Method::Put);
        assert_eq!(
            builder.headers.get("content-type").map(String::as_str),
            Some("application/json")
        );
        assert_eq!(builder.body.as_deref(), Some(br#"{"name":"Gold"}"#.as_slice()));
    }
}
