//! HTTP transport behind a trait, so scenarios can run against a fake

use std::collections::BTreeMap;
use std::time::Duration;

use petcheck_core::Config;
use serde_json::Value;

pub use petcheck_core::expect::Response as ApiResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File attached to a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Already-serialized JSON, sent as `application/json`.
    Json(String),
    /// `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    Multipart {
        fields: Vec<(String, String)>,
        file: Option<FilePart>,
    },
}

/// A request against the service, relative to the configured base URL.
///
/// `path` is a template such as `/pet/{petId}`; placeholders are filled from
/// `path_params` by [`ApiRequest::resolved_path`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub path_params: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Body>,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            path_params: Vec::new(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    #[must_use]
    pub fn path_param(mut self, name: &str, value: impl ToString) -> Self {
        self.path_params.push((name.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.push((name.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn json(mut self, body: impl Into<String>) -> Self {
        self.body = Some(Body::Json(body.into()));
        self
    }

    /// Adds a form field, switching the body to a url-encoded form.
    #[must_use]
    pub fn form(mut self, name: &str, value: impl Into<String>) -> Self {
        let pair = (name.to_string(), value.into());
        match &mut self.body {
            Some(Body::Form(pairs)) => pairs.push(pair),
            _ => self.body = Some(Body::Form(vec![pair])),
        }
        self
    }

    /// Adds a multipart text field.
    #[must_use]
    pub fn multipart_text(mut self, name: &str, value: impl Into<String>) -> Self {
        let pair = (name.to_string(), value.into());
        match &mut self.body {
            Some(Body::Multipart { fields, .. }) => fields.push(pair),
            _ => {
                self.body = Some(Body::Multipart {
                    fields: vec![pair],
                    file: None,
                });
            }
        }
        self
    }

    /// Attaches a file, switching the body to multipart.
    #[must_use]
    pub fn multipart_file(mut self, part: FilePart) -> Self {
        match &mut self.body {
            Some(Body::Multipart { file, .. }) => *file = Some(part),
            _ => {
                self.body = Some(Body::Multipart {
                    fields: Vec::new(),
                    file: Some(part),
                });
            }
        }
        self
    }

    /// Path with every `{name}` placeholder replaced.
    #[must_use]
    pub fn resolved_path(&self) -> String {
        self.path_params
            .iter()
            .fold(self.path.clone(), |path, (name, value)| {
                path.replace(&format!("{{{name}}}"), value)
            })
    }

    /// `METHOD /template`, for logs.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("cannot build HTTP client: {0}")]
    Client(String),
    #[error("invalid request {0}: {1}")]
    Request(String, String),
    #[error("{0} failed: {1}")]
    Send(String, String),
}

/// Sends one request and returns the parsed response.
pub trait HttpClient {
    /// # Errors
    ///
    /// Returns [`TransportError`] if no HTTP response was received.
    fn request(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError>;
}

impl<T: HttpClient + ?Sized> HttpClient for &T {
    fn request(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        (**self).request(request)
    }
}

/// Blocking `reqwest` transport.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
    base_url: String,
    headers: BTreeMap<String, String>,
}

impl ReqwestClient {
    /// # Errors
    ///
    /// Returns [`TransportError::Client`] if the TLS backend cannot be initialized.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            headers: config.headers.clone(),
        })
    }
}

impl HttpClient for ReqwestClient {
    fn request(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
        let label = request.label();
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };
        let url = format!("{}{}", self.base_url, request.resolved_path());

        let mut req = self.client.request(method, &url);
        let headers = self
            .headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .chain(request.headers.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        for (k, v) in headers {
            if reqwest::header::HeaderValue::from_str(v).is_ok() {
                req = req.header(k, v);
            }
        }
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        req = match &request.body {
            None => req,
            Some(Body::Json(json)) => req
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(json.clone()),
            Some(Body::Form(pairs)) => req.form(pairs),
            Some(Body::Multipart { fields, file }) => {
                let mut form = reqwest::blocking::multipart::Form::new();
                for (k, v) in fields {
                    form = form.text(k.clone(), v.clone());
                }
                if let Some(file) = file {
                    let part = reqwest::blocking::multipart::Part::bytes(file.bytes.clone())
                        .file_name(file.file_name.clone())
                        .mime_str(&file.mime)
                        .map_err(|e| TransportError::Request(label.clone(), e.to_string()))?;
                    form = form.part(file.field.clone(), part);
                }
                req.multipart(form)
            }
        };

        let resp = req
            .send()
            .map_err(|e| TransportError::Send(label.clone(), e.to_string()))?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let text = resp
            .text()
            .map_err(|e| TransportError::Send(label, e.to_string()))?;

        let mut response = ApiResponse::new(status, parse_body(&text));
        response.content_type = content_type;
        Ok(response)
    }
}

/// Empty text is `Null`; text that is not JSON is kept as a JSON string.
#[must_use]
pub fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
