//! Request descriptors and the transport seam
//!
//! A [`RequestDescriptor`] says what to call; an [`HttpTransport`] knows how
//! to put it on the wire. The API client and authentication service only ever
//! talk to the transport, which keeps the retry logic independent of
//! `reqwest` on the server and `fetch` in the browser.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::ApiError;

/// Base path every backend resource lives under
pub const API_BASE_PATH: &str = "/api/";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
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

/// One part of a multipart form
#[derive(Debug, Clone, PartialEq)]
pub struct MultipartPart {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl MultipartPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            content_type: None,
            data: value.into().into_bytes(),
        }
    }

    pub fn file(
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            file_name: Some(file_name.into()),
            content_type: Some(content_type.into()),
            data,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<MultipartPart>),
}

/// Everything needed to issue (and re-issue) one API call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to [`API_BASE_PATH`], e.g. `student/courses`
    pub path: String,
    pub body: RequestBody,
    pub requires_auth: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into().trim_start_matches('/').to_string(),
            body: RequestBody::Empty,
            requires_auth: true,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::Put, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value =
            serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn multipart(mut self, parts: Vec<MultipartPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    /// Mark the call as not needing (or retrying) a bearer token
    pub fn anonymous(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    /// Absolute path on the API host, e.g. `/api/student/courses`
    pub fn api_path(&self) -> String {
        format!("{}{}", API_BASE_PATH, self.path)
    }
}

/// Raw response handed back by a transport
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode a JSON body; an empty body decodes as `null`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let body = self.body.trim();
        let body = if body.is_empty() { "null" } else { body };
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Turn a non-2xx response into an error
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::from_response(self.status, &self.body))
        }
    }
}

/// Puts a request on the wire
///
/// Implementations only fail with [`ApiError::Network`]; HTTP error statuses
/// come back as ordinary responses so the client can decide what to do.
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    async fn send(
        &self,
        request: &RequestDescriptor,
        bearer: Option<&str>,
    ) -> Result<HttpResponse, ApiError>;
}
