//! Concrete transports
//!
//! - [`ReqwestTransport`] (server builds): talks to an absolute backend URL.
//! - [`BrowserTransport`] (client builds): uses `fetch` against the page's
//!   own origin, where the SSR server forwards `/api/*` to the backend.

use super::error::ApiError;
use super::http::{HttpResponse, HttpTransport, RequestDescriptor};
#[cfg(feature = "ssr")]
use super::http::{Method, RequestBody};

#[cfg(feature = "ssr")]
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: url::Url,
}

#[cfg(feature = "ssr")]
impl ReqwestTransport {
    /// `base_url` is the backend origin, e.g. `http://127.0.0.1:8000`
    pub fn new(base_url: &str) -> Result<Self, url::ParseError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, url::ParseError> {
        let mut base_url = url::Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    pub fn url_for(&self, request: &RequestDescriptor) -> Result<url::Url, ApiError> {
        // api_path() is absolute; join it relative so a base path prefix survives
        self.base_url
            .join(request.api_path().trim_start_matches('/'))
            .map_err(|e| ApiError::Network(format!("Invalid request URL: {}", e)))
    }

    fn multipart_form(
        parts: &[super::http::MultipartPart],
    ) -> Result<reqwest::multipart::Form, ApiError> {
        let mut form = reqwest::multipart::Form::new();
        for part in parts {
            let mut body = reqwest::multipart::Part::bytes(part.data.clone());
            if let Some(file_name) = &part.file_name {
                body = body.file_name(file_name.clone());
            }
            if let Some(content_type) = &part.content_type {
                body = body
                    .mime_str(content_type)
                    .map_err(|e| ApiError::Network(e.to_string()))?;
            }
            form = form.part(part.name.clone(), body);
        }
        Ok(form)
    }
}

#[cfg(feature = "ssr")]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: &RequestDescriptor,
        bearer: Option<&str>,
    ) -> Result<HttpResponse, ApiError> {
        let url = self.url_for(request)?;

        let mut builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        }
        .header("Accept", "application/json");

        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => builder.multipart(Self::multipart_form(parts)?),
        };

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(not(feature = "ssr"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTransport;

#[cfg(not(feature = "ssr"))]
fn js_error(value: wasm_bindgen::JsValue) -> ApiError {
    ApiError::Network(format!("{:?}", value))
}

#[cfg(not(feature = "ssr"))]
impl BrowserTransport {
    fn form_data(parts: &[super::http::MultipartPart]) -> Result<web_sys::FormData, ApiError> {
        let form = web_sys::FormData::new().map_err(js_error)?;
        for part in parts {
            match &part.file_name {
                None => form
                    .append_with_str(&part.name, &String::from_utf8_lossy(&part.data))
                    .map_err(js_error)?,
                Some(file_name) => {
                    let bytes = js_sys::Uint8Array::from(part.data.as_slice());
                    let sequence = js_sys::Array::new();
                    sequence.push(&bytes);

                    let options = web_sys::BlobPropertyBag::new();
                    if let Some(content_type) = &part.content_type {
                        options.set_type(content_type);
                    }

                    let blob =
                        web_sys::Blob::new_with_u8_array_sequence_and_options(&sequence, &options)
                            .map_err(js_error)?;
                    form.append_with_blob_and_filename(&part.name, &blob, file_name)
                        .map_err(js_error)?;
                }
            }
        }
        Ok(form)
    }
}

#[cfg(not(feature = "ssr"))]
impl HttpTransport for BrowserTransport {
    async fn send(
        &self,
        request: &RequestDescriptor,
        bearer: Option<&str>,
    ) -> Result<HttpResponse, ApiError> {
        use super::http::{Method, RequestBody};
        use gloo_net::http::Request;

        let url = request.api_path();
        let mut builder = match request.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Delete => Request::delete(&url),
        }
        .header("Accept", "application/json");

        if let Some(token) = bearer {
            builder = builder.header("Authorization", &format!("Bearer {}", token));
        }

        let prepared = match &request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => builder.body(Self::form_data(parts)?),
        }
        .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = prepared
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}

#[cfg(all(test, feature = "ssr"))]
mod tests {
    use super::*;

    #[test]
    fn test_url_for_joins_api_path() {
        let transport = ReqwestTransport::new("http://backend:8000").unwrap();
        let url = transport
            .url_for(&RequestDescriptor::get("student/courses"))
            .unwrap();
        assert_eq!(url.as_str(), "http://backend:8000/api/student/courses");
    }

    #[test]
    fn test_url_for_keeps_base_prefix() {
        let transport = ReqwestTransport::new("https://campus.example.edu/portal").unwrap();
        let url = transport
            .url_for(&RequestDescriptor::get("alerts"))
            .unwrap();
        assert_eq!(url.as_str(), "https://campus.example.edu/portal/api/alerts");
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ReqwestTransport::new("not a url").is_err());
    }
}
