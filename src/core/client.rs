//! Authenticated API client
//!
//! Attaches the stored bearer token to every request. A 401 triggers one
//! refresh through the [`AuthService`] and one resend of the original
//! request; whatever the resend returns is final.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::auth::AuthService;
use super::error::ApiError;
use super::http::{HttpResponse, HttpTransport, MultipartPart, RequestDescriptor};
use super::token_store::TokenStore;

pub struct ApiClient<T, S> {
    auth: AuthService<T, S>,
}

impl<T, S> ApiClient<T, S>
where
    T: HttpTransport,
    S: TokenStore,
{
    pub fn new(transport: T, store: S) -> Self {
        Self {
            auth: AuthService::new(transport, store),
        }
    }

    pub fn from_auth(auth: AuthService<T, S>) -> Self {
        Self { auth }
    }

    pub fn auth(&self) -> &AuthService<T, S> {
        &self.auth
    }

    /// Send a request, refreshing and retrying once on 401
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<HttpResponse, ApiError> {
        self.execute_with_refresh(request).await.inspect_err(|e| {
            tracing::warn!(
                "{} {} failed: {}",
                request.method.as_str(),
                request.api_path(),
                e
            )
        })
    }

    async fn execute_with_refresh(
        &self,
        request: &RequestDescriptor,
    ) -> Result<HttpResponse, ApiError> {
        let token = if request.requires_auth {
            self.auth.access_token()
        } else {
            None
        };

        let response = self.auth.transport().send(request, token.as_deref()).await?;

        if response.status != 401 || !request.requires_auth {
            return response.error_for_status();
        }

        tracing::debug!("{} rejected the access token, refreshing", request.api_path());

        let session = self.auth.refresh_after(token.as_deref()).await?;

        // Exactly one resend; its outcome is surfaced as-is
        self.auth
            .transport()
            .send(request, Some(&session.access_token))
            .await?
            .error_for_status()
    }

    /// Send a request and decode its JSON body
    pub async fn request<R: DeserializeOwned>(
        &self,
        request: &RequestDescriptor,
    ) -> Result<R, ApiError> {
        self.execute(request).await?.json().inspect_err(|e| {
            tracing::warn!("Bad response body from {}: {}", request.api_path(), e)
        })
    }

    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.request(&RequestDescriptor::get(path)).await
    }

    pub async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(&RequestDescriptor::post(path).json(body)?).await
    }

    pub async fn put<B, R>(&self, path: &str, body: &B) -> Result<R, ApiError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.request(&RequestDescriptor::put(path).json(body)?).await
    }

    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        self.request(&RequestDescriptor::delete(path)).await
    }

    /// Multipart POST, same bearer handling as JSON calls
    pub async fn upload<R: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<MultipartPart>,
    ) -> Result<R, ApiError> {
        self.request(&RequestDescriptor::post(path).multipart(parts))
            .await
    }
}
