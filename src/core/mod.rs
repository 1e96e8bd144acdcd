//! Core API access layer: sessions, authentication, the authenticated HTTP
//! client, route guarding and the per-area data calls

pub mod activity;
pub mod api;
pub mod auth;
pub mod client;
#[cfg(feature = "ssr")]
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
#[cfg(feature = "ssr")]
pub mod proxy;
pub mod session;
pub mod token_store;
pub mod transport;
#[cfg(test)]
pub(crate) mod tests;

pub use activity::{ActivityEvent, ActivityKind, ActivityStatus, ActivityTracker};
pub use auth::{AuthService, Registration, RegistrationData};
pub use client::ApiClient;
pub use error::{ApiError, ErrorKind, FieldErrors};
pub use guard::{GuardState, PageAccess, Redirect, RouteGuard, RouteTable};
pub use http::{HttpResponse, HttpTransport, Method, MultipartPart, RequestBody, RequestDescriptor};
pub use session::{Role, Session, UserRecord};
pub use token_store::{MemoryTokenStore, TokenStore};

#[cfg(not(feature = "ssr"))]
pub use token_store::BrowserTokenStore;
#[cfg(not(feature = "ssr"))]
pub use transport::BrowserTransport;
#[cfg(feature = "ssr")]
pub use transport::ReqwestTransport;

/// Client used by the views: browser storage and fetch in the browser,
/// in-memory session and reqwest while rendering on the server
#[cfg(not(feature = "ssr"))]
pub type PortalClient = ApiClient<BrowserTransport, BrowserTokenStore>;
#[cfg(feature = "ssr")]
pub type PortalClient = ApiClient<ReqwestTransport, MemoryTokenStore>;
