//! Auth context for the view layer
//!
//! Mirrors the [`AuthService`](crate::core::AuthService) session into signals
//! so components can react to sign-in and sign-out. All network work is done
//! by the shared [`PortalClient`].

use std::sync::Arc;

use leptos::prelude::*;

use crate::core::{ApiError, FieldErrors, PortalClient, Registration, RegistrationData, UserRecord};

/// Authentication state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AuthState {
    /// Initial state, until the stored session has been read in the browser
    #[default]
    Loading,
    Unauthenticated,
    Authenticated(UserRecord),
}

/// Auth context providing authentication state and actions
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: RwSignal<AuthState>,
    /// An auth operation is in flight
    pub loading: RwSignal<bool>,
    /// Error message from the last operation
    pub error: RwSignal<Option<String>>,
    /// Per-field messages from the last rejected form
    pub field_errors: RwSignal<FieldErrors>,
    client: StoredValue<Arc<PortalClient>>,
}

impl AuthContext {
    pub fn client(&self) -> Arc<PortalClient> {
        self.client.get_value()
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state.get(), AuthState::Authenticated(_))
    }

    pub fn user(&self) -> Option<UserRecord> {
        match self.state.get() {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn clear_error(&self) {
        self.error.set(None);
        self.field_errors.set(FieldErrors::new());
    }

    /// Re-read the stored session into `state`
    pub fn sync(&self) {
        let next = match self.client().auth().current_user() {
            Some(user) => AuthState::Authenticated(user),
            None => AuthState::Unauthenticated,
        };
        if self.state.get_untracked() != next {
            self.state.set(next);
        }
    }

    /// Record a failed data call. An expired session signs the view out so
    /// the page guard sends the user to the login page. Returns the message
    /// to show.
    pub fn report(&self, err: &ApiError) -> String {
        if err.requires_login() {
            self.sync();
        }
        err.user_message()
    }

    pub async fn login(self, username: String, password: String) -> Result<UserRecord, ApiError> {
        self.loading.set(true);
        self.clear_error();

        let result = self.client().auth().login(&username, &password).await;

        self.loading.set(false);
        match result {
            Ok(session) => {
                self.state.set(AuthState::Authenticated(session.user.clone()));
                Ok(session.user)
            }
            Err(e) => {
                self.error.set(Some(e.user_message()));
                Err(e)
            }
        }
    }

    pub async fn register(self, data: RegistrationData) -> Result<Registration, ApiError> {
        self.loading.set(true);
        self.clear_error();

        let result = self.client().auth().register(&data).await;

        self.loading.set(false);
        match &result {
            Ok(Registration::SignedIn(session)) => {
                self.state.set(AuthState::Authenticated(session.user.clone()));
            }
            Ok(Registration::Confirmation(_)) => {}
            Err(e) => {
                if let Some(fields) = e.field_errors() {
                    self.field_errors.set(fields.clone());
                }
                self.error.set(Some(e.user_message()));
            }
        }
        result
    }

    pub async fn logout(self) {
        self.client().auth().sign_out().await;
        self.state.set(AuthState::Unauthenticated);
    }
}

/// Provide auth context to the component tree
pub fn provide_auth_context(client: Arc<PortalClient>) -> AuthContext {
    let ctx = AuthContext {
        state: RwSignal::new(AuthState::Loading),
        loading: RwSignal::new(false),
        error: RwSignal::new(None),
        field_errors: RwSignal::new(FieldErrors::new()),
        client: StoredValue::new(client),
    };

    // Storage is only readable in the browser; decide after hydration so the
    // server and client render the same loading state first
    #[cfg(not(feature = "ssr"))]
    {
        use crate::core::api::ProfileApi;
        use leptos::task::spawn_local;

        Effect::new(move |_| {
            ctx.sync();

            if let Some(role) = ctx.client().auth().role() {
                // Confirm the stored token is still accepted
                spawn_local(async move {
                    let client = ctx.client();
                    if let Err(e) = ProfileApi::new(&client, role).me().await {
                        tracing::warn!("Stored session could not be verified: {}", e);
                        ctx.report(&e);
                    }
                });
            }
        });
    }

    provide_context(ctx);
    ctx
}

/// Get auth context from the component tree
pub fn use_auth_context() -> AuthContext {
    expect_context::<AuthContext>()
}
