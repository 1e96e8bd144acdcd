use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::core::guard::LOGIN_PATH;
use crate::ui::auth::{AuthState, use_auth_context};
use crate::ui::common::LoadingSpinner;

/// `/`: sends signed-in users to their dashboard, everyone else to login
#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth_context();

    Effect::new(move |_| {
        let target = match auth.state.get() {
            AuthState::Loading => return,
            AuthState::Unauthenticated => LOGIN_PATH,
            AuthState::Authenticated(user) => user.role.dashboard_path(),
        };
        let navigate = use_navigate();
        navigate(
            target,
            NavigateOptions {
                replace: true,
                ..Default::default()
            },
        );
    });

    view! { <LoadingSpinner /> }
}
