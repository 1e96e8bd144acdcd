//! Login page
//!
//! After sign-in the user goes to `?next=` when it names a page their role
//! may see, otherwise to their dashboard.

use leptos::prelude::*;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::core::RouteTable;
use crate::core::UserRecord;
use crate::ui::auth::{AuthState, LoginForm, use_auth_context};

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth_context();
    let query = use_query_map();

    let target_for = move |user: &UserRecord| {
        let next = query.with_untracked(|q| q.get("next"));
        RouteTable::standard().post_login_target(next.as_deref(), user)
    };

    // Already signed in: skip the form
    Effect::new(move |_| {
        if let AuthState::Authenticated(user) = auth.state.get() {
            let navigate = use_navigate();
            navigate(&target_for(&user), Default::default());
        }
    });

    let on_success = move |user: UserRecord| {
        let navigate = use_navigate();
        navigate(&target_for(&user), Default::default());
    };

    let on_register_click = move |_| {
        let navigate = use_navigate();
        navigate("/register", Default::default());
    };

    view! {
        <div class="min-h-screen bg-theme-primary flex items-center justify-center p-4">
            <div class="w-full max-w-md bg-theme-primary rounded-xl shadow-lg p-6 border border-theme">
                <LoginForm
                    on_success=Callback::new(on_success)
                    on_register_click=Callback::new(on_register_click)
                />
            </div>
        </div>
    }
}
