use leptos::prelude::*;
use leptos_router::components::A;

use crate::ui::auth::use_auth_context;
use crate::ui::icon::{Icon, icons};

/// Fallback for unknown routes; links back to the user's dashboard when signed in
#[component]
pub fn NotFoundPage() -> impl IntoView {
    let auth = use_auth_context();
    let (target, label) = match auth.user() {
        Some(user) => (user.role.dashboard_path(), "Back to dashboard"),
        None => ("/login", "Sign in"),
    };

    view! {
        <div class="min-h-screen bg-theme-primary flex items-center justify-center p-4">
            <div class="max-w-md text-center space-y-4">
                <Icon name=icons::BOOK class="w-14 h-14 mx-auto text-theme-tertiary" />
                <p class="text-5xl font-bold text-theme-primary">"404"</p>
                <p class="text-theme-secondary">
                    "There is no portal page at this address."
                </p>
                <A
                    href=target
                    attr:class="inline-block px-5 py-2.5 bg-accent-primary hover:bg-accent-primary-hover text-white rounded-lg"
                >
                    {label}
                </A>
            </div>
        </div>
    }
}
