//! Page chrome shared by every portal page

use leptos::prelude::*;
use leptos_router::components::A;

use crate::ui::alert_panel::AlertPanel;
use crate::ui::auth::{UserMenu, use_auth_context};

#[component]
pub fn PortalLayout(
    /// Page heading
    title: &'static str,
    children: Children,
) -> impl IntoView {
    let auth = use_auth_context();
    let home = move || {
        auth.user()
            .map(|u| u.role.dashboard_path())
            .unwrap_or("/")
            .to_string()
    };

    view! {
        <div class="min-h-screen bg-theme-primary flex flex-col">
            <header class="border-b border-theme">
                <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                    <div class="flex items-center justify-between h-16">
                        <A href=home attr:class="flex items-center gap-3 hover:opacity-80 transition-opacity">
                            <div class="w-8 h-8 bg-accent-primary rounded-lg flex items-center justify-center text-white font-bold">
                                "C"
                            </div>
                            <span class="text-xl font-bold text-theme-primary">"Campus Portal"</span>
                        </A>
                        <div class="flex items-center gap-3">
                            <AlertPanel />
                            <UserMenu />
                        </div>
                    </div>
                </div>
            </header>

            <main class="flex-1 w-full max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                <h1 class="text-2xl font-bold text-theme-primary mb-6">{title}</h1>
                {children()}
            </main>

            <footer class="py-4 border-t border-theme">
                <p class="text-center text-sm text-theme-tertiary">"Campus Portal"</p>
            </footer>
        </div>
    }
}

/// Titled card used to group page sections
#[component]
pub fn Section(title: &'static str, children: Children) -> impl IntoView {
    view! {
        <section class="bg-theme-secondary rounded-xl border border-theme p-5">
            <h2 class="text-lg font-semibold text-theme-primary mb-4">{title}</h2>
            {children()}
        </section>
    }
}
