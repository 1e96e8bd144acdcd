//! User menu component
//!
//! Shows sign-in links to visitors, and the user's name, role and actions to
//! signed-in users.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use super::context::{AuthState, use_auth_context};
use crate::core::UserRecord;
use crate::core::guard::LOGIN_PATH;
use crate::ui::icon::{Icon, icons};

/// User menu component for the header
#[component]
pub fn UserMenu() -> impl IntoView {
    let auth = use_auth_context();
    let menu_open = RwSignal::new(false);

    let handle_logout = move |_| {
        menu_open.set(false);
        let navigate = use_navigate();
        spawn_local(async move {
            auth.logout().await;
            navigate(LOGIN_PATH, Default::default());
        });
    };

    view! {
        <div class="relative">
            {move || match auth.state.get() {
                AuthState::Loading => view! {
                    <div class="w-8 h-8 rounded-full bg-theme-secondary animate-pulse"></div>
                }.into_any(),
                AuthState::Unauthenticated => view! {
                    <div class="flex items-center gap-2">
                        <A
                            href="/login"
                            attr:class="px-3 py-1.5 text-sm font-medium text-theme-secondary hover:text-theme-primary transition-colors"
                        >
                            "Sign In"
                        </A>
                        <A
                            href="/register"
                            attr:class="px-3 py-1.5 text-sm font-medium text-white bg-accent-primary hover:bg-accent-primary-hover rounded-lg transition-colors"
                        >
                            "Sign Up"
                        </A>
                    </div>
                }.into_any(),
                AuthState::Authenticated(user) => {
                    let dashboard = user.role.dashboard_path();
                    let menu_user = user.clone();
                    view! {
                        <button
                            class="flex items-center gap-2 p-1 rounded-lg hover:bg-theme-secondary transition-colors"
                            on:click=move |_| menu_open.update(|v| *v = !*v)
                        >
                            <UserAvatar user=user.clone() size=32 />
                            <span class="hidden sm:block text-sm font-medium text-theme-primary max-w-[120px] truncate">
                                {user.username.clone()}
                            </span>
                            <Icon name=icons::CHEVRON_DOWN class="h-4 w-4" />
                        </button>

                        <Show when=move || menu_open.get()>
                            <div class="absolute right-0 mt-2 w-56 bg-theme-primary rounded-lg shadow-lg border border-theme py-1 z-50">
                                <div class="px-4 py-3 border-b border-theme">
                                    <p class="text-sm font-medium text-theme-primary truncate">
                                        {menu_user.username.clone()}
                                    </p>
                                    <p class="text-xs text-theme-tertiary truncate">
                                        {format!("{} · {}", menu_user.role.display_name(), menu_user.email)}
                                    </p>
                                </div>
                                <div class="py-1">
                                    <A
                                        href=dashboard
                                        attr:class="w-full px-4 py-2 text-sm text-theme-primary hover:bg-theme-secondary flex items-center gap-2"
                                    >
                                        <Icon name=icons::HOME class="h-4 w-4" />
                                        "Dashboard"
                                    </A>
                                    <A
                                        href="/profile"
                                        attr:class="w-full px-4 py-2 text-sm text-theme-primary hover:bg-theme-secondary flex items-center gap-2"
                                    >
                                        <Icon name=icons::USER class="h-4 w-4" />
                                        "Profile"
                                    </A>
                                </div>
                                <div class="border-t border-theme my-1"></div>
                                <div class="py-1">
                                    <button
                                        class="w-full px-4 py-2 text-sm text-left text-red-500
                                               hover:bg-red-50 dark:hover:bg-red-900/20 transition-colors
                                               flex items-center gap-2"
                                        on:click=handle_logout
                                    >
                                        <Icon name=icons::LOGOUT class="h-4 w-4" />
                                        "Sign Out"
                                    </button>
                                </div>
                            </div>
                        </Show>
                    }.into_any()
                }
            }}
        </div>
    }
}

/// Initial-letter avatar with a colour derived from the username
#[component]
pub fn UserAvatar(
    user: UserRecord,
    /// Avatar size in pixels
    #[prop(default = 32)]
    size: u32,
) -> impl IntoView {
    let initial = user
        .username
        .chars()
        .next()
        .unwrap_or('?')
        .to_uppercase()
        .to_string();

    let hash = user
        .username
        .bytes()
        .fold(0u32, |acc, b| acc.wrapping_add(b as u32));
    let colors = [
        "bg-blue-500",
        "bg-green-500",
        "bg-yellow-500",
        "bg-red-500",
        "bg-purple-500",
        "bg-teal-500",
    ];
    let color = colors[(hash as usize) % colors.len()];
    let font_size = if size >= 40 { "text-lg" } else { "text-sm" };

    view! {
        <div
            class=format!("{} rounded-full flex items-center justify-center text-white font-medium {}", color, font_size)
            style=format!("width: {0}px; height: {0}px; min-width: {0}px;", size)
        >
            {initial}
        </div>
    }
}
