//! Login form component

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::context::use_auth_context;
use crate::core::UserRecord;
use crate::ui::icon::{Icon, icons};

/// Username/password sign-in form
#[component]
pub fn LoginForm(
    /// Called with the signed-in user
    #[prop(optional, into)]
    on_success: Option<Callback<UserRecord>>,
    /// Callback to switch to the register form
    #[prop(optional, into)]
    on_register_click: Option<Callback<()>>,
) -> impl IntoView {
    let auth = use_auth_context();

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let show_password = RwSignal::new(false);

    let username_error = RwSignal::new(None::<String>);
    let password_error = RwSignal::new(None::<String>);

    let validate_username = move || {
        if username.get().trim().is_empty() {
            username_error.set(Some("Username is required".to_string()));
            false
        } else {
            username_error.set(None);
            true
        }
    };

    let validate_password = move || {
        if password.get().is_empty() {
            password_error.set(Some("Password is required".to_string()));
            false
        } else {
            password_error.set(None);
            true
        }
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        auth.clear_error();

        let username_valid = validate_username();
        let password_valid = validate_password();
        if !username_valid || !password_valid {
            return;
        }

        let username_val = username.get().trim().to_string();
        let password_val = password.get();

        spawn_local(async move {
            // Failures are shown through auth.error
            if let Ok(user) = auth.login(username_val, password_val).await
                && let Some(callback) = on_success
            {
                callback.run(user);
            }
        });
    };

    view! {
        <form on:submit=on_submit class="space-y-6">
            <div class="text-center">
                <h2 class="text-2xl font-bold text-theme-primary">"Welcome Back"</h2>
                <p class="mt-2 text-sm text-theme-secondary">
                    "Sign in with your university account"
                </p>
            </div>

            {move || {
                auth.error.get().map(|error| {
                    view! {
                        <div class="p-3 bg-red-100 dark:bg-red-900/30 border border-red-300 dark:border-red-700 rounded-lg">
                            <p class="text-sm text-red-700 dark:text-red-300">{error}</p>
                        </div>
                    }
                })
            }}

            <div>
                <label for="username" class="block text-sm font-medium text-theme-primary mb-1">
                    "Username"
                </label>
                <input
                    type="text"
                    id="username"
                    name="username"
                    autocomplete="username"
                    placeholder="e.g. jdoe"
                    class="w-full px-3 py-2 bg-theme-secondary border border-theme rounded-lg
                           text-theme-primary placeholder-theme-tertiary
                           focus:outline-none focus:ring-2 focus:ring-accent-primary focus:border-transparent
                           transition-colors"
                    class:border-red-500=move || username_error.get().is_some()
                    prop:value=move || username.get()
                    on:input=move |ev| {
                        username.set(event_target_value(&ev));
                        username_error.set(None);
                    }
                    on:blur=move |_| { validate_username(); }
                />
                {move || {
                    username_error.get().map(|error| {
                        view! { <p class="mt-1 text-sm text-red-500">{error}</p> }
                    })
                }}
            </div>

            <div>
                <label for="password" class="block text-sm font-medium text-theme-primary mb-1">
                    "Password"
                </label>
                <div class="relative">
                    <input
                        type=move || if show_password.get() { "text" } else { "password" }
                        id="password"
                        name="password"
                        autocomplete="current-password"
                        placeholder="Enter your password"
                        class="w-full px-3 py-2 pr-10 bg-theme-secondary border border-theme rounded-lg
                               text-theme-primary placeholder-theme-tertiary
                               focus:outline-none focus:ring-2 focus:ring-accent-primary focus:border-transparent
                               transition-colors"
                        class:border-red-500=move || password_error.get().is_some()
                        prop:value=move || password.get()
                        on:input=move |ev| {
                            password.set(event_target_value(&ev));
                            password_error.set(None);
                        }
                        on:blur=move |_| { validate_password(); }
                    />
                    <button
                        type="button"
                        class="absolute inset-y-0 right-0 pr-3 flex items-center text-theme-tertiary hover:text-theme-secondary"
                        on:click=move |_| show_password.update(|v| *v = !*v)
                    >
                        {move || {
                            let name = if show_password.get() { icons::EYE_CLOSED } else { icons::EYE };
                            view! { <Icon name=name class="h-5 w-5" /> }
                        }}
                    </button>
                </div>
                {move || {
                    password_error.get().map(|error| {
                        view! { <p class="mt-1 text-sm text-red-500">{error}</p> }
                    })
                }}
            </div>

            <button
                type="submit"
                class="w-full py-2.5 px-4 bg-accent-primary hover:bg-accent-primary-hover
                       text-white font-medium rounded-lg
                       focus:outline-none focus:ring-2 focus:ring-offset-2 focus:ring-accent-primary
                       disabled:opacity-50 disabled:cursor-not-allowed
                       transition-colors"
                disabled=move || auth.loading.get()
            >
                {move || {
                    if auth.loading.get() {
                        view! {
                            <span class="flex items-center justify-center">
                                <Icon name=icons::LOADER class="animate-spin -ml-1 mr-2 h-4 w-4 text-white" />
                                "Signing in..."
                            </span>
                        }.into_any()
                    } else {
                        view! { <span class="block">"Sign In"</span> }.into_any()
                    }
                }}
            </button>

            <div class="text-center text-sm text-theme-secondary">
                "Don't have an account? "
                <button
                    type="button"
                    class="text-accent-primary hover:text-accent-primary-hover font-medium"
                    on:click=move |_| {
                        if let Some(callback) = on_register_click.as_ref() {
                            callback.run(());
                        }
                    }
                >
                    "Sign up"
                </button>
            </div>
        </form>
    }
}
