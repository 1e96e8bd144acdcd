//! Register form component
//!
//! Client-side checks run first; anything the backend rejects comes back as
//! per-field messages and is shown under the matching input.

use leptos::prelude::*;
use leptos::task::spawn_local;

use super::context::use_auth_context;
use crate::core::{Registration, RegistrationData, Role};
use crate::ui::icon::{Icon, icons};

const MIN_PASSWORD_LEN: usize = 8;

/// Labelled input showing a local error or the backend's messages for `name`
#[component]
fn FormField(
    name: &'static str,
    label: &'static str,
    #[prop(default = "text")] input_type: &'static str,
    #[prop(default = "")] autocomplete: &'static str,
    value: RwSignal<String>,
    error: RwSignal<Option<String>>,
) -> impl IntoView {
    let auth = use_auth_context();

    let messages = move || {
        let mut messages: Vec<String> = error.get().into_iter().collect();
        if let Some(server) = auth.field_errors.get().get(name) {
            messages.extend(server.iter().cloned());
        }
        messages
    };

    view! {
        <div>
            <label for=name class="block text-sm font-medium text-theme-primary mb-1">
                {label}
            </label>
            <input
                type=input_type
                id=name
                name=name
                autocomplete=autocomplete
                class="w-full px-3 py-2 bg-theme-secondary border border-theme rounded-lg
                       text-theme-primary placeholder-theme-tertiary
                       focus:outline-none focus:ring-2 focus:ring-accent-primary focus:border-transparent
                       transition-colors"
                class:border-red-500=move || !messages().is_empty()
                prop:value=move || value.get()
                on:input=move |ev| {
                    value.set(event_target_value(&ev));
                    error.set(None);
                    auth.field_errors.update(|fields| { fields.remove(name); });
                }
            />
            <For
                each=messages
                key=|message| message.clone()
                children=|message| view! { <p class="mt-1 text-sm text-red-500">{message}</p> }
            />
        </div>
    }
}

/// Account registration form
#[component]
pub fn RegisterForm(
    /// Called once the backend has accepted the registration
    #[prop(optional, into)]
    on_success: Option<Callback<Registration>>,
    /// Callback to switch to the login form
    #[prop(optional, into)]
    on_login_click: Option<Callback<()>>,
) -> impl IntoView {
    let auth = use_auth_context();

    let username = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm_password = RwSignal::new(String::new());
    let role = RwSignal::new(Role::Student);

    let username_error = RwSignal::new(None::<String>);
    let email_error = RwSignal::new(None::<String>);
    let password_error = RwSignal::new(None::<String>);
    let confirm_error = RwSignal::new(None::<String>);

    let validate = move || {
        let mut valid = true;

        if username.get().trim().is_empty() {
            username_error.set(Some("Username is required".to_string()));
            valid = false;
        }

        let email_val = email.get();
        if email_val.is_empty() {
            email_error.set(Some("Email is required".to_string()));
            valid = false;
        } else if !email_val.contains('@') || !email_val.contains('.') {
            email_error.set(Some("Please enter a valid email".to_string()));
            valid = false;
        }

        if password.get().len() < MIN_PASSWORD_LEN {
            password_error.set(Some(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
            valid = false;
        }

        if confirm_password.get() != password.get() {
            confirm_error.set(Some("Passwords do not match".to_string()));
            valid = false;
        }

        valid
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        auth.clear_error();

        if !validate() {
            return;
        }

        let data = RegistrationData::new(
            username.get().trim(),
            email.get().trim(),
            password.get(),
            role.get(),
        );

        spawn_local(async move {
            if let Ok(registration) = auth.register(data).await
                && let Some(callback) = on_success
            {
                callback.run(registration);
            }
        });
    };

    view! {
        <form on:submit=on_submit class="space-y-5">
            <div class="text-center">
                <h2 class="text-2xl font-bold text-theme-primary">"Create Account"</h2>
                <p class="mt-2 text-sm text-theme-secondary">
                    "Register for the campus portal"
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

            <FormField name="username" label="Username" autocomplete="username"
                value=username error=username_error />
            <FormField name="email" label="Email" input_type="email" autocomplete="email"
                value=email error=email_error />
            <FormField name="password" label="Password" input_type="password"
                autocomplete="new-password" value=password error=password_error />
            <FormField name="confirm_password" label="Confirm password" input_type="password"
                autocomplete="new-password" value=confirm_password error=confirm_error />

            <div>
                <label for="role" class="block text-sm font-medium text-theme-primary mb-1">
                    "I am a"
                </label>
                <select
                    id="role"
                    name="role"
                    class="w-full px-3 py-2 bg-theme-secondary border border-theme rounded-lg text-theme-primary"
                    on:change=move |ev| {
                        if let Ok(selected) = event_target_value(&ev).parse::<Role>() {
                            role.set(selected);
                        }
                    }
                >
                    <option value="student" selected=move || role.get() == Role::Student>
                        "Student"
                    </option>
                    <option value="faculty" selected=move || role.get() == Role::Faculty>
                        "Faculty"
                    </option>
                </select>
            </div>

            <button
                type="submit"
                class="w-full py-2.5 px-4 bg-accent-primary hover:bg-accent-primary-hover
                       text-white font-medium rounded-lg
                       disabled:opacity-50 disabled:cursor-not-allowed transition-colors"
                disabled=move || auth.loading.get()
            >
                {move || {
                    if auth.loading.get() {
                        view! {
                            <span class="flex items-center justify-center">
                                <Icon name=icons::LOADER class="animate-spin -ml-1 mr-2 h-4 w-4 text-white" />
                                "Creating account..."
                            </span>
                        }.into_any()
                    } else {
                        view! { <span class="block">"Create Account"</span> }.into_any()
                    }
                }}
            </button>

            <div class="text-center text-sm text-theme-secondary">
                "Already registered? "
                <button
                    type="button"
                    class="text-accent-primary hover:text-accent-primary-hover font-medium"
                    on:click=move |_| {
                        if let Some(callback) = on_login_click.as_ref() {
                            callback.run(());
                        }
                    }
                >
                    "Sign in"
                </button>
            </div>
        </form>
    }
}
