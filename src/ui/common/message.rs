//! Reusable message components for errors, warnings and confirmations

use crate::ui::{Icon, icons};
use leptos::prelude::*;

/// Error message, shown while `error` is `Some`
#[component]
pub fn ErrorMessage(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some()>
            <div class="flex items-center gap-2 p-3 rounded-lg bg-red-100 dark:bg-red-900/30 text-sm text-red-700 dark:text-red-300">
                <Icon name=icons::ALERT_CIRCLE class="h-4 w-4"/>
                <span>{move || error.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

/// Success message, shown while `message` is `Some`
#[component]
pub fn SuccessMessage(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.get().is_some()>
            <div class="flex items-center gap-2 p-3 rounded-lg bg-green-100 dark:bg-green-900/30 text-sm text-green-700 dark:text-green-300">
                <Icon name=icons::CHECK class="h-4 w-4"/>
                <span>{move || message.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}

/// Static error message (always visible)
#[component]
pub fn ErrorMessageStatic(message: String) -> impl IntoView {
    view! {
        <div class="flex items-center gap-2 p-3 rounded-lg bg-red-100 dark:bg-red-900/30 text-sm text-red-700 dark:text-red-300">
            <Icon name=icons::ALERT_CIRCLE class="h-4 w-4"/>
            <span>{message}</span>
        </div>
    }
}

/// Static warning message (always visible)
#[component]
pub fn WarningMessageStatic(message: String) -> impl IntoView {
    view! {
        <div class="flex items-center gap-2 p-3 rounded-lg bg-yellow-100 dark:bg-yellow-900/30 text-sm text-yellow-800 dark:text-yellow-200">
            <Icon name=icons::WARNING class="h-4 w-4"/>
            <span>{message}</span>
        </div>
    }
}
