//! Header alert panel
//!
//! Bell button with the unread count and a dropdown of the user's alerts.
//! Alerts are polled every 30 seconds while someone is signed in.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::core::api::{Alert, AlertSeverity, AlertsApi};
use crate::ui::auth::{AuthContext, AuthState, use_auth_context};
use crate::ui::icon::{Icon, icons};

/// Poll interval for new alerts
pub const ALERT_POLL_MS: u32 = 30_000;

/// Keep `value` alive until the current reactive owner is cleaned up, then
/// drop it. Used for timers that must stop when their component unmounts.
#[cfg_attr(feature = "ssr", allow(dead_code))]
pub(crate) fn keep_until_cleanup<T: 'static>(value: T) {
    let held = StoredValue::new_local(Some(value));
    on_cleanup(move || {
        held.try_update_value(|slot| slot.take());
    });
}

#[derive(Clone, Copy)]
struct AlertStore {
    auth: AuthContext,
    alerts: RwSignal<Vec<Alert>>,
    error: RwSignal<Option<String>>,
}

impl AlertStore {
    fn reload(self) {
        if !matches!(self.auth.state.get_untracked(), AuthState::Authenticated(_)) {
            self.alerts.set(Vec::new());
            return;
        }

        spawn_local(async move {
            let client = self.auth.client();
            match AlertsApi::new(&client).list().await {
                Ok(list) => {
                    self.alerts.set(list);
                    self.error.set(None);
                }
                Err(e) => self.error.set(Some(self.auth.report(&e))),
            }
        });
    }

    fn mark_read(self, id: String) {
        self.alerts.update(|list| {
            if let Some(alert) = list.iter_mut().find(|a| a.id == id) {
                alert.read = true;
            }
        });
        spawn_local(async move {
            let client = self.auth.client();
            if let Err(e) = AlertsApi::new(&client).mark_read(&id).await {
                self.error.set(Some(self.auth.report(&e)));
                self.reload();
            }
        });
    }

    fn mark_all_read(self) {
        self.alerts
            .update(|list| list.iter_mut().for_each(|a| a.read = true));
        spawn_local(async move {
            let client = self.auth.client();
            if let Err(e) = AlertsApi::new(&client).mark_all_read().await {
                self.error.set(Some(self.auth.report(&e)));
                self.reload();
            }
        });
    }

    fn dismiss(self, id: String) {
        self.alerts.update(|list| list.retain(|a| a.id != id));
        spawn_local(async move {
            let client = self.auth.client();
            if let Err(e) = AlertsApi::new(&client).dismiss(&id).await {
                self.error.set(Some(self.auth.report(&e)));
                self.reload();
            }
        });
    }
}

fn severity_classes(severity: AlertSeverity) -> &'static str {
    match severity {
        AlertSeverity::Info => "border-l-4 border-blue-500",
        AlertSeverity::Success => "border-l-4 border-green-500",
        AlertSeverity::Warning => "border-l-4 border-yellow-500",
        AlertSeverity::Critical => "border-l-4 border-red-500",
    }
}

#[component]
pub fn AlertPanel() -> impl IntoView {
    let auth = use_auth_context();
    let store = AlertStore {
        auth,
        alerts: RwSignal::new(Vec::new()),
        error: RwSignal::new(None),
    };
    let open = RwSignal::new(false);

    // Reload whenever the signed-in user changes
    Effect::new(move |_| {
        auth.state.track();
        store.reload();
    });

    #[cfg(not(feature = "ssr"))]
    {
        use gloo_timers::callback::Interval;

        // Dropping the interval cancels it, so polling stops with the panel
        keep_until_cleanup(Interval::new(ALERT_POLL_MS, move || store.reload()));
    }

    let unread = move || store.alerts.with(|list| list.iter().filter(|a| !a.read).count());

    view! {
        <Show when=move || auth.is_authenticated()>
            <div class="relative">
                <button
                    class="relative p-2 rounded-lg hover:bg-theme-secondary transition-colors"
                    title="Alerts"
                    on:click=move |_| open.update(|v| *v = !*v)
                >
                    <Icon name=icons::BELL class="h-5 w-5" />
                    <Show when=move || { unread() > 0 }>
                        <span class="absolute -top-0.5 -right-0.5 min-w-[1.1rem] h-[1.1rem] px-1 rounded-full
                                     bg-red-500 text-white text-[10px] leading-[1.1rem] text-center">
                            {unread}
                        </span>
                    </Show>
                </button>

                <Show when=move || open.get()>
                    <div class="absolute right-0 mt-2 w-80 max-h-96 overflow-y-auto bg-theme-primary
                                rounded-lg shadow-lg border border-theme z-50">
                        <div class="flex items-center justify-between px-4 py-2 border-b border-theme">
                            <span class="text-sm font-medium text-theme-primary">"Alerts"</span>
                            <button
                                class="text-xs text-accent-primary hover:text-accent-primary-hover disabled:opacity-50"
                                disabled=move || unread() == 0
                                on:click=move |_| store.mark_all_read()
                            >
                                "Mark all read"
                            </button>
                        </div>

                        {move || store.error.get().map(|error| view! {
                            <p class="px-4 py-2 text-xs text-red-500">{error}</p>
                        })}

                        <Show
                            when=move || store.alerts.with(|list| !list.is_empty())
                            fallback=|| view! {
                                <p class="px-4 py-6 text-sm text-center text-theme-tertiary">"No alerts"</p>
                            }
                        >
                            <For
                                each=move || store.alerts.get()
                                key=|alert| (alert.id.clone(), alert.read)
                                children=move |alert| {
                                    let read_id = alert.id.clone();
                                    let dismiss_id = alert.id.clone();
                                    let is_read = alert.read;
                                    let when = alert
                                        .created_at
                                        .map(|at| at.format("%b %e, %H:%M").to_string())
                                        .unwrap_or_default();
                                    view! {
                                        <div
                                            class=format!("px-4 py-3 border-b border-theme last:border-0 {}", severity_classes(alert.severity))
                                            class:opacity-60=is_read
                                        >
                                            <div class="flex items-start justify-between gap-2">
                                                <div class="min-w-0">
                                                    <p class="text-sm font-medium text-theme-primary">{alert.title.clone()}</p>
                                                    <p class="text-xs text-theme-secondary mt-0.5">{alert.message.clone()}</p>
                                                    <p class="text-[10px] text-theme-tertiary mt-1">
                                                        {format!("{} {}", alert.severity.display_name(), when)}
                                                    </p>
                                                </div>
                                                <div class="flex items-center gap-1">
                                                    <Show when=move || !is_read>
                                                        <button
                                                            class="p-1 rounded hover:bg-theme-secondary"
                                                            title="Mark read"
                                                            on:click={
                                                                let id = read_id.clone();
                                                                move |_| store.mark_read(id.clone())
                                                            }
                                                        >
                                                            <Icon name=icons::CHECK class="h-4 w-4" />
                                                        </button>
                                                    </Show>
                                                    <button
                                                        class="p-1 rounded hover:bg-theme-secondary"
                                                        title="Dismiss"
                                                        on:click=move |_| store.dismiss(dismiss_id.clone())
                                                    >
                                                        <Icon name=icons::X class="h-4 w-4" />
                                                    </button>
                                                </div>
                                            </div>
                                        </div>
                                    }
                                }
                            />
                        </Show>
                    </div>
                </Show>
            </div>
        </Show>
    }
}
