//! Activity monitor component
//!
//! Feeds mouse, keyboard, visibility and navigation events into an
//! [`ActivityTracker`] and reports the buffered events every 5 seconds while
//! a user is signed in.

use leptos::prelude::*;
#[cfg(not(feature = "ssr"))]
use wasm_bindgen::JsCast;

use crate::core::ActivityTracker;

/// Tick interval for idle checks and reporting
pub const ACTIVITY_FLUSH_MS: u32 = 5_000;

/// Place once near the root of the application
#[component]
pub fn ActivityMonitor() -> impl IntoView {
    let tracker = StoredValue::new(ActivityTracker::new(chrono::Utc::now()));

    // Page views
    let location = leptos_router::hooks::use_location();
    Effect::new(move |_| {
        let path = location.pathname.get();
        tracker.update_value(|t| t.page_view(&path, chrono::Utc::now()));
    });

    #[cfg(not(feature = "ssr"))]
    {
        use crate::core::api::ActivityApi;
        use crate::ui::auth::use_auth_context;
        use gloo_timers::callback::Interval;
        use leptos::task::spawn_local;
        use wasm_bindgen::closure::Closure;

        let auth = use_auth_context();

        Effect::new(move |_| {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let mousemove = Closure::wrap(Box::new(move |_: web_sys::MouseEvent| {
                tracker.update_value(|t| t.record_activity(chrono::Utc::now()));
            }) as Box<dyn FnMut(web_sys::MouseEvent)>);

            let keydown = Closure::wrap(Box::new(move |_: web_sys::KeyboardEvent| {
                tracker.update_value(|t| t.record_activity(chrono::Utc::now()));
            }) as Box<dyn FnMut(web_sys::KeyboardEvent)>);

            let visibility_change = Closure::wrap(Box::new(move |_: web_sys::Event| {
                let hidden = web_sys::window()
                    .and_then(|w| w.document())
                    .is_some_and(|d| d.hidden());
                let now = chrono::Utc::now();
                tracker.update_value(|t| {
                    if hidden {
                        t.record_page_hidden(now);
                    } else {
                        t.record_page_visible(now);
                    }
                });
            }) as Box<dyn FnMut(web_sys::Event)>);

            let _ = document
                .add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref());
            let _ = document
                .add_event_listener_with_callback("keydown", keydown.as_ref().unchecked_ref());
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                visibility_change.as_ref().unchecked_ref(),
            );

            // Listeners stay registered for the life of the page
            mousemove.forget();
            keydown.forget();
            visibility_change.forget();

            let interval = Interval::new(ACTIVITY_FLUSH_MS, move || {
                tracker.update_value(|t| {
                    t.update(chrono::Utc::now());
                });

                if !auth.client().auth().is_logged_in() {
                    return;
                }

                let batch = tracker
                    .try_update_value(|t| t.drain())
                    .unwrap_or_default();
                if batch.is_empty() {
                    return;
                }

                spawn_local(async move {
                    let client = auth.client();
                    if let Err(e) = ActivityApi::new(&client).report(&batch).await {
                        if e.requires_login() {
                            auth.report(&e);
                        } else {
                            tracing::debug!("Activity report failed, keeping {} events", batch.len());
                            tracker.update_value(|t| t.requeue(batch));
                        }
                    }
                });
            });
            std::mem::forget(interval);
        });
    }

    view! { <div class="hidden"></div> }
}
