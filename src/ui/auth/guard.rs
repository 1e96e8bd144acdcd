//! Page guard component
//!
//! Renders its children only once the [`RouteTable`] authorizes the current
//! URL for the stored session; otherwise navigates to the redirect target.
//! The decision is made in the browser after hydration, so the server always
//! renders the placeholder.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use super::context::{AuthState, use_auth_context};
use crate::core::guard::{GuardState, RouteTable, page_url};
use crate::ui::common::LoadingSpinner;

#[component]
pub fn RequireAccess(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth_context();
    let location = use_location();
    let table = StoredValue::new(RouteTable::standard());
    let guard = RwSignal::new(GuardState::Unchecked);

    Effect::new(move |_| {
        if auth.state.get() == AuthState::Loading {
            return;
        }

        let url = page_url(&location.pathname.get(), &location.search.get());
        let session = auth.client().auth().current_session();
        let state = table.with_value(|table| table.check(&url, session.as_ref()));

        if let Some(target) = state.redirect_target() {
            let navigate = use_navigate();
            navigate(
                &target,
                NavigateOptions {
                    replace: true,
                    ..Default::default()
                },
            );
        }
        guard.set(state);
    });

    view! {
        <Show
            when=move || guard.get().is_authorized()
            fallback=|| view! { <LoadingSpinner label="Checking access..." /> }
        >
            {children()}
        </Show>
    }
}
