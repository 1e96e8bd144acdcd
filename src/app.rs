use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::core::PortalClient;
use crate::ui::ActivityMonitor;
use crate::ui::auth::{RequireAccess, provide_auth_context};
use crate::ui::pages::{
    AdminDashboardPage, FacultyDashboardPage, HomePage, LoginPage, NotFoundPage, ProfilePage,
    RegisterPage, StudentDashboardPage,
};

pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone() />
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Server renders get a fresh client with an empty session; credentials only
/// ever live in the browser
#[cfg(feature = "ssr")]
fn portal_client() -> Arc<PortalClient> {
    use crate::core::{MemoryTokenStore, ReqwestTransport};

    let transport = expect_context::<ReqwestTransport>();
    Arc::new(PortalClient::new(transport, MemoryTokenStore::new()))
}

#[cfg(not(feature = "ssr"))]
fn portal_client() -> Arc<PortalClient> {
    use crate::core::{BrowserTokenStore, BrowserTransport};

    Arc::new(PortalClient::new(BrowserTransport, BrowserTokenStore))
}

#[component]
pub fn App() -> impl IntoView {
    // Provides context that manages stylesheets, titles, meta tags, etc.
    provide_meta_context();

    provide_auth_context(portal_client());

    view! {
        // id=leptos means cargo-leptos will hot-reload this stylesheet
        <Stylesheet id="leptos" href="/pkg/campus-portal.css"/>

        <Title text="Campus Portal"/>

        <Router>
            <ActivityMonitor />
            <Routes fallback=|| view! { <NotFoundPage /> }>
                <Route path=path!("/") view=HomePage />
                <Route path=path!("/login") view=LoginPage />
                <Route path=path!("/register") view=RegisterPage />
                <Route
                    path=path!("/student/dashboard")
                    view=|| view! { <RequireAccess><StudentDashboardPage /></RequireAccess> }
                />
                <Route
                    path=path!("/faculty/dashboard")
                    view=|| view! { <RequireAccess><FacultyDashboardPage /></RequireAccess> }
                />
                <Route
                    path=path!("/admin/dashboard")
                    view=|| view! { <RequireAccess><AdminDashboardPage /></RequireAccess> }
                />
                <Route
                    path=path!("/profile")
                    view=|| view! { <RequireAccess><ProfilePage /></RequireAccess> }
                />
            </Routes>
        </Router>
    }
}
