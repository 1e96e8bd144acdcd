//! Campus Portal - student, faculty and admin web portal
//!
//! The authenticated API-access layer (sessions, token refresh, route
//! guarding, per-area data calls) lives in [`core`]; the Leptos views that
//! use it live in [`ui`].

#![recursion_limit = "4096"]

pub mod app;
pub mod core;
pub mod ui;

#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    use crate::app::*;
    console_error_panic_hook::set_once();
    leptos::mount::hydrate_body(App);
}
