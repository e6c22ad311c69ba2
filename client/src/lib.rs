//! # client
//!
//! Leptos + WASM frontend for the card approval-odds site.
//!
//! This crate contains pages, components, the session context that wraps the
//! `session` crate's store, and thin REST helpers for the backend data
//! service. Under `ssr` it renders on the server; under `hydrate` it takes
//! over in the browser and talks to the identity provider.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: attach the app to the server-rendered markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
