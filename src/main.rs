//! NTU-CODER Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod credentials;
mod error;
mod markdown;
mod models;
mod notify;
mod pages;
mod progress;
mod query;
mod routes;
mod sanitize;
mod session;
mod store;
mod validation;

use app::App;
use config::AppConfig;
use leptos::prelude::*;
use wasm_bindgen::prelude::wasm_bindgen;

/// Recent log records kept for inspection from the console
const LOG_BUFFER: usize = 200;

/// Recent log records as text, for `wasm_bindgen.ntu_recent_logs()` in devtools
#[wasm_bindgen]
pub fn ntu_recent_logs() -> String {
    console_logger::format_entries(&console_logger::recent_records())
}

fn main() {
    console_error_panic_hook::set_once();

    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };
    let level = config.level_filter().unwrap_or(log::LevelFilter::Info);
    if let Err(e) = console_logger::init(level, LOG_BUFFER) {
        web_sys::console::error_1(&format!("[APP] logger already set: {}", e).into());
    }
    if let Some(e) = config_error {
        log::error!("[CONFIG] {}; falling back to defaults", e);
    }
    log::info!("[APP] starting, api at {}", config.api_base_url);

    mount_to_body(move || view! { <App config=config /> });
}
