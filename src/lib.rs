//! OFITEC import front-end
//!
//! A server-rendered page that collects a spreadsheet and a project name
//! and forwards both to the OFITEC import API, showing the raw JSON answer
//! in a modal dialog.
//!
//! # Architecture
//!
//! - **Server**: Axum-based HTTP server rendering HTML pages
//! - **Import client**: reqwest multipart client for the remote API
//! - **UI**: server-side HTML + HTMX, degrading to plain form posts
//!
//! # Modules
//!
//! - [`layout`]: Page shell (metadata, header, content slot)
//! - [`upload`]: Upload form state, submit and markup
//! - [`client`]: Import API trait and HTTP implementation
//! - [`server`]: Router and handlers
//! - [`config`]: Layered configuration

#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::unused_async)]

pub mod client;
pub mod config;
pub mod error;
pub mod layout;
pub mod server;
pub mod upload;

use crate::client::ImportApi;
use crate::config::AppConfig;
use std::sync::Arc;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Client for the remote import API.
    pub importer: Arc<dyn ImportApi>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish()
    }
}
