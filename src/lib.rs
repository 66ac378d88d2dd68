// ABOUTME: Library root for cfkit - a Cloud Foundry v3 client and push orchestrator.
// ABOUTME: The cfkit binary is in main.rs.

pub mod api;
pub mod archive;
pub mod cf_cli;
pub mod config;
pub mod deploy;
pub mod error;
pub mod model;
pub mod output;
pub mod service;
pub mod types;
