//! Statik - single-host static content server
//!
//! Core library for request validation, path resolution and response composition.

pub mod config;
pub mod error;
pub mod http;
pub mod server;
pub mod site;
