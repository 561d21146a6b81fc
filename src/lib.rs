//! inksep - screen-print color separation service
//!
//! HTTP front end and CLI for the `ink_separation` engine.
//! This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
