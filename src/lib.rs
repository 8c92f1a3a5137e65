//! microapis - small HTTP micro-services behind one actix-web server
//!
//! # Services
//! - **Short URL**: validates a URL (parse + DNS), assigns the next integer
//!   id and redirects `/api/shorturl/{id}` back to it
//! - **File metadata**: reports name, type and size of an uploaded file
//! - **Exercise tracker**: users, exercises and filtered exercise logs
//!
//! # Architecture
//! - `services`: business logic (registry, resolver, exercise, file metadata)
//! - `storage`: exercise store trait and in-memory backend
//! - `api`: HTTP handlers and middleware
//! - `config`: static configuration (TOML + env)
//! - `runtime`: shared state, server mode, shutdown
//! - `system`: logging

#[macro_use]
mod metrics_macros;

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
#[cfg(feature = "metrics")]
pub mod metrics;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
