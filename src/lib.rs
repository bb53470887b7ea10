//! Geolocator - IP geolocation lookup service
//!
//! Resolves an IP address (the caller's own, or one given in the URL path) to
//! geolocation attributes using a MaxMind-format `.mmdb` database that is
//! fetched from an object store once, cached, and parsed once per process.
//!
//! # Architecture
//! - `storage`: Object store backends holding the database file (file, http)
//! - `cache`: Edge cache backends (memory, redis, null), database blob cache
//!   and per-IP result cache
//! - `services`: Database reader, reader holder, response normalizer and the
//!   lookup pipeline
//! - `api`: HTTP handler and middleware (CORS, request id)
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod api;
pub mod cache;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
