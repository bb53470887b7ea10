//! HTTP surface: lookup handler and middleware

pub mod middleware;
pub mod services;
