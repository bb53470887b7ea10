//! Service layer
//!
//! Lookup logic shared by the HTTP handler and the CLI `lookup` command.

pub mod geoip;
mod locator;

pub use geoip::{
    DatabaseOpener, GeoDatabase, LookupOutcome, MaxMindOpener, NormalizedLocation, ReaderHolder,
};
pub use locator::GeoLocator;
