pub mod lookup;

pub use lookup::{LookupService, RESPONSE_MAX_AGE, lookup_routes};
