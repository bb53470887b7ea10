pub mod cors;
pub mod request_id;

pub use cors::CorsHeaders;
pub use request_id::RequestIdMiddleware;
