pub mod ip;

pub use ip::{IpAddress, IpKind, client_ip_from_headers, is_valid_ip, resolve_target_ip};
