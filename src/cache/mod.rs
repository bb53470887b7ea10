//! 边缘缓存
//!
//! 同一个 [`EdgeCache`] 后端承载两类数据，key 空间互不重叠：
//! - `mmdb/`: 数据库原始字节（[`DatabaseSource`]）
//! - `ip/`: 单个 IP 的查询结果（[`ResultCache`]）

pub mod backend;
pub mod blob;
pub mod keys;
pub mod result;
pub mod traits;

pub use backend::EdgeCacheFactory;
pub use blob::DatabaseSource;
pub use keys::{CacheKind, cache_key};
pub use result::ResultCache;
pub use traits::{CacheEntry, EdgeCache};
