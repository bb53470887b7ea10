//! 缓存 key 生成
//!
//! key 形如 `https://cache.internal/<kind>/<identifier>`。kind 固定且不含 `/`，
//! 因此不同 `(kind, identifier)` 不会映射到同一个 key。

use std::fmt;

const CACHE_KEY_BASE: &str = "https://cache.internal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// MMDB 原始字节
    Mmdb,
    /// 单个 IP 的查询结果
    Ip,
}

impl CacheKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheKind::Mmdb => "mmdb",
            CacheKind::Ip => "ip",
        }
    }
}

impl fmt::Display for CacheKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn cache_key(kind: CacheKind, identifier: &str) -> String {
    format!("{}/{}/{}", CACHE_KEY_BASE, kind, identifier)
}
