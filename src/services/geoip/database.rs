use bytes::Bytes;

use super::record::RawRecord;
use crate::errors::Result;
use crate::utils::IpAddress;

/// 已解析的地理位置数据库
///
/// 查询是纯内存操作，可在多个请求之间并发调用
pub trait GeoDatabase: Send + Sync {
    /// 查询 IP 对应的记录，数据库未覆盖时返回 `Ok(None)`
    fn lookup(&self, ip: &IpAddress) -> Result<Option<RawRecord>>;

    /// 数据库类型（如 `GeoLite2-City`），用于日志
    fn database_type(&self) -> &str;
}

/// 从原始字节构造数据库
pub trait DatabaseOpener: Send + Sync {
    fn open(&self, data: Bytes) -> Result<Box<dyn GeoDatabase>>;
}
