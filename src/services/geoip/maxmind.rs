//! MaxMind MMDB 实现
//!
//! 直接在内存中的字节上构造 Reader，不落盘

use bytes::Bytes;
use maxminddb::Reader;
use tracing::trace;

use super::database::{DatabaseOpener, GeoDatabase};
use super::record::RawRecord;
use crate::errors::{GeoError, Result};
use crate::utils::IpAddress;

pub struct MaxMindDatabase {
    reader: Reader<Bytes>,
}

impl MaxMindDatabase {
    pub fn from_bytes(data: Bytes) -> Result<Self> {
        let reader =
            Reader::from_source(data).map_err(|e| GeoError::reader_init(e.to_string()))?;
        Ok(Self { reader })
    }
}

impl GeoDatabase for MaxMindDatabase {
    fn lookup(&self, ip: &IpAddress) -> Result<Option<RawRecord>> {
        let result = self.reader.lookup(ip.to_ip_addr())?;
        if !result.has_data() {
            trace!("MaxMind lookup for {}: no data", ip);
            return Ok(None);
        }

        let record: Option<RawRecord> = result.decode()?;
        trace!("MaxMind lookup for {}: found={}", ip, record.is_some());
        Ok(record)
    }

    fn database_type(&self) -> &str {
        &self.reader.metadata.database_type
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaxMindOpener;

impl DatabaseOpener for MaxMindOpener {
    fn open(&self, data: Bytes) -> Result<Box<dyn GeoDatabase>> {
        Ok(Box::new(MaxMindDatabase::from_bytes(data)?))
    }
}
