//! GeoIP 服务模块
//!
//! MMDB 查询管线的数据库一侧：
//! - `database`: 数据库读取接口（打开 / 查询）
//! - `maxmind`: 基于 maxminddb 的实现
//! - `holder`: 每个进程只解析一次数据库
//! - `normalize`: 原始记录 → 对外 JSON 结构

mod database;
mod holder;
mod maxmind;
mod normalize;
mod record;

pub use database::{DatabaseOpener, GeoDatabase};
pub use holder::{ReaderHandle, ReaderHolder};
pub use maxmind::{MaxMindDatabase, MaxMindOpener};
pub use normalize::{
    CityInfo, ContinentInfo, CountryInfo, ErrorResult, LocationInfo, LookupOutcome,
    NOT_FOUND_MESSAGE, NormalizedLocation, PostalInfo, SubdivisionInfo, lookup_and_normalize,
    normalize,
};
pub use record::{
    Names, RawCity, RawContinent, RawCountry, RawLocation, RawPostal, RawRecord, RawSubdivision,
};
