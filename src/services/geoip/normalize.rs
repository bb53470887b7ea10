//! 查询结果规范化
//!
//! 输出结构固定：所有顶层分组总是存在，缺失的叶子字段序列化为 `null`，
//! `subdivisions` 缺失时为空数组

use serde::{Deserialize, Serialize};
use tracing::error;

use super::database::GeoDatabase;
use super::record::{Names, RawRecord};
use crate::utils::IpAddress;

pub const NOT_FOUND_MESSAGE: &str = "IP not found in database";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedLocation {
    pub ip: IpAddress,
    pub country: CountryInfo,
    pub city: CityInfo,
    pub subdivisions: Vec<SubdivisionInfo>,
    pub location: LocationInfo,
    pub postal: PostalInfo,
    pub continent: ContinentInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryInfo {
    pub iso_code: Option<String>,
    pub name: Option<String>,
    pub name_zh: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CityInfo {
    pub name: Option<String>,
    pub name_zh: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubdivisionInfo {
    pub iso_code: Option<String>,
    pub name: Option<String>,
    pub name_zh: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub accuracy_radius: Option<u32>,
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostalInfo {
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContinentInfo {
    pub code: Option<String>,
    pub name: Option<String>,
    pub name_zh: Option<String>,
}

/// 查询失败时的响应体（仍以 200 返回）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub ip: IpAddress,
    pub error: String,
}

/// 单次查询的结果
///
/// 序列化时不带标签，直接输出两种结构之一
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LookupOutcome {
    Found(NormalizedLocation),
    Error(ErrorResult),
}

impl LookupOutcome {
    pub fn ip(&self) -> &IpAddress {
        match self {
            LookupOutcome::Found(location) => &location.ip,
            LookupOutcome::Error(result) => &result.ip,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found(_))
    }
}

impl From<NormalizedLocation> for LookupOutcome {
    fn from(location: NormalizedLocation) -> Self {
        LookupOutcome::Found(location)
    }
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.filter(|s| !s.is_empty()).cloned()
}

fn english_name(names: Option<&Names>) -> Option<String> {
    names.and_then(|n| non_empty(n.get("en")))
}

// zh-CN 优先，其次 zh
fn chinese_name(names: Option<&Names>) -> Option<String> {
    names.and_then(|n| non_empty(n.get("zh-CN")).or_else(|| non_empty(n.get("zh"))))
}

/// 将数据库记录转换为对外结构
///
/// `record` 为 `None` 表示数据库未覆盖该 IP
pub fn normalize(record: Option<RawRecord>, ip: &IpAddress) -> LookupOutcome {
    let Some(record) = record else {
        return LookupOutcome::Error(ErrorResult {
            ip: ip.clone(),
            error: NOT_FOUND_MESSAGE.to_string(),
        });
    };

    let country = record
        .country
        .map(|c| CountryInfo {
            iso_code: non_empty(c.iso_code.as_ref()),
            name: english_name(c.names.as_ref()),
            name_zh: chinese_name(c.names.as_ref()),
        })
        .unwrap_or_default();

    let city = record
        .city
        .map(|c| CityInfo {
            name: english_name(c.names.as_ref()),
            name_zh: chinese_name(c.names.as_ref()),
        })
        .unwrap_or_default();

    let subdivisions = record
        .subdivisions
        .unwrap_or_default()
        .into_iter()
        .map(|s| SubdivisionInfo {
            iso_code: non_empty(s.iso_code.as_ref()),
            name: english_name(s.names.as_ref()),
            name_zh: chinese_name(s.names.as_ref()),
        })
        .collect();

    let location = record
        .location
        .map(|l| LocationInfo {
            latitude: l.latitude,
            longitude: l.longitude,
            accuracy_radius: l.accuracy_radius,
            time_zone: non_empty(l.time_zone.as_ref()),
        })
        .unwrap_or_default();

    let postal = record
        .postal
        .map(|p| PostalInfo {
            code: non_empty(p.code.as_ref()),
        })
        .unwrap_or_default();

    let continent = record
        .continent
        .map(|c| ContinentInfo {
            code: non_empty(c.code.as_ref()),
            name: english_name(c.names.as_ref()),
            name_zh: chinese_name(c.names.as_ref()),
        })
        .unwrap_or_default();

    LookupOutcome::Found(NormalizedLocation {
        ip: ip.clone(),
        country,
        city,
        subdivisions,
        location,
        postal,
        continent,
    })
}

/// 查询并规范化
///
/// 数据库查询出错不会向上传播，而是转换为带 `error` 字段的结果
pub fn lookup_and_normalize(db: &dyn GeoDatabase, ip: &IpAddress) -> LookupOutcome {
    match db.lookup(ip) {
        Ok(record) => normalize(record, ip),
        Err(e) => {
            error!("Error looking up IP {}: {}", ip, e);
            LookupOutcome::Error(ErrorResult {
                ip: ip.clone(),
                error: format!("Failed to lookup IP: {}", e),
            })
        }
    }
}
