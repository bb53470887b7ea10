//! MMDB City 记录的解码结构
//!
//! 只声明用到的字段，其余字段（geoname_id、registered_country 等）解码时忽略。
//! 名称表保留全部 locale，以便 `zh-CN` 缺失时回退到 `zh`

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// locale → 名称
pub type Names = HashMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub country: Option<RawCountry>,
    #[serde(default)]
    pub city: Option<RawCity>,
    #[serde(default)]
    pub subdivisions: Option<Vec<RawSubdivision>>,
    #[serde(default)]
    pub location: Option<RawLocation>,
    #[serde(default)]
    pub postal: Option<RawPostal>,
    #[serde(default)]
    pub continent: Option<RawContinent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCountry {
    #[serde(default)]
    pub iso_code: Option<String>,
    #[serde(default)]
    pub names: Option<Names>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCity {
    #[serde(default)]
    pub names: Option<Names>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSubdivision {
    #[serde(default)]
    pub iso_code: Option<String>,
    #[serde(default)]
    pub names: Option<Names>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLocation {
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub accuracy_radius: Option<u32>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPostal {
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawContinent {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub names: Option<Names>,
}
