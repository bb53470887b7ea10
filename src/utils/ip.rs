//! IP 地址处理工具
//!
//! 提供目标 IP 的解析与校验：
//! - 严格的 IPv4 / IPv6 文本格式校验
//! - 按优先级从转发头部提取客户端 IP
//! - 从 URL 路径提取待查询 IP

use std::fmt;
use std::net::{IpAddr, Ipv6Addr};

use actix_web::http::header::HeaderMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace};

use crate::errors::GeoError;

/// 转发头部，按可信度从高到低排列
pub const FORWARDING_HEADERS: [&str; 4] = [
    "CF-Connecting-IP",
    "X-Forwarded-For",
    "X-Real-IP",
    "X-Client-IP",
];

/// 没有任何可用头部时使用的回退地址
pub const FALLBACK_CLIENT_IP: &str = "127.0.0.1";

static IPV4_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
    .expect("IPv4 pattern is valid")
});

// 只接受完整的 8 组写法，以及 `::1` / `::` 两种简写
static IPV6_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$|^::1$|^::$")
        .expect("IPv6 pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpKind {
    V4,
    V6,
}

/// 已校验的 IP 地址
///
/// 只能通过 [`IpAddress::parse`] 构造，保存调用方给出的原始文本
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IpAddress {
    text: String,
    kind: IpKind,
}

impl IpAddress {
    pub fn parse(candidate: &str) -> Result<Self, GeoError> {
        let kind = if IPV4_RE.is_match(candidate) {
            IpKind::V4
        } else if IPV6_RE.is_match(candidate) {
            IpKind::V6
        } else {
            return Err(GeoError::validation("Invalid IP address format"));
        };

        Ok(Self {
            text: candidate.to_string(),
            kind,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> IpKind {
        self.kind
    }

    /// 转换为标准库地址，供数据库查询使用
    ///
    /// IPv4 允许前导零（如 `010.001.001.001`），标准库不接受，这里按十进制逐段解析
    pub fn to_ip_addr(&self) -> IpAddr {
        match self.kind {
            IpKind::V4 => {
                let mut octets = [0u8; 4];
                for (slot, part) in octets.iter_mut().zip(self.text.split('.')) {
                    // 正则已保证每段为 0..=255
                    *slot = part.parse().unwrap_or_default();
                }
                IpAddr::from(octets)
            }
            IpKind::V6 => match self.text.as_str() {
                "::" => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
                "::1" => IpAddr::V6(Ipv6Addr::LOCALHOST),
                full => {
                    let mut segments = [0u16; 8];
                    for (slot, part) in segments.iter_mut().zip(full.split(':')) {
                        *slot = u16::from_str_radix(part, 16).unwrap_or_default();
                    }
                    IpAddr::from(segments)
                }
            },
        }
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl Serialize for IpAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.text)
    }
}

impl<'de> Deserialize<'de> for IpAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        IpAddress::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// 检查字符串是否为合法 IP
pub fn is_valid_ip(candidate: &str) -> bool {
    IpAddress::parse(candidate).is_ok()
}

/// 从转发头部提取客户端 IP
///
/// 依次检查 [`FORWARDING_HEADERS`]，取每个头部逗号分隔的第一个值；
/// 第一个通过校验的即为结果，全部失败时回退到 `127.0.0.1`
pub fn client_ip_from_headers(headers: &HeaderMap) -> IpAddress {
    for name in FORWARDING_HEADERS {
        let Some(value) = headers.get(name).and_then(|h| h.to_str().ok()) else {
            continue;
        };

        // X-Forwarded-For 可能包含多个 IP，取第一个
        let first = value.split(',').next().unwrap_or_default().trim();
        match IpAddress::parse(first) {
            Ok(ip) => {
                trace!("Client IP {} taken from {}", ip, name);
                return ip;
            }
            Err(_) => debug!("Ignoring invalid {} value: {:?}", name, first),
        }
    }

    IpAddress {
        text: FALLBACK_CLIENT_IP.to_string(),
        kind: IpKind::V4,
    }
}

/// 根据请求路径确定要查询的 IP
///
/// - `/` 或空路径：查询调用方自身 IP（从头部解析，不会失败）
/// - `/<ip>`：路径剩余部分原样作为候选 IP，非法直接报错，不回退到头部
pub fn resolve_target_ip(path: &str, headers: &HeaderMap) -> Result<IpAddress, GeoError> {
    if path.is_empty() || path == "/" {
        return Ok(client_ip_from_headers(headers));
    }

    let candidate = path.strip_prefix('/').unwrap_or(path);
    IpAddress::parse(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header::{HeaderName, HeaderValue};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        map
    }

    #[test]
    fn test_ipv4_accepts_valid_addresses() {
        for ip in ["1.1.1.1", "8.8.8.8", "255.255.255.255", "0.0.0.0", "010.001.1.1"] {
            let parsed = IpAddress::parse(ip).unwrap();
            assert_eq!(parsed.kind(), IpKind::V4, "{}", ip);
            assert_eq!(parsed.as_str(), ip);
        }
    }

    #[test]
    fn test_ipv4_rejects_invalid_addresses() {
        for ip in [
            "256.1.1.1",
            "1.1.1",
            "1.1.1.1.1",
            "999.999.999.999",
            " 8.8.8.8",
            "8.8.8.8\n",
            "0001.1.1.1",
            "a.b.c.d",
            "",
        ] {
            assert!(IpAddress::parse(ip).is_err(), "{:?} should be rejected", ip);
        }
    }

    #[test]
    fn test_ipv6_accepts_full_form_and_shorthands() {
        for ip in [
            "2001:0db8:85a3:0000:0000:8a2e:0370:7334",
            "2001:db8:85a3:0:0:8a2e:370:7334",
            "FFFF:ffff:FfFf:0:0:0:0:1",
            "::1",
            "::",
        ] {
            let parsed = IpAddress::parse(ip).unwrap();
            assert_eq!(parsed.kind(), IpKind::V6, "{}", ip);
        }
    }

    #[test]
    fn test_ipv6_rejects_compressed_general_form() {
        for ip in [
            "2001:4860:4860::8888",
            "fe80::1",
            "::ffff:192.168.1.1",
            "2001:db8:85a3:0:0:8a2e:370",
            "2001:db8:85a3:0:0:8a2e:370:7334:1",
            "12345::",
            "fe80::1%eth0",
        ] {
            assert!(IpAddress::parse(ip).is_err(), "{:?} should be rejected", ip);
        }
    }

    #[test]
    fn test_to_ip_addr() {
        let v4 = IpAddress::parse("010.001.002.003").unwrap();
        assert_eq!(v4.to_ip_addr(), "10.1.2.3".parse::<IpAddr>().unwrap());

        let v6 = IpAddress::parse("2001:db8:0:0:0:0:0:1").unwrap();
        assert_eq!(v6.to_ip_addr(), "2001:db8::1".parse::<IpAddr>().unwrap());

        let loopback = IpAddress::parse("::1").unwrap();
        assert_eq!(loopback.to_ip_addr(), "::1".parse::<IpAddr>().unwrap());

        let unspecified = IpAddress::parse("::").unwrap();
        assert_eq!(unspecified.to_ip_addr(), "::".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_header_priority() {
        let map = headers(&[
            ("cf-connecting-ip", "8.8.8.8"),
            ("x-forwarded-for", "1.1.1.1"),
            ("x-real-ip", "9.9.9.9"),
        ]);
        assert_eq!(client_ip_from_headers(&map).as_str(), "8.8.8.8");
    }

    #[test]
    fn test_forwarded_for_takes_first_token() {
        let map = headers(&[("x-forwarded-for", " 203.0.113.7 , 10.0.0.1, 10.0.0.2")]);
        assert_eq!(client_ip_from_headers(&map).as_str(), "203.0.113.7");
    }

    #[test]
    fn test_invalid_header_falls_through_to_next() {
        let map = headers(&[
            ("cf-connecting-ip", "not-an-ip"),
            ("x-real-ip", "9.9.9.9"),
        ]);
        assert_eq!(client_ip_from_headers(&map).as_str(), "9.9.9.9");
    }

    #[test]
    fn test_no_headers_falls_back_to_loopback() {
        let ip = client_ip_from_headers(&HeaderMap::new());
        assert_eq!(ip.as_str(), FALLBACK_CLIENT_IP);

        let map = headers(&[("x-client-ip", "garbage")]);
        assert_eq!(client_ip_from_headers(&map).as_str(), FALLBACK_CLIENT_IP);
    }

    #[test]
    fn test_resolve_target_ip() {
        let map = headers(&[("x-client-ip", "4.4.4.4")]);

        assert_eq!(resolve_target_ip("/", &map).unwrap().as_str(), "4.4.4.4");
        assert_eq!(resolve_target_ip("", &map).unwrap().as_str(), "4.4.4.4");
        assert_eq!(resolve_target_ip("/1.1.1.1", &map).unwrap().as_str(), "1.1.1.1");
        assert_eq!(resolve_target_ip("/::1", &map).unwrap().as_str(), "::1");

        // 路径给出的 IP 非法时不回退到头部
        assert!(resolve_target_ip("/invalid-ip", &map).is_err());
        assert!(resolve_target_ip("/1.1.1.1/extra", &map).is_err());
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let ip = IpAddress::parse("1.2.3.4").unwrap();
        let json = serde_json::to_string(&ip).unwrap();
        assert_eq!(json, "\"1.2.3.4\"");
        assert_eq!(serde_json::from_str::<IpAddress>(&json).unwrap(), ip);
        assert!(serde_json::from_str::<IpAddress>("\"300.1.1.1\"").is_err());
    }
}
