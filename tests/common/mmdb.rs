//! Minimal MaxMind DB writer for test fixtures
//!
//! Produces an IPv6 database with 24-bit records. IPv4 networks are placed
//! under `::/96`, where readers look them up. Inserted networks must not
//! overlap.

use std::net::IpAddr;

use bytes::Bytes;

const METADATA_MARKER: &[u8] = b"\xAB\xCD\xEFMaxMind.com";
const DATA_SEPARATOR: [u8; 16] = [0; 16];

/// MMDB data section value
pub enum Value {
    String(String),
    Double(f64),
    Uint16(u16),
    Uint32(u32),
    Uint64(u64),
    Map(Vec<(String, Value)>),
    Array(Vec<Value>),
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::String(s.to_string())
    }

    pub fn map<const N: usize>(pairs: [(&str, Value); N]) -> Self {
        Value::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    pub fn names(en: &str, zh_cn: &str) -> Self {
        Value::map([("en", Value::str(en)), ("zh-CN", Value::str(zh_cn))])
    }

    fn encode(&self, out: &mut Vec<u8>) {
        match self {
            Value::String(s) => {
                write_control(out, 2, s.len());
                out.extend_from_slice(s.as_bytes());
            }
            Value::Double(d) => {
                write_control(out, 3, 8);
                out.extend_from_slice(&d.to_be_bytes());
            }
            Value::Uint16(v) => write_uint(out, 5, u64::from(*v)),
            Value::Uint32(v) => write_uint(out, 6, u64::from(*v)),
            Value::Uint64(v) => write_uint(out, 9, *v),
            Value::Map(pairs) => {
                write_control(out, 7, pairs.len());
                for (key, value) in pairs {
                    Value::str(key).encode(out);
                    value.encode(out);
                }
            }
            Value::Array(items) => {
                write_control(out, 11, items.len());
                for item in items {
                    item.encode(out);
                }
            }
        }
    }
}

// 类型 1-7 放在控制字节高 3 位，扩展类型额外写一个字节（type - 7）
fn write_control(out: &mut Vec<u8>, type_id: u8, size: usize) {
    let (size_bits, extra): (u8, Vec<u8>) = if size < 29 {
        (size as u8, Vec::new())
    } else if size < 285 {
        (29, vec![(size - 29) as u8])
    } else if size < 65_821 {
        let n = size - 285;
        (30, vec![(n >> 8) as u8, n as u8])
    } else {
        let n = size - 65_821;
        (31, vec![(n >> 16) as u8, (n >> 8) as u8, n as u8])
    };

    if type_id <= 7 {
        out.push((type_id << 5) | size_bits);
    } else {
        out.push(size_bits);
        out.push(type_id - 7);
    }
    out.extend_from_slice(&extra);
}

fn write_uint(out: &mut Vec<u8>, type_id: u8, value: u64) {
    let bytes = value.to_be_bytes();
    let skip = bytes.iter().take_while(|b| **b == 0).count();
    write_control(out, type_id, bytes.len() - skip);
    out.extend_from_slice(&bytes[skip..]);
}

#[derive(Clone, Copy)]
enum Slot {
    Empty,
    Node(usize),
    Data(usize),
}

pub struct MmdbWriter {
    database_type: String,
    nodes: Vec<[Slot; 2]>,
    data: Vec<u8>,
}

impl MmdbWriter {
    pub fn new(database_type: &str) -> Self {
        Self {
            database_type: database_type.to_string(),
            nodes: vec![[Slot::Empty; 2]],
            data: Vec::new(),
        }
    }

    /// Map `network/prefix_len` to `record`
    pub fn insert(mut self, network: &str, prefix_len: usize, record: Value) -> Self {
        let (bits, depth) = match network.parse::<IpAddr>().expect("valid network") {
            IpAddr::V4(v4) => {
                let mut bits = [0u8; 16];
                bits[12..].copy_from_slice(&v4.octets());
                (bits, 96 + prefix_len)
            }
            IpAddr::V6(v6) => (v6.octets(), prefix_len),
        };

        let offset = self.data.len();
        record.encode(&mut self.data);

        let mut node = 0;
        for i in 0..depth {
            let bit = usize::from((bits[i / 8] >> (7 - i % 8)) & 1);
            if i + 1 == depth {
                self.nodes[node][bit] = Slot::Data(offset);
                break;
            }
            node = match self.nodes[node][bit] {
                Slot::Node(next) => next,
                _ => {
                    self.nodes.push([Slot::Empty; 2]);
                    let next = self.nodes.len() - 1;
                    self.nodes[node][bit] = Slot::Node(next);
                    next
                }
            };
        }
        self
    }

    pub fn build(self) -> Bytes {
        let node_count = self.nodes.len() as u32;
        let mut out = Vec::new();

        for node in &self.nodes {
            for slot in node {
                let value = match *slot {
                    Slot::Empty => node_count,
                    Slot::Node(next) => next as u32,
                    Slot::Data(offset) => node_count + DATA_SEPARATOR.len() as u32 + offset as u32,
                };
                out.extend_from_slice(&value.to_be_bytes()[1..]);
            }
        }

        out.extend_from_slice(&DATA_SEPARATOR);
        out.extend_from_slice(&self.data);
        out.extend_from_slice(METADATA_MARKER);

        Value::map([
            ("binary_format_major_version", Value::Uint16(2)),
            ("binary_format_minor_version", Value::Uint16(0)),
            ("build_epoch", Value::Uint64(1_700_000_000)),
            ("database_type", Value::str(&self.database_type)),
            ("description", Value::map([("en", Value::str("test fixture"))])),
            ("ip_version", Value::Uint16(6)),
            (
                "languages",
                Value::Array(vec![Value::str("en"), Value::str("zh-CN")]),
            ),
            ("node_count", Value::Uint32(node_count)),
            ("record_size", Value::Uint16(24)),
        ])
        .encode(&mut out);

        Bytes::from(out)
    }
}

/// City database covering 1.1.1.0/24 and 2001:db8:85a3::/48
pub fn city_fixture() -> Bytes {
    MmdbWriter::new("GeoLite2-City")
        .insert(
            "1.1.1.0",
            24,
            Value::map([
                ("continent", Value::map([
                    ("code", Value::str("OC")),
                    ("names", Value::names("Oceania", "大洋洲")),
                ])),
                ("country", Value::map([
                    ("geoname_id", Value::Uint32(2_077_456)),
                    ("iso_code", Value::str("AU")),
                    ("names", Value::names("Australia", "澳大利亚")),
                ])),
                ("location", Value::map([
                    ("accuracy_radius", Value::Uint16(1000)),
                    ("latitude", Value::Double(-33.494)),
                    ("longitude", Value::Double(143.2104)),
                    ("time_zone", Value::str("Australia/Sydney")),
                ])),
                ("registered_country", Value::map([("iso_code", Value::str("AU"))])),
            ]),
        )
        .insert(
            "2001:db8:85a3::",
            48,
            Value::map([
                ("city", Value::map([("names", Value::names("Tokyo", "东京"))])),
                ("country", Value::map([
                    ("iso_code", Value::str("JP")),
                    ("names", Value::names("Japan", "日本")),
                ])),
                ("location", Value::map([
                    ("accuracy_radius", Value::Uint16(20)),
                    ("latitude", Value::Double(35.6893)),
                    ("longitude", Value::Double(139.6899)),
                ])),
                ("postal", Value::map([("code", Value::str("100-0001"))])),
                ("subdivisions", Value::Array(vec![Value::map([
                    ("iso_code", Value::str("13")),
                    ("names", Value::names("Tokyo", "东京都")),
                ])])),
            ]),
        )
        .build()
}
