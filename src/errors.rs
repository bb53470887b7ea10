use std::fmt;

#[derive(Debug, Clone)]
pub enum GeoError {
    CacheUnavailable(String),
    Config(String),
    FileOperation(String),
    Lookup(String),
    ReaderInit(String),
    Serialization(String),
    StorageUnavailable(String),
    Validation(String),
}

impl GeoError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            GeoError::CacheUnavailable(_) => "E001",
            GeoError::Config(_) => "E002",
            GeoError::FileOperation(_) => "E003",
            GeoError::Lookup(_) => "E004",
            GeoError::ReaderInit(_) => "E005",
            GeoError::Serialization(_) => "E006",
            GeoError::StorageUnavailable(_) => "E007",
            GeoError::Validation(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            GeoError::CacheUnavailable(_) => "Cache Unavailable",
            GeoError::Config(_) => "Configuration Error",
            GeoError::FileOperation(_) => "File Operation Error",
            GeoError::Lookup(_) => "Lookup Error",
            GeoError::ReaderInit(_) => "Reader Initialization Error",
            GeoError::Serialization(_) => "Serialization Error",
            GeoError::StorageUnavailable(_) => "Storage Unavailable",
            GeoError::Validation(_) => "Validation Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            GeoError::CacheUnavailable(msg) => msg,
            GeoError::Config(msg) => msg,
            GeoError::FileOperation(msg) => msg,
            GeoError::Lookup(msg) => msg,
            GeoError::ReaderInit(msg) => msg,
            GeoError::Serialization(msg) => msg,
            GeoError::StorageUnavailable(msg) => msg,
            GeoError::Validation(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for GeoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // HTTP 500 响应体直接拼接 Display，只输出详情
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for GeoError {}

// 便捷的构造函数
impl GeoError {
    pub fn cache_unavailable<T: Into<String>>(msg: T) -> Self {
        GeoError::CacheUnavailable(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        GeoError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        GeoError::FileOperation(msg.into())
    }

    pub fn lookup<T: Into<String>>(msg: T) -> Self {
        GeoError::Lookup(msg.into())
    }

    pub fn reader_init<T: Into<String>>(msg: T) -> Self {
        GeoError::ReaderInit(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        GeoError::Serialization(msg.into())
    }

    pub fn storage_unavailable<T: Into<String>>(msg: T) -> Self {
        GeoError::StorageUnavailable(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        GeoError::Validation(msg.into())
    }
}

impl From<std::io::Error> for GeoError {
    fn from(err: std::io::Error) -> Self {
        GeoError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GeoError {
    fn from(err: serde_json::Error) -> Self {
        GeoError::Serialization(err.to_string())
    }
}

impl From<redis::RedisError> for GeoError {
    fn from(err: redis::RedisError) -> Self {
        GeoError::CacheUnavailable(err.to_string())
    }
}

impl From<maxminddb::MaxMindDbError> for GeoError {
    fn from(err: maxminddb::MaxMindDbError) -> Self {
        GeoError::Lookup(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeoError>;
