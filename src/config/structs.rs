use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

use crate::errors::{AppError, Result};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 环境变量前缀，例如 MA__SERVER__PORT=9999
pub const ENV_PREFIX: &str = "MA";

/// Status code used when `POST /api/shorturl` rejects a URL.
///
/// `Ok` keeps the historical behaviour of answering `200` with an
/// `{"error": "invalid url"}` body; `BadRequest` answers `400`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, EnumIter, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InvalidUrlStatus {
    #[default]
    Ok,
    BadRequest,
}

impl std::str::FromStr for InvalidUrlStatus {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        InvalidUrlStatus::iter()
            .find(|v| v.as_ref().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let valid: Vec<String> = InvalidUrlStatus::iter()
                    .map(|v| v.as_ref().to_string())
                    .collect();
                format!(
                    "Invalid invalid_url_status: '{}'. Valid: {}",
                    s,
                    valid.join(", ")
                )
            })
    }
}

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含:
/// - server: 服务器地址、端口、CPU 数量
/// - logging: 日志配置
/// - registry: 短链接注册表（DNS 校验、协议白名单）
/// - file_metadata: 文件元数据检查服务
/// - exercises: 运动记录服务
/// - cors: 跨域配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub file_metadata: FileMetadataConfig,
    #[serde(default)]
    pub exercises: ExercisesConfig,
    #[serde(default)]
    pub cors: CorsConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML 文件 > 默认值
    /// ENV 前缀：MA，分隔符：__
    /// 兼容旧的 `PORT` 环境变量（仅在未设置 MA__SERVER__PORT 时生效）
    pub fn load(path: Option<&str>) -> Result<Self> {
        use config::{Config, Environment, File};

        let (path, required) = match path {
            Some(p) => (p, true),
            None => (DEFAULT_CONFIG_PATH, false),
        };

        let settings = Config::builder()
            .add_source(File::with_name(path).required(required))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("registry.allowed_schemes")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .build()?;

        let mut config: StaticConfig = settings.try_deserialize()?;

        if std::env::var(format!("{}__SERVER__PORT", ENV_PREFIX)).is_err()
            && let Ok(port) = std::env::var("PORT")
        {
            config.server.port = port
                .parse()
                .map_err(|_| AppError::config(format!("Invalid PORT value: '{}'", port)))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// 启动前的基本合法性检查
    pub fn validate(&self) -> Result<()> {
        if self.registry.allowed_schemes.is_empty() {
            return Err(AppError::config(
                "registry.allowed_schemes must list at least one scheme",
            ));
        }
        if self.registry.dns_timeout_ms == 0 {
            return Err(AppError::config("registry.dns_timeout_ms must be positive"));
        }
        if self.file_metadata.max_upload_bytes == 0 {
            return Err(AppError::config(
                "file_metadata.max_upload_bytes must be positive",
            ));
        }
        Ok(())
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> Result<String> {
        Ok(toml::to_string_pretty(&Self::default())?)
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_true")]
    pub enable_rotation: bool,
}

/// 短链接注册表配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// DNS 解析超时（毫秒），超时视为校验失败
    #[serde(default = "default_dns_timeout_ms")]
    pub dns_timeout_ms: u64,
    #[serde(default = "default_allowed_schemes")]
    pub allowed_schemes: Vec<String>,
    #[serde(default)]
    pub invalid_url_status: InvalidUrlStatus,
}

/// 文件元数据服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadataConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// 运动记录服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExercisesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// CORS 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cors_max_age")]
    pub max_age: u64,
}

// ============================================================
// Default value functions
// ============================================================

fn default_true() -> bool {
    true
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_dns_timeout_ms() -> u64 {
    5000
}

fn default_allowed_schemes() -> Vec<String> {
    vec!["http".to_string(), "https".to_string()]
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_allowed_origins() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_cors_max_age() -> u64 {
    3600
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: true,
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dns_timeout_ms: default_dns_timeout_ms(),
            allowed_schemes: default_allowed_schemes(),
            invalid_url_status: InvalidUrlStatus::default(),
        }
    }
}

impl Default for FileMetadataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for ExercisesConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: default_allowed_origins(),
            max_age: default_cors_max_age(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StaticConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.registry.allowed_schemes, vec!["http", "https"]);
        assert_eq!(config.registry.invalid_url_status, InvalidUrlStatus::Ok);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_url_status_from_str() {
        assert_eq!(
            "bad_request".parse::<InvalidUrlStatus>(),
            Ok(InvalidUrlStatus::BadRequest)
        );
        assert_eq!("OK".parse::<InvalidUrlStatus>(), Ok(InvalidUrlStatus::Ok));
        let err = "teapot".parse::<InvalidUrlStatus>().unwrap_err();
        assert!(err.contains("ok, bad_request"), "{}", err);
    }

    #[test]
    fn test_sample_config_roundtrips() {
        let sample = StaticConfig::generate_sample_config().expect("sample config");
        assert!(sample.contains("[registry]"));
        let parsed: StaticConfig = toml::from_str(&sample).expect("parse sample");
        assert_eq!(parsed.registry.dns_timeout_ms, 5000);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: StaticConfig = toml::from_str(
            r#"
            [registry]
            invalid_url_status = "bad_request"
            "#,
        )
        .expect("parse partial");
        assert_eq!(
            parsed.registry.invalid_url_status,
            InvalidUrlStatus::BadRequest
        );
        assert_eq!(parsed.registry.allowed_schemes.len(), 2);
        assert!(parsed.file_metadata.enabled);
    }

    #[test]
    fn test_validate_rejects_empty_schemes() {
        let mut config = StaticConfig::default();
        config.registry.allowed_schemes.clear();
        assert!(matches!(config.validate(), Err(AppError::Config(_))));
    }
}
