use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    InvalidUrl(String),
    NotFound(String),
    Validation(String),
    Config(String),
    FileOperation(String),
    Serialization(String),
    Multipart(String),
    PayloadTooLarge(String),
}

impl AppError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidUrl(_) => "E001",
            AppError::NotFound(_) => "E002",
            AppError::Validation(_) => "E003",
            AppError::Config(_) => "E004",
            AppError::FileOperation(_) => "E005",
            AppError::Serialization(_) => "E006",
            AppError::Multipart(_) => "E007",
            AppError::PayloadTooLarge(_) => "E008",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidUrl(_) => "Invalid URL",
            AppError::NotFound(_) => "Resource Not Found",
            AppError::Validation(_) => "Validation Error",
            AppError::Config(_) => "Configuration Error",
            AppError::FileOperation(_) => "File Operation Error",
            AppError::Serialization(_) => "Serialization Error",
            AppError::Multipart(_) => "Multipart Error",
            AppError::PayloadTooLarge(_) => "Payload Too Large",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            AppError::InvalidUrl(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Config(msg)
            | AppError::FileOperation(msg)
            | AppError::Serialization(msg)
            | AppError::Multipart(msg)
            | AppError::PayloadTooLarge(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于启动阶段的终端输出）
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

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AppError {}

// 便捷的构造函数
impl AppError {
    pub fn invalid_url<T: Into<String>>(msg: T) -> Self {
        AppError::InvalidUrl(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        AppError::Config(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        AppError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        AppError::Serialization(msg.into())
    }

    pub fn multipart<T: Into<String>>(msg: T) -> Self {
        AppError::Multipart(msg.into())
    }

    pub fn payload_too_large<T: Into<String>>(msg: T) -> Self {
        AppError::PayloadTooLarge(msg.into())
    }
}

/// Handlers return `Result<_, AppError>`; the body is always `{"error": ...}`.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidUrl(_) | AppError::Validation(_) | AppError::Multipart(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Config(_) | AppError::FileOperation(_) | AppError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.message()
        }))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(err: toml::ser::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::Multipart(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
