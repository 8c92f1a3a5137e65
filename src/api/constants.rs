//! API 模块常量定义

/// `POST /api/shorturl` 校验失败时返回的错误信息
pub const INVALID_URL_MESSAGE: &str = "invalid url";

/// `GET /api/shorturl/{id}` 未命中时返回的错误信息
pub const SHORT_URL_NOT_FOUND_MESSAGE: &str = "No short URL found";

/// 请求 ID 响应头
pub const REQUEST_ID_HEADER: &str = "x-request-id";
