//! Unified logging module for FreshPoint services
//!
//! Console output with bracketed levels, an optional daily rolling file and
//! the `api_access` HTTP request logger.

use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::Context;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, format::Writer, FmtContext, FormatEvent, FormatFields},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Target used by the HTTP access log
pub const API_ACCESS_TARGET: &str = "api_access";

/// Custom format for log level with brackets: `[INFO]`, `[WARN]`, etc.
fn format_level(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "[TRACE]",
        Level::DEBUG => "[DEBUG]",
        Level::INFO => "[INFO]",
        Level::WARN => "[WARN]",
        Level::ERROR => "[ERROR]",
    }
}

/// Custom event formatter that outputs: `timestamp [LEVEL] message`
///
/// Example output: `2025-12-02T00:50:44.809Z [INFO] Service started`
struct BracketedLevelFormat;

impl<S, N> FormatEvent<S, N> for BracketedLevelFormat
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let now = chrono::Utc::now();
        write!(writer, "{} ", now.format("%Y-%m-%dT%H:%M:%S%.6fZ"))?;

        let level = *event.metadata().level();
        if writer.has_ansi_escapes() {
            let color = match level {
                Level::TRACE => "\x1b[35m", // magenta
                Level::DEBUG => "\x1b[34m", // blue
                Level::INFO => "\x1b[32m",  // green
                Level::WARN => "\x1b[33m",  // yellow
                Level::ERROR => "\x1b[31m", // red
            };
            write!(writer, "{}{}\x1b[0m ", color, format_level(&level))?;
        } else {
            write!(writer, "{} ", format_level(&level))?;
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;

        writeln!(writer)
    }
}

// Keeps the non-blocking file writer alive for the life of the process
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Logger configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Service name (e.g., "predsrv")
    pub service_name: String,
    /// Base filter level used when `RUST_LOG` is not set
    pub level: String,
    /// Directory for the rolling log file
    pub log_dir: PathBuf,
    /// Write a daily rolling log file in addition to the console
    pub enable_file: bool,
    /// Use JSON for the file layer
    pub enable_json: bool,
    /// Level for the `api_access` target
    pub api_log_level: Level,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".to_string(),
            level: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            enable_file: false,
            enable_json: false,
            api_log_level: Level::INFO,
        }
    }
}

impl LogConfig {
    /// Filter directive used when `RUST_LOG` is absent
    pub fn default_directive(&self) -> String {
        format!(
            "{},{}=debug,{}={}",
            self.level,
            self.service_name,
            API_ACCESS_TARGET,
            self.api_log_level.as_str().to_lowercase()
        )
    }

    fn file_name(&self) -> String {
        format!("{}.log", self.service_name)
    }
}

/// Resolve the filter: `RUST_LOG` wins, `api_access` is appended if it is missing
fn build_filter(config: &LogConfig) -> String {
    match std::env::var("RUST_LOG") {
        Ok(env_str) if env_str.contains(API_ACCESS_TARGET) => env_str,
        Ok(env_str) => format!(
            "{},{}={}",
            env_str,
            API_ACCESS_TARGET,
            config.api_log_level.as_str().to_lowercase()
        ),
        Err(_) => config.default_directive(),
    }
}

/// Initialize logging system with configuration
pub fn init_with_config(config: LogConfig) -> anyhow::Result<()> {
    let directive = build_filter(&config);
    let env_filter = EnvFilter::try_new(&directive)
        .with_context(|| format!("invalid log filter '{}'", directive))?;

    let console_layer = fmt::layer()
        .with_ansi(true)
        .event_format(BracketedLevelFormat)
        .boxed();

    let file_layer = if config.enable_file {
        std::fs::create_dir_all(&config.log_dir).with_context(|| {
            format!("failed to create log directory {}", config.log_dir.display())
        })?;
        let appender = tracing_appender::rolling::daily(&config.log_dir, config.file_name());
        let (non_blocking, guard) = tracing_appender::non_blocking(appender);
        if FILE_GUARD.set(guard).is_err() {
            anyhow::bail!("file logging already initialized");
        }

        let layer = if config.enable_json {
            fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_level(true)
                .with_target(true)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .event_format(BracketedLevelFormat)
                .boxed()
        };
        Some(layer)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("failed to install tracing subscriber")?;

    tracing::info!("Logging: {} ({})", config.service_name, directive);
    if config.enable_file {
        tracing::debug!(
            "Log file: {}",
            config.log_dir.join(config.file_name()).display()
        );
    }

    Ok(())
}

/// Redact sensitive fields from a JSON body
///
/// Keys containing password, token, api_key, secret or authorization are
/// replaced with `***REDACTED***`. Non-JSON input is returned unchanged.
#[cfg_attr(not(feature = "axum"), allow(dead_code))]
#[allow(clippy::disallowed_methods)] // json! macro internally uses unwrap (compile-time safe, never panics)
fn redact_sensitive_fields(json_str: &str) -> String {
    use serde_json::{json, Value};

    const SENSITIVE_KEYS: &[&str] = &["password", "token", "api_key", "secret", "authorization"];

    let Ok(mut value) = serde_json::from_str::<Value>(json_str) else {
        return json_str.to_string();
    };

    fn redact_recursive(value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (key, val) in map.iter_mut() {
                    let key_lower = key.to_lowercase();
                    if SENSITIVE_KEYS.iter().any(|&k| key_lower.contains(k)) {
                        *val = json!("***REDACTED***");
                    } else {
                        redact_recursive(val);
                    }
                }
            },
            Value::Array(arr) => {
                for item in arr.iter_mut() {
                    redact_recursive(item);
                }
            },
            _ => {},
        }
    }

    redact_recursive(&mut value);

    serde_json::to_string(&value).unwrap_or_else(|_| json_str.to_string())
}

#[cfg_attr(not(feature = "axum"), allow(dead_code))]
/// Truncate body string to at most `max_length` bytes on a char boundary
fn truncate_body(body: &str, max_length: usize) -> String {
    if body.len() <= max_length {
        return body.to_string();
    }
    let mut cut = max_length;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}[truncated {} bytes]", &body[..cut], body.len() - cut)
}

#[cfg(feature = "axum")]
fn is_modifying(method: &axum::http::Method) -> bool {
    matches!(method.as_str(), "POST" | "PUT" | "PATCH" | "DELETE")
}

/// Most bytes of a request body the access logger will buffer
///
/// Set this to the same value as the router's `DefaultBodyLimit`.
#[cfg(feature = "axum")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestBodyLimit(pub usize);

#[cfg(feature = "axum")]
fn declared_length(headers: &axum::http::HeaderMap) -> Option<usize> {
    headers
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// HTTP API request logger middleware
///
/// - **INFO level**: POST/PUT/PATCH/DELETE requests (no body)
/// - **DEBUG level**: all requests, JSON bodies redacted and truncated to 500 bytes
///
/// Bodies are buffered up to the [`RequestBodyLimit`] only. A body that
/// declares a larger `Content-Length` is passed through unread; one that
/// streams past the limit is answered with 413.
///
/// Add this middleware to the router **before** `.with_state()`:
/// ```rust,ignore
/// let app = Router::new()
///     // ... routes ...
///     .layer(middleware::from_fn_with_state(
///         RequestBodyLimit(max_body_bytes),
///         common::logging::http_request_logger,
///     ))
///     .with_state(state);
/// ```
#[cfg(feature = "axum")]
pub async fn http_request_logger(
    axum::extract::State(RequestBodyLimit(limit)): axum::extract::State<RequestBodyLimit>,
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    use axum::body::Body;
    use axum::response::IntoResponse;
    use http_body_util::{BodyExt, LengthLimitError, Limited};
    use std::time::Instant;
    use tracing::{debug, info, level_enabled};

    use crate::api_types::{AppError, BODY_TOO_LARGE_MESSAGE};

    const MAX_BODY_LENGTH: usize = 500;

    let method = req.method().clone();
    let uri = req.uri().clone();
    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let start = Instant::now();

    let should_read_body = level_enabled!(Level::DEBUG)
        && is_modifying(&method)
        && content_type.contains("application/json")
        && declared_length(req.headers()).is_none_or(|len| len <= limit);

    let (req, body_str) = if should_read_body {
        let (parts, body) = req.into_parts();
        let bytes = match Limited::new(body, limit).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) if e.is::<LengthLimitError>() => {
                info!(
                    target: "api_access",
                    method = %method,
                    path = %uri.path(),
                    status = 413,
                    limit = limit,
                    "HTTP request body over limit"
                );
                return AppError::payload_too_large(BODY_TOO_LARGE_MESSAGE).into_response();
            },
            Err(e) => {
                tracing::warn!("Failed to read request body: {}", e);
                return AppError::bad_request("Failed to read request body").into_response();
            },
        };

        let body_str = match std::str::from_utf8(&bytes) {
            Ok(s) => truncate_body(&redact_sensitive_fields(s), MAX_BODY_LENGTH),
            Err(_) => "<binary data>".to_string(),
        };

        let new_req = axum::extract::Request::from_parts(parts, Body::from(bytes));
        (new_req, Some(body_str))
    } else {
        (req, None)
    };

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();

    if is_modifying(&method) {
        info!(
            target: "api_access",
            method = %method,
            path = %uri.path(),
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "HTTP request"
        );
    }

    match body_str {
        Some(body) => debug!(
            target: "api_access",
            method = %method,
            path = %uri.path(),
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            request_body = %body,
            "HTTP request (detailed)"
        ),
        None if !is_modifying(&method) => debug!(
            target: "api_access",
            method = %method,
            path = %uri.path(),
            status = %status.as_u16(),
            duration_ms = %duration.as_millis(),
            "HTTP request"
        ),
        None => {},
    }

    response
}
