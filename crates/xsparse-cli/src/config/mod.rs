//! Configuration loading and resolution.

/// Environment variable naming the default encoding for byte input.
pub const ENCODING_ENV: &str = "XSPARSE_ENCODING";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "XSPARSE_LOG";

const DEFAULT_LOG_LEVEL: &str = "warn";

/// Resolve the markup encoding: explicit flag, then `XSPARSE_ENCODING`.
///
/// `None` lets the parser fall back to UTF-8.
pub fn resolve_encoding(explicit: Option<&str>) -> Option<String> {
    if let Some(encoding) = explicit {
        return Some(encoding.to_string());
    }

    std::env::var(ENCODING_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Resolve the log filter: explicit flag, then `XSPARSE_LOG`, then `warn`.
pub fn resolve_log_level(explicit: Option<&str>) -> String {
    if let Some(level) = explicit {
        return level.to_string();
    }

    if let Ok(env_level) = std::env::var(LOG_ENV) {
        if !env_level.trim().is_empty() {
            return env_level;
        }
    }

    DEFAULT_LOG_LEVEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_values_win() {
        assert_eq!(resolve_encoding(Some("latin1")).as_deref(), Some("latin1"));
        assert_eq!(resolve_log_level(Some("trace")), "trace");
    }
}
