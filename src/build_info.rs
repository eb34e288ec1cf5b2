//! Build metadata embedded by `build.rs`

/// Build number, incremented on each recompilation; 0 when built without it
pub const BUILD_NUMBER: u64 = match option_env!("NUTRILOG_BUILD_NUMBER") {
    Some(s) => parse_build_number(s),
    None => 0,
};

/// Build timestamp in ISO 8601 format
pub const BUILD_TIMESTAMP: &str = match option_env!("NUTRILOG_BUILD_TIMESTAMP") {
    Some(s) => s,
    None => "unknown",
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// `str::parse` is not const; non-digit input yields 0
const fn parse_build_number(s: &str) -> u64 {
    let bytes = s.as_bytes();
    let mut n: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        if !bytes[i].is_ascii_digit() {
            return 0;
        }
        n = n * 10 + (bytes[i] - b'0') as u64;
        i += 1;
    }
    n
}

/// Version and build stamp reported by the status tool
#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub version: &'static str,
    pub build_number: u64,
    pub build_timestamp: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            build_number: BUILD_NUMBER,
            build_timestamp: BUILD_TIMESTAMP,
        }
    }
}

/// Print the startup banner to stderr; stdout carries the MCP stream
pub fn print_startup_banner() {
    let info = BuildInfo::current();
    eprintln!("Nutrilog v{} (build {}, {})", info.version, info.build_number, info.build_timestamp);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_number() {
        assert_eq!(parse_build_number("42"), 42);
        assert_eq!(parse_build_number(""), 0);
        assert_eq!(parse_build_number("4x"), 0);
    }

    #[test]
    fn test_current_matches_constants() {
        let info = BuildInfo::current();
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(info.build_number, BUILD_NUMBER);
    }
}
