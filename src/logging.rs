//! Subscriber set-up shared by the CLI and the web front-end.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or does not parse.
pub const DEFAULT_FILTER: &str = "info";

pub fn env_filter(spec: Option<&str>) -> EnvFilter {
    spec.and_then(|s| EnvFilter::try_new(s).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Installs the fmt subscriber. Logs go to stderr so the CLI's stdout
/// carries only results.
pub fn init() {
    let spec = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(spec.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_info() {
        assert_eq!(env_filter(None).to_string(), "info");
    }

    #[test]
    fn rust_log_overrides_default() {
        assert_eq!(env_filter(Some("leafscan=debug")).to_string(), "leafscan=debug");
    }

    #[test]
    fn bad_rust_log_falls_back_to_default() {
        assert_eq!(env_filter(Some("leafscan=loud")).to_string(), "info");
    }
}
