//! Console logging setup.

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Parse log level string to tracing Level.
fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Combine the configured level with `RUST_LOG`-style directives.
///
/// A bare level in `directives` wins; otherwise `level` stays the global level
/// and target directives refine it.
fn build_filter(level: Level, directives: &str) -> EnvFilter {
    let has_global = directives
        .split(',')
        .any(|d| d.trim().parse::<LevelFilter>().is_ok());

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .parse_lossy(directives);

    if has_global {
        filter
    } else {
        filter.add_directive(level.into())
    }
}

/// Initialize stdout logging at the given level, honouring `RUST_LOG` on top.
pub fn init(level: &str) {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let filter = build_filter(parse_level(level), &directives);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stdout)
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level_known() {
        assert_eq!(parse_level("debug"), Level::DEBUG);
        assert_eq!(parse_level("WARNING"), Level::WARN);
        assert_eq!(parse_level("error"), Level::ERROR);
    }

    #[test]
    fn test_global_env_level_overrides_configured() {
        let filter = build_filter(Level::INFO, "debug");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));

        let filter = build_filter(Level::DEBUG, "error");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }

    #[test]
    fn test_configured_level_without_env() {
        let filter = build_filter(Level::WARN, "");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_target_directives_refine_configured_level() {
        let filter = build_filter(Level::WARN, "tricho_scout=trace");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
        assert!(filter.to_string().contains("warn"));
    }

    #[test]
    fn test_parse_level_falls_back_to_info() {
        assert_eq!(parse_level("chatty"), Level::INFO);
        assert_eq!(parse_level(""), Level::INFO);
    }
}
