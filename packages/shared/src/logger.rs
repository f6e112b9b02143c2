//! Logging setup utilities for the Hiroba relay.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Crate names are normalized the way `tracing` targets are (`-` becomes `_`).
pub fn default_filter(crate_name: &str, binary_name: &str, default_log_level: &str) -> String {
    format!(
        "{}={},{}={}",
        crate_name.replace('-', "_"),
        default_log_level,
        binary_name.replace('-', "_"),
        default_log_level
    )
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The level applies to the library crate and the binary. It can be overridden
/// with the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `crate_name` - The library crate emitting most events (e.g., "hiroba-server")
/// * `binary_name` - The name of the binary (e.g., "hiroba-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use hiroba_shared::logger::setup_logger;
///
/// setup_logger("hiroba-server", "hiroba-server", "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                default_filter(crate_name, binary_name, default_log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_normalizes_crate_names() {
        // テスト項目: ハイフンを含むクレート名がターゲット名に正規化される
        // given (前提条件):
        let crate_name = "hiroba-server";

        // when (操作):
        let filter = default_filter(crate_name, "hiroba-server", "debug");

        // then (期待する結果):
        assert_eq!(filter, "hiroba_server=debug,hiroba_server=debug");
    }

    #[test]
    fn test_default_filter_keeps_level() {
        // テスト項目: 指定したログレベルがそのままフィルタに入る
        // given (前提条件):
        let level = "warn";

        // when (操作):
        let filter = default_filter("hiroba-shared", "relay", level);

        // then (期待する結果):
        assert_eq!(filter, "hiroba_shared=warn,relay=warn");
    }
}
