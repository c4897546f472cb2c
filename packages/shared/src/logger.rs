//! Logging setup shared by every Chathub binary.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Crates whose events are shown at the default level when `RUST_LOG` is unset.
const WORKSPACE_CRATES: [&str; 3] = ["chathub_server", "chathub_client", "chathub_shared"];

/// Build the default filter directive for `binary_name`.
///
/// Covers the workspace crates, the binary itself and `tower_http` request traces.
pub fn default_directive(binary_name: &str, default_log_level: &str) -> String {
    let mut directives: Vec<String> = WORKSPACE_CRATES
        .iter()
        .map(|name| format!("{}={}", name, default_log_level))
        .collect();
    directives.push(format!(
        "{}={}",
        binary_name.replace('-', "_"),
        default_log_level
    ));
    directives.push(format!("tower_http={}", default_log_level));
    directives.join(",")
}

/// Initialize the tracing subscriber with the specified default log level.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "chathub-server", "chatctl")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use chathub_shared::logger::setup_logger;
///
/// setup_logger("chathub-server", "info");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_covers_workspace_and_binary() {
        // テスト項目: デフォルトのフィルタにワークスペースの crate とバイナリが含まれる
        // given (前提条件):
        let binary_name = "chathub-server";

        // when (操作):
        let directive = default_directive(binary_name, "debug");

        // then (期待する結果):
        assert!(directive.contains("chathub_server=debug"));
        assert!(directive.contains("chathub_shared=debug"));
        assert!(directive.contains("tower_http=debug"));
        assert!(directive.ends_with("tower_http=debug"));
    }

    #[test]
    fn test_default_directive_normalizes_binary_name() {
        // テスト項目: バイナリ名のハイフンはアンダースコアに変換される
        // given (前提条件):

        // when (操作):
        let directive = default_directive("chatctl-dev", "warn");

        // then (期待する結果):
        assert!(directive.contains("chatctl_dev=warn"));
        assert!(!directive.contains("chatctl-dev"));
    }
}
