//! One-time tracing setup for test binaries.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Level used when neither `TEST_LOG` nor `RUST_LOG` is set.
pub const DEFAULT_TEST_FILTER: &str = "warn";

/// Filter directive for the test subscriber.
///
/// `TEST_LOG` takes precedence over `RUST_LOG`; blank values are ignored so
/// that `TEST_LOG= cargo test` falls through instead of silencing everything.
pub fn filter_directive(test_log: Option<&str>, rust_log: Option<&str>) -> String {
    [test_log, rust_log]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or(DEFAULT_TEST_FILTER)
        .to_string()
}

/// Install the test subscriber. Idempotent and race-safe.
///
/// Output goes through `with_test_writer()` so the harness captures it per
/// test; timestamps are dropped to keep failure output stable.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let test_log = std::env::var("TEST_LOG").ok();
        let rust_log = std::env::var("RUST_LOG").ok();
        let directive = filter_directive(test_log.as_deref(), rust_log.as_deref());

        fmt()
            .with_env_filter(EnvFilter::new(directive))
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
