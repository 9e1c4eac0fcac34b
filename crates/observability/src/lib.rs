//! Logging setup shared by TradeDesk binaries.

/// Initialize process-wide tracing, honoring `RUST_LOG` and
/// `TRADEDESK_LOG_FORMAT`.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init_with(tracing::LogFormat::from_env());
}

/// Subscriber configuration (filters, output format).
pub mod tracing;

pub use self::tracing::{LogFormat, init_with};
