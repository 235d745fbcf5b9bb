//! Tracing/logging setup shared by binaries and integration harnesses.

/// Tracing configuration (filters, formatting).
pub mod tracing;

/// Initialize process-wide observability.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}
