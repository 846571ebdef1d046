/// Initializes structured logging for the service.
///
/// Uses the `tracing` subscriber with environment-based filtering:
/// - `RUST_LOG=info` — operations applied/rejected, lifecycle events
/// - `RUST_LOG=debug` — every request as it is dequeued
/// - `RUST_LOG=inventory_service=debug` — debug for this crate only
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
