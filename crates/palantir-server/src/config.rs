/// Re-export `Config` from `palantir-core` for use within this crate.
///
/// All environment-variable parsing lives in `palantir-core` so integration
/// tests can build a `Config` without depending on the server.
pub use palantir_core::config::Config;
