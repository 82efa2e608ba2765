//! Test harness for CLI integration tests.
//!
//! Provides isolated config environments, a stub notes API and CLI
//! assertion helpers using `assert_cmd`.

mod command;
mod env;
mod server;

// Re-export main types for external use
#[allow(unused_imports)]
pub use command::NotehubCommand;
#[allow(unused_imports)]
pub use env::TestEnv;
#[allow(unused_imports)]
pub use server::{RecordedRequest, StubResponse, StubServer};
