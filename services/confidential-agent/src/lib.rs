//! CredTrust confidential computation agent.
//!
//! Library half of the `credtrust-agent` binary: configuration resolution,
//! the pipeline that ties the secret store, protected data loader, scoring
//! function and committer together, plus the error classification that maps
//! onto exit codes.

pub mod error;
pub mod overrides;
pub mod pipeline;

pub use error::{AgentError, ErrorClass};
pub use overrides::{resolve_config, RunOverrides};
pub use pipeline::{load_secrets, run};
