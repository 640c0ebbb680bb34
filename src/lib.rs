//! # deploy-notify
//!
//! Recognizes deployment announcements in commit titles and posts them to
//! per-domain Slack channels.
//!
//! ## Quick Start
//!
//! ```rust
//! use deploy_notify::commit::{is_deployment_commit, Commit};
//!
//! let commit = Commit {
//!     commit_message: "Deploy billing services to prod".to_string(),
//!     ..Commit::default()
//! };
//! let outcome = is_deployment_commit(&commit);
//! assert!(outcome.ok);
//! assert_eq!(outcome.commit_message.domain, "billing");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commit;
pub mod config;
pub mod git;
pub mod notify;

pub use crate::cli::Cli;
pub use crate::commit::{classify, is_deployment_commit, Commit};
