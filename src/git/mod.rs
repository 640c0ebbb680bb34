//! Git operations for reading deployment commits locally.

pub mod remote;
pub mod repository;

pub use remote::commit_web_url;
pub use repository::GitRepository;
