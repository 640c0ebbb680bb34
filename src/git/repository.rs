//! Git repository operations

use std::path::Path;

use anyhow::{Context, Result};
use git2::Repository;
use tracing::debug;

use crate::commit::Commit;
use crate::git::remote::commit_web_url;

/// Git repository wrapper
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    /// Open repository at specified path
    pub fn open_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::open(path).context("Failed to open git repository")?;

        Ok(Self { repo })
    }

    /// Read a commit as a deployment candidate
    ///
    /// The author name stands in for the username and the URL points at the
    /// commit page of the `origin` remote when one is configured.
    pub fn read_commit(&self, rev: &str) -> Result<Commit> {
        let object = self
            .repo
            .revparse_single(rev)
            .with_context(|| format!("Failed to resolve revision: {rev}"))?;
        let commit = object
            .peel_to_commit()
            .with_context(|| format!("Revision is not a commit: {rev}"))?;

        let sha = commit.id().to_string();
        let author = commit.author();

        let url = self
            .origin_url()
            .and_then(|remote| commit_web_url(&remote, &sha))
            .unwrap_or_else(|| sha.clone());

        debug!(rev, sha = %sha, url = %url, "Read commit from repository");

        // Lossy decoding keeps a readable title even when the body is not UTF-8
        Ok(Commit {
            url,
            author_username: String::from_utf8_lossy(author.name_bytes()).into_owned(),
            author_email: String::from_utf8_lossy(author.email_bytes()).into_owned(),
            commit_message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
        })
    }

    fn origin_url(&self) -> Option<String> {
        let remote = self.repo.find_remote("origin").ok()?;
        remote.url().map(str::to_string)
    }
}
