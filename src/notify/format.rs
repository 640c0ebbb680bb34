//! Channel names and message text for deployment announcements.

use crate::commit::{Commit, DeploymentDetails};

/// Returns the announcement channel, e.g. `#deploys-mas-billing-prod`.
pub fn channel_name(details: &DeploymentDetails) -> String {
    format!("#deploys-{}-{}", details.domain, details.environment)
}

/// Formats the announcement posted to the channel.
///
/// The version slot renders aggregate markers (`config`, `multiple`,
/// `multiple-envs`) verbatim, so one template serves every deployment type.
pub fn announcement(commit: &Commit, details: &DeploymentDetails) -> String {
    let mut message = format!(
        ":rocket: Deployed {} `{}` version `{}` to <{}|{}>",
        details.domain, details.service, details.version, commit.url, details.environment
    );
    if !commit.author_username.is_empty() {
        message.push_str(&format!(" by _{}_", commit.author_username));
    }
    message
}

/// Formats the threaded reply carrying the commit body, if there is one.
pub fn reply(commit: &Commit) -> Option<String> {
    commit.body().map(|body| format!("```{body}```"))
}
