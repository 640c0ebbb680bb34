//! Web links for commits on hosted remotes.

use url::Url;

/// Builds `https://<host>/<owner>/<repo>/commit/<sha>` from a remote URL.
///
/// Accepts scp-like (`git@host:owner/repo.git`), `ssh://` and `http(s)://`
/// remotes. Returns `None` for local paths and anything without an
/// owner/repo path.
pub fn commit_web_url(remote: &str, sha: &str) -> Option<String> {
    let (host, path) = split_remote(remote.trim())?;

    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    if path.is_empty() || !path.contains('/') {
        return None;
    }

    Some(format!("https://{host}/{path}/commit/{sha}"))
}

fn split_remote(remote: &str) -> Option<(String, String)> {
    if let Ok(url) = Url::parse(remote) {
        return match url.scheme() {
            "http" | "https" | "ssh" | "git" => {
                let host = url.host_str()?.to_string();
                Some((host, url.path().to_string()))
            }
            _ => None,
        };
    }

    // scp-like syntax: [user@]host:path
    let (authority, path) = remote.split_once(':')?;
    let host = authority.rsplit('@').next()?;
    if host.is_empty() || host.contains('/') {
        return None;
    }
    Some((host.to_string(), path.to_string()))
}
