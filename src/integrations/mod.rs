use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[cfg(test)]
pub(crate) mod fake;
pub(crate) mod github;

/// The operations a hosting platform has to offer for releases to be collected and applied.
pub(crate) trait Forge {
    /// The most recent published release, or `None` if the repository has never been released.
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Option<Release>, Error>;

    async fn release_by_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<Release, Error>;

    /// One page (1-based) of commits, newest first, optionally only those after `since`.
    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        since: Option<OffsetDateTime>,
        page: u32,
    ) -> Result<Vec<Commit>, Error>;

    /// Whether the commit `sha` can be found on the repository's default branch.
    async fn is_on_default_branch(&self, owner: &str, repo: &str, sha: &str)
        -> Result<bool, Error>;

    async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        release: &CreateRelease,
    ) -> Result<CreatedRelease, Error>;
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct Release {
    pub(crate) tag_name: String,
    /// Unset for releases which were never published (drafts).
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub(crate) published_at: Option<OffsetDateTime>,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct Commit {
    pub(crate) sha: String,
    pub(crate) commit: CommitDetails,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct CommitDetails {
    pub(crate) message: String,
}

/// The body of a "create release" request.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub(crate) struct CreateRelease {
    pub(crate) tag_name: String,
    pub(crate) target_commitish: String,
    pub(crate) name: String,
    pub(crate) body: String,
    /// true to create a draft (unpublished) release, false to create a published one.
    pub(crate) draft: bool,
    pub(crate) prerelease: bool,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct CreatedRelease {
    pub(crate) name: Option<String>,
    pub(crate) html_url: Option<String>,
}

#[derive(Debug, Diagnostic, thiserror::Error)]
pub(crate) enum Error {
    #[error("Could not set up the GitHub client: {0}")]
    #[diagnostic(
        code(github::client),
        help("The HTTP client could not be built, this is most likely a TLS setup problem.")
    )]
    Client(#[source] reqwest::Error),
    #[error("Trouble communicating with GitHub while {activity}: {err}")]
    #[diagnostic(
        code(github::api_request_error),
        help(
            "There was a problem communicating with GitHub, this may be a network issue or a permissions issue. Setting GITHUB_TOKEN raises rate limits."
        )
    )]
    ApiRequest { err: String, activity: String },
    #[error("Trouble decoding the response from GitHub while {activity}: {source}")]
    #[diagnostic(
        code(github::api_response_error),
        help("GitHub answered with something unexpected, check GITHUB_API_URL points at a GitHub API.")
    )]
    ApiResponse {
        source: reqwest::Error,
        activity: String,
    },
}
