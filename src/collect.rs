//! Find the latest release of every configured repository and summarize what's been merged since.

use itertools::Itertools;
use log::{debug, info, warn};
use miette::Diagnostic;
use thiserror::Error;
use time::{OffsetDateTime, UtcOffset};

use crate::{
    batch::{Batch, Outcome, Policy},
    config::Repositories,
    document::{Owners, ReleaseRecord},
    integrations::{self, Commit, Forge},
};

/// Collection stops at the first repository that can't be collected.
const POLICY: Policy = Policy::AbortOnFirst;

/// Collect a [`ReleaseRecord`] for every configured repository, one at a time in config order.
///
/// ## Errors
/// The first repository whose latest release or commit history can't be fetched.
pub(crate) async fn collect_all<F: Forge>(
    forge: &F,
    repositories: &Repositories,
) -> Result<Owners, Error> {
    let mut owners = Owners::default();
    let mut batch = Batch::new(POLICY);
    for (owner, repo) in repositories.pairs() {
        let outcome = match collect(forge, owner, repo).await {
            Ok(record) => Outcome::Completed(record),
            Err(err) => Outcome::Failed(err),
        };
        if let Some(record) = batch.record(format_args!("{owner}/{repo}"), outcome)? {
            owners.insert(owner, repo, record);
        }
    }
    info!(
        "Collected releases for {} repositories",
        batch.summary().completed
    );
    Ok(owners)
}

/// The latest tag of `owner/repo` and a bullet list of every default-branch commit since it.
pub(crate) async fn collect<F: Forge>(
    forge: &F,
    owner: &str,
    repo: &str,
) -> Result<ReleaseRecord, Error> {
    let with_context = |source| Error::Repository {
        owner: owner.to_string(),
        repo: repo.to_string(),
        source,
    };
    let baseline = resolve_baseline(forge, owner, repo)
        .await
        .map_err(with_context)?;
    info!(
        "{owner}/{repo}: collecting commits since {}",
        baseline.tag.as_deref().unwrap_or("the beginning")
    );
    let messages = qualifying_messages(forge, owner, repo, baseline.since)
        .await
        .map_err(with_context)?;
    Ok(ReleaseRecord {
        tag: baseline.tag,
        description: format_description(&messages),
    })
}

/// Where collection starts: the latest release and when it was published.
#[derive(Debug, Default, Eq, PartialEq)]
struct Baseline {
    tag: Option<String>,
    since: Option<OffsetDateTime>,
}

async fn resolve_baseline<F: Forge>(
    forge: &F,
    owner: &str,
    repo: &str,
) -> Result<Baseline, integrations::Error> {
    let Some(latest) = forge.latest_release(owner, repo).await? else {
        return Ok(Baseline::default());
    };
    let published_at = match latest.published_at {
        Some(published_at) => published_at,
        None => forge
            .release_by_tag(owner, repo, &latest.tag_name)
            .await?
            .published_at
            .ok_or_else(|| integrations::Error::ApiRequest {
                err: format!("release {} has no publish date", latest.tag_name),
                activity: format!("fetching release {} of {owner}/{repo}", latest.tag_name),
            })?,
    };
    Ok(Baseline {
        tag: Some(latest.tag_name),
        since: Some(published_at.to_offset(UtcOffset::UTC)),
    })
}

/// Messages of every commit since `since` which made it to the default branch, in page order.
async fn qualifying_messages<F: Forge>(
    forge: &F,
    owner: &str,
    repo: &str,
    since: Option<OffsetDateTime>,
) -> Result<Vec<String>, integrations::Error> {
    let mut messages = Vec::new();
    for page in 1.. {
        let commits = forge.list_commits(owner, repo, since, page).await?;
        debug!("{owner}/{repo}: page {page} has {} commits", commits.len());
        if commits.is_empty() {
            break;
        }
        for commit in commits {
            match check_commit(forge, owner, repo, &commit).await {
                Outcome::Completed(()) => {
                    debug!("{owner}/{repo}: appending {}", commit.sha);
                    messages.push(commit.commit.message);
                }
                Outcome::Skipped { reason } => debug!("{owner}/{repo}: {reason}"),
                // A failed lookup only costs this commit, never the repository.
                Outcome::Failed(err) => {
                    warn!("{owner}/{repo}: failed to check commit {}: {err}", commit.sha);
                }
            }
        }
    }
    Ok(messages)
}

async fn check_commit<F: Forge>(
    forge: &F,
    owner: &str,
    repo: &str,
    commit: &Commit,
) -> Outcome<(), integrations::Error> {
    match forge.is_on_default_branch(owner, repo, &commit.sha).await {
        Ok(true) => Outcome::Completed(()),
        Ok(false) => Outcome::Skipped {
            reason: format!("commit {} does not belong to the default branch", commit.sha),
        },
        Err(err) => Outcome::Failed(err),
    }
}

/// Drop blank and sign-off lines from a commit message and turn what's left into a bullet.
pub(crate) fn format_commit_message(message: &str) -> String {
    let body = message
        .lines()
        .filter(|line| !line.is_empty() && !line.contains("Signed-off"))
        .join("\n");
    format!("* {body}")
}

pub(crate) fn format_description(messages: &[String]) -> String {
    messages
        .iter()
        .map(|message| format_commit_message(message))
        .join("\n")
}

#[derive(Debug, Diagnostic, Error)]
pub(crate) enum Error {
    #[error("{owner}/{repo}: failed to collect commits description")]
    #[diagnostic(
        code(collect::repository),
        help("Nothing was written. Check the repository exists and is visible with the configured token.")
    )]
    Repository {
        owner: String,
        repo: String,
        #[source]
        #[diagnostic_source]
        source: integrations::Error,
    },
}
