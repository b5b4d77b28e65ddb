//! Create the releases described by a (hand-edited) releases document.

use log::info;
use miette::Diagnostic;
use thiserror::Error;

use crate::{
    batch::{Batch, Outcome, Policy, Summary},
    document::{Owners, ReleaseRecord},
    dry_run::DryRun,
    integrations::{self, CreateRelease, Forge},
};

/// A repository that can't be released doesn't stop the others from being released.
const POLICY: Policy = Policy::ContinueOnFailure;

/// The request that releases `tag` from the tip of `branch`, with the record's description as notes.
pub(crate) fn release_request(tag: &str, record: &ReleaseRecord, branch: &str) -> CreateRelease {
    CreateRelease {
        tag_name: tag.to_string(),
        target_commitish: branch.to_string(),
        name: tag.to_string(),
        body: record.description.clone(),
        draft: false,
        prerelease: false,
    }
}

/// Release every entry of `owners` from `branch`.
///
/// ## Errors
/// If any repository failed. Every repository is still attempted, and each failure is logged as
/// it happens.
pub(crate) async fn apply_all<F: Forge>(
    forge: &F,
    owners: &Owners,
    branch: &str,
    mut dry_run: DryRun<'_>,
) -> Result<Summary, Error> {
    let mut batch = Batch::new(POLICY);
    for (owner, repo, record) in owners.iter() {
        let outcome = apply(forge, owner, repo, record, branch, dry_run.as_deref_mut()).await;
        batch.record(
            format_args!("{owner}/{repo} => {}", record.display_tag()),
            outcome,
        )?;
    }
    let summary = batch.finish().map_err(Error::from_failures)?;
    info!(
        "{} releases applied, {} skipped",
        summary.completed, summary.skipped
    );
    Ok(summary)
}

/// Create one release, or describe it on the dry-run sink.
pub(crate) async fn apply<F: Forge>(
    forge: &F,
    owner: &str,
    repo: &str,
    record: &ReleaseRecord,
    branch: &str,
    dry_run: DryRun<'_>,
) -> Outcome<(), Error> {
    let Some(tag) = record.tag.as_deref() else {
        return Outcome::Skipped {
            reason: "no tag to release".to_string(),
        };
    };
    let request = release_request(tag, record, branch);

    if let Some(stdout) = dry_run {
        return match describe(&request).and_then(|config| {
            writeln!(stdout, "{owner}/{repo}: release config:\n{config}").map_err(Error::Stdout)
        }) {
            Ok(()) => Outcome::Completed(()),
            Err(err) => Outcome::Failed(err),
        };
    }

    match forge.create_release(owner, repo, &request).await {
        Ok(created) => {
            let name = created.name.as_deref().unwrap_or(tag);
            match created.html_url {
                Some(url) => {
                    info!("{owner}/{repo}: release {name} has been successfully created at {url}");
                }
                None => info!("{owner}/{repo}: release {name} has been successfully created"),
            }
            Outcome::Completed(())
        }
        Err(source) => Outcome::Failed(Error::Release {
            owner: owner.to_string(),
            repo: repo.to_string(),
            tag: tag.to_string(),
            source,
        }),
    }
}

fn describe(request: &CreateRelease) -> Result<String, Error> {
    serde_yaml::to_string(request).map_err(Error::Describe)
}

#[derive(Debug, Diagnostic, Error)]
pub(crate) enum Error {
    #[error("Could not create release {tag} of {owner}/{repo}")]
    #[diagnostic(
        code(apply::release),
        help("Check the tag doesn't already exist and the token can push to the repository.")
    )]
    Release {
        owner: String,
        repo: String,
        tag: String,
        #[source]
        #[diagnostic_source]
        source: integrations::Error,
    },
    #[error("Could not describe the release request: {0}")]
    #[diagnostic(code(apply::describe))]
    Describe(#[source] serde_yaml::Error),
    #[error("Error writing to stdout: {0}")]
    #[diagnostic(code(apply::stdout))]
    Stdout(#[source] std::io::Error),
    #[error("release failed for {} of the repositories, last error: {last}", .failures.len())]
    #[diagnostic(
        code(apply::incomplete),
        help("The other repositories were released, see the log for which ones failed.")
    )]
    Incomplete {
        last: String,
        #[related]
        failures: Vec<Error>,
    },
}

impl Error {
    fn from_failures(failures: Vec<Error>) -> Self {
        let last = failures
            .last()
            .map(ToString::to_string)
            .unwrap_or_default();
        Self::Incomplete { last, failures }
    }
}
