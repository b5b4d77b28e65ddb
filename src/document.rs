//! The releases document: what `collect` writes and `apply` reads back after it's been edited.

use std::{fmt, path::Path};

use indexmap::IndexMap;
use miette::Diagnostic;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::{
    config::{parse_yaml, ParseError},
    dry_run::DryRun,
    fs,
};

/// Owner → repository → release, in the order repositories were collected.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct Owners(IndexMap<String, IndexMap<String, ReleaseRecord>>);

/// The latest tag of one repository along with a digest of everything merged since.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub(crate) struct ReleaseRecord {
    /// The latest released tag, or `None` if the repository has never been released.
    ///
    /// When editing the document, this is replaced with the tag to create.
    #[serde(default, deserialize_with = "tag_or_placeholder")]
    pub(crate) tag: Option<String>,
    /// One `* ` bullet per commit, oldest page first.
    #[serde(default)]
    pub(crate) description: String,
}

impl ReleaseRecord {
    /// The tag for humans, with a placeholder for "never released".
    pub(crate) fn display_tag(&self) -> DisplayTag<'_> {
        DisplayTag(self.tag.as_deref())
    }
}

/// Stands in for a missing tag wherever one is shown to people.
const NO_TAGS: &str = "[no tags]";

/// Documents written by older tools carry the placeholder instead of `null`.
fn tag_or_placeholder<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|tag| tag != NO_TAGS))
}

pub(crate) struct DisplayTag<'a>(Option<&'a str>);

impl fmt::Display for DisplayTag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.unwrap_or(NO_TAGS))
    }
}

impl Owners {
    /// Record the release for `owner/repo`, replacing any earlier entry for the same pair.
    pub(crate) fn insert(&mut self, owner: &str, repo: &str, record: ReleaseRecord) {
        self.0
            .entry(owner.to_string())
            .or_default()
            .insert(repo.to_string(), record);
    }

    #[cfg(test)]
    pub(crate) fn get(&self, owner: &str, repo: &str) -> Option<&ReleaseRecord> {
        self.0.get(owner).and_then(|repos| repos.get(repo))
    }

    /// Every `(owner, repository, release)` entry in document order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &str, &ReleaseRecord)> {
        self.0.iter().flat_map(|(owner, repos)| {
            repos
                .iter()
                .map(move |(repo, record)| (owner.as_str(), repo.as_str(), record))
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.0.values().map(IndexMap::len).sum()
    }

    pub(crate) fn read(path: &Path) -> Result<Self, Error> {
        let source_code = fs::read_to_string(path)?;
        Ok(parse_yaml(path, source_code)?)
    }

    pub(crate) fn to_yaml(&self) -> Result<String, Error> {
        serde_yaml::to_string(self).map_err(Error::Serialize)
    }

    /// Write the whole document to `path`, or dump it to the dry-run sink instead.
    pub(crate) fn write(&self, path: &Path, dry_run: DryRun) -> Result<(), Error> {
        let contents = self.to_yaml()?;
        let is_dry_run = dry_run.is_some();
        fs::write(dry_run, path, &contents)?;
        if !is_dry_run {
            log::info!("file {} has been successfully written", path.display());
        }
        Ok(())
    }
}

#[derive(Debug, Diagnostic, Error)]
pub(crate) enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Fs(#[from] fs::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
    #[error("Could not serialize the releases document: {0}")]
    #[diagnostic(
        code(document::serialize),
        help("This is a bug, the document should always be serializable.")
    )]
    Serialize(#[source] serde_yaml::Error),
}
