use std::path::Path;

use indexmap::IndexMap;
use miette::{Diagnostic, NamedSource, SourceSpan};
use serde::{de::DeserializeOwned, Deserialize};
use thiserror::Error;

use crate::fs;

/// The repositories to collect releases for, grouped by owner, in the order they were written.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub(crate) struct Repositories(IndexMap<String, Vec<String>>);

impl Repositories {
    /// Load the owner → repositories mapping from a YAML file.
    ///
    /// ## Errors
    /// 1. The file can't be read
    /// 2. The contents aren't a mapping of owner names to lists of repository names
    pub(crate) fn load(path: &Path) -> Result<Self, Error> {
        let source_code = fs::read_to_string(path)?;
        Ok(parse_yaml(path, source_code)?)
    }

    /// Every `(owner, repository)` pair, owners first, preserving input order and duplicates.
    pub(crate) fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(owner, repos)| {
            repos
                .iter()
                .map(move |repo| (owner.as_str(), repo.as_str()))
        })
    }

    pub(crate) fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}

impl FromIterator<(String, Vec<String>)> for Repositories {
    fn from_iter<T: IntoIterator<Item = (String, Vec<String>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Deserialize YAML read from `path`, keeping the source around for error reporting.
pub(crate) fn parse_yaml<T: DeserializeOwned>(
    path: &Path,
    source_code: String,
) -> Result<T, ParseError> {
    serde_yaml::from_str(&source_code).map_err(|err| ParseError {
        span: err
            .location()
            .map(|location| SourceSpan::from((location.index(), 0))),
        message: err.to_string(),
        path: path.display().to_string(),
        source_code: NamedSource::new(path.display().to_string(), source_code),
    })
}

#[derive(Debug, Diagnostic, Error)]
#[error("Could not parse {path}: {message}")]
#[diagnostic(
    code(config::parse),
    help("Check the file is valid YAML and has the expected shape.")
)]
pub(crate) struct ParseError {
    path: String,
    message: String,
    #[source_code]
    source_code: NamedSource,
    #[label("here")]
    span: Option<SourceSpan>,
}

#[derive(Debug, Diagnostic, Error)]
pub(crate) enum Error {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Fs(#[from] fs::Error),
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

#[cfg(test)]
mod test_repositories {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn parse(source: &str) -> Result<Repositories, ParseError> {
        parse_yaml(&PathBuf::from("config.yml"), source.to_string())
    }

    #[test]
    fn pairs_follow_input_order() {
        let repositories = parse("zeta:\n  - one\n  - two\nacme:\n  - widget\n").unwrap();

        assert_eq!(
            repositories.pairs().collect::<Vec<_>>(),
            vec![("zeta", "one"), ("zeta", "two"), ("acme", "widget")]
        );
        assert_eq!(repositories.len(), 3);
    }

    #[test]
    fn duplicates_are_kept() {
        let repositories = parse("acme: [widget, widget]").unwrap();

        assert_eq!(repositories.len(), 2);
    }

    #[rstest]
    #[case::not_yaml("acme: [widget")]
    #[case::list_at_top_level("- acme\n- widget\n")]
    #[case::nested_mapping("acme:\n  widget: true\n")]
    #[case::scalar_repository_list("acme: widget\n")]
    fn wrong_shape_is_a_parse_error(#[case] source: &str) {
        let err = parse(source).unwrap_err();

        assert_eq!(err.path, "config.yml");
    }

    #[test]
    fn load_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "acme:\n  - widget\n").unwrap();

        let repositories = Repositories::load(&path).unwrap();

        assert_eq!(
            repositories,
            [("acme".to_string(), vec!["widget".to_string()])]
                .into_iter()
                .collect()
        );
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().unwrap();

        let err = Repositories::load(&dir.path().join("config.yml")).unwrap_err();

        assert!(matches!(err, Error::Fs(fs::Error::Read { .. })));
    }
}
