//! An in-memory [`Forge`] for exercising the commands without a network.

use std::{
    cell::RefCell,
    collections::{HashMap, HashSet},
};

use time::OffsetDateTime;

use super::{
    github::PER_PAGE, Commit, CommitDetails, CreateRelease, CreatedRelease, Error, Forge, Release,
};

#[derive(Debug, Default)]
pub(crate) struct FakeForge {
    latest: HashMap<String, Release>,
    by_tag: HashMap<String, Release>,
    commits: HashMap<String, Vec<Commit>>,
    unreachable: HashSet<String>,
    broken_lookups: HashSet<String>,
    /// Repositories for which every call fails.
    failing: HashSet<String>,
    /// Every `list_commits` call as `(repository, since, page)`.
    pub(crate) listed: RefCell<Vec<(String, Option<OffsetDateTime>, u32)>>,
    /// Every successful `create_release` call as `(repository, request)`.
    pub(crate) created: RefCell<Vec<(String, CreateRelease)>>,
}

pub(crate) fn commit(sha: &str, message: &str) -> Commit {
    Commit {
        sha: sha.to_string(),
        commit: CommitDetails {
            message: message.to_string(),
        },
    }
}

impl FakeForge {
    pub(crate) fn with_latest_release(
        mut self,
        full_name: &str,
        tag: &str,
        published_at: Option<OffsetDateTime>,
    ) -> Self {
        self.latest.insert(
            full_name.to_string(),
            Release {
                tag_name: tag.to_string(),
                published_at,
            },
        );
        self
    }

    pub(crate) fn with_release_by_tag(
        mut self,
        full_name: &str,
        tag: &str,
        published_at: OffsetDateTime,
    ) -> Self {
        self.by_tag.insert(
            format!("{full_name}@{tag}"),
            Release {
                tag_name: tag.to_string(),
                published_at: Some(published_at),
            },
        );
        self
    }

    pub(crate) fn with_commits(mut self, full_name: &str, commits: Vec<Commit>) -> Self {
        self.commits.insert(full_name.to_string(), commits);
        self
    }

    pub(crate) fn with_unreachable(mut self, sha: &str) -> Self {
        self.unreachable.insert(sha.to_string());
        self
    }

    pub(crate) fn with_broken_lookup(mut self, sha: &str) -> Self {
        self.broken_lookups.insert(sha.to_string());
        self
    }

    pub(crate) fn with_failing(mut self, full_name: &str) -> Self {
        self.failing.insert(full_name.to_string());
        self
    }

    fn check(&self, owner: &str, repo: &str, activity: &str) -> Result<String, Error> {
        let full_name = format!("{owner}/{repo}");
        if self.failing.contains(&full_name) {
            return Err(Error::ApiRequest {
                err: "500 Internal Server Error".to_string(),
                activity: format!("{activity} {full_name}"),
            });
        }
        Ok(full_name)
    }
}

impl Forge for FakeForge {
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Option<Release>, Error> {
        let full_name = self.check(owner, repo, "fetching the latest release of")?;
        Ok(self.latest.get(&full_name).cloned())
    }

    async fn release_by_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<Release, Error> {
        let full_name = self.check(owner, repo, "fetching a release of")?;
        self.by_tag
            .get(&format!("{full_name}@{tag}"))
            .cloned()
            .ok_or_else(|| Error::ApiRequest {
                err: "404 Not Found".to_string(),
                activity: format!("fetching release {tag} of {full_name}"),
            })
    }

    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        since: Option<OffsetDateTime>,
        page: u32,
    ) -> Result<Vec<Commit>, Error> {
        let full_name = self.check(owner, repo, "listing commits of")?;
        self.listed
            .borrow_mut()
            .push((full_name.clone(), since, page));
        let all = self.commits.get(&full_name).map_or(&[][..], Vec::as_slice);
        let per_page = PER_PAGE as usize;
        let start = (page as usize - 1) * per_page;
        Ok(all
            .iter()
            .skip(start)
            .take(per_page)
            .cloned()
            .collect())
    }

    async fn is_on_default_branch(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<bool, Error> {
        if self.broken_lookups.contains(sha) {
            return Err(Error::ApiRequest {
                err: "422 Unprocessable Entity".to_string(),
                activity: format!("searching for commit {sha} in {owner}/{repo}"),
            });
        }
        Ok(!self.unreachable.contains(sha))
    }

    async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        release: &CreateRelease,
    ) -> Result<CreatedRelease, Error> {
        let full_name = self.check(owner, repo, "creating a release of")?;
        self.created
            .borrow_mut()
            .push((full_name, release.clone()));
        Ok(CreatedRelease {
            name: Some(release.name.clone()),
            html_url: None,
        })
    }
}
