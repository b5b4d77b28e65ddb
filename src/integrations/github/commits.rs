use reqwest::Method;
use serde::Deserialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime, UtcOffset};

use super::{GitHub, PER_PAGE};
use crate::integrations::{Commit, Error};

#[derive(Deserialize)]
struct SearchResults {
    total_count: u64,
}

impl GitHub {
    pub(super) async fn get_commits(
        &self,
        owner: &str,
        repo: &str,
        since: Option<OffsetDateTime>,
        page: u32,
    ) -> Result<Vec<Commit>, Error> {
        let activity = format!("listing page {page} of commits in {owner}/{repo}");
        let mut query = vec![
            ("page", page.to_string()),
            ("per_page", PER_PAGE.to_string()),
        ];
        if let Some(since) = since {
            let since = since
                .to_offset(UtcOffset::UTC)
                .format(&Rfc3339)
                .map_err(|err| Error::ApiRequest {
                    err: err.to_string(),
                    activity: activity.clone(),
                })?;
            query.push(("since", since));
        }
        let request = self
            .request(Method::GET, &format!("/repos/{owner}/{repo}/commits"))
            .query(&query);
        let response = Self::send(request, &activity).await?;
        Self::json(response, &activity).await
    }

    /// Commit search only indexes the default branch, so any hit means the commit is on it.
    pub(super) async fn search_commit(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<bool, Error> {
        let activity = format!("searching for commit {sha} in {owner}/{repo}");
        let request = self
            .request(Method::GET, "/search/commits")
            .query(&[("q", search_query(owner, repo, sha))]);
        let response = Self::send(request, &activity).await?;
        let results: SearchResults = Self::json(response, &activity).await?;
        Ok(results.total_count > 0)
    }
}

fn search_query(owner: &str, repo: &str, sha: &str) -> String {
    format!("repo:{owner}/{repo} hash:{sha}")
}
