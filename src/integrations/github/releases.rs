use reqwest::{Method, StatusCode};

use super::GitHub;
use crate::integrations::{CreateRelease, CreatedRelease, Error, Release};

impl GitHub {
    pub(super) async fn get_latest_release(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<Option<Release>, Error> {
        let activity = format!("fetching the latest release of {owner}/{repo}");
        let request = self.request(Method::GET, &format!("/repos/{owner}/{repo}/releases/latest"));
        let response = request.send().await.map_err(|err| Error::ApiRequest {
            err: err.to_string(),
            activity: activity.clone(),
        })?;
        if response.status() == StatusCode::NOT_FOUND {
            log::debug!("{owner}/{repo} has no releases");
            return Ok(None);
        }
        let response = Self::ensure_success(response, &activity).await?;
        Self::json(response, &activity).await.map(Some)
    }

    pub(super) async fn get_release_by_tag(
        &self,
        owner: &str,
        repo: &str,
        tag: &str,
    ) -> Result<Release, Error> {
        let activity = format!("fetching release {tag} of {owner}/{repo}");
        let request = self.request(
            Method::GET,
            &format!("/repos/{owner}/{repo}/releases/tags/{tag}"),
        );
        let response = Self::send(request, &activity).await?;
        Self::json(response, &activity).await
    }

    pub(super) async fn post_release(
        &self,
        owner: &str,
        repo: &str,
        release: &CreateRelease,
    ) -> Result<CreatedRelease, Error> {
        let activity = format!("creating release {} of {owner}/{repo}", release.tag_name);
        let request = self
            .request(Method::POST, &format!("/repos/{owner}/{repo}/releases"))
            .json(release);
        let response = Self::send(request, &activity).await?;
        Self::json(response, &activity).await
    }
}
