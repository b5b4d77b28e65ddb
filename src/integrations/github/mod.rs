use reqwest::{header, Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use time::OffsetDateTime;

use super::{Commit, CreateRelease, CreatedRelease, Error, Forge, Release};
use crate::app_config::Settings;

mod commits;
mod releases;

/// Page size for every paginated listing.
pub(crate) const PER_PAGE: u32 = 100;

/// A GitHub REST API client, built once and shared by every command.
#[derive(Clone, Debug)]
pub(crate) struct GitHub {
    client: Client,
    api_url: String,
    /// `None` when no token was configured, requests are then unauthenticated.
    authorization: Option<String>,
}

impl GitHub {
    pub(crate) fn new(settings: &Settings) -> Result<Self, Error> {
        let client = Client::builder()
            .user_agent(concat!("release-tool/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(Error::Client)?;
        Ok(Self {
            client,
            api_url: settings.api_url.clone(),
            authorization: settings
                .token
                .as_ref()
                .map(|token| format!("Bearer {token}")),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let request = self
            .client
            .request(method, format!("{}{path}", self.api_url))
            .header(header::ACCEPT, "application/vnd.github+json");
        match &self.authorization {
            Some(authorization) => request.header(header::AUTHORIZATION, authorization),
            None => request,
        }
    }

    async fn send(request: RequestBuilder, activity: &str) -> Result<Response, Error> {
        let response = request.send().await.map_err(|err| Error::ApiRequest {
            err: err.to_string(),
            activity: activity.to_string(),
        })?;
        Self::ensure_success(response, activity).await
    }

    async fn ensure_success(response: Response, activity: &str) -> Result<Response, Error> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::ApiRequest {
            err: describe_failure(status, &body),
            activity: activity.to_string(),
        })
    }

    async fn json<T: DeserializeOwned>(response: Response, activity: &str) -> Result<T, Error> {
        response
            .json()
            .await
            .map_err(|source| Error::ApiResponse {
                source,
                activity: activity.to_string(),
            })
    }
}

impl Forge for GitHub {
    async fn latest_release(&self, owner: &str, repo: &str) -> Result<Option<Release>, Error> {
        self.get_latest_release(owner, repo).await
    }

    async fn release_by_tag(&self, owner: &str, repo: &str, tag: &str) -> Result<Release, Error> {
        self.get_release_by_tag(owner, repo, tag).await
    }

    async fn list_commits(
        &self,
        owner: &str,
        repo: &str,
        since: Option<OffsetDateTime>,
        page: u32,
    ) -> Result<Vec<Commit>, Error> {
        self.get_commits(owner, repo, since, page).await
    }

    async fn is_on_default_branch(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<bool, Error> {
        self.search_commit(owner, repo, sha).await
    }

    async fn create_release(
        &self,
        owner: &str,
        repo: &str,
        release: &CreateRelease,
    ) -> Result<CreatedRelease, Error> {
        self.post_release(owner, repo, release).await
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Turn a failed response into something readable, using GitHub's `message` when there is one.
fn describe_failure(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { message }) => format!("{status}: {message}"),
        Err(_) if body.trim().is_empty() => status.to_string(),
        Err(_) => format!("{status}: {}", body.trim()),
    }
}
