//! Settings sourced from the environment, read once at startup.

use std::env::var;

const TOKEN_VAR: &str = "GITHUB_TOKEN";
const API_URL_VAR: &str = "GITHUB_API_URL";
const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Settings {
    /// Bearer token for the GitHub API. `None` means unauthenticated requests.
    pub(crate) token: Option<String>,
    pub(crate) api_url: String,
}

impl Settings {
    pub(crate) fn from_env() -> Self {
        Self::from_lookup(|key| var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let token = lookup(TOKEN_VAR).filter(|token| !token.trim().is_empty());
        if token.is_none() {
            log::debug!("No {TOKEN_VAR} set, GitHub requests will be unauthenticated");
        }
        let api_url = lookup(API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .map_or_else(
                || DEFAULT_API_URL.to_string(),
                |url| url.trim_end_matches('/').to_string(),
            );
        Self { token, api_url }
    }
}
