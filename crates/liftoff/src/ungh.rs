//! GitHub user lookup through the ungh.cc proxy

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use liftoff_changelog::UserLookup;

#[derive(Debug, Deserialize)]
struct FindUserResponse {
    user: FoundUser,
}

#[derive(Debug, Deserialize)]
struct FoundUser {
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    user: UserProfile,
}

#[derive(Debug, Deserialize)]
struct UserProfile {
    name: Option<String>,
}

/// ungh.cc API client
pub struct UnghClient {
    client: Client,
    base_url: String,
}

impl UnghClient {
    /// Create a client for a lookup service base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn find_url(&self, query: &str) -> String {
        format!("{}/users/find/{}", self.base_url, query)
    }

    fn user_url(&self, username: &str) -> String {
        format!("{}/users/{}", self.base_url, username)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Option<T> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(url, error = %e, "user lookup request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(url, status = %response.status(), "user lookup returned an error");
            return None;
        }

        match response.json::<T>().await {
            Ok(body) => Some(body),
            Err(e) => {
                debug!(url, error = %e, "user lookup returned an unexpected body");
                None
            }
        }
    }
}

#[async_trait]
impl UserLookup for UnghClient {
    async fn find_username(&self, email: &str) -> Option<String> {
        let response: FindUserResponse = self.get_json(&self.find_url(email)).await?;
        response.user.username.filter(|u| !u.is_empty())
    }

    async fn find_name(&self, username: &str) -> Option<String> {
        let response: UserResponse = self.get_json(&self.user_url(username)).await?;
        response.user.name.filter(|n| !n.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = UnghClient::new("https://ungh.cc/");
        assert_eq!(client.find_url("jane@example.com"), "https://ungh.cc/users/find/jane@example.com");
        assert_eq!(client.user_url("jane"), "https://ungh.cc/users/jane");
    }

    #[test]
    fn test_response_shapes() {
        let found: FindUserResponse =
            serde_json::from_str(r#"{"user":{"id":1,"username":"jane","avatar":"a.png"}}"#).unwrap();
        assert_eq!(found.user.username.as_deref(), Some("jane"));

        let profile: UserResponse =
            serde_json::from_str(r#"{"user":{"id":1,"username":"jane","name":null}}"#).unwrap();
        assert!(profile.user.name.is_none());
    }
}
