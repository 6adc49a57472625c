//! Remote API client for the news service plus durable session storage.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{NewStory, Story, StoryId, StoryList, User},
    error::ApiErrorBody,
    protocol::{
        AddStoryRequest, AuthRequest, AuthResponse, Credentials, FavoriteResponse,
        StoriesResponse, StoryResponse, TokenRequest, UserResponse,
    },
};
use tracing::{debug, info, warn};
use url::Url;

pub mod error;
pub mod session;

pub use error::{ClientError, Result, SessionStoreError};
pub use session::{FileSessionStore, MemorySessionStore, SessionStore, StoredSession};

pub const DEFAULT_API_URL: &str = "https://hack-or-snooze-v3.herokuapp.com";
pub const DEFAULT_STORY_LIMIT: u32 = 25;

/// Operations the view layer needs from the news service.
///
/// Every call that changes a user's data answers with a fresh [`User`], which
/// the caller swaps in wholesale.
#[async_trait]
pub trait NewsApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<User>;
    async fn create_user(&self, username: &str, password: &str, name: &str) -> Result<User>;
    async fn get_logged_in_user(&self, token: &str, username: &str) -> Result<User>;
    async fn toggle_favorite(&self, user: &User, story_id: &StoryId, add: bool) -> Result<User>;
    async fn get_stories(&self) -> Result<StoryList>;
    async fn add_story(&self, user: &User, story: &NewStory) -> Result<Story>;
    async fn delete_story(&self, user: &User, story_id: &StoryId) -> Result<User>;
}

pub struct HttpNewsApi {
    http: Client,
    base_url: Url,
    story_limit: u32,
}

impl HttpNewsApi {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            base_url: Url::parse(base_url)?,
            story_limit: DEFAULT_STORY_LIMIT,
        })
    }

    pub fn with_story_limit(mut self, story_limit: u32) -> Self {
        self.story_limit = story_limit;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn authenticate(&self, path: &str, credentials: Credentials) -> Result<User> {
        let username = credentials.username.clone();
        let response = self
            .http
            .post(self.endpoint(&[path])?)
            .json(&AuthRequest { user: credentials })
            .send()
            .await?;
        let body: AuthResponse = decode(response).await?;
        info!(%username, endpoint = path, "authenticated with news api");
        Ok(with_token(body.user, body.token))
    }
}

#[async_trait]
impl NewsApi for HttpNewsApi {
    async fn login(&self, username: &str, password: &str) -> Result<User> {
        self.authenticate(
            "login",
            Credentials {
                username: username.to_string(),
                password: password.to_string(),
                name: None,
            },
        )
        .await
    }

    async fn create_user(&self, username: &str, password: &str, name: &str) -> Result<User> {
        self.authenticate(
            "signup",
            Credentials {
                username: username.to_string(),
                password: password.to_string(),
                name: Some(name.to_string()),
            },
        )
        .await
    }

    async fn get_logged_in_user(&self, token: &str, username: &str) -> Result<User> {
        let response = self
            .http
            .get(self.endpoint(&["users", username])?)
            .query(&[("token", token)])
            .send()
            .await?;
        let body: UserResponse = decode(response).await?;
        debug!(%username, favorites = body.user.favorites.len(), "fetched logged-in user");
        Ok(with_token(body.user, token.to_string()))
    }

    async fn toggle_favorite(&self, user: &User, story_id: &StoryId, add: bool) -> Result<User> {
        let url = self.endpoint(&[
            "users",
            user.username.as_str(),
            "favorites",
            story_id.as_str(),
        ])?;
        let request = if add {
            self.http.post(url)
        } else {
            self.http.delete(url)
        };
        let response = request
            .json(&TokenRequest {
                token: user.login_token.clone(),
            })
            .send()
            .await?;
        let body: FavoriteResponse = decode(response).await?;
        info!(username = %user.username, %story_id, add, "updated favorite");
        Ok(with_token(body.user, user.login_token.clone()))
    }

    async fn get_stories(&self) -> Result<StoryList> {
        let response = self
            .http
            .get(self.endpoint(&["stories"])?)
            .query(&[("skip", 0), ("limit", self.story_limit)])
            .send()
            .await?;
        let body: StoriesResponse = decode(response).await?;
        debug!(count = body.stories.len(), "fetched story feed");
        Ok(StoryList::new(body.stories))
    }

    async fn add_story(&self, user: &User, story: &NewStory) -> Result<Story> {
        let response = self
            .http
            .post(self.endpoint(&["stories"])?)
            .json(&AddStoryRequest {
                token: user.login_token.clone(),
                story: story.clone(),
            })
            .send()
            .await?;
        let body: StoryResponse = decode(response).await?;
        info!(username = %user.username, story_id = %body.story.story_id, "added story");
        Ok(body.story)
    }

    async fn delete_story(&self, user: &User, story_id: &StoryId) -> Result<User> {
        let response = self
            .http
            .delete(self.endpoint(&["stories", story_id.as_str()])?)
            .json(&TokenRequest {
                token: user.login_token.clone(),
            })
            .send()
            .await?;
        let body: StoryResponse = decode(response).await?;
        info!(username = %user.username, story_id = %body.story.story_id, "deleted story");
        self.get_logged_in_user(&user.login_token, &user.username)
            .await
    }
}

fn with_token(mut user: User, token: String) -> User {
    user.login_token = token;
    user
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let body = response.bytes().await?;
    if status.is_success() {
        return Ok(serde_json::from_slice(&body)?);
    }

    let message = serde_json::from_slice::<ApiErrorBody>(&body)
        .ok()
        .map(|body| body.error.message)
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
    warn!(status = status.as_u16(), %message, "news api returned an error");
    Err(ClientError::from_status(status.as_u16(), message))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
