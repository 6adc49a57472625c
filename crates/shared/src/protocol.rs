//! Request and response bodies of the news REST API.

use serde::{Deserialize, Serialize};

use crate::domain::{NewStory, Story, User};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthRequest {
    pub user: Credentials,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
}

/// Body for endpoints that only need the caller's token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteResponse {
    #[serde(default)]
    pub message: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoriesResponse {
    pub stories: Vec<Story>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddStoryRequest {
    pub token: String,
    pub story: NewStory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryResponse {
    #[serde(default)]
    pub message: String,
    pub story: Story,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_body_carries_name_and_login_body_omits_it() {
        let signup = AuthRequest {
            user: Credentials {
                username: "ada".into(),
                password: "pw".into(),
                name: Some("Ada".into()),
            },
        };
        let login = AuthRequest {
            user: Credentials {
                username: "ada".into(),
                password: "pw".into(),
                name: None,
            },
        };
        assert_eq!(
            serde_json::to_value(&signup).expect("encode"),
            serde_json::json!({"user": {"username": "ada", "password": "pw", "name": "Ada"}})
        );
        assert_eq!(
            serde_json::to_value(&login).expect("encode"),
            serde_json::json!({"user": {"username": "ada", "password": "pw"}})
        );
    }
}
