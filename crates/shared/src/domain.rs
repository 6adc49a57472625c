use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(StoryId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub story_id: StoryId,
    pub title: String,
    pub author: String,
    pub url: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A story as entered in the submit form, before the server assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStory {
    pub author: String,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Not part of the user payload; attached by the client after login/signup.
    #[serde(default)]
    pub login_token: String,
    #[serde(default)]
    pub favorites: Vec<Story>,
    #[serde(default, rename = "stories")]
    pub own_stories: Vec<Story>,
}

impl User {
    pub fn has_favorite(&self, story_id: &StoryId) -> bool {
        self.favorites.iter().any(|fav| &fav.story_id == story_id)
    }

    pub fn owns(&self, story: &Story) -> bool {
        story.username == self.username
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryList {
    pub stories: Vec<Story>,
}

impl StoryList {
    pub fn new(stories: Vec<Story>) -> Self {
        Self { stories }
    }

    pub fn find(&self, story_id: &StoryId) -> Option<&Story> {
        self.stories.iter().find(|story| &story.story_id == story_id)
    }

    pub fn remove(&mut self, story_id: &StoryId) -> Option<Story> {
        let index = self
            .stories
            .iter()
            .position(|story| &story.story_id == story_id)?;
        Some(self.stories.remove(index))
    }
}

/// Who is looking at the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Session {
    #[default]
    LoggedOut,
    LoggedIn(User),
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::LoggedOut => None,
            Self::LoggedIn(user) => Some(user),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self, Self::LoggedIn(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(id: &str, username: &str) -> Story {
        Story {
            story_id: StoryId::from(id),
            title: format!("title {id}"),
            author: "ada".to_string(),
            url: "https://example.com".to_string(),
            username: username.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn user_payload_decodes_api_field_names() {
        let raw = r#"{
            "username": "ada",
            "name": "Ada",
            "createdAt": "2017-11-09T18:38:39.409Z",
            "favorites": [{"storyId": "s1", "title": "t", "author": "a", "url": "http://x.io", "username": "bob"}],
            "stories": []
        }"#;
        let user: User = serde_json::from_str(raw).expect("decode user");
        assert_eq!(user.username, "ada");
        assert!(user.login_token.is_empty());
        assert!(user.created_at.is_some());
        assert!(user.has_favorite(&StoryId::from("s1")));
        assert!(!user.has_favorite(&StoryId::from("s2")));
    }

    #[test]
    fn story_list_remove_drops_only_matching_story() {
        let mut list = StoryList::new(vec![story("a", "x"), story("b", "y"), story("c", "x")]);
        let removed = list.remove(&StoryId::from("b")).expect("removed");
        assert_eq!(removed.username, "y");
        let ids: Vec<_> = list.stories.iter().map(|s| s.story_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert!(list.remove(&StoryId::from("zzz")).is_none());
    }

    #[test]
    fn session_exposes_user_only_when_logged_in() {
        assert!(Session::LoggedOut.user().is_none());
        let user = User {
            username: "ada".into(),
            name: "Ada".into(),
            created_at: None,
            login_token: "tok".into(),
            favorites: Vec::new(),
            own_stories: Vec::new(),
        };
        assert!(user.owns(&story("a", "ada")));
        let session = Session::LoggedIn(user);
        assert!(session.is_logged_in());
        assert_eq!(session.user().map(|u| u.username.as_str()), Some("ada"));
    }
}
