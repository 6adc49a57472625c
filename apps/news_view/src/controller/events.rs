//! User actions and error modeling for the view controller.

use std::fmt;

use client_core::{ClientError, SessionStoreError};
use shared::domain::{NewStory, StoryId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    RestoreSession,
    Login {
        username: String,
        password: String,
    },
    Signup {
        name: String,
        username: String,
        password: String,
    },
    Logout,
    ShowLoginForms,
    NavigateHome,
    ToggleFavorite {
        story_id: StoryId,
    },
    DeleteStory {
        story_id: StoryId,
    },
    SubmitStory(NewStory),
}

impl UserAction {
    pub fn name(&self) -> &'static str {
        match self {
            UserAction::RestoreSession => "restore_session",
            UserAction::Login { .. } => "login",
            UserAction::Signup { .. } => "signup",
            UserAction::Logout => "logout",
            UserAction::ShowLoginForms => "show_login_forms",
            UserAction::NavigateHome => "navigate_home",
            UserAction::ToggleFavorite { .. } => "toggle_favorite",
            UserAction::DeleteStory { .. } => "delete_story",
            UserAction::SubmitStory(_) => "submit_story",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewContext {
    RestoreSession,
    Login,
    Signup,
    Logout,
    NavigateHome,
    ToggleFavorite,
    DeleteStory,
    SubmitStory,
}

impl fmt::Display for ViewContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ViewContext::RestoreSession => "restore session",
            ViewContext::Login => "login",
            ViewContext::Signup => "signup",
            ViewContext::Logout => "logout",
            ViewContext::NavigateHome => "load stories",
            ViewContext::ToggleFavorite => "toggle favorite",
            ViewContext::DeleteStory => "delete story",
            ViewContext::SubmitStory => "submit story",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewErrorCategory {
    Network,
    Authentication,
    Validation,
    Session,
}

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("{context}: could not reach the news service: {source}")]
    Network {
        context: ViewContext,
        #[source]
        source: ClientError,
    },
    #[error("{context}: {message}")]
    Authentication {
        context: ViewContext,
        message: String,
    },
    #[error("{context}: {message}")]
    Validation {
        context: ViewContext,
        message: String,
    },
    #[error("{context}: session storage failed: {source}")]
    Session {
        context: ViewContext,
        #[source]
        source: SessionStoreError,
    },
}

impl ViewError {
    pub fn validation(context: ViewContext, message: impl Into<String>) -> Self {
        Self::Validation {
            context,
            message: message.into(),
        }
    }

    pub fn not_logged_in(context: ViewContext) -> Self {
        Self::Authentication {
            context,
            message: "not logged in".to_string(),
        }
    }

    pub fn session(context: ViewContext, source: SessionStoreError) -> Self {
        Self::Session { context, source }
    }

    /// Sorts a client failure into the category the user has to act on.
    pub fn client(context: ViewContext, source: ClientError) -> Self {
        match source {
            ClientError::Unauthorized(message) => Self::Authentication { context, message },
            ClientError::Rejected { status, message } if status < 500 => {
                Self::Validation { context, message }
            }
            source => Self::Network { context, source },
        }
    }

    pub fn category(&self) -> ViewErrorCategory {
        match self {
            ViewError::Network { .. } => ViewErrorCategory::Network,
            ViewError::Authentication { .. } => ViewErrorCategory::Authentication,
            ViewError::Validation { .. } => ViewErrorCategory::Validation,
            ViewError::Session { .. } => ViewErrorCategory::Session,
        }
    }

    pub fn context(&self) -> ViewContext {
        match self {
            ViewError::Network { context, .. }
            | ViewError::Authentication { context, .. }
            | ViewError::Validation { context, .. }
            | ViewError::Session { context, .. } => *context,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category() == ViewErrorCategory::Authentication
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_sorted_by_category() {
        let auth = ViewError::client(
            ViewContext::Login,
            ClientError::Unauthorized("Invalid password".into()),
        );
        assert_eq!(auth.category(), ViewErrorCategory::Authentication);
        assert!(auth.requires_reauth());
        assert_eq!(auth.to_string(), "login: Invalid password");

        let conflict = ViewError::client(
            ViewContext::Signup,
            ClientError::Rejected {
                status: 409,
                message: "Username already taken".into(),
            },
        );
        assert_eq!(conflict.category(), ViewErrorCategory::Validation);
        assert_eq!(conflict.context(), ViewContext::Signup);

        let outage = ViewError::client(
            ViewContext::NavigateHome,
            ClientError::Rejected {
                status: 503,
                message: "Service Unavailable".into(),
            },
        );
        assert_eq!(outage.category(), ViewErrorCategory::Network);
        assert!(!outage.requires_reauth());
    }

    #[test]
    fn action_names_are_stable() {
        assert_eq!(UserAction::Logout.name(), "logout");
        assert_eq!(
            UserAction::ToggleFavorite {
                story_id: StoryId::from("s1")
            }
            .name(),
            "toggle_favorite"
        );
    }
}
