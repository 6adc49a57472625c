use shared::domain::{Session, StoryList, User};

/// Everything the view knows about the world between two actions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub session: Session,
    pub stories: StoryList,
}

impl AppState {
    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    pub fn sign_in(&mut self, user: User) {
        self.session = Session::LoggedIn(user);
    }
}
