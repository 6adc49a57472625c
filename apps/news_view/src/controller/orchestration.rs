//! Handlers from user actions to API calls and page updates.
//!
//! Each handler applies its [`RenderOp`]s to the owned [`Page`] as it goes and
//! returns them in the order they were applied.

use client_core::{NewsApi, SessionStore, SessionStoreError, StoredSession};
use shared::domain::{NewStory, Story, StoryId, User};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    controller::{
        events::{UserAction, ViewContext, ViewError},
        state::AppState,
    },
    ui::{
        markup::{self, EMPTY_FAVORITES},
        Form, ListId, ListItem, Page, Profile, RenderOp, Section,
    },
};

pub const LOGIN_REQUIRED_ALERT: &str = "You must log in to perform this action.";

/// Sections hidden before switching views.
pub const NAVIGATION_SECTIONS: [Section; 6] = [
    Section::SubmitForm,
    Section::AllStories,
    Section::FilteredArticles,
    Section::OwnStories,
    Section::LoginForm,
    Section::CreateAccountForm,
];

type Handled = Result<Vec<RenderOp>, ViewError>;

pub struct ViewController<A: NewsApi, S: SessionStore> {
    api: A,
    store: S,
    state: AppState,
    page: Page,
}

impl<A: NewsApi, S: SessionStore> ViewController<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            state: AppState::default(),
            page: Page::initial(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn dispatch(&mut self, action: UserAction) -> Handled {
        debug!(action = action.name(), "handling user action");
        match action {
            UserAction::RestoreSession => self.restore_session().await,
            UserAction::Login { username, password } => self.login(&username, &password).await,
            UserAction::Signup {
                name,
                username,
                password,
            } => self.signup(&name, &username, &password).await,
            UserAction::Logout => self.logout().await,
            UserAction::ShowLoginForms => Ok(self.show_login_forms()),
            UserAction::NavigateHome => self.navigate_home().await,
            UserAction::ToggleFavorite { story_id } => self.toggle_favorite(&story_id).await,
            UserAction::DeleteStory { story_id } => self.delete_story(&story_id).await,
            UserAction::SubmitStory(story) => self.submit_story(story).await,
        }
    }

    /// Page-load sequence: rehydrate the stored session, then render the feed.
    pub async fn restore_session(&mut self) -> Handled {
        let context = ViewContext::RestoreSession;
        let mut ops = Vec::new();
        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(err @ SessionStoreError::Corrupt { .. }) => {
                warn!(error = %err, "discarding unreadable stored session");
                self.clear_stored_session(context)?;
                StoredSession::default()
            }
            Err(err) => return Err(ViewError::session(context, err)),
        };

        if let Some((token, username)) = stored.credentials() {
            match self.api.get_logged_in_user(token, username).await {
                Ok(user) => {
                    info!(%username, "restored stored session");
                    self.state.sign_in(user);
                }
                Err(err) if err.is_client_error() => {
                    warn!(%username, error = %err, "stored session rejected; continuing logged out");
                    self.clear_stored_session(context)?;
                }
                Err(err) => {
                    warn!(%username, error = %err, "could not restore session; continuing logged out");
                }
            }
        }

        self.generate_stories(&mut ops, context).await?;

        if let Some(user) = self.state.user().cloned() {
            self.show_nav_for_logged_in_user(&mut ops);
            self.emit(&mut ops, RenderOp::Show(Section::SubmitForm));
            self.generate_favorites(&mut ops);
            self.emit(&mut ops, RenderOp::Show(Section::FavoritedArticles));
            self.emit(&mut ops, RenderOp::SetProfile(Profile::from(&user)));
        }
        Ok(ops)
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Handled {
        let context = ViewContext::Login;
        require_filled(context, &[("username", username), ("password", password)])?;
        let user = self
            .api
            .login(username, password)
            .await
            .map_err(|err| ViewError::client(context, err))?;
        self.accept_user(user, context)
    }

    pub async fn signup(&mut self, name: &str, username: &str, password: &str) -> Handled {
        let context = ViewContext::Signup;
        require_filled(
            context,
            &[("name", name), ("username", username), ("password", password)],
        )?;
        let user = self
            .api
            .create_user(username, password, name)
            .await
            .map_err(|err| ViewError::client(context, err))?;
        self.accept_user(user, context)
    }

    /// Forgets the stored session and reloads the page from scratch.
    pub async fn logout(&mut self) -> Handled {
        self.clear_stored_session(ViewContext::Logout)?;
        info!("logged out");
        self.state = AppState::default();

        let mut ops = Vec::new();
        self.emit(&mut ops, RenderOp::Reload);
        ops.extend(self.restore_session().await?);
        Ok(ops)
    }

    pub fn show_login_forms(&mut self) -> Vec<RenderOp> {
        let mut ops = Vec::new();
        self.emit(&mut ops, RenderOp::Toggle(Section::LoginForm));
        self.emit(&mut ops, RenderOp::Toggle(Section::CreateAccountForm));
        self.emit(&mut ops, RenderOp::Toggle(Section::AllStories));
        ops
    }

    pub async fn navigate_home(&mut self) -> Handled {
        let mut ops = self.hide_all_sections();
        self.generate_stories(&mut ops, ViewContext::NavigateHome)
            .await?;
        self.emit(&mut ops, RenderOp::Show(Section::AllStories));
        Ok(ops)
    }

    /// Flips the story's heart, then asks the server to match.
    ///
    /// The heart class changes before the request and the heart markup is
    /// replaced after it, so the page shows the intended state while waiting.
    pub async fn toggle_favorite(&mut self, story_id: &StoryId) -> Handled {
        let context = ViewContext::ToggleFavorite;
        let user = self.current_user(context)?;
        let was_favorited = self.page.heart(story_id).ok_or_else(|| {
            ViewError::validation(context, format!("story {story_id} is not on the page"))
        })?;

        let mut ops = Vec::new();
        self.emit(
            &mut ops,
            RenderOp::ToggleHeartClass {
                story_id: story_id.clone(),
            },
        );
        let add = !was_favorited;

        let updated = match self.api.toggle_favorite(&user, story_id, add).await {
            Ok(updated) => updated,
            Err(err) => {
                self.page.apply(&RenderOp::ToggleHeartClass {
                    story_id: story_id.clone(),
                });
                return Err(ViewError::client(context, err));
            }
        };
        self.state.sign_in(updated);

        self.emit(
            &mut ops,
            RenderOp::SetHeart {
                story_id: story_id.clone(),
                favorited: add,
            },
        );
        self.generate_favorites(&mut ops);
        Ok(ops)
    }

    pub async fn delete_story(&mut self, story_id: &StoryId) -> Handled {
        let context = ViewContext::DeleteStory;
        let user = self.current_user(context)?;
        let was_favorited = self.page.heart(story_id).unwrap_or(false);

        let updated = self
            .api
            .delete_story(&user, story_id)
            .await
            .map_err(|err| ViewError::client(context, err))?;
        self.state.sign_in(updated);
        self.state.stories.remove(story_id);

        let mut ops = Vec::new();
        if was_favorited {
            self.generate_favorites(&mut ops);
        }
        self.emit(
            &mut ops,
            RenderOp::RemoveStory {
                list: ListId::AllStories,
                story_id: story_id.clone(),
            },
        );
        Ok(ops)
    }

    pub async fn submit_story(&mut self, story: NewStory) -> Handled {
        let context = ViewContext::SubmitStory;
        let mut ops = Vec::new();
        let Some(user) = self.state.user().cloned() else {
            self.emit(&mut ops, RenderOp::Alert(LOGIN_REQUIRED_ALERT.to_string()));
            return Ok(ops);
        };
        validate_new_story(&story)?;

        let added = self
            .api
            .add_story(&user, &story)
            .await
            .map_err(|err| ViewError::client(context, err))?;
        debug!(story_id = %added.story_id, "story submitted");

        self.generate_stories(&mut ops, context).await?;
        self.emit(&mut ops, RenderOp::ResetForm(Form::Submit));
        Ok(ops)
    }

    pub fn hide_all_sections(&mut self) -> Vec<RenderOp> {
        let mut ops = Vec::new();
        for section in NAVIGATION_SECTIONS {
            self.emit(&mut ops, RenderOp::Hide(section));
        }
        ops
    }

    /// Writes the token and username of the current user, if any.
    pub fn persist_session(&self, context: ViewContext) -> Result<(), ViewError> {
        let Some(user) = self.state.user() else {
            return Ok(());
        };
        self.store
            .save(&StoredSession::new(&user.login_token, &user.username))
            .map_err(|err| ViewError::session(context, err))
    }

    pub fn render_story_item(&self, story: &Story) -> ListItem {
        ListItem::Story(markup::story_item(story, self.state.user()))
    }

    pub fn render_story_list(&self, stories: &[Story]) -> Vec<ListItem> {
        stories
            .iter()
            .map(|story| self.render_story_item(story))
            .collect()
    }

    pub fn render_favorites(&self) -> Vec<ListItem> {
        let favorites = self
            .state
            .user()
            .map(|user| user.favorites.as_slice())
            .unwrap_or_default();
        if favorites.is_empty() {
            vec![ListItem::Placeholder(EMPTY_FAVORITES.to_string())]
        } else {
            self.render_story_list(favorites)
        }
    }

    fn clear_stored_session(&self, context: ViewContext) -> Result<(), ViewError> {
        self.store
            .clear()
            .map_err(|err| ViewError::session(context, err))
    }

    fn emit(&mut self, ops: &mut Vec<RenderOp>, op: RenderOp) {
        self.page.apply(&op);
        ops.push(op);
    }

    fn current_user(&self, context: ViewContext) -> Result<User, ViewError> {
        self.state
            .user()
            .cloned()
            .ok_or_else(|| ViewError::not_logged_in(context))
    }

    fn accept_user(&mut self, user: User, context: ViewContext) -> Handled {
        info!(username = %user.username, "logged in");
        self.state.sign_in(user);
        self.persist_session(context)?;

        let mut ops = Vec::new();
        self.login_and_submit_form(&mut ops);
        Ok(ops)
    }

    /// Swaps the auth forms for the logged-in view.
    fn login_and_submit_form(&mut self, ops: &mut Vec<RenderOp>) {
        self.emit(ops, RenderOp::Hide(Section::LoginForm));
        self.emit(ops, RenderOp::Hide(Section::CreateAccountForm));
        self.emit(ops, RenderOp::ResetForm(Form::Login));
        self.emit(ops, RenderOp::ResetForm(Form::CreateAccount));

        // hearts and delete buttons depend on who is looking
        let feed = self.render_story_list(&self.state.stories.stories);
        self.emit(
            ops,
            RenderOp::ReplaceList {
                list: ListId::AllStories,
                items: feed,
            },
        );
        self.emit(ops, RenderOp::Show(Section::AllStories));
        self.emit(ops, RenderOp::Show(Section::SubmitForm));
        self.generate_favorites(ops);
        self.emit(ops, RenderOp::Show(Section::FavoritedArticles));
        if let Some(profile) = self.state.user().map(Profile::from) {
            self.emit(ops, RenderOp::SetProfile(profile));
        }
        self.show_nav_for_logged_in_user(ops);
    }

    fn show_nav_for_logged_in_user(&mut self, ops: &mut Vec<RenderOp>) {
        self.emit(ops, RenderOp::Hide(Section::NavLogin));
        self.emit(ops, RenderOp::Show(Section::NavLogout));
    }

    async fn generate_stories(
        &mut self,
        ops: &mut Vec<RenderOp>,
        context: ViewContext,
    ) -> Result<(), ViewError> {
        let stories = self
            .api
            .get_stories()
            .await
            .map_err(|err| ViewError::client(context, err))?;
        self.state.stories = stories;
        let items = self.render_story_list(&self.state.stories.stories);
        self.emit(
            ops,
            RenderOp::ReplaceList {
                list: ListId::AllStories,
                items,
            },
        );
        Ok(())
    }

    fn generate_favorites(&mut self, ops: &mut Vec<RenderOp>) {
        let items = self.render_favorites();
        self.emit(
            ops,
            RenderOp::ReplaceList {
                list: ListId::Favorites,
                items,
            },
        );
    }
}

fn require_filled(context: ViewContext, fields: &[(&str, &str)]) -> Result<(), ViewError> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((field, _)) => Err(ViewError::validation(context, format!("{field} is required"))),
        None => Ok(()),
    }
}

fn validate_new_story(story: &NewStory) -> Result<(), ViewError> {
    let context = ViewContext::SubmitStory;
    require_filled(
        context,
        &[
            ("author", story.author.as_str()),
            ("title", story.title.as_str()),
            ("url", story.url.as_str()),
        ],
    )?;
    let parsed = Url::parse(story.url.trim())
        .map_err(|err| ViewError::validation(context, format!("url is invalid: {err}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ViewError::validation(
            context,
            format!("url must use http or https, not {}", parsed.scheme()),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/orchestration_tests.rs"]
mod tests;
