use std::collections::BTreeSet;

use shared::domain::StoryId;

use crate::ui::markup;

/// Containers of the page that can be shown or hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    NavLogin,
    NavLogout,
    LoginForm,
    CreateAccountForm,
    SubmitForm,
    AllStories,
    FilteredArticles,
    FavoritedArticles,
    OwnStories,
}

impl Section {
    /// Document order.
    pub const ALL: [Section; 9] = [
        Section::NavLogin,
        Section::NavLogout,
        Section::LoginForm,
        Section::CreateAccountForm,
        Section::SubmitForm,
        Section::AllStories,
        Section::FilteredArticles,
        Section::FavoritedArticles,
        Section::OwnStories,
    ];

    pub fn dom_id(self) -> &'static str {
        match self {
            Section::NavLogin => "nav-login",
            Section::NavLogout => "nav-logout",
            Section::LoginForm => "login-form",
            Section::CreateAccountForm => "create-account-form",
            Section::SubmitForm => "submit-form",
            Section::AllStories => "all-articles-list",
            Section::FilteredArticles => "filtered-articles",
            Section::FavoritedArticles => "favorited-articles",
            Section::OwnStories => "my-articles",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListId {
    AllStories,
    Favorites,
}

impl ListId {
    pub fn section(self) -> Section {
        match self {
            ListId::AllStories => Section::AllStories,
            ListId::Favorites => Section::FavoritedArticles,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Form {
    Login,
    CreateAccount,
    Submit,
}

/// One rendered `<li>` for a story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryItem {
    pub story_id: StoryId,
    pub title: String,
    pub url: String,
    pub author: String,
    pub username: String,
    pub host_name: String,
    pub favorited: bool,
    pub deletable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    Story(StoryItem),
    Placeholder(String),
}

impl ListItem {
    pub fn as_story(&self) -> Option<&StoryItem> {
        match self {
            ListItem::Story(item) => Some(item),
            ListItem::Placeholder(_) => None,
        }
    }

    fn as_story_mut(&mut self) -> Option<&mut StoryItem> {
        match self {
            ListItem::Story(item) => Some(item),
            ListItem::Placeholder(_) => None,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            ListItem::Story(item) => markup::story_item_html(item),
            ListItem::Placeholder(text) => format!("<li>{}</li>", markup::escape(text)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub username: String,
    pub account_date: String,
}

/// A single mutation of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOp {
    Show(Section),
    Hide(Section),
    Toggle(Section),
    ReplaceList { list: ListId, items: Vec<ListItem> },
    RemoveStory { list: ListId, story_id: StoryId },
    /// Flips the `fav` class on a story's heart without touching its markup.
    ToggleHeartClass { story_id: StoryId },
    /// Swaps the heart markup for the given state.
    SetHeart { story_id: StoryId, favorited: bool },
    SetProfile(Profile),
    /// Clears a form's inputs. The inputs belong to the host page, so the
    /// model only records the instruction.
    ResetForm(Form),
    Alert(String),
    /// Discards everything and returns to the page as first served.
    Reload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    visible: BTreeSet<Section>,
    all_stories: Vec<ListItem>,
    favorites: Vec<ListItem>,
    profile: Option<Profile>,
    alerts: Vec<String>,
}

impl Default for Page {
    fn default() -> Self {
        Self::initial()
    }
}

impl Page {
    /// Logged-out page: the feed and the login link are the only visible parts.
    pub fn initial() -> Self {
        Self {
            visible: BTreeSet::from([Section::AllStories, Section::NavLogin]),
            all_stories: Vec::new(),
            favorites: Vec::new(),
            profile: None,
            alerts: Vec::new(),
        }
    }

    pub fn apply(&mut self, op: &RenderOp) {
        match op {
            RenderOp::Show(section) => {
                self.visible.insert(*section);
            }
            RenderOp::Hide(section) => {
                self.visible.remove(section);
            }
            RenderOp::Toggle(section) => {
                if !self.visible.remove(section) {
                    self.visible.insert(*section);
                }
            }
            RenderOp::ReplaceList { list, items } => {
                *self.list_mut(*list) = items.clone();
            }
            RenderOp::RemoveStory { list, story_id } => {
                self.list_mut(*list).retain(|item| {
                    item.as_story()
                        .map_or(true, |story| &story.story_id != story_id)
                });
            }
            RenderOp::ToggleHeartClass { story_id } => {
                for item in self.story_items_mut(story_id) {
                    item.favorited = !item.favorited;
                }
            }
            RenderOp::SetHeart {
                story_id,
                favorited,
            } => {
                for item in self.story_items_mut(story_id) {
                    item.favorited = *favorited;
                }
            }
            RenderOp::SetProfile(profile) => {
                self.profile = Some(profile.clone());
            }
            RenderOp::ResetForm(_) => {}
            RenderOp::Alert(message) => {
                self.alerts.push(message.clone());
            }
            RenderOp::Reload => {
                *self = Self::initial();
            }
        }
    }

    pub fn is_visible(&self, section: Section) -> bool {
        self.visible.contains(&section)
    }

    pub fn list(&self, list: ListId) -> &[ListItem] {
        match list {
            ListId::AllStories => &self.all_stories,
            ListId::Favorites => &self.favorites,
        }
    }

    fn list_mut(&mut self, list: ListId) -> &mut Vec<ListItem> {
        match list {
            ListId::AllStories => &mut self.all_stories,
            ListId::Favorites => &mut self.favorites,
        }
    }

    pub fn story_ids(&self, list: ListId) -> Vec<&StoryId> {
        self.list(list)
            .iter()
            .filter_map(ListItem::as_story)
            .map(|item| &item.story_id)
            .collect()
    }

    /// First rendered item for a story, feed before favorites.
    pub fn story_item(&self, story_id: &StoryId) -> Option<&StoryItem> {
        self.all_stories
            .iter()
            .chain(self.favorites.iter())
            .filter_map(ListItem::as_story)
            .find(|item| &item.story_id == story_id)
    }

    /// Whether the story's heart currently carries the `fav` class.
    pub fn heart(&self, story_id: &StoryId) -> Option<bool> {
        self.story_item(story_id).map(|item| item.favorited)
    }

    fn story_items_mut<'a>(
        &'a mut self,
        story_id: &'a StoryId,
    ) -> impl Iterator<Item = &'a mut StoryItem> + 'a {
        self.all_stories
            .iter_mut()
            .chain(self.favorites.iter_mut())
            .filter_map(ListItem::as_story_mut)
            .filter(move |item| &item.story_id == story_id)
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// Hands pending alerts to the caller, leaving none behind.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for section in Section::ALL {
            let hidden = if self.is_visible(section) { "" } else { " hidden" };
            let id = section.dom_id();
            let line = match section {
                Section::NavLogin => format!("<a id=\"{id}\" href=\"#\"{hidden}>login/signup</a>"),
                Section::NavLogout => format!("<a id=\"{id}\" href=\"#\"{hidden}>log out</a>"),
                Section::LoginForm | Section::CreateAccountForm | Section::SubmitForm => {
                    format!("<form id=\"{id}\"{hidden}></form>")
                }
                Section::AllStories => list_html("ol", id, hidden, &self.all_stories),
                Section::FavoritedArticles => list_html("ul", id, hidden, &self.favorites),
                Section::FilteredArticles | Section::OwnStories => {
                    format!("<ul id=\"{id}\"{hidden}></ul>")
                }
            };
            html.push_str(&line);
            html.push('\n');
        }
        if let Some(profile) = &self.profile {
            html.push_str(&markup::profile_html(profile));
            html.push('\n');
        }
        html
    }
}

fn list_html(tag: &str, id: &str, hidden: &str, items: &[ListItem]) -> String {
    let body: String = items.iter().map(ListItem::to_html).collect();
    format!("<{tag} id=\"{id}\"{hidden}>{body}</{tag}>")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, favorited: bool) -> ListItem {
        ListItem::Story(StoryItem {
            story_id: StoryId::from(id),
            title: "t".into(),
            url: "https://example.com".into(),
            author: "a".into(),
            username: "u".into(),
            host_name: "example.com".into(),
            favorited,
            deletable: false,
        })
    }

    #[test]
    fn initial_page_shows_only_feed_and_login_link() {
        let page = Page::initial();
        for section in Section::ALL {
            let expected = matches!(section, Section::AllStories | Section::NavLogin);
            assert_eq!(page.is_visible(section), expected, "{section:?}");
        }
    }

    #[test]
    fn toggle_flips_visibility() {
        let mut page = Page::initial();
        page.apply(&RenderOp::Toggle(Section::LoginForm));
        page.apply(&RenderOp::Toggle(Section::AllStories));
        assert!(page.is_visible(Section::LoginForm));
        assert!(!page.is_visible(Section::AllStories));
    }

    #[test]
    fn heart_ops_touch_every_copy_of_a_story() {
        let mut page = Page::initial();
        page.apply(&RenderOp::ReplaceList {
            list: ListId::AllStories,
            items: vec![item("a", false), item("b", false)],
        });
        page.apply(&RenderOp::ReplaceList {
            list: ListId::Favorites,
            items: vec![item("a", false)],
        });

        page.apply(&RenderOp::ToggleHeartClass {
            story_id: StoryId::from("a"),
        });
        assert_eq!(page.heart(&StoryId::from("a")), Some(true));
        assert_eq!(page.heart(&StoryId::from("b")), Some(false));
        assert_eq!(
            page.list(ListId::Favorites)[0].as_story().map(|s| s.favorited),
            Some(true)
        );

        page.apply(&RenderOp::SetHeart {
            story_id: StoryId::from("a"),
            favorited: false,
        });
        assert_eq!(page.heart(&StoryId::from("a")), Some(false));
        assert_eq!(page.heart(&StoryId::from("missing")), None);
    }

    #[test]
    fn remove_story_keeps_placeholders_and_other_items() {
        let mut page = Page::initial();
        page.apply(&RenderOp::ReplaceList {
            list: ListId::AllStories,
            items: vec![item("a", false), ListItem::Placeholder("x".into()), item("b", true)],
        });
        page.apply(&RenderOp::RemoveStory {
            list: ListId::AllStories,
            story_id: StoryId::from("a"),
        });
        assert_eq!(page.list(ListId::AllStories).len(), 2);
        assert_eq!(page.story_ids(ListId::AllStories), vec![&StoryId::from("b")]);
    }

    #[test]
    fn reset_form_leaves_page_state_and_reload_restores_initial_page() {
        let mut page = Page::initial();
        page.apply(&RenderOp::Show(Section::LoginForm));
        let before = page.clone();
        page.apply(&RenderOp::ResetForm(Form::Login));
        assert_eq!(page, before);

        page.apply(&RenderOp::Show(Section::SubmitForm));
        page.apply(&RenderOp::Alert("hi".into()));
        page.apply(&RenderOp::Reload);
        assert_eq!(page, Page::initial());
    }

    #[test]
    fn taking_alerts_drains_them() {
        let mut page = Page::initial();
        page.apply(&RenderOp::Alert("first".into()));
        page.apply(&RenderOp::Alert("second".into()));

        assert_eq!(page.take_alerts(), vec!["first", "second"]);
        assert!(page.alerts().is_empty());
        assert!(page.take_alerts().is_empty());
    }

    #[test]
    fn html_marks_hidden_sections() {
        let html = Page::initial().to_html();
        assert!(html.contains("<form id=\"submit-form\" hidden></form>"));
        assert!(html.contains("<ol id=\"all-articles-list\"></ol>"));
        assert!(html.contains("<a id=\"nav-logout\" href=\"#\" hidden>log out</a>"));
    }
}
