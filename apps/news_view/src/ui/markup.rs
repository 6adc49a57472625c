//! Story item markup and the small text helpers behind it.

use chrono::SecondsFormat;
use shared::domain::{Story, User};

use crate::ui::page::{Profile, StoryItem};

pub const HEART_FALSE: &str = r#"<i class="far fa-heart fav-button"></i>"#;
pub const HEART_TRUE: &str = r#"<i class="fas fa-heart fav-button fav"></i>"#;
pub const DELETE_BUTTON: &str = r#"<button class="del-but">Delete Story</button>"#;
pub const EMPTY_FAVORITES: &str = "..Empty..";

/// Hostname shown next to a story: scheme and path dropped, leading `www.` removed.
///
/// Ports and credentials are kept as typed; this is a display label, not a parse.
pub fn host_name(url: &str) -> &str {
    let host = if url.contains("://") {
        url.split('/').nth(2)
    } else {
        url.split('/').next()
    }
    .unwrap_or_default();
    host.strip_prefix("www.").unwrap_or(host)
}

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Builds the list item for `story` as seen by `viewer`.
pub fn story_item(story: &Story, viewer: Option<&User>) -> StoryItem {
    StoryItem {
        story_id: story.story_id.clone(),
        title: story.title.clone(),
        url: story.url.clone(),
        author: story.author.clone(),
        username: story.username.clone(),
        host_name: host_name(&story.url).to_string(),
        favorited: viewer.is_some_and(|user| user.has_favorite(&story.story_id)),
        deletable: viewer.is_some_and(|user| user.owns(story)),
    }
}

pub fn story_item_html(item: &StoryItem) -> String {
    let heart = if item.favorited { HEART_TRUE } else { HEART_FALSE };
    let delete = if item.deletable { DELETE_BUTTON } else { "" };
    let host = escape(&item.host_name);
    format!(
        "<li id=\"{id}\">{heart}\
         <a class=\"article-link\" href=\"{url}\" target=\"a_blank\"><strong>{title}</strong></a>\
         <small class=\"article-author\">by {author}</small>\
         <small class=\"article-hostname {host}\">({host})</small>\
         <small class=\"article-username\">posted by {username}</small>\
         {delete}</li>",
        id = escape(item.story_id.as_str()),
        url = escape(&item.url),
        title = escape(&item.title),
        author = escape(&item.author),
        username = escape(&item.username),
    )
}

impl From<&User> for Profile {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            username: user.username.clone(),
            account_date: user
                .created_at
                .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true))
                .unwrap_or_default(),
        }
    }
}

pub fn profile_html(profile: &Profile) -> String {
    format!(
        "<section id=\"user-profile\">\
         <div id=\"profile-name\">Name: {}</div>\
         <div id=\"profile-username\">Username: {}</div>\
         <div id=\"profile-account-date\">Account Created: {}</div>\
         </section>",
        escape(&profile.name),
        escape(&profile.username),
        escape(&profile.account_date),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::StoryId;

    fn story(id: &str, url: &str, username: &str) -> Story {
        Story {
            story_id: StoryId::from(id),
            title: "A <b>bold</b> claim".into(),
            author: "Ada".into(),
            url: url.into(),
            username: username.into(),
            created_at: None,
            updated_at: None,
        }
    }

    fn viewer(favorites: Vec<Story>) -> User {
        User {
            username: "ada".into(),
            name: "Ada".into(),
            created_at: None,
            login_token: "tok".into(),
            favorites,
            own_stories: Vec::new(),
        }
    }

    #[test]
    fn host_name_strips_scheme_path_and_www() {
        assert_eq!(host_name("https://www.example.com/a"), "example.com");
        assert_eq!(host_name("http://news.ycombinator.com/item?id=1"), "news.ycombinator.com");
        assert_eq!(host_name("www.rust-lang.org/learn"), "rust-lang.org");
        assert_eq!(host_name("example.org"), "example.org");
        assert_eq!(host_name("http://localhost:8080/x"), "localhost:8080");
        assert_eq!(host_name("https://wwwx.io"), "wwwx.io");
    }

    #[test]
    fn logged_out_viewer_gets_plain_item() {
        let item = story_item(&story("s1", "https://www.example.com/a", "ada"), None);
        assert!(!item.favorited);
        assert!(!item.deletable);
        assert_eq!(item.host_name, "example.com");
    }

    #[test]
    fn favorites_and_ownership_drive_heart_and_delete_button() {
        let fav = story("s1", "https://a.io", "bob");
        let user = viewer(vec![fav.clone()]);

        let favorited = story_item(&fav, Some(&user));
        assert!(favorited.favorited);
        assert!(!favorited.deletable);

        let own = story_item(&story("s2", "https://b.io", "ada"), Some(&user));
        assert!(!own.favorited);
        assert!(own.deletable);

        let html = story_item_html(&own);
        assert!(html.starts_with("<li id=\"s2\"><i class=\"far fa-heart fav-button\"></i>"));
        assert!(html.contains(DELETE_BUTTON));
        assert!(html.contains("<small class=\"article-hostname b.io\">(b.io)</small>"));
        assert!(html.contains("<strong>A &lt;b&gt;bold&lt;/b&gt; claim</strong>"));
        assert!(story_item_html(&favorited).contains(HEART_TRUE));
    }

    #[test]
    fn profile_uses_created_at_timestamp() {
        let mut user = viewer(Vec::new());
        user.created_at = "2017-11-09T18:38:39.409Z".parse().ok();
        let profile = Profile::from(&user);
        assert_eq!(profile.account_date, "2017-11-09T18:38:39.409Z");
        assert!(profile_html(&profile).contains("<div id=\"profile-username\">Username: ada</div>"));
    }
}
