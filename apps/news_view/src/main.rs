use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{FileSessionStore, HttpNewsApi};
use news_view::{
    config::{load_settings, normalize_api_url},
    controller::{UserAction, ViewController},
};
use shared::domain::{NewStory, StoryId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Browse and manage the story feed from the terminal")]
struct Cli {
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    session_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the page and print the story feed.
    Feed,
    /// Reload the feed as when clicking the home link.
    Home,
    ShowLogin,
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Favorite {
        story_id: String,
    },
    Delete {
        story_id: String,
    },
    Submit {
        #[arg(long)]
        author: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
    },
}

impl Command {
    fn into_action(self) -> Option<UserAction> {
        match self {
            Command::Feed => None,
            Command::Home => Some(UserAction::NavigateHome),
            Command::ShowLogin => Some(UserAction::ShowLoginForms),
            Command::Login { username, password } => Some(UserAction::Login { username, password }),
            Command::Signup {
                name,
                username,
                password,
            } => Some(UserAction::Signup {
                name,
                username,
                password,
            }),
            Command::Logout => Some(UserAction::Logout),
            Command::Favorite { story_id } => Some(UserAction::ToggleFavorite {
                story_id: StoryId(story_id),
            }),
            Command::Delete { story_id } => Some(UserAction::DeleteStory {
                story_id: StoryId(story_id),
            }),
            Command::Submit { author, title, url } => {
                Some(UserAction::SubmitStory(NewStory { author, title, url }))
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_url = normalize_api_url(&api_url);
    }
    if let Some(session_path) = cli.session_path {
        settings.session_path = session_path;
    }

    let api = HttpNewsApi::new(&settings.api_url)
        .with_context(|| format!("invalid api url '{}'", settings.api_url))?
        .with_story_limit(settings.story_limit);
    let store = FileSessionStore::new(&settings.session_path);
    let mut controller = ViewController::new(api, store);

    // Logout clears the store and runs the load sequence itself.
    let action = cli.command.into_action();
    if !matches!(action, Some(UserAction::Logout)) {
        controller.dispatch(UserAction::RestoreSession).await?;
    }
    if let Some(action) = action {
        controller.dispatch(action).await?;
    }

    for alert in controller.page_mut().take_alerts() {
        eprintln!("alert: {alert}");
    }
    print!("{}", controller.page().to_html());
    Ok(())
}
