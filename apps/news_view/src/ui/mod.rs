//! Headless page model and the markup it renders to.

pub mod markup;
pub mod page;

pub use page::{Form, ListId, ListItem, Page, Profile, RenderOp, Section, StoryItem};
