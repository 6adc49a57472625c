//! Controller layer: user actions, application state, and the handlers that turn
//! actions into API calls and page updates.

pub mod events;
pub mod orchestration;
pub mod state;

pub use events::{UserAction, ViewContext, ViewError, ViewErrorCategory};
pub use orchestration::ViewController;
pub use state::AppState;
