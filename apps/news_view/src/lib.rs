//! View layer for the news feed: page model, controller, and settings.

pub mod config;
pub mod controller;
pub mod ui;
