pub mod actions;
mod app;
mod backend_banner;
mod error_modal;
pub mod generation;
mod message_overlay;
mod modal;
mod sections;
pub mod theme;
mod top_bar;
pub mod widgets;

pub use app::BookgenApp;
