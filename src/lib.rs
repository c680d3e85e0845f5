pub mod api;
pub mod config;
pub mod core;
pub mod gui;
pub mod launcher;
pub mod persistence;
