//! Chess client: interaction state machine, keyboard navigation and remote
//! match sessions, with a gpui front end.

pub mod app;
pub mod config;
pub mod domain;
pub mod models;
pub mod ui;
