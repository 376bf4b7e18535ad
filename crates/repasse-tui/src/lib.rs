//! Terminal front end: one screen with the municipality search, the period
//! form, the result card and the replayable history.

pub mod action;
pub mod app;
pub mod component;
pub mod components;
pub mod config;
pub mod event;
pub mod focus;
pub mod keymap;
pub mod theme;
pub mod tui;
pub mod widgets;
