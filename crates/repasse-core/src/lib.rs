//! Search coordinator, lookup client and result history for the repasse terminal client.
//!
//! Nothing in here touches the terminal: [`coordinator::Coordinator`] holds all
//! state and is driven by explicit transitions, so the same logic can be
//! exercised from tests without a rendering surface.

pub mod coordinator;
pub mod dates;
pub mod error;
pub mod history;
pub mod model;
pub mod money;
pub mod render;
pub mod selection;
pub mod service;
pub mod session;
pub mod suggestions;
