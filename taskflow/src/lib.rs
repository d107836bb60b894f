//! `TaskFlow` — in-memory task and category manager with filtered views.

pub mod board;
pub mod config;
pub mod dispatch;
pub mod store;
pub mod view;
