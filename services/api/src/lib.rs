//! Quiz API Library Crate
//!
//! This library contains all the logic for the quiz web service, including
//! configuration, the session store, the HTML pages, the JSON API handlers,
//! and routing. The binaries under `bin/` are thin wrappers around it.

pub mod config;
pub mod handlers;
pub mod models;
pub mod pages;
pub mod quiz;
pub mod router;
pub mod state;
pub mod store;
pub mod views;
