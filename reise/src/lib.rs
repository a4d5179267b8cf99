//! Stop lookup and departure boards for Norwegian public transport.
//!
//! Answers "when does the next bus leave from here?" by resolving a typed
//! stop name against a local alias cache or the Entur directory, then
//! fetching and filtering the stop's departure board.

pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod domain;
pub mod entur;
pub mod error;
pub mod filter;
pub mod prompt;
pub mod resolve;
pub mod store;

pub use error::Error;
