#![forbid(unsafe_code)]

//! Core: color model, key decoding, input sources, and terminal lifecycle.

pub mod byte_source;
pub mod color;
pub mod config;
pub mod error;
pub mod event_record;
pub mod key;
pub mod key_decoder;
pub mod key_source;
pub mod terminal_capabilities;
pub mod terminal_session;

pub use error::{Error, Result};
