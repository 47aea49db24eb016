//! Renderers for a [`crate::models::ChannelReport`].
//!
//! # Submodules
//!
//! - [`html`]: the URL form and the result page served by [`crate::web`]
//! - [`text`]: the console layout printed by `channel_pulse inspect`
//! - [`json`]: JSON files written by `inspect --json-output-dir`

pub mod html;
pub mod json;
pub mod text;
