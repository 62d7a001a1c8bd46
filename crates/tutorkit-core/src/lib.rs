//! tutorkit-core — Curriculum model, rendering, mastery, and AI pipeline.
//!
//! This crate defines the content data model, the rendering dispatcher and
//! its widget state machines, durable mastery tracking, and the session-level
//! study-aid pipeline that the rest of tutorkit builds on.

pub mod artifact;
pub mod curriculum;
pub mod error;
pub mod mastery;
pub mod model;
pub mod prompt;
pub mod render;
pub mod session;
pub mod traits;
pub mod widgets;
