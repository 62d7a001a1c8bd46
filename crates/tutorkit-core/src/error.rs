//! Error types shared across the core.
//!
//! The taxonomy is deliberately small: content-shape problems are recovered
//! inline by the renderer, persistence problems are recovered by the mastery
//! store, and generation-parse problems are scoped to the artifact that
//! requested them. None of these are allowed to take down content viewing.

use thiserror::Error;

use crate::artifact::ArtifactKind;

/// A content node's payload is absent, mistyped, or internally inconsistent.
///
/// Always recovered locally: the rendering dispatcher converts these into an
/// inline placeholder for the offending node and keeps rendering siblings.
#[derive(Debug, Clone, Error)]
pub enum ContentShapeError {
    /// The payload required by the node's kind could not be decoded.
    #[error("missing data for kind {kind}: {reason}")]
    MissingPayload { kind: String, reason: String },

    /// An interaction was addressed to a node of the wrong kind.
    #[error("expected a {expected} node, found {found}")]
    WrongKind { expected: String, found: String },

    /// An interaction referenced an item id that does not exist in the node.
    #[error("no item {item_id} in this {kind} node")]
    UnknownItem { kind: String, item_id: String },

    /// A password criterion carries a pattern that is not a valid regex.
    #[error("criterion {criterion_id} has an invalid pattern: {reason}")]
    InvalidPattern {
        criterion_id: String,
        reason: String,
    },
}

/// The durable mastery store could not be read or written.
///
/// Load recovers by purging the corrupt record and starting empty; persist
/// recovers by logging and keeping in-memory state authoritative.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to access mastery store: {0}")]
    Io(#[from] std::io::Error),

    #[error("mastery store is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A generative-service response did not match the required structured shape.
///
/// Surfaced as a message scoped to the requesting artifact; previously
/// displayed artifacts are left untouched.
#[derive(Debug, Clone, Error)]
#[error("response for {kind} did not match the expected JSON shape: {reason}")]
pub struct GenerationParseError {
    pub kind: ArtifactKind,
    pub reason: String,
}

/// Errors raised by the study session's pipeline entry points.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// The session has no active section, or the active address no longer
    /// resolves within the curriculum.
    #[error("no section selected")]
    NoActiveSection,

    /// The channel already has a request in flight.
    #[error("the {0} channel is busy with an in-flight request")]
    ChannelBusy(&'static str),

    /// A chat message with no content was submitted.
    #[error("cannot send an empty question")]
    EmptyQuestion,
}
