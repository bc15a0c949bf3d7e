//! Errors surfaced to clients through acknowledgments.

use thiserror::Error;

/// A recoverable chat error, reported back to the client that caused it.
///
/// The display strings are what clients see in their acknowledgment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChatError {
    /// Username or room was empty after trimming.
    #[error("Username and room are required!")]
    Validation,

    /// Another user in the room already has this username.
    #[error("Username is in use!")]
    DuplicateUsername,

    /// The connection has already joined a room.
    #[error("Already joined a room!")]
    AlreadyJoined,

    /// The message was blocked by the profanity filter.
    #[error("Profanity is not allowed!")]
    ProfanityRejected,
}
