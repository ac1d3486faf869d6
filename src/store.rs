//! Turn-ordered conversation history
//!
//! This module defines the message store that backs a conversation: an
//! ordered, append-only sequence of turns. Insertion order is conversational
//! order and determines exactly what context a backend sees. Past entries
//! are never edited or removed.

use crate::error::{PalaverError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a turn's author
///
/// Serialized in lowercase to match the wire format that generation
/// backends expect (`"system"`, `"user"`, `"assistant"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions that frame the conversation
    System,
    /// A message from the caller
    User,
    /// A reply produced by the backend
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for Role {
    type Err = PalaverError;

    /// Parses a role from its lowercase wire form
    ///
    /// # Errors
    ///
    /// Returns `PalaverError::InvalidTurn` for unrecognized role strings.
    ///
    /// # Examples
    ///
    /// ```
    /// use palaver::store::Role;
    ///
    /// let role: Role = "assistant".parse().unwrap();
    /// assert_eq!(role, Role::Assistant);
    /// assert!("tool".parse::<Role>().is_err());
    /// ```
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "system" => Ok(Self::System),
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            other => Err(PalaverError::InvalidTurn(format!(
                "unrecognized role: {}",
                other
            ))),
        }
    }
}

/// One message in a conversation
///
/// A turn is an immutable record of a role and its text content. Turns are
/// created once, appended to a [`MessageStore`], and never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who authored the turn
    pub role: Role,
    /// Text content of the turn
    pub content: String,
}

impl Turn {
    /// Creates a new user turn
    ///
    /// # Examples
    ///
    /// ```
    /// use palaver::store::{Role, Turn};
    ///
    /// let turn = Turn::user("Hello, assistant!");
    /// assert_eq!(turn.role, Role::User);
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates a new assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Creates a new system turn
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Ordered, append-only history of turns for one conversation
///
/// The sequence passed to a backend on turn N is exactly the first N-1
/// committed turns plus the new user turn: no reordering, no truncation.
/// The store holds history in memory only, for the duration of one run.
///
/// # Examples
///
/// ```
/// use palaver::store::{MessageStore, Turn};
///
/// let mut store = MessageStore::new();
/// store.append(Turn::user("Hello")).unwrap();
/// store.append(Turn::assistant("Hi there")).unwrap();
/// assert_eq!(store.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageStore {
    turns: Vec<Turn>,
}

impl MessageStore {
    /// Creates an empty message store
    pub fn new() -> Self {
        Self { turns: Vec::new() }
    }

    /// Appends a turn to the end of the history
    ///
    /// # Errors
    ///
    /// Returns `PalaverError::InvalidTurn` if the turn's content is empty or
    /// whitespace-only. The store is unchanged on failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use palaver::store::{MessageStore, Turn};
    ///
    /// let mut store = MessageStore::new();
    /// assert!(store.append(Turn::user("   ")).is_err());
    /// assert!(store.is_empty());
    /// ```
    pub fn append(&mut self, turn: Turn) -> Result<()> {
        if turn.content.trim().is_empty() {
            return Err(PalaverError::InvalidTurn(format!(
                "{} turn has empty content",
                turn.role
            ))
            .into());
        }

        self.turns.push(turn);
        Ok(())
    }

    /// Returns an owned copy of the full ordered history as of the call
    ///
    /// The snapshot is copy-on-read: later appends never retroactively
    /// mutate a previously returned snapshot.
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    /// Returns a read-only view of the turns
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Returns the number of turns in the history
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Returns true if the history has no turns
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
