//! Operation lists for driving a [`BTree`].
//!
//! A script is a comma-separated list of operations such as
//! `"ins 10, ins 20, del 10, find 20"`. Each operation is a verb followed by a
//! base-10 key. Verbs are case-insensitive:
//!
//! | Operation | Verbs                      |
//! |-----------|----------------------------|
//! | insert    | `ins`, `insert`            |
//! | delete    | `del`, `delete`, `rm`      |
//! | find      | `find`, `search`, `has`    |

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

use crate::BTree;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Insert(i64),
    Delete(i64),
    Find(i64),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty operation")]
    Empty,
    #[error("operation {token:?} is missing a key (e.g. \"ins 10\")")]
    MissingArgument { token: String },
    #[error("operation {token:?} has unexpected trailing input")]
    TrailingInput { token: String },
    #[error("unknown operation {verb:?} in {token:?} (expected ins/del/find)")]
    UnknownVerb { token: String, verb: String },
    #[error("invalid key in {token:?}: {source}")]
    InvalidKey {
        token: String,
        #[source]
        source: ParseIntError,
    },
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let mut fields = token.split_whitespace();
        let verb = fields.next().ok_or(ParseError::Empty)?;
        let arg = fields.next().ok_or_else(|| ParseError::MissingArgument {
            token: token.to_string(),
        })?;
        if fields.next().is_some() {
            return Err(ParseError::TrailingInput {
                token: token.to_string(),
            });
        }

        let key: i64 = arg.parse().map_err(|source| ParseError::InvalidKey {
            token: token.to_string(),
            source,
        })?;

        match verb.to_ascii_lowercase().as_str() {
            "ins" | "insert" => Ok(Command::Insert(key)),
            "del" | "delete" | "rm" => Ok(Command::Delete(key)),
            "find" | "search" | "has" => Ok(Command::Find(key)),
            _ => Err(ParseError::UnknownVerb {
                token: token.to_string(),
                verb: verb.to_string(),
            }),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Insert(key) => write!(f, "ins {key}"),
            Command::Delete(key) => write!(f, "del {key}"),
            Command::Find(key) => write!(f, "find {key}"),
        }
    }
}

/// What applying a [`Command`] did to the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Inserted { key: i64, added: bool },
    Deleted { key: i64, removed: bool },
    Found { key: i64, present: bool },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Outcome::Inserted { key, added: true } => write!(f, "ins {key} => added"),
            Outcome::Inserted { key, added: false } => write!(f, "ins {key} => already present"),
            Outcome::Deleted { key, removed: true } => write!(f, "del {key} => removed"),
            Outcome::Deleted { key, removed: false } => write!(f, "del {key} => absent"),
            Outcome::Found { key, present } => write!(f, "find {key} => {present}"),
        }
    }
}

impl Command {
    pub fn apply(&self, tree: &mut BTree) -> Outcome {
        match *self {
            Command::Insert(key) => Outcome::Inserted {
                key,
                added: tree.insert(key),
            },
            Command::Delete(key) => Outcome::Deleted {
                key,
                removed: tree.delete(key),
            },
            Command::Find(key) => Outcome::Found {
                key,
                present: tree.search(key),
            },
        }
    }
}

/// Parses a comma-separated script. Blank entries are skipped; the first
/// malformed entry aborts parsing.
pub fn parse_script(script: &str) -> Result<Vec<Command>, ParseError> {
    script
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}
