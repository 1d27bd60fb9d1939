//! Logic variables

use std::fmt;

use serde::{Serialize, Serializer};

/// Separator used when renaming clause variables apart.
///
/// The parser only accepts word characters, so a renamed variable can
/// never collide with one written by the user.
pub const RENAME_SEPARATOR: char = '#';

/// A named logic variable
///
/// Two variables are the same variable iff their names are equal; scoping
/// is handled by renaming, not by identity.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    name: String,
}

impl Variable {
    /// Create a variable with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Variable { name: name.into() }
    }

    /// Get the variable name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A fresh copy of this variable tagged with `generation`
    pub fn renamed(&self, generation: usize) -> Self {
        Variable {
            name: format!("{}{}{}", self.base_name(), RENAME_SEPARATOR, generation),
        }
    }

    /// The name as written in the source, without any renaming tag
    pub fn base_name(&self) -> &str {
        match self.name.split_once(RENAME_SEPARATOR) {
            Some((base, _)) => base,
            None => &self.name,
        }
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.name)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl Serialize for Variable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}
