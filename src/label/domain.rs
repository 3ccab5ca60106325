//! Core label domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId};

/// A validated, non-empty, trimmed label name.
///
/// Deserializing validates the name like [LabelName::new].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct LabelName(String);

impl LabelName {
    /// Create a label name from user input, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyLabelName] if `name` is empty or only whitespace.
    pub fn new(name: &str) -> Result<Self, Error> {
        let name = name.trim();

        if name.is_empty() {
            Err(Error::EmptyLabelName)
        } else {
            Ok(Self(name.to_string()))
        }
    }

    /// Create a label name without validation.
    ///
    /// The caller should ensure that the string is not empty. Used for names read back from the
    /// database, which may predate validation.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }

    /// Whether two names are equal ignoring case, e.g. "Miete" and "miete".
    pub fn eq_ignore_case(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.trim().to_lowercase()
    }
}

impl AsRef<str> for LabelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for LabelName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LabelName::new(s)
    }
}

impl TryFrom<String> for LabelName {
    type Error = Error;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        LabelName::new(&name)
    }
}

impl From<LabelName> for String {
    fn from(name: LabelName) -> Self {
        name.0
    }
}

impl Display for LabelName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a label.
pub type LabelId = DatabaseId;

/// A free-text label attached to one or more transactions (e.g., 'Miete', 'Urlaub').
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct Label {
    /// The ID of the label.
    #[serde(rename = "LabelID")]
    pub id: LabelId,
    /// The label text.
    #[serde(rename = "Name")]
    pub name: LabelName,
}
