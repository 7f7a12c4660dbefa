//! Searchable text columns of a simulation entry

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A display-name field that can be searched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Topic,
    Chapter,
    Subject,
}

impl SearchField {
    /// All searchable fields, the default search scope
    pub const ALL: [Self; 3] = [Self::Topic, Self::Chapter, Self::Subject];

    /// Column name in the `simulations` table
    pub const fn column(self) -> &'static str {
        match self {
            Self::Topic => "topic",
            Self::Chapter => "chapter",
            Self::Subject => "subject",
        }
    }

    /// Parse a comma-separated field list such as `topic,subject`
    ///
    /// Blank items are skipped and duplicates collapsed. An empty list yields
    /// all fields.
    ///
    /// # Errors
    /// Returns an error for any unknown field name.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, DomainError> {
        let mut fields = Vec::new();
        for item in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let field = item.parse::<Self>()?;
            if !fields.contains(&field) {
                fields.push(field);
            }
        }
        if fields.is_empty() {
            return Ok(Self::ALL.to_vec());
        }
        Ok(fields)
    }
}

impl FromStr for SearchField {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "topic" => Ok(Self::Topic),
            "chapter" => Ok(Self::Chapter),
            "subject" => Ok(Self::Subject),
            _ => Err(DomainError::InvalidSearchField(s.to_string())),
        }
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}
