//! Categories partition the store's key space, one subdirectory each.
//!
//! Category and file names must each be a single, visible path segment:
//! - Must be non-empty
//! - Must not contain `/`, `\`, or control characters
//! - Must not be `.` or `..`
//! - Must not start with `.` (dot-files are reserved for in-flight temp files)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// A named partition of the store.
///
/// The fixed variants have their directories created when the store opens.
/// [`Category::Custom`] directories are created on first write.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Category {
    Scenes,
    Tasks,
    Convoys,
    Messages,
    Validation,
    Assets,
    Snapshots,
    Custom(String),
}

impl Category {
    /// Categories whose directories exist as soon as the store is opened.
    pub const FIXED: [Category; 7] = [
        Category::Scenes,
        Category::Tasks,
        Category::Convoys,
        Category::Messages,
        Category::Validation,
        Category::Assets,
        Category::Snapshots,
    ];

    /// Directory name of this category.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scenes => "scenes",
            Self::Tasks => "tasks",
            Self::Convoys => "convoys",
            Self::Messages => "messages",
            Self::Validation => "validation",
            Self::Assets => "assets",
            Self::Snapshots => "snapshots",
            Self::Custom(name) => name,
        }
    }

    /// Returns `true` for one of the fixed categories.
    pub fn is_fixed(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }

    /// Check that the category maps to a valid directory name.
    ///
    /// A `Custom` spelling of a fixed name is rejected: it would share the
    /// fixed category's directory without comparing equal to it.
    pub fn validate(&self) -> StoreResult<()> {
        validate_segment(self.as_str())?;
        if let Self::Custom(name) = self {
            if Self::FIXED.iter().any(|fixed| fixed.as_str() == name) {
                return Err(StoreError::InvalidKey {
                    segment: name.clone(),
                    reason: "reserved for a fixed category; use the fixed variant".into(),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = StoreError;

    fn from_str(s: &str) -> StoreResult<Self> {
        let category = match s {
            "scenes" => Self::Scenes,
            "tasks" => Self::Tasks,
            "convoys" => Self::Convoys,
            "messages" => Self::Messages,
            "validation" => Self::Validation,
            "assets" => Self::Assets,
            "snapshots" => Self::Snapshots,
            other => {
                validate_segment(other)?;
                Self::Custom(other.to_string())
            }
        };
        Ok(category)
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.as_str().to_string()
    }
}

impl TryFrom<String> for Category {
    type Error = StoreError;

    fn try_from(value: String) -> StoreResult<Self> {
        value.parse()
    }
}

/// Validate a single category or file name segment.
///
/// # Examples
///
/// ```
/// use tether_store::validate_segment;
///
/// assert!(validate_segment("level-01.json").is_ok());
/// assert!(validate_segment("../escape").is_err());
/// assert!(validate_segment(".hidden").is_err());
/// ```
pub fn validate_segment(segment: &str) -> StoreResult<()> {
    let reject = |reason: &str| {
        Err(StoreError::InvalidKey {
            segment: segment.to_string(),
            reason: reason.into(),
        })
    };

    if segment.is_empty() {
        return reject("must not be empty");
    }
    if segment == "." || segment == ".." {
        return reject("must not be a relative directory marker");
    }
    if segment.starts_with('.') {
        return reject("must not start with '.'");
    }
    if segment.contains(['/', '\\']) {
        return reject("must not contain a path separator");
    }
    if segment.chars().any(char::is_control) {
        return reject("must not contain control characters");
    }
    Ok(())
}
