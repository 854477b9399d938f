use crate::{CoreError, Result as CoreErrorResult};

use std::fmt;
use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Reference to a single record: table name plus record id.
///
/// Rendered and parsed as `table:id`. The id may itself contain colons,
/// only the first one separates the table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Thing {
    pub tb: String,
    pub id: String,
}

impl Thing {
    pub fn new(tb: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            tb: tb.into(),
            id: id.into(),
        }
    }
}

impl fmt::Display for Thing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tb, self.id)
    }
}

impl FromStr for Thing {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s.split_once(':') {
            Some((tb, id)) if !tb.is_empty() && !id.is_empty() => Ok(Self::new(tb, id)),
            _ => Err(CoreError::InvalidThing {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl Serialize for Thing {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Thing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Thing::from_str(&s).map_err(serde::de::Error::custom)
    }
}
