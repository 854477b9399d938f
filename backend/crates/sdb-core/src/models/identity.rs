use crate::Thing;

use serde::{Deserialize, Serialize};

/// Principal bound to a scope-level trust context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identity {
    /// Raw record reference taken from token claims
    Thing(Thing),
    /// Record materialized by a scope's connect statement
    Record(serde_json::Value),
}

impl Identity {
    /// Value bound to the `id` variable of a connect statement
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            Self::Thing(thing) => serde_json::Value::String(thing.to_string()),
            Self::Record(record) => record.clone(),
        }
    }

    pub fn as_thing(&self) -> Option<&Thing> {
        match self {
            Self::Thing(thing) => Some(thing),
            Self::Record(_) => None,
        }
    }
}

impl From<Thing> for Identity {
    fn from(thing: Thing) -> Self {
        Self::Thing(thing)
    }
}
