//! @ai:module:intent Define the closed four-class triage label vocabulary
//! @ai:module:layer domain
//! @ai:module:public_api Label
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// @ai:intent Triage label assigned to a message, from most to least severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Crisis,
    Red,
    Amber,
    Green,
}

impl Label {
    /// All labels in reporting order.
    pub const ALL: [Label; 4] = [Label::Crisis, Label::Red, Label::Amber, Label::Green];

    /// @ai:intent Convert label to its canonical lowercase name
    /// @ai:effects pure
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Crisis => "crisis",
            Label::Red => "red",
            Label::Amber => "amber",
            Label::Green => "green",
        }
    }

    /// @ai:intent Position of the label in `Label::ALL`, used to index tallies
    /// @ai:effects pure
    pub fn index(&self) -> usize {
        match self {
            Label::Crisis => 0,
            Label::Red => 1,
            Label::Amber => 2,
            Label::Green => 3,
        }
    }

    /// @ai:intent Clinical severity rank, higher is more severe
    /// @ai:effects pure
    pub fn severity(&self) -> u8 {
        3 - self.index() as u8
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Label {
    type Err = String;

    /// @ai:intent Parse a label case-insensitively, returning the raw text on failure
    /// @ai:effects pure
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Label::ALL
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}
