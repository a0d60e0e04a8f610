//! Result of breaking a goal down into steps.

use serde::{Deserialize, Serialize};

/// What the decomposition service returns for one goal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Decomposition {
    /// The single essential objective behind the goal
    pub one_thing: String,

    /// Ordered instructions, usually three to five
    pub steps: Vec<String>,

    /// Short motivational line
    pub call_to_action: String,
}
