/*!
# Draw Modes

Two levels of detail for plot tracks:
- Interactive: sampled to at most a few thousand points while zooming or dragging
- Final: every point in the visible range, used for exports and settled frames
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawMode {
    Interactive,
    #[default]
    Final,
}

impl DrawMode {
    /// Whether the plot renderer should take its sampled path
    pub fn is_fast(self) -> bool {
        matches!(self, DrawMode::Interactive)
    }

    /// Mode for a frame drawn while the view is still moving
    pub fn for_motion(in_motion: bool) -> Self {
        if in_motion {
            DrawMode::Interactive
        } else {
            DrawMode::Final
        }
    }
}

impl fmt::Display for DrawMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawMode::Interactive => write!(f, "interactive"),
            DrawMode::Final => write!(f, "final"),
        }
    }
}

impl FromStr for DrawMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "interactive" | "fast" => Ok(DrawMode::Interactive),
            "final" | "full" => Ok(DrawMode::Final),
            other => anyhow::bail!("unknown draw mode '{other}' (expected interactive or final)"),
        }
    }
}
