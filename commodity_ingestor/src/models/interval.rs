use std::fmt;

use serde::{Deserialize, Serialize};

/// Sampling interval of a series.
///
/// Only monthly series are served today. The interval is part of the storage path,
/// so adding a variant never collides with records already written for another one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesInterval {
    #[default]
    Monthly,
}

impl SeriesInterval {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SeriesInterval::Monthly => "monthly",
        }
    }
}

impl fmt::Display for SeriesInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
