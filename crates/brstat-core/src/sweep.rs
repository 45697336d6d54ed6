//! Which conditions get compared at which target bitrates.
//!
//! A sweep file is JSON:
//!
//! ```json
//! {
//!   "comparisons": [
//!     {
//!       "bitrate": 900,
//!       "conditions": [
//!         { "codec": "H264", "resolution": "_small_", "fps": 30 },
//!         { "codec": "VP8", "resolution": "_small_", "fps": 30 }
//!       ]
//!     }
//!   ]
//! }
//! ```

use crate::layout::Condition;
use crate::{Error, Result};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Conditions reported side by side on one output line
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Comparison {
    pub bitrate: u32,
    pub conditions: Vec<Condition>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Sweep {
    pub comparisons: Vec<Comparison>,
}

/// Conditions one comparison line can hold
pub const MAX_CONDITIONS: usize = 5;

const BUILTIN_BITRATES: [u32; 7] = [600, 900, 1300, 1800, 2700, 4000, 6000];

impl Sweep {
    /// H264 at 15 and 30 fps, small and large resolution
    pub fn builtin() -> Self {
        let conditions = vec![
            Condition::new("H264", "_small_", 15),
            Condition::new("H264", "_small_", 30),
            Condition::new("H264", "_large_", 15),
            Condition::new("H264", "_large_", 30),
        ];

        Self {
            comparisons: BUILTIN_BITRATES
                .iter()
                .map(|&bitrate| Comparison {
                    bitrate,
                    conditions: conditions.clone(),
                })
                .collect(),
        }
    }

    /// Read and validate a sweep file
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Reading sweep from: {}", path.display());

        let file = File::open(path)?;
        let sweep: Sweep = serde_json::from_reader(BufReader::new(file))?;
        sweep.validate()?;

        tracing::info!(
            "Loaded sweep with {} comparisons from {}",
            sweep.comparisons.len(),
            path.display()
        );

        Ok(sweep)
    }

    /// Parse and validate a sweep from a JSON string
    pub fn from_str(content: &str) -> Result<Self> {
        let sweep: Sweep = serde_json::from_str(content)?;
        sweep.validate()?;
        Ok(sweep)
    }

    pub fn validate(&self) -> Result<()> {
        if self.comparisons.is_empty() {
            return Err(Error::InvalidSweep("Sweep has no comparisons".to_string()));
        }

        for (idx, comparison) in self.comparisons.iter().enumerate() {
            if comparison.conditions.is_empty() {
                return Err(Error::InvalidSweep(format!(
                    "Comparison {} at bitrate {} has no conditions",
                    idx, comparison.bitrate
                )));
            }
            if comparison.conditions.len() > MAX_CONDITIONS {
                return Err(Error::InvalidSweep(format!(
                    "Comparison {} at bitrate {} has {} conditions, at most {} allowed",
                    idx,
                    comparison.bitrate,
                    comparison.conditions.len(),
                    MAX_CONDITIONS
                )));
            }
            for condition in &comparison.conditions {
                if condition.codec.is_empty() || condition.resolution.is_empty() {
                    return Err(Error::InvalidSweep(format!(
                        "Comparison {} has a condition with an empty codec or resolution",
                        idx
                    )));
                }
                if condition.codec.contains(['/', '\\']) || condition.codec == ".." {
                    return Err(Error::InvalidSweep(format!(
                        "Codec '{}' is not a folder name",
                        condition.codec
                    )));
                }
            }
        }

        Ok(())
    }
}
