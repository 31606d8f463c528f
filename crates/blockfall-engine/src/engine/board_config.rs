use serde::{Deserialize, Serialize};

use super::piece_source::PieceSeed;

/// Construction-time settings of a [`Board`](super::Board).
///
/// Every combination is valid. Missing fields take their defaults when
/// deserialized, so drivers can load a partial configuration:
///
/// ```
/// use blockfall_engine::BoardConfig;
///
/// let config: BoardConfig = serde_json::from_str(r#"{ "gravity": false }"#).unwrap();
/// assert!(!config.gravity);
/// assert!(config.seed.is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Drop blocks into the gap left under a cleared row. Can be toggled
    /// later with [`Board::set_gravity`](super::Board::set_gravity).
    pub gravity: bool,
    /// Seed of the random piece source; `None` seeds from the thread RNG.
    pub seed: Option<PieceSeed>,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            gravity: true,
            seed: None,
        }
    }
}

impl BoardConfig {
    #[must_use]
    pub fn with_gravity(self, gravity: bool) -> Self {
        Self { gravity, ..self }
    }

    #[must_use]
    pub fn with_seed(self, seed: PieceSeed) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }
}
