//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.

use serde::{Deserialize, Serialize};

pub const PROXY_SCORE_MAX: i64 = 100;
pub const PROXY_SCORE_MIN: i64 = 0;

/// Inclusive score window a store serves proxies from.
///
/// Proxies at `max` are preferred by `random()`; proxies outside the
/// window are never returned by `random()` or `all()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRange {
    pub min: i64,
    pub max: i64,
}

impl ScoreRange {
    /// Build a range, swapping the bounds if given in reverse.
    pub fn new(min: i64, max: i64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn contains(&self, score: i64) -> bool {
        (self.min..=self.max).contains(&score)
    }
}

impl Default for ScoreRange {
    fn default() -> Self {
        Self {
            min: PROXY_SCORE_MIN,
            max: PROXY_SCORE_MAX,
        }
    }
}
