pub mod analysis;
pub mod candidate;

pub use analysis::{AnalysisRequest, AnalysisResult, CandidateRecord};
pub use candidate::{CandidateMatch, ScoreBand};

use serde::{Deserialize, Deserializer};

/// Treats an explicit JSON `null` the same as a missing field.
/// The backend serialises empty optional collections either way.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Scores arrive as integers or as floats such as `82.5`. Both are rounded to
/// the nearest whole point and clamped to 0 – 100.
pub(crate) fn score<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    f64::deserialize(deserializer).map(whole_points)
}

pub(crate) fn optional_score<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.map(whole_points))
}

fn whole_points(raw: f64) -> u32 {
    if raw.is_finite() {
        raw.round().clamp(0.0, 100.0) as u32
    } else {
        0
    }
}
