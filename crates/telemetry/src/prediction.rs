use serde::{Deserialize, Serialize};

/// Forecast congestion for one future hour. Sequences are finite, ordered
/// by `hour_offset`, and regenerated wholesale by the upstream producer.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub hour_offset: u32,
    pub predicted_congestion: f64,
    pub confidence: f64,
}
