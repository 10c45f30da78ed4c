use serde::{Deserialize, Serialize};

/// Indicator values derived from one window snapshot.
///
/// `None` means the window did not hold enough samples for that indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_50: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_21: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_34: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr_14: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atr_14_mean_20: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adx_14: Option<f64>,
}

impl IndicatorSnapshot {
    /// True when every value the entry rule reads is defined.
    pub fn is_complete(&self) -> bool {
        self.ema_50.is_some()
            && self.atr_14.is_some()
            && self.atr_14_mean_20.is_some()
            && self.adx_14.is_some()
    }
}
