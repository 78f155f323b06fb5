use serde::{Deserialize, Serialize};

/// Connection class as reported by the host's network monitor.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NetworkClass {
    #[serde(rename = "slow-2g")]
    Slow2g,
    #[serde(rename = "2g")]
    TwoG,
    #[serde(rename = "3g")]
    ThreeG,
    #[serde(rename = "4g")]
    FourG,
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl NetworkClass {
    /// Bars lit on the 4-segment indicator.
    pub fn signal_strength(self) -> u8 {
        match self {
            NetworkClass::Slow2g | NetworkClass::TwoG => 1,
            NetworkClass::ThreeG => 3,
            NetworkClass::FourG => 4,
            NetworkClass::Unknown => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NetworkClass::Slow2g => "SLOW-2G",
            NetworkClass::TwoG => "2G",
            NetworkClass::ThreeG => "3G",
            NetworkClass::FourG => "4G",
            NetworkClass::Unknown => "UNKNOWN",
        }
    }
}

/// Snapshot of connection quality, read from the external network-monitor
/// collaborator. The engine only summarizes it on the badge.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInfo {
    pub effective_class: NetworkClass,
    pub downlink_mbps: f64,
    pub rtt_ms: f64,
    #[serde(default)]
    pub save_data: bool,
}

#[cfg(test)]
mod tests {
    use super::{NetworkClass, NetworkInfo};

    #[test]
    fn signal_strength_ranks_classes() {
        assert_eq!(NetworkClass::FourG.signal_strength(), 4);
        assert_eq!(NetworkClass::ThreeG.signal_strength(), 3);
        assert_eq!(NetworkClass::TwoG.signal_strength(), 1);
        assert_eq!(NetworkClass::Unknown.signal_strength(), 2);
    }

    #[test]
    fn wire_names_match_the_navigator_api() {
        let info: NetworkInfo = serde_json::from_str(
            r#"{"effectiveClass":"slow-2g","downlinkMbps":0.4,"rttMs":900}"#,
        )
        .unwrap();
        assert_eq!(info.effective_class, NetworkClass::Slow2g);
        assert!(!info.save_data);
    }
}
