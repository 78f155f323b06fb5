/// Which layer the renderer paints. Exactly one is active; a switch takes
/// effect on the next scheduled frame because the renderer reads the mode
/// once per frame, never mid-frame.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ViewMode {
    #[default]
    Points,
    Heatmap,
    Predictions,
}

impl ViewMode {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "heatmap" | "heat" => ViewMode::Heatmap,
            "predictions" | "prediction" => ViewMode::Predictions,
            _ => ViewMode::Points,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Points => "points",
            ViewMode::Heatmap => "heatmap",
            ViewMode::Predictions => "predictions",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ViewMode;

    #[test]
    fn parses_known_modes_and_defaults_to_points() {
        assert_eq!(ViewMode::from_str("heatmap"), ViewMode::Heatmap);
        assert_eq!(ViewMode::from_str(" Predictions "), ViewMode::Predictions);
        assert_eq!(ViewMode::from_str("nonsense"), ViewMode::Points);
    }

    #[test]
    fn round_trips_through_strings() {
        for mode in [ViewMode::Points, ViewMode::Heatmap, ViewMode::Predictions] {
            assert_eq!(ViewMode::from_str(mode.as_str()), mode);
        }
    }
}
