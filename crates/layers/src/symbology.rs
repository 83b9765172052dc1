use remote::{NearbyStatus, SlotStatus, WeatherStatus};

/// How one status is drawn: fill colour, legend label and glyph.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StatusStyle {
    pub color: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

impl StatusStyle {
    pub const fn new(color: &'static str, label: &'static str, icon: &'static str) -> Self {
        Self { color, label, icon }
    }
}

pub const USER_MARKER_COLOR: &str = "#3b82f6";
pub const PLACE_MARKER_COLOR: &str = "#f59e0b";
pub const SUN_RAY_COLOR: &str = "#f59e0b";

/// Timeline segment colour for statuses the client does not know.
pub const NEUTRAL_SEGMENT_COLOR: &str = "#e5e7eb";

/// Legend order of the timeline.
pub const SLOT_LEGEND: [SlotStatus; 5] = [
    SlotStatus::Sun,
    SlotStatus::Mixed,
    SlotStatus::Overcast,
    SlotStatus::BuildingShadow,
    SlotStatus::Night,
];

pub fn slot_style(status: SlotStatus) -> StatusStyle {
    match status {
        SlotStatus::Sun => StatusStyle::new("#fbbf24", "Sun", "☀"),
        SlotStatus::Mixed => StatusStyle::new("#fde047", "Mixed", "⛅"),
        SlotStatus::Overcast => StatusStyle::new("#d1d5db", "Overcast", "☁"),
        SlotStatus::BuildingShadow => StatusStyle::new("#6b7280", "Shade", "▦"),
        SlotStatus::Night => StatusStyle::new("#1e293b", "Night", "☾"),
        SlotStatus::Unknown => StatusStyle::new(NEUTRAL_SEGMENT_COLOR, "Unknown", "·"),
    }
}

/// Marker and card style. Unknown statuses are drawn as shade.
pub fn nearby_style(status: NearbyStatus) -> StatusStyle {
    match status {
        NearbyStatus::Sun => StatusStyle::new("#f59e0b", "In the sun", "☀"),
        NearbyStatus::Mixed => StatusStyle::new("#eab308", "Mixed", "⛅"),
        NearbyStatus::Overcast => StatusStyle::new("#9ca3af", "Overcast", "☁"),
        NearbyStatus::Night => StatusStyle::new("#334155", "Night", "☾"),
        NearbyStatus::Shadow | NearbyStatus::Unknown => {
            StatusStyle::new("#6b7280", "In the shade", "▦")
        }
    }
}

pub fn weather_label(status: WeatherStatus) -> &'static str {
    match status {
        WeatherStatus::Clear => "Clear sky",
        WeatherStatus::Mixed => "Sunny spells",
        WeatherStatus::Overcast | WeatherStatus::Unknown => "Overcast sky",
    }
}

/// `"120m"`
pub fn format_distance(meters: u32) -> String {
    format!("{meters}m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_colours_follow_status() {
        assert_eq!(nearby_style(NearbyStatus::Sun).color, "#f59e0b");
        assert_eq!(nearby_style(NearbyStatus::Mixed).color, "#eab308");
        assert_eq!(nearby_style(NearbyStatus::Overcast).color, "#9ca3af");
        assert_eq!(nearby_style(NearbyStatus::Shadow).color, "#6b7280");
        assert_eq!(nearby_style(NearbyStatus::Night).color, "#334155");
    }

    #[test]
    fn unknown_statuses_render_neutrally() {
        assert_eq!(nearby_style(NearbyStatus::Unknown), nearby_style(NearbyStatus::Shadow));
        assert_eq!(slot_style(SlotStatus::Unknown).color, NEUTRAL_SEGMENT_COLOR);
        assert_eq!(weather_label(WeatherStatus::Unknown), "Overcast sky");
    }

    #[test]
    fn legend_has_one_distinct_colour_per_status() {
        let mut colors: Vec<_> = SLOT_LEGEND.iter().map(|s| slot_style(*s).color).collect();
        colors.sort_unstable();
        colors.dedup();
        assert_eq!(colors.len(), SLOT_LEGEND.len());
    }
}
