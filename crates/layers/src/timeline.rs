//! Daily timeline: coloured slot bar, hour ruler, best-window banner.

use foundation::ClockTime;
use remote::{BestWindow, SlotStatus, TimeSlot};
use tracing::debug;

use crate::symbology::{SLOT_LEGEND, StatusStyle, slot_style};

/// One equal-width cell of the bar.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub time: String,
    pub status: SlotStatus,
    pub style: StatusStyle,
    pub tooltip: String,
}

/// Hour label placed at `offset` (fraction of the bar width, `[0, 1)`).
#[derive(Debug, Clone, PartialEq)]
pub struct HourLabel {
    pub text: String,
    pub offset: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub title: String,
    pub detail: String,
}

impl Banner {
    /// `None` when either bound is not a valid `HH:MM` time or the window is
    /// reversed.
    pub fn from_window(window: &BestWindow) -> Option<Self> {
        let (start, end) = match (
            ClockTime::parse(&window.start_time),
            ClockTime::parse(&window.end_time),
        ) {
            (Ok(start), Ok(end)) if start <= end => (start, end),
            _ => {
                debug!(?window, "best window suppressed");
                return None;
            }
        };
        Some(Self {
            title: format!("Best window: {start} - {end}"),
            detail: format!(
                "{} min of sun and clear sky",
                window.duration_minutes.max(0)
            ),
        })
    }
}

/// Everything needed to draw the timeline once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimelineBar {
    pub segments: Vec<Segment>,
    pub hour_labels: Vec<HourLabel>,
    pub banner: Option<Banner>,
    pub weather_summary: String,
}

impl TimelineBar {
    pub fn build(slots: &[TimeSlot], best: Option<&BestWindow>, weather_summary: &str) -> Self {
        if slots.is_empty() {
            return Self {
                weather_summary: weather_summary.to_string(),
                ..Self::default()
            };
        }
        Self {
            segments: slots.iter().map(segment).collect(),
            hour_labels: hour_labels(slots),
            banner: best.and_then(Banner::from_window),
            weather_summary: weather_summary.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

fn segment(slot: &TimeSlot) -> Segment {
    let style = slot_style(slot.status);
    let mut tooltip = format!("{} - {}", slot.time, style.label);
    if slot.cloud_cover_pct > 0 {
        tooltip.push_str(&format!(" ({}% clouds)", slot.cloud_cover_pct));
    }
    Segment {
        time: slot.time.clone(),
        status: slot.status,
        style,
        tooltip,
    }
}

/// One label per distinct hour, at the first slot of that hour.
fn hour_labels(slots: &[TimeSlot]) -> Vec<HourLabel> {
    let total = slots.len() as f64;
    let mut labels: Vec<HourLabel> = Vec::new();
    let mut seen: Vec<&str> = Vec::new();
    for (idx, slot) in slots.iter().enumerate() {
        let hour = slot.time.split(':').next().unwrap_or_default();
        if hour.is_empty() || seen.contains(&hour) {
            continue;
        }
        seen.push(hour);
        labels.push(HourLabel {
            text: format!("{hour}h"),
            offset: idx as f64 / total,
        });
    }
    labels
}

/// Legend entries in display order.
pub fn legend() -> Vec<StatusStyle> {
    SLOT_LEGEND.iter().map(|s| slot_style(*s)).collect()
}

/// Owns the hovered time. Pointer-enter on a slot is its only writer.
#[derive(Debug, Clone, Default)]
pub struct TimelineModel {
    selected: Option<ClockTime>,
}

impl TimelineModel {
    pub fn new(initial: Option<ClockTime>) -> Self {
        Self { selected: initial }
    }

    pub fn selected_time(&self) -> Option<ClockTime> {
        self.selected
    }

    /// Returns `true` when the selection changed.
    pub fn on_slot_enter(&mut self, slot: &Segment) -> bool {
        match ClockTime::parse(&slot.time) {
            Ok(time) if self.selected != Some(time) => {
                self.selected = Some(time);
                true
            }
            Ok(_) => false,
            Err(err) => {
                debug!(%err, "ignoring slot with unreadable time");
                false
            }
        }
    }
}
