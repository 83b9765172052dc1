//! Plain-text rendering of page views.

use layers::TimelineBar;
use web::Dropdown;
use web::pages::{DetailView, NearbyList, PlaceCard};

pub fn dropdown_lines(dropdown: &Dropdown<'_>) -> Vec<String> {
    match dropdown {
        Dropdown::Hidden => Vec::new(),
        Dropdown::Loading => vec!["Searching…".to_string()],
        Dropdown::NoResults => vec!["No results".to_string()],
        Dropdown::Columns { places, addresses } => {
            let mut lines = Vec::new();
            if let Some(places) = places {
                lines.push("Terraces".to_string());
                if places.is_empty() {
                    lines.push("  no match".to_string());
                }
                for (i, place) in places.iter().enumerate() {
                    let district = place
                        .district
                        .as_deref()
                        .map(|d| format!(" ({d})"))
                        .unwrap_or_default();
                    lines.push(format!("  [{i}] {}{district}", place.name));
                }
            }
            if let Some(addresses) = addresses {
                lines.push("Addresses".to_string());
                if addresses.is_empty() {
                    lines.push("  no match".to_string());
                }
                for (i, address) in addresses.iter().enumerate() {
                    lines.push(format!("  [{i}] {}", address.label));
                }
            }
            lines
        }
    }
}

fn card_line(card: &PlaceCard) -> String {
    let mut line = format!(
        "{} {} - {} - {}",
        card.icon, card.name, card.distance, card.status
    );
    if let Some(until) = &card.sun_until {
        line.push_str(" - ");
        line.push_str(until);
    }
    line
}

pub fn nearby_lines(weather: Option<&str>, list: &NearbyList) -> Vec<String> {
    let mut lines: Vec<String> = weather.map(str::to_string).into_iter().collect();
    match list {
        NearbyList::Loading => lines.push("Loading…".to_string()),
        NearbyList::Failed(msg) | NearbyList::Empty(msg) => lines.push((*msg).to_string()),
        NearbyList::Cards(cards) => lines.extend(cards.iter().map(card_line)),
    }
    lines
}

fn bar_line(bar: &TimelineBar) -> String {
    bar.segments.iter().map(|s| s.style.icon).collect()
}

pub fn detail_lines(view: &DetailView) -> Vec<String> {
    match view {
        DetailView::Loading => vec!["Loading…".to_string()],
        DetailView::Failed(msg) => vec![(*msg).to_string()],
        DetailView::Ready {
            header,
            bar,
            legend,
            sun_badge,
            ..
        } => {
            let mut lines = vec![header.name.clone()];
            if let Some(address) = &header.address {
                lines.push(address.clone());
            }
            lines.push(header.date_label.clone());
            if !bar.weather_summary.is_empty() {
                lines.push(bar.weather_summary.clone());
            }
            if let Some(banner) = &bar.banner {
                lines.push(format!("{} ({})", banner.title, banner.detail));
            }
            if !bar.is_empty() {
                lines.push(bar_line(bar));
                let ruler: Vec<&str> = bar.hour_labels.iter().map(|l| l.text.as_str()).collect();
                lines.push(ruler.join(" "));
            }
            let keys: Vec<String> = legend
                .iter()
                .map(|s| format!("{} {}", s.icon, s.label))
                .collect();
            lines.push(keys.join("  "));
            if let Some(badge) = sun_badge {
                lines.push(badge.clone());
            }
            lines
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::PlaceId;
    use pretty_assertions::assert_eq;
    use remote::{GeocodedAddress, Place};

    #[test]
    fn dropdown_lists_both_columns_with_indices() {
        let places = [Place {
            id: PlaceId::new(3),
            name: "Le Zinc".to_string(),
            address: None,
            district: Some("75011".to_string()),
            lat: 48.85,
            lon: 2.37,
        }];
        let addresses: [GeocodedAddress; 0] = [];
        let lines = dropdown_lines(&Dropdown::Columns {
            places: Some(&places),
            addresses: Some(&addresses),
        });
        assert_eq!(
            lines,
            vec!["Terraces", "  [0] Le Zinc (75011)", "Addresses", "  no match"]
        );
        assert!(dropdown_lines(&Dropdown::Hidden).is_empty());
    }

    #[test]
    fn nearby_prints_header_then_cards() {
        let card = PlaceCard {
            id: PlaceId::new(1),
            icon: "☀",
            name: "Le Zinc".to_string(),
            address: None,
            distance: "120m".to_string(),
            status: "In the sun",
            sun_until: Some("Sun until 17:30".to_string()),
        };
        let lines = nearby_lines(Some("Clear sky - 10% clouds"), &NearbyList::Cards(vec![card]));
        assert_eq!(
            lines,
            vec![
                "Clear sky - 10% clouds",
                "☀ Le Zinc - 120m - In the sun - Sun until 17:30"
            ]
        );
        assert_eq!(
            nearby_lines(None, &NearbyList::Empty("No terrace found in this area")),
            vec!["No terrace found in this area"]
        );
    }

    #[test]
    fn failed_detail_is_one_line() {
        assert_eq!(
            detail_lines(&DetailView::Failed("Could not load the timeline")),
            vec!["Could not load the timeline"]
        );
    }
}
