//! Banner title parsing and the display time window.

use chrono::{DateTime, FixedOffset};

/// An event title split into the two lines the banner layout expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerTitle {
    pub series_name: String,
    pub talk_title: String,
}

impl BannerTitle {
    /// Splits `"Series 10 - Topic Name"` into series and topic. Titles that
    /// do not split on the delimiter into exactly two parts are rejected;
    /// the banner cannot be laid out for them.
    pub fn parse(title: &str) -> Option<BannerTitle> {
        let parts: Vec<&str> = title.split('-').collect();
        if parts.len() != 2 {
            return None;
        }
        Some(BannerTitle {
            series_name: parts[0].trim().to_string(),
            talk_title: parts[1].trim().to_string(),
        })
    }
}

/// Formats the window printed on the banner, in the event's own offset,
/// e.g. `"2 September 2026 - 19:30 to 21:30"`.
pub fn format_display_window(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> String {
    format!(
        "{} to {}",
        start.format("%-d %B %Y - %H:%M"),
        end.format("%H:%M")
    )
}
