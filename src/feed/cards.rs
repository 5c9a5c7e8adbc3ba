use chrono::{DateTime, Datelike, Local, TimeZone};
use serde::Serialize;

use crate::feed::{escape_html, truncate};
use crate::services::stories::StoryRecord;

pub const FEED_EXCERPT_CHARS: usize = 150;
pub const EMPTY_FEED_MESSAGE: &str = "No stories available yet. Be the first to share your story!";

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

/// Long Indonesian date in the zone `at` carries, e.g. "8 Januari 2022".
pub fn format_date_long<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    format!("{} {} {}", at.day(), MONTHS_ID[at.month0() as usize], at.year())
}

/// Short Indonesian date, e.g. "8/1/2022".
pub fn format_date_short<Tz: TimeZone>(at: &DateTime<Tz>) -> String {
    format!("{}/{}/{}", at.day(), at.month(), at.year())
}

/// Display-ready fields of one story. Text fields are already escaped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoryCard {
    pub id: String,
    pub title: String,
    pub image_url: String,
    pub image_alt: String,
    pub excerpt: String,
    pub date_label: String,
    pub location_label: &'static str,
}

/// Dates are shown in the viewer's local time zone.
impl From<&StoryRecord> for StoryCard {
    fn from(story: &StoryRecord) -> Self {
        Self::in_zone(story, &Local)
    }
}

impl StoryCard {
    pub fn in_zone<Tz: TimeZone>(story: &StoryRecord, tz: &Tz) -> Self {
        let title = escape_html(&story.name);
        Self {
            id: story.id.clone(),
            image_url: escape_html(&story.photo_url),
            image_alt: format!("Photo of {}", title),
            title,
            excerpt: escape_html(&truncate(&story.description, FEED_EXCERPT_CHARS)),
            date_label: format_date_long(&story.created_at.with_timezone(tz)),
            location_label: if story.location().is_some() {
                "📍 Located"
            } else {
                "📍 No location"
            },
        }
    }

    pub fn to_html(&self) -> String {
        format!(
            r#"<article class="story-card">
    <img src="{}" alt="{}" class="story-image" loading="lazy">
    <div class="story-content">
        <h3 class="story-title">{}</h3>
        <p class="story-description">{}</p>
        <div class="story-meta">
            <span>📅 {}</span>
            <span>{}</span>
        </div>
    </div>
</article>"#,
            self.image_url, self.image_alt, self.title, self.excerpt, self.date_label, self.location_label
        )
    }
}

pub fn render_feed(stories: &[StoryRecord]) -> String {
    if stories.is_empty() {
        return format!(r#"<div class="loading">{}</div>"#, EMPTY_FEED_MESSAGE);
    }
    let cards: Vec<String> = stories.iter().map(|s| StoryCard::from(s).to_html()).collect();
    format!(
        r#"<div class="stories-grid" role="feed" aria-label="Stories feed">
{}
</div>"#,
        cards.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, Utc};

    use super::*;

    fn story(description: &str, lat: Option<f64>) -> StoryRecord {
        StoryRecord {
            id: "story-1".into(),
            name: "<Dimas>".into(),
            description: description.into(),
            photo_url: "https://example.com/a.jpg".into(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 16, 3, 0, 0).unwrap(),
            lat,
            lon: lat.map(|_| 106.8),
        }
    }

    #[test]
    fn card_escapes_and_formats() {
        let card = StoryCard::in_zone(&story("Sunset at the harbour", Some(-6.1)), &Utc);
        assert_eq!(card.title, "&lt;Dimas&gt;");
        assert_eq!(card.image_alt, "Photo of &lt;Dimas&gt;");
        assert_eq!(card.date_label, "16 Oktober 2026");
        assert_eq!(card.location_label, "📍 Located");
    }

    #[test]
    fn long_description_is_cut_at_150() {
        let card = StoryCard::from(&story(&"a".repeat(200), None));
        assert_eq!(card.excerpt.len(), 153);
        assert!(card.excerpt.ends_with("..."));
        assert_eq!(card.location_label, "📍 No location");
    }

    #[test]
    fn empty_feed_invites_first_story() {
        assert!(render_feed(&[]).contains(EMPTY_FEED_MESSAGE));
    }

    #[test]
    fn feed_contains_every_card() {
        let html = render_feed(&[story("one story here", None), story("two story here", None)]);
        assert_eq!(html.matches("<article").count(), 2);
        assert!(html.contains(r#"role="feed""#));
    }

    #[test]
    fn evening_utc_is_next_day_in_jakarta() {
        let mut late = story("Night market on the corner", None);
        late.created_at = Utc.with_ymd_and_hms(2026, 10, 15, 20, 0, 0).unwrap();
        let jakarta = FixedOffset::east_opt(7 * 3600).unwrap();

        assert_eq!(StoryCard::in_zone(&late, &jakarta).date_label, "16 Oktober 2026");
        assert_eq!(StoryCard::in_zone(&late, &Utc).date_label, "15 Oktober 2026");
    }

    #[test]
    fn short_date_has_no_padding() {
        let at = Utc.with_ymd_and_hms(2022, 1, 8, 6, 34, 18).unwrap();
        assert_eq!(format_date_short(&at), "8/1/2022");
    }
}
