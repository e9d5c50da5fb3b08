use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use scraper::{ElementRef, Html};
use tracing::{debug, info, warn};

use crate::models::error::ExtractError;
use crate::models::event::{EventRecord, NO_DESCRIPTION};
use crate::service::dom_path::{self, Step};
use crate::service::time_parser;

// The event page carries no stable ids or classes, so every field is found by
// position. A markup change upstream breaks these paths.
const TITLE_PATH: &[Step] = &[Step::Find("h1"), Step::Find("span")];
const TIME_PATH: &[Step] = &[Step::Find("time")];
const TIME_TEXT_PATH: &[Step] = &[
    Step::Child("div", 0),
    Step::Child("div", 0),
    Step::Child("div", 1),
];
const DESCRIPTION_PATH: &[Step] = &[
    Step::Find("h1"),
    Step::Sibling("div"),
    Step::LastChild("div"),
    Step::Find("span"),
];

pub struct PageExtractor {
    timezone: Tz,
}

impl Default for PageExtractor {
    fn default() -> Self {
        Self::new(Tz::UTC)
    }
}

impl PageExtractor {
    /// `timezone` decides which calendar day the page's `datetime` instant falls on.
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn extract(&self, html: &str) -> Result<EventRecord, ExtractError> {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let title = dom_path::resolve_text(root, TITLE_PATH).ok_or(ExtractError::MissingTitle)?;
        info!("Found event title: {:?}", title);

        let time_element =
            dom_path::resolve(root, TIME_PATH).map_err(|_| ExtractError::MissingBaseDate)?;
        let base_date = self.base_date(time_element)?;
        debug!("Found datetime: {}", base_date);

        let time_text = dom_path::resolve_text(time_element, TIME_TEXT_PATH)
            .ok_or(ExtractError::MissingTimeText)?;
        debug!("Found time text: {:?}", time_text);

        let span = time_parser::parse_time_span(&time_text, &base_date)?;

        let description = match dom_path::resolve_text(root, DESCRIPTION_PATH) {
            Some(text) => {
                debug!("Found event description: {:?}", preview(&text, 100));
                text
            }
            None => {
                warn!("Could not find event description, using default");
                NO_DESCRIPTION.to_string()
            }
        };

        Ok(EventRecord {
            title,
            description,
            start_time: span.start_time,
            end_time: span.end_time,
        })
    }

    fn base_date(&self, time_element: ElementRef) -> Result<DateTime<Tz>, ExtractError> {
        let raw = time_element
            .value()
            .attr("datetime")
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or(ExtractError::MissingBaseDate)?;

        if let Some(instant) = parse_instant(raw) {
            return Ok(instant.with_timezone(&self.timezone));
        }
        // No offset: read it as wall-clock time in the event zone.
        let naive = parse_wall_clock(raw).ok_or_else(|| {
            warn!("Invalid datetime format: {}", raw);
            ExtractError::MissingBaseDate
        })?;
        self.timezone
            .from_local_datetime(&naive)
            .earliest()
            .ok_or(ExtractError::MissingBaseDate)
    }
}

fn parse_instant(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M%#z"))
        .or_else(|_| DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
}

fn parse_wall_clock(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::error::TimeParseError;
    use chrono::{Duration, Utc};

    fn page(title: &str, datetime: &str, time_text: &str, description: &str) -> String {
        format!(
            r#"<html><body>
                <div class="event">
                  <h1><span>{title}</span></h1>
                  <div>
                    <div><span>Hosted by Sam</span></div>
                    <div><p><span>{description}</span></p></div>
                  </div>
                  <time datetime="{datetime}">
                    <div>
                      <div>
                        <div>Saturday, Jan 1</div>
                        <div>{time_text}</div>
                      </div>
                    </div>
                  </time>
                </div>
            </body></html>"#
        )
    }

    #[test]
    fn extracts_complete_event() {
        let html = page("Board Game Night", "2099-01-01T00:00:00Z", "7:00pm–10:00pm", "Bring snacks");
        let record = PageExtractor::default().extract(&html).unwrap();
        assert_eq!(record.title, "Board Game Night");
        assert_eq!(record.description, "Bring snacks");
        assert_eq!(record.start_time, Utc.with_ymd_and_hms(2099, 1, 1, 19, 0, 0).unwrap());
        assert_eq!(record.end_time, Utc.with_ymd_and_hms(2099, 1, 1, 22, 0, 0).unwrap());
    }

    #[test]
    fn single_time_gets_default_duration() {
        let html = page("Picnic", "2099-06-01T12:00:00Z", "11:30am", "Blankets");
        let record = PageExtractor::default().extract(&html).unwrap();
        assert_eq!(record.end_time - record.start_time, Duration::hours(3));
    }

    #[test]
    fn missing_h1_is_missing_title() {
        let html = r#"<html><body><time datetime="2099-01-01T00:00:00Z">7:00pm</time></body></html>"#;
        assert_eq!(PageExtractor::default().extract(html), Err(ExtractError::MissingTitle));
    }

    #[test]
    fn blank_title_span_is_missing_title() {
        let html = page("   ", "2099-01-01T00:00:00Z", "7:00pm", "x");
        assert_eq!(PageExtractor::default().extract(&html), Err(ExtractError::MissingTitle));
    }

    #[test]
    fn missing_or_bad_datetime_is_missing_base_date() {
        let no_time = r#"<html><body><h1><span>Party</span></h1></body></html>"#;
        assert_eq!(PageExtractor::default().extract(no_time), Err(ExtractError::MissingBaseDate));

        let bad = page("Party", "next friday", "7:00pm", "x");
        assert_eq!(PageExtractor::default().extract(&bad), Err(ExtractError::MissingBaseDate));
    }

    #[test]
    fn flat_time_element_is_missing_time_text() {
        let html = r#"<html><body>
            <h1><span>Party</span></h1>
            <time datetime="2099-01-01T00:00:00Z">7:00pm</time>
        </body></html>"#;
        assert_eq!(PageExtractor::default().extract(html), Err(ExtractError::MissingTimeText));
    }

    #[test]
    fn garbled_time_text_is_unparsable() {
        let html = page("Party", "2099-01-01T00:00:00Z", "evening-ish", "x");
        assert!(matches!(
            PageExtractor::default().extract(&html),
            Err(ExtractError::UnparsableTime(TimeParseError::NoClockTime(_)))
        ));
    }

    #[test]
    fn missing_description_falls_back_to_sentinel() {
        let html = r#"<html><body>
            <h1><span>Party</span></h1>
            <time datetime="2099-01-01T00:00:00Z"><div><div><div>Sat</div><div>8:00pm</div></div></div></time>
        </body></html>"#;
        let record = PageExtractor::default().extract(html).unwrap();
        assert_eq!(record.description, NO_DESCRIPTION);
        assert!(!record.has_description());
    }

    #[test]
    fn offsetless_datetime_uses_event_zone() {
        let html = page("Party", "2099-07-04T09:00:00", "9:00pm", "x");
        let extractor = PageExtractor::new(chrono_tz::America::Los_Angeles);
        let record = extractor.extract(&html).unwrap();
        let local = record.start_time.with_timezone(&extractor.timezone());
        assert_eq!(local.date_naive(), chrono::NaiveDate::from_ymd_opt(2099, 7, 4).unwrap());
        assert_eq!(local.format("%H:%M").to_string(), "21:00");
    }

    fn start_for_datetime(datetime: &str) -> Result<DateTime<Utc>, ExtractError> {
        let html = page("Party", datetime, "7:00pm", "x");
        PageExtractor::default().extract(&html).map(|r| r.start_time)
    }

    #[test]
    fn accepts_common_iso_datetime_shapes() {
        let expected = Utc.with_ymd_and_hms(2099, 1, 1, 19, 0, 0).unwrap();
        assert_eq!(start_for_datetime("2099-01-01T00:00:00.000Z"), Ok(expected));
        assert_eq!(start_for_datetime("2099-01-01T00:00Z"), Ok(expected));
        assert_eq!(start_for_datetime("2099-01-01T00:00+00:00"), Ok(expected));
        assert_eq!(start_for_datetime("2099-01-01T00:00:00+0000"), Ok(expected));
        assert_eq!(start_for_datetime("2099-01-01"), Ok(expected));
    }

    #[test]
    fn date_only_datetime_is_midnight_in_event_zone() {
        let html = page("Party", "2099-01-01", "7:00pm", "x");
        let extractor = PageExtractor::new(chrono_tz::America::New_York);
        let record = extractor.extract(&html).unwrap();
        let local = record.start_time.with_timezone(&extractor.timezone());
        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2099, 1, 1).unwrap());
        assert_eq!(local.format("%H:%M").to_string(), "19:00");
    }

    #[test]
    fn preview_cuts_on_char_boundary() {
        assert_eq!(preview("héllo", 2), "hé...");
        assert_eq!(preview("hi", 5), "hi");
    }
}
