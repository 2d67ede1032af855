use crate::csv::{Row, parse_csv};
use crate::errors::SiteError;
use crate::ui::escape_html;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::{Client, header::CACHE_CONTROL};
use tracing::{info, warn};

pub const NO_SHOWS_MESSAGE: &str = "no shows posted yet.";
pub const UNAVAILABLE_MESSAGE: &str = "shows feed unavailable.";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowRecord {
    pub date: String,
    pub venue: String,
    pub city: String,
    pub url: String,
}

impl ShowRecord {
    fn is_blank(&self) -> bool {
        self.date.is_empty() && self.venue.is_empty() && self.city.is_empty()
    }
}

/// Column positions of the header row, keyed by lower-cased name.
#[derive(Debug, Clone)]
pub struct HeaderIndex {
    names: Vec<String>,
}

impl HeaderIndex {
    pub fn from_row(header: &Row) -> Self {
        Self {
            names: header.iter().map(|name| name.to_lowercase()).collect(),
        }
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|candidate| candidate == name)
    }

    fn field(&self, row: &Row, name: &str) -> String {
        self.position(name)
            .and_then(|idx| row.get(idx))
            .cloned()
            .unwrap_or_default()
    }
}

/// Maps data rows to records using the first row as header.
pub fn map_records(rows: &[Row]) -> Vec<ShowRecord> {
    let Some((header, data)) = rows.split_first() else {
        return Vec::new();
    };
    let index = HeaderIndex::from_row(header);

    data.iter()
        .map(|row| ShowRecord {
            date: index.field(row, "date"),
            venue: index.field(row, "venue"),
            city: index.field(row, "city"),
            url: index.field(row, "url"),
        })
        .filter(|record| !record.is_blank())
        .collect()
}

/// Parses a sheet date at local noon, so a date never slips across a
/// midnight boundary. Accepts `YYYY-MM-DD`, `YYYY-MM` and `YYYY`.
pub fn parse_show_date(raw: &str) -> Option<NaiveDateTime> {
    let mut parts = raw.split('-');
    let year = fixed_digits(parts.next()?, 4)?;
    let month = match parts.next() {
        Some(part) => fixed_digits(part, 2)?,
        None => 1,
    };
    let day = match parts.next() {
        Some(part) => fixed_digits(part, 2)?,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }

    NaiveDate::from_ymd_opt(year as i32, month, day)?.and_hms_opt(12, 0, 0)
}

fn fixed_digits(part: &str, width: usize) -> Option<u32> {
    if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Dated shows ascending, undated shows after them in received order.
pub fn sort_records(records: &mut [ShowRecord]) {
    records.sort_by_cached_key(|record| {
        let when = parse_show_date(&record.date);
        (when.is_none(), when)
    });
}

pub fn format_show_date(record: &ShowRecord) -> String {
    match parse_show_date(&record.date) {
        Some(when) => when.format("%a, %b %-d, %Y").to_string(),
        None if record.date.is_empty() => "TBD".to_string(),
        None => record.date.clone(),
    }
}

pub fn display_line(record: &ShowRecord) -> String {
    let venue = if record.venue.is_empty() {
        "TBD"
    } else {
        record.venue.as_str()
    };
    let mut line = format!("{} — {}", format_show_date(record), venue);
    if !record.city.is_empty() {
        line.push_str(" — ");
        line.push_str(&record.city);
    }
    line
}

pub fn render_shows(records: &[ShowRecord]) -> String {
    records
        .iter()
        .map(|record| {
            let url = record.url.trim();
            let details = if url.is_empty() {
                String::new()
            } else {
                format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer">details</a>"#,
                    escape_html(url)
                )
            };
            format!(
                r#"<li class="show"><div class="show-line">{}</div><div class="show-meta">{}</div></li>"#,
                escape_html(&display_line(record)),
                details
            )
        })
        .collect()
}

pub fn render_placeholder(message: &str) -> String {
    format!(
        r#"<li><div class="show-meta">{}</div></li>"#,
        escape_html(message)
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    Listed(Vec<ShowRecord>),
    Empty,
}

/// Parse, map, filter and sort one fetched CSV blob.
pub fn build_schedule(text: &str) -> Schedule {
    let rows = parse_csv(text);
    if rows.len() < 2 {
        return Schedule::Empty;
    }

    let mut records = map_records(&rows);
    if records.is_empty() {
        return Schedule::Empty;
    }
    sort_records(&mut records);
    Schedule::Listed(records)
}

/// What the shows list shows after a load attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowsDisplay {
    Listed(Vec<ShowRecord>),
    NoShows,
    Unavailable,
    UpstreamStatus(u16),
}

impl ShowsDisplay {
    pub fn to_html(&self) -> String {
        match self {
            Self::Listed(records) => render_shows(records),
            Self::NoShows => render_placeholder(NO_SHOWS_MESSAGE),
            Self::Unavailable => render_placeholder(UNAVAILABLE_MESSAGE),
            Self::UpstreamStatus(code) => {
                render_placeholder(&format!("shows feed unavailable (HTTP {code})."))
            }
        }
    }
}

impl From<Schedule> for ShowsDisplay {
    fn from(schedule: Schedule) -> Self {
        match schedule {
            Schedule::Listed(records) => Self::Listed(records),
            Schedule::Empty => Self::NoShows,
        }
    }
}

#[derive(Clone)]
pub struct ShowsFeed {
    client: Client,
    url: String,
}

impl ShowsFeed {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub async fn fetch(&self) -> Result<String, SiteError> {
        let response = self
            .client
            .get(&self.url)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SiteError::Status(response.status().as_u16()));
        }
        Ok(response.text().await?)
    }

    /// Fetches and builds the list. Never fails; failures become placeholders.
    pub async fn load(&self) -> ShowsDisplay {
        match self.fetch().await {
            Ok(text) => {
                let display = ShowsDisplay::from(build_schedule(&text));
                if let ShowsDisplay::Listed(records) = &display {
                    info!("loaded {} shows", records.len());
                }
                display
            }
            Err(SiteError::Status(code)) => {
                warn!("shows feed returned HTTP {code}");
                ShowsDisplay::UpstreamStatus(code)
            }
            Err(err) => {
                warn!("shows feed fetch failed: {err}");
                ShowsDisplay::Unavailable
            }
        }
    }
}
