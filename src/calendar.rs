use crate::errors::SiteError;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::warn;

pub const GOOGLE_CALENDAR_API: &str = "https://www.googleapis.com/calendar/v3";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventList {
    #[serde(default)]
    pub items: Vec<CalendarEvent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub transparency: String,
    pub start: Option<EventTime>,
    pub end: Option<EventTime>,
}

/// Either an all-day `date` or a timed `dateTime`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventTime {
    pub date: Option<NaiveDate>,
    #[serde(rename = "dateTime")]
    pub date_time: Option<DateTime<FixedOffset>>,
}

impl CalendarEvent {
    pub fn is_blocking(&self) -> bool {
        self.status != "cancelled" && self.transparency != "transparent"
    }

    /// Local days in `from..=to` the event touches. All-day ends are
    /// exclusive; a timed event ending exactly at midnight does not claim
    /// the following day.
    pub fn days(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        let Some(start) = self.start.as_ref().and_then(EventTime::local_start) else {
            return Vec::new();
        };
        let end = self
            .end
            .as_ref()
            .and_then(EventTime::local_last_day)
            .filter(|last| *last >= start)
            .unwrap_or(start);

        let first = start.max(from);
        let last = end.min(to);
        first.iter_days().take_while(|day| *day <= last).collect()
    }
}

impl EventTime {
    fn local_start(&self) -> Option<NaiveDate> {
        self.date.or_else(|| {
            self.date_time
                .map(|at| at.with_timezone(&Local).date_naive())
        })
    }

    fn local_last_day(&self) -> Option<NaiveDate> {
        if let Some(date) = self.date {
            return date.pred_opt();
        }
        let at = self.date_time?.with_timezone(&Local).naive_local();
        if at.time() == NaiveTime::MIN {
            at.date().pred_opt()
        } else {
            Some(at.date())
        }
    }
}

/// Days in `from..=to` covered by at least one blocking event.
pub fn blackout_dates(
    events: &[CalendarEvent],
    from: NaiveDate,
    to: NaiveDate,
) -> BTreeSet<NaiveDate> {
    events
        .iter()
        .filter(|event| event.is_blocking())
        .flat_map(|event| event.days(from, to))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Unavailable,
    Unconfigured,
    Unknown,
}

impl Availability {
    /// A failed lookup never surfaces as an error, only as a status.
    pub fn from_error(err: &SiteError) -> Self {
        match err {
            SiteError::ConfigurationMissing(what) => {
                warn!("{what} is not configured");
                Self::Unconfigured
            }
            err => {
                warn!("availability lookup failed: {err}");
                Self::Unknown
            }
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Available => "that date looks open!",
            Self::Unavailable => "sorry, we're already booked that day.",
            Self::Unconfigured => "availability check is not configured.",
            Self::Unknown => "couldn't check availability right now.",
        }
    }
}

#[derive(Clone)]
pub struct CalendarClient {
    client: Client,
    base: String,
    calendar_id: Option<String>,
    api_key: Option<String>,
}

impl CalendarClient {
    pub fn new(
        client: Client,
        base: impl Into<String>,
        calendar_id: Option<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base: base.into(),
            calendar_id,
            api_key,
        }
    }

    fn events_url(&self, calendar_id: &str) -> Result<Url, SiteError> {
        let mut url = Url::parse(&self.base).map_err(|err| SiteError::Decode(err.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| SiteError::Decode(format!("cannot use {} as a base url", self.base)))?
            .pop_if_empty()
            .extend(["calendars", calendar_id, "events"]);
        Ok(url)
    }

    pub async fn fetch_events(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CalendarEvent>, SiteError> {
        let calendar_id = self
            .calendar_id
            .as_deref()
            .ok_or(SiteError::ConfigurationMissing("calendar id"))?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(SiteError::ConfigurationMissing("calendar api key"))?;

        let after = to.succ_opt().ok_or(SiteError::DateOutOfRange(to))?;
        let time_min = local_midnight(from);
        let time_max = local_midnight(after);
        let response = self
            .client
            .get(self.events_url(calendar_id)?)
            .query(&[
                ("key", api_key),
                ("timeMin", time_min.as_str()),
                ("timeMax", time_max.as_str()),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(SiteError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        let list: EventList =
            serde_json::from_str(&body).map_err(|err| SiteError::Decode(err.to_string()))?;
        Ok(list.items)
    }

    pub async fn blackout_dates(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<BTreeSet<NaiveDate>, SiteError> {
        let events = self.fetch_events(from, to).await?;
        Ok(blackout_dates(&events, from, to))
    }

    pub async fn check(&self, date: NaiveDate) -> Availability {
        match self.blackout_dates(date, date).await {
            Ok(days) if days.contains(&date) => Availability::Unavailable,
            Ok(_) => Availability::Available,
            Err(err) => Availability::from_error(&err),
        }
    }
}

fn local_midnight(date: NaiveDate) -> String {
    let naive = date.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&naive).earliest() {
        Some(at) => at.to_rfc3339(),
        None => naive.and_utc().to_rfc3339(),
    }
}
