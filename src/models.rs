use crate::calendar::Availability;
use crate::player::{PlayerView, ScrubBar};
use crate::remote::MediaCommand;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct PrefsResponse {
    pub tint: Option<String>,
    pub lefty: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct PrefsUpdate {
    pub tint: Option<String>,
    pub lefty: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerActionRequest {
    pub action: String,
    pub index: Option<i64>,
}

/// Events reported by the page's `<audio>` element.
#[derive(Debug, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MediaEventRequest {
    #[serde(rename = "loadedmetadata")]
    LoadedMetadata { duration: f64 },
    #[serde(rename = "timeupdate")]
    TimeUpdate { current_time: f64 },
    Ended,
    PlayRejected,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrubPhase {
    Down,
    Move,
    Up,
    Leave,
    Click,
}

#[derive(Debug, Deserialize)]
pub struct ScrubRequest {
    pub phase: ScrubPhase,
    #[serde(default)]
    pub x: f64,
    #[serde(flatten)]
    pub bar: ScrubBar,
}

#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub player: PlayerView,
    pub commands: Vec<MediaCommand>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityQuery {
    pub date: Option<NaiveDate>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub status: Availability,
    pub message: String,
    pub blackout_dates: Vec<NaiveDate>,
}
