use crate::booking::BookingClient;
use crate::calendar::CalendarClient;
use crate::player::PlaybackSession;
use crate::prefs::Preferences;
use crate::remote::RemoteMedia;
use crate::shows::ShowsFeed;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Everything that mutates together: the preference store and the player
/// session that writes into it.
pub struct Site {
    pub prefs: Preferences,
    pub player: PlaybackSession<RemoteMedia>,
}

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub site: Arc<Mutex<Site>>,
    pub shows: ShowsFeed,
    pub booking: BookingClient,
    pub calendar: CalendarClient,
}

impl AppState {
    pub fn new(
        data_path: PathBuf,
        site: Site,
        shows: ShowsFeed,
        booking: BookingClient,
        calendar: CalendarClient,
    ) -> Self {
        Self {
            data_path,
            site: Arc::new(Mutex::new(site)),
            shows,
            booking,
            calendar,
        }
    }
}
