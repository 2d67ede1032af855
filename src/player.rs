//! Audio mini-player session.
//!
//! The session owns every decision (which track, playing or not, where the
//! playhead is) and drives an injected [`MediaElement`]. Media events flow
//! back in through the `on_*` methods. Persisted preferences are passed in
//! explicitly on the calls that write them.

use crate::prefs::{DOCK_HIDDEN_KEY, KeyValueStore, LAST_TRACK_KEY, MUTED_KEY};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub title: String,
    pub source_path: String,
}

impl Track {
    pub fn new(title: impl Into<String>, source_path: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            source_path: source_path.into(),
        }
    }
}

/// Fixed, non-empty track list. Only `Default` builds one.
#[derive(Debug, Clone)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn get(&self, index: usize) -> &Track {
        &self.tracks[index % self.tracks.len()]
    }

    /// Maps any integer, negative included, onto a valid position.
    pub fn wrap(&self, index: i64) -> usize {
        index.rem_euclid(self.tracks.len() as i64) as usize
    }
}

impl Default for Playlist {
    fn default() -> Self {
        Self {
            tracks: vec![
                Track::new("Tidal Lock", "/assets/audio/tidal-lock.mp3"),
                Track::new("Perigee", "/assets/audio/perigee.mp3"),
                Track::new("Sea of Crises", "/assets/audio/sea-of-crises.mp3"),
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Idle,
    Loaded,
    Playing,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("playback was rejected by the autoplay policy")]
pub struct PlaybackRejected;

/// The audio element the session drives.
///
/// `set_source` implies a reload: the element starts from zero and its
/// duration is unknown until metadata arrives.
pub trait MediaElement {
    fn set_source(&mut self, path: &str);
    fn play(&mut self) -> Result<(), PlaybackRejected>;
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    fn set_muted(&mut self, muted: bool);
}

/// Horizontal bounds of the scrub bar, in the same units as pointer x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrubBar {
    pub left: f64,
    pub width: f64,
}

impl ScrubBar {
    pub fn fraction_at(&self, x: f64) -> Option<f64> {
        if !(self.width.is_finite() && self.width > 0.0 && x.is_finite()) {
            return None;
        }
        Some(((x - self.left) / self.width).clamp(0.0, 1.0))
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Drag {
    moved: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub index: usize,
    pub title: String,
    pub source: String,
    pub state: PlaybackState,
    pub playing: bool,
    pub dragging: bool,
    pub muted: bool,
    pub hidden: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
    pub progress_percent: f64,
    pub tracks: Vec<String>,
}

pub struct PlaybackSession<M> {
    playlist: Playlist,
    media: M,
    index: usize,
    state: PlaybackState,
    muted: bool,
    hidden: bool,
    current_time: f64,
    duration: Option<f64>,
    drag: Option<Drag>,
    swallow_click: bool,
}

impl<M: MediaElement> PlaybackSession<M> {
    pub fn new(playlist: Playlist, media: M) -> Self {
        Self {
            playlist,
            media,
            index: 0,
            state: PlaybackState::Idle,
            muted: false,
            hidden: false,
            current_time: 0.0,
            duration: None,
            drag: None,
            swallow_click: false,
        }
    }

    /// Applies persisted mute, dock and last-track preferences without
    /// starting playback.
    pub fn restore(&mut self, store: &impl KeyValueStore) {
        self.muted = store.flag(MUTED_KEY);
        self.hidden = store.flag(DOCK_HIDDEN_KEY);
        self.media.set_muted(self.muted);

        let index = self.playlist.wrap(store.number(LAST_TRACK_KEY).unwrap_or(0));
        self.select(index);
        debug!(index, muted = self.muted, hidden = self.hidden, "player restored");
    }

    pub fn load(&mut self, index: i64, autoplay: bool, store: &mut impl KeyValueStore) {
        let index = self.playlist.wrap(index);
        self.select(index);
        store.set(LAST_TRACK_KEY, index.to_string());
        debug!(index, autoplay, "track loaded");

        if autoplay {
            self.play();
        }
    }

    fn select(&mut self, index: usize) {
        self.index = index;
        self.current_time = 0.0;
        self.duration = None;
        self.drag = None;
        self.media.set_source(&self.playlist.get(index).source_path);
        self.state = PlaybackState::Loaded;
    }

    pub fn next(&mut self, store: &mut impl KeyValueStore) {
        let resume = self.is_playing();
        self.load(self.index as i64 + 1, resume, store);
    }

    pub fn prev(&mut self, store: &mut impl KeyValueStore) {
        let resume = self.is_playing();
        self.load(self.index as i64 - 1, resume, store);
    }

    pub fn play(&mut self) {
        if self.hidden || self.state == PlaybackState::Idle {
            return;
        }
        match self.media.play() {
            Ok(()) => self.state = PlaybackState::Playing,
            Err(err) => {
                debug!("{err}");
                self.state = PlaybackState::Paused;
            }
        }
    }

    pub fn pause(&mut self) {
        self.media.pause();
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn set_muted(&mut self, muted: bool, store: &mut impl KeyValueStore) {
        self.muted = muted;
        self.media.set_muted(muted);
        store.set_flag(MUTED_KEY, muted);
    }

    pub fn toggle_mute(&mut self, store: &mut impl KeyValueStore) {
        self.set_muted(!self.muted, store);
    }

    /// Dismisses the dock for good; it stays hidden until storage is cleared.
    pub fn hide(&mut self, store: &mut impl KeyValueStore) {
        self.pause();
        self.hidden = true;
        store.set_flag(DOCK_HIDDEN_KEY, true);
    }

    pub fn on_loaded_metadata(&mut self, duration: f64) {
        self.duration = Some(duration).filter(|d| d.is_finite() && *d > 0.0);
    }

    pub fn on_time_update(&mut self, current_time: f64) {
        if current_time.is_finite() && current_time >= 0.0 {
            self.current_time = current_time;
        }
    }

    /// The element refused to start, usually the autoplay policy. Not retried.
    pub fn on_play_rejected(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn on_ended(&mut self, store: &mut impl KeyValueStore) {
        let resume = self.is_playing() && !self.muted;
        debug!(index = self.index, resume, "track ended");
        self.load(self.index as i64 + 1, resume, store);
    }

    pub fn pointer_down(&mut self) {
        self.drag = Some(Drag::default());
        self.swallow_click = false;
    }

    pub fn pointer_move(&mut self, x: f64, bar: ScrubBar) {
        if let Some(drag) = self.drag.as_mut() {
            drag.moved = true;
            if let Some(fraction) = bar.fraction_at(x) {
                self.seek_to_fraction(fraction);
            }
        }
    }

    pub fn pointer_up(&mut self) {
        if let Some(drag) = self.drag.take() {
            self.swallow_click = drag.moved;
        }
    }

    pub fn pointer_leave(&mut self) {
        self.pointer_up();
    }

    /// A click seeks once, unless it is the tail of a drag that already did.
    pub fn click(&mut self, x: f64, bar: ScrubBar) {
        if std::mem::take(&mut self.swallow_click) {
            return;
        }
        if let Some(fraction) = bar.fraction_at(x) {
            self.seek_to_fraction(fraction);
        }
    }

    /// Returns the target time, or `None` while the duration is unknown.
    pub fn seek_to_fraction(&mut self, fraction: f64) -> Option<f64> {
        let duration = self.duration?;
        let target = (fraction.clamp(0.0, 1.0) * duration).clamp(0.0, duration);
        self.current_time = target;
        self.media.seek(target);
        Some(target)
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_track(&self) -> &Track {
        self.playlist.get(self.index)
    }

    pub fn progress_fraction(&self) -> f64 {
        match self.duration {
            Some(duration) if duration.is_finite() && duration > 0.0 => {
                (self.current_time / duration).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    pub fn progress_percent(&self) -> f64 {
        (self.progress_fraction() * 100.0).clamp(0.0, 100.0)
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn view(&self) -> PlayerView {
        let track = self.current_track();
        PlayerView {
            index: self.index,
            title: track.title.clone(),
            source: track.source_path.clone(),
            state: self.state,
            playing: self.is_playing(),
            dragging: self.is_dragging(),
            muted: self.muted,
            hidden: self.hidden,
            current_time: self.current_time,
            duration: self.duration,
            progress_percent: self.progress_percent(),
            tracks: self
                .playlist
                .tracks()
                .iter()
                .map(|track| track.title.clone())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::Preferences;

    #[derive(Default)]
    struct FakeMedia {
        source: String,
        playing: bool,
        muted: bool,
        seeks: Vec<f64>,
        reject_play: bool,
    }

    impl MediaElement for FakeMedia {
        fn set_source(&mut self, path: &str) {
            self.source = path.to_string();
            self.playing = false;
        }

        fn play(&mut self) -> Result<(), PlaybackRejected> {
            if self.reject_play {
                return Err(PlaybackRejected);
            }
            self.playing = true;
            Ok(())
        }

        fn pause(&mut self) {
            self.playing = false;
        }

        fn seek(&mut self, seconds: f64) {
            self.seeks.push(seconds);
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }
    }

    const BAR: ScrubBar = ScrubBar {
        left: 100.0,
        width: 200.0,
    };

    fn session() -> (PlaybackSession<FakeMedia>, Preferences) {
        let prefs = Preferences::default();
        let mut session = PlaybackSession::new(Playlist::default(), FakeMedia::default());
        session.restore(&prefs);
        (session, prefs)
    }

    #[test]
    fn load_wraps_any_index() {
        let (mut session, mut prefs) = session();
        let len = Playlist::default().tracks().len() as i64;
        for i in [-7i64, -1, 0, 2, 3, 11] {
            session.load(i, false, &mut prefs);
            let expected = (i % len + len) % len;
            assert_eq!(session.index() as i64, expected);
            assert_eq!(session.progress_fraction(), 0.0);
            assert_eq!(prefs.number(LAST_TRACK_KEY), Some(expected));
        }
    }

    #[test]
    fn load_resets_progress() {
        let (mut session, mut prefs) = session();
        session.on_loaded_metadata(200.0);
        session.on_time_update(50.0);
        assert_eq!(session.progress_percent(), 25.0);
        session.load(1, false, &mut prefs);
        assert_eq!(session.progress_percent(), 0.0);
        assert_eq!(session.state(), PlaybackState::Loaded);
    }

    #[test]
    fn restore_applies_persisted_preferences() {
        let mut prefs = Preferences::default();
        prefs.set(LAST_TRACK_KEY, "5".into());
        prefs.set(MUTED_KEY, "1".into());
        let mut session = PlaybackSession::new(Playlist::default(), FakeMedia::default());
        assert_eq!(session.state(), PlaybackState::Idle);

        session.restore(&prefs);
        assert_eq!(session.index(), 2);
        assert!(session.media().muted);
        assert!(!session.is_playing());
        assert_eq!(session.media().source, "/assets/audio/sea-of-crises.mp3");
    }

    #[test]
    fn next_and_prev_keep_play_intent() {
        let (mut session, mut prefs) = session();
        session.play();
        session.next(&mut prefs);
        assert_eq!(session.index(), 1);
        assert!(session.is_playing());
        assert!(session.media().playing);

        session.pause();
        session.prev(&mut prefs);
        session.prev(&mut prefs);
        assert_eq!(session.index(), 2);
        assert!(!session.is_playing());
        assert!(!session.media().playing);
    }

    #[test]
    fn progress_is_zero_without_duration() {
        let (mut session, _) = session();
        session.on_time_update(30.0);
        assert_eq!(session.progress_fraction(), 0.0);
        session.on_loaded_metadata(f64::INFINITY);
        assert_eq!(session.progress_fraction(), 0.0);
        session.on_loaded_metadata(60.0);
        session.on_time_update(90.0);
        assert_eq!(session.progress_percent(), 100.0);
    }

    #[test]
    fn drag_seeks_to_pointer_fraction() {
        let (mut session, _) = session();
        session.on_loaded_metadata(120.0);

        session.pointer_down();
        assert!(session.is_dragging());
        session.pointer_move(150.0, BAR);
        session.pointer_move(250.0, BAR);
        session.pointer_move(900.0, BAR);
        session.pointer_move(-50.0, BAR);
        session.pointer_up();
        session.click(250.0, BAR);

        assert!(!session.is_dragging());
        assert_eq!(session.media().seeks, vec![30.0, 90.0, 120.0, 0.0]);
    }

    #[test]
    fn zero_width_bar_never_seeks() {
        let (mut session, _) = session();
        session.on_loaded_metadata(120.0);
        let collapsed = ScrubBar {
            left: 0.0,
            width: 0.0,
        };

        session.pointer_down();
        session.pointer_move(10.0, collapsed);
        assert!(session.view().dragging);
        session.pointer_up();
        session.click(0.0, collapsed);
        session.click(10.0, collapsed);

        assert!(session.media().seeks.is_empty());
        assert_eq!(session.progress_percent(), 0.0);
    }

    #[test]
    fn moves_without_drag_do_nothing_and_click_seeks_once() {
        let (mut session, _) = session();
        session.on_loaded_metadata(80.0);
        session.pointer_move(200.0, BAR);
        assert!(session.media().seeks.is_empty());

        session.pointer_down();
        session.pointer_up();
        session.click(200.0, BAR);
        assert_eq!(session.media().seeks, vec![40.0]);
        assert_eq!(session.progress_percent(), 50.0);
    }

    #[test]
    fn seek_waits_for_duration() {
        let (mut session, _) = session();
        assert_eq!(session.seek_to_fraction(0.5), None);
        session.on_loaded_metadata(10.0);
        assert_eq!(session.seek_to_fraction(1.7), Some(10.0));
        assert_eq!(session.seek_to_fraction(-1.0), Some(0.0));
    }

    #[test]
    fn ended_advances_and_continues_when_playing() {
        let (mut session, mut prefs) = session();
        session.on_loaded_metadata(100.0);
        session.play();
        session.on_time_update(100.0);
        session.on_ended(&mut prefs);

        assert_eq!(session.index(), 1);
        assert_eq!(session.progress_percent(), 0.0);
        assert!(session.is_playing());
        assert_eq!(session.media().source, "/assets/audio/perigee.mp3");
    }

    #[test]
    fn ended_while_muted_stops_after_advancing() {
        let (mut session, mut prefs) = session();
        session.play();
        session.set_muted(true, &mut prefs);
        session.on_ended(&mut prefs);
        assert_eq!(session.index(), 1);
        assert_eq!(session.state(), PlaybackState::Loaded);
        assert!(prefs.flag(MUTED_KEY));
    }

    #[test]
    fn ended_on_last_track_wraps_to_first() {
        let (mut session, mut prefs) = session();
        session.load(-1, true, &mut prefs);
        session.on_ended(&mut prefs);
        assert_eq!(session.index(), 0);
        assert!(session.is_playing());
    }

    #[test]
    fn autoplay_rejection_leaves_session_paused() {
        let (mut session, mut prefs) = session();
        session.media_mut().reject_play = true;
        session.load(1, true, &mut prefs);
        assert_eq!(session.state(), PlaybackState::Paused);

        session.media_mut().reject_play = false;
        session.play();
        session.on_play_rejected();
        assert_eq!(session.state(), PlaybackState::Paused);
    }

    #[test]
    fn hide_persists_and_blocks_playback() {
        let (mut session, mut prefs) = session();
        session.play();
        session.hide(&mut prefs);
        assert!(!session.is_playing());
        assert!(prefs.flag(DOCK_HIDDEN_KEY));

        session.toggle_play();
        assert!(!session.is_playing());

        let mut reloaded = PlaybackSession::new(Playlist::default(), FakeMedia::default());
        reloaded.restore(&prefs);
        assert!(reloaded.view().hidden);
    }

    #[test]
    fn mute_is_independent_of_play_state() {
        let (mut session, mut prefs) = session();
        session.play();
        session.toggle_mute(&mut prefs);
        assert!(session.is_playing());
        assert!(session.view().muted);
        session.toggle_mute(&mut prefs);
        assert!(!session.view().muted);
        assert!(!prefs.flag(MUTED_KEY));
    }
}
