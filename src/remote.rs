use crate::player::{MediaElement, PlaybackRejected};
use serde::Serialize;

/// An instruction for the page's `<audio>` element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MediaCommand {
    SetSource { path: String },
    Play,
    Pause,
    Seek { seconds: f64 },
    SetMuted { muted: bool },
}

/// Media element living in the browser. Commands queue up here until the
/// page collects them with its next request; a refused `play()` comes back
/// later as a `play_rejected` event rather than an error here.
#[derive(Debug, Default)]
pub struct RemoteMedia {
    outbox: Vec<MediaCommand>,
}

impl RemoteMedia {
    pub fn drain(&mut self) -> Vec<MediaCommand> {
        std::mem::take(&mut self.outbox)
    }

    fn push(&mut self, command: MediaCommand) {
        // Only the latest position matters while dragging.
        if matches!(command, MediaCommand::Seek { .. }) {
            if let Some(last @ MediaCommand::Seek { .. }) = self.outbox.last_mut() {
                *last = command;
                return;
            }
        }
        self.outbox.push(command);
    }
}

impl MediaElement for RemoteMedia {
    fn set_source(&mut self, path: &str) {
        self.push(MediaCommand::SetSource {
            path: path.to_string(),
        });
    }

    fn play(&mut self) -> Result<(), PlaybackRejected> {
        self.push(MediaCommand::Play);
        Ok(())
    }

    fn pause(&mut self) {
        self.push(MediaCommand::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        self.push(MediaCommand::Seek { seconds });
    }

    fn set_muted(&mut self, muted: bool) {
        self.push(MediaCommand::SetMuted { muted });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{PlaybackSession, Playlist, ScrubBar};
    use crate::prefs::Preferences;

    #[test]
    fn commands_are_drained_in_order() {
        let mut prefs = Preferences::default();
        let mut session = PlaybackSession::new(Playlist::default(), RemoteMedia::default());
        session.restore(&prefs);
        session.media_mut().drain();

        session.load(1, true, &mut prefs);
        let commands = session.media_mut().drain();
        assert_eq!(
            commands,
            vec![
                MediaCommand::SetSource {
                    path: "/assets/audio/perigee.mp3".into()
                },
                MediaCommand::Play,
            ]
        );
        assert!(session.media_mut().drain().is_empty());
    }

    #[test]
    fn consecutive_seeks_collapse() {
        let mut session = PlaybackSession::new(Playlist::default(), RemoteMedia::default());
        session.restore(&Preferences::default());
        session.on_loaded_metadata(100.0);
        session.media_mut().drain();

        let bar = ScrubBar {
            left: 0.0,
            width: 100.0,
        };
        session.pointer_down();
        session.pointer_move(10.0, bar);
        session.pointer_move(20.0, bar);
        session.pointer_move(35.0, bar);
        session.pointer_up();

        assert_eq!(
            session.media_mut().drain(),
            vec![MediaCommand::Seek { seconds: 35.0 }]
        );
    }

    #[test]
    fn commands_serialize_with_op_tag() {
        let json = serde_json::to_value(MediaCommand::Seek { seconds: 1.5 }).unwrap();
        assert_eq!(json, serde_json::json!({ "op": "seek", "seconds": 1.5 }));
    }
}
