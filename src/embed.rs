use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// One-way command understood by a pre-loaded media embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbedCommand {
    Play,
    Pause,
    Mute,
    Unmute,
}

impl EmbedCommand {
    /// Player API function name carried in the message.
    pub fn func(self) -> &'static str {
        match self {
            Self::Play => "playVideo",
            Self::Pause => "pauseVideo",
            Self::Mute => "mute",
            Self::Unmute => "unMute",
        }
    }

    /// String-encoded message as posted to the embed's window. Keys keep the `event`, `func`,
    /// `args` order the player expects.
    pub fn message(self) -> String {
        serde_json::json!({
            "event": "command",
            "func": self.func(),
            "args": "",
        })
        .to_string()
    }

    /// Inverse of [`EmbedCommand::message`]. Unknown messages yield `None`.
    pub fn from_message(message: &str) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_str(message).ok()?;
        if value.get("event")?.as_str()? != "command" {
            return None;
        }
        match value.get("func")?.as_str()? {
            "playVideo" => Some(Self::Play),
            "pauseVideo" => Some(Self::Pause),
            "mute" => Some(Self::Mute),
            "unMute" => Some(Self::Unmute),
            _ => None,
        }
    }
}

impl fmt::Display for EmbedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Mute => "mute",
            Self::Unmute => "unmute",
        };
        f.write_str(s)
    }
}

/// Handle to an externally rendered media player. Delivery is fire-and-forget: there is no
/// acknowledgement and no failure signal.
pub trait EmbedHandle {
    fn post_message(&self, message: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggedCommand {
    pub track: usize,
    pub command: EmbedCommand,
}

/// Shared record of every command posted to a set of [`RecordingEmbed`]s.
#[derive(Debug, Clone, Default)]
pub struct CommandLog {
    entries: Rc<RefCell<Vec<LoggedCommand>>>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates one embed per track, all writing into this log.
    pub fn embeds(&self, count: usize) -> Vec<Box<dyn EmbedHandle>> {
        (0..count)
            .map(|track| {
                Box::new(RecordingEmbed {
                    track,
                    log: self.clone(),
                }) as Box<dyn EmbedHandle>
            })
            .collect()
    }

    pub fn entries(&self) -> Vec<LoggedCommand> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Most recent `n` entries, oldest first.
    pub fn tail(&self, n: usize) -> Vec<LoggedCommand> {
        let entries = self.entries.borrow();
        let start = entries.len().saturating_sub(n);
        entries[start..].to_vec()
    }

    pub fn count(&self, command: EmbedCommand) -> usize {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.command == command)
            .count()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    fn push(&self, entry: LoggedCommand) {
        self.entries.borrow_mut().push(entry);
    }
}

/// Embed stand-in that decodes each message and appends it to a [`CommandLog`].
#[derive(Debug, Clone)]
pub struct RecordingEmbed {
    track: usize,
    log: CommandLog,
}

impl RecordingEmbed {
    pub fn new(track: usize, log: CommandLog) -> Self {
        Self { track, log }
    }
}

impl EmbedHandle for RecordingEmbed {
    fn post_message(&self, message: &str) {
        match EmbedCommand::from_message(message) {
            Some(command) => self.log.push(LoggedCommand {
                track: self.track,
                command,
            }),
            None => tracing::warn!(track = self.track, msg = message, "embed ignored unknown message"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_use_player_api_names() {
        let play = EmbedCommand::Play.message();
        assert_eq!(play, r#"{"event":"command","func":"playVideo","args":""}"#);
        assert_eq!(
            EmbedCommand::Unmute.message(),
            r#"{"event":"command","func":"unMute","args":""}"#
        );
        assert_eq!(EmbedCommand::from_message(&play), Some(EmbedCommand::Play));
    }

    #[test]
    fn recording_embed_logs_decoded_commands() {
        let log = CommandLog::new();
        let embeds = log.embeds(2);
        embeds[1].post_message(&EmbedCommand::Mute.message());
        embeds[0].post_message("{\"event\":\"listening\"}");

        assert_eq!(
            log.entries(),
            vec![LoggedCommand {
                track: 1,
                command: EmbedCommand::Mute
            }]
        );
    }
}
