//! Playback coordination across a set of pre-loaded media embeds.
//!
//! Every track has its own embed, all loaded up front so switching is instant. The embeds only
//! accept one-way commands, so the controller's own state is the sole source of truth for what
//! is playing. Deferred work (the autoplay sequence and the post-switch resume) goes through a
//! [`Scheduler`] on the session clock; the owner drives it with [`PlaybackController::tick`].

use crate::embed::{EmbedCommand, EmbedHandle};
use crate::scheduler::{Scheduler, TimerHandle};
use std::time::Duration;

/// Gives the first embed time to become ready before it is told to play.
pub const AUTOPLAY_START_DELAY: Duration = Duration::from_millis(50);
/// The autoplay sequence only previews the music; it pauses itself after this long.
pub const AUTOPLAY_PAUSE_DELAY: Duration = Duration::from_secs(10);
/// Delay between pausing the old track and playing the new one on a switch.
pub const SWITCH_RESUME_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    #[error("track index {index} out of range (catalogue has {len} tracks)")]
    TrackOutOfRange { index: usize, len: usize },
    #[error("expected one embed per track ({tracks} tracks, {embeds} embeds)")]
    EmbedCountMismatch { tracks: usize, embeds: usize },
    #[error("playback needs at least one track")]
    NoTracks,
}

/// Snapshot handed to the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlaybackState {
    pub current_track: usize,
    pub is_playing: bool,
    pub is_muted: bool,
    pub has_autoplayed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayPhase {
    /// Not triggered yet.
    Pending,
    /// Triggered; at least one of its timers is still outstanding.
    Fired,
    /// Triggered and finished or superseded. Never leaves this phase.
    Consumed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlaybackTimer {
    AutoplayStart,
    AutoplayPause,
    Resume { track: usize },
}

pub struct PlaybackController {
    embeds: Vec<Box<dyn EmbedHandle>>,
    state: PlaybackState,
    scheduler: Scheduler<PlaybackTimer>,
    autoplay_start: Option<TimerHandle>,
    autoplay_pause: Option<TimerHandle>,
    resume: Option<TimerHandle>,
}

impl PlaybackController {
    /// `embeds[i]` must be the embed for track `i`.
    pub fn new(
        track_count: usize,
        embeds: Vec<Box<dyn EmbedHandle>>,
    ) -> Result<Self, PlaybackError> {
        if track_count == 0 {
            return Err(PlaybackError::NoTracks);
        }
        if embeds.len() != track_count {
            return Err(PlaybackError::EmbedCountMismatch {
                tracks: track_count,
                embeds: embeds.len(),
            });
        }
        Ok(Self {
            embeds,
            state: PlaybackState::default(),
            scheduler: Scheduler::new(),
            autoplay_start: None,
            autoplay_pause: None,
            resume: None,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn track_count(&self) -> usize {
        self.embeds.len()
    }

    pub fn current_track(&self) -> usize {
        self.state.current_track
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing
    }

    pub fn is_muted(&self) -> bool {
        self.state.is_muted
    }

    pub fn has_autoplayed(&self) -> bool {
        self.state.has_autoplayed
    }

    pub fn autoplay_phase(&self) -> AutoplayPhase {
        if !self.state.has_autoplayed {
            AutoplayPhase::Pending
        } else if self.autoplay_start.is_some() || self.autoplay_pause.is_some() {
            AutoplayPhase::Fired
        } else {
            AutoplayPhase::Consumed
        }
    }

    /// Session clock as last seen by [`PlaybackController::tick`].
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    /// When the next scheduled callback is due, if any.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduler.next_deadline()
    }

    /// Starts the one-time preview: play the current track (track 0 unless the user switched
    /// in the meantime) after [`AUTOPLAY_START_DELAY`], pause again after
    /// [`AUTOPLAY_PAUSE_DELAY`]. If something is already playing when the start fires, the
    /// preview is dropped. Only the first call has any effect; returns whether this call was
    /// the one that started it.
    pub fn trigger_autoplay(&mut self) -> bool {
        if self.state.has_autoplayed {
            tracing::debug!("autoplay already triggered; ignoring");
            return false;
        }
        self.state.has_autoplayed = true;
        self.autoplay_start = Some(
            self.scheduler
                .schedule(AUTOPLAY_START_DELAY, PlaybackTimer::AutoplayStart),
        );
        self.autoplay_pause = Some(
            self.scheduler
                .schedule(AUTOPLAY_PAUSE_DELAY, PlaybackTimer::AutoplayPause),
        );
        tracing::info!(at = ?self.scheduler.now(), "autoplay triggered");
        true
    }

    pub fn toggle_play_pause(&mut self) {
        self.cancel_autoplay();
        self.cancel_resume();

        let track = self.state.current_track;
        if self.state.is_playing {
            self.send(track, EmbedCommand::Pause);
        } else {
            self.send(track, EmbedCommand::Play);
        }
        self.state.is_playing = !self.state.is_playing;
        tracing::info!(track, playing = self.state.is_playing, "play/pause toggled");
    }

    /// Mute state must survive track switches, so every embed gets the command.
    pub fn toggle_mute(&mut self) {
        let command = if self.state.is_muted {
            EmbedCommand::Unmute
        } else {
            EmbedCommand::Mute
        };
        for track in 0..self.embeds.len() {
            self.send(track, command);
        }
        self.state.is_muted = !self.state.is_muted;
        tracing::info!(muted = self.state.is_muted, "mute toggled");
    }

    /// Makes `index` the current track without changing `is_playing`. If playback is active the
    /// old track is paused now and the new one is played after [`SWITCH_RESUME_DELAY`].
    pub fn switch_track(&mut self, index: usize) -> Result<(), PlaybackError> {
        let len = self.embeds.len();
        if index >= len {
            return Err(PlaybackError::TrackOutOfRange { index, len });
        }

        // A pending autoplay start still fires, on whichever track is current by then.
        self.cancel_autoplay_pause();
        self.cancel_resume();

        let old = self.state.current_track;
        if self.state.is_playing {
            self.send(old, EmbedCommand::Pause);
        }
        self.state.current_track = index;
        if self.state.is_playing {
            self.resume = Some(
                self.scheduler
                    .schedule(SWITCH_RESUME_DELAY, PlaybackTimer::Resume { track: index }),
            );
        }
        tracing::info!(from = old, to = index, playing = self.state.is_playing, "track switched");
        Ok(())
    }

    pub fn next(&mut self) {
        let len = self.embeds.len();
        let idx = (self.state.current_track + 1) % len;
        // In range by construction.
        let _ = self.switch_track(idx);
    }

    pub fn previous(&mut self) {
        let len = self.embeds.len();
        let idx = (self.state.current_track + len - 1) % len;
        let _ = self.switch_track(idx);
    }

    /// Advances the session clock to `now` and runs any timers that became due. Returns `true`
    /// if at least one timer fired.
    pub fn tick(&mut self, now: Duration) -> bool {
        let due = self.scheduler.advance_to(now);
        let fired = !due.is_empty();
        for timer in due {
            self.on_timer(timer);
        }
        fired
    }

    /// Cancels everything still scheduled. Called on drop as well.
    pub fn shutdown(&mut self) {
        if self.scheduler.pending() > 0 {
            tracing::debug!(pending = self.scheduler.pending(), "cancelling pending timers");
        }
        self.autoplay_start = None;
        self.autoplay_pause = None;
        self.resume = None;
        self.scheduler.clear();
    }

    fn on_timer(&mut self, timer: PlaybackTimer) {
        match timer {
            PlaybackTimer::AutoplayStart => {
                self.autoplay_start = None;
                let track = self.state.current_track;
                if self.state.is_playing {
                    // Music the user already started wins over the preview, including its pause.
                    self.cancel_autoplay_pause();
                    tracing::info!(track, "already playing; autoplay preview skipped");
                } else {
                    self.send(track, EmbedCommand::Play);
                    self.state.is_playing = true;
                    tracing::info!(track, "autoplay preview started");
                }
            }
            PlaybackTimer::AutoplayPause => {
                self.autoplay_pause = None;
                let track = self.state.current_track;
                self.send(track, EmbedCommand::Pause);
                self.state.is_playing = false;
                tracing::info!(track, "autoplay preview finished");
            }
            PlaybackTimer::Resume { track } => {
                self.resume = None;
                if track == self.state.current_track && self.state.is_playing {
                    self.send(track, EmbedCommand::Play);
                }
            }
        }
    }

    fn cancel_autoplay(&mut self) {
        if let Some(h) = self.autoplay_start.take() {
            self.scheduler.cancel(h);
        }
        self.cancel_autoplay_pause();
    }

    fn cancel_autoplay_pause(&mut self) {
        if let Some(h) = self.autoplay_pause.take() {
            if self.scheduler.cancel(h) {
                tracing::debug!("autoplay pause superseded");
            }
        }
    }

    fn cancel_resume(&mut self) {
        if let Some(h) = self.resume.take() {
            self.scheduler.cancel(h);
        }
    }

    fn send(&self, track: usize, command: EmbedCommand) {
        if let Some(embed) = self.embeds.get(track) {
            tracing::debug!(track, %command, "embed command");
            embed.post_message(&command.message());
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::CommandLog;

    #[test]
    fn phase_walks_pending_fired_consumed() {
        let log = CommandLog::new();
        let mut c = PlaybackController::new(2, log.embeds(2)).unwrap();
        assert_eq!(c.autoplay_phase(), AutoplayPhase::Pending);

        c.trigger_autoplay();
        assert_eq!(c.autoplay_phase(), AutoplayPhase::Fired);

        c.tick(AUTOPLAY_START_DELAY);
        assert_eq!(c.autoplay_phase(), AutoplayPhase::Fired);

        c.tick(AUTOPLAY_PAUSE_DELAY);
        assert_eq!(c.autoplay_phase(), AutoplayPhase::Consumed);
    }

    #[test]
    fn stale_resume_is_dropped_when_paused_in_between() {
        let log = CommandLog::new();
        let mut c = PlaybackController::new(3, log.embeds(3)).unwrap();
        c.toggle_play_pause();
        c.next();
        c.toggle_play_pause();
        c.tick(Duration::from_secs(1));

        let plays = log.count(EmbedCommand::Play);
        assert_eq!(plays, 1, "only the initial manual play should reach an embed");
        assert!(!c.is_playing());
    }
}
