//! Scripted user input for replaying playback sessions on the virtual clock.
//!
//! A timeline is a whitespace-separated list of `action@seconds` tokens, e.g.
//! `open@0 next@3 toggle@5.5 track=2@7 quit@9`.

use crate::embed::{CommandLog, LoggedCommand};
use crate::playback::{PlaybackController, PlaybackError};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The gift-opened event.
    Open,
    Toggle,
    Mute,
    Next,
    Previous,
    Track(usize),
    /// Tears the controller down.
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub at: Duration,
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    #[error("token {token:?}: expected <action>@<seconds>")]
    Syntax { token: String },
    #[error("token {token:?}: unknown action {action:?}")]
    UnknownAction { token: String, action: String },
    #[error("token {token:?}: invalid time")]
    InvalidTime { token: String },
    #[error("at {at:?}: {source}")]
    Playback {
        at: Duration,
        #[source]
        source: PlaybackError,
    },
}

pub fn parse_timeline(text: &str) -> Result<Vec<Step>, TimelineError> {
    let mut steps = Vec::new();
    for token in text.split_whitespace() {
        let (action_raw, time_raw) = token.split_once('@').ok_or_else(|| TimelineError::Syntax {
            token: token.to_string(),
        })?;

        // Negative, non-finite and out-of-range times are all rejected here.
        let at = time_raw
            .parse::<f64>()
            .ok()
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .ok_or_else(|| TimelineError::InvalidTime {
                token: token.to_string(),
            })?;

        let action = match action_raw.to_ascii_lowercase().as_str() {
            "open" | "gift" => Action::Open,
            "toggle" | "play" | "pause" => Action::Toggle,
            "mute" => Action::Mute,
            "next" => Action::Next,
            "prev" | "previous" => Action::Previous,
            "quit" | "teardown" => Action::Quit,
            other => match other.strip_prefix("track=").and_then(|n| n.parse().ok()) {
                Some(idx) => Action::Track(idx),
                None => {
                    return Err(TimelineError::UnknownAction {
                        token: token.to_string(),
                        action: action_raw.to_string(),
                    });
                }
            },
        };

        steps.push(Step { at, action });
    }
    // Stable: same-time steps keep their written order.
    steps.sort_by_key(|s| s.at);
    Ok(steps)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedCommand {
    pub at: Duration,
    pub entry: LoggedCommand,
}

/// Replays `steps` against `controller` until `until`, returning every embed command with the
/// virtual time it was posted. `log` must be the log the controller's embeds write into.
pub fn replay(
    controller: &mut PlaybackController,
    log: &CommandLog,
    steps: &[Step],
    until: Duration,
) -> Result<Vec<TimedCommand>, TimelineError> {
    let mut out = Vec::new();
    let mut seen = log.len();
    let mut pending = steps.iter().peekable();
    let mut stopped = false;

    loop {
        let next_step = pending.peek().map(|s| s.at);
        let next_timer = if stopped { None } else { controller.next_deadline() };
        let t = match (next_step, next_timer) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) => a,
            (None, Some(b)) => b,
            (None, None) => break,
        };
        if t > until {
            break;
        }

        controller.tick(t);
        while let Some(step) = pending.next_if(|s| s.at <= t) {
            if stopped {
                continue;
            }
            apply(controller, step.action).map_err(|source| TimelineError::Playback {
                at: step.at,
                source,
            })?;
            stopped = step.action == Action::Quit;
        }

        for entry in log.entries().into_iter().skip(seen) {
            out.push(TimedCommand { at: t, entry });
        }
        seen = log.len();
    }

    if !stopped {
        controller.tick(until);
        for entry in log.entries().into_iter().skip(seen) {
            out.push(TimedCommand { at: until, entry });
        }
    }
    Ok(out)
}

fn apply(controller: &mut PlaybackController, action: Action) -> Result<(), PlaybackError> {
    match action {
        Action::Open => {
            controller.trigger_autoplay();
        }
        Action::Toggle => controller.toggle_play_pause(),
        Action::Mute => controller.toggle_mute(),
        Action::Next => controller.next(),
        Action::Previous => controller.previous(),
        Action::Track(idx) => controller.switch_track(idx)?,
        Action::Quit => controller.shutdown(),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_orders_tokens() {
        let steps = parse_timeline("next@3 open@0 track=2@1.5").unwrap();
        assert_eq!(
            steps.iter().map(|s| s.action).collect::<Vec<_>>(),
            vec![Action::Open, Action::Track(2), Action::Next]
        );
        assert_eq!(steps[1].at, Duration::from_millis(1500));
    }

    #[test]
    fn rejects_bad_tokens() {
        assert!(matches!(parse_timeline("open"), Err(TimelineError::Syntax { .. })));
        assert!(matches!(parse_timeline("dance@1"), Err(TimelineError::UnknownAction { .. })));
        assert!(matches!(parse_timeline("open@-1"), Err(TimelineError::InvalidTime { .. })));
        assert!(matches!(parse_timeline("open@1e300"), Err(TimelineError::InvalidTime { .. })));
        assert!(matches!(parse_timeline("open@inf"), Err(TimelineError::InvalidTime { .. })));
        assert!(matches!(parse_timeline("open@NaN"), Err(TimelineError::InvalidTime { .. })));
    }
}
