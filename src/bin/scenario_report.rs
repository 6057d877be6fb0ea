use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use birthday_reveal::embed::CommandLog;
use birthday_reveal::playback::PlaybackController;
use birthday_reveal::timeline::{parse_timeline, replay};
use birthday_reveal::tracks::{default_catalogue, TrackCatalogue};

#[derive(Debug, Clone)]
struct Args {
    timeline: String,
    tracks: Option<PathBuf>,
    until: Duration,
    verbose: bool,
}

fn parse_args() -> Args {
    parse_args_from(std::env::args().skip(1).collect())
}

fn parse_args_from(argv: Vec<String>) -> Args {
    let mut args = Args {
        timeline: "open@0 next@3".to_string(),
        tracks: None,
        until: Duration::from_secs(12),
        verbose: false,
    };

    let mut i = 0usize;
    while i < argv.len() {
        let k = argv[i].as_str();
        let v = argv.get(i + 1).map(|s| s.as_str());
        match (k, v) {
            ("--timeline", Some(x)) => {
                args.timeline = x.to_string();
                i += 2;
            }
            ("--tracks", Some(x)) => {
                args.tracks = Some(PathBuf::from(x));
                i += 2;
            }
            ("--until-s", Some(x)) => {
                // Unparseable or unrepresentable values keep the default.
                if let Some(until) = x
                    .parse::<f64>()
                    .ok()
                    .and_then(|v| Duration::try_from_secs_f64(v.max(0.0)).ok())
                {
                    args.until = until;
                }
                i += 2;
            }
            ("--verbose", _) | ("-v", _) => {
                args.verbose = true;
                i += 1;
            }
            _ => i += 1,
        }
    }

    args
}

fn main() -> Result<()> {
    let args = parse_args();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    let catalogue = match &args.tracks {
        Some(path) => TrackCatalogue::load(path)
            .with_context(|| format!("load track list {}", path.display()))?,
        None => default_catalogue(),
    };
    let steps = parse_timeline(&args.timeline).context("parse timeline")?;

    let log = CommandLog::new();
    let mut controller = PlaybackController::new(catalogue.len(), log.embeds(catalogue.len()))
        .context("build playback controller")?;
    let commands = replay(&mut controller, &log, &steps, args.until).context("replay timeline")?;

    println!("Scenario report");
    println!("  tracks: {}", catalogue.len());
    println!("  timeline: {}", args.timeline);
    println!("  until: {:.3}s", args.until.as_secs_f64());
    println!("  commands: {}", commands.len());
    for c in &commands {
        let title = catalogue
            .get(c.entry.track)
            .map(|t| t.title.as_str())
            .unwrap_or("?");
        println!(
            "    t={:>7.3}s  {:<7} track {} ({})",
            c.at.as_secs_f64(),
            c.entry.command.to_string(),
            c.entry.track,
            title
        );
    }

    let state = controller.state();
    println!(
        "  final: track={} playing={} muted={} autoplayed={} pending_timers={}",
        state.current_track,
        state.is_playing,
        state.is_muted,
        state.has_autoplayed,
        controller.pending_timers()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags_and_ignores_junk() {
        let args = parse_args_from(
            ["--timeline", "open@0", "--until-s", "3.5", "--bogus", "-v"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        );
        assert_eq!(args.timeline, "open@0");
        assert_eq!(args.until, Duration::from_millis(3500));
        assert!(args.verbose);
        assert!(args.tracks.is_none());
    }

    #[test]
    fn out_of_range_until_keeps_the_default() {
        let argv = |v: &str| vec!["--until-s".to_string(), v.to_string()];
        assert_eq!(parse_args_from(argv("1e300")).until, Duration::from_secs(12));
        assert_eq!(parse_args_from(argv("inf")).until, Duration::from_secs(12));
        assert_eq!(parse_args_from(argv("-4")).until, Duration::ZERO);
    }
}
