use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "birthday-reveal", version, about = "Animated birthday greeting for the terminal")]
pub struct Config {
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Seed for the decoration generator; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Track list in `[track]` key=value format; built-in list when omitted.
    #[arg(long)]
    pub tracks: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_rain: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub loading_screen: bool,

    /// Write logs here; the terminal itself is owned by the UI.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[arg(long, short, default_value_t = false)]
    pub verbose: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,
}

impl Config {
    pub fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}
