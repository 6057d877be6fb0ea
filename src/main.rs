use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cfg = birthday_reveal::config::Config::parse();
    birthday_reveal::logging::init(cfg.log_file.as_deref(), cfg.verbose)?;
    birthday_reveal::app::run(cfg)
}
