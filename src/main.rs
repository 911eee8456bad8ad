use anyhow::Result;
use stashlist::config::Config;
use stashlist::{demo, logger};

fn main() -> Result<()> {
    let config = Config::load()?;
    logger::init(&config.logging)?;

    demo::app::run(&config)
}
