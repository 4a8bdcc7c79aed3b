use anyhow::Result;
use clap::Parser;

mod args;
mod config;
mod ops;

use args::{Cli, Commands};
use config::Panel;

fn run(args: Cli) -> Result<()> {
    match args.command {
        Commands::Render {
            input,
            output,
            width,
            height,
            panel,
        } => {
            let panel = Panel::resolve(&panel)?;
            log::debug!("Resolved panel settings: {:?}", panel);
            ops::render(&input, &output, width, height, &panel)
        }
        Commands::Probe {
            input,
            uv,
            width,
            height,
            panel,
        } => {
            let panel = Panel::resolve(&panel)?;
            let target = width.zip(height);
            if target.is_none() && (width.is_some() || height.is_some()) {
                log::warn!("Probe needs both --width and --height; using the texture size");
            }
            println!("{}", ops::probe(&input, uv, target, &panel)?);
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level.as_str()))
        .init();
    run(cli)
}
