mod args;
mod config;

use std::{process::ExitCode, time::Instant};

use ansi_term::Colour;
use args::{BehaviorArgs, InputArgs, OutputArgs, PluginArgs};
use clap::Parser;
use tidepack::{Tidepack, handle_error};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Commands {
  #[clap(flatten)]
  pub input: InputArgs,

  #[clap(flatten)]
  pub output: OutputArgs,

  #[clap(flatten)]
  pub plugins: PluginArgs,

  #[clap(flatten)]
  pub behavior: BehaviorArgs,
}

fn init_tracing() {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_env("TIDEPACK_LOG").unwrap_or_else(|_| EnvFilter::new("tidepack=info")),
    )
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

async fn run() -> tidepack::Result<()> {
  let process_cwd = std::env::current_dir()?;
  let options = config::load_options(Commands::parse(), &process_cwd)?;
  let tidepack = Tidepack::new(options)?;

  let start = Instant::now();
  let output = tidepack.write().await?;

  if tidepack.options().quiet {
    return Ok(());
  }
  if let Some(stats) = output.stats {
    print!("{stats}");
  }
  let elapsed = format!("{:.2} ms", start.elapsed().as_secs_f64() * 1000.0);
  println!("\n{} Finished in {}", Colour::Green.paint("✔"), Colour::White.bold().paint(elapsed));
  Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
  init_tracing();
  match run().await {
    Ok(()) => ExitCode::SUCCESS,
    Err(error) => {
      handle_error(&error);
      ExitCode::FAILURE
    }
  }
}
