use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::prelude::*;

use hashlist_patcher::{UpdateEvent, UpdateOutcome, UpdaterBuilder, DEFAULT_MANIFEST_NAME, DEFAULT_RETRIES};

#[derive(Parser, Debug)]
#[command(name = "hashlist-patcher", author, version, about = "Downloads the files of an installation that are missing or out of date")]
struct Cli {
  /// Url the version descriptor, hash list and files are served from
  #[arg(long, env = "HASHLIST_PATCHER_BASE_URL")]
  base_url: String,

  /// Directory holding the installation
  #[arg(long, env = "HASHLIST_PATCHER_INSTALL_DIR")]
  install_dir: PathBuf,

  /// Only report whether an update is required
  #[arg(long, conflicts_with = "full_check")]
  check: bool,

  /// Hash every file on disk and repair whatever differs
  #[arg(long)]
  full_check: bool,

  /// Restrict the update to these tags, all tags by default
  #[arg(long = "tag", env = "HASHLIST_PATCHER_TAGS", value_delimiter = ',')]
  tags: Vec<String>,

  #[arg(long, env = "HASHLIST_PATCHER_MANIFEST", default_value = DEFAULT_MANIFEST_NAME)]
  manifest: String,

  /// Seconds a single request may take
  #[arg(long, env = "HASHLIST_PATCHER_TIMEOUT", default_value_t = 30)]
  timeout: u64,

  /// Attempts per request, the first one included
  #[arg(long, env = "HASHLIST_PATCHER_RETRIES", default_value_t = DEFAULT_RETRIES)]
  retries: u32,

  /// Delete tracked files that are no longer distributed
  #[arg(long, env = "HASHLIST_PATCHER_PRUNE")]
  prune: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::registry()
    .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let cli = Cli::parse();

  let mut builder = UpdaterBuilder::new();
  builder
    .set_base_url(cli.base_url)
    .set_install_dir(cli.install_dir)
    .set_manifest_name(cli.manifest)
    .set_timeout(Duration::from_secs(cli.timeout))
    .set_retries(cli.retries)
    .set_prune(cli.prune)
    .subscribe(|event: &UpdateEvent| {
      if !event.is_diagnostic() {
        println!("{}", event);
      }
    });
  for tag in cli.tags {
    builder.add_tag(tag);
  }
  let mut updater = match builder.build() {
    Ok(updater) => updater,
    Err(error) => {
      eprintln!("{}", error);
      return ExitCode::FAILURE;
    },
  };

  let cancel_handle = updater.cancel_handle();
  tokio::spawn(async move {
    if tokio::signal::ctrl_c().await.is_ok() {
      cancel_handle.cancel();
    }
  });

  let result = if cli.check {
    updater.check().await
  } else if cli.full_check {
    updater.recheck_all().await
  } else {
    updater.run().await
  };

  match result {
    Ok(UpdateOutcome::UpdateRequired) => {
      println!("An update is available");
      ExitCode::SUCCESS
    },
    Ok(_) => ExitCode::SUCCESS,
    Err(error) => {
      eprintln!("{}", error);
      ExitCode::FAILURE
    },
  }
}
