mod tools;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{ErrorLevel, Verbosity};
use mapfetch::{Config, Fetcher};
use reqwest::Url;

/// Fetch map resources the way a map client does: styles, tiles, sprites and videos.
#[derive(Parser, Debug)]
#[command(
	author,
	version,
	long_about = None,
	propagate_version = true,
	disable_help_subcommand = true,
)]
struct Cli {
	#[command(subcommand)]
	command: Commands,

	/// base URL for relative request URLs when no origin is given
	/// [default: $MAPFETCH_API_URL or https://api.mapbox.com]
	#[arg(long, global = true, verbatim_doc_comment)]
	api_url: Option<String>,

	/// access token kept in the configuration (never sent automatically)
	#[arg(long, global = true)]
	access_token: Option<String>,

	/// origin of the document the requests are made for, e.g. https://maps.example.com/
	#[arg(long, global = true)]
	origin: Option<Url>,

	#[command(flatten)]
	verbose: Verbosity<ErrorLevel>,
}

#[derive(Subcommand, Debug)]
enum Commands {
	/// Fetch one resource and print the outcome
	Get(tools::get::Subcommand),

	/// Assemble a video element and report which source starts loading
	Video(tools::video::Subcommand),
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(cli)
}

fn run(cli: Cli) -> Result<()> {
	let config = load_config(&cli)?;
	match &cli.command {
		Commands::Get(arguments) => tools::get::run(arguments, config, cli.origin.clone()),
		Commands::Video(arguments) => tools::video::run(arguments, config, cli.origin.clone()),
	}
}

/// Environment first, then command line flags on top.
fn load_config(cli: &Cli) -> Result<Config> {
	let mut config = Config::from_env().context("reading configuration from the environment")?;
	if let Some(api_url) = &cli.api_url {
		config.api_url.clone_from(api_url);
	}
	if let Some(token) = &cli.access_token {
		config.access_token = Some(token.clone());
	}
	config.api_base().context("invalid --api-url")?;
	Ok(config)
}

/// Builds a fetcher on the current runtime.
pub(crate) fn build_fetcher(config: Config, origin: Option<Url>) -> Result<Fetcher> {
	let mut builder = Fetcher::builder().config(config.arc());
	if let Some(origin) = origin {
		builder = builder.origin(origin);
	}
	builder.build()
}
