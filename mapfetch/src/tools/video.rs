use crate::build_fetcher;
use anyhow::Result;
use clap::Args;
use mapfetch::{Config, VideoElement, VideoStart};
use reqwest::Url;

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// video source URLs, in order of preference
	#[arg(required = true, num_args = 1..)]
	urls: Vec<String>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand, config: Config, origin: Option<Url>) -> Result<()> {
	let fetcher = build_fetcher(config, origin)?;
	let video = fetcher.get_video(&arguments.urls);

	println!("{}", describe_element(video.element()));
	println!("{}", describe_start(video.load_start().await.as_ref()));

	Ok(())
}

fn describe_element(element: &VideoElement) -> String {
	let mut lines = vec![format!(
		"crossOrigin: {}",
		element.cross_origin.map_or_else(|| "unset".to_string(), |mode| mode.to_string())
	)];
	for source in &element.sources {
		let origin = if source.same_origin { "same-origin" } else { "cross-origin" };
		lines.push(format!("source: {} ({origin})", source.src));
	}
	lines.join("\n")
}

fn describe_start(start: Option<&VideoStart>) -> String {
	match start {
		Some(start) => format!(
			"loading started: #{} {} ({})",
			start.index,
			start.src,
			start.content_type.as_deref().unwrap_or("unknown type")
		),
		None => "no source started loading".to_string(),
	}
}
