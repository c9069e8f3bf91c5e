use crate::build_fetcher;
use anyhow::{Result, anyhow};
use clap::{Args, ValueEnum};
use mapfetch::{ArrayBufferResponse, Config, Credentials, ImageHandle, ImageSource, RequestParameters, ResourceTiming};
use reqwest::Url;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
	/// parse the body as JSON and pretty-print it
	#[default]
	Json,
	/// print the size and cache headers of the raw body
	Buffer,
	/// decode the body as an image and print its dimensions
	Image,
}

#[derive(Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// URL of the resource, absolute or relative to --origin / --api-url
	#[arg(required = true)]
	url: String,

	/// how to interpret the response
	#[arg(long = "as", value_enum, default_value_t)]
	format: Format,

	/// extra request header, e.g. -H 'Accept: image/webp'
	#[arg(short = 'H', long = "header", value_parser = parse_header)]
	headers: Vec<(String, String)>,

	/// send cookies and other credentials, also cross-origin
	#[arg(long)]
	include_credentials: bool,

	/// print how long the exchange took
	#[arg(long)]
	timing: bool,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand, config: Config, origin: Option<Url>) -> Result<()> {
	log::info!("fetching {:?} as {:?}", arguments.url, arguments.format);

	let fetcher = build_fetcher(config, origin)?;
	let params = arguments.request_parameters();

	let output = match arguments.format {
		Format::Json => {
			let value = fetcher.get_json(&params).await?;
			serde_json::to_string_pretty(&value)?
		}
		Format::Buffer => describe_buffer(&fetcher.get_array_buffer(&params).await?),
		Format::Image => describe_image(&fetcher.get_image(&params).await?),
	};
	println!("{output}");

	Ok(())
}

impl Subcommand {
	fn request_parameters(&self) -> RequestParameters {
		let mut params = RequestParameters::new(&self.url).with_resource_timing(self.timing);
		for (name, value) in &self.headers {
			params = params.with_header(name, value);
		}
		if self.include_credentials {
			params = params.with_credentials(Credentials::Include);
		}
		params
	}
}

fn parse_header(input: &str) -> Result<(String, String)> {
	let (name, value) = input
		.split_once(':')
		.ok_or_else(|| anyhow!("expected 'Name: value', got '{input}'"))?;
	let name = name.trim();
	if name.is_empty() {
		return Err(anyhow!("header name is empty in '{input}'"));
	}
	Ok((name.to_string(), value.trim().to_string()))
}

fn describe_buffer(response: &ArrayBufferResponse) -> String {
	let mut lines = vec![format!("bytes: {}", response.data.len())];
	if let Some(cache_control) = &response.cache_control {
		lines.push(format!("cache-control: {cache_control}"));
	}
	if let Some(expires) = &response.expires {
		lines.push(format!("expires: {expires}"));
	}
	lines.extend(response.timing.as_ref().map(describe_timing));
	lines.join("\n")
}

fn describe_image(image: &ImageHandle) -> String {
	let source = match &image.source {
		ImageSource::Decoded => "decoded",
		ImageSource::TransparentPixel => "transparent placeholder",
	};
	let mut lines = vec![format!("image: {}x{} ({source})", image.width(), image.height())];
	if let Some(cache_control) = &image.cache_control {
		lines.push(format!("cache-control: {cache_control}"));
	}
	if let Some(expires) = &image.expires {
		lines.push(format!("expires: {expires}"));
	}
	lines.extend(image.timing.as_ref().map(describe_timing));
	lines.join("\n")
}

fn describe_timing(timing: &ResourceTiming) -> String {
	format!(
		"timing: {} took {:.1} ms, {} bytes",
		timing.name,
		timing.duration.as_secs_f64() * 1000.0,
		timing.transfer_size
	)
}
