//! CLI schema for the plotmsg binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use plotmsg_figure::FigureKind;
use plotmsg_session::{Config, SizeMode, SpinMode};

#[derive(Parser, Debug)]
#[command(name = "plotmsg")]
#[command(about = "Receive plot messages and keep their figures up to date")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Subscribe to a producer and store every figure it sends
	Listen(ListenArgs),
	/// Publish the demo scatter figure
	PublishDemo {
		/// Endpoint to bind
		#[arg(long, default_value = plotmsg_session::DEFAULT_ADDRESS)]
		address: String,
		/// Figure identifier
		#[arg(long, default_value = "test_1")]
		uuid: String,
		/// Wait for subscribers before sending, in milliseconds
		#[arg(long, default_value_t = 1000)]
		settle_ms: u64,
	},
	/// Decode a captured envelope and print it as JSON
	Decode {
		/// File holding one encoded envelope
		file: PathBuf,
	},
}

#[derive(Args, Debug, Default)]
pub struct ListenArgs {
	/// Config file (defaults to the platform config directory)
	#[arg(long, value_name = "PATH")]
	pub config: Option<PathBuf>,

	/// Producer endpoint
	#[arg(long)]
	pub address: Option<String>,

	/// Receive loop: blocking or async
	#[arg(long, value_parser = parse_mode)]
	pub mode: Option<SpinMode>,

	/// Figure kind: snapshot or live
	#[arg(long, value_parser = parse_kind)]
	pub kind: Option<FigureKind>,

	/// Write every stored figure into this directory
	#[arg(long, value_name = "DIR")]
	pub out: Option<PathBuf>,

	/// Output file format
	#[arg(long, value_enum, default_value_t = OutputFormat::Json)]
	pub format: OutputFormat,

	/// Fixed figure width in pixels
	#[arg(long, requires = "height", conflicts_with = "autosize")]
	pub width: Option<u32>,

	/// Fixed figure height in pixels
	#[arg(long, requires = "width", conflicts_with = "autosize")]
	pub height: Option<u32>,

	/// Let figures fit their container
	#[arg(long)]
	pub autosize: bool,
}

impl ListenArgs {
	/// Size requested on the command line, if any.
	pub fn size(&self) -> Option<SizeMode> {
		match (self.width, self.height) {
			(Some(width), Some(height)) => Some(SizeMode::Fixed { width, height }),
			_ if self.autosize => Some(SizeMode::Autosize),
			_ => None,
		}
	}

	/// Overrides `config` with the flags that were given.
	pub fn apply(&self, config: &mut Config) {
		if let Some(address) = &self.address {
			config.address.clone_from(address);
		}
		if let Some(mode) = self.mode {
			config.mode = mode;
		}
		if let Some(kind) = self.kind {
			config.figure_kind = Some(kind);
		}
		if let Some(size) = self.size() {
			config.size = Some(size);
		}
	}
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
	#[default]
	Json,
	Html,
}

impl OutputFormat {
	pub fn extension(self) -> &'static str {
		match self {
			Self::Json => "json",
			Self::Html => "html",
		}
	}
}

fn parse_mode(s: &str) -> Result<SpinMode, String> {
	s.parse().map_err(|err: plotmsg_session::ListenerError| err.to_string())
}

fn parse_kind(s: &str) -> Result<FigureKind, String> {
	s.parse()
}

#[cfg(test)]
mod tests;
