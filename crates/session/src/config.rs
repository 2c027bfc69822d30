//! Listener configuration.
//!
//! Loaded from `config.toml` in the platform config directory
//! (`~/.config/plotmsg/config.toml` on Linux). Every key is optional:
//!
//! ```toml
//! address = "tcp://127.0.0.1:5557"
//! mode = "async"
//! figure_kind = "live"
//! settle_ms = 1000
//! poll_timeout_ms = 10
//! log_retention = 200
//!
//! [size]
//! fixed = { width = 800, height = 600 }
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use plotmsg_figure::FigureKind;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::listener::SpinMode;
use crate::log::Retention;
use crate::session::SizeMode;
use crate::transport::DEFAULT_ADDRESS;

pub type Result<T> = std::result::Result<T, ConfigError>;

const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	/// ZeroMQ endpoint the producer publishes on.
	pub address: String,
	pub mode: SpinMode,
	/// Kind of figure built from messages. Defaults per [`SpinMode`].
	pub figure_kind: Option<FigureKind>,
	/// Wait after subscribing before the first receive.
	pub settle_ms: u64,
	/// Per-pass wait of a blocking `spin_once`.
	pub poll_timeout_ms: u64,
	/// Keep only this many log entries.
	pub log_retention: Option<usize>,
	pub size: Option<SizeMode>,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			address: DEFAULT_ADDRESS.to_owned(),
			mode: SpinMode::Blocking,
			figure_kind: None,
			settle_ms: 1000,
			poll_timeout_ms: 10,
			log_retention: None,
			size: None,
		}
	}
}

impl Config {
	/// `config.toml` under the platform config directory, if there is one.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("plotmsg").join(CONFIG_FILE))
	}

	/// Loads `path`, or the default file when `path` is `None`.
	///
	/// An explicit path must exist. A missing default file yields the
	/// defaults.
	pub fn load(path: Option<&Path>) -> Result<Self> {
		let path = match path {
			Some(path) => path.to_path_buf(),
			None => match Self::default_path() {
				Some(path) if path.is_file() => path,
				_ => {
					debug!("no config file, using defaults");
					return Ok(Self::default());
				}
			},
		};
		let content = std::fs::read_to_string(&path).map_err(|error| ConfigError::Io {
			path: path.clone(),
			error,
		})?;
		let config = toml::from_str(&content).map_err(|error| ConfigError::Parse {
			path: Some(path.clone()),
			error,
		})?;
		debug!(path = %path.display(), "loaded config");
		Ok(config)
	}

	/// Parses config text.
	pub fn from_toml(input: &str) -> Result<Self> {
		toml::from_str(input).map_err(|error| ConfigError::Parse { path: None, error })
	}

	/// The configured figure kind, else live for async listeners and
	/// snapshot for blocking ones.
	pub fn figure_kind(&self) -> FigureKind {
		self.figure_kind.unwrap_or(match self.mode {
			SpinMode::Blocking => FigureKind::Snapshot,
			SpinMode::Async => FigureKind::Live,
		})
	}

	pub fn settle(&self) -> Duration {
		Duration::from_millis(self.settle_ms)
	}

	pub fn poll_timeout(&self) -> Duration {
		Duration::from_millis(self.poll_timeout_ms)
	}

	pub fn retention(&self) -> Retention {
		self.log_retention.into()
	}
}
