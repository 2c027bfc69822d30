//! Figure files written by `plotmsg listen --out`.

use std::io;
use std::path::{Path, PathBuf};

use plotmsg_figure::{Figure, render};
use plotmsg_session::{FigureStore, StoreEvent};
use tracing::{debug, warn};

use crate::cli::OutputFormat;

/// Writes figures as `<dir>/<uuid>.<ext>`.
#[derive(Debug, Clone)]
pub struct FigureWriter {
	dir: PathBuf,
	format: OutputFormat,
}

impl FigureWriter {
	/// Creates `dir` if needed.
	pub fn create(dir: impl Into<PathBuf>, format: OutputFormat) -> io::Result<Self> {
		let dir = dir.into();
		std::fs::create_dir_all(&dir)?;
		Ok(Self { dir, format })
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Output path for `uuid`. Characters unsafe in file names become `_`.
	pub fn path_for(&self, uuid: &str) -> PathBuf {
		let stem: String = uuid
			.chars()
			.map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
			.collect();
		let stem = if stem.is_empty() || stem.starts_with('.') { format!("_{stem}") } else { stem };
		self.dir.join(format!("{stem}.{}", self.format.extension()))
	}

	pub fn write(&self, uuid: &str, figure: &Figure) -> io::Result<PathBuf> {
		let contents = match self.format {
			OutputFormat::Json => render::to_json(figure),
			OutputFormat::Html => render::to_html(figure, uuid),
		}
		.map_err(io::Error::other)?;
		let path = self.path_for(uuid);
		std::fs::write(&path, contents)?;
		Ok(path)
	}

	/// Mirrors registry changes to disk. Failures are logged.
	pub fn on_event(&self, store: &FigureStore, event: &StoreEvent) {
		match event {
			StoreEvent::Inserted(uuid) | StoreEvent::Reconciled(uuid) | StoreEvent::Replaced(uuid) => {
				let Some(result) = store.with_figure(uuid, |figure| self.write(uuid, figure)) else {
					return;
				};
				match result {
					Ok(path) => debug!(uuid = %uuid, path = %path.display(), "wrote figure"),
					Err(err) => warn!(uuid = %uuid, error = %err, "failed to write figure"),
				}
			}
			StoreEvent::Removed(uuid) => self.remove(uuid),
			StoreEvent::Cleared => {
				if let Err(err) = self.remove_all() {
					warn!(dir = %self.dir.display(), error = %err, "failed to clear figure files");
				}
			}
		}
	}

	fn remove(&self, uuid: &str) {
		match std::fs::remove_file(self.path_for(uuid)) {
			Ok(()) => debug!(uuid, "removed figure file"),
			Err(err) if err.kind() == io::ErrorKind::NotFound => {}
			Err(err) => warn!(uuid, error = %err, "failed to remove figure file"),
		}
	}

	/// Removes every file in the output directory with this writer's extension.
	fn remove_all(&self) -> io::Result<()> {
		let ext = self.format.extension();
		for entry in std::fs::read_dir(&self.dir)? {
			let path = entry?.path();
			if path.is_file() && path.extension().is_some_and(|e| e == ext) {
				std::fs::remove_file(&path)?;
			}
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests;
