//! plotmsg binary.
//!
//! * `listen` subscribes to a producer and keeps every received figure in a
//!   registry, optionally mirrored to files
//! * `publish-demo` sends a demo figure
//! * `decode` prints a captured envelope

mod cli;
mod demo;
mod output;

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, ListenArgs};
use output::FigureWriter;
use plotmsg_session::{Config, Listener, Session, SpinMode, ZmqPublisher};
use tracing::info;

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	match cli.command {
		Command::Listen(args) => listen(&args),
		Command::PublishDemo { address, uuid, settle_ms } => publish_demo(&address, &uuid, Duration::from_millis(settle_ms)),
		Command::Decode { file } => decode(&file),
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("plotmsg=debug,plotmsg_session=debug,plotmsg_figure=debug,info")
		} else {
			EnvFilter::new("info")
		}
	});
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn listen(args: &ListenArgs) -> anyhow::Result<()> {
	let mut config = Config::load(args.config.as_deref()).context("failed to load config")?;
	args.apply(&mut config);

	let session = Session::new(config.figure_kind());
	session.set_retention(config.retention());
	if let Some(size) = config.size {
		session.set_size(size);
	}
	if let Some(dir) = &args.out {
		let writer = FigureWriter::create(dir, args.format).with_context(|| format!("cannot create {}", dir.display()))?;
		info!(dir = %writer.dir().display(), "writing figures");
		session.store().subscribe(move |store, event| writer.on_event(store, event));
	}

	info!(address = %config.address, mode = %config.mode, kind = %session.figure_kind(), "listening");
	match config.mode {
		SpinMode::Blocking => {
			let mut listener = Listener::connect_blocking(&config.address, config.settle(), session.clone())?
				.with_poll_timeout(config.poll_timeout());
			loop {
				if listener.spin_once()? > 0 {
					info!(status = %session.status(), "processed");
				}
			}
		}
		SpinMode::Async => {
			let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
			runtime.block_on(async {
				let mut listener = Listener::connect_async(&config.address, config.settle(), session.clone()).await?;
				listener.spin_async()?;
				tokio::signal::ctrl_c().await.context("failed to wait for ctrl-c")?;
				listener.stop();
				info!(status = %session.status(), "stopped");
				Ok::<_, anyhow::Error>(())
			})
		}
	}
}

fn publish_demo(address: &str, uuid: &str, settle: Duration) -> anyhow::Result<()> {
	let runtime = tokio::runtime::Builder::new_current_thread()
		.enable_all()
		.build()
		.context("failed to start runtime")?;
	runtime.block_on(async {
		let mut publisher = ZmqPublisher::bind(address).await?;
		// PUB drops messages until subscribers have connected.
		tokio::time::sleep(settle).await;
		publisher.send(demo::figure(uuid).encode()).await?;
		info!(uuid, "sent demo figure");
		Ok::<_, anyhow::Error>(())
	})
}

fn decode(file: &Path) -> anyhow::Result<()> {
	let bytes = std::fs::read(file).with_context(|| format!("cannot read {}", file.display()))?;
	let message = plotmsg_wire::decode_message(&bytes)?;
	println!("{}", serde_json::to_string_pretty(&message)?);
	Ok(())
}
