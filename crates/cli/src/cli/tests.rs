use clap::Parser;
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;

fn listen(args: &[&str]) -> ListenArgs {
	let cli = Cli::try_parse_from(["plotmsg", "listen"].iter().chain(args)).expect("parses");
	match cli.command {
		Command::Listen(args) => args,
		other => panic!("expected listen, got {other:?}"),
	}
}

#[test]
fn listen_defaults() {
	let args = listen(&[]);
	assert_eq!(args.mode, None);
	assert_eq!(args.format, OutputFormat::Json);
	assert_eq!(args.size(), None);
}

#[rstest]
#[case(&["--width", "640", "--height", "480"], Some(SizeMode::Fixed { width: 640, height: 480 }))]
#[case(&["--autosize"], Some(SizeMode::Autosize))]
#[case(&[], None)]
fn listen_size_flags(#[case] flags: &[&str], #[case] expected: Option<SizeMode>) {
	assert_eq!(listen(flags).size(), expected);
}

#[test]
fn width_needs_height_and_excludes_autosize() {
	assert!(Cli::try_parse_from(["plotmsg", "listen", "--width", "640"]).is_err());
	assert!(Cli::try_parse_from(["plotmsg", "listen", "--width", "1", "--height", "1", "--autosize"]).is_err());
}

#[test]
fn unknown_mode_is_rejected() {
	assert!(Cli::try_parse_from(["plotmsg", "listen", "--mode", "threaded"]).is_err());
}

#[test]
fn flags_override_config() {
	let mut config = Config::default();
	listen(&["--address", "tcp://10.0.0.1:1", "--mode", "async", "--kind", "snapshot", "--autosize"]).apply(&mut config);

	assert_eq!(config.address, "tcp://10.0.0.1:1");
	assert_eq!(config.mode, SpinMode::Async);
	assert_eq!(config.figure_kind(), FigureKind::Snapshot);
	assert_eq!(config.size, Some(SizeMode::Autosize));
}

#[test]
fn absent_flags_keep_config_values() {
	let mut config = Config::from_toml("mode = \"async\"\nfigure_kind = \"live\"").expect("parses");
	let before = config.clone();
	listen(&[]).apply(&mut config);
	assert_eq!(config, before);
}

#[test]
fn verbose_is_global() {
	let cli = Cli::try_parse_from(["plotmsg", "decode", "capture.bin", "-v"]).expect("parses");
	assert!(cli.verbose);
	assert!(matches!(cli.command, Command::Decode { ref file } if file.as_os_str() == "capture.bin"));
}
