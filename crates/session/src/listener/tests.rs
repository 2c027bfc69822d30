use std::time::Duration;

use plotmsg_figure::FigureKind;
use plotmsg_wire::builder::{Dict, FigureBuilder, TraceBuilder};
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::transport::channel;

fn scatter(uuid: &str) -> Vec<u8> {
	FigureBuilder::new(uuid)
		.trace(TraceBuilder::graph_objects("Scatter").kwarg("y", vec![1_i64, 2, 3]))
		.encode()
}

#[rstest]
#[case("blocking", SpinMode::Blocking)]
#[case("default", SpinMode::Blocking)]
#[case("async", SpinMode::Async)]
fn spin_mode_parses(#[case] input: &str, #[case] expected: SpinMode) {
	assert_eq!(input.parse::<SpinMode>().expect("known mode"), expected);
}

#[test]
fn unknown_spin_mode_is_rejected() {
	let err = "threaded".parse::<SpinMode>().unwrap_err();
	assert!(matches!(err, ListenerError::UnknownMode(ref mode) if mode == "threaded"), "{err}");
}

#[test]
fn spin_once_drains_available_messages() {
	let (tx, rx) = channel();
	let mut listener = Listener::new(rx, Session::new(FigureKind::Snapshot), SpinMode::Blocking).expect("runtime");

	tx.send(scatter("a")).expect("open");
	tx.send(Dict::new().with("note", "hi").encode()).expect("open");
	tx.send(vec![0xff, 0xff, 0xff]).expect("open");

	assert_eq!(listener.spin_once().expect("spins"), 3);
	assert_eq!(listener.session().store().ids(), vec!["a"]);
	assert_eq!(listener.session().with_log(|log| log.len()), 2);
	assert_eq!(listener.session().status().received, 3);

	assert_eq!(listener.spin_once().expect("spins"), 0);
}

#[test]
fn spin_once_stops_at_a_closed_transport() {
	let (tx, rx) = channel();
	let mut listener = Listener::new(rx, Session::new(FigureKind::Snapshot), SpinMode::Blocking)
		.expect("runtime")
		.with_poll_timeout(Duration::from_millis(1));
	tx.send(scatter("a")).expect("open");
	drop(tx);

	assert_eq!(listener.spin_once().expect("spins"), 1);
	assert_eq!(listener.spin_once().expect("spins"), 0);
}

#[test]
fn spin_returns_once_the_transport_closes() {
	let (tx, rx) = channel();
	let mut listener = Listener::new(rx, Session::new(FigureKind::Live), SpinMode::Blocking).expect("runtime");
	tx.send(scatter("a")).expect("open");
	tx.send(scatter("b")).expect("open");
	drop(tx);

	listener.spin().expect("spins until closed");
	assert_eq!(listener.session().store().len(), 2);
}

#[test]
fn blocking_operations_refuse_async_listeners() {
	let (_tx, rx) = channel();
	let mut listener = Listener::new(rx, Session::new(FigureKind::Live), SpinMode::Async).expect("no runtime needed");
	let err = listener.spin_once().unwrap_err();
	assert!(
		matches!(
			err,
			ListenerError::ModeMismatch {
				operation: "spin_once",
				expected: SpinMode::Blocking,
				actual: SpinMode::Async,
			}
		),
		"{err}"
	);
	assert!(matches!(listener.spin(), Err(ListenerError::ModeMismatch { .. })));
}

#[test]
fn spin_async_refuses_blocking_listeners() {
	let (_tx, rx) = channel();
	let mut listener = Listener::new(rx, Session::new(FigureKind::Live), SpinMode::Blocking).expect("runtime");
	assert!(matches!(
		listener.spin_async(),
		Err(ListenerError::ModeMismatch { operation: "spin_async", .. })
	));
	assert!(!listener.is_spinning());
}

#[tokio::test]
async fn async_listener_processes_until_closed() {
	let (tx, rx) = channel();
	let session = Session::new(FigureKind::Live);
	let mut listener = Listener::new(rx, session.clone(), SpinMode::Async).expect("listener");

	assert!(listener.spin_async().expect("starts"));
	assert!(!listener.spin_async().expect("already running"));

	tx.send(scatter("a")).expect("open");
	tx.send(scatter("a")).expect("open");
	drop(tx);
	tokio::time::timeout(Duration::from_secs(5), listener.join()).await.expect("task exits");

	assert!(!listener.is_spinning());
	assert_eq!(session.store().ids(), vec!["a"]);
	assert_eq!(session.status().received, 2);
}

#[tokio::test]
async fn stop_cancels_the_receive_task() {
	let (tx, rx) = channel();
	let session = Session::new(FigureKind::Live);
	let mut listener = Listener::new(rx, session.clone(), SpinMode::Async).expect("listener");
	assert!(listener.spin_async().expect("starts"));

	listener.stop();
	assert!(!listener.is_spinning());
	tokio::task::yield_now().await;
	let _ = tx.send(scatter("late"));
	tokio::task::yield_now().await;
	assert!(session.store().is_empty());

	assert!(listener.spin_async().expect("restarts after stop"));
}

#[tokio::test]
async fn dropping_the_listener_closes_the_subscription() {
	let (tx, rx) = channel();
	let mut listener = Listener::new(rx, Session::new(FigureKind::Live), SpinMode::Async).expect("listener");
	assert!(listener.spin_async().expect("starts"));
	drop(listener);

	// The aborted task releases the receiver.
	tokio::time::timeout(Duration::from_secs(5), async {
		while tx.send(vec![0]).is_ok() {
			tokio::task::yield_now().await;
		}
	})
	.await
	.expect("receiver dropped");
}
