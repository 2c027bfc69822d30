use std::sync::Arc;

use parking_lot::Mutex;
use plotmsg_figure::AttrPath;
use plotmsg_wire::builder::{Dict, FigureBuilder, TraceBuilder};
use pretty_assertions::assert_eq;

use super::*;
use crate::store::StoreEvent;

fn scatter(uuid: &str, y: Vec<i64>) -> Vec<u8> {
	FigureBuilder::new(uuid)
		.trace(TraceBuilder::graph_objects("Scatter").kwarg("x", vec![1_i64, 2, 3]).kwarg("y", y))
		.encode()
}

#[test]
fn figure_messages_are_stored_and_logged() {
	let session = Session::new(FigureKind::Live);
	let outcome = session.process(&scatter("fig", vec![4, 5, 6])).expect("processes");

	assert_eq!(
		outcome,
		ProcessOutcome::Figure {
			uuid: "fig".into(),
			outcome: StoreOutcome::Inserted,
		}
	);
	let x = session
		.store()
		.with_figure("fig", |fig| fig.attr(&AttrPath::trace(0, ["x"])).cloned())
		.flatten();
	assert_eq!(x, Some(Value::IntArray(vec![1, 2, 3])));
	assert_eq!(session.with_log(|log| (log.len(), log.failures())), (1, 0));
}

#[test]
fn dict_messages_are_only_logged() {
	let session = Session::new(FigureKind::Snapshot);
	let outcome = session.process(&Dict::new().with("hello", "world").encode()).expect("processes");
	assert_eq!(outcome, ProcessOutcome::Logged);
	assert!(session.store().is_empty());
	assert_eq!(session.with_log(|log| log.last().map(|e| e.ok)), Some(true));
}

#[test]
fn interpretation_failures_are_logged_as_failed() {
	let session = Session::new(FigureKind::Snapshot);
	let bytes = FigureBuilder::new("bad").trace(TraceBuilder::graph_objects("NotATrace")).encode();

	let err = session.process(&bytes).unwrap_err();
	assert!(matches!(err, ProcessError::Interpret { ref uuid, .. } if uuid == "bad"), "{err}");
	assert_eq!(session.with_log(|log| log.failures()), 1);

	let status = session.status();
	assert!(matches!(status.state, StepState::Failed(ref msg) if msg.contains("NotATrace")), "{status}");
	assert_eq!(status.received, 1);
	assert_eq!(status.figures, 0);
}

#[test]
fn decode_failures_are_not_logged() {
	let session = Session::new(FigureKind::Snapshot);
	let err = session.process(&[0xff, 0xff, 0xff]).unwrap_err();
	assert!(matches!(err, ProcessError::Decode(_)), "{err}");
	assert!(session.with_log(MessageLog::is_empty));
	assert_eq!(session.status().received, 1);
}

#[test]
fn status_tracks_every_step() {
	let session = Session::new(FigureKind::Live);
	let initial = session.status();
	assert_eq!(initial.state, StepState::Initialised);
	assert_eq!(initial.last_message, None);
	assert!(initial.to_string().contains("No msg."));

	session.process(&scatter("a", vec![1, 2, 3])).expect("processes");
	session.process(&scatter("a", vec![1, 2, 4])).expect("processes");
	let status = session.status();
	assert_eq!(status.state, StepState::Ok);
	assert_eq!((status.figures, status.messages, status.received), (1, 2, 2));
	assert_eq!(status.last_message.as_deref().map(str::len), Some(5));

	session.clear_messages();
	let status = session.status();
	assert_eq!(status.state, StepState::ClearedMessages);
	assert_eq!((status.messages, status.received), (0, 2));

	session.clear_figures();
	assert_eq!(session.status().state, StepState::ClearedFigures);
	assert!(session.store().is_empty());
	assert_eq!(session.selected(), None);
}

#[test]
fn step_guard_records_failure_when_dropped_without_outcome() {
	let status = Mutex::new(Status {
		state: StepState::Initialised,
		last_message: None,
		received: 0,
		size: None,
	});
	drop(StepGuard::begin(&status));
	assert_eq!(status.lock().state, StepState::Failed("processing aborted".into()));
	assert_eq!(status.lock().received, 1);
}

#[test]
fn selection_follows_the_registry() {
	let session = Session::new(FigureKind::Snapshot);
	session.process(&scatter("a", vec![1])).expect("processes");
	session.process(&scatter("b", vec![1])).expect("processes");
	assert_eq!(session.selected().as_deref(), Some("a"));
	assert!(session.select("b"));
	session.store().remove(["b"]);
	assert_eq!(session.selected().as_deref(), Some("a"));
}

#[test]
fn size_set_before_any_figure_applies_to_the_first_one() {
	let session = Session::new(FigureKind::Snapshot);
	assert!(!session.set_size(SizeMode::Fixed { width: 300, height: 200 }));
	session.process(&scatter("a", vec![1])).expect("processes");
	session.process(&scatter("b", vec![1])).expect("processes");

	let height = |uuid| session.store().with_figure(uuid, |fig| fig.layout().get("height").cloned()).flatten();
	assert_eq!(height("a"), Some(Value::Int(200)));
	assert_eq!(height("b"), None);
}

#[test]
fn fixed_size_applies_to_selected_figure_and_its_updates() {
	let session = Session::new(FigureKind::Live);
	assert!(!session.set_size(SizeMode::Autosize));

	session.process(&scatter("a", vec![1, 2, 3])).expect("processes");
	assert!(session.set_size(SizeMode::Fixed { width: 640, height: 480 }));
	let width = |session: &Session| session.store().with_figure("a", |fig| fig.layout().get("width").cloned()).flatten();
	assert_eq!(width(&session), Some(Value::Int(640)));

	let outcome = session.process(&scatter("a", vec![1, 2, 4])).expect("processes");
	let ProcessOutcome::Figure {
		outcome: StoreOutcome::Reconciled(report),
		..
	} = &outcome
	else {
		panic!("expected reconciliation, got {outcome:?}");
	};
	assert_eq!(report.written, vec![AttrPath::trace(0, ["y"])]);
	assert_eq!(width(&session), Some(Value::Int(640)));

	assert!(session.set_size(SizeMode::Autosize));
	assert_eq!(width(&session), Some(Value::Nothing));
	assert_eq!(
		session.store().with_figure("a", |fig| fig.layout().get("autosize").cloned()).flatten(),
		Some(Value::Bool(true))
	);
}

#[test]
fn resizing_the_selected_figure_notifies_observers() {
	let session = Session::new(FigureKind::Live);
	session.process(&scatter("a", vec![1, 2, 3])).expect("processes");

	let events = Arc::new(Mutex::new(Vec::new()));
	let sink = events.clone();
	session.store().subscribe(move |_, event| sink.lock().push(event.clone()));

	assert!(session.set_size(SizeMode::Fixed { width: 640, height: 480 }));
	assert_eq!(*events.lock(), vec![StoreEvent::Reconciled("a".into())]);
}

#[test]
fn process_errors_come_from_decoding_or_interpreting() {
	let session = Session::new(FigureKind::Snapshot);
	let bad_trace = FigureBuilder::new("bad").trace(TraceBuilder::graph_objects("NotATrace")).encode();
	for bytes in [vec![0xff, 0xff, 0xff], bad_trace] {
		match session.process(&bytes).unwrap_err() {
			ProcessError::Decode(_) | ProcessError::Interpret { .. } => {}
		}
	}
}
