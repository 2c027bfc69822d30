//! Message transports.
//!
//! [`Subscriber`] is the receiving seam used by the listener. The ZeroMQ
//! implementations speak the producer's publish/subscribe protocol; the
//! channel pair is an in-process stand-in.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use zeromq::{PubSocket, Socket, SocketRecv, SocketSend, SubSocket, ZmqMessage, ZmqResult};

use crate::error::TransportError;

/// Address the producer publishes on by default.
pub const DEFAULT_ADDRESS: &str = "tcp://127.0.0.1:5557";

/// Source of encoded envelopes.
#[async_trait]
pub trait Subscriber: Send {
	/// Waits for the next message.
	async fn recv(&mut self) -> Result<Vec<u8>, TransportError>;

	/// Waits at most `wait` for a message. `Ok(None)` means none was
	/// available.
	async fn try_recv(&mut self, wait: Duration) -> Result<Option<Vec<u8>>, TransportError> {
		match tokio::time::timeout(wait, self.recv()).await {
			Ok(result) => result.map(Some),
			Err(_) => Ok(None),
		}
	}
}

/// How long a [`ZmqSubscriber`] waits without traffic before it opens a fresh
/// connection to its address.
pub const DEFAULT_RECONNECT_INTERVAL: Duration = Duration::from_secs(1);

/// ZeroMQ SUB socket subscribed to every topic.
///
/// Producers bind, publish and exit, so the peer behind the connection comes
/// and goes. The socket does not report a vanished peer, so once it has been
/// idle for the reconnect interval a replacement is connected in the
/// background and swapped in. Messages still queued on the old socket are
/// kept.
pub struct ZmqSubscriber {
	socket: SubSocket,
	address: String,
	reconnect_interval: Duration,
	idle_since: Instant,
	reconnect: Option<JoinHandle<Option<SubSocket>>>,
	pending: VecDeque<Vec<u8>>,
}

enum Wake {
	Message(ZmqResult<ZmqMessage>),
	Reconnected(Option<SubSocket>),
	Idle,
}

impl ZmqSubscriber {
	/// Connects to `address` and waits `settle` for the subscription to
	/// propagate, so that the first published messages are not dropped.
	pub async fn connect(address: &str, settle: Duration) -> Result<Self, TransportError> {
		let socket = open(address).await?;
		if !settle.is_zero() {
			tokio::time::sleep(settle).await;
		}
		info!(address, "subscribed");
		Ok(Self {
			socket,
			address: address.to_owned(),
			reconnect_interval: DEFAULT_RECONNECT_INTERVAL,
			idle_since: Instant::now(),
			reconnect: None,
			pending: VecDeque::new(),
		})
	}

	/// Sets the idle time after which the subscriber reconnects. Also bounds
	/// each reconnect attempt.
	pub fn with_reconnect_interval(mut self, interval: Duration) -> Self {
		self.reconnect_interval = interval;
		self
	}

	pub fn address(&self) -> &str {
		&self.address
	}

	fn start_reconnect(&mut self) {
		let address = self.address.clone();
		let wait = self.reconnect_interval;
		self.reconnect = Some(tokio::spawn(async move {
			match tokio::time::timeout(wait, open(&address)).await {
				Ok(Ok(socket)) => Some(socket),
				Ok(Err(error)) => {
					warn!(address = %address, %error, "reconnect failed");
					None
				}
				Err(_) => None,
			}
		}));
	}

	fn swap(&mut self, fresh: SubSocket) {
		let mut stale = std::mem::replace(&mut self.socket, fresh);
		while let Some(Ok(message)) = stale.recv().now_or_never() {
			self.pending.push_back(flatten(message));
		}
		debug!(address = %self.address, kept = self.pending.len(), "reconnected");
	}
}

#[async_trait]
impl Subscriber for ZmqSubscriber {
	async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
		loop {
			if let Some(bytes) = self.pending.pop_front() {
				return Ok(bytes);
			}

			let reconnecting = self.reconnect.is_some();
			let deadline = self.idle_since + self.reconnect_interval;
			let wake = tokio::select! {
				message = self.socket.recv() => Wake::Message(message),
				fresh = join_reconnect(&mut self.reconnect), if reconnecting => Wake::Reconnected(fresh),
				_ = tokio::time::sleep_until(deadline), if !reconnecting => Wake::Idle,
			};

			match wake {
				Wake::Message(message) => {
					self.idle_since = Instant::now();
					return Ok(flatten(message?));
				}
				Wake::Reconnected(fresh) => {
					self.reconnect = None;
					self.idle_since = Instant::now();
					if let Some(fresh) = fresh {
						self.swap(fresh);
					}
				}
				Wake::Idle => self.start_reconnect(),
			}
		}
	}
}

impl Drop for ZmqSubscriber {
	fn drop(&mut self) {
		if let Some(task) = self.reconnect.take() {
			task.abort();
		}
	}
}

async fn open(address: &str) -> ZmqResult<SubSocket> {
	let mut socket = SubSocket::new();
	socket.subscribe("").await?;
	socket.connect(address).await?;
	Ok(socket)
}

async fn join_reconnect(task: &mut Option<JoinHandle<Option<SubSocket>>>) -> Option<SubSocket> {
	match task {
		Some(handle) => handle.await.ok().flatten(),
		None => std::future::pending().await,
	}
}

fn flatten(message: ZmqMessage) -> Vec<u8> {
	let mut bytes = Vec::new();
	for frame in message.into_vec() {
		bytes.extend_from_slice(&frame);
	}
	bytes
}

/// ZeroMQ PUB socket for producers.
pub struct ZmqPublisher {
	socket: PubSocket,
	endpoint: String,
}

impl ZmqPublisher {
	/// Binds `address`. A `tcp://host:0` address picks a free port, see
	/// [`endpoint`](Self::endpoint).
	pub async fn bind(address: &str) -> Result<Self, TransportError> {
		let mut socket = PubSocket::new();
		let endpoint = socket.bind(address).await?.to_string();
		info!(%endpoint, "publishing");
		Ok(Self { socket, endpoint })
	}

	/// Resolved address subscribers can connect to.
	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	pub async fn send(&mut self, bytes: Vec<u8>) -> Result<(), TransportError> {
		self.socket.send(ZmqMessage::from(bytes)).await?;
		Ok(())
	}
}

/// Creates a connected in-process publisher/subscriber pair.
pub fn channel() -> (ChannelPublisher, ChannelSubscriber) {
	let (tx, rx) = mpsc::unbounded_channel();
	(ChannelPublisher { tx }, ChannelSubscriber { rx })
}

/// Sending half of [`channel`].
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
	tx: mpsc::UnboundedSender<Vec<u8>>,
}

impl ChannelPublisher {
	pub fn send(&self, bytes: Vec<u8>) -> Result<(), TransportError> {
		self.tx.send(bytes).map_err(|_| TransportError::Closed)
	}
}

/// Receiving half of [`channel`]. Closed once every publisher is dropped.
#[derive(Debug)]
pub struct ChannelSubscriber {
	rx: mpsc::UnboundedReceiver<Vec<u8>>,
}

#[async_trait]
impl Subscriber for ChannelSubscriber {
	async fn recv(&mut self) -> Result<Vec<u8>, TransportError> {
		self.rx.recv().await.ok_or(TransportError::Closed)
	}

	async fn try_recv(&mut self, wait: Duration) -> Result<Option<Vec<u8>>, TransportError> {
		match self.rx.try_recv() {
			Ok(bytes) => Ok(Some(bytes)),
			Err(mpsc::error::TryRecvError::Disconnected) => Err(TransportError::Closed),
			Err(mpsc::error::TryRecvError::Empty) => match tokio::time::timeout(wait, self.rx.recv()).await {
				Ok(Some(bytes)) => Ok(Some(bytes)),
				Ok(None) => Err(TransportError::Closed),
				Err(_) => Ok(None),
			},
		}
	}
}
