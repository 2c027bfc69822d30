use std::future::Future;
use std::sync::OnceLock;

use tokio::task::JoinHandle;

/// The ambient runtime, or a shared fallback when called outside one.
pub(crate) fn runtime_handle() -> tokio::runtime::Handle {
	if let Ok(handle) = tokio::runtime::Handle::try_current() {
		return handle;
	}

	static GLOBAL_RT: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
	let runtime = GLOBAL_RT.get_or_init(|| {
		tokio::runtime::Builder::new_multi_thread()
			.enable_all()
			.worker_threads(2)
			.thread_name("plotmsg-listener")
			.build()
			.expect("failed to build plotmsg global tokio runtime")
	});
	runtime.handle().clone()
}

/// Spawns the background receive loop.
pub(crate) fn spawn<F>(fut: F) -> JoinHandle<F::Output>
where
	F: Future + Send + 'static,
	F::Output: Send + 'static,
{
	tracing::trace!("listener.spawn");
	runtime_handle().spawn(fut)
}

/// Current-thread runtime owned by a blocking listener.
pub(crate) fn blocking_runtime() -> std::io::Result<tokio::runtime::Runtime> {
	tokio::runtime::Builder::new_current_thread().enable_all().build()
}
