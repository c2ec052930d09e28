use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::task::AtomicWaker;

use crate::structures::Error;

#[derive(Debug, Default)]
struct CancelState {
  cancelled: AtomicBool,
  waker: AtomicWaker,
}

/// Stops a running update at its next await point. Clones control the same run.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
  state: Arc<CancelState>,
}

impl CancelHandle {
  pub fn new() -> Self {
    Self::default()
  }

  /// Requests cancellation of the current run, or of the next one if nothing is running
  pub fn cancel(&self) {
    self.state.cancelled.store(true, Ordering::SeqCst);
    self.state.waker.wake();
  }

  pub fn is_cancelled(&self) -> bool {
    self.state.cancelled.load(Ordering::SeqCst)
  }

  pub(crate) fn reset(&self) {
    self.state.cancelled.store(false, Ordering::SeqCst);
  }
}

pub trait CancellableTrait: Future + Sized {
  fn cancellable(self, handle: CancelHandle) -> Cancellable<Self>;
}

impl<T, F: Future<Output = Result<T, Error>>> CancellableTrait for F {
  fn cancellable(self, handle: CancelHandle) -> Cancellable<Self> {
    Cancellable {
      future: Box::pin(self),
      handle,
    }
  }
}

/// Resolves to `Error::Cancelled` as soon as its handle is cancelled, dropping the inner future
pub struct Cancellable<F: Future> {
  future: Pin<Box<F>>,
  handle: CancelHandle,
}

impl<T, F: Future<Output = Result<T, Error>>> Future for Cancellable<F> {
  type Output = Result<T, Error>;

  fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    self.handle.state.waker.register(cx.waker());
    if self.handle.is_cancelled() {
      return Poll::Ready(Err(Error::Cancelled));
    }
    self.future.as_mut().poll(cx)
  }
}
