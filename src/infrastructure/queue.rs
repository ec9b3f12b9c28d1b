use std::cmp::Ordering;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

pub mod blocking_queue;
pub mod queue_mpsc;
pub mod queue_priority;
pub mod queue_vec;

pub use blocking_queue::{BlockingQueue, BlockingQueueReader, BlockingQueueWriter};
pub use queue_mpsc::{QueueMpsc, QueueMpscReader, QueueMpscWriter};
pub use queue_priority::{QueuePriority, QueuePriorityReader, QueuePriorityWriter};
pub use queue_vec::{QueueVec, QueueVecReader, QueueVecWriter};

pub trait Element: Debug + Send + 'static {}

impl Element for i32 {}
impl Element for i64 {}
impl Element for u32 {}
impl Element for u64 {}
impl Element for usize {}
impl Element for bool {}
impl Element for String {}

/// Total order over queue elements, shared by producers and the consumer.
pub type Comparator<E> = Arc<dyn Fn(&E, &E) -> Ordering + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueSize {
  Limitless,
  Limited(usize),
}

impl QueueSize {
  pub fn is_limitless(&self) -> bool {
    matches!(self, QueueSize::Limitless)
  }
}

#[derive(Debug, Error)]
pub enum QueueError<E: Element> {
  #[error("the queue is full")]
  Full(E),
  #[error("the offer timed out after {timeout:?}")]
  OfferTimeout { element: E, timeout: Duration },
  #[error("the operation is not supported by this queue")]
  Unsupported(E),
}

impl<E: Element> QueueError<E> {
  /// Recovers the rejected element so the caller can re-route it.
  pub fn into_element(self) -> E {
    match self {
      QueueError::Full(element) => element,
      QueueError::OfferTimeout { element, .. } => element,
      QueueError::Unsupported(element) => element,
    }
  }
}

pub trait QueueBehavior<E: Element> {
  fn len(&self) -> QueueSize;
  fn capacity(&self) -> QueueSize;

  fn non_empty(&self) -> bool {
    match self.len() {
      QueueSize::Limited(len) => len > 0,
      QueueSize::Limitless => true,
    }
  }

  fn is_empty(&self) -> bool {
    !self.non_empty()
  }
}

pub trait QueueWriterBehavior<E: Element>: QueueBehavior<E> {
  fn offer(&mut self, element: E) -> Result<(), QueueError<E>>;
}

/// Extension for deque-backed queues that can inject at the front.
pub trait DequeWriterBehavior<E: Element>: QueueWriterBehavior<E> {
  fn offer_first(&mut self, element: E) -> Result<(), QueueError<E>>;
}

pub trait QueueReaderBehavior<E: Element>: QueueBehavior<E> {
  fn poll(&mut self) -> Option<E>;
}

pub trait QueueWriterFactoryBehavior<E: Element> {
  type Writer: QueueWriterBehavior<E>;
  fn writer(&self) -> Self::Writer;
}

pub trait QueueReaderFactoryBehavior<E: Element> {
  type Reader: QueueReaderBehavior<E>;
  fn reader(&self) -> Self::Reader;
}

pub trait QueueRWFactoryBehavior<E: Element>: QueueWriterFactoryBehavior<E> + QueueReaderFactoryBehavior<E> {}

pub trait QueueWithRWFactoryBehavior<E: Element>: QueueBehavior<E> + QueueRWFactoryBehavior<E> {}
