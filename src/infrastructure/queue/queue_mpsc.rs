use std::sync::Arc;

use crossbeam_queue::SegQueue;

use crate::infrastructure::queue::{
  Element, QueueBehavior, QueueError, QueueRWFactoryBehavior, QueueReaderBehavior, QueueReaderFactoryBehavior,
  QueueSize, QueueWithRWFactoryBehavior, QueueWriterBehavior, QueueWriterFactoryBehavior,
};

/// Lock-free unbounded queue for the single-consumer fast path.
///
/// Producers may share the writer freely; correctness of the mailbox built on
/// top of this queue requires that only one thread ever polls it.
#[derive(Debug)]
pub struct QueueMpsc<E: Element> {
  values: Arc<SegQueue<E>>,
}

impl<E: Element> Clone for QueueMpsc<E> {
  fn clone(&self) -> Self {
    Self {
      values: self.values.clone(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct QueueMpscWriter<E: Element> {
  queue: QueueMpsc<E>,
}

#[derive(Debug, Clone)]
pub struct QueueMpscReader<E: Element> {
  queue: QueueMpsc<E>,
}

impl<E: Element> QueueMpsc<E> {
  pub fn new() -> Self {
    Self {
      values: Arc::new(SegQueue::new()),
    }
  }
}

impl<E: Element> Default for QueueMpsc<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E: Element> QueueBehavior<E> for QueueMpsc<E> {
  fn len(&self) -> QueueSize {
    QueueSize::Limited(self.values.len())
  }

  fn capacity(&self) -> QueueSize {
    QueueSize::Limitless
  }
}

impl<E: Element> QueueWriterFactoryBehavior<E> for QueueMpsc<E> {
  type Writer = QueueMpscWriter<E>;

  fn writer(&self) -> Self::Writer {
    QueueMpscWriter { queue: self.clone() }
  }
}

impl<E: Element> QueueReaderFactoryBehavior<E> for QueueMpsc<E> {
  type Reader = QueueMpscReader<E>;

  fn reader(&self) -> Self::Reader {
    QueueMpscReader { queue: self.clone() }
  }
}

impl<E: Element> QueueRWFactoryBehavior<E> for QueueMpsc<E> {}

impl<E: Element> QueueWithRWFactoryBehavior<E> for QueueMpsc<E> {}

impl<E: Element> QueueBehavior<E> for QueueMpscWriter<E> {
  fn len(&self) -> QueueSize {
    self.queue.len()
  }

  fn capacity(&self) -> QueueSize {
    self.queue.capacity()
  }
}

impl<E: Element> QueueWriterBehavior<E> for QueueMpscWriter<E> {
  fn offer(&mut self, element: E) -> Result<(), QueueError<E>> {
    self.queue.values.push(element);
    Ok(())
  }
}

impl<E: Element> QueueBehavior<E> for QueueMpscReader<E> {
  fn len(&self) -> QueueSize {
    self.queue.len()
  }

  fn capacity(&self) -> QueueSize {
    self.queue.capacity()
  }
}

impl<E: Element> QueueReaderBehavior<E> for QueueMpscReader<E> {
  fn poll(&mut self) -> Option<E> {
    self.queue.values.pop()
  }
}
