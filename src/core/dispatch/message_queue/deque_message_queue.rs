use std::time::Duration;

use crate::core::actor::actor_ref::ActorRef;
use crate::core::dispatch::envelope::Envelope;
use crate::core::dispatch::message_queue::{
  DequeMessageQueueWriterBehavior, MessageQueueBehavior, MessageQueueReaderBehavior, MessageQueueSize,
  MessageQueueWriterBehavior,
};
use crate::infrastructure::queue::{
  BlockingQueue, BlockingQueueReader, BlockingQueueWriter, DequeWriterBehavior, QueueBehavior, QueueError,
  QueueReaderBehavior, QueueReaderFactoryBehavior, QueueVec, QueueVecReader, QueueVecWriter,
  QueueWriterBehavior, QueueWriterFactoryBehavior,
};

/// Deque-backed FIFO with front injection, the backing for stash/unstash
/// patterns above the mailbox.
#[derive(Debug, Clone)]
pub struct UnboundedDequeMessageQueue {
  queue: QueueVec<Envelope>,
}

#[derive(Debug, Clone)]
pub struct UnboundedDequeMessageQueueWriter {
  queue: QueueVec<Envelope>,
  writer: QueueVecWriter<Envelope>,
}

#[derive(Debug, Clone)]
pub struct UnboundedDequeMessageQueueReader {
  queue: QueueVec<Envelope>,
  reader: QueueVecReader<Envelope>,
}

impl UnboundedDequeMessageQueue {
  pub fn of_vec() -> Self {
    Self { queue: QueueVec::new() }
  }

  pub fn writer(&self) -> UnboundedDequeMessageQueueWriter {
    UnboundedDequeMessageQueueWriter {
      queue: self.queue.clone(),
      writer: self.queue.writer(),
    }
  }

  pub fn reader(&self) -> UnboundedDequeMessageQueueReader {
    UnboundedDequeMessageQueueReader {
      queue: self.queue.clone(),
      reader: self.queue.reader(),
    }
  }
}

impl MessageQueueBehavior for UnboundedDequeMessageQueue {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueBehavior for UnboundedDequeMessageQueueWriter {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueWriterBehavior for UnboundedDequeMessageQueueWriter {
  fn enqueue(&mut self, _receiver: &ActorRef, handle: Envelope) -> Result<(), QueueError<Envelope>> {
    self.writer.offer(handle)
  }
}

impl DequeMessageQueueWriterBehavior for UnboundedDequeMessageQueueWriter {
  fn enqueue_first(&mut self, _receiver: &ActorRef, handle: Envelope) -> Result<(), QueueError<Envelope>> {
    self.writer.offer_first(handle)
  }
}

impl MessageQueueBehavior for UnboundedDequeMessageQueueReader {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueReaderBehavior for UnboundedDequeMessageQueueReader {
  fn dequeue(&mut self) -> Option<Envelope> {
    self.reader.poll()
  }
}

/// Bounded deque flavor; both ends follow the bounded push policy.
#[derive(Debug, Clone)]
pub struct BoundedDequeMessageQueue {
  queue: BlockingQueue<Envelope, QueueVec<Envelope>>,
  push_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct BoundedDequeMessageQueueWriter {
  queue: BlockingQueue<Envelope, QueueVec<Envelope>>,
  writer: BlockingQueueWriter<Envelope, QueueVec<Envelope>>,
  push_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct BoundedDequeMessageQueueReader {
  queue: BlockingQueue<Envelope, QueueVec<Envelope>>,
  reader: BlockingQueueReader<Envelope, QueueVec<Envelope>>,
}

impl BoundedDequeMessageQueue {
  pub fn of_vec_with_capacity(capacity: usize, push_timeout: Duration) -> Self {
    Self {
      queue: BlockingQueue::new(QueueVec::with_num_elements(capacity)),
      push_timeout,
    }
  }

  pub fn push_timeout(&self) -> Duration {
    self.push_timeout
  }

  pub fn writer(&self) -> BoundedDequeMessageQueueWriter {
    BoundedDequeMessageQueueWriter {
      queue: self.queue.clone(),
      writer: self.queue.writer(),
      push_timeout: self.push_timeout,
    }
  }

  pub fn reader(&self) -> BoundedDequeMessageQueueReader {
    BoundedDequeMessageQueueReader {
      queue: self.queue.clone(),
      reader: self.queue.reader(),
    }
  }
}

impl MessageQueueBehavior for BoundedDequeMessageQueue {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueBehavior for BoundedDequeMessageQueueWriter {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueWriterBehavior for BoundedDequeMessageQueueWriter {
  fn enqueue(&mut self, _receiver: &ActorRef, handle: Envelope) -> Result<(), QueueError<Envelope>> {
    if self.push_timeout.is_zero() {
      self.writer.put(handle)
    } else {
      self.writer.offer_with_timeout(handle, self.push_timeout)
    }
  }
}

impl DequeMessageQueueWriterBehavior for BoundedDequeMessageQueueWriter {
  fn enqueue_first(&mut self, _receiver: &ActorRef, handle: Envelope) -> Result<(), QueueError<Envelope>> {
    if self.push_timeout.is_zero() {
      self.writer.put_first(handle)
    } else {
      self.writer.offer_first_with_timeout(handle, self.push_timeout)
    }
  }
}

impl MessageQueueBehavior for BoundedDequeMessageQueueReader {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueReaderBehavior for BoundedDequeMessageQueueReader {
  fn dequeue(&mut self) -> Option<Envelope> {
    self.reader.poll()
  }
}
