use std::time::Duration;

use crate::core::actor::actor_ref::ActorRef;
use crate::core::dispatch::envelope::Envelope;
use crate::core::dispatch::message_queue::{
  MessageQueueBehavior, MessageQueueReaderBehavior, MessageQueueSize, MessageQueueWriterBehavior,
};
use crate::infrastructure::queue::{
  BlockingQueue, BlockingQueueReader, BlockingQueueWriter, QueueBehavior, QueueError, QueueReaderBehavior,
  QueueReaderFactoryBehavior, QueueVec, QueueWriterFactoryBehavior,
};

/// Capacity-bounded FIFO. A push timeout of zero turns the enqueue into an
/// unbounded blocking `put`; a positive timeout bounds the wait and hands the
/// envelope back for dead-letter routing when it elapses.
#[derive(Debug, Clone)]
pub struct BoundedMessageQueue {
  queue: BlockingQueue<Envelope, QueueVec<Envelope>>,
  push_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct BoundedMessageQueueWriter {
  queue: BlockingQueue<Envelope, QueueVec<Envelope>>,
  writer: BlockingQueueWriter<Envelope, QueueVec<Envelope>>,
  push_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct BoundedMessageQueueReader {
  queue: BlockingQueue<Envelope, QueueVec<Envelope>>,
  reader: BlockingQueueReader<Envelope, QueueVec<Envelope>>,
}

impl BoundedMessageQueue {
  pub fn of_vec_with_capacity(capacity: usize, push_timeout: Duration) -> Self {
    Self {
      queue: BlockingQueue::new(QueueVec::with_num_elements(capacity)),
      push_timeout,
    }
  }

  pub fn push_timeout(&self) -> Duration {
    self.push_timeout
  }

  pub fn writer(&self) -> BoundedMessageQueueWriter {
    BoundedMessageQueueWriter {
      queue: self.queue.clone(),
      writer: self.queue.writer(),
      push_timeout: self.push_timeout,
    }
  }

  pub fn reader(&self) -> BoundedMessageQueueReader {
    BoundedMessageQueueReader {
      queue: self.queue.clone(),
      reader: self.queue.reader(),
    }
  }
}

impl MessageQueueBehavior for BoundedMessageQueue {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueBehavior for BoundedMessageQueueWriter {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueWriterBehavior for BoundedMessageQueueWriter {
  fn enqueue(&mut self, _receiver: &ActorRef, handle: Envelope) -> Result<(), QueueError<Envelope>> {
    if self.push_timeout.is_zero() {
      self.writer.put(handle)
    } else {
      self.writer.offer_with_timeout(handle, self.push_timeout)
    }
  }
}

impl MessageQueueBehavior for BoundedMessageQueueReader {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueReaderBehavior for BoundedMessageQueueReader {
  fn dequeue(&mut self) -> Option<Envelope> {
    self.reader.poll()
  }
}
