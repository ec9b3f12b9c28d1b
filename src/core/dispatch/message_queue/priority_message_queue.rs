use std::time::Duration;

use crate::core::actor::actor_ref::ActorRef;
use crate::core::dispatch::envelope::Envelope;
use crate::core::dispatch::message_queue::{
  MessageQueueBehavior, MessageQueueReaderBehavior, MessageQueueSize, MessageQueueWriterBehavior,
};
use crate::infrastructure::queue::{
  BlockingQueue, BlockingQueueReader, BlockingQueueWriter, Comparator, QueueBehavior, QueueError, QueuePriority,
  QueuePriorityReader, QueuePriorityWriter, QueueReaderBehavior, QueueReaderFactoryBehavior, QueueWriterBehavior,
  QueueWriterFactoryBehavior,
};

/// Consumer sees envelopes in comparator order; ties dequeue in an
/// unspecified order.
#[derive(Debug, Clone)]
pub struct UnboundedPriorityMessageQueue {
  queue: QueuePriority<Envelope>,
}

#[derive(Debug, Clone)]
pub struct UnboundedPriorityMessageQueueWriter {
  queue: QueuePriority<Envelope>,
  writer: QueuePriorityWriter<Envelope>,
}

#[derive(Debug, Clone)]
pub struct UnboundedPriorityMessageQueueReader {
  queue: QueuePriority<Envelope>,
  reader: QueuePriorityReader<Envelope>,
}

impl UnboundedPriorityMessageQueue {
  pub fn of_heap(comparator: Comparator<Envelope>) -> Self {
    Self {
      queue: QueuePriority::new(comparator),
    }
  }

  pub fn writer(&self) -> UnboundedPriorityMessageQueueWriter {
    UnboundedPriorityMessageQueueWriter {
      queue: self.queue.clone(),
      writer: self.queue.writer(),
    }
  }

  pub fn reader(&self) -> UnboundedPriorityMessageQueueReader {
    UnboundedPriorityMessageQueueReader {
      queue: self.queue.clone(),
      reader: self.queue.reader(),
    }
  }
}

impl MessageQueueBehavior for UnboundedPriorityMessageQueue {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueBehavior for UnboundedPriorityMessageQueueWriter {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueWriterBehavior for UnboundedPriorityMessageQueueWriter {
  fn enqueue(&mut self, _receiver: &ActorRef, handle: Envelope) -> Result<(), QueueError<Envelope>> {
    self.writer.offer(handle)
  }
}

impl MessageQueueBehavior for UnboundedPriorityMessageQueueReader {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueReaderBehavior for UnboundedPriorityMessageQueueReader {
  fn dequeue(&mut self) -> Option<Envelope> {
    self.reader.poll()
  }
}

/// Priority heap inside the bounded blocking shell.
#[derive(Debug, Clone)]
pub struct BoundedPriorityMessageQueue {
  queue: BlockingQueue<Envelope, QueuePriority<Envelope>>,
  push_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct BoundedPriorityMessageQueueWriter {
  queue: BlockingQueue<Envelope, QueuePriority<Envelope>>,
  writer: BlockingQueueWriter<Envelope, QueuePriority<Envelope>>,
  push_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct BoundedPriorityMessageQueueReader {
  queue: BlockingQueue<Envelope, QueuePriority<Envelope>>,
  reader: BlockingQueueReader<Envelope, QueuePriority<Envelope>>,
}

impl BoundedPriorityMessageQueue {
  pub fn of_heap_with_capacity(comparator: Comparator<Envelope>, capacity: usize, push_timeout: Duration) -> Self {
    Self {
      queue: BlockingQueue::new(QueuePriority::with_num_elements(comparator, capacity)),
      push_timeout,
    }
  }

  pub fn push_timeout(&self) -> Duration {
    self.push_timeout
  }

  pub fn writer(&self) -> BoundedPriorityMessageQueueWriter {
    BoundedPriorityMessageQueueWriter {
      queue: self.queue.clone(),
      writer: self.queue.writer(),
      push_timeout: self.push_timeout,
    }
  }

  pub fn reader(&self) -> BoundedPriorityMessageQueueReader {
    BoundedPriorityMessageQueueReader {
      queue: self.queue.clone(),
      reader: self.queue.reader(),
    }
  }
}

impl MessageQueueBehavior for BoundedPriorityMessageQueue {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueBehavior for BoundedPriorityMessageQueueWriter {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueWriterBehavior for BoundedPriorityMessageQueueWriter {
  fn enqueue(&mut self, _receiver: &ActorRef, handle: Envelope) -> Result<(), QueueError<Envelope>> {
    if self.push_timeout.is_zero() {
      self.writer.put(handle)
    } else {
      self.writer.offer_with_timeout(handle, self.push_timeout)
    }
  }
}

impl MessageQueueBehavior for BoundedPriorityMessageQueueReader {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueReaderBehavior for BoundedPriorityMessageQueueReader {
  fn dequeue(&mut self) -> Option<Envelope> {
    self.reader.poll()
  }
}
