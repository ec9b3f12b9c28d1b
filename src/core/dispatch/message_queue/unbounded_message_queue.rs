use crate::core::actor::actor_ref::ActorRef;
use crate::core::dispatch::envelope::Envelope;
use crate::core::dispatch::message_queue::{
  MessageQueueBehavior, MessageQueueReaderBehavior, MessageQueueSize, MessageQueueWriterBehavior,
};
use crate::infrastructure::queue::{
  QueueBehavior, QueueError, QueueReaderBehavior, QueueReaderFactoryBehavior, QueueVec, QueueVecReader,
  QueueVecWriter, QueueWriterBehavior, QueueWriterFactoryBehavior,
};

/// General-purpose unbounded FIFO; non-blocking on both sides.
#[derive(Debug, Clone)]
pub struct UnboundedMessageQueue {
  queue: QueueVec<Envelope>,
}

#[derive(Debug, Clone)]
pub struct UnboundedMessageQueueWriter {
  queue: QueueVec<Envelope>,
  writer: QueueVecWriter<Envelope>,
}

#[derive(Debug, Clone)]
pub struct UnboundedMessageQueueReader {
  queue: QueueVec<Envelope>,
  reader: QueueVecReader<Envelope>,
}

impl UnboundedMessageQueue {
  pub fn of_vec() -> Self {
    Self { queue: QueueVec::new() }
  }

  pub fn writer(&self) -> UnboundedMessageQueueWriter {
    UnboundedMessageQueueWriter {
      queue: self.queue.clone(),
      writer: self.queue.writer(),
    }
  }

  pub fn reader(&self) -> UnboundedMessageQueueReader {
    UnboundedMessageQueueReader {
      queue: self.queue.clone(),
      reader: self.queue.reader(),
    }
  }
}

impl MessageQueueBehavior for UnboundedMessageQueue {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueBehavior for UnboundedMessageQueueWriter {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueWriterBehavior for UnboundedMessageQueueWriter {
  fn enqueue(&mut self, _receiver: &ActorRef, handle: Envelope) -> Result<(), QueueError<Envelope>> {
    self.writer.offer(handle)
  }
}

impl MessageQueueBehavior for UnboundedMessageQueueReader {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueReaderBehavior for UnboundedMessageQueueReader {
  fn dequeue(&mut self) -> Option<Envelope> {
    self.reader.poll()
  }
}
