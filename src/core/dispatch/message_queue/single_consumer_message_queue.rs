use crate::core::actor::actor_ref::ActorRef;
use crate::core::dispatch::envelope::Envelope;
use crate::core::dispatch::message_queue::{
  MessageQueueBehavior, MessageQueueReaderBehavior, MessageQueueSize, MessageQueueWriterBehavior,
};
use crate::infrastructure::queue::{
  QueueBehavior, QueueError, QueueMpsc, QueueMpscReader, QueueMpscWriter, QueueReaderBehavior,
  QueueReaderFactoryBehavior, QueueWriterBehavior, QueueWriterFactoryBehavior,
};

/// Lock-free unbounded queue assuming exactly one dequeuing thread. Must not
/// be paired with a dispatcher that allows concurrent runs of one actor.
#[derive(Debug, Clone)]
pub struct SingleConsumerMessageQueue {
  queue: QueueMpsc<Envelope>,
}

#[derive(Debug, Clone)]
pub struct SingleConsumerMessageQueueWriter {
  queue: QueueMpsc<Envelope>,
  writer: QueueMpscWriter<Envelope>,
}

#[derive(Debug, Clone)]
pub struct SingleConsumerMessageQueueReader {
  queue: QueueMpsc<Envelope>,
  reader: QueueMpscReader<Envelope>,
}

impl SingleConsumerMessageQueue {
  pub fn of_mpsc() -> Self {
    Self { queue: QueueMpsc::new() }
  }

  pub fn writer(&self) -> SingleConsumerMessageQueueWriter {
    SingleConsumerMessageQueueWriter {
      queue: self.queue.clone(),
      writer: self.queue.writer(),
    }
  }

  pub fn reader(&self) -> SingleConsumerMessageQueueReader {
    SingleConsumerMessageQueueReader {
      queue: self.queue.clone(),
      reader: self.queue.reader(),
    }
  }
}

impl MessageQueueBehavior for SingleConsumerMessageQueue {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueBehavior for SingleConsumerMessageQueueWriter {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueWriterBehavior for SingleConsumerMessageQueueWriter {
  fn enqueue(&mut self, _receiver: &ActorRef, handle: Envelope) -> Result<(), QueueError<Envelope>> {
    self.writer.offer(handle)
  }
}

impl MessageQueueBehavior for SingleConsumerMessageQueueReader {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.queue.len().into()
  }

  fn has_messages(&self) -> bool {
    self.queue.non_empty()
  }
}

impl MessageQueueReaderBehavior for SingleConsumerMessageQueueReader {
  fn dequeue(&mut self) -> Option<Envelope> {
    self.reader.poll()
  }
}
