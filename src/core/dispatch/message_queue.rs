use crate::core::actor::actor_ref::ActorRef;
use crate::core::dispatch::envelope::Envelope;
use crate::core::dispatch::mailbox::dead_letter_mailbox::DeadLetterMailbox;
use crate::core::dispatch::mailbox::mailbox_type::MailboxRequirement;
use crate::core::dispatch::message_queue::bounded_message_queue::{
  BoundedMessageQueue, BoundedMessageQueueReader, BoundedMessageQueueWriter,
};
use crate::core::dispatch::message_queue::deque_message_queue::{
  BoundedDequeMessageQueue, BoundedDequeMessageQueueReader, BoundedDequeMessageQueueWriter,
  UnboundedDequeMessageQueue, UnboundedDequeMessageQueueReader, UnboundedDequeMessageQueueWriter,
};
use crate::core::dispatch::message_queue::priority_message_queue::{
  BoundedPriorityMessageQueue, BoundedPriorityMessageQueueReader, BoundedPriorityMessageQueueWriter,
  UnboundedPriorityMessageQueue, UnboundedPriorityMessageQueueReader, UnboundedPriorityMessageQueueWriter,
};
use crate::core::dispatch::message_queue::single_consumer_message_queue::{
  SingleConsumerMessageQueue, SingleConsumerMessageQueueReader, SingleConsumerMessageQueueWriter,
};
use crate::core::dispatch::message_queue::unbounded_message_queue::{
  UnboundedMessageQueue, UnboundedMessageQueueReader, UnboundedMessageQueueWriter,
};
use crate::infrastructure::queue::{QueueError, QueueSize};

pub mod bounded_message_queue;
pub mod deque_message_queue;
pub mod priority_message_queue;
pub mod single_consumer_message_queue;
pub mod unbounded_message_queue;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageQueueSize {
  Limitless,
  Limited(usize),
}

impl From<QueueSize> for MessageQueueSize {
  fn from(size: QueueSize) -> Self {
    match size {
      QueueSize::Limitless => MessageQueueSize::Limitless,
      QueueSize::Limited(n) => MessageQueueSize::Limited(n),
    }
  }
}

pub trait MessageQueueBehavior {
  /// Hint only; conservative implementations may under-report.
  fn number_of_messages(&self) -> MessageQueueSize;
  fn has_messages(&self) -> bool;
}

pub trait MessageQueueWriterBehavior: MessageQueueBehavior {
  /// Thread-safe from any producer. Bounded flavors hand the envelope back in
  /// the error when the push timeout elapses so the caller can dead-letter it.
  fn enqueue(&mut self, receiver: &ActorRef, handle: Envelope) -> Result<(), QueueError<Envelope>>;
}

/// Capability extension for deque-backed queues.
pub trait DequeMessageQueueWriterBehavior: MessageQueueWriterBehavior {
  fn enqueue_first(&mut self, receiver: &ActorRef, handle: Envelope) -> Result<(), QueueError<Envelope>>;
}

pub trait MessageQueueReaderBehavior: MessageQueueBehavior {
  /// Only ever called by the owning mailbox's run loop; single consumer.
  fn dequeue(&mut self) -> Option<Envelope>;
}

#[derive(Debug, Clone)]
pub enum MessageQueue {
  Unbounded(UnboundedMessageQueue),
  Bounded(BoundedMessageQueue),
  UnboundedDeque(UnboundedDequeMessageQueue),
  BoundedDeque(BoundedDequeMessageQueue),
  UnboundedPriority(UnboundedPriorityMessageQueue),
  BoundedPriority(BoundedPriorityMessageQueue),
  SingleConsumer(SingleConsumerMessageQueue),
}

#[derive(Debug, Clone)]
pub enum MessageQueueWriter {
  Unbounded(UnboundedMessageQueueWriter),
  Bounded(BoundedMessageQueueWriter),
  UnboundedDeque(UnboundedDequeMessageQueueWriter),
  BoundedDeque(BoundedDequeMessageQueueWriter),
  UnboundedPriority(UnboundedPriorityMessageQueueWriter),
  BoundedPriority(BoundedPriorityMessageQueueWriter),
  SingleConsumer(SingleConsumerMessageQueueWriter),
}

#[derive(Debug, Clone)]
pub enum MessageQueueReader {
  Unbounded(UnboundedMessageQueueReader),
  Bounded(BoundedMessageQueueReader),
  UnboundedDeque(UnboundedDequeMessageQueueReader),
  BoundedDeque(BoundedDequeMessageQueueReader),
  UnboundedPriority(UnboundedPriorityMessageQueueReader),
  BoundedPriority(BoundedPriorityMessageQueueReader),
  SingleConsumer(SingleConsumerMessageQueueReader),
}

impl MessageQueue {
  pub fn writer(&self) -> MessageQueueWriter {
    match self {
      MessageQueue::Unbounded(queue) => MessageQueueWriter::Unbounded(queue.writer()),
      MessageQueue::Bounded(queue) => MessageQueueWriter::Bounded(queue.writer()),
      MessageQueue::UnboundedDeque(queue) => MessageQueueWriter::UnboundedDeque(queue.writer()),
      MessageQueue::BoundedDeque(queue) => MessageQueueWriter::BoundedDeque(queue.writer()),
      MessageQueue::UnboundedPriority(queue) => MessageQueueWriter::UnboundedPriority(queue.writer()),
      MessageQueue::BoundedPriority(queue) => MessageQueueWriter::BoundedPriority(queue.writer()),
      MessageQueue::SingleConsumer(queue) => MessageQueueWriter::SingleConsumer(queue.writer()),
    }
  }

  pub fn reader(&self) -> MessageQueueReader {
    match self {
      MessageQueue::Unbounded(queue) => MessageQueueReader::Unbounded(queue.reader()),
      MessageQueue::Bounded(queue) => MessageQueueReader::Bounded(queue.reader()),
      MessageQueue::UnboundedDeque(queue) => MessageQueueReader::UnboundedDeque(queue.reader()),
      MessageQueue::BoundedDeque(queue) => MessageQueueReader::BoundedDeque(queue.reader()),
      MessageQueue::UnboundedPriority(queue) => MessageQueueReader::UnboundedPriority(queue.reader()),
      MessageQueue::BoundedPriority(queue) => MessageQueueReader::BoundedPriority(queue.reader()),
      MessageQueue::SingleConsumer(queue) => MessageQueueReader::SingleConsumer(queue.reader()),
    }
  }

  pub fn supports_enqueue_first(&self) -> bool {
    matches!(self, MessageQueue::UnboundedDeque(_) | MessageQueue::BoundedDeque(_))
  }

  pub fn satisfies(&self, requirement: MailboxRequirement) -> bool {
    match requirement {
      MailboxRequirement::DequeBased => self.supports_enqueue_first(),
      MailboxRequirement::PriorityBased => {
        matches!(self, MessageQueue::UnboundedPriority(_) | MessageQueue::BoundedPriority(_))
      }
      MailboxRequirement::BoundedCapacity => matches!(
        self,
        MessageQueue::Bounded(_) | MessageQueue::BoundedDeque(_) | MessageQueue::BoundedPriority(_)
      ),
    }
  }

  /// Drains every residual envelope into the dead-letter mailbox, addressed
  /// to the owning actor.
  pub fn clean_up(&self, owner: &ActorRef, dead_letters: &DeadLetterMailbox) {
    let mut reader = self.reader();
    while let Some(envelope) = reader.dequeue() {
      dead_letters.enqueue(owner, envelope);
    }
  }
}

impl MessageQueueBehavior for MessageQueue {
  fn number_of_messages(&self) -> MessageQueueSize {
    match self {
      MessageQueue::Unbounded(queue) => queue.number_of_messages(),
      MessageQueue::Bounded(queue) => queue.number_of_messages(),
      MessageQueue::UnboundedDeque(queue) => queue.number_of_messages(),
      MessageQueue::BoundedDeque(queue) => queue.number_of_messages(),
      MessageQueue::UnboundedPriority(queue) => queue.number_of_messages(),
      MessageQueue::BoundedPriority(queue) => queue.number_of_messages(),
      MessageQueue::SingleConsumer(queue) => queue.number_of_messages(),
    }
  }

  fn has_messages(&self) -> bool {
    match self {
      MessageQueue::Unbounded(queue) => queue.has_messages(),
      MessageQueue::Bounded(queue) => queue.has_messages(),
      MessageQueue::UnboundedDeque(queue) => queue.has_messages(),
      MessageQueue::BoundedDeque(queue) => queue.has_messages(),
      MessageQueue::UnboundedPriority(queue) => queue.has_messages(),
      MessageQueue::BoundedPriority(queue) => queue.has_messages(),
      MessageQueue::SingleConsumer(queue) => queue.has_messages(),
    }
  }
}

impl MessageQueueBehavior for MessageQueueWriter {
  fn number_of_messages(&self) -> MessageQueueSize {
    match self {
      MessageQueueWriter::Unbounded(writer) => writer.number_of_messages(),
      MessageQueueWriter::Bounded(writer) => writer.number_of_messages(),
      MessageQueueWriter::UnboundedDeque(writer) => writer.number_of_messages(),
      MessageQueueWriter::BoundedDeque(writer) => writer.number_of_messages(),
      MessageQueueWriter::UnboundedPriority(writer) => writer.number_of_messages(),
      MessageQueueWriter::BoundedPriority(writer) => writer.number_of_messages(),
      MessageQueueWriter::SingleConsumer(writer) => writer.number_of_messages(),
    }
  }

  fn has_messages(&self) -> bool {
    match self {
      MessageQueueWriter::Unbounded(writer) => writer.has_messages(),
      MessageQueueWriter::Bounded(writer) => writer.has_messages(),
      MessageQueueWriter::UnboundedDeque(writer) => writer.has_messages(),
      MessageQueueWriter::BoundedDeque(writer) => writer.has_messages(),
      MessageQueueWriter::UnboundedPriority(writer) => writer.has_messages(),
      MessageQueueWriter::BoundedPriority(writer) => writer.has_messages(),
      MessageQueueWriter::SingleConsumer(writer) => writer.has_messages(),
    }
  }
}

impl MessageQueueWriterBehavior for MessageQueueWriter {
  fn enqueue(&mut self, receiver: &ActorRef, handle: Envelope) -> Result<(), QueueError<Envelope>> {
    match self {
      MessageQueueWriter::Unbounded(writer) => writer.enqueue(receiver, handle),
      MessageQueueWriter::Bounded(writer) => writer.enqueue(receiver, handle),
      MessageQueueWriter::UnboundedDeque(writer) => writer.enqueue(receiver, handle),
      MessageQueueWriter::BoundedDeque(writer) => writer.enqueue(receiver, handle),
      MessageQueueWriter::UnboundedPriority(writer) => writer.enqueue(receiver, handle),
      MessageQueueWriter::BoundedPriority(writer) => writer.enqueue(receiver, handle),
      MessageQueueWriter::SingleConsumer(writer) => writer.enqueue(receiver, handle),
    }
  }
}

impl DequeMessageQueueWriterBehavior for MessageQueueWriter {
  fn enqueue_first(&mut self, receiver: &ActorRef, handle: Envelope) -> Result<(), QueueError<Envelope>> {
    match self {
      MessageQueueWriter::UnboundedDeque(writer) => writer.enqueue_first(receiver, handle),
      MessageQueueWriter::BoundedDeque(writer) => writer.enqueue_first(receiver, handle),
      _ => Err(QueueError::Unsupported(handle)),
    }
  }
}

impl MessageQueueBehavior for MessageQueueReader {
  fn number_of_messages(&self) -> MessageQueueSize {
    match self {
      MessageQueueReader::Unbounded(reader) => reader.number_of_messages(),
      MessageQueueReader::Bounded(reader) => reader.number_of_messages(),
      MessageQueueReader::UnboundedDeque(reader) => reader.number_of_messages(),
      MessageQueueReader::BoundedDeque(reader) => reader.number_of_messages(),
      MessageQueueReader::UnboundedPriority(reader) => reader.number_of_messages(),
      MessageQueueReader::BoundedPriority(reader) => reader.number_of_messages(),
      MessageQueueReader::SingleConsumer(reader) => reader.number_of_messages(),
    }
  }

  fn has_messages(&self) -> bool {
    match self {
      MessageQueueReader::Unbounded(reader) => reader.has_messages(),
      MessageQueueReader::Bounded(reader) => reader.has_messages(),
      MessageQueueReader::UnboundedDeque(reader) => reader.has_messages(),
      MessageQueueReader::BoundedDeque(reader) => reader.has_messages(),
      MessageQueueReader::UnboundedPriority(reader) => reader.has_messages(),
      MessageQueueReader::BoundedPriority(reader) => reader.has_messages(),
      MessageQueueReader::SingleConsumer(reader) => reader.has_messages(),
    }
  }
}

impl MessageQueueReaderBehavior for MessageQueueReader {
  fn dequeue(&mut self) -> Option<Envelope> {
    match self {
      MessageQueueReader::Unbounded(reader) => reader.dequeue(),
      MessageQueueReader::Bounded(reader) => reader.dequeue(),
      MessageQueueReader::UnboundedDeque(reader) => reader.dequeue(),
      MessageQueueReader::BoundedDeque(reader) => reader.dequeue(),
      MessageQueueReader::UnboundedPriority(reader) => reader.dequeue(),
      MessageQueueReader::BoundedPriority(reader) => reader.dequeue(),
      MessageQueueReader::SingleConsumer(reader) => reader.dequeue(),
    }
  }
}
