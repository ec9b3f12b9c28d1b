use std::fmt::{Debug, Formatter};
use std::sync::Arc;
use std::time::Duration;

use crate::core::dispatch::envelope::Envelope;
use crate::core::dispatch::message_queue::bounded_message_queue::BoundedMessageQueue;
use crate::core::dispatch::message_queue::deque_message_queue::{BoundedDequeMessageQueue, UnboundedDequeMessageQueue};
use crate::core::dispatch::message_queue::priority_message_queue::{
  BoundedPriorityMessageQueue, UnboundedPriorityMessageQueue,
};
use crate::core::dispatch::message_queue::single_consumer_message_queue::SingleConsumerMessageQueue;
use crate::core::dispatch::message_queue::unbounded_message_queue::UnboundedMessageQueue;
use crate::core::dispatch::message_queue::MessageQueue;
use crate::infrastructure::queue::Comparator;

/// Capability an actor type may demand of its mailbox. Checked at creation
/// time, before any message can be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxRequirement {
  DequeBased,
  PriorityBased,
  BoundedCapacity,
}

/// Blueprint for the user message queue of one mailbox.
#[derive(Clone)]
pub enum MailboxType {
  Unbounded,
  Bounded {
    capacity: usize,
    push_timeout: Duration,
  },
  UnboundedDeque,
  BoundedDeque {
    capacity: usize,
    push_timeout: Duration,
  },
  UnboundedPriority {
    comparator: Comparator<Envelope>,
  },
  BoundedPriority {
    capacity: usize,
    push_timeout: Duration,
    comparator: Comparator<Envelope>,
  },
  SingleConsumerUnbounded,
}

impl MailboxType {
  pub fn of_unbounded() -> Self {
    MailboxType::Unbounded
  }

  /// A push timeout of zero means producers block until space is available.
  pub fn of_bounded(capacity: usize, push_timeout: Duration) -> Self {
    MailboxType::Bounded { capacity, push_timeout }
  }

  pub fn of_unbounded_deque() -> Self {
    MailboxType::UnboundedDeque
  }

  pub fn of_bounded_deque(capacity: usize, push_timeout: Duration) -> Self {
    MailboxType::BoundedDeque { capacity, push_timeout }
  }

  pub fn of_unbounded_priority(comparator: Comparator<Envelope>) -> Self {
    MailboxType::UnboundedPriority { comparator }
  }

  pub fn of_bounded_priority(capacity: usize, push_timeout: Duration, comparator: Comparator<Envelope>) -> Self {
    MailboxType::BoundedPriority {
      capacity,
      push_timeout,
      comparator,
    }
  }

  pub fn of_single_consumer_unbounded() -> Self {
    MailboxType::SingleConsumerUnbounded
  }

  pub fn name(&self) -> &'static str {
    match self {
      MailboxType::Unbounded => "unbounded",
      MailboxType::Bounded { .. } => "bounded",
      MailboxType::UnboundedDeque => "unbounded-deque",
      MailboxType::BoundedDeque { .. } => "bounded-deque",
      MailboxType::UnboundedPriority { .. } => "unbounded-priority",
      MailboxType::BoundedPriority { .. } => "bounded-priority",
      MailboxType::SingleConsumerUnbounded => "single-consumer-unbounded",
    }
  }

  pub fn satisfies(&self, requirement: MailboxRequirement) -> bool {
    match requirement {
      MailboxRequirement::DequeBased => {
        matches!(self, MailboxType::UnboundedDeque | MailboxType::BoundedDeque { .. })
      }
      MailboxRequirement::PriorityBased => matches!(
        self,
        MailboxType::UnboundedPriority { .. } | MailboxType::BoundedPriority { .. }
      ),
      MailboxRequirement::BoundedCapacity => matches!(
        self,
        MailboxType::Bounded { .. } | MailboxType::BoundedDeque { .. } | MailboxType::BoundedPriority { .. }
      ),
    }
  }

  pub fn create_message_queue(&self) -> MessageQueue {
    match self {
      MailboxType::Unbounded => MessageQueue::Unbounded(UnboundedMessageQueue::of_vec()),
      MailboxType::Bounded { capacity, push_timeout } => {
        MessageQueue::Bounded(BoundedMessageQueue::of_vec_with_capacity(*capacity, *push_timeout))
      }
      MailboxType::UnboundedDeque => MessageQueue::UnboundedDeque(UnboundedDequeMessageQueue::of_vec()),
      MailboxType::BoundedDeque { capacity, push_timeout } => {
        MessageQueue::BoundedDeque(BoundedDequeMessageQueue::of_vec_with_capacity(*capacity, *push_timeout))
      }
      MailboxType::UnboundedPriority { comparator } => {
        MessageQueue::UnboundedPriority(UnboundedPriorityMessageQueue::of_heap(comparator.clone()))
      }
      MailboxType::BoundedPriority {
        capacity,
        push_timeout,
        comparator,
      } => MessageQueue::BoundedPriority(BoundedPriorityMessageQueue::of_heap_with_capacity(
        comparator.clone(),
        *capacity,
        *push_timeout,
      )),
      MailboxType::SingleConsumerUnbounded => MessageQueue::SingleConsumer(SingleConsumerMessageQueue::of_mpsc()),
    }
  }
}

impl Debug for MailboxType {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      MailboxType::Bounded { capacity, push_timeout } | MailboxType::BoundedDeque { capacity, push_timeout } => f
        .debug_struct(self.name())
        .field("capacity", capacity)
        .field("push_timeout", push_timeout)
        .finish(),
      MailboxType::BoundedPriority {
        capacity, push_timeout, ..
      } => f
        .debug_struct(self.name())
        .field("capacity", capacity)
        .field("push_timeout", push_timeout)
        .finish(),
      _ => write!(f, "{}", self.name()),
    }
  }
}

impl PartialEq for MailboxType {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (MailboxType::Unbounded, MailboxType::Unbounded) => true,
      (MailboxType::UnboundedDeque, MailboxType::UnboundedDeque) => true,
      (MailboxType::SingleConsumerUnbounded, MailboxType::SingleConsumerUnbounded) => true,
      (
        MailboxType::Bounded {
          capacity: left_capacity,
          push_timeout: left_timeout,
        },
        MailboxType::Bounded {
          capacity: right_capacity,
          push_timeout: right_timeout,
        },
      )
      | (
        MailboxType::BoundedDeque {
          capacity: left_capacity,
          push_timeout: left_timeout,
        },
        MailboxType::BoundedDeque {
          capacity: right_capacity,
          push_timeout: right_timeout,
        },
      ) => left_capacity == right_capacity && left_timeout == right_timeout,
      (
        MailboxType::UnboundedPriority { comparator: left },
        MailboxType::UnboundedPriority { comparator: right },
      ) => Arc::ptr_eq(left, right),
      (
        MailboxType::BoundedPriority {
          capacity: left_capacity,
          push_timeout: left_timeout,
          comparator: left,
        },
        MailboxType::BoundedPriority {
          capacity: right_capacity,
          push_timeout: right_timeout,
          comparator: right,
        },
      ) => left_capacity == right_capacity && left_timeout == right_timeout && Arc::ptr_eq(left, right),
      _ => false,
    }
  }
}
