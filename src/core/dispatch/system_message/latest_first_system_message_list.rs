use std::sync::{Arc, Mutex};

use crate::core::dispatch::system_message::earliest_first_system_message_list::EarliestFirstSystemMessageList;
use crate::core::dispatch::system_message::system_message::SystemMessage;
use crate::core::dispatch::system_message::system_message_entry::SystemMessageEntry;
use crate::core::dispatch::system_message::system_message_list::SystemMessageList;
use crate::core::dispatch::system_message::{reverse_inner, size_inner};

/// List view in LIFO insertion order, the shape produced by enqueueing.
#[derive(Debug, Clone)]
pub struct LatestFirstSystemMessageList {
  pub(crate) head: Option<Arc<Mutex<SystemMessageEntry>>>,
}

impl LatestFirstSystemMessageList {
  pub fn new(head: Option<Arc<Mutex<SystemMessageEntry>>>) -> Self {
    Self { head }
  }

  /// Single-element list holding the closed-queue sentinel.
  pub fn of_no_message() -> Self {
    Self {
      head: Some(SystemMessageEntry::of_arc(SystemMessage::of_no_message())),
    }
  }

  /// True when the head is the sentinel, i.e. the owning queue is closed.
  pub fn is_closed(&self) -> bool {
    self
      .head
      .as_ref()
      .map(|entry| entry.lock().unwrap().is_no_message())
      .unwrap_or(false)
  }
}

impl PartialEq for LatestFirstSystemMessageList {
  fn eq(&self, other: &Self) -> bool {
    match (&self.head, &other.head) {
      (Some(left), Some(right)) => Arc::ptr_eq(left, right),
      (None, None) => true,
      _ => false,
    }
  }
}

impl SystemMessageList for LatestFirstSystemMessageList {
  type Other = EarliestFirstSystemMessageList;

  fn is_empty(&self) -> bool {
    self.head.is_none()
  }

  fn size(&self) -> usize {
    size_inner(self.head.as_ref(), 0)
  }

  fn head(&self) -> Option<&Arc<Mutex<SystemMessageEntry>>> {
    self.head.as_ref()
  }

  fn tail(&self) -> LatestFirstSystemMessageList {
    let next = self.head.as_ref().and_then(|entry_arc| {
      let entry = entry_arc.lock().unwrap();
      entry.next().cloned()
    });
    LatestFirstSystemMessageList { head: next }
  }

  fn prepend(self, entry: Arc<Mutex<SystemMessageEntry>>) -> LatestFirstSystemMessageList {
    {
      let mut entry_guard = entry.lock().unwrap();
      entry_guard.set_next(self.head);
    }
    LatestFirstSystemMessageList { head: Some(entry) }
  }

  fn reverse(self) -> EarliestFirstSystemMessageList {
    EarliestFirstSystemMessageList {
      head: reverse_inner(self.head),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_prepend_and_reverse_restores_enqueue_order() {
    let mut list = LatestFirstSystemMessageList::new(None);
    list = list.prepend(SystemMessageEntry::of_arc(SystemMessage::of_create()));
    list = list.prepend(SystemMessageEntry::of_arc(SystemMessage::of_suspend()));
    list = list.prepend(SystemMessageEntry::of_arc(SystemMessage::of_terminate()));
    assert_eq!(list.size(), 3);

    let earliest_first = list.reverse();
    let (first, rest) = earliest_first.head_with_tail().unwrap();
    assert_eq!(first.lock().unwrap().message, SystemMessage::of_create());
    let (second, rest) = rest.head_with_tail().unwrap();
    assert_eq!(second.lock().unwrap().message, SystemMessage::of_suspend());
    let (third, rest) = rest.head_with_tail().unwrap();
    assert_eq!(third.lock().unwrap().message, SystemMessage::of_terminate());
    assert!(rest.is_empty());
  }

  #[test]
  fn test_sentinel_list_is_closed() {
    assert!(LatestFirstSystemMessageList::of_no_message().is_closed());
    assert!(!LatestFirstSystemMessageList::new(None).is_closed());
  }
}
