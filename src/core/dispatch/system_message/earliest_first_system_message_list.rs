use std::sync::{Arc, Mutex};

use crate::core::dispatch::system_message::latest_first_system_message_list::LatestFirstSystemMessageList;
use crate::core::dispatch::system_message::system_message_entry::SystemMessageEntry;
use crate::core::dispatch::system_message::system_message_list::SystemMessageList;
use crate::core::dispatch::system_message::{reverse_inner, size_inner};

/// List view in delivery order, produced by reversing a drained batch.
#[derive(Debug, Clone)]
pub struct EarliestFirstSystemMessageList {
  pub(crate) head: Option<Arc<Mutex<SystemMessageEntry>>>,
}

impl EarliestFirstSystemMessageList {
  pub fn new(head: Option<Arc<Mutex<SystemMessageEntry>>>) -> Self {
    Self { head }
  }

  /// Splits off the first entry, leaving the caller sole owner of both parts.
  pub fn head_with_tail(&self) -> Option<(Arc<Mutex<SystemMessageEntry>>, EarliestFirstSystemMessageList)> {
    self.head.as_ref().map(|entry_arc| {
      let next = {
        let entry = entry_arc.lock().unwrap();
        entry.next().cloned()
      };
      (entry_arc.clone(), EarliestFirstSystemMessageList { head: next })
    })
  }
}

impl PartialEq for EarliestFirstSystemMessageList {
  fn eq(&self, other: &Self) -> bool {
    match (&self.head, &other.head) {
      (Some(left), Some(right)) => Arc::ptr_eq(left, right),
      (None, None) => true,
      _ => false,
    }
  }
}

impl SystemMessageList for EarliestFirstSystemMessageList {
  type Other = LatestFirstSystemMessageList;

  fn is_empty(&self) -> bool {
    self.head.is_none()
  }

  fn size(&self) -> usize {
    size_inner(self.head.as_ref(), 0)
  }

  fn head(&self) -> Option<&Arc<Mutex<SystemMessageEntry>>> {
    self.head.as_ref()
  }

  fn tail(&self) -> EarliestFirstSystemMessageList {
    let next = self.head.as_ref().and_then(|entry_arc| {
      let entry = entry_arc.lock().unwrap();
      entry.next().cloned()
    });
    EarliestFirstSystemMessageList { head: next }
  }

  fn prepend(self, entry: Arc<Mutex<SystemMessageEntry>>) -> EarliestFirstSystemMessageList {
    {
      let mut entry_guard = entry.lock().unwrap();
      entry_guard.set_next(self.head);
    }
    EarliestFirstSystemMessageList { head: Some(entry) }
  }

  fn reverse(self) -> LatestFirstSystemMessageList {
    LatestFirstSystemMessageList {
      head: reverse_inner(self.head),
    }
  }
}
