use std::sync::{Arc, Mutex};

use crate::core::dispatch::system_message::earliest_first_system_message_list::EarliestFirstSystemMessageList;
use crate::core::dispatch::system_message::latest_first_system_message_list::LatestFirstSystemMessageList;
use crate::core::dispatch::system_message::system_message_entry::SystemMessageEntry;
use crate::core::dispatch::system_message::system_message_list::SystemMessageList;

/// Head of the intrusive system-message LIFO.
///
/// The head is replaced through `system_queue_put`, a compare-and-set keyed on
/// the identity of the expected head node; enqueue and drain retry on failure.
/// Once a drain installs the `NoMessage` sentinel the queue is closed for good
/// and enqueues report rejection so the caller can divert to dead letters.
#[derive(Debug, Clone)]
pub struct SystemMailbox {
  head: Arc<Mutex<LatestFirstSystemMessageList>>,
}

impl SystemMailbox {
  pub fn new() -> Self {
    Self {
      head: Arc::new(Mutex::new(LatestFirstSystemMessageList::new(None))),
    }
  }

  fn system_queue_get(&self) -> LatestFirstSystemMessageList {
    self.head.lock().unwrap().clone()
  }

  fn system_queue_put(&self, old: &LatestFirstSystemMessageList, new: &LatestFirstSystemMessageList) -> bool {
    let mut head = self.head.lock().unwrap();
    if *head == *old {
      *head = new.clone();
      true
    } else {
      false
    }
  }

  /// Links the entry as the new head. Returns `false` when the queue is
  /// closed; the entry is then still unlinked and owned by the caller.
  pub fn system_enqueue(&self, entry: &Arc<Mutex<SystemMessageEntry>>) -> bool {
    loop {
      let current_list = self.system_queue_get();
      if current_list.is_closed() {
        return false;
      }
      let new_list = current_list.clone().prepend(entry.clone());
      if self.system_queue_put(&current_list, &new_list) {
        return true;
      }
      entry.lock().unwrap().unlink();
    }
  }

  /// Swaps the whole chain for `new_contents` and returns the old chain in
  /// delivery order. Draining a closed queue yields the empty list.
  pub fn system_drain(&self, new_contents: &LatestFirstSystemMessageList) -> EarliestFirstSystemMessageList {
    loop {
      let current_list = self.system_queue_get();
      if current_list.is_closed() {
        return EarliestFirstSystemMessageList::new(None);
      }
      if self.system_queue_put(&current_list, new_contents) {
        return current_list.reverse();
      }
    }
  }

  pub fn has_system_messages(&self) -> bool {
    let current_list = self.system_queue_get();
    current_list
      .head()
      .map(|entry| !entry.lock().unwrap().is_no_message())
      .unwrap_or(false)
  }
}

impl Default for SystemMailbox {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use std::thread;

  use super::*;
  use crate::core::actor::actor_ref::ActorRef;
  use crate::core::dispatch::system_message::system_message::SystemMessage;
  use crate::core::dispatch::system_message::LNIL;

  #[test]
  fn test_drain_returns_enqueue_order() {
    let system_mailbox = SystemMailbox::new();
    system_mailbox.system_enqueue(&SystemMessageEntry::of_arc(SystemMessage::of_create()));
    system_mailbox.system_enqueue(&SystemMessageEntry::of_arc(SystemMessage::of_suspend()));
    system_mailbox.system_enqueue(&SystemMessageEntry::of_arc(SystemMessage::of_terminate()));
    assert!(system_mailbox.has_system_messages());

    let drained = system_mailbox.system_drain(&LNIL);
    let mut messages = Vec::new();
    let mut current = drained;
    while let Some((entry, rest)) = current.head_with_tail() {
      messages.push(entry.lock().unwrap().message.clone());
      current = rest;
    }
    assert_eq!(
      messages,
      vec![
        SystemMessage::of_create(),
        SystemMessage::of_suspend(),
        SystemMessage::of_terminate()
      ]
    );
    assert!(!system_mailbox.has_system_messages());
  }

  #[test]
  fn test_enqueue_after_sentinel_drain_is_rejected() {
    let system_mailbox = SystemMailbox::new();
    system_mailbox.system_enqueue(&SystemMessageEntry::of_arc(SystemMessage::of_watch(
      ActorRef::NoSender,
      ActorRef::NoSender,
    )));

    let drained = system_mailbox.system_drain(&LatestFirstSystemMessageList::of_no_message());
    assert_eq!(drained.size(), 1);
    assert!(!system_mailbox.has_system_messages());

    let entry = SystemMessageEntry::of_arc(SystemMessage::of_terminate());
    assert!(!system_mailbox.system_enqueue(&entry));
    assert!(entry.lock().unwrap().is_unlinked());
  }

  #[test]
  fn test_concurrent_enqueues_are_all_drained() {
    let system_mailbox = SystemMailbox::new();

    let producers: Vec<_> = (0..4)
      .map(|_| {
        let system_mailbox = system_mailbox.clone();
        thread::spawn(move || {
          for _ in 0..50 {
            system_mailbox.system_enqueue(&SystemMessageEntry::of_arc(SystemMessage::of_suspend()));
          }
        })
      })
      .collect();

    for producer in producers {
      producer.join().unwrap();
    }

    let drained = system_mailbox.system_drain(&LNIL);
    assert_eq!(drained.size(), 200);
  }
}
