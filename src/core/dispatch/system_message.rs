use std::sync::{Arc, Mutex};

use once_cell::sync::Lazy;

use crate::core::actor::actor_ref::ActorRef;
use crate::core::dispatch::system_message::earliest_first_system_message_list::EarliestFirstSystemMessageList;
use crate::core::dispatch::system_message::latest_first_system_message_list::LatestFirstSystemMessageList;
use crate::core::dispatch::system_message::system_message_entry::SystemMessageEntry;

pub mod earliest_first_system_message_list;
pub mod latest_first_system_message_list;
pub mod system_message;
pub mod system_message_entry;
pub mod system_message_list;

pub trait SystemMessageQueueWriterBehavior {
  /// Precondition: the entry is unlinked. Closed queues divert the entry to
  /// the dead-letter mailbox instead of linking it.
  fn system_enqueue(&mut self, receiver: &ActorRef, message: &Arc<Mutex<SystemMessageEntry>>);
}

pub trait SystemMessageQueueReaderBehavior {
  fn has_system_messages(&self) -> bool;

  /// Swaps the queue content for `new_contents` and returns the old batch in
  /// delivery order. The caller becomes sole owner of the returned list.
  fn system_drain(&mut self, new_contents: &LatestFirstSystemMessageList) -> EarliestFirstSystemMessageList;
}

/// The shared empty lists. Draining against `LNIL` leaves the queue open;
/// draining against a sentinel list closes it.
pub static LNIL: Lazy<LatestFirstSystemMessageList> = Lazy::new(|| LatestFirstSystemMessageList::new(None));

pub static ENIL: Lazy<EarliestFirstSystemMessageList> = Lazy::new(|| EarliestFirstSystemMessageList::new(None));

pub(crate) fn size_inner(head: Option<&Arc<Mutex<SystemMessageEntry>>>, mut acc: usize) -> usize {
  let mut current = head.cloned();
  while let Some(entry_arc) = current {
    acc += 1;
    let next = {
      let entry = entry_arc.lock().unwrap();
      entry.next().cloned()
    };
    current = next;
  }
  acc
}

pub(crate) fn reverse_inner(head: Option<Arc<Mutex<SystemMessageEntry>>>) -> Option<Arc<Mutex<SystemMessageEntry>>> {
  let mut acc: Option<Arc<Mutex<SystemMessageEntry>>> = None;
  let mut current = head;
  while let Some(entry_arc) = current {
    let next = {
      let mut entry = entry_arc.lock().unwrap();
      let next = entry.next().cloned();
      entry.set_next(acc.take());
      next
    };
    acc = Some(entry_arc);
    current = next;
  }
  acc
}
