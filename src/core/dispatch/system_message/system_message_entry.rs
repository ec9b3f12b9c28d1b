use std::sync::{Arc, Mutex};

use crate::core::dispatch::system_message::system_message::SystemMessage;

/// Intrusive list node around a [`SystemMessage`]. An entry is "virgin" while
/// its `next` link is clear; it must be virgin before it is enqueued anywhere
/// and is made virgin again when it is consumed or re-routed.
#[derive(Debug, Clone)]
pub struct SystemMessageEntry {
  pub message: SystemMessage,
  next: Option<Arc<Mutex<SystemMessageEntry>>>,
}

impl PartialEq for SystemMessageEntry {
  fn eq(&self, other: &Self) -> bool {
    self.message == other.message
      && match (self.next.as_ref(), other.next.as_ref()) {
        (Some(left), Some(right)) => Arc::ptr_eq(left, right),
        (None, None) => true,
        _ => false,
      }
  }
}

impl SystemMessageEntry {
  pub fn new(message: SystemMessage) -> Self {
    Self { message, next: None }
  }

  pub fn of_arc(message: SystemMessage) -> Arc<Mutex<SystemMessageEntry>> {
    Arc::new(Mutex::new(Self::new(message)))
  }

  pub fn next(&self) -> Option<&Arc<Mutex<SystemMessageEntry>>> {
    self.next.as_ref()
  }

  pub fn set_next(&mut self, next: Option<Arc<Mutex<SystemMessageEntry>>>) {
    self.next = next;
  }

  pub fn unlink(&mut self) {
    self.set_next(None);
  }

  pub fn is_unlinked(&self) -> bool {
    self.next.is_none()
  }

  pub fn is_no_message(&self) -> bool {
    self.message.is_no_message()
  }
}
