use crate::core::dispatch::message_queue::MessageQueueSize;

pub mod dead_letter;
pub mod dead_letter_mailbox;
pub mod mailbox;
pub mod mailbox_status;
pub mod mailbox_type;
pub mod system_mailbox;

pub trait MailboxBehavior {
  fn number_of_messages(&self) -> MessageQueueSize;
  fn has_messages(&self) -> bool;
}
