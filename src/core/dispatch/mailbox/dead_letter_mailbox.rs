use std::sync::{Arc, Mutex};

use crate::core::actor::actor_ref::ActorRef;
use crate::core::dispatch::envelope::Envelope;
use crate::core::dispatch::mailbox::dead_letter::DeadLetter;
use crate::core::dispatch::mailbox::mailbox::Mailbox;
use crate::core::dispatch::mailbox::MailboxBehavior;
use crate::core::dispatch::message_queue::MessageQueueSize;
use crate::core::dispatch::system_message::earliest_first_system_message_list::EarliestFirstSystemMessageList;
use crate::core::dispatch::system_message::latest_first_system_message_list::LatestFirstSystemMessageList;
use crate::core::dispatch::system_message::system_message_entry::SystemMessageEntry;
use crate::core::dispatch::system_message::{SystemMessageQueueReaderBehavior, SystemMessageQueueWriterBehavior};

/// Terminal sink for undeliverable traffic. User messages are wrapped into
/// [`DeadLetter`] records on its own user queue; system messages are made
/// virgin again and linked onto its own system queue, which never closes.
/// Nothing here ever calls back into the mailbox the message came from.
#[derive(Debug, Clone)]
pub struct DeadLetterMailbox {
  dead_letters: ActorRef,
  underlying: Mailbox,
}

impl DeadLetterMailbox {
  pub fn new(dead_letters: ActorRef) -> Self {
    Self {
      dead_letters,
      underlying: Mailbox::of_dead_letters(),
    }
  }

  pub fn dead_letters(&self) -> &ActorRef {
    &self.dead_letters
  }

  pub fn underlying(&self) -> &Mailbox {
    &self.underlying
  }

  pub fn enqueue(&self, receiver: &ActorRef, handle: Envelope) {
    let sender = handle.sender().cloned().unwrap_or(ActorRef::NoSender);
    let dead_letter = DeadLetter::new(handle.message().clone(), sender, receiver.clone());
    log::info!("dead letter: {:?}", dead_letter);
    if let Err(error) = self.underlying.enqueue(receiver, Envelope::new(dead_letter)) {
      log::error!("failed to append to the dead-letter queue: {:?}", error);
    }
  }

  pub fn system_enqueue(&self, receiver: &ActorRef, message: &Arc<Mutex<SystemMessageEntry>>) {
    {
      message.lock().unwrap().unlink();
    }
    log::info!("dead system message for {:?}", receiver);
    if !self.underlying.system_mailbox().system_enqueue(message) {
      log::error!("the dead-letter system queue rejected a message for {:?}", receiver);
    }
  }
}

impl MailboxBehavior for DeadLetterMailbox {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.underlying.number_of_messages()
  }

  fn has_messages(&self) -> bool {
    self.underlying.has_messages()
  }
}

impl SystemMessageQueueReaderBehavior for DeadLetterMailbox {
  fn has_system_messages(&self) -> bool {
    self.underlying.system_mailbox().has_system_messages()
  }

  fn system_drain(&mut self, new_contents: &LatestFirstSystemMessageList) -> EarliestFirstSystemMessageList {
    self.underlying.system_mailbox().system_drain(new_contents)
  }
}

impl SystemMessageQueueWriterBehavior for DeadLetterMailbox {
  fn system_enqueue(&mut self, receiver: &ActorRef, message: &Arc<Mutex<SystemMessageEntry>>) {
    DeadLetterMailbox::system_enqueue(self, receiver, message)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::core::actor::actor_path::ActorPath;
  use crate::core::dispatch::system_message::system_message::SystemMessage;
  use crate::core::dispatch::system_message::system_message_list::SystemMessageList;
  use crate::core::dispatch::system_message::LNIL;

  #[test]
  fn test_enqueue_wraps_into_dead_letter_records() {
    let dead_letter_mailbox = DeadLetterMailbox::new(ActorRef::of_local(ActorPath::new("system/deadLetters")));
    let receiver = ActorRef::of_local(ActorPath::new("user/receiver"));

    dead_letter_mailbox.enqueue(&receiver, Envelope::new("lost".to_string()));

    let envelope = dead_letter_mailbox.underlying().dequeue().unwrap();
    let dead_letter = envelope.typed_message::<DeadLetter>().unwrap();
    assert_eq!(dead_letter.recipient(), &receiver);
    assert_eq!(dead_letter.message().take::<String>().unwrap(), "lost");
  }

  #[test]
  fn test_system_enqueue_relinks_a_virgin_entry() {
    let dead_letter_mailbox = DeadLetterMailbox::new(ActorRef::of_local(ActorPath::new("system/deadLetters")));
    let receiver = ActorRef::of_local(ActorPath::new("user/receiver"));

    let entry = SystemMessageEntry::of_arc(SystemMessage::of_terminate());
    {
      // simulate a leftover still linked to a drained chain
      entry
        .lock()
        .unwrap()
        .set_next(Some(SystemMessageEntry::of_arc(SystemMessage::of_suspend())));
    }
    dead_letter_mailbox.system_enqueue(&receiver, &entry);

    let mut sink = dead_letter_mailbox.clone();
    let drained = SystemMessageQueueReaderBehavior::system_drain(&mut sink, &LNIL);
    assert_eq!(drained.size(), 1);
    let (head, _) = drained.head_with_tail().unwrap();
    assert_eq!(head.lock().unwrap().message, SystemMessage::of_terminate());
  }
}
