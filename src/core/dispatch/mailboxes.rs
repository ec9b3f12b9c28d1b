use anyhow::Result;
use dashmap::DashMap;
use std::sync::Arc;

use crate::core::actor::actor_cell::ActorCellRef;
use crate::core::actor::actor_path::ActorPath;
use crate::core::actor::actor_ref::ActorRef;
use crate::core::dispatch::mailbox::dead_letter_mailbox::DeadLetterMailbox;
use crate::core::dispatch::mailbox::mailbox::Mailbox;
use crate::core::dispatch::mailbox::mailbox_type::MailboxType;
use crate::core::dispatch::message_queue::MessageQueue;

#[derive(Debug)]
struct MailboxesInner {
  dead_letter_mailbox: DeadLetterMailbox,
  mailboxes: DashMap<ActorPath, Mailbox>,
}

/// Per-actor-system mailbox factory and registry. Owns the dead-letter
/// mailbox every created mailbox diverts to.
#[derive(Debug, Clone)]
pub struct Mailboxes {
  inner: Arc<MailboxesInner>,
}

impl Mailboxes {
  pub fn new(dead_letters: ActorRef) -> Self {
    Self {
      inner: Arc::new(MailboxesInner {
        dead_letter_mailbox: DeadLetterMailbox::new(dead_letters),
        mailboxes: DashMap::new(),
      }),
    }
  }

  pub fn dead_letter_mailbox(&self) -> DeadLetterMailbox {
    self.inner.dead_letter_mailbox.clone()
  }

  /// Builds and registers the mailbox for a new actor. Fails before any
  /// message can be delivered when the cell declares a mailbox requirement
  /// the configured type cannot satisfy.
  pub fn create_mailbox(&self, owner: ActorRef, cell: ActorCellRef, mailbox_type: MailboxType) -> Result<Mailbox> {
    let requirement_opt = { cell.lock().unwrap().mailbox_requirement() };
    if let Some(requirement) = requirement_opt {
      if !mailbox_type.satisfies(requirement) {
        return Err(
          crate::CourierError::RequirementNotSatisfied {
            mailbox_type: mailbox_type.name().to_string(),
            requirement,
          }
          .into(),
        );
      }
    }
    let message_queue: MessageQueue = mailbox_type.create_message_queue();
    let mailbox = Mailbox::new_with_message_queue(mailbox_type, message_queue, Some(self.dead_letter_mailbox()));
    mailbox.set_actor(owner.clone(), cell);
    if let Some(path) = owner.path() {
      self.inner.mailboxes.insert(path.clone(), mailbox.clone());
    }
    Ok(mailbox)
  }

  pub fn lookup(&self, path: &ActorPath) -> Option<Mailbox> {
    self.inner.mailboxes.get(path).map(|entry| entry.value().clone())
  }

  /// Removes the actor's mailbox, closes it, and drains everything left to
  /// dead letters.
  pub fn unregister(&self, path: &ActorPath) {
    if let Some((_, mailbox)) = self.inner.mailboxes.remove(path) {
      mailbox.become_closed();
      mailbox.clean_up();
    }
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Mutex;

  use super::*;
  use crate::core::actor::actor_cell::ActorCellBehavior;
  use crate::core::dispatch::envelope::Envelope;
  use crate::core::dispatch::mailbox::mailbox_type::MailboxRequirement;
  use crate::core::dispatch::mailbox::MailboxBehavior;
  use crate::core::dispatch::system_message::system_message::SystemMessage;
  use crate::CourierError;

  #[derive(Debug)]
  struct RequiringCell {
    requirement: Option<MailboxRequirement>,
  }

  impl ActorCellBehavior for RequiringCell {
    fn invoke(&mut self, _envelope: &Envelope) -> Result<()> {
      Ok(())
    }

    fn system_invoke(&mut self, _message: &SystemMessage) -> Result<()> {
      Ok(())
    }

    fn mailbox_requirement(&self) -> Option<MailboxRequirement> {
      self.requirement
    }
  }

  fn cell_with(requirement: Option<MailboxRequirement>) -> ActorCellRef {
    Arc::new(Mutex::new(RequiringCell { requirement }))
  }

  #[test]
  fn test_create_mailbox_registers_by_path() {
    let mailboxes = Mailboxes::new(ActorRef::of_local(ActorPath::new("system/deadLetters")));
    let owner = ActorRef::of_local(ActorPath::new("user/worker"));

    let mailbox = mailboxes
      .create_mailbox(owner.clone(), cell_with(None), MailboxType::of_unbounded())
      .unwrap();

    let found = mailboxes.lookup(owner.path().unwrap()).unwrap();
    assert_eq!(found, mailbox);
  }

  #[test]
  fn test_unsatisfied_requirement_fails_creation() {
    let mailboxes = Mailboxes::new(ActorRef::of_local(ActorPath::new("system/deadLetters")));
    let owner = ActorRef::of_local(ActorPath::new("user/stasher"));

    let result = mailboxes.create_mailbox(
      owner,
      cell_with(Some(MailboxRequirement::DequeBased)),
      MailboxType::of_unbounded(),
    );
    let error = result.unwrap_err().downcast::<CourierError>().unwrap();
    assert!(matches!(error, CourierError::RequirementNotSatisfied { .. }));
  }

  #[test]
  fn test_satisfied_requirement_creates_the_mailbox() {
    let mailboxes = Mailboxes::new(ActorRef::of_local(ActorPath::new("system/deadLetters")));
    let owner = ActorRef::of_local(ActorPath::new("user/stasher"));

    let mailbox = mailboxes
      .create_mailbox(
        owner,
        cell_with(Some(MailboxRequirement::DequeBased)),
        MailboxType::of_unbounded_deque(),
      )
      .unwrap();
    assert_eq!(mailbox.mailbox_type().name(), "unbounded-deque");
  }

  #[test]
  fn test_unregister_closes_and_cleans_up() {
    let mailboxes = Mailboxes::new(ActorRef::of_local(ActorPath::new("system/deadLetters")));
    let owner = ActorRef::of_local(ActorPath::new("user/worker"));
    let path = owner.path().unwrap().clone();

    let mailbox = mailboxes
      .create_mailbox(owner.clone(), cell_with(None), MailboxType::of_unbounded())
      .unwrap();
    mailbox.enqueue(&owner, Envelope::new(1u32)).unwrap();

    mailboxes.unregister(&path);
    assert!(mailboxes.lookup(&path).is_none());
    assert!(mailbox.is_closed());
    assert!(mailboxes.dead_letter_mailbox().has_messages());
  }
}
