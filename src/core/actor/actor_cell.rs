use std::fmt::Debug;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::core::actor::actor_ref::ActorRef;
use crate::core::dispatch::envelope::Envelope;
use crate::core::dispatch::mailbox::mailbox_type::MailboxRequirement;
use crate::core::dispatch::system_message::system_message::SystemMessage;

/// Execution contract the mailbox drives. The mailbox never catches errors
/// from `invoke`; they propagate out of the run loop for the dispatcher to
/// turn into supervision events. `system_invoke` is expected to contain
/// non-fatal failures itself and only return errors that must abort the run.
pub trait ActorCellBehavior: Debug + Send {
  fn invoke(&mut self, envelope: &Envelope) -> Result<()>;

  fn system_invoke(&mut self, message: &SystemMessage) -> Result<()>;

  /// Capability the actor demands of its mailbox. Creation fails before any
  /// message is delivered when the configured mailbox type cannot satisfy it.
  fn mailbox_requirement(&self) -> Option<MailboxRequirement> {
    None
  }
}

pub type ActorCellRef = Arc<Mutex<dyn ActorCellBehavior>>;

/// An execution cell together with the identity of the actor it belongs to.
/// Published to the mailbox exactly once, before the first run.
#[derive(Debug, Clone)]
pub struct ActorCellWithRef {
  pub actor_ref: ActorRef,
  pub cell: ActorCellRef,
}

impl ActorCellWithRef {
  pub fn new(actor_ref: ActorRef, cell: ActorCellRef) -> Self {
    Self { actor_ref, cell }
  }
}
