use crate::core::actor::actor_ref::ActorRef;
use crate::core::dispatch::any_message::AnyMessage;
use crate::core::dispatch::message::Message;

/// Record of a message that could not be delivered: the payload plus the
/// sender and the intended recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadLetter {
  message: AnyMessage,
  sender: ActorRef,
  recipient: ActorRef,
}

impl DeadLetter {
  pub fn new(message: AnyMessage, sender: ActorRef, recipient: ActorRef) -> Self {
    Self {
      message,
      sender,
      recipient,
    }
  }

  pub fn message(&self) -> &AnyMessage {
    &self.message
  }

  pub fn sender(&self) -> &ActorRef {
    &self.sender
  }

  pub fn recipient(&self) -> &ActorRef {
    &self.recipient
  }
}

impl Message for DeadLetter {}
