use crate::core::actor::actor_ref::ActorRef;
use crate::core::dispatch::any_message::{AnyMessage, DowncastAnyMessageError};
use crate::core::dispatch::message::Message;
use crate::infrastructure::queue::Element;

/// Pair of an opaque message and the sender it came from. The mailbox neither
/// inspects nor mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
  message: AnyMessage,
  sender: Option<ActorRef>,
}

impl Envelope {
  pub fn new<T: Message>(message: T) -> Self {
    Self {
      message: AnyMessage::new(message),
      sender: None,
    }
  }

  pub fn new_with_sender<T: Message>(message: T, sender: ActorRef) -> Self {
    Self {
      message: AnyMessage::new(message),
      sender: Some(sender),
    }
  }

  pub fn message(&self) -> &AnyMessage {
    &self.message
  }

  pub fn typed_message<T: Message + Clone>(&self) -> Result<T, DowncastAnyMessageError> {
    self.message.take::<T>()
  }

  pub fn sender(&self) -> Option<&ActorRef> {
    self.sender.as_ref()
  }
}

impl Element for Envelope {}
