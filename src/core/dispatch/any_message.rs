use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use thiserror::Error;

use crate::core::dispatch::message::Message;

/// Type-erased message payload. The mailbox moves these around without ever
/// looking inside; consumers recover the concrete type with [`AnyMessage::take`].
#[derive(Clone)]
pub struct AnyMessage {
  message: Arc<dyn Any + Send + Sync>,
  type_name: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot downcast a message of type `{actual}` into `{expected}`")]
pub struct DowncastAnyMessageError {
  pub expected: &'static str,
  pub actual: &'static str,
}

impl AnyMessage {
  pub fn new<T: Message>(message: T) -> Self {
    Self {
      message: Arc::new(message),
      type_name: std::any::type_name::<T>(),
    }
  }

  pub fn is<T: Message>(&self) -> bool {
    self.message.is::<T>()
  }

  pub fn take<T: Message + Clone>(&self) -> Result<T, DowncastAnyMessageError> {
    self
      .message
      .downcast_ref::<T>()
      .cloned()
      .ok_or(DowncastAnyMessageError {
        expected: std::any::type_name::<T>(),
        actual: self.type_name,
      })
  }

  pub fn type_name(&self) -> &'static str {
    self.type_name
  }
}

impl Debug for AnyMessage {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "AnyMessage({})", self.type_name)
  }
}

impl PartialEq for AnyMessage {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.message, &other.message)
  }
}
