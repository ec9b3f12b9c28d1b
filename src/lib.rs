pub mod config;
pub mod core;
pub mod infrastructure;

use thiserror::Error;

use crate::core::dispatch::mailbox::mailbox_type::MailboxRequirement;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourierError {
  #[error("the mailbox run was interrupted")]
  Interrupted,
  #[error("no actor cell has been published to the mailbox")]
  ActorCellNotPublished,
  #[error("mailbox type `{mailbox_type}` does not satisfy the requirement {requirement:?}")]
  RequirementNotSatisfied {
    mailbox_type: String,
    requirement: MailboxRequirement,
  },
  #[error("enqueue_first is not supported by mailbox type `{mailbox_type}`")]
  EnqueueFirstNotSupported { mailbox_type: String },
  #[error("invalid value for `{key}`: {message}")]
  InvalidConfiguration { key: String, message: String },
}
