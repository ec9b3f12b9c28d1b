use crate::core::actor::actor_path::ActorPath;

/// Lightweight actor identity. The full reference model lives above this
/// crate; the mailbox only needs a cloneable identity for senders, receivers
/// and dead-letter records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActorRef {
  NoSender,
  Local { path: ActorPath },
}

impl ActorRef {
  pub fn of_local(path: ActorPath) -> Self {
    ActorRef::Local { path }
  }

  pub fn no_sender() -> Self {
    ActorRef::NoSender
  }

  pub fn path(&self) -> Option<&ActorPath> {
    match self {
      ActorRef::NoSender => None,
      ActorRef::Local { path } => Some(path),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_path_of_local_ref() {
    let actor_ref = ActorRef::of_local(ActorPath::new("user/worker"));
    assert_eq!(actor_ref.path().unwrap().value(), "user/worker");
    assert_eq!(ActorRef::NoSender.path(), None);
  }
}
