use crate::core::actor::actor_ref::ActorRef;

/// Control commands delivered ahead of user traffic. `NoMessage` never
/// travels; it is the sentinel that marks a closed system queue.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemMessage {
  Create {
    failure: Option<String>,
  },
  Recreate {
    cause: String,
  },
  Suspend,
  Resume {
    caused_by_failure: Option<String>,
  },
  Terminate,
  Supervise {
    child: ActorRef,
  },
  Watch {
    watchee: ActorRef,
    watcher: ActorRef,
  },
  Unwatch {
    watchee: ActorRef,
    watcher: ActorRef,
  },
  Failed {
    child: ActorRef,
    cause: String,
  },
  DeathWatchNotification {
    actor: ActorRef,
    existence_confirmed: bool,
    address_terminated: bool,
  },
  NoMessage,
}

impl SystemMessage {
  pub fn of_create() -> Self {
    SystemMessage::Create { failure: None }
  }

  pub fn of_create_with_failure(failure: Option<String>) -> Self {
    SystemMessage::Create { failure }
  }

  pub fn of_recreate(cause: impl Into<String>) -> Self {
    SystemMessage::Recreate { cause: cause.into() }
  }

  pub fn of_suspend() -> Self {
    SystemMessage::Suspend
  }

  pub fn of_resume() -> Self {
    SystemMessage::Resume { caused_by_failure: None }
  }

  pub fn of_resume_with_failure(caused_by_failure: Option<String>) -> Self {
    SystemMessage::Resume { caused_by_failure }
  }

  pub fn of_terminate() -> Self {
    SystemMessage::Terminate
  }

  pub fn of_supervise(child: ActorRef) -> Self {
    SystemMessage::Supervise { child }
  }

  pub fn of_watch(watchee: ActorRef, watcher: ActorRef) -> Self {
    SystemMessage::Watch { watchee, watcher }
  }

  pub fn of_unwatch(watchee: ActorRef, watcher: ActorRef) -> Self {
    SystemMessage::Unwatch { watchee, watcher }
  }

  pub fn of_failed(child: ActorRef, cause: impl Into<String>) -> Self {
    SystemMessage::Failed {
      child,
      cause: cause.into(),
    }
  }

  pub fn of_death_watch_notification(actor: ActorRef, existence_confirmed: bool, address_terminated: bool) -> Self {
    SystemMessage::DeathWatchNotification {
      actor,
      existence_confirmed,
      address_terminated,
    }
  }

  pub fn of_no_message() -> Self {
    SystemMessage::NoMessage
  }

  pub fn is_no_message(&self) -> bool {
    matches!(self, SystemMessage::NoMessage)
  }
}
