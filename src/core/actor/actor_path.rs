use std::fmt::{Display, Formatter};

/// Hierarchical name of an actor inside its actor system.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorPath {
  value: String,
}

impl ActorPath {
  pub fn new(value: impl Into<String>) -> Self {
    Self { value: value.into() }
  }

  pub fn value(&self) -> &str {
    &self.value
  }
}

impl Display for ActorPath {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.value)
  }
}
