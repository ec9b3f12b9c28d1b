use std::time::Duration;

use config::Config;

use crate::core::dispatch::mailbox::mailbox_type::MailboxType;
use crate::CourierError;

pub const MAILBOX_CAPACITY_KEY: &str = "mailbox-capacity";
pub const MAILBOX_PUSH_TIMEOUT_TIME_KEY: &str = "mailbox-push-timeout-time";

/// Mailbox knobs loaded from an actor-system configuration. Validation is
/// eager; a settings value that parsed is a settings value that can be used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailboxSettings {
  capacity: usize,
  push_timeout: Duration,
}

impl MailboxSettings {
  pub fn new(capacity: usize, push_timeout: Duration) -> Self {
    Self {
      capacity,
      push_timeout,
    }
  }

  /// Reads `mailbox-capacity` (messages, 0 = unbounded) and
  /// `mailbox-push-timeout-time` (milliseconds, 0 = block until space).
  pub fn from_config(config: &Config) -> Result<Self, CourierError> {
    let capacity = config
      .get_int(MAILBOX_CAPACITY_KEY)
      .map_err(|error| CourierError::InvalidConfiguration {
        key: MAILBOX_CAPACITY_KEY.to_string(),
        message: error.to_string(),
      })?;
    if capacity < 0 {
      return Err(CourierError::InvalidConfiguration {
        key: MAILBOX_CAPACITY_KEY.to_string(),
        message: format!("capacity must be >= 0, got {}", capacity),
      });
    }
    let push_timeout_millis =
      config
        .get_int(MAILBOX_PUSH_TIMEOUT_TIME_KEY)
        .map_err(|error| CourierError::InvalidConfiguration {
          key: MAILBOX_PUSH_TIMEOUT_TIME_KEY.to_string(),
          message: error.to_string(),
        })?;
    if push_timeout_millis < 0 {
      return Err(CourierError::InvalidConfiguration {
        key: MAILBOX_PUSH_TIMEOUT_TIME_KEY.to_string(),
        message: format!("push timeout must be >= 0, got {}", push_timeout_millis),
      });
    }
    Ok(Self {
      capacity: capacity as usize,
      push_timeout: Duration::from_millis(push_timeout_millis as u64),
    })
  }

  pub fn capacity(&self) -> usize {
    self.capacity
  }

  pub fn push_timeout(&self) -> Duration {
    self.push_timeout
  }

  pub fn mailbox_type(&self) -> MailboxType {
    if self.capacity == 0 {
      MailboxType::of_unbounded()
    } else {
      MailboxType::of_bounded(self.capacity, self.push_timeout)
    }
  }
}
