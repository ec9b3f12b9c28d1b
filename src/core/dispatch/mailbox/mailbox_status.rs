use num_enum::TryFromPrimitive;

/// Layout of the packed status word.
///
/// Bit 0 marks the terminal `Closed` state, bit 1 the scheduled bit, and the
/// remaining bits count outstanding suspensions in steps of `SuspendUnit`.
/// A zero-initialized word is an open, idle, non-suspended mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
pub enum MailboxStatus {
  Open = 0,
  Closed = 1,
  Scheduled = 2,
  ShouldScheduleMask = 3,
  ShouldNotProcessMask = !2,
  SuspendMask = !3,
  SuspendUnit = 4,
}
