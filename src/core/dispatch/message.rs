use std::fmt::Debug;

/// Marker for values that can travel through a mailbox.
pub trait Message: Debug + Send + Sync + 'static {}

impl Message for i32 {}
impl Message for i64 {}
impl Message for u32 {}
impl Message for u64 {}
impl Message for usize {}
impl Message for bool {}
impl Message for String {}
impl Message for () {}
