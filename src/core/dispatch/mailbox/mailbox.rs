use std::cmp::max;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use anyhow::Result;
use once_cell::sync::OnceCell;

use crate::core::actor::actor_cell::{ActorCellRef, ActorCellWithRef};
use crate::core::actor::actor_ref::ActorRef;
use crate::core::dispatch::dispatcher::DispatcherBehavior;
use crate::core::dispatch::envelope::Envelope;
use crate::core::dispatch::mailbox::dead_letter_mailbox::DeadLetterMailbox;
use crate::core::dispatch::mailbox::mailbox_status::MailboxStatus;
use crate::core::dispatch::mailbox::mailbox_type::MailboxType;
use crate::core::dispatch::mailbox::system_mailbox::SystemMailbox;
use crate::core::dispatch::mailbox::MailboxBehavior;
use crate::core::dispatch::message_queue::{
  MessageQueue, MessageQueueBehavior, MessageQueueReaderBehavior, MessageQueueSize, MessageQueueWriterBehavior,
};
use crate::core::dispatch::message_queue::DequeMessageQueueWriterBehavior;
use crate::core::dispatch::system_message::earliest_first_system_message_list::EarliestFirstSystemMessageList;
use crate::core::dispatch::system_message::latest_first_system_message_list::LatestFirstSystemMessageList;
use crate::core::dispatch::system_message::system_message_entry::SystemMessageEntry;
use crate::core::dispatch::system_message::system_message_list::SystemMessageList;
use crate::core::dispatch::system_message::{
  SystemMessageQueueReaderBehavior, SystemMessageQueueWriterBehavior, LNIL,
};
use crate::infrastructure::queue::QueueError;
use crate::CourierError;

/// Stand-in for the executing thread's interrupt flag. The run loop polls it
/// between invocations; system processing defers it until the drain finished,
/// user processing surfaces it immediately.
#[derive(Debug)]
pub struct Interrupt {
  value: AtomicBool,
}

impl Interrupt {
  pub fn new() -> Self {
    Self {
      value: AtomicBool::new(false),
    }
  }

  pub fn set(&self) {
    self.value.store(true, Ordering::Release);
  }

  pub fn clear(&self) {
    self.value.store(false, Ordering::Release);
  }

  pub fn is_set(&self) -> bool {
    self.value.load(Ordering::Acquire)
  }

  pub fn take(&self) -> bool {
    self.value.swap(false, Ordering::AcqRel)
  }
}

impl Default for Interrupt {
  fn default() -> Self {
    Self::new()
  }
}

#[derive(Debug)]
struct MailboxInner {
  mailbox_type: MailboxType,
  current_status: AtomicU32,
  message_queue: MessageQueue,
  system_mailbox: SystemMailbox,
  dead_letters_opt: Option<DeadLetterMailbox>,
  actor_opt: OnceCell<ActorCellWithRef>,
  interrupt: Interrupt,
}

/// Per-actor ingress point: buffers user and system messages, encodes the
/// lifecycle state in one atomic word, and runs the actor when a dispatcher
/// worker drives it. Cloning shares the same mailbox.
#[derive(Debug, Clone)]
pub struct Mailbox {
  inner: Arc<MailboxInner>,
}

impl PartialEq for Mailbox {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.inner, &other.inner)
  }
}

impl Mailbox {
  pub fn new_with_message_queue(
    mailbox_type: MailboxType,
    message_queue: MessageQueue,
    dead_letters_opt: Option<DeadLetterMailbox>,
  ) -> Self {
    Self {
      inner: Arc::new(MailboxInner {
        mailbox_type,
        current_status: AtomicU32::new(MailboxStatus::Open as u32),
        message_queue,
        system_mailbox: SystemMailbox::new(),
        dead_letters_opt,
        actor_opt: OnceCell::new(),
        interrupt: Interrupt::new(),
      }),
    }
  }

  /// The sink mailbox backing dead letters. It has no actor and no further
  /// dead-letter target, so nothing it does can recurse.
  pub(crate) fn of_dead_letters() -> Self {
    let mailbox_type = MailboxType::of_unbounded();
    let message_queue = mailbox_type.create_message_queue();
    Self::new_with_message_queue(mailbox_type, message_queue, None)
  }

  pub fn mailbox_type(&self) -> &MailboxType {
    &self.inner.mailbox_type
  }

  pub fn sender(&self) -> MailboxSender {
    MailboxSender {
      underlying: self.clone(),
    }
  }

  pub fn interrupt(&self) -> &Interrupt {
    &self.inner.interrupt
  }

  pub(crate) fn system_mailbox(&self) -> &SystemMailbox {
    &self.inner.system_mailbox
  }

  /// Publishes the execution cell. Must happen exactly once, before the
  /// mailbox becomes reachable from producers.
  pub fn set_actor(&self, actor_ref: ActorRef, cell: ActorCellRef) {
    if self.inner.actor_opt.set(ActorCellWithRef::new(actor_ref, cell)).is_err() {
      log::warn!("set_actor called twice; keeping the first published cell");
    }
  }

  // --- status word -------------------------------------------------------

  fn load_status(&self) -> u32 {
    self.inner.current_status.load(Ordering::Acquire)
  }

  fn update_status(&self, old: u32, new: u32) -> bool {
    self
      .inner
      .current_status
      .compare_exchange(old, new, Ordering::AcqRel, Ordering::Acquire)
      .is_ok()
  }

  fn set_status(&self, value: u32) {
    self.inner.current_status.store(value, Ordering::Release);
  }

  pub fn should_process_message(&self) -> bool {
    (self.load_status() & MailboxStatus::ShouldNotProcessMask as u32) == 0
  }

  pub fn is_suspended(&self) -> bool {
    (self.load_status() & MailboxStatus::SuspendMask as u32) != 0
  }

  pub fn is_closed(&self) -> bool {
    self.load_status() == MailboxStatus::Closed as u32
  }

  pub fn is_scheduled(&self) -> bool {
    (self.load_status() & MailboxStatus::Scheduled as u32) != 0
  }

  pub fn suspend_count(&self) -> u32 {
    self.load_status() / MailboxStatus::SuspendUnit as u32
  }

  #[cfg(test)]
  pub(crate) fn status_for_testing(&self) -> u32 {
    self.load_status()
  }

  /// Adds one suspension. True only when this call moved the mailbox from
  /// not-suspended to suspended.
  pub fn suspend(&self) -> bool {
    loop {
      let current_status = self.load_status();
      if current_status == MailboxStatus::Closed as u32 {
        self.set_status(MailboxStatus::Closed as u32);
        return false;
      }
      if self.update_status(current_status, current_status + MailboxStatus::SuspendUnit as u32) {
        return current_status < MailboxStatus::SuspendUnit as u32;
      }
    }
  }

  /// Removes one suspension. True only when this call removed the last one.
  pub fn resume(&self) -> bool {
    loop {
      let current_status = self.load_status();
      if current_status == MailboxStatus::Closed as u32 {
        self.set_status(MailboxStatus::Closed as u32);
        return false;
      }
      let next = if current_status < MailboxStatus::SuspendUnit as u32 {
        current_status
      } else {
        current_status - MailboxStatus::SuspendUnit as u32
      };
      if self.update_status(current_status, next) {
        return next < MailboxStatus::SuspendUnit as u32;
      }
    }
  }

  /// Transitions to the terminal state, wiping the scheduled bit and any
  /// suspensions. True only for the call that performed the transition.
  pub fn become_closed(&self) -> bool {
    loop {
      let current_status = self.load_status();
      if current_status == MailboxStatus::Closed as u32 {
        self.set_status(MailboxStatus::Closed as u32);
        return false;
      }
      if self.update_status(current_status, MailboxStatus::Closed as u32) {
        return true;
      }
    }
  }

  /// Claims the scheduled bit. The caller that gets `true` owns the mailbox
  /// until the bit is cleared again.
  pub fn set_as_scheduled(&self) -> bool {
    loop {
      let current_status = self.load_status();
      if (current_status & MailboxStatus::ShouldScheduleMask as u32) != MailboxStatus::Open as u32 {
        return false;
      }
      if self.update_status(current_status, current_status | MailboxStatus::Scheduled as u32) {
        return true;
      }
    }
  }

  pub fn set_as_idle(&self) -> bool {
    loop {
      let current_status = self.load_status();
      if current_status == MailboxStatus::Closed as u32 {
        self.set_status(MailboxStatus::Closed as u32);
        return false;
      }
      if self.update_status(current_status, current_status & !(MailboxStatus::Scheduled as u32)) {
        return true;
      }
    }
  }

  pub fn can_be_scheduled_for_execution(&self, has_message_hint: bool, has_system_message_hint: bool) -> bool {
    let current_status = self.load_status();
    match current_status {
      status if status == MailboxStatus::Open as u32 || status == MailboxStatus::Scheduled as u32 => {
        has_message_hint || has_system_message_hint || self.has_system_messages() || self.has_messages()
      }
      status if status == MailboxStatus::Closed as u32 => false,
      _ => has_system_message_hint || self.has_system_messages(),
    }
  }

  // --- enqueue -----------------------------------------------------------

  pub fn enqueue(&self, receiver: &ActorRef, handle: Envelope) -> Result<()> {
    match self.inner.message_queue.writer().enqueue(receiver, handle) {
      Ok(()) => Ok(()),
      Err(QueueError::OfferTimeout { element, timeout }) => {
        log::warn!(
          "enqueue timed out after {:?}; routing to dead letters: receiver = {:?}",
          timeout,
          receiver
        );
        self.divert_to_dead_letters(receiver, element);
        Ok(())
      }
      Err(error) => Err(error.into()),
    }
  }

  /// Front insertion for deque-based mailboxes; fails on other queue kinds.
  pub fn enqueue_first(&self, receiver: &ActorRef, handle: Envelope) -> Result<()> {
    match self.inner.message_queue.writer().enqueue_first(receiver, handle) {
      Ok(()) => Ok(()),
      Err(QueueError::OfferTimeout { element, timeout }) => {
        log::warn!(
          "enqueue_first timed out after {:?}; routing to dead letters: receiver = {:?}",
          timeout,
          receiver
        );
        self.divert_to_dead_letters(receiver, element);
        Ok(())
      }
      Err(QueueError::Unsupported(_)) => Err(
        CourierError::EnqueueFirstNotSupported {
          mailbox_type: self.inner.mailbox_type.name().to_string(),
        }
        .into(),
      ),
      Err(error) => Err(error.into()),
    }
  }

  pub fn system_enqueue(&self, receiver: &ActorRef, message: &Arc<Mutex<SystemMessageEntry>>) {
    debug_assert!(message.lock().unwrap().is_unlinked());
    if !self.inner.system_mailbox.system_enqueue(message) {
      log::debug!("system queue is closed; routing to dead letters: receiver = {:?}", receiver);
      match &self.inner.dead_letters_opt {
        Some(dead_letters) => dead_letters.system_enqueue(receiver, message),
        None => log::warn!("no dead-letter mailbox attached; dropping system message for {:?}", receiver),
      }
    }
  }

  fn divert_to_dead_letters(&self, receiver: &ActorRef, handle: Envelope) {
    match &self.inner.dead_letters_opt {
      Some(dead_letters) => dead_letters.enqueue(receiver, handle),
      None => log::warn!("no dead-letter mailbox attached; dropping envelope for {:?}", receiver),
    }
  }

  // --- dequeue / run -----------------------------------------------------

  pub fn dequeue(&self) -> Option<Envelope> {
    self.inner.message_queue.reader().dequeue()
  }

  /// Executor entry. The caller must hold the scheduled bit; it is cleared
  /// and the dispatcher asked to re-evaluate scheduling no matter how
  /// processing ended.
  pub fn run(&self, dispatcher: &dyn DispatcherBehavior) -> Result<()> {
    let result = self.process(dispatcher);
    self.set_as_idle();
    dispatcher.register_for_execution(self, false, false);
    result
  }

  fn process(&self, dispatcher: &dyn DispatcherBehavior) -> Result<()> {
    if self.is_closed() {
      return Ok(());
    }
    let actor = self
      .inner
      .actor_opt
      .get()
      .cloned()
      .ok_or(CourierError::ActorCellNotPublished)?;
    self.process_all_system_messages(&actor)?;
    self.process_mailbox(&actor, dispatcher)
  }

  /// Delivers every visible system message in enqueue order, re-draining so
  /// that messages arriving mid-batch are not starved behind user traffic.
  /// Leftovers are only possible once the mailbox closed mid-drain; they are
  /// forwarded to the dead-letter system queue. An interrupt observed during
  /// delivery is deferred until after that forwarding.
  fn process_all_system_messages(&self, actor: &ActorCellWithRef) -> Result<()> {
    let mut interrupted = false;
    let mut message_list = self.inner.system_mailbox.system_drain(&LNIL);
    while message_list.non_empty() && !self.is_closed() {
      let (entry, rest) = match message_list.head_with_tail() {
        Some(head_with_tail) => head_with_tail,
        None => break,
      };
      let message = {
        let mut entry_guard = entry.lock().unwrap();
        entry_guard.unlink();
        entry_guard.message.clone()
      };
      log::debug!("system invoke: {:?}", message);
      actor.cell.lock().unwrap().system_invoke(&message)?;
      if self.inner.interrupt.is_set() {
        interrupted = true;
      }
      message_list = rest;
      if message_list.is_empty() && !self.is_closed() {
        message_list = self.inner.system_mailbox.system_drain(&LNIL);
      }
    }
    while let Some((entry, rest)) = message_list.head_with_tail() {
      {
        entry.lock().unwrap().unlink();
      }
      match &self.inner.dead_letters_opt {
        Some(dead_letters) => dead_letters.system_enqueue(&actor.actor_ref, &entry),
        None => log::warn!("no dead-letter mailbox attached; dropping system message for {:?}", actor.actor_ref),
      }
      message_list = rest;
    }
    if interrupted {
      self.inner.interrupt.clear();
      return Err(CourierError::Interrupted.into());
    }
    Ok(())
  }

  /// Processes up to the dispatcher's throughput of user messages, checking
  /// system traffic between each one. Errors from the actor are not caught.
  fn process_mailbox(&self, actor: &ActorCellWithRef, dispatcher: &dyn DispatcherBehavior) -> Result<()> {
    let mut left = max(dispatcher.throughput(), 1);
    let deadline_opt = if dispatcher.is_throughput_deadline_time_defined() {
      Some(Instant::now() + dispatcher.throughput_deadline_time())
    } else {
      None
    };
    while left > 0
      && self.should_process_message()
      && deadline_opt.map_or(true, |deadline| Instant::now() < deadline)
    {
      let envelope = match self.dequeue() {
        Some(envelope) => envelope,
        None => break,
      };
      log::debug!("invoke: {:?}", envelope);
      actor.cell.lock().unwrap().invoke(&envelope)?;
      if self.inner.interrupt.take() {
        return Err(CourierError::Interrupted.into());
      }
      self.process_all_system_messages(actor)?;
      left -= 1;
    }
    Ok(())
  }

  // --- cleanup -----------------------------------------------------------

  /// Called when the owning actor is unregistered. Closes the system queue
  /// with the sentinel and forwards everything still buffered, system and
  /// user alike, to dead letters. A mailbox without an actor (the dead-letter
  /// mailbox itself) has nothing to clean up.
  pub fn clean_up(&self) {
    let actor = match self.inner.actor_opt.get() {
      Some(actor) => actor,
      None => return,
    };
    let dead_letters = match &self.inner.dead_letters_opt {
      Some(dead_letters) => dead_letters.clone(),
      None => {
        log::warn!("no dead-letter mailbox attached; skipping cleanup for {:?}", actor.actor_ref);
        return;
      }
    };
    let mut message_list = self
      .inner
      .system_mailbox
      .system_drain(&LatestFirstSystemMessageList::of_no_message());
    while let Some((entry, rest)) = message_list.head_with_tail() {
      {
        entry.lock().unwrap().unlink();
      }
      dead_letters.system_enqueue(&actor.actor_ref, &entry);
      message_list = rest;
    }
    self.inner.message_queue.clean_up(&actor.actor_ref, &dead_letters);
  }
}

impl MailboxBehavior for Mailbox {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.inner.message_queue.number_of_messages()
  }

  fn has_messages(&self) -> bool {
    self.inner.message_queue.has_messages()
  }
}

impl SystemMessageQueueReaderBehavior for Mailbox {
  fn has_system_messages(&self) -> bool {
    self.inner.system_mailbox.has_system_messages()
  }

  fn system_drain(&mut self, new_contents: &LatestFirstSystemMessageList) -> EarliestFirstSystemMessageList {
    self.inner.system_mailbox.system_drain(new_contents)
  }
}

/// Producer handle; shares the mailbox it was created from.
#[derive(Debug, Clone)]
pub struct MailboxSender {
  underlying: Mailbox,
}

impl MailboxSender {
  pub fn underlying(&self) -> &Mailbox {
    &self.underlying
  }

  pub fn enqueue(&self, receiver: &ActorRef, handle: Envelope) -> Result<()> {
    self.underlying.enqueue(receiver, handle)
  }

  pub fn enqueue_first(&self, receiver: &ActorRef, handle: Envelope) -> Result<()> {
    self.underlying.enqueue_first(receiver, handle)
  }
}

impl MailboxBehavior for MailboxSender {
  fn number_of_messages(&self) -> MessageQueueSize {
    self.underlying.number_of_messages()
  }

  fn has_messages(&self) -> bool {
    self.underlying.has_messages()
  }
}

impl SystemMessageQueueWriterBehavior for MailboxSender {
  fn system_enqueue(&mut self, receiver: &ActorRef, message: &Arc<Mutex<SystemMessageEntry>>) {
    self.underlying.system_enqueue(receiver, message)
  }
}

#[cfg(test)]
mod tests {
  use std::env;
  use std::time::Duration;

  use super::*;
  use crate::core::actor::actor_cell::ActorCellBehavior;
  use crate::core::actor::actor_path::ActorPath;
  use crate::core::dispatch::mailbox::dead_letter::DeadLetter;
  use crate::core::dispatch::system_message::system_message::SystemMessage;

  fn init_logger() {
    env::set_var("RUST_LOG", "debug");
    let _ = env_logger::builder().is_test(true).try_init();
  }

  #[derive(Debug)]
  struct RecordingCell {
    record: Arc<Mutex<Vec<String>>>,
    mailbox_opt: Option<Mailbox>,
    enqueue_system_on_first_user: bool,
    interrupt_on_user: bool,
    interrupt_on_system: bool,
    fired: bool,
  }

  impl RecordingCell {
    fn new(record: Arc<Mutex<Vec<String>>>) -> Self {
      Self {
        record,
        mailbox_opt: None,
        enqueue_system_on_first_user: false,
        interrupt_on_user: false,
        interrupt_on_system: false,
        fired: false,
      }
    }

    fn label(message: &SystemMessage) -> String {
      match message {
        SystemMessage::Create { .. } => "system:create".to_string(),
        SystemMessage::Suspend => "system:suspend".to_string(),
        SystemMessage::Resume { .. } => "system:resume".to_string(),
        SystemMessage::Terminate => "system:terminate".to_string(),
        other => format!("system:{:?}", other),
      }
    }
  }

  impl ActorCellBehavior for RecordingCell {
    fn invoke(&mut self, envelope: &Envelope) -> Result<()> {
      let value = envelope.typed_message::<u32>().unwrap();
      self.record.lock().unwrap().push(format!("user:{}", value));
      if let Some(mailbox) = self.mailbox_opt.as_ref() {
        if self.interrupt_on_user {
          mailbox.interrupt().set();
        }
        if self.enqueue_system_on_first_user && !self.fired {
          self.fired = true;
          mailbox.system_enqueue(&ActorRef::NoSender, &SystemMessageEntry::of_arc(SystemMessage::of_suspend()));
          mailbox.system_enqueue(&ActorRef::NoSender, &SystemMessageEntry::of_arc(SystemMessage::of_resume()));
        }
      }
      Ok(())
    }

    fn system_invoke(&mut self, message: &SystemMessage) -> Result<()> {
      self.record.lock().unwrap().push(Self::label(message));
      if self.interrupt_on_system {
        if let Some(mailbox) = self.mailbox_opt.as_ref() {
          mailbox.interrupt().set();
        }
      }
      Ok(())
    }
  }

  #[derive(Debug)]
  struct TestDispatcher {
    throughput: usize,
    throughput_deadline_time_opt: Option<Duration>,
    dead_letter_mailbox: DeadLetterMailbox,
    registrations: Mutex<Vec<(bool, bool)>>,
  }

  impl TestDispatcher {
    fn new(throughput: usize) -> Self {
      Self {
        throughput,
        throughput_deadline_time_opt: None,
        dead_letter_mailbox: DeadLetterMailbox::new(ActorRef::of_local(ActorPath::new("system/deadLetters"))),
        registrations: Mutex::new(Vec::new()),
      }
    }

    fn registrations(&self) -> Vec<(bool, bool)> {
      self.registrations.lock().unwrap().clone()
    }
  }

  impl DispatcherBehavior for TestDispatcher {
    fn throughput(&self) -> usize {
      self.throughput
    }

    fn is_throughput_deadline_time_defined(&self) -> bool {
      self.throughput_deadline_time_opt.is_some()
    }

    fn throughput_deadline_time(&self) -> Duration {
      self.throughput_deadline_time_opt.unwrap_or(Duration::ZERO)
    }

    fn dead_letter_mailbox(&self) -> DeadLetterMailbox {
      self.dead_letter_mailbox.clone()
    }

    fn register_for_execution(&self, _mailbox: &Mailbox, has_message_hint: bool, has_system_message_hint: bool) -> bool {
      self
        .registrations
        .lock()
        .unwrap()
        .push((has_message_hint, has_system_message_hint));
      false
    }
  }

  fn new_test_mailbox(
    mailbox_type: MailboxType,
    dead_letters: DeadLetterMailbox,
  ) -> (Mailbox, Arc<Mutex<RecordingCell>>, Arc<Mutex<Vec<String>>>) {
    let record = Arc::new(Mutex::new(Vec::new()));
    let cell = Arc::new(Mutex::new(RecordingCell::new(record.clone())));
    let message_queue = mailbox_type.create_message_queue();
    let mailbox = Mailbox::new_with_message_queue(mailbox_type, message_queue, Some(dead_letters));
    let cell_ref: ActorCellRef = cell.clone();
    mailbox.set_actor(ActorRef::of_local(ActorPath::new("user/testActor")), cell_ref);
    cell.lock().unwrap().mailbox_opt = Some(mailbox.clone());
    (mailbox, cell, record)
  }

  #[test]
  fn test_suspend_and_resume_count() {
    init_logger();
    let dispatcher = TestDispatcher::new(10);
    let (mailbox, _, _) = new_test_mailbox(MailboxType::of_unbounded(), dispatcher.dead_letter_mailbox());

    assert_eq!(mailbox.status_for_testing(), 0);
    assert!(mailbox.suspend());
    assert!(!mailbox.suspend());
    assert!(!mailbox.suspend());
    assert_eq!(mailbox.status_for_testing(), 12);
    assert!(mailbox.is_suspended());

    assert!(!mailbox.resume());
    assert!(!mailbox.resume());
    assert_eq!(mailbox.status_for_testing(), 4);
    assert!(mailbox.resume());
    assert_eq!(mailbox.status_for_testing(), 0);
    assert!(!mailbox.is_suspended());
  }

  #[test]
  fn test_schedule_transition() {
    init_logger();
    let dispatcher = TestDispatcher::new(10);
    let (mailbox, _, _) = new_test_mailbox(MailboxType::of_unbounded(), dispatcher.dead_letter_mailbox());

    assert!(mailbox.set_as_scheduled());
    assert_eq!(mailbox.status_for_testing(), 2);
    assert!(mailbox.is_scheduled());

    assert!(!mailbox.set_as_scheduled());
    assert_eq!(mailbox.status_for_testing(), 2);

    assert!(mailbox.set_as_idle());
    assert_eq!(mailbox.status_for_testing(), 0);
    assert!(!mailbox.is_scheduled());
  }

  #[test]
  fn test_close_wins_over_every_other_transition() {
    init_logger();
    let dispatcher = TestDispatcher::new(10);
    let (mailbox, _, _) = new_test_mailbox(MailboxType::of_unbounded(), dispatcher.dead_letter_mailbox());

    mailbox.suspend();
    mailbox.suspend();
    assert_eq!(mailbox.status_for_testing(), 8);

    assert!(mailbox.become_closed());
    assert_eq!(mailbox.status_for_testing(), 1);
    assert!(mailbox.is_closed());

    assert!(!mailbox.become_closed());
    assert!(!mailbox.suspend());
    assert!(!mailbox.resume());
    assert!(!mailbox.set_as_scheduled());
    assert_eq!(mailbox.status_for_testing(), 1);
  }

  #[test]
  fn test_matched_suspend_resume_pairs_preserve_scheduled_bit() {
    init_logger();
    let dispatcher = TestDispatcher::new(10);
    let (mailbox, _, _) = new_test_mailbox(MailboxType::of_unbounded(), dispatcher.dead_letter_mailbox());

    mailbox.suspend();
    mailbox.suspend();
    assert!(mailbox.set_as_scheduled());
    mailbox.resume();
    mailbox.resume();
    assert_eq!(mailbox.status_for_testing(), MailboxStatus::Scheduled as u32);
  }

  #[test]
  fn test_can_be_scheduled_for_execution() {
    init_logger();
    let dispatcher = TestDispatcher::new(10);
    let (mailbox, _, _) = new_test_mailbox(MailboxType::of_unbounded(), dispatcher.dead_letter_mailbox());

    assert!(!mailbox.can_be_scheduled_for_execution(false, false));
    assert!(mailbox.can_be_scheduled_for_execution(true, false));

    mailbox.enqueue(&ActorRef::NoSender, Envelope::new(1u32)).unwrap();
    assert!(mailbox.can_be_scheduled_for_execution(false, false));

    mailbox.suspend();
    assert!(!mailbox.can_be_scheduled_for_execution(true, false));
    assert!(mailbox.can_be_scheduled_for_execution(false, true));
    mailbox.system_enqueue(&ActorRef::NoSender, &SystemMessageEntry::of_arc(SystemMessage::of_suspend()));
    assert!(mailbox.can_be_scheduled_for_execution(false, false));
    mailbox.resume();

    mailbox.become_closed();
    assert!(!mailbox.can_be_scheduled_for_execution(true, true));
  }

  #[test]
  fn test_run_processes_user_messages_and_registers_once() {
    init_logger();
    let dispatcher = TestDispatcher::new(10);
    let (mailbox, _, record) = new_test_mailbox(MailboxType::of_unbounded(), dispatcher.dead_letter_mailbox());

    for i in 1..=3u32 {
      mailbox.enqueue(&ActorRef::NoSender, Envelope::new(i)).unwrap();
    }
    assert!(mailbox.set_as_scheduled());
    mailbox.run(&dispatcher).unwrap();

    assert_eq!(
      *record.lock().unwrap(),
      vec!["user:1".to_string(), "user:2".to_string(), "user:3".to_string()]
    );
    assert!(!mailbox.is_scheduled());
    assert_eq!(dispatcher.registrations(), vec![(false, false)]);
  }

  #[test]
  fn test_system_messages_preempt_user_messages() {
    init_logger();
    let dispatcher = TestDispatcher::new(10);
    let (mailbox, cell, record) = new_test_mailbox(MailboxType::of_unbounded(), dispatcher.dead_letter_mailbox());
    cell.lock().unwrap().enqueue_system_on_first_user = true;

    for i in 1..=5u32 {
      mailbox.enqueue(&ActorRef::NoSender, Envelope::new(i)).unwrap();
    }
    assert!(mailbox.set_as_scheduled());
    mailbox.run(&dispatcher).unwrap();

    assert_eq!(
      *record.lock().unwrap(),
      vec![
        "user:1".to_string(),
        "system:suspend".to_string(),
        "system:resume".to_string(),
        "user:2".to_string(),
        "user:3".to_string(),
        "user:4".to_string(),
        "user:5".to_string(),
      ]
    );
  }

  #[test]
  fn test_throughput_of_one_processes_one_user_message_per_run() {
    init_logger();
    let dispatcher = TestDispatcher::new(1);
    let (mailbox, _, record) = new_test_mailbox(MailboxType::of_unbounded(), dispatcher.dead_letter_mailbox());

    for i in 1..=3u32 {
      mailbox.enqueue(&ActorRef::NoSender, Envelope::new(i)).unwrap();
    }
    assert!(mailbox.set_as_scheduled());
    mailbox.run(&dispatcher).unwrap();

    assert_eq!(*record.lock().unwrap(), vec!["user:1".to_string()]);
    assert!(mailbox.has_messages());
  }

  #[test]
  fn test_no_user_message_is_processed_while_suspended() {
    init_logger();
    let dispatcher = TestDispatcher::new(10);
    let (mailbox, _, record) = new_test_mailbox(MailboxType::of_unbounded(), dispatcher.dead_letter_mailbox());

    mailbox.enqueue(&ActorRef::NoSender, Envelope::new(1u32)).unwrap();
    mailbox.system_enqueue(&ActorRef::NoSender, &SystemMessageEntry::of_arc(SystemMessage::of_suspend()));
    mailbox.suspend();

    assert!(mailbox.set_as_scheduled());
    mailbox.run(&dispatcher).unwrap();

    assert_eq!(*record.lock().unwrap(), vec!["system:suspend".to_string()]);
    assert!(mailbox.has_messages());

    mailbox.resume();
    assert!(mailbox.set_as_scheduled());
    mailbox.run(&dispatcher).unwrap();
    assert_eq!(
      *record.lock().unwrap(),
      vec!["system:suspend".to_string(), "user:1".to_string()]
    );
  }

  #[test]
  fn test_closed_mailbox_skips_processing_but_still_registers() {
    init_logger();
    let dispatcher = TestDispatcher::new(10);
    let (mailbox, _, record) = new_test_mailbox(MailboxType::of_unbounded(), dispatcher.dead_letter_mailbox());

    mailbox.enqueue(&ActorRef::NoSender, Envelope::new(1u32)).unwrap();
    mailbox.become_closed();
    mailbox.run(&dispatcher).unwrap();

    assert!(record.lock().unwrap().is_empty());
    assert_eq!(dispatcher.registrations(), vec![(false, false)]);
    assert_eq!(mailbox.status_for_testing(), MailboxStatus::Closed as u32);
  }

  #[test]
  fn test_bounded_enqueue_diverts_to_dead_letters_on_timeout() {
    init_logger();
    let dispatcher = TestDispatcher::new(10);
    let dead_letters = dispatcher.dead_letter_mailbox();
    let (mailbox, _, _) = new_test_mailbox(
      MailboxType::of_bounded(1, Duration::from_millis(10)),
      dead_letters.clone(),
    );
    let receiver = ActorRef::of_local(ActorPath::new("user/receiver"));

    mailbox.enqueue(&receiver, Envelope::new(1u32)).unwrap();
    mailbox.enqueue(&receiver, Envelope::new(2u32)).unwrap();

    let envelope = dead_letters.underlying().dequeue().unwrap();
    let dead_letter = envelope.typed_message::<DeadLetter>().unwrap();
    assert_eq!(dead_letter.recipient(), &receiver);
    assert_eq!(dead_letter.message().take::<u32>().unwrap(), 2);
    assert!(dead_letters.underlying().dequeue().is_none());
  }

  #[test]
  fn test_clean_up_drains_both_queues_to_dead_letters() {
    init_logger();
    let dispatcher = TestDispatcher::new(10);
    let dead_letters = dispatcher.dead_letter_mailbox();
    let (mailbox, _, _) = new_test_mailbox(MailboxType::of_unbounded(), dead_letters.clone());

    for i in 1..=3u32 {
      mailbox.enqueue(&ActorRef::NoSender, Envelope::new(i)).unwrap();
    }
    mailbox.system_enqueue(&ActorRef::NoSender, &SystemMessageEntry::of_arc(SystemMessage::of_suspend()));
    mailbox.system_enqueue(&ActorRef::NoSender, &SystemMessageEntry::of_arc(SystemMessage::of_terminate()));

    mailbox.clean_up();

    let mut user_dead_letters = 0;
    while dead_letters.underlying().dequeue().is_some() {
      user_dead_letters += 1;
    }
    assert_eq!(user_dead_letters, 3);

    let drained = dead_letters.underlying().system_mailbox().system_drain(&LNIL);
    let mut system_messages = Vec::new();
    let mut current = drained;
    while let Some((entry, rest)) = current.head_with_tail() {
      {
        entry.lock().unwrap().unlink();
      }
      assert!(entry.lock().unwrap().is_unlinked());
      system_messages.push(entry.lock().unwrap().message.clone());
      current = rest;
    }
    assert_eq!(
      system_messages,
      vec![SystemMessage::of_suspend(), SystemMessage::of_terminate()]
    );

    // the system queue is closed now; further enqueues divert to dead letters
    mailbox.system_enqueue(&ActorRef::NoSender, &SystemMessageEntry::of_arc(SystemMessage::of_watch(
      ActorRef::NoSender,
      ActorRef::NoSender,
    )));
    assert!(dead_letters.underlying().system_mailbox().has_system_messages());
    assert!(!mailbox.has_system_messages());
  }

  #[test]
  fn test_interrupt_during_system_processing_is_deferred() {
    init_logger();
    let dispatcher = TestDispatcher::new(10);
    let (mailbox, cell, record) = new_test_mailbox(MailboxType::of_unbounded(), dispatcher.dead_letter_mailbox());
    cell.lock().unwrap().interrupt_on_system = true;

    mailbox.system_enqueue(&ActorRef::NoSender, &SystemMessageEntry::of_arc(SystemMessage::of_create()));
    assert!(mailbox.set_as_scheduled());
    let error = mailbox.run(&dispatcher).unwrap_err();
    assert!(matches!(
      error.downcast::<CourierError>().unwrap(),
      CourierError::Interrupted
    ));

    assert_eq!(*record.lock().unwrap(), vec!["system:create".to_string()]);
    assert!(!mailbox.interrupt().is_set());
    assert!(!mailbox.is_scheduled());
    assert_eq!(dispatcher.registrations(), vec![(false, false)]);
  }

  #[test]
  fn test_interrupt_during_user_processing_is_prompt() {
    init_logger();
    let dispatcher = TestDispatcher::new(10);
    let (mailbox, cell, record) = new_test_mailbox(MailboxType::of_unbounded(), dispatcher.dead_letter_mailbox());
    cell.lock().unwrap().interrupt_on_user = true;

    mailbox.enqueue(&ActorRef::NoSender, Envelope::new(1u32)).unwrap();
    mailbox.enqueue(&ActorRef::NoSender, Envelope::new(2u32)).unwrap();
    assert!(mailbox.set_as_scheduled());
    let error = mailbox.run(&dispatcher).unwrap_err();
    assert!(matches!(
      error.downcast::<CourierError>().unwrap(),
      CourierError::Interrupted
    ));

    assert_eq!(*record.lock().unwrap(), vec!["user:1".to_string()]);
    assert!(!mailbox.interrupt().is_set());
    assert!(mailbox.has_messages());
    assert!(!mailbox.is_scheduled());
    assert_eq!(dispatcher.registrations(), vec![(false, false)]);
  }

  #[test]
  fn test_enqueue_first_requires_a_deque_mailbox() {
    init_logger();
    let dispatcher = TestDispatcher::new(10);
    let (mailbox, _, record) = new_test_mailbox(MailboxType::of_unbounded_deque(), dispatcher.dead_letter_mailbox());

    mailbox.enqueue(&ActorRef::NoSender, Envelope::new(1u32)).unwrap();
    mailbox.enqueue_first(&ActorRef::NoSender, Envelope::new(0u32)).unwrap();
    assert!(mailbox.set_as_scheduled());
    mailbox.run(&dispatcher).unwrap();
    assert_eq!(
      *record.lock().unwrap(),
      vec!["user:0".to_string(), "user:1".to_string()]
    );

    let (plain, _, _) = new_test_mailbox(MailboxType::of_unbounded(), dispatcher.dead_letter_mailbox());
    let error = plain.enqueue_first(&ActorRef::NoSender, Envelope::new(0u32)).unwrap_err();
    assert!(matches!(
      error.downcast::<CourierError>().unwrap(),
      CourierError::EnqueueFirstNotSupported { .. }
    ));
  }
}
