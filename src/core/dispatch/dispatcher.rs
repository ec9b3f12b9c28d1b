use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::Result;

use crate::core::actor::actor_ref::ActorRef;
use crate::core::dispatch::envelope::Envelope;
use crate::core::dispatch::mailbox::dead_letter_mailbox::DeadLetterMailbox;
use crate::core::dispatch::mailbox::mailbox::Mailbox;
use crate::core::dispatch::system_message::system_message_entry::SystemMessageEntry;

/// Contract the mailbox run loop consumes. `register_for_execution` is called
/// by producers that won the scheduled bit and, with both hints false, as the
/// unconditional tail of every run.
pub trait DispatcherBehavior {
  /// Upper bound on consecutive user messages per run; treated as at least 1.
  fn throughput(&self) -> usize;

  fn is_throughput_deadline_time_defined(&self) -> bool;

  fn throughput_deadline_time(&self) -> Duration;

  fn dead_letter_mailbox(&self) -> DeadLetterMailbox;

  fn register_for_execution(&self, mailbox: &Mailbox, has_message_hint: bool, has_system_message_hint: bool) -> bool;
}

#[derive(Debug)]
struct DispatcherInner {
  throughput: usize,
  throughput_deadline_time_opt: Option<Duration>,
  dead_letter_mailbox: DeadLetterMailbox,
  sender: Mutex<Option<mpsc::Sender<Mailbox>>>,
  workers: Mutex<Vec<JoinHandle<()>>>,
}

/// Default dispatcher: a fixed pool of worker threads draining a channel of
/// scheduled mailboxes. A mailbox enters the channel at most once at a time
/// because entry requires winning the scheduled bit.
#[derive(Debug, Clone)]
pub struct Dispatcher {
  inner: Arc<DispatcherInner>,
}

impl Dispatcher {
  pub fn new(
    dead_letter_mailbox: DeadLetterMailbox,
    throughput: usize,
    throughput_deadline_time_opt: Option<Duration>,
    worker_count: usize,
  ) -> Self {
    let (sender, receiver) = mpsc::channel::<Mailbox>();
    let receiver = Arc::new(Mutex::new(receiver));
    let dispatcher = Self {
      inner: Arc::new(DispatcherInner {
        throughput,
        throughput_deadline_time_opt,
        dead_letter_mailbox,
        sender: Mutex::new(Some(sender)),
        workers: Mutex::new(Vec::new()),
      }),
    };
    let worker_count = worker_count.max(1);
    let mut workers = dispatcher.inner.workers.lock().unwrap();
    for index in 0..worker_count {
      let receiver = receiver.clone();
      let worker_dispatcher = dispatcher.clone();
      let handle = thread::Builder::new()
        .name(format!("courier-dispatcher-{}", index))
        .spawn(move || Self::worker_loop(receiver, worker_dispatcher))
        .expect("failed to spawn a dispatcher worker");
      workers.push(handle);
    }
    drop(workers);
    dispatcher
  }

  fn worker_loop(receiver: Arc<Mutex<mpsc::Receiver<Mailbox>>>, dispatcher: Dispatcher) {
    loop {
      let mailbox = {
        let receiver_guard = receiver.lock().unwrap();
        match receiver_guard.recv() {
          Ok(mailbox) => mailbox,
          Err(_) => break,
        }
      };
      if let Err(error) = mailbox.run(&dispatcher) {
        log::error!("mailbox run failed: {:?}", error);
      }
    }
  }

  /// Producer entry: buffer the envelope, then try to schedule the mailbox.
  pub fn dispatch(&self, mailbox: &Mailbox, receiver: &ActorRef, envelope: Envelope) -> Result<()> {
    mailbox.enqueue(receiver, envelope)?;
    self.register_for_execution(mailbox, true, false);
    Ok(())
  }

  pub fn system_dispatch(
    &self,
    mailbox: &Mailbox,
    receiver: &ActorRef,
    message: &Arc<Mutex<SystemMessageEntry>>,
  ) {
    mailbox.system_enqueue(receiver, message);
    self.register_for_execution(mailbox, false, true);
  }

  /// Closes the work channel and joins every worker. Must not be called from
  /// a worker thread.
  pub fn shutdown(&self) {
    {
      let mut sender_guard = self.inner.sender.lock().unwrap();
      sender_guard.take();
    }
    let workers = {
      let mut workers_guard = self.inner.workers.lock().unwrap();
      std::mem::take(&mut *workers_guard)
    };
    for worker in workers {
      let _ = worker.join();
    }
  }
}

impl DispatcherBehavior for Dispatcher {
  fn throughput(&self) -> usize {
    self.inner.throughput
  }

  fn is_throughput_deadline_time_defined(&self) -> bool {
    self.inner.throughput_deadline_time_opt.is_some()
  }

  fn throughput_deadline_time(&self) -> Duration {
    self.inner.throughput_deadline_time_opt.unwrap_or(Duration::ZERO)
  }

  fn dead_letter_mailbox(&self) -> DeadLetterMailbox {
    self.inner.dead_letter_mailbox.clone()
  }

  fn register_for_execution(&self, mailbox: &Mailbox, has_message_hint: bool, has_system_message_hint: bool) -> bool {
    if !mailbox.can_be_scheduled_for_execution(has_message_hint, has_system_message_hint) {
      return false;
    }
    if !mailbox.set_as_scheduled() {
      return false;
    }
    let sender_guard = self.inner.sender.lock().unwrap();
    match sender_guard.as_ref() {
      Some(sender) => {
        if sender.send(mailbox.clone()).is_ok() {
          true
        } else {
          mailbox.set_as_idle();
          false
        }
      }
      None => {
        mailbox.set_as_idle();
        false
      }
    }
  }
}
