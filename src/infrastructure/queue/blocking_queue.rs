use std::marker::PhantomData;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use crate::infrastructure::queue::{
  DequeWriterBehavior, Element, QueueBehavior, QueueError, QueueRWFactoryBehavior, QueueReaderBehavior,
  QueueReaderFactoryBehavior, QueueSize, QueueWithRWFactoryBehavior, QueueWriterBehavior, QueueWriterFactoryBehavior,
};

/// Bounded blocking shell over a plain queue.
///
/// Producers either `put` (block until space) or `offer_with_timeout` (bounded
/// wait, the element comes back in the error on timeout). The consumer side
/// stays non-blocking. All accesses go through the shared coordination lock so
/// the condition variables cannot miss a wake-up.
#[derive(Debug)]
pub struct BlockingQueue<E: Element, Q: QueueWithRWFactoryBehavior<E> + Clone> {
  underlying: Q,
  lock: Arc<Mutex<()>>,
  not_full: Arc<Condvar>,
  not_empty: Arc<Condvar>,
  _phantom: PhantomData<E>,
}

impl<E: Element, Q: QueueWithRWFactoryBehavior<E> + Clone> Clone for BlockingQueue<E, Q> {
  fn clone(&self) -> Self {
    Self {
      underlying: self.underlying.clone(),
      lock: self.lock.clone(),
      not_full: self.not_full.clone(),
      not_empty: self.not_empty.clone(),
      _phantom: PhantomData,
    }
  }
}

#[derive(Debug, Clone)]
pub struct BlockingQueueWriter<E: Element, Q: QueueWithRWFactoryBehavior<E> + Clone> {
  queue: BlockingQueue<E, Q>,
}

#[derive(Debug, Clone)]
pub struct BlockingQueueReader<E: Element, Q: QueueWithRWFactoryBehavior<E> + Clone> {
  queue: BlockingQueue<E, Q>,
}

impl<E: Element, Q: QueueWithRWFactoryBehavior<E> + Clone> BlockingQueue<E, Q> {
  pub fn new(underlying: Q) -> Self {
    Self {
      underlying,
      lock: Arc::new(Mutex::new(())),
      not_full: Arc::new(Condvar::new()),
      not_empty: Arc::new(Condvar::new()),
      _phantom: PhantomData,
    }
  }

  fn is_full(&self) -> bool {
    match (self.underlying.len(), self.underlying.capacity()) {
      (QueueSize::Limited(len), QueueSize::Limited(capacity)) => len >= capacity,
      _ => false,
    }
  }

  fn put_with<F>(&self, element: E, offer: F) -> Result<(), QueueError<E>>
  where
    F: FnOnce(&Q, E) -> Result<(), QueueError<E>>, {
    let mut guard = self.lock.lock().unwrap();
    while self.is_full() {
      guard = self.not_full.wait(guard).unwrap();
    }
    let result = offer(&self.underlying, element);
    self.not_empty.notify_one();
    drop(guard);
    result
  }

  fn offer_with_timeout_with<F>(&self, element: E, timeout: Duration, offer: F) -> Result<(), QueueError<E>>
  where
    F: FnOnce(&Q, E) -> Result<(), QueueError<E>>, {
    let deadline = Instant::now() + timeout;
    let mut guard = self.lock.lock().unwrap();
    while self.is_full() {
      let now = Instant::now();
      if now >= deadline {
        return Err(QueueError::OfferTimeout { element, timeout });
      }
      let (next_guard, _) = self.not_full.wait_timeout(guard, deadline - now).unwrap();
      guard = next_guard;
    }
    let result = offer(&self.underlying, element);
    self.not_empty.notify_one();
    drop(guard);
    result
  }

  fn poll_inner(&self) -> Option<E> {
    let guard = self.lock.lock().unwrap();
    let result = self.underlying.reader().poll();
    if result.is_some() {
      self.not_full.notify_one();
    }
    drop(guard);
    result
  }
}

impl<E: Element, Q: QueueWithRWFactoryBehavior<E> + Clone> QueueBehavior<E> for BlockingQueue<E, Q> {
  fn len(&self) -> QueueSize {
    self.underlying.len()
  }

  fn capacity(&self) -> QueueSize {
    self.underlying.capacity()
  }
}

impl<E: Element, Q: QueueWithRWFactoryBehavior<E> + Clone> QueueWriterFactoryBehavior<E> for BlockingQueue<E, Q> {
  type Writer = BlockingQueueWriter<E, Q>;

  fn writer(&self) -> Self::Writer {
    BlockingQueueWriter { queue: self.clone() }
  }
}

impl<E: Element, Q: QueueWithRWFactoryBehavior<E> + Clone> QueueReaderFactoryBehavior<E> for BlockingQueue<E, Q> {
  type Reader = BlockingQueueReader<E, Q>;

  fn reader(&self) -> Self::Reader {
    BlockingQueueReader { queue: self.clone() }
  }
}

impl<E: Element, Q: QueueWithRWFactoryBehavior<E> + Clone> QueueRWFactoryBehavior<E> for BlockingQueue<E, Q> {}

impl<E: Element, Q: QueueWithRWFactoryBehavior<E> + Clone> QueueWithRWFactoryBehavior<E> for BlockingQueue<E, Q> {}

impl<E: Element, Q: QueueWithRWFactoryBehavior<E> + Clone> BlockingQueueWriter<E, Q> {
  /// Blocks until space is available.
  pub fn put(&mut self, element: E) -> Result<(), QueueError<E>> {
    self.queue.put_with(element, |queue, element| queue.writer().offer(element))
  }

  /// Waits up to `timeout` for space; the element is handed back on timeout.
  pub fn offer_with_timeout(&mut self, element: E, timeout: Duration) -> Result<(), QueueError<E>> {
    self
      .queue
      .offer_with_timeout_with(element, timeout, |queue, element| queue.writer().offer(element))
  }
}

impl<E: Element, Q> BlockingQueueWriter<E, Q>
where
  Q: QueueWithRWFactoryBehavior<E> + Clone,
  Q::Writer: DequeWriterBehavior<E>, {
  pub fn put_first(&mut self, element: E) -> Result<(), QueueError<E>> {
    self
      .queue
      .put_with(element, |queue, element| queue.writer().offer_first(element))
  }

  pub fn offer_first_with_timeout(&mut self, element: E, timeout: Duration) -> Result<(), QueueError<E>> {
    self
      .queue
      .offer_with_timeout_with(element, timeout, |queue, element| queue.writer().offer_first(element))
  }
}

impl<E: Element, Q: QueueWithRWFactoryBehavior<E> + Clone> QueueBehavior<E> for BlockingQueueWriter<E, Q> {
  fn len(&self) -> QueueSize {
    self.queue.len()
  }

  fn capacity(&self) -> QueueSize {
    self.queue.capacity()
  }
}

impl<E: Element, Q: QueueWithRWFactoryBehavior<E> + Clone> QueueWriterBehavior<E> for BlockingQueueWriter<E, Q> {
  fn offer(&mut self, element: E) -> Result<(), QueueError<E>> {
    let guard = self.queue.lock.lock().unwrap();
    let result = self.queue.underlying.writer().offer(element);
    if result.is_ok() {
      self.queue.not_empty.notify_one();
    }
    drop(guard);
    result
  }
}

impl<E: Element, Q: QueueWithRWFactoryBehavior<E> + Clone> QueueBehavior<E> for BlockingQueueReader<E, Q> {
  fn len(&self) -> QueueSize {
    self.queue.len()
  }

  fn capacity(&self) -> QueueSize {
    self.queue.capacity()
  }
}

impl<E: Element, Q: QueueWithRWFactoryBehavior<E> + Clone> QueueReaderBehavior<E> for BlockingQueueReader<E, Q> {
  fn poll(&mut self) -> Option<E> {
    self.queue.poll_inner()
  }
}

#[cfg(test)]
mod tests {
  use std::thread;

  use super::*;
  use crate::infrastructure::queue::QueueVec;

  #[test]
  fn test_offer_with_timeout_returns_element_when_full() {
    let queue = BlockingQueue::new(QueueVec::<u32>::with_num_elements(1));
    let mut writer = queue.writer();

    writer.offer(1).unwrap();
    let result = writer.offer_with_timeout(2, Duration::from_millis(10));
    match result {
      Err(QueueError::OfferTimeout { element, .. }) => assert_eq!(element, 2),
      other => panic!("unexpected result: {:?}", other),
    }
  }

  #[test]
  fn test_put_blocks_until_space_is_available() {
    let queue = BlockingQueue::new(QueueVec::<u32>::with_num_elements(1));
    let mut writer = queue.writer();
    writer.offer(1).unwrap();

    let producer = {
      let queue = queue.clone();
      thread::spawn(move || {
        let mut writer = queue.writer();
        writer.put(2).unwrap();
      })
    };

    thread::sleep(Duration::from_millis(50));
    assert_eq!(queue.reader().poll(), Some(1));

    producer.join().unwrap();
    assert_eq!(queue.reader().poll(), Some(2));
  }

  #[test]
  fn test_put_first_orders_ahead_of_queue() {
    let queue = BlockingQueue::new(QueueVec::<u32>::with_num_elements(3));
    let mut writer = queue.writer();

    writer.put(1).unwrap();
    writer.put(2).unwrap();
    writer.put_first(0).unwrap();

    let mut reader = queue.reader();
    assert_eq!(reader.poll(), Some(0));
    assert_eq!(reader.poll(), Some(1));
    assert_eq!(reader.poll(), Some(2));
  }
}
