use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::infrastructure::queue::{
  DequeWriterBehavior, Element, QueueBehavior, QueueError, QueueRWFactoryBehavior, QueueReaderBehavior,
  QueueReaderFactoryBehavior, QueueSize, QueueWithRWFactoryBehavior, QueueWriterBehavior, QueueWriterFactoryBehavior,
};

/// FIFO queue over a shared `VecDeque`, optionally capacity-limited.
///
/// Front insertion is available through [`DequeWriterBehavior`], which makes
/// this the backing store for both the plain and the deque-based mailboxes.
#[derive(Debug)]
pub struct QueueVec<E: Element> {
  values: Arc<Mutex<VecDeque<E>>>,
  capacity: QueueSize,
}

impl<E: Element> Clone for QueueVec<E> {
  fn clone(&self) -> Self {
    Self {
      values: self.values.clone(),
      capacity: self.capacity.clone(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct QueueVecWriter<E: Element> {
  queue: QueueVec<E>,
}

#[derive(Debug, Clone)]
pub struct QueueVecReader<E: Element> {
  queue: QueueVec<E>,
}

impl<E: Element> QueueVec<E> {
  pub fn new() -> Self {
    Self {
      values: Arc::new(Mutex::new(VecDeque::new())),
      capacity: QueueSize::Limitless,
    }
  }

  pub fn with_num_elements(num_elements: usize) -> Self {
    Self {
      values: Arc::new(Mutex::new(VecDeque::with_capacity(num_elements))),
      capacity: QueueSize::Limited(num_elements),
    }
  }

  fn offer_inner(&self, element: E) -> Result<(), QueueError<E>> {
    let mut values = self.values.lock().unwrap();
    if let QueueSize::Limited(capacity) = self.capacity {
      if values.len() >= capacity {
        return Err(QueueError::Full(element));
      }
    }
    values.push_back(element);
    Ok(())
  }

  fn offer_first_inner(&self, element: E) -> Result<(), QueueError<E>> {
    let mut values = self.values.lock().unwrap();
    if let QueueSize::Limited(capacity) = self.capacity {
      if values.len() >= capacity {
        return Err(QueueError::Full(element));
      }
    }
    values.push_front(element);
    Ok(())
  }

  fn poll_inner(&self) -> Option<E> {
    let mut values = self.values.lock().unwrap();
    values.pop_front()
  }
}

impl<E: Element> Default for QueueVec<E> {
  fn default() -> Self {
    Self::new()
  }
}

impl<E: Element> QueueBehavior<E> for QueueVec<E> {
  fn len(&self) -> QueueSize {
    let values = self.values.lock().unwrap();
    QueueSize::Limited(values.len())
  }

  fn capacity(&self) -> QueueSize {
    self.capacity.clone()
  }
}

impl<E: Element> QueueWriterFactoryBehavior<E> for QueueVec<E> {
  type Writer = QueueVecWriter<E>;

  fn writer(&self) -> Self::Writer {
    QueueVecWriter { queue: self.clone() }
  }
}

impl<E: Element> QueueReaderFactoryBehavior<E> for QueueVec<E> {
  type Reader = QueueVecReader<E>;

  fn reader(&self) -> Self::Reader {
    QueueVecReader { queue: self.clone() }
  }
}

impl<E: Element> QueueRWFactoryBehavior<E> for QueueVec<E> {}

impl<E: Element> QueueWithRWFactoryBehavior<E> for QueueVec<E> {}

impl<E: Element> QueueBehavior<E> for QueueVecWriter<E> {
  fn len(&self) -> QueueSize {
    self.queue.len()
  }

  fn capacity(&self) -> QueueSize {
    self.queue.capacity()
  }
}

impl<E: Element> QueueWriterBehavior<E> for QueueVecWriter<E> {
  fn offer(&mut self, element: E) -> Result<(), QueueError<E>> {
    self.queue.offer_inner(element)
  }
}

impl<E: Element> DequeWriterBehavior<E> for QueueVecWriter<E> {
  fn offer_first(&mut self, element: E) -> Result<(), QueueError<E>> {
    self.queue.offer_first_inner(element)
  }
}

impl<E: Element> QueueBehavior<E> for QueueVecReader<E> {
  fn len(&self) -> QueueSize {
    self.queue.len()
  }

  fn capacity(&self) -> QueueSize {
    self.queue.capacity()
  }
}

impl<E: Element> QueueReaderBehavior<E> for QueueVecReader<E> {
  fn poll(&mut self) -> Option<E> {
    self.queue.poll_inner()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_offer_and_poll_is_fifo() {
    let queue: QueueVec<u32> = QueueVec::new();
    let mut writer = queue.writer();
    let mut reader = queue.reader();

    writer.offer(1).unwrap();
    writer.offer(2).unwrap();
    writer.offer(3).unwrap();

    assert_eq!(queue.len(), QueueSize::Limited(3));
    assert_eq!(reader.poll(), Some(1));
    assert_eq!(reader.poll(), Some(2));
    assert_eq!(reader.poll(), Some(3));
    assert_eq!(reader.poll(), None);
  }

  #[test]
  fn test_offer_first_jumps_the_line() {
    let queue: QueueVec<u32> = QueueVec::new();
    let mut writer = queue.writer();
    let mut reader = queue.reader();

    writer.offer(1).unwrap();
    writer.offer(2).unwrap();
    writer.offer_first(0).unwrap();

    assert_eq!(reader.poll(), Some(0));
    assert_eq!(reader.poll(), Some(1));
    assert_eq!(reader.poll(), Some(2));
  }

  #[test]
  fn test_bounded_offer_rejects_when_full() {
    let queue: QueueVec<u32> = QueueVec::with_num_elements(1);
    let mut writer = queue.writer();

    writer.offer(1).unwrap();
    let result = writer.offer(2);
    assert!(matches!(result, Err(QueueError::Full(2))));

    let result = writer.offer_first(3);
    assert!(matches!(result, Err(QueueError::Full(3))));
  }
}
