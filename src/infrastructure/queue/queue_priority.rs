use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt::{Debug, Formatter};
use std::sync::{Arc, Mutex};

use crate::infrastructure::queue::{
  Comparator, Element, QueueBehavior, QueueError, QueueRWFactoryBehavior, QueueReaderBehavior,
  QueueReaderFactoryBehavior, QueueSize, QueueWithRWFactoryBehavior, QueueWriterBehavior, QueueWriterFactoryBehavior,
};

/// Priority queue ordered by a caller-supplied comparator; the least element
/// is polled first. The relative order of elements that compare equal is
/// unspecified.
pub struct QueuePriority<E: Element> {
  values: Arc<Mutex<BinaryHeap<PriorityEntry<E>>>>,
  comparator: Comparator<E>,
  capacity: QueueSize,
}

impl<E: Element> Clone for QueuePriority<E> {
  fn clone(&self) -> Self {
    Self {
      values: self.values.clone(),
      comparator: self.comparator.clone(),
      capacity: self.capacity.clone(),
    }
  }
}

#[derive(Clone)]
pub struct QueuePriorityWriter<E: Element> {
  queue: QueuePriority<E>,
}

#[derive(Clone)]
pub struct QueuePriorityReader<E: Element> {
  queue: QueuePriority<E>,
}

struct PriorityEntry<E: Element> {
  element: E,
  comparator: Comparator<E>,
}

impl<E: Element> PartialEq for PriorityEntry<E> {
  fn eq(&self, other: &Self) -> bool {
    (self.comparator)(&self.element, &other.element) == Ordering::Equal
  }
}

impl<E: Element> Eq for PriorityEntry<E> {}

impl<E: Element> PartialOrd for PriorityEntry<E> {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl<E: Element> Ord for PriorityEntry<E> {
  // BinaryHeap pops the greatest entry; reversing makes that the least element.
  fn cmp(&self, other: &Self) -> Ordering {
    (self.comparator)(&self.element, &other.element).reverse()
  }
}

impl<E: Element> QueuePriority<E> {
  pub fn new(comparator: Comparator<E>) -> Self {
    Self {
      values: Arc::new(Mutex::new(BinaryHeap::new())),
      comparator,
      capacity: QueueSize::Limitless,
    }
  }

  pub fn with_num_elements(comparator: Comparator<E>, num_elements: usize) -> Self {
    Self {
      values: Arc::new(Mutex::new(BinaryHeap::with_capacity(num_elements))),
      comparator,
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
    values.push(PriorityEntry {
      element,
      comparator: self.comparator.clone(),
    });
    Ok(())
  }

  fn poll_inner(&self) -> Option<E> {
    let mut values = self.values.lock().unwrap();
    values.pop().map(|entry| entry.element)
  }
}

impl<E: Element> Debug for QueuePriority<E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let values = self.values.lock().unwrap();
    f.debug_struct("QueuePriority")
      .field("len", &values.len())
      .field("capacity", &self.capacity)
      .finish()
  }
}

impl<E: Element> Debug for QueuePriorityWriter<E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("QueuePriorityWriter").field("queue", &self.queue).finish()
  }
}

impl<E: Element> Debug for QueuePriorityReader<E> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("QueuePriorityReader").field("queue", &self.queue).finish()
  }
}

impl<E: Element> QueueBehavior<E> for QueuePriority<E> {
  fn len(&self) -> QueueSize {
    let values = self.values.lock().unwrap();
    QueueSize::Limited(values.len())
  }

  fn capacity(&self) -> QueueSize {
    self.capacity.clone()
  }
}

impl<E: Element> QueueWriterFactoryBehavior<E> for QueuePriority<E> {
  type Writer = QueuePriorityWriter<E>;

  fn writer(&self) -> Self::Writer {
    QueuePriorityWriter { queue: self.clone() }
  }
}

impl<E: Element> QueueReaderFactoryBehavior<E> for QueuePriority<E> {
  type Reader = QueuePriorityReader<E>;

  fn reader(&self) -> Self::Reader {
    QueuePriorityReader { queue: self.clone() }
  }
}

impl<E: Element> QueueRWFactoryBehavior<E> for QueuePriority<E> {}

impl<E: Element> QueueWithRWFactoryBehavior<E> for QueuePriority<E> {}

impl<E: Element> QueueBehavior<E> for QueuePriorityWriter<E> {
  fn len(&self) -> QueueSize {
    self.queue.len()
  }

  fn capacity(&self) -> QueueSize {
    self.queue.capacity()
  }
}

impl<E: Element> QueueWriterBehavior<E> for QueuePriorityWriter<E> {
  fn offer(&mut self, element: E) -> Result<(), QueueError<E>> {
    self.queue.offer_inner(element)
  }
}

impl<E: Element> QueueBehavior<E> for QueuePriorityReader<E> {
  fn len(&self) -> QueueSize {
    self.queue.len()
  }

  fn capacity(&self) -> QueueSize {
    self.queue.capacity()
  }
}

impl<E: Element> QueueReaderBehavior<E> for QueuePriorityReader<E> {
  fn poll(&mut self) -> Option<E> {
    self.queue.poll_inner()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ascending() -> Comparator<u32> {
    Arc::new(|left: &u32, right: &u32| left.cmp(right))
  }

  #[test]
  fn test_poll_follows_comparator_order() {
    let queue = QueuePriority::new(ascending());
    let mut writer = queue.writer();
    let mut reader = queue.reader();

    writer.offer(5).unwrap();
    writer.offer(1).unwrap();
    writer.offer(3).unwrap();

    assert_eq!(reader.poll(), Some(1));
    assert_eq!(reader.poll(), Some(3));
    assert_eq!(reader.poll(), Some(5));
    assert_eq!(reader.poll(), None);
  }

  #[test]
  fn test_bounded_offer_rejects_when_full() {
    let queue = QueuePriority::with_num_elements(ascending(), 2);
    let mut writer = queue.writer();

    writer.offer(1).unwrap();
    writer.offer(2).unwrap();
    assert!(matches!(writer.offer(3), Err(QueueError::Full(3))));
  }
}
