//! Per-worker scratch lists merged into one ordered list.
//!
//! Each worker appends to its own partition while reading a shared snapshot of the main
//! list. A worker locks its partition once per task, so appends never contend. After the
//! round, [`PartitionedList::flush`] concatenates partitions in index order (lowest partition
//! first, order within a partition preserved).

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

pub struct PartitionedList<T> {
    main: Arc<Vec<T>>,
    partitions: Arc<[Mutex<Vec<T>>]>,
}

/// Append handle for one partition, cheap to clone into a task.
pub struct PartitionWriter<T> {
    partitions: Arc<[Mutex<Vec<T>>]>,
    index: usize,
}

impl<T> Clone for PartitionWriter<T> {
    fn clone(&self) -> Self {
        Self {
            partitions: Arc::clone(&self.partitions),
            index: self.index,
        }
    }
}

impl<T> PartitionWriter<T> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.partitions[self.index].lock()
    }
}

impl<T: Clone> PartitionedList<T> {
    pub fn new(partitions: usize) -> Self {
        Self {
            main: Arc::new(Vec::new()),
            partitions: (0..partitions.max(1))
                .map(|_| Mutex::new(Vec::new()))
                .collect(),
        }
    }

    pub fn partition_count(&self) -> usize {
        self.partitions.len()
    }

    pub fn len(&self) -> usize {
        self.main.len()
    }

    pub fn is_empty(&self) -> bool {
        self.main.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.main
    }

    /// Shared read view of the main list for tasks of the current round.
    pub fn snapshot(&self) -> Arc<Vec<T>> {
        Arc::clone(&self.main)
    }

    pub fn push(&mut self, value: T) {
        Arc::make_mut(&mut self.main).push(value);
    }

    pub fn extend_from_slice(&mut self, values: &[T]) {
        Arc::make_mut(&mut self.main).extend_from_slice(values);
    }

    pub fn writer(&self, index: usize) -> PartitionWriter<T> {
        assert!(index < self.partitions.len(), "partition {index} out of range");
        PartitionWriter {
            partitions: Arc::clone(&self.partitions),
            index,
        }
    }

    pub fn push_to(&self, index: usize, value: T) {
        self.partitions[index].lock().push(value);
    }

    pub fn partition_len(&self, index: usize) -> usize {
        self.partitions[index].lock().len()
    }

    /// Replace the main list with the concatenation of all partitions, in partition order.
    pub fn flush(&mut self) {
        let main = Arc::make_mut(&mut self.main);
        main.clear();
        for partition in self.partitions.iter() {
            main.append(&mut partition.lock());
        }
    }

    /// Replace the main list by interleaving partitions round-robin.
    ///
    /// Undoes a strided split where partition `k` holds items `k, k + n, k + 2n, ...`, so item
    /// `i` lands back at index `i`. Partition lengths must be non-increasing in `k`.
    pub fn flush_strided(&mut self) {
        let main = Arc::make_mut(&mut self.main);
        main.clear();
        let mut guards: Vec<_> = self.partitions.iter().map(|p| p.lock()).collect();
        let total = guards.iter().map(|g| g.len()).sum::<usize>();
        main.reserve(total);
        let mut drains: Vec<_> = guards.iter_mut().map(|g| g.drain(..)).collect();
        loop {
            let mut progressed = false;
            for drain in drains.iter_mut() {
                match drain.next() {
                    Some(v) => {
                        main.push(v);
                        progressed = true;
                    }
                    None => break,
                }
            }
            if !progressed {
                break;
            }
        }
    }

    pub fn clear(&mut self) {
        Arc::make_mut(&mut self.main).clear();
        for partition in self.partitions.iter() {
            partition.lock().clear();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/dispatch/partition.rs"]
mod tests;
