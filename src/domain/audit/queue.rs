//! One-shot work queue of files to audit

use std::collections::VecDeque;
use std::path::PathBuf;

/// Ordered files discovered at startup, consumed front to back.
///
/// The queue is never re-populated: each path leaves it exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkQueue {
    files: VecDeque<PathBuf>,
}

impl WorkQueue {
    /// Create a queue from files in audit order
    pub fn new(files: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            files: files.into_iter().collect(),
        }
    }

    /// Take the next file, if any
    pub fn dequeue(&mut self) -> Option<PathBuf> {
        self.files.pop_front()
    }

    /// Number of files still waiting
    pub fn remaining(&self) -> usize {
        self.files.len()
    }

    /// Check if the queue is drained
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Peek at the pending files in order
    pub fn iter(&self) -> impl Iterator<Item = &PathBuf> {
        self.files.iter()
    }
}

impl From<Vec<PathBuf>> for WorkQueue {
    fn from(files: Vec<PathBuf>) -> Self {
        Self::new(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dequeues_front_to_back() {
        let mut queue = WorkQueue::new(vec![PathBuf::from("/in/a.mp3"), PathBuf::from("/in/b.mp3")]);

        assert_eq!(queue.remaining(), 2);
        assert_eq!(queue.dequeue(), Some(PathBuf::from("/in/a.mp3")));
        assert_eq!(queue.remaining(), 1);
        assert_eq!(queue.dequeue(), Some(PathBuf::from("/in/b.mp3")));
        assert!(queue.is_empty());
        assert_eq!(queue.dequeue(), None);
    }

    #[test]
    fn empty_queue() {
        let mut queue = WorkQueue::default();
        assert!(queue.is_empty());
        assert_eq!(queue.dequeue(), None);
    }
}
