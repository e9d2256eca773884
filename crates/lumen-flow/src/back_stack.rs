//! Navigation history

use lumen_core::settings::DEFAULT_MAX_HISTORY;

use crate::destination::Destination;

/// History of visited destinations
///
/// The top entry is the current step. The root destination is the implicit
/// base and is never stored, so an empty stack means "at root".
#[derive(Debug, Clone)]
pub struct BackStack {
    history: Vec<Destination>,
    max_depth: usize,
    root: Destination,
}

impl BackStack {
    pub fn new(root: Destination) -> Self {
        Self::with_max_depth(root, DEFAULT_MAX_HISTORY)
    }

    pub fn with_max_depth(root: Destination, max_depth: usize) -> Self {
        Self {
            history: Vec::new(),
            max_depth: max_depth.max(1),
            root,
        }
    }

    /// Push a destination, returning the entry dropped to stay within the
    /// depth limit
    ///
    /// Pushing the destination already on top is a no-op, and the root is
    /// never stored.
    pub fn push(&mut self, destination: Destination) -> Option<Destination> {
        if destination == self.root || self.history.last() == Some(&destination) {
            return None;
        }

        let evicted = if self.history.len() >= self.max_depth {
            Some(self.history.remove(0))
        } else {
            None
        };

        self.history.push(destination);
        evicted
    }

    /// Remove the current entry and return the one below it
    pub fn pop(&mut self) -> Destination {
        self.history.pop();
        self.current()
    }

    pub fn current(&self) -> Destination {
        self.history
            .last()
            .cloned()
            .unwrap_or_else(|| self.root.clone())
    }

    pub fn root(&self) -> &Destination {
        &self.root
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Drop everything above `depth`
    pub fn truncate(&mut self, depth: usize) {
        self.history.truncate(depth);
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Destination> {
        self.history.iter()
    }
}
