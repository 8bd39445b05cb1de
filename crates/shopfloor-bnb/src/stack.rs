// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Frame-structured stack of pending decisions.
//!
//! Every tree level owns a contiguous segment of `entries`. Builders produce
//! decisions best first; `extend` reverses the new segment so that `pop`,
//! which takes from the back, hands out the best decision first.

use crate::branching::decision::Decision;

/// A frame-structured LIFO stack of pending decisions.
#[derive(Clone, Debug)]
pub struct SearchStack<T> {
    /// The linear stack of pending decisions.
    entries: Vec<Decision<T>>,
    /// `frames[i]` stores the index in `entries` where depth `i` began.
    frames: Vec<usize>,
}

impl<T> Default for SearchStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SearchStack<T> {
    /// Creates a new, empty stack.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Creates a stack sized for a full descent: at most `num_jobs` pending
    /// decisions per level and `num_operations + 1` levels.
    #[inline]
    pub fn preallocated(num_jobs: usize, num_operations: usize) -> Self {
        Self {
            entries: Vec::with_capacity(num_jobs.saturating_mul(num_operations)),
            frames: Vec::with_capacity(num_operations.saturating_add(1)),
        }
    }

    /// Grows the buffers to the sizes `preallocated` would reserve.
    #[inline]
    pub fn ensure_capacity(&mut self, num_jobs: usize, num_operations: usize) {
        let entry_capacity = num_jobs.saturating_mul(num_operations);
        let frame_capacity = num_operations.saturating_add(1);

        if self.entries.capacity() < entry_capacity {
            self.entries.reserve(entry_capacity - self.entries.len());
        }
        if self.frames.capacity() < frame_capacity {
            self.frames.reserve(frame_capacity - self.frames.len());
        }
    }

    /// Returns the number of pending decisions over all levels.
    #[cfg(test)]
    #[inline]
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the current search depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if there are no frames (search exhausted).
    #[cfg(test)]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Opens a new level.
    #[inline]
    pub fn push_frame(&mut self) {
        self.frames.push(self.entries.len());
    }

    /// Closes the current level, discarding its remaining decisions.
    #[inline]
    pub fn pop_frame(&mut self) -> Option<()> {
        let start = self.frames.pop()?;
        self.entries.truncate(start);
        Some(())
    }

    /// Enqueues `iter`, given best first, on the current level.
    /// Returns the number of decisions added.
    #[inline]
    pub fn extend<I>(&mut self, iter: I) -> usize
    where
        I: IntoIterator<Item = Decision<T>>,
    {
        let start = self.entries.len();
        self.entries.extend(iter);
        self.entries[start..].reverse();
        self.entries.len() - start
    }

    /// Pops the best remaining decision of the current level.
    #[inline]
    pub fn pop(&mut self) -> Option<Decision<T>> {
        match self.frames.last() {
            Some(&start) if self.entries.len() > start => self.entries.pop(),
            _ => None,
        }
    }

    /// Returns `true` if the current level has no remaining decisions.
    #[inline]
    pub fn is_current_level_empty(&self) -> bool {
        match self.frames.last() {
            Some(&start) => self.entries.len() == start,
            None => true,
        }
    }

    /// Returns the pending decisions of the current level, worst first.
    #[cfg(test)]
    #[inline]
    pub fn current_frame_entries(&self) -> &[Decision<T>] {
        match self.frames.last() {
            Some(&start) => &self.entries[start..],
            None => &[],
        }
    }

    /// Clears all entries and frames, keeping the allocation.
    #[inline]
    pub fn reset(&mut self) {
        self.entries.clear();
        self.frames.clear();
    }
}

impl<T> std::fmt::Display for SearchStack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SearchStack(entries: {}, frames: {})",
            self.entries.len(),
            self.frames.len()
        )
    }
}
