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

//! # Strongly Typed Indices
//!
//! Phantom-tagged wrappers around `usize` that keep job and machine indices
//! apart at compile time. `TypedIndex<T>` is `#[repr(transparent)]`, so it
//! costs nothing at runtime.
//!
//! ```rust
//! use shopfloor_model::index::{JobIndex, MachineIndex};
//!
//! let job = JobIndex::new(3);
//! let machine = MachineIndex::new(1);
//! assert_eq!(job.get(), 3);
//! assert_eq!(format!("{}", machine), "MachineIndex(1)");
//! ```

/// Names a family of typed indices for `Debug` and `Display` output.
pub trait TypedIndexTag: Clone {
    const NAME: &'static str;
}

/// A `usize` index tagged with the domain it belongs to.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedIndex<T> {
    index: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T> TypedIndex<T> {
    /// Creates a new typed index.
    #[inline(always)]
    pub const fn new(index: usize) -> Self {
        Self {
            index,
            _marker: std::marker::PhantomData,
        }
    }

    /// Returns the underlying `usize`.
    #[inline(always)]
    pub const fn get(&self) -> usize {
        self.index
    }
}

impl<T> std::fmt::Debug for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> std::fmt::Display for TypedIndex<T>
where
    T: TypedIndexTag,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", T::NAME, self.index)
    }
}

impl<T> From<usize> for TypedIndex<T> {
    #[inline(always)]
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

impl<T> From<TypedIndex<T>> for usize {
    #[inline(always)]
    fn from(index: TypedIndex<T>) -> Self {
        index.index
    }
}

/// A tag type for job indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct JobIndexTag;

impl TypedIndexTag for JobIndexTag {
    const NAME: &'static str = "JobIndex";
}

/// A typed index for jobs.
pub type JobIndex = TypedIndex<JobIndexTag>;

/// A tag type for machine indices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct MachineIndexTag;

impl TypedIndexTag for MachineIndexTag {
    const NAME: &'static str = "MachineIndex";
}

/// A typed index for machines.
pub type MachineIndex = TypedIndex<MachineIndexTag>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_and_debug_use_tag_name() {
        let job = JobIndex::new(7);
        assert_eq!(format!("{}", job), "JobIndex(7)");
        assert_eq!(format!("{:?}", MachineIndex::new(2)), "MachineIndex(2)");
    }

    #[test]
    fn test_conversions_round_trip_through_usize() {
        let job: JobIndex = 4usize.into();
        let raw: usize = job.into();
        assert_eq!(raw, 4);
        assert!(JobIndex::new(1) < JobIndex::new(2));
    }
}
