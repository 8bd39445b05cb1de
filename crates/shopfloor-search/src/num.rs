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

//! # Solver Numeric Trait
//!
//! Collects the integer capabilities the search components need into one
//! bound. Time values are signed primitive integers that convert losslessly
//! into `i64` (the representation of the shared incumbent's atomic bound)
//! and back with a checked conversion.
//!
//! `i128` does not satisfy `Into<i64>` and is therefore excluded.

use num_traits::{FromPrimitive, PrimInt, Signed};
use std::hash::Hash;

/// A trait alias for time types usable by the solvers.
///
/// Implemented for `i8`, `i16`, `i32` and `i64`.
pub trait SolverNumeric:
    PrimInt
    + Signed
    + FromPrimitive
    + Into<i64>
    + TryFrom<i64>
    + std::str::FromStr
    + std::fmt::Debug
    + std::fmt::Display
    + Send
    + Sync
    + Hash
{
}

impl<T> SolverNumeric for T where
    T: PrimInt
        + Signed
        + FromPrimitive
        + Into<i64>
        + TryFrom<i64>
        + std::str::FromStr
        + std::fmt::Debug
        + std::fmt::Display
        + Send
        + Sync
        + Hash
{
}

#[cfg(test)]
mod tests {
    use super::SolverNumeric;

    fn accepts<T: SolverNumeric>(value: T) -> i64 {
        value.into()
    }

    #[test]
    fn test_common_integer_widths_qualify() {
        assert_eq!(accepts(7i8), 7);
        assert_eq!(accepts(-7i16), -7);
        assert_eq!(accepts(70_000i32), 70_000);
        assert_eq!(accepts(i64::MAX), i64::MAX);
    }
}
