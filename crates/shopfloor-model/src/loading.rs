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

//! Problem instance loader for job-shop benchmark files.
//!
//! Reads the classic whitespace-separated format used by the OR-Library
//! instances (`ft06`, `la01`, ...):
//!
//! ```raw
//! num_jobs num_machines
//! m_0_0 d_0_0  m_0_1 d_0_1  ...   (num_machines pairs for job 0)
//! ...
//! m_n_0 d_n_0  m_n_1 d_n_1  ...   (num_machines pairs for job n - 1)
//! ```
//!
//! Every job lists exactly `num_machines` operations as `machine duration`
//! pairs in processing order. Line breaks carry no meaning, and `#` starts a
//! comment that runs to the end of the line. The finished instance passes
//! through `ModelBuilder::build`, so out-of-range machines and negative
//! durations are reported as `ProblemLoaderError::Model`.

use crate::{
    index::{JobIndex, MachineIndex},
    model::{Model, ModelBuilder, ModelError},
};
use num_traits::{PrimInt, Signed};
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the problem loading process.
#[derive(Debug, thiserror::Error)]
pub enum ProblemLoaderError {
    /// An I/O error occurred while reading the input stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The input stream ended before the instance was complete.
    #[error("unexpected end of file while parsing instance")]
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    #[error("could not parse token '{token}' as type {type_name}")]
    Parse {
        token: String,
        type_name: &'static str,
    },
    /// The header announced zero or negative dimensions.
    #[error("problem dimensions must be positive integers")]
    InvalidDimensions,
    /// The parsed instance is malformed.
    #[error("invalid instance: {0}")]
    Model(#[from] ModelError),
}

/// Loader for job-shop instances in the OR-Library text format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProblemLoader;

impl ProblemLoader {
    /// Creates a new loader.
    #[inline]
    pub fn new() -> Self {
        Self
    }

    /// Loads a problem from a type implementing `BufRead`.
    pub fn from_bufread<T, R>(&self, rdr: R) -> Result<Model<T>, ProblemLoaderError>
    where
        T: PrimInt + Signed + FromStr,
        R: BufRead,
    {
        let mut sc = Scanner::new(rdr);

        let num_jobs: i64 = sc.next()?;
        let num_machines: i64 = sc.next()?;
        if num_jobs <= 0 || num_machines <= 0 {
            return Err(ProblemLoaderError::InvalidDimensions);
        }
        let num_jobs =
            usize::try_from(num_jobs).map_err(|_| ProblemLoaderError::InvalidDimensions)?;
        let num_machines =
            usize::try_from(num_machines).map_err(|_| ProblemLoaderError::InvalidDimensions)?;

        let mut builder = ModelBuilder::new(num_jobs, num_machines);
        for j in 0..num_jobs {
            let job = JobIndex::new(j);
            for _ in 0..num_machines {
                let machine: usize = sc.next()?;
                let duration: T = sc.next()?;
                builder.add_operation(job, MachineIndex::new(machine), duration);
            }
        }

        Ok(builder.build()?)
    }

    /// Loads a problem from a file path.
    #[inline]
    pub fn from_path<T, P>(&self, path: P) -> Result<Model<T>, ProblemLoaderError>
    where
        T: PrimInt + Signed + FromStr,
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a problem from a generic reader.
    #[inline]
    pub fn from_reader<T, R>(&self, r: R) -> Result<Model<T>, ProblemLoaderError>
    where
        T: PrimInt + Signed + FromStr,
        R: Read,
    {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a problem from a string slice.
    #[inline]
    pub fn from_str<T>(&self, s: &str) -> Result<Model<T>, ProblemLoaderError>
    where
        T: PrimInt + Signed + FromStr,
    {
        self.from_bufread(s.as_bytes())
    }
}

/// Reads whitespace-delimited tokens line by line, skipping `#` comments.
struct Scanner<R> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    /// Refills the line buffer. Returns `Ok(false)` on EOF.
    #[inline]
    fn fill_line(&mut self) -> Result<bool, ProblemLoaderError> {
        self.buf.clear();
        self.pos = 0;
        let n = self.rdr.read_line(&mut self.buf)?;
        if let Some(comment) = self.buf.find('#') {
            self.buf.truncate(comment);
        }
        Ok(n > 0)
    }

    fn next<T>(&mut self) -> Result<T, ProblemLoaderError>
    where
        T: FromStr,
    {
        loop {
            let rest = &self.buf[self.pos..];
            let trimmed = rest.trim_start();
            if trimmed.is_empty() {
                if !self.fill_line()? {
                    return Err(ProblemLoaderError::UnexpectedEof);
                }
                continue;
            }

            let skipped = rest.len() - trimmed.len();
            let len = trimmed
                .find(char::is_whitespace)
                .unwrap_or(trimmed.len());
            let token = &trimmed[..len];
            self.pos += skipped + len;

            return token.parse::<T>().map_err(|_| ProblemLoaderError::Parse {
                token: token.to_owned(),
                type_name: std::any::type_name::<T>(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type IntegerType = i64;

    const TWO_BY_TWO: &str = "\
# two jobs, two machines
2 2
0 3 1 2   # job 0
1 2 0 1   # job 1
";

    #[test]
    fn test_loads_small_instance_with_comments() {
        let model: Model<IntegerType> = ProblemLoader::new().from_str(TWO_BY_TWO).unwrap();
        assert_eq!(model.num_jobs(), 2);
        assert_eq!(model.num_machines(), 2);
        assert_eq!(model.operation(JobIndex::new(1), 0).machine(), MachineIndex::new(1));
        assert_eq!(model.operation(JobIndex::new(1), 1).duration(), 1);
        assert_eq!(model.total_work(), 8);
    }

    #[test]
    fn test_tokens_may_span_lines_arbitrarily() {
        let text = "2\n2 0\n3\n1 2 1 2 0 1";
        let model: Model<IntegerType> = ProblemLoader::new().from_str(text).unwrap();
        assert_eq!(model.remaining_work(JobIndex::new(0), 0), 5);
    }

    #[test]
    fn test_truncated_input_reports_eof() {
        let result: Result<Model<IntegerType>, _> =
            ProblemLoader::new().from_str("2 2\n0 3 1 2\n1 2");
        assert!(matches!(result, Err(ProblemLoaderError::UnexpectedEof)));
    }

    #[test]
    fn test_garbage_token_reports_parse_error() {
        let result: Result<Model<IntegerType>, _> = ProblemLoader::new().from_str("1 1\n0 x");
        match result {
            Err(ProblemLoaderError::Parse { token, .. }) => assert_eq!(token, "x"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_dimensions_are_rejected() {
        let result: Result<Model<IntegerType>, _> = ProblemLoader::new().from_str("0 3");
        assert!(matches!(result, Err(ProblemLoaderError::InvalidDimensions)));
    }

    #[test]
    fn test_out_of_range_machine_surfaces_model_error() {
        let result: Result<Model<IntegerType>, _> = ProblemLoader::new().from_str("1 2\n0 1 7 1");
        assert!(matches!(
            result,
            Err(ProblemLoaderError::Model(ModelError::MachineOutOfRange { machine: 7, .. }))
        ));
    }

    #[test]
    fn test_repeated_machine_surfaces_model_error() {
        let result: Result<Model<IntegerType>, _> = ProblemLoader::new().from_str("1 2\n1 4 1 3");
        assert!(matches!(
            result,
            Err(ProblemLoaderError::Model(ModelError::DuplicateMachine { machine: 1, .. }))
        ));
    }

    #[test]
    fn test_negative_duration_surfaces_model_error() {
        let result: Result<Model<IntegerType>, _> = ProblemLoader::new().from_str("1 1\n0 -4");
        assert!(matches!(
            result,
            Err(ProblemLoaderError::Model(ModelError::NegativeDuration { .. }))
        ));
    }

    #[test]
    fn test_missing_file_reports_io_error() {
        let result: Result<Model<IntegerType>, _> =
            ProblemLoader::new().from_path("/definitely/not/here.txt");
        assert!(matches!(result, Err(ProblemLoaderError::Io(_))));
    }
}
