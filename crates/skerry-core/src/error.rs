//! Validation errors for model topology and constraint-row inputs.

use std::error::Error;
use std::fmt;

/// Errors detected by [`Model::validate`](crate::Model::validate) and by
/// the constraint-row constructors.
///
/// These describe malformed inputs. They are reported before a
/// decomposition call so that the call itself only ever sees indices that
/// are in range.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModelError {
    /// An array does not have the length implied by a count.
    LengthMismatch {
        /// Name of the offending array.
        array: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// An array entry refers past the end of the collection it indexes.
    IndexOutOfRange {
        /// Name of the offending array.
        array: &'static str,
        /// Position of the entry within the array.
        index: usize,
        /// The out-of-range value.
        value: usize,
        /// Exclusive upper bound the value must respect.
        bound: usize,
    },
    /// A count does not fit the `i32` index slots used for outputs.
    TooLarge {
        /// What was counted.
        what: &'static str,
        /// The count.
        count: usize,
    },
    /// The Jacobian shape disagrees with the row count or `nv`.
    JacobianShape {
        /// Jacobian rows.
        rows: usize,
        /// Jacobian columns.
        cols: usize,
        /// Expected rows (`nefc`).
        expected_rows: usize,
        /// Expected columns (`nv`).
        expected_cols: usize,
    },
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch {
                array,
                expected,
                actual,
            } => {
                write!(f, "{array}: expected length {expected}, got {actual}")
            }
            Self::IndexOutOfRange {
                array,
                index,
                value,
                bound,
            } => {
                write!(f, "{array}[{index}] = {value} out of range (bound {bound})")
            }
            Self::TooLarge { what, count } => {
                write!(f, "{what} = {count} exceeds the index slot range")
            }
            Self::JacobianShape {
                rows,
                cols,
                expected_rows,
                expected_cols,
            } => {
                write!(
                    f,
                    "jacobian is {rows}x{cols}, expected {expected_rows}x{expected_cols}"
                )
            }
        }
    }
}

impl Error for ModelError {}
