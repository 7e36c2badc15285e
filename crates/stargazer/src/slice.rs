//! Batch and range slicing of the star-event list.
//!
//! A slice spec is a pure function from the full ordered listing to a
//! contiguous sub-range. Batch numbers are 1-indexed; batch N covers
//! `[(N-1)*size, N*size)` clipped to the list length, and a batch past
//! the end is an empty slice, not an error. Invalid batch parameters are
//! a configuration error reported before any I/O happens.

use thiserror::Error;

/// Which part of the star-event list a run processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SliceSpec {
    /// The entire list.
    #[default]
    All,
    /// Fixed-size batch addressed by 1-based batch number.
    Batch { size: usize, number: usize },
    /// Explicit skip/limit offsets.
    Range { skip: usize, limit: Option<usize> },
}

/// Invalid batch parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SliceError {
    #[error("batch size must be at least 1 (got {0})")]
    BatchSize(usize),

    #[error("batch number is 1-based and must be at least 1 (got {0})")]
    BatchNumber(usize),
}

impl SliceSpec {
    /// Build a spec from the configuration surface.
    ///
    /// Batch mode takes precedence: when a batch number is given, skip
    /// and limit are ignored. Without one, explicit skip/limit apply, and
    /// with neither the whole list is selected.
    pub fn from_options(
        batch_size: Option<usize>,
        batch_number: Option<usize>,
        skip: Option<usize>,
        limit: Option<usize>,
        default_batch_size: usize,
    ) -> Result<Self, SliceError> {
        let spec = match batch_number {
            Some(number) => Self::Batch {
                size: batch_size.unwrap_or(default_batch_size),
                number,
            },
            None if skip.is_some() || limit.is_some() => Self::Range {
                skip: skip.unwrap_or(0),
                limit,
            },
            None => Self::All,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Validate batch parameters.
    pub fn validate(&self) -> Result<(), SliceError> {
        if let Self::Batch { size, number } = self {
            if *size == 0 {
                return Err(SliceError::BatchSize(*size));
            }
            if *number == 0 {
                return Err(SliceError::BatchNumber(*number));
            }
        }
        Ok(())
    }

    /// The slice as (skip, limit) offsets.
    pub fn bounds(&self) -> (usize, Option<usize>) {
        match *self {
            Self::All => (0, None),
            Self::Batch { size, number } => ((number - 1) * size, Some(size)),
            Self::Range { skip, limit } => (skip, limit),
        }
    }

    /// Apply the slice to an in-memory list (the `use_existing` path).
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let (skip, limit) = self.bounds();
        let iter = items.into_iter().skip(skip);
        match limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }

    /// Short label used in artifact names and progress output.
    pub fn label(&self) -> Option<String> {
        match *self {
            Self::All => None,
            Self::Batch { number, .. } => Some(format!("batch_{number}")),
            Self::Range { skip, limit } => Some(match limit {
                Some(limit) => format!("skip_{skip}_limit_{limit}"),
                None => format!("skip_{skip}"),
            }),
        }
    }
}
