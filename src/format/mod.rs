//! Formatting applicator
//!
//! Every toolbar action goes through [`FormattingApplicator`]: restore the
//! last selection, check it is usable, mutate, re-capture.

pub mod applicator;

pub use applicator::{FormatOutcome, FormattingApplicator, SkipReason};
