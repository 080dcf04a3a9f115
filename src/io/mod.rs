//! File export of recorded samples.

pub mod export;
