//! Pipeline module - the two batch pipelines exposed on the command line

pub mod convert;
pub mod count;
