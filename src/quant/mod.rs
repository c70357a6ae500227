//! Quantification module - per-region read counting and the count matrix

pub mod align_counts;
pub mod matrix;
