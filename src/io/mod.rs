//! Input/output module - annotation, BED and BAM handling

pub mod annotation;
pub mod bam;
pub mod bed;
