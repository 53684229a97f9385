//! Edit Operations Module
//!
//! Pure buffer transformations and the multi-segment merge built on them.

pub mod merge;
pub mod ops;

pub use merge::{merge_segments, MergeReport, SegmentFailure};
pub use ops::{
    concatenate_for_merge, delete_range, extract_range, insert_at_position, insert_silence,
    replace_selection, resample_linear, scale_gain,
};
