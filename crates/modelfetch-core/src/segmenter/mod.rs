//! Range math and segment planning for multi-connection transfers.

mod range;

pub use range::{plan_segments, Segment, MIN_SEGMENT_BYTES};
