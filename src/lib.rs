//! Fixed-capacity ring buffer of `f64` samples that keeps a running sum of
//! its contents, for rolling sums and averages over a sliding window.

pub mod config;
pub mod error;
pub mod models;
pub mod util;

pub use error::{RingBufferError, RingResult};
pub use util::ring_buffer::{RingBuffer, Snapshot};
