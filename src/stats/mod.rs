//! Exact integer summarization of timing samples.
mod summary;


pub use summary::{SampleSummary, summarize, throughput_rps_x100};
