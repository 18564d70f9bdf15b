//! Audio capture adapters

mod cpal_capture;

pub use cpal_capture::{CpalCapture, CHUNK_INTERVAL_MS, TARGET_SAMPLE_RATE};
