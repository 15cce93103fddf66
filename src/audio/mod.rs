mod file;

pub use file::{AudioFile, TARGET_CHANNELS, TARGET_SAMPLE_RATE};
