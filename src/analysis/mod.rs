//! Spectral transform, feature extraction, and activation scoring.

pub(crate) mod features;
pub(crate) mod score;
pub(crate) mod spectrum;

pub use score::ScoreBand;
pub use spectrum::{FRAME_SIZE, SPECTRUM_BINS};
