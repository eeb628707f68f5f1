use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

/// Samples accumulated before each analysis pass.
pub const FRAME_SIZE: usize = 2048;
/// Magnitude bins produced per frame, DC up to just below Nyquist.
pub const SPECTRUM_BINS: usize = FRAME_SIZE / 2;

pub(crate) fn hann_window(length: usize) -> Vec<f32> {
    if length <= 1 {
        return vec![1.0_f32; length.max(1)];
    }
    let denom = (length - 1) as f32;
    (0..length)
        .map(|n| 0.5_f32 * (1.0 - (2.0 * PI * n as f32 / denom).cos()))
        .collect()
}

/// Windowed forward transform with a preplanned FFT and reused work buffers.
pub(crate) struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl SpectrumAnalyzer {
    pub(crate) fn new() -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(FRAME_SIZE);
        let scratch_len = fft.get_inplace_scratch_len();
        Self {
            fft,
            window: hann_window(FRAME_SIZE),
            buffer: vec![Complex::new(0.0, 0.0); FRAME_SIZE],
            scratch: vec![Complex::new(0.0, 0.0); scratch_len],
            magnitudes: vec![0.0_f32; SPECTRUM_BINS],
        }
    }

    /// Computes the magnitude spectrum of one frame. The source frame is left
    /// untouched; the returned slice is valid until the next call.
    pub(crate) fn process(&mut self, frame: &[f32]) -> &[f32] {
        debug_assert_eq!(frame.len(), FRAME_SIZE);
        for (cell, (&sample, &win)) in self.buffer.iter_mut().zip(frame.iter().zip(&self.window)) {
            *cell = Complex::new(sample * win, 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);
        for (mag, c) in self.magnitudes.iter_mut().zip(&self.buffer[..SPECTRUM_BINS]) {
            *mag = c.norm();
        }
        &self.magnitudes
    }
}
