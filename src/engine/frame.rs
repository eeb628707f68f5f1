use crate::analysis::spectrum::FRAME_SIZE;

/// Accumulates channel samples into fixed-size analysis frames. Contents are
/// not cleared on completion; every slot is overwritten before the next
/// completion signal.
pub(crate) struct FrameAccumulator {
    samples: Box<[f32]>,
    cursor: usize,
}

impl FrameAccumulator {
    pub(crate) fn new() -> Self {
        Self {
            samples: vec![0.0_f32; FRAME_SIZE].into_boxed_slice(),
            cursor: 0,
        }
    }

    /// Writes one sample and reports whether the frame just completed.
    pub(crate) fn push(&mut self, sample: f32) -> bool {
        self.samples[self.cursor] = sample;
        self.cursor += 1;
        if self.cursor == FRAME_SIZE {
            self.cursor = 0;
            return true;
        }
        false
    }

    pub(crate) fn samples(&self) -> &[f32] {
        &self.samples
    }
}
