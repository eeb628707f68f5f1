/// Number of per-block loudness values retained.
pub const HISTORY_LEN: usize = 100;

/// Fixed ring of recent block loudness values, zero-filled at start so the
/// temporal features ramp in over the first hundred blocks.
pub(crate) struct LoudnessHistory {
    values: Box<[f32]>,
    write_pos: usize,
}

impl LoudnessHistory {
    pub(crate) fn new() -> Self {
        Self {
            values: vec![0.0_f32; HISTORY_LEN].into_boxed_slice(),
            write_pos: 0,
        }
    }

    pub(crate) fn push(&mut self, value: f32) {
        self.values[self.write_pos] = value;
        self.write_pos = (self.write_pos + 1) % HISTORY_LEN;
    }

    /// Copies the retained values into `target`, oldest first.
    pub(crate) fn copy_ordered_into(&self, target: &mut Vec<f32>) {
        target.clear();
        target.extend_from_slice(&self.values[self.write_pos..]);
        target.extend_from_slice(&self.values[..self.write_pos]);
    }
}
