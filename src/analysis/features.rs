use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;

/// Normalized per-frame features, each in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub(crate) struct FrameFeatures {
    pub(crate) spectral_centroid: f32,
    pub(crate) spectral_harshness: f32,
    pub(crate) dynamic_variability: f32,
    pub(crate) temporal_unpredictability: f32,
}

pub(crate) fn extract(
    magnitudes: &[f32],
    loudness_history: &[f32],
    sample_rate: f64,
    config: &EngineConfig,
) -> FrameFeatures {
    FrameFeatures {
        spectral_centroid: spectral_centroid(magnitudes, sample_rate, config.centroid_ceiling_hz),
        spectral_harshness: spectral_harshness(
            magnitudes,
            sample_rate,
            config.harshness_crossover_hz,
            config.harshness_gain,
        ),
        dynamic_variability: dynamic_variability(loudness_history, config.variability_gain),
        temporal_unpredictability: temporal_unpredictability(
            loudness_history,
            config.unpredictability_gain,
        ),
    }
}

/// Magnitude-weighted mean frequency, normalized against `ceiling_hz`.
pub(crate) fn spectral_centroid(magnitudes: &[f32], sample_rate: f64, ceiling_hz: f32) -> f32 {
    let mut sum = 0.0_f64;
    let mut weighted = 0.0_f64;
    let fft_len = (magnitudes.len() * 2).max(1) as f64;
    let sr = sample_rate.max(1.0);
    for (bin, &mag) in magnitudes.iter().enumerate() {
        let mag = mag.max(0.0) as f64;
        sum += mag;
        weighted += mag * (bin as f64 * sr / fft_len);
    }
    if sum <= 0.0 {
        return 0.0;
    }
    let centroid_hz = weighted / sum;
    ((centroid_hz / ceiling_hz.max(1.0) as f64) as f32).clamp(0.0, 1.0)
}

/// Share of magnitude above the crossover frequency, scaled by `gain`.
pub(crate) fn spectral_harshness(
    magnitudes: &[f32],
    sample_rate: f64,
    crossover_hz: f32,
    gain: f32,
) -> f32 {
    let cross = crossover_bin(crossover_hz, sample_rate, magnitudes.len() * 2);
    let mut low = 0.0_f64;
    let mut high = 0.0_f64;
    for (bin, &mag) in magnitudes.iter().enumerate() {
        let mag = mag.max(0.0) as f64;
        if bin < cross {
            low += mag;
        } else {
            high += mag;
        }
    }
    let total = low + high;
    if total <= 0.0 {
        return 0.0;
    }
    ((high / total * gain.max(0.0) as f64) as f32).clamp(0.0, 1.0)
}

/// Population standard deviation of the loudness history, scaled by `gain`.
pub(crate) fn dynamic_variability(history: &[f32], gain: f32) -> f32 {
    if history.is_empty() {
        return 0.0;
    }
    let mut sum = 0.0_f64;
    for &value in history {
        sum += value as f64;
    }
    let mean = sum / history.len() as f64;
    let mut variance = 0.0_f64;
    for &value in history {
        let diff = value as f64 - mean;
        variance += diff * diff;
    }
    let std_dev = (variance / history.len() as f64).max(0.0).sqrt();
    ((std_dev * gain.max(0.0) as f64) as f32).clamp(0.0, 1.0)
}

/// Mean absolute delta between consecutive loudness values, scaled by `gain`.
/// `history` must be in chronological order.
pub(crate) fn temporal_unpredictability(history: &[f32], gain: f32) -> f32 {
    if history.len() < 2 {
        return 0.0;
    }
    let mut sum = 0.0_f64;
    for pair in history.windows(2) {
        sum += (pair[1] as f64 - pair[0] as f64).abs();
    }
    let mean_diff = sum / (history.len() - 1) as f64;
    ((mean_diff * gain.max(0.0) as f64) as f32).clamp(0.0, 1.0)
}

fn crossover_bin(crossover_hz: f32, sample_rate: f64, fft_len: usize) -> usize {
    let sr = sample_rate.max(1.0);
    (crossover_hz.max(0.0) as f64 * fft_len as f64 / sr).floor() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::spectrum::SPECTRUM_BINS;
    use rand::Rng;

    const SAMPLE_RATE: f64 = 44_100.0;

    #[test]
    fn zero_magnitudes_yield_zero_spectral_features() {
        let magnitudes = vec![0.0_f32; SPECTRUM_BINS];
        assert_eq!(spectral_centroid(&magnitudes, SAMPLE_RATE, 8_000.0), 0.0);
        assert_eq!(
            spectral_harshness(&magnitudes, SAMPLE_RATE, 2_000.0, 2.0),
            0.0
        );
    }

    #[test]
    fn centroid_matches_single_active_bin() {
        let mut magnitudes = vec![0.0_f32; SPECTRUM_BINS];
        let bin = 200usize;
        magnitudes[bin] = 1.0;
        let expected_hz = bin as f64 * SAMPLE_RATE / (SPECTRUM_BINS * 2) as f64;
        let centroid = spectral_centroid(&magnitudes, SAMPLE_RATE, 8_000.0);
        assert!((centroid as f64 - expected_hz / 8_000.0).abs() < 1e-5);
    }

    #[test]
    fn centroid_is_amplitude_invariant() {
        let mut magnitudes = vec![0.0_f32; SPECTRUM_BINS];
        for (bin, mag) in magnitudes.iter_mut().enumerate() {
            *mag = (bin % 17) as f32 * 0.1;
        }
        let scaled: Vec<f32> = magnitudes.iter().map(|&m| m * 10.0).collect();
        let base = spectral_centroid(&magnitudes, SAMPLE_RATE, 8_000.0);
        let boosted = spectral_centroid(&scaled, SAMPLE_RATE, 8_000.0);
        assert!((base - boosted).abs() < 1e-6);
    }

    #[test]
    fn harshness_is_amplitude_invariant() {
        let mut magnitudes = vec![0.0_f32; SPECTRUM_BINS];
        magnitudes[10] = 3.0;
        magnitudes[50] = 2.0;
        magnitudes[500] = 1.0;
        let scaled: Vec<f32> = magnitudes.iter().map(|&m| m * 10.0).collect();
        let base = spectral_harshness(&magnitudes, SAMPLE_RATE, 2_000.0, 2.0);
        let boosted = spectral_harshness(&scaled, SAMPLE_RATE, 2_000.0, 2.0);
        assert!(base > 0.0 && base < 1.0);
        assert!((base - boosted).abs() < 1e-6);
    }

    #[test]
    fn harshness_splits_energy_at_crossover_bin() {
        let cross = crossover_bin(2_000.0, SAMPLE_RATE, SPECTRUM_BINS * 2);
        assert_eq!(cross, 92);

        let mut magnitudes = vec![0.0_f32; SPECTRUM_BINS];
        magnitudes[cross - 1] = 1.0;
        assert_eq!(
            spectral_harshness(&magnitudes, SAMPLE_RATE, 2_000.0, 2.0),
            0.0
        );

        magnitudes[cross - 1] = 0.0;
        magnitudes[cross] = 1.0;
        assert_eq!(
            spectral_harshness(&magnitudes, SAMPLE_RATE, 2_000.0, 2.0),
            1.0
        );
    }

    #[test]
    fn harshness_gain_saturates_at_one() {
        let mut magnitudes = vec![0.0_f32; SPECTRUM_BINS];
        magnitudes[500] = 1.0;
        magnitudes[10] = 1.0;
        let harshness = spectral_harshness(&magnitudes, SAMPLE_RATE, 2_000.0, 2.0);
        assert!((harshness - 1.0).abs() < 1e-6);
    }

    #[test]
    fn constant_history_has_no_variability() {
        let history = vec![0.3_f32; 100];
        assert_eq!(dynamic_variability(&history, 20.0), 0.0);
        assert_eq!(temporal_unpredictability(&history, 50.0), 0.0);
    }

    #[test]
    fn alternating_history_saturates_both_temporal_features() {
        let history: Vec<f32> = (0..100)
            .map(|i| if i % 2 == 0 { 0.0 } else { 0.5 })
            .collect();
        assert!((dynamic_variability(&history, 20.0) - 1.0).abs() < 1e-6);
        assert!((temporal_unpredictability(&history, 50.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ramp_history_varies_more_than_it_jumps() {
        let history: Vec<f32> = (0..100).map(|i| i as f32 * 0.001).collect();
        let variability = dynamic_variability(&history, 20.0);
        let unpredictability = temporal_unpredictability(&history, 50.0);
        assert!(variability > 0.0);
        assert!(unpredictability > 0.0);
        assert!(variability > unpredictability);
    }

    #[test]
    fn features_stay_in_unit_range_for_random_input() {
        let mut rng = rand::rng();
        let config = EngineConfig::default();
        for _ in 0..50 {
            let magnitudes: Vec<f32> = (0..SPECTRUM_BINS)
                .map(|_| rng.random_range(0.0..10.0))
                .collect();
            let history: Vec<f32> = (0..100).map(|_| rng.random_range(0.0..1.0)).collect();
            let features = extract(&magnitudes, &history, SAMPLE_RATE, &config);
            for value in [
                features.spectral_centroid,
                features.spectral_harshness,
                features.dynamic_variability,
                features.temporal_unpredictability,
            ] {
                assert!((0.0..=1.0).contains(&value));
                assert!(value.is_finite());
            }
        }
    }
}
