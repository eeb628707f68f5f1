use std::fmt::Write as _;

use crate::recording::DataPoint;

/// Column header of an exported session.
pub const CSV_HEADER: &str = "Timestamp_Seconds,Activation_Score,Spectral_Centroid,Spectral_Harshness,Dynamic_Variability,Temporal_Unpredictability,RMS_Level";

/// Renders the log as CSV text, one row per point in insertion order, with a
/// trailing newline and no metadata rows.
pub(crate) fn serialize(points: &[DataPoint]) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + points.len() * 48);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for point in points {
        let _ = writeln!(
            out,
            "{:.3},{:.2},{:.4},{:.4},{:.4},{:.4},{:.6}",
            point.elapsed_seconds,
            point.activation_score,
            point.spectral_centroid,
            point.spectral_harshness,
            point.dynamic_variability,
            point.temporal_unpredictability,
            point.rms_level
        );
    }
    out
}
