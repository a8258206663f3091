//! Plain-text motion log layout
//!
//! One sample per line, comma separated, no header:
//!
//! ```text
//! t,px,py,pz,qx,qy,qz,qw
//! ```
//!
//! This is the layout the offline path analyser reads from `<id>.txt`.
//! Lines are joined with `\n` and the file has no trailing newline.

use std::path::Path;

use crate::error::{RecorderError, Result};
use crate::session::MotionLog;
use crate::types::{Quat, Sample, Vec3};

/// Number of comma-separated fields per line
pub const FIELDS_PER_LINE: usize = 8;

/// File extension used for text exports
pub const TEXT_EXTENSION: &str = "txt";

/// Format a single sample as a line
pub fn format_sample(sample: &Sample) -> String {
    sample
        .components()
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a single line into a sample
pub fn parse_sample(line: &str, line_no: usize) -> Result<Sample> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELDS_PER_LINE {
        return Err(RecorderError::CorruptData(format!(
            "line {}: expected {} fields, found {}",
            line_no,
            FIELDS_PER_LINE,
            fields.len()
        )));
    }

    let mut values = [0.0f32; FIELDS_PER_LINE];
    for (slot, field) in values.iter_mut().zip(fields.iter()) {
        *slot = field.parse::<f32>().map_err(|e| {
            RecorderError::CorruptData(format!("line {}: bad number {:?}: {}", line_no, field, e))
        })?;
    }

    let [t, px, py, pz, qx, qy, qz, qw] = values;
    Ok(Sample::new(
        t,
        Vec3::new(px, py, pz),
        Quat::new(qx, qy, qz, qw),
    ))
}

/// Encode a whole log
pub fn encode(log: &MotionLog) -> String {
    log.samples()
        .iter()
        .map(format_sample)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Decode a whole log, skipping blank lines
pub fn decode(text: &str) -> Result<MotionLog> {
    let mut samples = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        samples.push(parse_sample(line, idx + 1)?);
    }
    MotionLog::from_samples(samples)
        .map_err(|e| RecorderError::CorruptData(format!("invalid sample sequence: {}", e)))
}

/// Write a log to a text file
pub fn write_file(path: &Path, log: &MotionLog) -> Result<()> {
    std::fs::write(path, encode(log))?;
    tracing::debug!("Exported {} samples to {:?}", log.len(), path);
    Ok(())
}

/// Read a log from a text file
pub fn read_file(path: &Path) -> Result<MotionLog> {
    let text = std::fs::read_to_string(path)?;
    decode(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_sample() {
        let sample = Sample::new(1.5, Vec3::new(0.0, 1.25, -2.0), Quat::IDENTITY);
        assert_eq!(format_sample(&sample), "1.5,0,1.25,-2,0,0,0,1");
    }

    #[test]
    fn test_encode_has_no_trailing_newline() {
        let mut log = MotionLog::new();
        log.append(0.1, Vec3::ZERO, Quat::IDENTITY).unwrap();
        log.append(0.2, Vec3::ZERO, Quat::IDENTITY).unwrap();
        let text = encode(&log);
        assert_eq!(text.lines().count(), 2);
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_decode_text() {
        let text = "0.016,0,1.7,0,0,0,0,1\n0.033,0.1,1.7,0.2,0,0.7071,0,0.7071\n";
        let log = decode(text).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.samples()[1].position.z, 0.2);
        assert_eq!(log.samples()[1].orientation.y, 0.7071);
    }

    #[test]
    fn test_decode_preserves_f32_exactly() {
        let mut log = MotionLog::new();
        log.append(0.016_666_668, Vec3::new(0.1, 0.2, 0.3), Quat::new(0.1, 0.2, 0.3, 0.9))
            .unwrap();
        let decoded = decode(&encode(&log)).unwrap();
        assert_eq!(decoded, log);
    }

    #[test]
    fn test_decode_rejects_short_line() {
        let err = decode("0.1,0,0,0\n").unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_decode_rejects_bad_number() {
        let err = decode("0.1,0,0,0,0,0,0,one").unwrap_err();
        assert!(matches!(err, RecorderError::CorruptData(_)));
    }

    #[test]
    fn test_decode_rejects_unordered_lines() {
        let err = decode("2,0,0,0,0,0,0,1\n1,0,0,0,0,0,0,1").unwrap_err();
        assert!(matches!(err, RecorderError::CorruptData(_)));
    }
}
