//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;

use motion_recorder::{MotionLog, Sample};

/// Assert two floats are approximately equal
pub fn assert_float_eq(a: f32, b: f32, epsilon: f32) {
    assert!(
        (a - b).abs() < epsilon,
        "Expected {} to be approximately equal to {} (epsilon: {})",
        a,
        b,
        epsilon
    );
}

/// Assert two logs hold the same samples within `epsilon`
pub fn assert_logs_match(expected: &MotionLog, actual: &MotionLog, epsilon: f32) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "Sample counts differ: {} vs {}",
        expected.len(),
        actual.len()
    );
    for (i, (a, b)) in expected
        .samples()
        .iter()
        .zip(actual.samples().iter())
        .enumerate()
    {
        assert!(
            a.approx_eq(b, epsilon),
            "Sample {} differs: {:?} vs {:?}",
            i,
            a,
            b
        );
    }
}

/// Timestamps of every sample
pub fn timestamps(samples: &[Sample]) -> Vec<f32> {
    samples.iter().map(|s| s.timestamp).collect()
}
