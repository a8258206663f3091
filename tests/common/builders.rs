//! Test data builders for creating test objects

use motion_recorder::{MotionLog, Pose, Quat, Vec3};

/// Builder for creating test motion logs along a straight walk
pub struct WalkBuilder {
    start: Vec3,
    step: Vec3,
    dt: f32,
    samples: usize,
    orientation: Quat,
}

impl WalkBuilder {
    pub fn new(samples: usize) -> Self {
        Self {
            start: Vec3::new(0.0, 1.7, 0.0),
            step: Vec3::new(0.0, 0.0, 0.1),
            dt: 1.0 / 72.0,
            samples,
            orientation: Quat::IDENTITY,
        }
    }

    pub fn start(mut self, start: Vec3) -> Self {
        self.start = start;
        self
    }

    pub fn step(mut self, step: Vec3) -> Self {
        self.step = step;
        self
    }

    pub fn dt(mut self, dt: f32) -> Self {
        self.dt = dt;
        self
    }

    pub fn orientation(mut self, orientation: Quat) -> Self {
        self.orientation = orientation;
        self
    }

    /// Per-frame `(dt, pose)` ticks as the tracking runtime would deliver them
    pub fn ticks(&self) -> Vec<(f32, Pose)> {
        (0..self.samples)
            .map(|i| {
                let i = i as f32;
                let position = Vec3::new(
                    self.start.x + self.step.x * i,
                    self.start.y + self.step.y * i,
                    self.start.z + self.step.z * i,
                );
                (self.dt, Pose::new(position, self.orientation))
            })
            .collect()
    }

    pub fn build(self) -> MotionLog {
        let mut log = MotionLog::new();
        let mut t = 0.0f32;
        for (dt, pose) in self.ticks() {
            t += dt;
            log.append(t, pose.position, pose.orientation)
                .expect("walk samples are ordered");
        }
        log
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_builder() {
        let log = WalkBuilder::new(3).dt(0.5).step(Vec3::new(1.0, 0.0, 0.0)).build();

        assert_eq!(log.len(), 3);
        assert_eq!(log.duration(), 1.5);
        assert_eq!(log.samples()[2].position.x, 2.0);
    }
}
