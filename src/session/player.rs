//! Session player for playing back recorded motion logs
//!
//! Playback is driven by the same per-frame tick as recording: the caller
//! passes the frame delta to [`SessionPlayer::advance`] and receives the
//! samples that were crossed during that frame.

use crate::types::{Pose, Sample};

use super::types::MotionLog;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No log loaded
    #[default]
    Idle,
    /// Log loaded, positioned but not advancing
    Stopped,
    /// Advancing on every tick
    Playing,
    /// Playback paused
    Paused,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, PlaybackState::Playing)
    }

    pub fn is_paused(&self) -> bool {
        matches!(self, PlaybackState::Paused)
    }
}

/// Session player for playing back recorded motion logs
#[derive(Debug)]
pub struct SessionPlayer {
    /// Current playback state
    state: PlaybackState,
    /// The log being played
    log: Option<MotionLog>,
    /// Index of the sample at or before the playback time
    current_sample: usize,
    /// Current playback time (seconds)
    current_time: f32,
    /// Playback speed multiplier (1.0 = real-time, 2.0 = 2x speed, etc.)
    playback_speed: f32,
    /// Whether to loop playback
    loop_playback: bool,
}

impl Default for SessionPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionPlayer {
    /// Create a new session player
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Idle,
            log: None,
            current_sample: 0,
            current_time: 0.0,
            playback_speed: 1.0,
            loop_playback: false,
        }
    }

    /// Get current state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Check if playing
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    /// Check if paused
    pub fn is_paused(&self) -> bool {
        self.state.is_paused()
    }

    /// Check if a log is loaded
    pub fn has_log(&self) -> bool {
        self.log.is_some()
    }

    pub fn log(&self) -> Option<&MotionLog> {
        self.log.as_ref()
    }

    /// Get current playback time
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    /// Get current sample index
    pub fn current_sample(&self) -> usize {
        self.current_sample
    }

    pub fn playback_speed(&self) -> f32 {
        self.playback_speed
    }

    /// Set playback speed, clamped to `0.1..=10.0`
    pub fn set_playback_speed(&mut self, speed: f32) {
        self.playback_speed = speed.clamp(0.1, 10.0);
    }

    pub fn loop_playback(&self) -> bool {
        self.loop_playback
    }

    pub fn set_loop_playback(&mut self, loop_enabled: bool) {
        self.loop_playback = loop_enabled;
    }

    /// Get total duration
    pub fn total_duration(&self) -> f32 {
        self.log.as_ref().map(|l| l.duration()).unwrap_or(0.0)
    }

    /// Get playback progress (0.0 to 1.0)
    pub fn progress(&self) -> f32 {
        let total = self.total_duration();
        if total <= 0.0 {
            return 0.0;
        }
        (self.current_time / total).clamp(0.0, 1.0)
    }

    /// Load a log for playback
    pub fn load(&mut self, log: MotionLog) {
        tracing::debug!("Loaded {} samples for playback", log.len());
        self.log = Some(log);
        self.current_sample = 0;
        self.current_time = 0.0;
        self.state = PlaybackState::Stopped;
    }

    /// Unload the current log
    pub fn unload(&mut self) -> Option<MotionLog> {
        self.current_sample = 0;
        self.current_time = 0.0;
        self.state = PlaybackState::Idle;
        self.log.take()
    }

    /// Start or resume playback
    pub fn play(&mut self) {
        if self.log.is_none() {
            return;
        }

        if matches!(self.state, PlaybackState::Stopped | PlaybackState::Paused) {
            self.state = PlaybackState::Playing;
        }
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    /// Stop playback and reset to beginning
    pub fn stop(&mut self) {
        if self.log.is_none() {
            return;
        }
        self.current_sample = 0;
        self.current_time = 0.0;
        self.state = PlaybackState::Stopped;
    }

    /// Seek to a specific time
    pub fn seek(&mut self, time: f32) {
        let Some(ref log) = self.log else {
            return;
        };

        let time = time.clamp(0.0, log.duration());
        self.current_time = time;
        if let Some(idx) = log.sample_at(time) {
            self.current_sample = idx;
        }
    }

    /// Seek by progress (0.0 to 1.0)
    pub fn seek_progress(&mut self, progress: f32) {
        let progress = progress.clamp(0.0, 1.0);
        self.seek(self.total_duration() * progress);
    }

    /// Step forward by one sample
    pub fn step_forward(&mut self) {
        let Some(ref log) = self.log else {
            return;
        };

        if self.current_sample < log.len().saturating_sub(1) {
            self.current_sample += 1;
            self.current_time = log.samples()[self.current_sample].timestamp;
        }
    }

    /// Step backward by one sample
    pub fn step_backward(&mut self) {
        let Some(ref log) = self.log else {
            return;
        };

        if self.current_sample > 0 {
            self.current_sample -= 1;
            self.current_time = log.samples()[self.current_sample].timestamp;
        }
    }

    /// Advance playback by a frame of `dt` seconds
    ///
    /// Returns the samples whose timestamps fall after the previous playback
    /// position and at or before the new one.
    pub fn advance(&mut self, dt: f32) -> Vec<Sample> {
        if !self.is_playing() || !dt.is_finite() || dt < 0.0 {
            return Vec::new();
        }
        let Some(ref log) = self.log else {
            return Vec::new();
        };

        let duration = log.duration();
        let previous = self.current_time;
        let mut target = previous + dt * self.playback_speed;
        let mut crossed: Vec<Sample> = log
            .samples()
            .iter()
            .filter(|s| s.timestamp > previous && s.timestamp <= target.min(duration))
            .copied()
            .collect();

        if target >= duration {
            if self.loop_playback && duration > 0.0 {
                target = (target - duration) % duration;
                crossed.extend(
                    log.samples()
                        .iter()
                        .filter(|s| s.timestamp <= target)
                        .copied(),
                );
            } else {
                target = duration;
                self.state = PlaybackState::Stopped;
            }
        }

        self.current_time = target;
        if let Some(idx) = log.sample_at(target) {
            self.current_sample = idx;
        }
        crossed
    }

    /// Pose at the current playback time, interpolated between samples
    pub fn current_pose(&self) -> Option<Pose> {
        let log = self.log.as_ref()?;
        let samples = log.samples();
        let idx = log.sample_at(self.current_time)?;
        let a = &samples[idx];

        let Some(b) = samples.get(idx + 1) else {
            return Some(a.pose());
        };
        let span = b.timestamp - a.timestamp;
        if span <= 0.0 || self.current_time <= a.timestamp {
            return Some(a.pose());
        }

        let t = ((self.current_time - a.timestamp) / span).clamp(0.0, 1.0);
        Some(Pose::new(
            a.position.lerp(&b.position, t),
            a.orientation.nlerp(&b.orientation, t),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Quat, Vec3};

    fn create_test_log() -> MotionLog {
        let mut log = MotionLog::new();
        for i in 0..10 {
            log.append(
                i as f32 * 0.5,
                Vec3::new(i as f32, 0.0, 0.0),
                Quat::IDENTITY,
            )
            .unwrap();
        }
        log.finalize();
        log
    }

    #[test]
    fn test_player_lifecycle() {
        let mut player = SessionPlayer::new();
        assert_eq!(player.state(), PlaybackState::Idle);

        player.play();
        assert_eq!(player.state(), PlaybackState::Idle);

        player.load(create_test_log());
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert!(player.has_log());

        player.play();
        assert_eq!(player.state(), PlaybackState::Playing);

        player.pause();
        assert_eq!(player.state(), PlaybackState::Paused);

        player.stop();
        assert_eq!(player.state(), PlaybackState::Stopped);

        assert!(player.unload().is_some());
        assert_eq!(player.state(), PlaybackState::Idle);
        assert!(!player.has_log());
    }

    #[test]
    fn test_seek() {
        let mut player = SessionPlayer::new();
        player.load(create_test_log());

        player.seek(2.6);
        assert_eq!(player.current_time(), 2.6);
        assert_eq!(player.current_sample(), 5);

        player.seek(100.0);
        assert_eq!(player.current_time(), 4.5);

        player.seek_progress(0.0);
        assert_eq!(player.current_sample(), 0);
    }

    #[test]
    fn test_step() {
        let mut player = SessionPlayer::new();
        player.load(create_test_log());

        player.step_forward();
        assert_eq!(player.current_sample(), 1);
        assert_eq!(player.current_time(), 0.5);

        player.step_forward();
        assert_eq!(player.current_sample(), 2);

        player.step_backward();
        assert_eq!(player.current_sample(), 1);
    }

    #[test]
    fn test_playback_speed() {
        let mut player = SessionPlayer::new();
        player.set_playback_speed(2.0);
        assert_eq!(player.playback_speed(), 2.0);

        player.set_playback_speed(100.0);
        assert_eq!(player.playback_speed(), 10.0);

        player.set_playback_speed(0.01);
        assert_eq!(player.playback_speed(), 0.1);
    }

    #[test]
    fn test_advance_returns_crossed_samples() {
        let mut player = SessionPlayer::new();
        player.load(create_test_log());
        player.play();

        // Sample 0 sits at t=0 and is the starting position
        let crossed = player.advance(1.0);
        let times: Vec<f32> = crossed.iter().map(|s| s.timestamp).collect();
        assert_eq!(times, vec![0.5, 1.0]);
        assert_eq!(player.current_sample(), 2);

        player.set_playback_speed(2.0);
        let crossed = player.advance(0.5);
        assert_eq!(crossed.len(), 2);
        assert_eq!(player.current_time(), 2.0);
    }

    #[test]
    fn test_advance_stops_at_end() {
        let mut player = SessionPlayer::new();
        player.load(create_test_log());
        player.play();

        let crossed = player.advance(10.0);
        assert_eq!(crossed.len(), 9);
        assert_eq!(player.current_time(), 4.5);
        assert_eq!(player.state(), PlaybackState::Stopped);
        assert!(player.advance(1.0).is_empty());
    }

    #[test]
    fn test_advance_loops() {
        let mut player = SessionPlayer::new();
        player.load(create_test_log());
        player.set_loop_playback(true);
        player.play();

        player.advance(4.0);
        player.advance(1.0);
        assert!(player.is_playing());
        assert!((player.current_time() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_current_pose_interpolates() {
        let mut player = SessionPlayer::new();
        assert!(player.current_pose().is_none());

        player.load(create_test_log());
        player.seek(0.25);
        let pose = player.current_pose().unwrap();
        assert!((pose.position.x - 0.5).abs() < 1e-5);

        player.seek(4.5);
        assert_eq!(player.current_pose().unwrap().position.x, 9.0);
    }
}
