//! Monotonic tick source, interval timers, and waveform evaluators. These
//! gate input polling and drive UI pulses; nothing here touches game state.

use std::time::{Duration, Instant};

/// A monotonic high-resolution counter, anchored at construction.
#[derive(Clone, Debug)]
pub struct Clock {
    epoch: Instant,
}

impl Clock {
    pub fn new() -> Clock {
        Clock { epoch: Instant::now() }
    }

    /// Elapsed time since this clock was created.
    pub fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

impl Default for Clock {
    fn default() -> Clock {
        Clock::new()
    }
}

/// An interval timer: ready once `interval` has elapsed since the last
/// `record()`, and counts how many times it has fired.
#[derive(Clone, Copy, Debug)]
pub struct Timer {
    interval: Duration,
    last: Duration,
    count: u64,
}

impl Timer {
    pub fn new(interval: Duration) -> Timer {
        Timer {
            interval,
            last: Duration::ZERO,
            count: 0,
        }
    }

    pub fn ready(&self, now: Duration) -> bool {
        now.checked_sub(self.last).map(|elapsed| elapsed >= self.interval).unwrap_or(false)
    }

    pub fn record(&mut self, now: Duration) {
        self.last = now;
        self.count += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

/// The waveform a `Wave` evaluates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Waveform {
    Sine,
    Square,
    Triangle,
    Sawtooth,
    Cycloid,
}

/// `current_value ∈ [-amplitude+phase, amplitude+phase]`, evaluated over
/// `elapsed_seconds` at the given `frequency`.
#[derive(Clone, Copy, Debug)]
pub struct Wave {
    pub waveform: Waveform,
    pub frequency: f64,
    pub amplitude: f64,
    pub phase: f64,
}

impl Wave {
    pub fn new(waveform: Waveform, frequency: f64, amplitude: f64, phase: f64) -> Wave {
        Wave { waveform, frequency, amplitude, phase }
    }

    pub fn current_value(&self, elapsed_seconds: f64) -> f64 {
        let t = elapsed_seconds * self.frequency;
        let cycle = t.rem_euclid(1.0);
        let unit = match self.waveform {
            Waveform::Sine => (t * std::f64::consts::TAU).sin(),
            Waveform::Square => {
                if cycle < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Triangle => 4.0 * (cycle - (cycle + 0.5).floor()).abs() - 1.0,
            Waveform::Sawtooth => 2.0 * cycle - 1.0,
            // A cycloid-shaped pulse: the height of a point on a circle
            // rolling along one period, rescaled to [-1, 1].
            Waveform::Cycloid => 1.0 - (1.0 - (cycle * std::f64::consts::TAU).cos()),
        };
        self.amplitude * unit + self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_is_not_ready_before_its_interval() {
        let timer = Timer::new(Duration::from_millis(100));
        assert!(!timer.ready(Duration::from_millis(50)));
        assert!(timer.ready(Duration::from_millis(150)));
    }

    #[test]
    fn recording_advances_the_reference_point_and_count() {
        let mut timer = Timer::new(Duration::from_millis(100));
        timer.record(Duration::from_millis(100));
        assert_eq!(timer.count(), 1);
        assert!(!timer.ready(Duration::from_millis(150)));
        assert!(timer.ready(Duration::from_millis(250)));
    }

    #[test]
    fn sine_wave_stays_within_its_amplitude_band() {
        let wave = Wave::new(Waveform::Sine, 1.0, 2.0, 3.0);
        for i in 0..100 {
            let v = wave.current_value(i as f64 * 0.01);
            assert!(v >= -2.0 + 3.0 - 1e-9 && v <= 2.0 + 3.0 + 1e-9);
        }
    }

    #[test]
    fn square_wave_alternates_between_the_two_extremes() {
        let wave = Wave::new(Waveform::Square, 1.0, 1.0, 0.0);
        assert_eq!(wave.current_value(0.0), 1.0);
        assert_eq!(wave.current_value(0.75), -1.0);
    }
}
