//! Idle wandering: random nudges and hops while nobody holds the mascot.
//!
//! The interval timer is tick-driven, so there is exactly one timer per
//! scheduler and restarting it just re-arms the countdown.

use rand::Rng;
use std::time::Duration;
use tracing::debug;

use crate::config::WanderConfig;
use crate::math::Vector3;

pub struct WanderScheduler {
    interval: Duration,
    max_speed: f64,
    hop_probability: f64,
    hop_min: f64,
    hop_max: f64,
    /// Time since the last firing; `None` while stopped.
    elapsed: Option<Duration>,
}

impl WanderScheduler {
    /// Create a stopped scheduler.
    pub fn new(cfg: &WanderConfig) -> Self {
        Self {
            interval: Duration::from_millis(cfg.interval_ms),
            max_speed: cfg.max_speed,
            hop_probability: cfg.hop_probability,
            hop_min: cfg.hop_min,
            hop_max: cfg.hop_max,
            elapsed: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.elapsed.is_some()
    }

    /// Clear any pending countdown and arm a fresh one.
    pub fn restart(&mut self) {
        self.elapsed = Some(Duration::ZERO);
    }

    pub fn stop(&mut self) {
        self.elapsed = None;
    }

    /// Advance the timer by `dt` seconds. On firing, returns the perturbed
    /// velocity; a held mascot skips the firing but the interval still runs.
    pub fn advance<R: Rng>(
        &mut self,
        dt: f64,
        held: bool,
        velocity: Vector3,
        rng: &mut R,
    ) -> Option<Vector3> {
        let elapsed = self.elapsed.as_mut()?;
        *elapsed += Duration::try_from_secs_f64(dt).unwrap_or(Duration::ZERO);
        if *elapsed < self.interval {
            return None;
        }

        // One firing per tick even after a long stall.
        *elapsed = Duration::ZERO;

        if held {
            return None;
        }
        Some(self.perturb(velocity, rng))
    }

    fn perturb<R: Rng>(&self, velocity: Vector3, rng: &mut R) -> Vector3 {
        let mut v = velocity;
        v.x = rng.gen_range(-self.max_speed..=self.max_speed);
        if rng.gen_bool(self.hop_probability) {
            v.y = rng.gen_range(self.hop_min..=self.hop_max);
            debug!(vx = v.x, vy = v.y, "wander hop");
        } else {
            debug!(vx = v.x, "wander nudge");
        }
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn scheduler(hop_probability: f64) -> WanderScheduler {
        let mut s = WanderScheduler::new(&WanderConfig {
            hop_probability,
            ..WanderConfig::default()
        });
        s.restart();
        s
    }

    #[test]
    fn test_fires_on_interval() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut s = scheduler(0.0);

        assert!(s.advance(1.0, false, Vector3::ZERO, &mut rng).is_none());
        assert!(s.advance(0.9, false, Vector3::ZERO, &mut rng).is_none());
        let v = s.advance(0.1, false, Vector3::ZERO, &mut rng).unwrap();
        assert!((-0.15..=0.15).contains(&v.x));
        assert_eq!(v.y, 0.0);
    }

    #[test]
    fn test_hop_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut s = scheduler(1.0);
        for _ in 0..50 {
            let v = s.advance(2.0, false, Vector3::ZERO, &mut rng).unwrap();
            assert!((0.06..=0.11).contains(&v.y));
            assert!((-0.15..=0.15).contains(&v.x));
        }
    }

    #[test]
    fn test_never_fires_while_held() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut s = scheduler(1.0);
        for _ in 0..10 {
            assert!(s.advance(2.5, true, Vector3::ZERO, &mut rng).is_none());
        }
    }

    #[test]
    fn test_stopped_never_fires() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut s = scheduler(1.0);
        s.stop();
        assert!(!s.is_running());
        assert!(s.advance(10.0, false, Vector3::ZERO, &mut rng).is_none());
    }

    #[test]
    fn test_restart_resets_countdown() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut s = scheduler(0.0);
        assert!(s.advance(1.5, false, Vector3::ZERO, &mut rng).is_none());
        s.restart();
        assert!(s.advance(1.5, false, Vector3::ZERO, &mut rng).is_none());
        assert!(s.advance(0.5, false, Vector3::ZERO, &mut rng).is_some());
    }

    #[test]
    fn test_seeded_runs_match() {
        let run = |seed| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut s = scheduler(0.3);
            (0..20)
                .filter_map(|_| s.advance(2.0, false, Vector3::ZERO, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(42), run(42));
    }
}
