//! Persona-driven stochastic pacing. Every delay the engine schedules or
//! sleeps passes through the [`Pacer`]: it owns the session RNG, the sampled
//! persona, the turn clock and the urgency model that compresses delays as
//! the per-turn deadline approaches.

mod persona;

pub use persona::Persona;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use statrs::distribution::Normal;
use std::time::{Duration, Instant};

/// Smallest delay ever scheduled; nothing fires at zero.
pub const MIN_DELAY: f64 = 0.01;
/// Floor for non-momentum drag movements.
pub const MIN_DRAG: f64 = 0.18;

/// Session-level pacing knobs, overridable from the environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacingConfig {
    /// Hard per-turn wall-clock budget in seconds.
    pub turn_limit: f64,
    /// One-time settle delay after a new game starts.
    pub warmup: f64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            turn_limit: 7.0,
            warmup: 10.0,
        }
    }
}

impl PacingConfig {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let turn_limit = read("GMB_TURN_LIMIT")
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value >= 0.0)
            .unwrap_or(defaults.turn_limit);
        let warmup = read("GMB_WARMUP")
            .and_then(|raw| raw.parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value >= 0.0)
            .unwrap_or(defaults.warmup);
        Self { turn_limit, warmup }
    }
}

#[derive(Debug)]
pub struct Pacer {
    rng: StdRng,
    persona: Persona,
    config: PacingConfig,
    turn_start: Instant,
}

impl Pacer {
    pub fn new(config: PacingConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    pub fn with_seed(config: PacingConfig, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let persona = Persona::sample(&mut rng);
        Self {
            rng,
            persona,
            config,
            turn_start: Instant::now(),
        }
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn config(&self) -> PacingConfig {
        self.config
    }

    pub fn resample_persona(&mut self) {
        self.persona = Persona::sample(&mut self.rng);
        tracing::debug!(persona = self.persona.name, "persona sampled");
    }

    pub fn start_turn(&mut self) {
        self.turn_start = Instant::now();
    }

    pub fn elapsed(&self) -> f64 {
        self.turn_start.elapsed().as_secs_f64()
    }

    /// Acceleration factor from remaining turn time: sharp just before the
    /// deadline, moderate under three seconds, mild once a turn drags on.
    pub fn urgency(&self) -> f64 {
        let left = self.config.turn_limit - self.elapsed();
        if left < 0.5 {
            0.3
        } else if left < 3.0 {
            0.6
        } else if self.elapsed() > 5.0 {
            0.8
        } else {
            1.0
        }
    }

    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.rng.gen_range(low..high)
    }

    fn gaussian(&mut self, mean: f64, std_dev: f64, low: f64, high: f64) -> f64 {
        let draw = match Normal::new(mean, std_dev) {
            Ok(normal) => self.rng.sample(normal),
            Err(_) => mean,
        };
        draw.clamp(low, high) * self.persona.think_factor
    }

    /// One-time board-survey pause before the first hop of a turn.
    pub fn planning_delay(&mut self, spans: usize, complex: bool) -> f64 {
        let base = self.uniform(0.01, 0.33);
        let think = if spans <= 1 && !complex {
            // Forced move, nothing to ponder.
            self.uniform(0.0, 0.18)
        } else if complex {
            self.gaussian(2.3, 0.9, 0.6, 4.5)
        } else {
            self.gaussian(0.95, 0.35, 0.25, 1.75)
        };
        ((base + think) * self.urgency()).max(MIN_DELAY)
    }

    /// Cursor drag time for one hop. Momentum hops (same checker keeps
    /// moving) skip the distance model entirely.
    pub fn drag_delay(&mut self, distance: u8, hit: bool, bearoff: bool, momentum: bool) -> f64 {
        if momentum {
            return self.uniform(0.18, 0.32);
        }
        let dist_factor = (f64::from(distance) + 1.0).log2();
        let mut delay = (0.52 + 0.13 * dist_factor) * self.persona.motor_speed;
        delay *= self.uniform(0.95, 1.20);
        if hit {
            delay += 0.30;
        }
        if bearoff {
            delay *= 0.90;
        }
        (delay * self.urgency()).max(MIN_DRAG)
    }

    /// Hesitation between distinct checker movements.
    pub fn hesitation_delay(&mut self, move_index: usize, prev_was_hit: bool) -> f64 {
        if move_index == 0 {
            return 0.0;
        }
        let mut hesitation = self.uniform(0.40, 1.0);
        if self.rng.gen_bool(0.40) {
            hesitation += self.uniform(0.7, 1.75);
        }
        if prev_was_hit {
            hesitation += self.uniform(0.6, 1.05);
        }
        (hesitation * self.persona.think_factor * self.urgency()).max(MIN_DELAY)
    }

    /// Pause before answering or offering a cube.
    pub fn cube_delay(&mut self, incoming: bool) -> f64 {
        let base = if incoming { 1.75 } else { 0.95 };
        if self.rng.gen_bool(0.20) {
            base + self.gaussian(3.5, 1.7, 1.2, 5.5)
        } else {
            base + self.gaussian(0.95, 0.35, 0.45, 1.75)
        }
    }

    pub fn pre_roll_delay(&mut self) -> f64 {
        self.gaussian(0.01, 0.02, 0.03, 0.04)
    }

    /// Urgency-scaled sleep in 20 ms slices. Self-interrupts once the turn
    /// clock comes within half a second of the hard limit, so a single long
    /// delay can never trip the server's turn timeout.
    pub fn heartbeat_sleep(&self, seconds: f64) {
        let scaled = (seconds * self.urgency()).max(MIN_DELAY);
        let deadline = Instant::now() + Duration::from_secs_f64(scaled);
        while Instant::now() < deadline {
            if self.elapsed() > self.config.turn_limit - 0.5 {
                break;
            }
            std::thread::sleep(Duration::from_millis(20));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MIN_DELAY, MIN_DRAG, Pacer, PacingConfig};
    use std::time::Instant;

    fn pacer(seed: u64) -> Pacer {
        Pacer::with_seed(PacingConfig::default(), seed)
    }

    /// Turn limit of zero puts the pacer permanently in the panic regime.
    fn panic_pacer(seed: u64) -> Pacer {
        Pacer::with_seed(
            PacingConfig {
                turn_limit: 0.0,
                warmup: 0.0,
            },
            seed,
        )
    }

    #[test]
    fn config_reads_env_overrides() {
        let config = PacingConfig::from_reader(|key| match key {
            "GMB_TURN_LIMIT" => Some("12.5".to_string()),
            _ => None,
        });
        assert_eq!(config.turn_limit, 12.5);
        assert_eq!(config.warmup, 10.0);
    }

    #[test]
    fn config_rejects_garbage_values() {
        let config = PacingConfig::from_reader(|_| Some("-3".to_string()));
        assert_eq!(config.turn_limit, 7.0);
    }

    #[test]
    fn fresh_turn_has_no_urgency() {
        let mut pacer = pacer(1);
        pacer.start_turn();
        assert_eq!(pacer.urgency(), 1.0);
    }

    #[test]
    fn exhausted_clock_forces_minimum_urgency() {
        let pacer = panic_pacer(1);
        assert_eq!(pacer.urgency(), 0.3);
    }

    #[test]
    fn planning_delay_respects_regime_bounds() {
        let mut pacer = pacer(42);
        pacer.start_turn();
        for _ in 0..100 {
            let forced = pacer.planning_delay(1, false);
            assert!(forced >= MIN_DELAY && forced <= 0.33 + 0.18);

            let normal = pacer.planning_delay(3, false);
            assert!(normal <= 0.33 + 1.75 * pacer.persona().think_factor);

            let deep = pacer.planning_delay(3, true);
            assert!(deep <= 0.33 + 4.5 * pacer.persona().think_factor);
            assert!(deep >= MIN_DELAY);
        }
    }

    #[test]
    fn drag_delay_never_drops_below_floor() {
        let mut pacer = panic_pacer(42);
        for distance in [1u8, 6, 12, 24] {
            for _ in 0..50 {
                assert!(pacer.drag_delay(distance, false, false, false) >= MIN_DRAG);
            }
        }
    }

    #[test]
    fn momentum_drag_is_short_and_fixed_range() {
        let mut pacer = pacer(7);
        for _ in 0..100 {
            let delay = pacer.drag_delay(24, true, false, true);
            assert!((0.18..0.32).contains(&delay));
        }
    }

    #[test]
    fn first_move_has_no_hesitation() {
        let mut pacer = pacer(3);
        assert_eq!(pacer.hesitation_delay(0, false), 0.0);
        assert!(pacer.hesitation_delay(1, false) >= MIN_DELAY);
    }

    #[test]
    fn hit_aftermath_extends_hesitation_bounds() {
        let mut pacer = pacer(3);
        pacer.start_turn();
        let think = pacer.persona().think_factor;
        for _ in 0..100 {
            let delay = pacer.hesitation_delay(2, true);
            assert!(delay <= (1.0 + 1.75 + 1.05) * think);
        }
    }

    #[test]
    fn cube_delay_includes_base_component() {
        let mut pacer = pacer(9);
        pacer.start_turn();
        for _ in 0..50 {
            assert!(pacer.cube_delay(true) >= 1.75);
            assert!(pacer.cube_delay(false) >= 0.95);
        }
    }

    #[test]
    fn heartbeat_sleep_breaks_at_the_deadline() {
        let pacer = panic_pacer(5);
        let started = Instant::now();
        pacer.heartbeat_sleep(30.0);
        // 30 urgency-scaled seconds would still be 9; the deadline guard
        // must cut the sleep immediately.
        assert!(started.elapsed().as_secs_f64() < 1.0);
    }

    #[test]
    fn seeded_pacers_are_deterministic() {
        let mut a = pacer(11);
        let mut b = pacer(11);
        a.start_turn();
        b.start_turn();
        assert_eq!(a.persona(), b.persona());
        assert_eq!(a.planning_delay(2, false), b.planning_delay(2, false));
        assert_eq!(
            a.drag_delay(10, false, false, false),
            b.drag_delay(10, false, false, false)
        );
    }
}
