use rand::Rng;

/// A sampled timing temperament. Both factors are multiplicative: larger
/// values mean slower play. One persona is drawn per game and kept until the
/// next new-game event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Persona {
    pub name: &'static str,
    pub motor_speed: f64,
    pub think_factor: f64,
}

impl Persona {
    /// Fast but lagged, still human-plausible.
    pub const INSTANCE: Persona = Persona {
        name: "instance",
        motor_speed: 0.80,
        think_factor: 0.35,
    };

    /// Relaxed midfield player.
    pub const HUMAN: Persona = Persona {
        name: "human",
        motor_speed: 1.10,
        think_factor: 0.75,
    };

    /// Very slow, wide variance.
    pub const TURTLE: Persona = Persona {
        name: "turtle",
        motor_speed: 1.55,
        think_factor: 1.25,
    };

    /// Weighted draw: 20% instance, 60% human, 20% turtle.
    pub fn sample<R: Rng>(rng: &mut R) -> Persona {
        let roll: f64 = rng.r#gen();
        if roll < 0.20 {
            Persona::INSTANCE
        } else if roll < 0.80 {
            Persona::HUMAN
        } else {
            Persona::TURTLE
        }
    }
}
