//! Physics for the mascot body.
//!
//! Explicit Euler integration with constant gravity, a floor at `y = 0` and
//! two invisible walls at `x = ±max_x`. Nothing else collides.

use crate::config::PhysicsConfig;
use crate::math::Vector3;

// ---------------------------------------------------------------------------
// Physics state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsState {
    pub position: Vector3,
    pub velocity: Vector3,
    /// Constant gravity, applied every tick.
    pub acceleration: Vector3,
}

impl PhysicsState {
    pub fn at_rest(position: Vector3, gravity: f64) -> Self {
        Self {
            position,
            velocity: Vector3::ZERO,
            acceleration: Vector3::new(0.0, gravity, 0.0),
        }
    }
}

/// Collision limits of the play area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub max_x: f64,
    /// Fraction of horizontal speed kept after hitting a wall.
    pub restitution: f64,
}

impl From<&PhysicsConfig> for Bounds {
    fn from(cfg: &PhysicsConfig) -> Self {
        Self {
            max_x: cfg.max_x,
            restitution: cfg.restitution,
        }
    }
}

/// Advance `state` by `dt` seconds and resolve floor and wall contacts.
pub fn integrate(state: &PhysicsState, dt: f64, bounds: &Bounds) -> PhysicsState {
    let mut velocity = state.velocity.add_scaled(state.acceleration, dt);
    let mut position = state.position.add_scaled(velocity, dt);

    if position.y < 0.0 {
        position.y = 0.0;
        velocity.y = 0.0;
    }

    // Reflected speed always points back into the box.
    if position.x > bounds.max_x {
        position.x = bounds.max_x;
        velocity.x = -velocity.x.abs() * bounds.restitution;
    } else if position.x < -bounds.max_x {
        position.x = -bounds.max_x;
        velocity.x = velocity.x.abs() * bounds.restitution;
    }

    PhysicsState {
        position,
        velocity,
        acceleration: state.acceleration,
    }
}

// ---------------------------------------------------------------------------
// Physics body
// ---------------------------------------------------------------------------

/// Owner of the mascot's [`PhysicsState`].
pub struct PhysicsBody {
    state: PhysicsState,
    bounds: Bounds,
}

impl PhysicsBody {
    pub fn new(cfg: &PhysicsConfig) -> Self {
        Self {
            state: PhysicsState::at_rest(cfg.spawn, cfg.gravity),
            bounds: Bounds::from(cfg),
        }
    }

    /// Advance by `dt` seconds. Callers skip this while the body is held.
    pub fn step(&mut self, dt: f64) {
        self.state = integrate(&self.state, dt, &self.bounds);
    }

    pub fn state(&self) -> &PhysicsState {
        &self.state
    }

    pub fn position(&self) -> Vector3 {
        self.state.position
    }

    pub fn velocity(&self) -> Vector3 {
        self.state.velocity
    }

    /// Place the body directly (drag hand-off).
    pub fn set_position(&mut self, position: Vector3) {
        self.state.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vector3) {
        self.state.velocity = velocity;
    }

    /// Kill all motion (used on grab).
    pub fn stop(&mut self) {
        self.state.velocity = Vector3::ZERO;
    }
}
