//! Spring physics animation
//!
//! RK4-integrated spring physics for smooth, natural animations.
//! Supports preset configurations and custom spring parameters.

use serde::{Deserialize, Serialize};

/// Configuration for a spring animation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    /// Distance from the target under which the spring may come to rest
    pub rest_displacement: f32,
    /// Speed under which the spring may come to rest
    pub rest_speed: f32,
}

impl SpringConfig {
    /// Create a new spring configuration with default rest thresholds
    pub fn new(stiffness: f32, damping: f32, mass: f32) -> Self {
        Self {
            stiffness,
            damping,
            mass,
            rest_displacement: 0.01,
            rest_speed: 2.0,
        }
    }

    /// A bouncy spring that overshoots noticeably (good for press feedback)
    pub fn bouncy() -> Self {
        Self::new(100.0, 10.0, 1.0)
    }

    /// A wobbly spring with overshoot (good for playful UI)
    pub fn wobbly() -> Self {
        Self::new(180.0, 12.0, 1.0)
    }

    /// A stiff, snappy spring (good for buttons)
    pub fn stiff() -> Self {
        Self::new(400.0, 30.0, 1.0)
    }

    /// Slightly overdamped spring for programmatic moves
    pub fn movement() -> Self {
        Self::new(90.0, 20.0, 1.0)
    }

    /// Critically damped spring for returning a dragged element to its origin
    pub fn snap_back() -> Self {
        Self::new(100.0, 20.0, 1.0)
    }

    pub fn with_rest_thresholds(mut self, displacement: f32, speed: f32) -> Self {
        self.rest_displacement = displacement;
        self.rest_speed = speed;
        self
    }

    /// Calculate critical damping for this spring's stiffness and mass
    pub fn critical_damping(&self) -> f32 {
        2.0 * (self.stiffness * self.mass).sqrt()
    }

    /// Check if the spring is underdamped (will oscillate)
    pub fn is_underdamped(&self) -> bool {
        self.damping < self.critical_damping() - 0.01
    }

    /// Check if the spring is critically damped (no oscillation, fastest settling)
    pub fn is_critically_damped(&self) -> bool {
        (self.damping - self.critical_damping()).abs() < 0.01
    }

    /// Check if the spring is overdamped (slow settling, no oscillation)
    pub fn is_overdamped(&self) -> bool {
        self.damping > self.critical_damping() + 0.01
    }

    /// True when the spring cannot visibly overshoot its target
    pub fn is_non_oscillating(&self) -> bool {
        !self.is_underdamped()
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::bouncy()
    }
}

/// A spring-based animator
#[derive(Clone, Copy, Debug)]
pub struct Spring {
    config: SpringConfig,
    value: f32,
    velocity: f32,
    target: f32,
}

impl Spring {
    pub fn new(config: SpringConfig, initial: f32) -> Self {
        Self {
            config,
            value: initial,
            velocity: 0.0,
            target: initial,
        }
    }

    /// Start with an initial velocity (units per second)
    pub fn with_velocity(mut self, velocity: f32) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Check if the spring has settled (within rest thresholds of target)
    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < self.config.rest_displacement
            && self.velocity.abs() < self.config.rest_speed
    }

    /// Step the spring simulation using RK4 integration
    ///
    /// Once within the rest thresholds the spring snaps exactly onto its
    /// target with zero velocity. Returns `true` when settled.
    pub fn step(&mut self, dt: f32) -> bool {
        if !self.is_settled() {
            self.integrate(dt);
        }

        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
            return true;
        }
        false
    }

    fn integrate(&mut self, dt: f32) {
        let k1_v = self.acceleration(self.value, self.velocity);
        let k1_x = self.velocity;

        let k2_v = self.acceleration(
            self.value + k1_x * dt * 0.5,
            self.velocity + k1_v * dt * 0.5,
        );
        let k2_x = self.velocity + k1_v * dt * 0.5;

        let k3_v = self.acceleration(
            self.value + k2_x * dt * 0.5,
            self.velocity + k2_v * dt * 0.5,
        );
        let k3_x = self.velocity + k2_v * dt * 0.5;

        let k4_v = self.acceleration(self.value + k3_x * dt, self.velocity + k3_v * dt);
        let k4_x = self.velocity + k3_v * dt;

        self.velocity += (k1_v + 2.0 * k2_v + 2.0 * k3_v + k4_v) * dt / 6.0;
        self.value += (k1_x + 2.0 * k2_x + 2.0 * k3_x + k4_x) * dt / 6.0;
    }

    fn acceleration(&self, x: f32, v: f32) -> f32 {
        let spring_force = -self.config.stiffness * (x - self.target);
        let damping_force = -self.config.damping * v;
        (spring_force + damping_force) / self.config.mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spring_settles_exactly_on_target() {
        let mut spring = Spring::new(SpringConfig::stiff(), 0.0);
        spring.set_target(100.0);

        let mut settled = false;
        for _ in 0..120 {
            settled = spring.step(1.0 / 60.0);
            if settled {
                break;
            }
        }

        assert!(settled);
        assert_eq!(spring.value(), 100.0);
        assert_eq!(spring.velocity(), 0.0);
    }

    #[test]
    fn test_snap_back_does_not_overshoot() {
        let config = SpringConfig::snap_back();
        assert!(config.is_critically_damped());
        assert!(config.is_non_oscillating());

        let mut spring = Spring::new(config, 240.0);
        spring.set_target(0.0);

        for _ in 0..300 {
            let settled = spring.step(1.0 / 60.0);
            // Allow integration noise well below a pixel
            assert!(spring.value() > -0.05, "overshot to {}", spring.value());
            if settled {
                break;
            }
        }
        assert_eq!(spring.value(), 0.0);
    }

    #[test]
    fn test_spring_inherits_velocity() {
        let mut spring = Spring::new(SpringConfig::wobbly(), 0.0);
        spring.set_target(100.0);

        for _ in 0..10 {
            spring.step(1.0 / 60.0);
        }

        let velocity = spring.velocity();
        assert!(velocity > 0.0);

        // Changing target mid-flight keeps the velocity
        spring.set_target(50.0);
        assert_eq!(spring.velocity(), velocity);
    }

    #[test]
    fn test_spring_presets() {
        assert!(SpringConfig::wobbly().is_underdamped());
        assert!(SpringConfig::bouncy().is_underdamped());
        assert!(SpringConfig::movement().is_overdamped());
        assert!(SpringConfig::stiff().is_underdamped());
    }

    #[test]
    fn test_looser_thresholds_rest_sooner() {
        fn frames_to_rest(config: SpringConfig) -> u32 {
            let mut spring = Spring::new(config, 0.0);
            spring.set_target(200.0);
            for frame in 1..=600 {
                if spring.step(1.0 / 60.0) {
                    assert_eq!(spring.value(), 200.0);
                    assert_eq!(spring.velocity(), 0.0);
                    return frame;
                }
            }
            panic!("spring never came to rest");
        }

        let tight = frames_to_rest(SpringConfig::snap_back());
        let loose = frames_to_rest(SpringConfig::snap_back().with_rest_thresholds(5.0, 50.0));
        assert!(loose < tight, "loose {loose} vs tight {tight}");
    }

    #[test]
    fn test_speed_keeps_spring_awake_at_target() {
        // Passing through the target fast is not rest
        let mut spring = Spring::new(SpringConfig::bouncy(), 50.0).with_velocity(400.0);
        assert!(!spring.is_settled());
        assert!(!spring.step(1.0 / 60.0));
        assert!(spring.value() > 50.0);
    }

    #[test]
    fn test_resting_spring_wakes_on_new_target() {
        let mut spring = Spring::new(SpringConfig::stiff(), 10.0);
        assert!(spring.step(1.0 / 60.0));
        assert_eq!(spring.value(), 10.0);

        spring.set_target(-10.0);
        assert!(!spring.step(1.0 / 60.0));
        assert!(spring.value() < 10.0);
    }

    #[test]
    fn test_spring_with_initial_velocity_moves_first() {
        let mut spring = Spring::new(SpringConfig::snap_back(), 0.0).with_velocity(500.0);
        spring.set_target(0.0);
        spring.step(1.0 / 60.0);
        assert!(spring.value() > 0.0);
    }
}
