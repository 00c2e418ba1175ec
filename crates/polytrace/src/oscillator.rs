//! Bounded oscillator: a scalar that bounces back and forth inside [0, 1].
//!
//! There is no randomness here. Given the same `(position, direction, speed)`
//! the sequence of positions is always the same.

/// Direction of travel along an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Towards `t = 1`
    #[default]
    Forward,
    /// Towards `t = 0`
    Backward,
}

impl Direction {
    /// `+1.0` or `-1.0`.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// One bounce transition.
///
/// `t' = t + speed * d`, clamped to the bounds with the direction flipped
/// when a bound is reached or passed.
#[inline]
pub fn bounce(position: f64, direction: Direction, speed: f64) -> (f64, Direction) {
    let next = position + speed * direction.sign();

    if next >= 1.0 {
        (1.0, Direction::Backward)
    } else if next <= 0.0 {
        (0.0, Direction::Forward)
    } else {
        (next, direction)
    }
}

/// A point moving along one polygon edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    /// Index of the polygon edge this point runs along
    pub edge: usize,
    position: f64,
    direction: Direction,
    speed: f64,
}

impl Oscillator {
    pub fn new(edge: usize, position: f64, direction: Direction, speed: f64) -> Self {
        Self {
            edge,
            position,
            direction,
            speed,
        }
    }

    #[inline]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Change the speed. Position and direction are kept.
    #[inline]
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    /// Apply one bounce transition in place.
    #[inline]
    pub fn advance(&mut self) {
        let (position, direction) = bounce(self.position, self.direction, self.speed);
        self.position = position;
        self.direction = direction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverses_at_upper_bound() {
        let mut osc = Oscillator::new(0, 0.95, Direction::Forward, 0.1);

        osc.advance();
        assert_eq!(osc.position(), 1.0);
        assert_eq!(osc.direction(), Direction::Backward);

        osc.advance();
        assert!((osc.position() - 0.9).abs() < 1e-12);
        assert_eq!(osc.direction(), Direction::Backward);
    }

    #[test]
    fn reverses_at_lower_bound() {
        let (t, d) = bounce(0.05, Direction::Backward, 0.1);
        assert_eq!(t, 0.0);
        assert_eq!(d, Direction::Forward);
    }

    #[test]
    fn exact_bound_flips() {
        assert_eq!(bounce(0.5, Direction::Forward, 0.5), (1.0, Direction::Backward));
        assert_eq!(bounce(0.5, Direction::Backward, 0.5), (0.0, Direction::Forward));
    }

    #[test]
    fn stays_in_unit_interval() {
        let starts = [0.0, 0.1, 0.33, 0.5, 0.95, 1.0];
        let speeds = [0.001, 0.008, 0.1, 0.37, 0.9, 1.0];

        for &t0 in &starts {
            for dir in [Direction::Forward, Direction::Backward] {
                for &speed in &speeds {
                    let mut osc = Oscillator::new(0, t0, dir, speed);
                    for step in 0..2000 {
                        osc.advance();
                        let t = osc.position();
                        assert!(
                            (0.0..=1.0).contains(&t),
                            "t = {} escaped at step {} (t0 {}, speed {})",
                            t, step, t0, speed
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn speed_change_keeps_position_and_direction() {
        let mut osc = Oscillator::new(2, 0.4, Direction::Backward, 0.01);
        osc.set_speed(0.2);
        assert_eq!(osc.position(), 0.4);
        assert_eq!(osc.direction(), Direction::Backward);
        osc.advance();
        assert!((osc.position() - 0.2).abs() < 1e-12);
    }

    #[test]
    fn direction_signs() {
        assert_eq!(Direction::Forward.sign(), 1.0);
        assert_eq!(Direction::Backward.sign(), -1.0);
    }
}
