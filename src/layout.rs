use std::{
    f64::consts::{FRAC_PI_2, TAU},
    fmt,
};

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Geometry of the concentric rings. Screen coordinates: y grows downward,
/// so a `start_angle` of -π/2 is straight up from the center.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub struct LayoutConfig {
    pub center: Point,
    /// Radius of the innermost ring, the one holding the most wins.
    pub base_radius: f64,
    /// Gap between neighboring rings.
    pub radius_step: f64,
    pub start_angle: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center: Point::new(550.0, 350.0),
            base_radius: 1500.0,
            radius_step: 200.0,
            start_angle: -FRAC_PI_2,
        }
    }
}

/// One placed seat on a ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Seat {
    pub index: usize,
    pub angle: f64,
    pub position: Point,
}

impl LayoutConfig {
    /// Fewer wins means a larger ring.
    #[must_use]
    pub fn ring_radius(&self, wins: u32, max_wins: u32) -> f64 {
        let rings_out = max_wins.saturating_sub(wins);
        self.base_radius + f64::from(rings_out) * self.radius_step
    }

    /// Spreads `count` seats evenly around a ring of `radius`, starting at
    /// `start_angle`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn ring(&self, radius: f64, count: usize) -> Vec<Seat> {
        if count == 0 {
            return Vec::new();
        }

        let step = TAU / count as f64;
        (0..count)
            .map(|index| {
                let angle = self.start_angle + index as f64 * step;
                Seat {
                    index,
                    angle,
                    position: Point::new(
                        self.center.x + radius * angle.cos(),
                        self.center.y + radius * angle.sin(),
                    ),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::f64::consts::TAU;

    use super::{LayoutConfig, Point};

    const EPSILON: f64 = 1e-9;

    #[test]
    fn innermost_ring_is_most_wins() {
        let config = LayoutConfig::default();

        assert!((config.ring_radius(3, 3) - 1500.0).abs() < EPSILON);
        assert!((config.ring_radius(0, 3) - 2100.0).abs() < EPSILON);
        assert!(config.ring_radius(0, 3) > config.ring_radius(1, 3));
        assert!(config.ring_radius(1, 3) > config.ring_radius(2, 3));
    }

    #[test]
    fn first_seat_is_straight_up() {
        let config = LayoutConfig {
            center: Point::new(0.0, 0.0),
            ..LayoutConfig::default()
        };

        let seats = config.ring(100.0, 1);
        assert_eq!(seats.len(), 1);
        assert!(seats[0].position.x.abs() < EPSILON);
        assert!((seats[0].position.y + 100.0).abs() < EPSILON);
    }

    #[test]
    fn seats_are_evenly_spaced() {
        let config = LayoutConfig::default();

        for count in 1..12 {
            let seats = config.ring(500.0, count);
            assert_eq!(seats.len(), count);

            for pair in seats.windows(2) {
                #[allow(clippy::cast_precision_loss)]
                let step = TAU / count as f64;
                assert!((pair[1].angle - pair[0].angle - step).abs() < EPSILON);
            }

            for (i, a) in seats.iter().enumerate() {
                assert!((a.position.distance(&config.center) - 500.0).abs() < 1e-6);
                for b in &seats[i + 1..] {
                    let apart = (b.angle - a.angle).rem_euclid(TAU);
                    assert!(apart > EPSILON && TAU - apart > EPSILON);
                }
            }
        }
    }

    #[test]
    fn empty_ring() {
        assert!(LayoutConfig::default().ring(100.0, 0).is_empty());
    }
}
