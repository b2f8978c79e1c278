use std::collections::VecDeque;
use std::f64::consts::TAU;

use rand::RngExt;

use crate::render::Canvas;
use crate::sim::palette;

/// Positions remembered for the ascent streak.
const TRAIL: usize = 20;
/// Launch speed in reference pixels per tick.
const LAUNCH_SPEED: f64 = 18.0;
/// Deceleration added to vy per tick while climbing. Small enough relative
/// to the launch speed that a shell always reaches its target height.
const CLIMB_DECEL: f64 = 0.1;

/// Canvas height the motion constants are tuned against. Speeds scale
/// linearly with the actual canvas so the show looks the same at any size.
const REF_HEIGHT: f64 = 720.0;

pub fn height_unit(height: f64) -> f64 {
    height / REF_HEIGHT
}

/// Burst geometry of a shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Sphere,
    Star,
    Column,
    Heart,
    Spiral,
}

impl Shape {
    pub const ALL: [Shape; 5] = [
        Shape::Sphere,
        Shape::Star,
        Shape::Column,
        Shape::Heart,
        Shape::Spiral,
    ];
}

/// A shell climbing from the bottom of the canvas to its target height.
pub struct Firework {
    pub x: f64,
    pub y: f64,
    pub vy: f64,
    pub target_y: f64,
    pub shape: Shape,
    pub color: (u8, u8, u8),
    exploded: bool,
    decel: f64,
    trail: VecDeque<(f64, f64)>,
}

impl Firework {
    /// Launches from the canvas bottom (`y = height`) straight up.
    pub fn new(x: f64, target_y: f64, shape: Shape, height: f64, rng: &mut impl RngExt) -> Self {
        let unit = height_unit(height);
        Firework {
            x,
            y: height,
            vy: -LAUNCH_SPEED * unit,
            target_y,
            shape,
            color: palette::shell_color(rng),
            exploded: false,
            decel: CLIMB_DECEL * unit,
            trail: VecDeque::with_capacity(TRAIL + 1),
        }
    }

    /// One tick of ascent. Arms the explosion the first time the shell
    /// reaches its target height; after that the shell never moves again.
    pub fn update(&mut self) {
        if self.exploded {
            return;
        }

        self.trail.push_back((self.x, self.y));
        if self.trail.len() > TRAIL {
            self.trail.pop_front();
        }

        self.y += self.vy;
        self.vy += self.decel;

        if self.y <= self.target_y {
            self.exploded = true;
        }
    }

    pub fn draw(&self, canvas: &mut Canvas) {
        let n = self.trail.len();
        if n > 1 {
            // tail thin and dim, head-end bright
            let mut iter = self.trail.iter();
            let mut prev = iter.next();
            for (i, p) in iter.enumerate() {
                if let Some(q) = prev {
                    let progress = i as f64 / n as f64;
                    canvas.line(q.0, q.1, p.0, p.1, progress * 0.8, self.color);
                }
                prev = Some(p);
            }
            if let Some(q) = prev {
                canvas.line(q.0, q.1, self.x, self.y, 0.8, self.color);
            }
        }

        // glow halo, colored head, white core
        canvas.disc(self.x, self.y, 2.5, 0.35, self.color);
        canvas.disc(self.x, self.y, 1.2, 1.0, self.color);
        canvas.plot(self.x, self.y, 1.0, (255, 255, 255));
    }

    pub fn is_dead(&self) -> bool {
        self.exploded
    }

    #[allow(dead_code)]
    pub fn trail_len(&self) -> usize {
        self.trail.len()
    }
}

/// Initial (velocity, color) pairs for one burst. Pure geometry: the caller
/// turns these into particles. `unit` scales speeds to the canvas
/// (see `height_unit`), `boost` is the high-altitude compensation factor.
pub fn burst_velocities(
    shape: Shape,
    count: usize,
    color: (u8, u8, u8),
    unit: f64,
    boost: f64,
    rng: &mut impl RngExt,
) -> Vec<((f64, f64), (u8, u8, u8))> {
    match shape {
        Shape::Sphere => sphere_burst(count, 3.0 * unit * boost, 9.0 * unit * boost, color, rng),
        Shape::Star => star_burst(count, color, unit * boost, rng),
        Shape::Column => column_burst(count, color, unit * boost, rng),
        Shape::Heart => heart_burst(count, 0.15 * unit * boost, rng),
        Shape::Spiral => spiral_burst(count, 7.0 * unit * boost),
    }
}

/// Evenly spaced angles around the circle, speed uniform in a band.
pub fn sphere_burst(
    count: usize,
    speed_min: f64,
    speed_max: f64,
    color: (u8, u8, u8),
    rng: &mut impl RngExt,
) -> Vec<((f64, f64), (u8, u8, u8))> {
    (0..count)
        .map(|i| {
            let angle = TAU / count as f64 * i as f64;
            let speed = rng.random_range(speed_min..speed_max);
            ((angle.cos() * speed, angle.sin() * speed), color)
        })
        .collect()
}

/// Five-fold star: the first two indices of every fifth are fast sparkle
/// "points", the rest slower base-colored "valleys".
pub fn star_burst(
    count: usize,
    color: (u8, u8, u8),
    unit: f64,
    rng: &mut impl RngExt,
) -> Vec<((f64, f64), (u8, u8, u8))> {
    let arm = (count / 5).max(1);
    (0..count)
        .map(|i| {
            let angle = TAU / count as f64 * i as f64;
            let point = i % arm < 2;
            let speed = if point {
                rng.random_range(4.0..11.0)
            } else {
                rng.random_range(2.0..6.0)
            };
            let c = if point {
                palette::pick(&palette::SPARKLE, rng)
            } else {
                color
            };
            (
                (angle.cos() * speed * unit, angle.sin() * speed * unit),
                c,
            )
        })
        .collect()
}

/// Fountain: weak radial spread, strong upward kick.
pub fn column_burst(
    count: usize,
    color: (u8, u8, u8),
    unit: f64,
    rng: &mut impl RngExt,
) -> Vec<((f64, f64), (u8, u8, u8))> {
    (0..count)
        .map(|_| {
            let angle = rng.random_range(0.0..TAU);
            let spread = rng.random_range(0.0..0.5);
            let speed = rng.random_range(3.0..9.0) * unit;
            let rise = rng.random_range(4.0..12.0) * unit;
            ((angle.cos() * speed * spread, -rise), color)
        })
        .collect()
}

/// Parametric heart curve sampled around the circle; the curve point is the
/// velocity, so the ember field fans out into a heart silhouette.
pub fn heart_burst(
    count: usize,
    scale: f64,
    rng: &mut impl RngExt,
) -> Vec<((f64, f64), (u8, u8, u8))> {
    (0..count)
        .map(|i| {
            let t = TAU / count as f64 * i as f64;
            let hx = 16.0 * t.sin().powi(3);
            let hy = -(13.0 * t.cos()
                - 5.0 * (2.0 * t).cos()
                - 2.0 * (3.0 * t).cos()
                - (4.0 * t).cos());
            ((hx * scale, hy * scale), palette::pick(&palette::HEART, rng))
        })
        .collect()
}

/// Six turns of a rainbow spiral: radius, speed and hue all grow with index.
pub fn spiral_burst(count: usize, radius: f64) -> Vec<((f64, f64), (u8, u8, u8))> {
    (0..count)
        .map(|i| {
            let t = i as f64 / count as f64;
            let angle = TAU * 6.0 * t;
            let speed = t * radius;
            let color = palette::hsl(t * 360.0, 1.0, 0.6);
            ((angle.cos() * speed, angle.sin() * speed), color)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angle_diff(a: f64, b: f64) -> f64 {
        (a - b + std::f64::consts::PI).rem_euclid(TAU) - std::f64::consts::PI
    }

    #[test]
    fn shell_explodes_exactly_at_target_height() {
        let mut rng = rand::rng();
        let mut fw = Firework::new(100.0, 50.0, Shape::Sphere, 600.0, &mut rng);
        assert_eq!(fw.y, 600.0);

        let mut ticks = 0;
        loop {
            let before = fw.y;
            fw.update();
            ticks += 1;
            assert!(ticks < 10_000, "shell never exploded");
            if fw.is_dead() {
                assert!(fw.y <= 50.0);
                assert!(before > 50.0, "explosion armed late");
                break;
            }
            assert!(fw.y > 50.0, "crossed target without exploding");
        }

        // frozen and still dead afterwards
        let (x, y) = (fw.x, fw.y);
        for _ in 0..10 {
            fw.update();
            assert!(fw.is_dead());
            assert_eq!((fw.x, fw.y), (x, y));
        }
    }

    #[test]
    fn shell_trail_never_exceeds_cap() {
        let mut rng = rand::rng();
        let mut fw = Firework::new(10.0, 5.0, Shape::Star, 600.0, &mut rng);
        while !fw.is_dead() {
            fw.update();
            assert!(fw.trail_len() <= 20);
        }
    }

    #[test]
    fn sphere_angles_are_uniform() {
        let mut rng = rand::rng();
        let burst = sphere_burst(150, 3.0, 9.0, (255, 0, 0), &mut rng);
        assert_eq!(burst.len(), 150);
        for (i, ((vx, vy), _)) in burst.iter().enumerate() {
            let expected = TAU / 150.0 * i as f64;
            let actual = vy.atan2(*vx);
            assert!(
                angle_diff(actual, expected).abs() < 1e-9,
                "particle {i} off angle"
            );
            let speed = (vx * vx + vy * vy).sqrt();
            assert!((3.0..9.0).contains(&speed));
        }
    }

    #[test]
    fn heart_curve_sampled_correctly_at_zero() {
        let mut rng = rand::rng();
        let scale = 0.15;
        let burst = heart_burst(150, scale, &mut rng);
        let ((vx, vy), color) = burst[0];
        assert!(vx.abs() < 1e-12);
        // -(13 - 5 - 2 - 1) * scale
        assert!((vy + 5.0 * scale).abs() < 1e-12);
        assert!(palette::HEART.contains(&color));
    }

    #[test]
    fn star_alternates_points_and_valleys() {
        let mut rng = rand::rng();
        let base = (1, 2, 3);
        let burst = star_burst(150, base, 1.0, &mut rng);
        assert_eq!(burst.len(), 150);
        // 150 / 5 arms = 30 per arm, indices 0 and 1 of each arm are points
        for (i, ((vx, vy), c)) in burst.iter().enumerate() {
            let speed = (vx * vx + vy * vy).sqrt();
            if i % 30 < 2 {
                assert!(palette::SPARKLE.contains(c), "index {i} not sparkle");
                assert!(speed >= 4.0);
            } else {
                assert_eq!(*c, base);
                assert!(speed < 6.0);
            }
        }
    }

    #[test]
    fn column_kicks_upward() {
        let mut rng = rand::rng();
        for ((vx, vy), _) in column_burst(200, (9, 9, 9), 1.0, &mut rng) {
            assert!(vy < 0.0, "column ember falling at birth");
            assert!(vx.abs() <= 4.5);
        }
    }

    #[test]
    fn spiral_winds_six_turns_with_growing_radius() {
        let burst = spiral_burst(150, 7.0);
        let mut prev_speed = -1.0;
        for (i, ((vx, vy), _)) in burst.iter().enumerate() {
            let t = i as f64 / 150.0;
            let speed = (vx * vx + vy * vy).sqrt();
            assert!((speed - t * 7.0).abs() < 1e-9);
            assert!(speed >= prev_speed);
            prev_speed = speed;
            if speed > 0.0 {
                let expected = (TAU * 6.0 * t).rem_euclid(TAU);
                assert!(angle_diff(vy.atan2(*vx), expected).abs() < 1e-9);
            }
        }
        // hue cycles: first ember red-ish, mid-count differs
        assert_ne!(burst[0].1, burst[75].1);
    }

    #[test]
    fn burst_dispatch_honors_count() {
        let mut rng = rand::rng();
        for shape in Shape::ALL {
            let burst = burst_velocities(shape, 150, (255, 0, 0), 1.0, 1.0, &mut rng);
            assert_eq!(burst.len(), 150, "{shape:?} produced wrong count");
        }
    }
}
