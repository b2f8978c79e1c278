use std::f64::consts::TAU;

use rand::RngExt;

use crate::render::Canvas;

/// A background star. Fixed once created; only the twinkle moves.
pub struct Star {
    x: f64,
    y: f64,
    size: f64,
    base_alpha: f64,
    twinkle_speed: f64,
    phase: f64,
}

impl Star {
    /// Stars fill the upper 70% of the sky.
    pub fn new(width: f64, height: f64, rng: &mut impl RngExt) -> Self {
        Star {
            x: rng.random_range(0.0..width),
            y: rng.random_range(0.0..height * 0.7),
            size: rng.random_range(0.5..2.0),
            base_alpha: rng.random_range(0.3..0.8),
            twinkle_speed: rng.random_range(1.0..3.0),
            phase: rng.random_range(0.0..TAU),
        }
    }

    pub fn draw(&self, canvas: &mut Canvas, time: f64, rng: &mut impl RngExt) {
        let alpha = (self.base_alpha + (time * self.twinkle_speed + self.phase).sin() * 0.2)
            .clamp(0.0, 1.0);

        canvas.plot(self.x, self.y, alpha, (255, 255, 255));
        if self.size > 1.5 {
            canvas.plot(self.x + 1.0, self.y, alpha * 0.6, (255, 255, 255));
        }

        // rare cross-shaped glint
        if rng.random_bool(0.01) {
            let r = self.size * 2.0;
            canvas.line(self.x - r, self.y, self.x + r, self.y, alpha * 0.5, (255, 255, 255));
            canvas.line(self.x, self.y - r, self.x, self.y + r, alpha * 0.5, (255, 255, 255));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ColorMode, RenderMode};

    #[test]
    fn stars_stay_in_the_upper_sky() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let s = Star::new(100.0, 100.0, &mut rng);
            assert!(s.y < 70.0);
            assert!(s.x < 100.0);
        }
    }

    #[test]
    fn twinkle_stays_within_opacity_bounds() {
        let mut rng = rand::rng();
        let mut canvas = Canvas::new(100, 100, RenderMode::Ascii, ColorMode::Mono);
        let star = Star::new(100.0, 100.0, &mut rng);
        for step in 0..200 {
            star.draw(&mut canvas, step as f64 * 0.1, &mut rng);
        }
        for &p in &canvas.pixels {
            assert!((0.0..=1.0).contains(&p));
        }
    }
}
