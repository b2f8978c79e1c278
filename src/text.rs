use rand::RngExt;

use crate::glyph;
use crate::render::Canvas;
use crate::sim::palette::{ColorGradient, ColorStop};

/// Seconds the entrance animation takes.
const ENTRANCE: f64 = 1.5;
/// Seconds after the entrance starts before jitter and pulsing glow kick in.
const SETTLE: f64 = 2.5;

/// The glowing gradient title drawn over the show, built from the same
/// stroke glyphs the path fireworks trace.
pub struct Title {
    text: String,
    start: f64,
    gradient: ColorGradient,
}

impl Title {
    /// Entrance begins one second into the session.
    pub fn new(text: &str) -> Self {
        Title::starting_at(text, 1.0)
    }

    pub fn starting_at(text: &str, start: f64) -> Self {
        Title {
            text: text.to_string(),
            start,
            gradient: ColorGradient::new(vec![
                ColorStop { t: 0.0, color: (255, 215, 0) },
                ColorStop { t: 0.3, color: (255, 165, 0) },
                ColorStop { t: 0.6, color: (255, 107, 53) },
                ColorStop { t: 1.0, color: (255, 20, 147) },
            ]),
        }
    }

    /// Swap the text and replay the entrance from `now`.
    pub fn set_text(&mut self, text: &str, now: f64) {
        self.text = text.to_string();
        self.start = now;
    }

    #[allow(dead_code)]
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn draw(&self, canvas: &mut Canvas, time: f64, rng: &mut impl RngExt) {
        let elapsed = time - self.start;
        if elapsed <= 0.0 {
            return;
        }

        let eased = ease_out_cubic((elapsed / ENTRANCE).min(1.0));
        let opacity = eased;
        let anim_scale = 0.2 + eased * 0.8;

        let (w, h) = (canvas.width as f64, canvas.height as f64);
        let (cx, cy) = (w / 2.0, h / 2.0);

        let (mut jx, mut jy) = (0.0, 0.0);
        let mut glow = 0.0;
        if elapsed > SETTLE {
            jx = rng.random_range(-1.5..1.5);
            jy = rng.random_range(-1.5..1.5);
            glow = ((elapsed * 3.3).sin() + 1.0) * 0.5;
        }

        // gradient spans a fixed band around the center
        let span = w.min(h) * 0.25;
        let (g0, g1) = (cx - span, cx + span);

        let font = glyph::title_font_size(w, h);
        for (c, chx, chy, gscale) in glyph::layout(&self.text, cx, cy, font) {
            for stroke in glyph::char_strokes(c) {
                let mut prev: Option<(f64, f64)> = None;
                for &(ux, uy) in *stroke {
                    // scale the whole block about the canvas center
                    let px = cx + (chx + ux * gscale - cx) * anim_scale + jx;
                    let py = cy + (chy + uy * gscale - cy) * anim_scale + jy;
                    if let Some((qx, qy)) = prev {
                        let t = ((px - g0) / (g1 - g0)).clamp(0.0, 1.0);
                        let color = self.gradient.sample(t);
                        if glow > 0.0 {
                            // halo first so the crisp stroke wins the pixels
                            let mid = ((qx + px) / 2.0, (qy + py) / 2.0);
                            canvas.disc(mid.0, mid.1, 1.5, opacity * (0.15 + glow * 0.2), color);
                        }
                        canvas.line(qx, qy, px, py, opacity, color);
                    }
                    prev = Some((px, py));
                }
            }
        }
    }
}

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ColorMode, RenderMode};

    #[test]
    fn ease_hits_endpoints_and_grows() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        let mut prev = 0.0;
        for i in 1..=10 {
            let v = ease_out_cubic(i as f64 / 10.0);
            assert!(v > prev);
            prev = v;
        }
        // ease-out: front-loaded
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn title_is_invisible_before_its_start() {
        let mut rng = rand::rng();
        let mut canvas = Canvas::new(80, 40, RenderMode::Ascii, ColorMode::Mono);
        let title = Title::new("2026");
        title.draw(&mut canvas, 0.5, &mut rng);
        assert!(canvas.pixels.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn title_renders_once_started() {
        let mut rng = rand::rng();
        let mut canvas = Canvas::new(80, 40, RenderMode::Ascii, ColorMode::Mono);
        let title = Title::new("2026");
        title.draw(&mut canvas, 4.0, &mut rng);
        assert!(canvas.pixels.iter().any(|&p| p > 0.0));
    }

    #[test]
    fn set_text_replays_the_entrance() {
        let mut rng = rand::rng();
        let mut canvas = Canvas::new(80, 40, RenderMode::Ascii, ColorMode::Mono);
        let mut title = Title::new("2026");
        title.set_text("88", 100.0);
        assert_eq!(title.text(), "88");
        title.draw(&mut canvas, 99.0, &mut rng);
        assert!(canvas.pixels.iter().all(|&p| p == 0.0));
    }
}
