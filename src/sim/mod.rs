pub mod firework;
pub mod palette;
pub mod particle;
pub mod path;
pub mod star;

use rand::RngExt;

use crate::audio::SoundManager;
use crate::glyph;
use crate::render::{Blend, Canvas};
use crate::text::Title;
use firework::{Firework, Shape};
use particle::Particle;
use path::PathFirework;
use star::Star;

/// Brightness kept per tick — the low-opacity black wash that makes motion
/// trails linger.
const PERSISTENCE: f64 = 0.85;
/// Screen flash decay per tick.
const FLASH_DECAY: f64 = 0.85;
/// Base particle count of a shell burst, before density scale and the
/// high-altitude boost.
const BURST_COUNT: f64 = 150.0;
/// Particle count of a path-tracer burst. Smaller: the trace itself already
/// carries the spectacle.
const PATH_BURST_COUNT: f64 = 80.0;
/// Ticks before the first intro character launches.
const INTRO_DELAY: u64 = 60;
/// Ticks between intro characters.
const INTRO_STAGGER: u64 = 36;

struct Burst {
    x: f64,
    y: f64,
    shape: Shape,
    color: (u8, u8, u8),
    target_y: f64,
}

/// The animation director. Owns every live object and all scalar show
/// state; `tick` runs one full update+draw+prune+spawn cycle.
pub struct Simulation {
    pub width: f64,
    pub height: f64,
    pub stars: Vec<Star>,
    pub path_fireworks: Vec<PathFirework>,
    pub fireworks: Vec<Firework>,
    pub particles: Vec<Particle>,
    pub flash: f64,
    pub auto_mode: bool,
    pub scale: f64,
    title: Title,
    intro_chars: Vec<(char, f64, f64, f64)>,
    intro_next: usize,
    intro_countdown: u64,
    sound: SoundManager,
    rng: rand::rngs::ThreadRng,
}

impl Simulation {
    pub fn new(
        width: usize,
        height: usize,
        text: &str,
        intro: bool,
        scale: f64,
        sound: SoundManager,
    ) -> Self {
        let mut rng = rand::rng();
        let (w, h) = (width as f64, height as f64);

        let star_count = (w * h / 400.0) as usize;
        let stars = (0..star_count).map(|_| Star::new(w, h, &mut rng)).collect();

        let intro_chars = if intro {
            glyph::layout(text, w / 2.0, h / 2.0, glyph::title_font_size(w, h))
        } else {
            Vec::new()
        };

        Simulation {
            width: w,
            height: h,
            stars,
            path_fireworks: Vec::new(),
            fireworks: Vec::new(),
            particles: Vec::new(),
            flash: 0.0,
            auto_mode: true,
            scale,
            title: Title::new(text),
            intro_chars,
            intro_next: 0,
            intro_countdown: INTRO_DELAY,
            sound,
            rng,
        }
    }

    /// New canvas dimensions. In-flight objects and star placement are left
    /// as they are; stale positions from the old size are an accepted
    /// artifact.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width as f64;
        self.height = height as f64;
    }

    pub fn sound(&self) -> &SoundManager {
        &self.sound
    }

    pub fn sound_mut(&mut self) -> &mut SoundManager {
        &mut self.sound
    }

    /// Launch toward an arbitrary point with a random shape (mouse click).
    pub fn launch_at(&mut self, x: f64, target_y: f64) {
        let shape = Shape::ALL[self.rng.random_range(0..Shape::ALL.len())];
        self.launch(x, target_y, shape);
    }

    pub fn launch(&mut self, x: f64, target_y: f64, shape: Shape) {
        self.fireworks
            .push(Firework::new(x, target_y, shape, self.height, &mut self.rng));
        self.sound.play_launch();
    }

    /// Replace the title and replay its entrance and traced intro.
    pub fn set_text(&mut self, text: &str, now: f64) {
        self.title.set_text(text, now + 1.0);
        self.intro_chars = glyph::layout(
            text,
            self.width / 2.0,
            self.height / 2.0,
            glyph::title_font_size(self.width, self.height),
        );
        self.intro_next = 0;
        self.intro_countdown = INTRO_DELAY;
    }

    /// One frame: fade, stars, flash, additive pass over all live objects,
    /// title overlay, then scheduled launches.
    pub fn tick(&mut self, canvas: &mut Canvas, time: f64) {
        canvas.fade(PERSISTENCE);

        for star in &self.stars {
            star.draw(canvas, time, &mut self.rng);
        }

        if self.flash > 0.01 {
            canvas.flash(self.flash);
            self.flash *= FLASH_DECAY;
        } else {
            self.flash = 0.0;
        }

        canvas.set_blend(Blend::Additive);

        let mut traced: Vec<(f64, f64, (u8, u8, u8))> = Vec::new();
        self.path_fireworks.retain_mut(|pf| {
            pf.update();
            if pf.is_dead() {
                traced.push((pf.x, pf.y, pf.color));
                false
            } else {
                pf.draw(canvas);
                true
            }
        });
        for (x, y, color) in traced {
            self.explode_traced(x, y, color);
        }

        let mut bursts: Vec<Burst> = Vec::new();
        self.fireworks.retain_mut(|fw| {
            fw.update();
            if fw.is_dead() {
                bursts.push(Burst {
                    x: fw.x,
                    y: fw.y,
                    shape: fw.shape,
                    color: fw.color,
                    target_y: fw.target_y,
                });
                false
            } else {
                fw.draw(canvas);
                true
            }
        });
        for burst in bursts {
            self.explode(burst);
        }

        self.particles.retain_mut(|p| {
            p.update();
            if p.is_dead() {
                false
            } else {
                p.draw(canvas);
                true
            }
        });

        canvas.set_blend(Blend::Normal);

        self.title.draw(canvas, time, &mut self.rng);

        self.run_intro();
        if self.auto_mode {
            self.auto_spawn(time);
        }
    }

    fn explode(&mut self, burst: Burst) {
        self.sound.play_explosion();
        self.flash = 0.15;

        // high bursts spread harder and denser: less room to fall through
        let boost = if burst.target_y < self.height * 0.45 { 1.5 } else { 1.0 };
        let count = (BURST_COUNT * self.scale * boost) as usize;
        let unit = firework::height_unit(self.height);
        let life = match burst.shape {
            Shape::Heart => 1.3,
            _ => 1.2,
        };

        let velocities = firework::burst_velocities(
            burst.shape,
            count,
            burst.color,
            unit,
            boost,
            &mut self.rng,
        );
        for (velocity, color) in velocities {
            let size = self.rng.random_range(1.5..3.5);
            self.particles.push(Particle::new(
                burst.x,
                burst.y,
                color,
                velocity,
                life,
                particle::GRAVITY * unit,
                size,
            ));
        }
    }

    fn explode_traced(&mut self, x: f64, y: f64, color: (u8, u8, u8)) {
        self.sound.play_explosion();
        self.flash = 0.2;

        let count = (PATH_BURST_COUNT * self.scale) as usize;
        let unit = firework::height_unit(self.height);
        let velocities =
            firework::sphere_burst(count, 3.5 * unit, 4.5 * unit, color, &mut self.rng);
        for (velocity, c) in velocities {
            let size = self.rng.random_range(1.5..3.5);
            self.particles.push(Particle::new(
                x,
                y,
                c,
                velocity,
                1.0,
                particle::GRAVITY * unit,
                size,
            ));
        }
    }

    /// Launch the next title character's stroke tracers, one character per
    /// stagger interval, until the whole title has been drawn once.
    fn run_intro(&mut self) {
        if self.intro_next >= self.intro_chars.len() {
            return;
        }
        if self.intro_countdown > 0 {
            self.intro_countdown -= 1;
            return;
        }

        let (c, x, y, scale) = self.intro_chars[self.intro_next];
        self.intro_next += 1;
        self.intro_countdown = INTRO_STAGGER;

        for path in glyph::char_paths_at(c, x, y, scale) {
            let color = palette::pick(&palette::WARM, &mut self.rng);
            self.path_fireworks.push(PathFirework::new(path, color));
        }
        self.sound.play_launch();
    }

    /// Random launches, ramping from sparse to busy over the first minute.
    fn auto_spawn(&mut self, time: f64) {
        let mut chance = 0.02;
        if time > 5.0 {
            chance = (0.02 + (time - 5.0) * 0.01).min(0.15);
        }
        if self.rng.random_range(0.0..1.0) >= chance {
            return;
        }

        let x = self.rng.random_range(self.width * 0.1..self.width * 0.9);
        let h = self.height;
        // five bands so bursts spread over the sky instead of clustering
        let target_y = match self.rng.random_range(0..5) {
            0 => self.rng.random_range(h * 0.05..h * 0.15),
            1 => self.rng.random_range(h * 0.15..h * 0.30),
            2 => self.rng.random_range(h * 0.30..h * 0.45),
            3 => self.rng.random_range(h * 0.45..h * 0.60),
            _ => self.rng.random_range(h * 0.60..h * 0.75),
        };
        let shape = Shape::ALL[self.rng.random_range(0..Shape::ALL.len())];
        self.launch(x, target_y, shape);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{ColorMode, RenderMode};

    fn sim(width: usize, height: usize) -> Simulation {
        let mut sim = Simulation::new(width, height, "2026", false, 1.0, SoundManager::disabled());
        sim.auto_mode = false;
        sim
    }

    fn canvas(width: usize, height: usize) -> Canvas {
        Canvas::new(width, height, RenderMode::Ascii, ColorMode::Mono)
    }

    #[test]
    fn shell_bursts_into_the_expected_particle_count() {
        let mut sim = sim(200, 600);
        let mut canvas = canvas(200, 600);

        sim.launch(100.0, 50.0, Shape::Sphere);
        assert_eq!(sim.fireworks.len(), 1);

        let mut ticks = 0;
        while !sim.fireworks.is_empty() {
            sim.tick(&mut canvas, 0.0);
            ticks += 1;
            assert!(ticks < 10_000, "shell never exploded");
        }

        // target 50 is above 0.45 * 600, so the burst is boosted 1.5x
        assert_eq!(sim.particles.len(), 225);
    }

    #[test]
    fn low_bursts_are_not_boosted() {
        let mut sim = sim(200, 600);
        let mut canvas = canvas(200, 600);

        sim.launch(100.0, 400.0, Shape::Heart);
        while !sim.fireworks.is_empty() {
            sim.tick(&mut canvas, 0.0);
        }
        assert_eq!(sim.particles.len(), 150);
    }

    #[test]
    fn auto_mode_off_never_adds_shells() {
        let mut sim = sim(200, 600);
        let mut canvas = canvas(200, 600);

        sim.launch_at(60.0, 100.0);
        sim.launch_at(140.0, 300.0);
        let mut prev = sim.fireworks.len();
        for tick in 0..1_000 {
            sim.tick(&mut canvas, tick as f64 / 60.0);
            assert!(
                sim.fireworks.len() <= prev,
                "shell count grew with auto off"
            );
            prev = sim.fireworks.len();
        }
        assert!(sim.fireworks.is_empty());
    }

    #[test]
    fn auto_mode_eventually_launches() {
        let mut sim = sim(200, 600);
        sim.auto_mode = true;
        let mut canvas = canvas(200, 600);
        let mut seen = 0;
        for tick in 0..2_000 {
            sim.tick(&mut canvas, 60.0 + tick as f64 / 60.0);
            seen = seen.max(sim.fireworks.len());
        }
        assert!(seen > 0, "auto mode never launched");
    }

    #[test]
    fn click_inserts_exactly_one_shell_at_the_point() {
        let mut sim = sim(200, 600);
        sim.launch_at(50.0, 50.0);
        assert_eq!(sim.fireworks.len(), 1);
        assert_eq!(sim.fireworks[0].x, 50.0);
        assert_eq!(sim.fireworks[0].target_y, 50.0);
        assert_eq!(sim.fireworks[0].y, 600.0);
    }

    #[test]
    fn flash_decays_to_zero() {
        let mut sim = sim(100, 100);
        let mut canvas = canvas(100, 100);
        sim.flash = 0.2;
        sim.tick(&mut canvas, 0.0);
        assert!(sim.flash < 0.2 && sim.flash > 0.0);
        for _ in 0..200 {
            sim.tick(&mut canvas, 0.0);
        }
        assert_eq!(sim.flash, 0.0);
    }

    #[test]
    fn intro_traces_every_title_character() {
        let mut sim = Simulation::new(400, 200, "26", true, 1.0, SoundManager::disabled());
        sim.auto_mode = false;
        let mut canvas = canvas(400, 200);

        let mut traced = 0;
        for _ in 0..INTRO_DELAY + 3 * INTRO_STAGGER {
            let before = sim.path_fireworks.len();
            sim.tick(&mut canvas, 0.0);
            if sim.path_fireworks.len() > before {
                traced += 1;
            }
        }
        assert_eq!(traced, 2, "expected one tracer wave per character");
    }

    #[test]
    fn traced_shells_burst_into_particles() {
        let mut sim = sim(400, 200);
        let mut canvas = canvas(400, 200);
        sim.path_fireworks
            .push(PathFirework::new(vec![(10.0, 10.0), (20.0, 10.0)], (255, 0, 0)));
        let mut ticks = 0;
        while !sim.path_fireworks.is_empty() {
            sim.tick(&mut canvas, 0.0);
            ticks += 1;
            assert!(ticks < 1_000);
        }
        assert_eq!(sim.particles.len(), 80);
    }

    #[test]
    fn particles_drain_away_completely() {
        let mut sim = sim(200, 600);
        let mut canvas = canvas(200, 600);
        sim.launch(100.0, 300.0, Shape::Spiral);
        for tick in 0..2_000 {
            sim.tick(&mut canvas, tick as f64 / 60.0);
        }
        assert!(sim.particles.is_empty());
        assert!(sim.fireworks.is_empty());
    }

    #[test]
    fn resize_keeps_the_star_field() {
        let mut sim = sim(200, 600);
        let stars = sim.stars.len();
        sim.resize(100, 100);
        assert_eq!(sim.stars.len(), stars);
        assert_eq!((sim.width, sim.height), (100.0, 100.0));
    }
}
