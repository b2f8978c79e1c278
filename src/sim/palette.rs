use rand::RngExt;

/// Warm shell colors, gold through orange into pink. The dominant palette.
pub const WARM: [(u8, u8, u8); 7] = [
    (255, 215, 0),   // gold
    (255, 165, 0),   // orange
    (255, 107, 53),  // orange-red
    (255, 69, 0),    // red-orange
    (255, 20, 147),  // deep pink
    (255, 105, 180), // hot pink
    (255, 179, 71),  // apricot
];

/// Cool blue accents.
pub const COOL: [(u8, u8, u8); 4] = [
    (30, 144, 255),  // dodger blue
    (0, 191, 255),   // deep sky blue
    (0, 206, 209),   // turquoise
    (135, 206, 235), // sky blue
];

/// Near-white sparkle tones.
pub const SPARKLE: [(u8, u8, u8); 3] = [
    (255, 255, 255),
    (255, 250, 205), // lemon chiffon
    (255, 215, 0),   // gold
];

/// The two pinks a heart burst alternates between.
pub const HEART: [(u8, u8, u8); 2] = [(255, 20, 147), (255, 105, 180)];

/// Uniform draw from a palette.
pub fn pick(palette: &[(u8, u8, u8)], rng: &mut impl RngExt) -> (u8, u8, u8) {
    palette[rng.random_range(0..palette.len())]
}

/// Shell color draw: 60% warm, 30% cool, 10% sparkle.
pub fn shell_color(rng: &mut impl RngExt) -> (u8, u8, u8) {
    let roll = rng.random_range(0.0..1.0);
    if roll < 0.6 {
        pick(&WARM, rng)
    } else if roll < 0.9 {
        pick(&COOL, rng)
    } else {
        pick(&SPARKLE, rng)
    }
}

/// HSL to RGB. `h` in degrees (wrapped), `s` and `l` in 0.0..=1.0.
pub fn hsl(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r1, g1, b1) = if h < 60.0 {
        (c, x, 0.0)
    } else if h < 120.0 {
        (x, c, 0.0)
    } else if h < 180.0 {
        (0.0, c, x)
    } else if h < 240.0 {
        (0.0, x, c)
    } else if h < 300.0 {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (
        ((r1 + m) * 255.0).clamp(0.0, 255.0) as u8,
        ((g1 + m) * 255.0).clamp(0.0, 255.0) as u8,
        ((b1 + m) * 255.0).clamp(0.0, 255.0) as u8,
    )
}

/// A color stop in a gradient.
#[derive(Clone, Copy)]
pub struct ColorStop {
    pub t: f64,
    pub color: (u8, u8, u8),
}

/// Linear gradient between color stops, sampled by parameter t in 0.0..=1.0.
/// Stops must be sorted by t.
#[derive(Clone)]
pub struct ColorGradient {
    stops: Vec<ColorStop>,
}

impl ColorGradient {
    pub fn new(stops: Vec<ColorStop>) -> Self {
        assert!(stops.len() >= 2, "ColorGradient requires at least 2 stops");
        ColorGradient { stops }
    }

    pub fn sample(&self, t: f64) -> (u8, u8, u8) {
        let t = t.clamp(0.0, 1.0);
        if t <= self.stops[0].t {
            return self.stops[0].color;
        }
        let last = &self.stops[self.stops.len() - 1];
        if t >= last.t {
            return last.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t >= a.t && t <= b.t {
                let frac = (t - a.t) / (b.t - a.t);
                let lerp = |from: u8, to: u8| -> u8 {
                    (from as f64 + (to as f64 - from as f64) * frac) as u8
                };
                return (
                    lerp(a.color.0, b.color.0),
                    lerp(a.color.1, b.color.1),
                    lerp(a.color.2, b.color.2),
                );
            }
        }
        last.color
    }
}
