use crossterm::style::Color;

/// How to render sub-cell pixels to terminal characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RenderMode {
    /// Unicode braille characters (2x4 per cell = highest resolution)
    Braille,
    /// Half-block characters ▀▄█ (1x2 per cell)
    HalfBlock,
    /// Plain ASCII characters with density mapping
    Ascii,
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ColorMode {
    /// No color — monochrome
    Mono,
    /// ANSI 16 colors
    Ansi16,
    /// 256-color palette
    Ansi256,
    /// 24-bit true color (RGB)
    TrueColor,
}

/// Pixel compositing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blend {
    /// Plots overwrite brightness and color.
    Normal,
    /// Plots accumulate brightness (clamped); the brightest write wins the hue.
    Additive,
}

/// A pixel-level canvas that gets rendered to terminal characters.
/// Coordinates are in "sub-cell" pixel space.
pub struct Canvas {
    /// Width in pixels (sub-cell)
    pub width: usize,
    /// Height in pixels (sub-cell)
    pub height: usize,
    /// Pixel data: brightness 0.0..=1.0
    pub pixels: Vec<f64>,
    /// Per-pixel color (used when color mode != Mono)
    pub colors: Vec<(u8, u8, u8)>,
    pub render_mode: RenderMode,
    pub color_mode: ColorMode,
    blend: Blend,
}

impl Canvas {
    pub fn new(
        term_cols: usize,
        term_rows: usize,
        render_mode: RenderMode,
        color_mode: ColorMode,
    ) -> Self {
        let (px_w, px_h) = match render_mode {
            RenderMode::Braille => (term_cols * 2, term_rows * 4),
            RenderMode::HalfBlock => (term_cols, term_rows * 2),
            RenderMode::Ascii => (term_cols, term_rows),
        };
        let size = px_w * px_h;
        Canvas {
            width: px_w,
            height: px_h,
            pixels: vec![0.0; size],
            colors: vec![(255, 255, 255); size],
            render_mode,
            color_mode,
            blend: Blend::Normal,
        }
    }

    /// Terminal dimensions needed for this canvas
    pub fn term_size(&self) -> (usize, usize) {
        match self.render_mode {
            RenderMode::Braille => (self.width / 2, self.height / 4),
            RenderMode::HalfBlock => (self.width, self.height / 2),
            RenderMode::Ascii => (self.width, self.height),
        }
    }

    /// Pixel coordinates at the center of a terminal cell (mouse mapping).
    pub fn pixel_pos(&self, col: usize, row: usize) -> (f64, f64) {
        match self.render_mode {
            RenderMode::Braille => ((col * 2) as f64 + 1.0, (row * 4) as f64 + 2.0),
            RenderMode::HalfBlock => (col as f64, (row * 2) as f64 + 1.0),
            RenderMode::Ascii => (col as f64, row as f64),
        }
    }

    pub fn set_blend(&mut self, blend: Blend) {
        self.blend = blend;
    }

    /// Dim every pixel, keeping `keep` of its brightness. This is what makes
    /// trails linger from one frame to the next instead of clearing.
    pub fn fade(&mut self, keep: f64) {
        for p in &mut self.pixels {
            *p *= keep;
            if *p < 0.004 {
                *p = 0.0;
            }
        }
    }

    /// Plot one pixel. Off-canvas coordinates are ignored.
    pub fn plot(&mut self, x: f64, y: f64, brightness: f64, color: (u8, u8, u8)) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let (xi, yi) = (x as usize, y as usize);
        if xi >= self.width || yi >= self.height {
            return;
        }
        let idx = yi * self.width + xi;
        let b = brightness.clamp(0.0, 1.0);
        match self.blend {
            Blend::Normal => {
                self.pixels[idx] = b;
                self.colors[idx] = color;
            }
            Blend::Additive => {
                let cur = self.pixels[idx];
                self.pixels[idx] = (cur + b).min(1.0);
                if b >= cur {
                    self.colors[idx] = color;
                }
            }
        }
    }

    /// Plot a straight line by parametric stepping.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, brightness: f64, color: (u8, u8, u8)) {
        let steps = ((x2 - x1).abs().max((y2 - y1).abs()).ceil() as usize).max(1);
        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            self.plot(x1 + (x2 - x1) * t, y1 + (y2 - y1) * t, brightness, color);
        }
    }

    /// Fill a disc of the given radius.
    pub fn disc(&mut self, cx: f64, cy: f64, radius: f64, brightness: f64, color: (u8, u8, u8)) {
        let r = radius.ceil() as i64;
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = (dx * dx + dy * dy) as f64;
                if d2 <= radius * radius {
                    self.plot(cx + dx as f64, cy + dy as f64, brightness, color);
                }
            }
        }
    }

    /// Whiten the whole canvas by `intensity` (screen flash).
    pub fn flash(&mut self, intensity: f64) {
        let w = intensity.clamp(0.0, 1.0);
        for (p, c) in self.pixels.iter_mut().zip(self.colors.iter_mut()) {
            *p = (*p + w).min(1.0);
            let (r, g, b) = *c;
            *c = (
                r + ((255 - r) as f64 * w) as u8,
                g + ((255 - g) as f64 * w) as u8,
                b + ((255 - b) as f64 * w) as u8,
            );
        }
    }

    /// Render the canvas to a string buffer for output
    pub fn render(&self) -> String {
        match self.render_mode {
            RenderMode::Braille => super::braille::render(self),
            RenderMode::HalfBlock => super::halfblock::render(self),
            RenderMode::Ascii => self.render_ascii(),
        }
    }

    fn render_ascii(&self) -> String {
        const CHARS: &[u8] = b" .:-=+*#%@";
        let (cols, rows) = self.term_size();
        let mut out = String::with_capacity(cols * rows * 10);
        let use_color = self.color_mode != ColorMode::Mono;
        let mut last_fg = String::new();

        for row in 0..rows {
            for col in 0..cols {
                let idx = row * self.width + col;
                let v = self.pixels[idx].clamp(0.0, 1.0);
                let ci = (v * (CHARS.len() - 1) as f64) as usize;
                let ch = CHARS[ci] as char;

                if use_color && ch != ' ' {
                    let (r, g, b) = self.colors[idx];
                    let fg = color_to_fg(self.map_color(r, g, b));
                    if fg != last_fg {
                        out.push_str("\x1b[");
                        out.push_str(&fg);
                        out.push('m');
                        last_fg = fg;
                    }
                }
                out.push(ch);
            }
            out.push_str("\x1b[0m\x1b[");
            let next_row = row + 2;
            out.push_str(&next_row.to_string());
            out.push_str(";1H");
            last_fg.clear();
        }
        out
    }

    pub fn map_color(&self, r: u8, g: u8, b: u8) -> Color {
        match self.color_mode {
            ColorMode::Mono => Color::White,
            ColorMode::TrueColor => Color::Rgb { r, g, b },
            ColorMode::Ansi256 => {
                // Approximate RGB to the 6x6x6 color cube
                let idx = 16 + (36 * (r as u16 / 51)) + (6 * (g as u16 / 51)) + (b as u16 / 51);
                Color::AnsiValue(idx as u8)
            }
            ColorMode::Ansi16 => {
                let brightness = (r as u16 + g as u16 + b as u16) / 3;
                if brightness < 64 {
                    Color::Black
                } else if r > g && r > b {
                    if brightness > 180 { Color::Red } else { Color::DarkRed }
                } else if g > r && g > b {
                    if brightness > 180 { Color::Green } else { Color::DarkGreen }
                } else if b > r && b > g {
                    if brightness > 180 { Color::Blue } else { Color::DarkBlue }
                } else if brightness > 180 {
                    Color::White
                } else {
                    Color::Grey
                }
            }
        }
    }
}

pub fn color_to_fg(color: Color) -> String {
    match color {
        Color::Rgb { r, g, b } => format!("38;2;{};{};{}", r, g, b),
        Color::AnsiValue(v) => format!("38;5;{}", v),
        Color::Black => "30".into(),
        Color::DarkRed => "31".into(),
        Color::DarkGreen => "32".into(),
        Color::DarkYellow => "33".into(),
        Color::DarkBlue => "34".into(),
        Color::DarkMagenta => "35".into(),
        Color::DarkCyan => "36".into(),
        Color::Grey => "37".into(),
        Color::DarkGrey => "90".into(),
        Color::Red => "91".into(),
        Color::Green => "92".into(),
        Color::Yellow => "93".into(),
        Color::Blue => "94".into(),
        Color::Magenta => "95".into(),
        Color::Cyan => "96".into(),
        Color::White => "97".into(),
        _ => "37".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Canvas {
        Canvas::new(10, 10, RenderMode::Ascii, ColorMode::TrueColor)
    }

    #[test]
    fn fade_keeps_a_fraction_and_floors_to_zero() {
        let mut c = canvas();
        c.plot(3.0, 3.0, 1.0, (255, 0, 0));
        c.fade(0.85);
        assert!((c.pixels[3 * 10 + 3] - 0.85).abs() < 1e-9);
        for _ in 0..100 {
            c.fade(0.85);
        }
        assert_eq!(c.pixels[3 * 10 + 3], 0.0);
    }

    #[test]
    fn additive_plots_accumulate_and_clamp() {
        let mut c = canvas();
        c.set_blend(Blend::Additive);
        c.plot(1.0, 1.0, 0.6, (200, 0, 0));
        c.plot(1.0, 1.0, 0.6, (0, 200, 0));
        assert_eq!(c.pixels[11], 1.0);
        // second write was dimmer than the accumulated value, hue kept
        assert_eq!(c.colors[11], (200, 0, 0));
    }

    #[test]
    fn normal_blend_overwrites() {
        let mut c = canvas();
        c.plot(1.0, 1.0, 1.0, (200, 0, 0));
        c.plot(1.0, 1.0, 0.2, (0, 200, 0));
        assert!((c.pixels[11] - 0.2).abs() < 1e-9);
        assert_eq!(c.colors[11], (0, 200, 0));
    }

    #[test]
    fn plot_ignores_out_of_bounds() {
        let mut c = canvas();
        c.plot(-1.0, 2.0, 1.0, (255, 255, 255));
        c.plot(2.0, 1e9, 1.0, (255, 255, 255));
        assert!(c.pixels.iter().all(|&p| p == 0.0));
    }

    #[test]
    fn line_lights_both_endpoints() {
        let mut c = canvas();
        c.line(0.0, 0.0, 9.0, 9.0, 1.0, (255, 255, 255));
        assert_eq!(c.pixels[0], 1.0);
        assert_eq!(c.pixels[9 * 10 + 9], 1.0);
    }

    #[test]
    fn pixel_dims_follow_render_mode() {
        let c = Canvas::new(40, 20, RenderMode::Braille, ColorMode::Mono);
        assert_eq!((c.width, c.height), (80, 80));
        assert_eq!(c.term_size(), (40, 20));
        let c = Canvas::new(40, 20, RenderMode::HalfBlock, ColorMode::Mono);
        assert_eq!((c.width, c.height), (40, 40));
    }
}
