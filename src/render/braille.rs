use super::canvas::{Canvas, ColorMode, color_to_fg};

/// Braille dot positions within a 2x4 cell:
/// (0,0) (1,0)    dot1 dot4
/// (0,1) (1,1)    dot2 dot5
/// (0,2) (1,2)    dot3 dot6
/// (0,3) (1,3)    dot7 dot8
///
/// Unicode braille: U+2800 + dot_bits
const BRAILLE_OFFSET: u32 = 0x2800;
const DOT_MAP: [(usize, usize, u32); 8] = [
    (0, 0, 0x01),
    (0, 1, 0x02),
    (0, 2, 0x04),
    (1, 0, 0x08),
    (1, 1, 0x10),
    (1, 2, 0x20),
    (0, 3, 0x40),
    (1, 3, 0x80),
];

/// Brightness above which a dot is lit. Low enough that fading trails stay
/// visible for a handful of frames before dropping out.
const THRESHOLD: f64 = 0.08;

pub fn render(canvas: &Canvas) -> String {
    let term_cols = canvas.width / 2;
    let term_rows = canvas.height / 4;
    let mut out = String::with_capacity(term_cols * term_rows * 20);

    for row in 0..term_rows {
        for col in 0..term_cols {
            let px = col * 2;
            let py = row * 4;

            let mut bits: u32 = 0;
            let mut weight = 0.0;
            let mut sum = (0.0, 0.0, 0.0);

            for &(dx, dy, bit) in &DOT_MAP {
                let x = px + dx;
                let y = py + dy;
                if x < canvas.width && y < canvas.height {
                    let idx = y * canvas.width + x;
                    let v = canvas.pixels[idx];
                    if v > THRESHOLD {
                        bits |= bit;
                        let (r, g, b) = canvas.colors[idx];
                        // weight the cell color by dot brightness so a bright
                        // head dominates its own dim trail
                        sum.0 += r as f64 * v;
                        sum.1 += g as f64 * v;
                        sum.2 += b as f64 * v;
                        weight += v;
                    }
                }
            }

            let ch = char::from_u32(BRAILLE_OFFSET + bits).unwrap_or(' ');

            if canvas.color_mode != ColorMode::Mono && weight > 0.0 {
                let r = (sum.0 / weight) as u8;
                let g = (sum.1 / weight) as u8;
                let b = (sum.2 / weight) as u8;
                let color = canvas.map_color(r, g, b);
                out.push_str(&format!("\x1b[{}m{}", color_to_fg(color), ch));
            } else {
                out.push(ch);
            }
        }
        if canvas.color_mode != ColorMode::Mono {
            out.push_str("\x1b[0m");
        }
        // Cursor movement instead of \n avoids blank-line issues
        out.push_str(&format!("\x1b[{};1H", row + 2));
    }
    out
}
