use super::canvas::{Canvas, ColorMode, color_to_fg};
use crossterm::style::Color;

fn color_to_bg(color: Color) -> String {
    match color {
        Color::Rgb { r, g, b } => format!("48;2;{};{};{}", r, g, b),
        Color::AnsiValue(v) => format!("48;5;{}", v),
        Color::Black => "40".into(),
        Color::DarkRed => "41".into(),
        Color::DarkGreen => "42".into(),
        Color::DarkYellow => "43".into(),
        Color::DarkBlue => "44".into(),
        Color::DarkMagenta => "45".into(),
        Color::DarkCyan => "46".into(),
        Color::Grey => "47".into(),
        Color::DarkGrey => "100".into(),
        Color::Red => "101".into(),
        Color::Green => "102".into(),
        Color::Yellow => "103".into(),
        Color::Blue => "104".into(),
        Color::Magenta => "105".into(),
        Color::Cyan => "106".into(),
        Color::White => "107".into(),
        _ => "40".into(),
    }
}

/// Pixel brightness below which a half-block cell counts as empty night sky.
/// Much lower than the braille threshold: brightness feeds straight into the
/// color scaling here, so near-black pixels render correctly as dark.
const DARK_THRESHOLD: f64 = 0.02;

pub fn render(canvas: &Canvas) -> String {
    let term_cols = canvas.width;
    let term_rows = canvas.height / 2;
    let mut out = String::with_capacity(term_cols * term_rows * 10);

    let mut last_fg = String::new();
    let mut last_bg = String::new();
    let mut in_color = false;

    for row in 0..term_rows {
        for col in 0..term_cols {
            let top_idx = (row * 2) * canvas.width + col;
            let bot_idx = (row * 2 + 1) * canvas.width + col;

            let top_v = canvas.pixels[top_idx];
            let bot_v = canvas.pixels[bot_idx];

            let top_dark = top_v < DARK_THRESHOLD;
            let bot_dark = bot_v < DARK_THRESHOLD;

            if canvas.color_mode == ColorMode::Mono {
                match (!top_dark, !bot_dark) {
                    (true, true) => out.push('█'),
                    (true, false) => out.push('▀'),
                    (false, true) => out.push('▄'),
                    (false, false) => out.push(' '),
                }
            } else if top_dark && bot_dark {
                if in_color {
                    out.push_str("\x1b[0m");
                    in_color = false;
                    last_fg.clear();
                    last_bg.clear();
                }
                out.push(' ');
            } else {
                let shade = |idx: usize, v: f64| {
                    let (r, g, b) = canvas.colors[idx];
                    let k = v.clamp(0.0, 1.0);
                    canvas.map_color(
                        (r as f64 * k) as u8,
                        (g as f64 * k) as u8,
                        (b as f64 * k) as u8,
                    )
                };

                let fg = color_to_fg(shade(top_idx, top_v));
                let bg = color_to_bg(shade(bot_idx, bot_v));

                match (fg != last_fg, bg != last_bg) {
                    (true, true) => {
                        out.push_str("\x1b[");
                        out.push_str(&fg);
                        out.push(';');
                        out.push_str(&bg);
                        out.push('m');
                    }
                    (true, false) => {
                        out.push_str("\x1b[");
                        out.push_str(&fg);
                        out.push('m');
                    }
                    (false, true) => {
                        out.push_str("\x1b[");
                        out.push_str(&bg);
                        out.push('m');
                    }
                    (false, false) => {}
                }
                if fg != last_fg {
                    last_fg = fg;
                }
                if bg != last_bg {
                    last_bg = bg;
                }
                in_color = true;

                out.push('▀');
            }
        }
        if in_color {
            out.push_str("\x1b[0m");
            in_color = false;
            last_fg.clear();
            last_bg.clear();
        }
        out.push_str("\x1b[");
        let next_row = row + 2;
        out.push_str(&next_row.to_string());
        out.push_str(";1H");
    }
    out
}
