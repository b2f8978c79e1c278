//! Hand-authored stroke polylines for title characters.
//!
//! Coordinates are glyph-local, roughly -0.25..0.25 horizontally and
//! -0.4..0.4 vertically (y grows downward), scaled by the glyph size at
//! layout time. Characters without an entry get a generic loop so a title
//! never fails to render.

pub type Stroke = &'static [(f64, f64)];

/// Loop traced for characters with no authored strokes.
const FALLBACK: &[Stroke] = &[&[(0.2, 0.0), (0.0, 0.2), (-0.2, 0.0), (0.0, -0.2), (0.2, 0.0)]];

pub fn char_strokes(c: char) -> &'static [Stroke] {
    match c {
        '0' => &[&[
            (0.25, 0.0),
            (0.2, -0.25),
            (0.0, -0.4),
            (-0.2, -0.25),
            (-0.25, 0.0),
            (-0.2, 0.25),
            (0.0, 0.4),
            (0.2, 0.25),
            (0.25, 0.0),
        ]],
        '1' => &[
            &[(-0.12, -0.25), (0.0, -0.4), (0.0, 0.4)],
            &[(-0.15, 0.4), (0.15, 0.4)],
        ],
        '2' => &[&[
            (-0.25, -0.25),
            (-0.2, -0.35),
            (0.0, -0.4),
            (0.2, -0.35),
            (0.25, -0.25),
            (0.25, -0.15),
            (0.2, -0.1),
            (0.0, 0.0),
            (-0.2, 0.1),
            (-0.25, 0.2),
            (-0.25, 0.3),
            (0.0, 0.4),
            (0.25, 0.35),
        ]],
        '3' => &[&[
            (-0.2, -0.3),
            (0.0, -0.4),
            (0.2, -0.3),
            (0.25, -0.15),
            (0.05, 0.0),
            (0.25, 0.15),
            (0.2, 0.3),
            (0.0, 0.4),
            (-0.2, 0.3),
        ]],
        '4' => &[
            &[(0.1, 0.4), (0.1, -0.4), (-0.25, 0.15), (0.25, 0.15)],
        ],
        '5' => &[&[
            (0.22, -0.4),
            (-0.2, -0.4),
            (-0.22, -0.05),
            (0.0, -0.1),
            (0.2, 0.0),
            (0.25, 0.2),
            (0.1, 0.38),
            (-0.12, 0.4),
            (-0.25, 0.3),
        ]],
        '6' => &[&[
            (0.1, -0.1),
            (0.15, -0.25),
            (0.0, -0.4),
            (-0.15, -0.25),
            (-0.2, 0.0),
            (-0.15, 0.15),
            (0.0, 0.3),
            (0.15, 0.35),
            (0.25, 0.2),
            (0.25, 0.1),
        ]],
        '7' => &[&[(-0.25, -0.4), (0.25, -0.4), (0.0, 0.4)]],
        '8' => &[
            &[
                (0.0, -0.05),
                (-0.18, -0.15),
                (-0.15, -0.32),
                (0.0, -0.4),
                (0.15, -0.32),
                (0.18, -0.15),
                (0.0, -0.05),
            ],
            &[
                (0.0, -0.05),
                (0.2, 0.1),
                (0.22, 0.28),
                (0.0, 0.4),
                (-0.22, 0.28),
                (-0.2, 0.1),
                (0.0, -0.05),
            ],
        ],
        // '9' is '6' rotated half a turn
        '9' => &[&[
            (-0.1, 0.1),
            (-0.15, 0.25),
            (0.0, 0.4),
            (0.15, 0.25),
            (0.2, 0.0),
            (0.15, -0.15),
            (0.0, -0.3),
            (-0.15, -0.35),
            (-0.25, -0.2),
            (-0.25, -0.1),
        ]],
        _ => FALLBACK,
    }
}

/// Font size used for the title on a canvas of the given pixel dimensions.
pub fn title_font_size(width: f64, height: f64) -> f64 {
    width.min(height) * 0.15
}

/// Per-character layout for a (possibly multi-line) title centered on
/// (cx, cy): `(char, center_x, center_y, glyph_scale)`. Spaces are skipped.
pub fn layout(text: &str, cx: f64, cy: f64, font_size: f64) -> Vec<(char, f64, f64, f64)> {
    let glyph_scale = font_size * 0.8;
    let spacing = glyph_scale * 0.7;
    let line_height = font_size * 1.2;

    let lines: Vec<&str> = text.split('\n').collect();
    let total_height = (lines.len().saturating_sub(1)) as f64 * line_height;

    let mut out = Vec::new();
    for (li, line) in lines.iter().enumerate() {
        let y = cy - total_height / 2.0 + li as f64 * line_height;
        let chars: Vec<char> = line.chars().collect();
        let start_x = cx - (chars.len() as f64 * spacing) / 2.0 + spacing / 2.0;
        for (ci, &c) in chars.iter().enumerate() {
            if c == ' ' {
                continue;
            }
            out.push((c, start_x + ci as f64 * spacing, y, glyph_scale));
        }
    }
    out
}

/// Stroke polylines for one character, scaled and positioned in canvas space.
pub fn char_paths_at(c: char, x: f64, y: f64, scale: f64) -> Vec<Vec<(f64, f64)>> {
    char_strokes(c)
        .iter()
        .map(|stroke| {
            stroke
                .iter()
                .map(|&(ux, uy)| (x + ux * scale, y + uy * scale))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_have_authored_strokes() {
        for c in '0'..='9' {
            let strokes = char_strokes(c);
            assert_ne!(strokes, FALLBACK, "digit {c} fell back");
            for stroke in strokes {
                assert!(stroke.len() >= 2, "degenerate stroke for {c}");
            }
        }
    }

    #[test]
    fn unknown_chars_fall_back_to_loop() {
        assert_eq!(char_strokes('@'), FALLBACK);
        assert_eq!(char_strokes('年'), FALLBACK);
        // the fallback is a closed loop
        let stroke = FALLBACK[0];
        assert_eq!(stroke.first(), stroke.last());
    }

    #[test]
    fn layout_centers_a_line() {
        let chars = layout("00", 100.0, 50.0, 20.0);
        assert_eq!(chars.len(), 2);
        let mid = (chars[0].1 + chars[1].1) / 2.0;
        assert!((mid - 100.0).abs() < 1e-9);
        assert_eq!(chars[0].2, 50.0);
    }

    #[test]
    fn layout_skips_spaces_and_stacks_lines() {
        let chars = layout("1 2\n3", 0.0, 0.0, 10.0);
        assert_eq!(chars.len(), 3);
        // second line sits one line-height below the first
        let dy = chars[2].2 - chars[0].2;
        assert!((dy - 12.0).abs() < 1e-9);
    }

    #[test]
    fn char_paths_scale_and_translate() {
        let paths = char_paths_at('7', 10.0, 20.0, 100.0);
        assert_eq!(paths.len(), 1);
        let close = |a: (f64, f64), b: (f64, f64)| (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9;
        assert!(close(paths[0][0], (-15.0, -20.0)));
        assert!(close(paths[0][1], (35.0, -20.0)));
    }
}
