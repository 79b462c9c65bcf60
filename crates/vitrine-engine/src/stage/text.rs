use crate::coords::Vec2;

use super::TextStyle;

/// Average advance of a glyph relative to the font size.
const ADVANCE: f32 = 0.55;
const ADVANCE_BOLD: f32 = 0.6;
/// Line box height relative to the font size.
const LINE_HEIGHT: f32 = 1.25;

/// Estimates the block size of `content` laid out with `style`.
///
/// Layout happens before the external renderer rasterizes anything, so this
/// uses fixed per-glyph advances rather than real font metrics. Wrapping is
/// greedy on whitespace; a single word wider than the wrap width overflows.
pub fn measure_text(content: &str, style: &TextStyle) -> Vec2 {
    let advance = style.size * if style.bold { ADVANCE_BOLD } else { ADVANCE };
    let line_height = style.size * LINE_HEIGHT;

    if content.is_empty() {
        return Vec2::new(0.0, line_height);
    }

    let mut widest = 0.0f32;
    let mut lines = 0usize;

    for paragraph in content.split('\n') {
        let Some(wrap) = style.wrap_width.filter(|w| *w > 0.0) else {
            widest = widest.max(paragraph.chars().count() as f32 * advance);
            lines += 1;
            continue;
        };

        let mut line_chars = 0usize;
        for word in paragraph.split_whitespace() {
            let word_chars = word.chars().count();
            let candidate = if line_chars == 0 { word_chars } else { line_chars + 1 + word_chars };
            if line_chars > 0 && candidate as f32 * advance > wrap {
                widest = widest.max(line_chars as f32 * advance);
                lines += 1;
                line_chars = word_chars;
            } else {
                line_chars = candidate;
            }
        }
        widest = widest.max(line_chars as f32 * advance);
        lines += 1;
    }

    Vec2::new(widest, lines as f32 * line_height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    fn style(size: f32) -> TextStyle {
        TextStyle::new(size, Color::WHITE)
    }

    #[test]
    fn single_line_scales_with_length() {
        let s = measure_text("abcd", &style(20.0));
        assert_eq!(s, Vec2::new(4.0 * (20.0 * ADVANCE), 20.0 * LINE_HEIGHT));
    }

    #[test]
    fn empty_text_keeps_line_height() {
        assert_eq!(measure_text("", &style(10.0)).y, 10.0 * LINE_HEIGHT);
        assert_eq!(measure_text("", &style(10.0)).x, 0.0);
    }

    #[test]
    fn explicit_newlines_add_lines() {
        let s = measure_text("ab\nabcdef", &style(10.0));
        assert_eq!(s.y, 2.0 * (10.0 * LINE_HEIGHT));
        assert_eq!(s.x, 6.0 * (10.0 * ADVANCE));
    }

    #[test]
    fn wrapping_breaks_on_whitespace() {
        // 10px font → 5.5px per glyph; "aaaa bbbb" is 49.5px, wrap at 30px.
        let s = measure_text("aaaa bbbb", &style(10.0).wrap(30.0));
        assert_eq!(s.y, 2.0 * (10.0 * LINE_HEIGHT));
        assert_eq!(s.x, 4.0 * (10.0 * ADVANCE));
    }

    #[test]
    fn long_word_overflows_instead_of_splitting() {
        let s = measure_text("abcdefghij", &style(10.0).wrap(20.0));
        assert_eq!(s.y, 10.0 * LINE_HEIGHT);
        assert_eq!(s.x, 10.0 * (10.0 * ADVANCE));
    }
}
