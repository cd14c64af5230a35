//! Greedy word wrapping against measured glyph advances.

use super::font::FontMetrics;

/// Wrap `text` into lines no wider than `width`.
///
/// Explicit newlines start a new line. Words wider than the column are
/// broken between characters. Blank text yields no lines.
pub fn wrap_text(text: &str, font: &dyn FontMetrics, size: f32, width: f32) -> Vec<String> {
    let space = font.advance(' ', size);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_width = 0.0;

        for word in paragraph.split_whitespace() {
            let word_width = font.text_width(word, size);

            if !line.is_empty() {
                if line_width + space + word_width <= width {
                    line.push(' ');
                    line.push_str(word);
                    line_width += space + word_width;
                    continue;
                }
                lines.push(std::mem::take(&mut line));
            }

            if word_width <= width {
                line.push_str(word);
                line_width = word_width;
            } else {
                let mut pieces = break_word(word, font, size, width);
                let last = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
                line_width = font.text_width(&last, size);
                line = last;
            }
        }

        if !line.is_empty() {
            lines.push(line);
        }
    }

    lines
}

/// Height of `lines` set in `font` at `size`.
pub fn text_height(lines: &[String], font: &dyn FontMetrics, size: f32) -> f32 {
    lines.len() as f32 * font.line_height(size)
}

fn break_word(word: &str, font: &dyn FontMetrics, size: f32, width: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut piece = String::new();
    let mut piece_width = 0.0;

    for ch in word.chars() {
        let advance = font.advance(ch, size);
        if !piece.is_empty() && piece_width + advance > width {
            pieces.push(std::mem::take(&mut piece));
            piece_width = 0.0;
        }
        piece.push(ch);
        piece_width += advance;
    }

    if !piece.is_empty() {
        pieces.push(piece);
    }
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font::StandardFont;

    // Courier at size 10: 6 units per character
    const FONT: StandardFont = StandardFont::Courier;

    #[test]
    fn test_wraps_on_words() {
        let lines = wrap_text("aaa bbb ccc", &FONT, 10.0, 42.0);
        assert_eq!(lines, vec!["aaa bbb", "ccc"]);
    }

    #[test]
    fn test_exact_fit() {
        let lines = wrap_text("aaa bbb", &FONT, 10.0, 42.0);
        assert_eq!(lines, vec!["aaa bbb"]);
    }

    #[test]
    fn test_long_word_is_broken() {
        let lines = wrap_text("x abcdefghij", &FONT, 10.0, 24.0);
        assert_eq!(lines, vec!["x", "abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_newlines_and_blank_text() {
        let lines = wrap_text("one\n\ntwo", &FONT, 10.0, 100.0);
        assert_eq!(lines, vec!["one", "two"]);
        assert!(wrap_text("   ", &FONT, 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_text_height() {
        let lines = vec!["a".to_string(), "b".to_string()];
        let height = text_height(&lines, &FONT, 10.0);
        assert!((height - 15.72).abs() < 1e-3);
    }
}
