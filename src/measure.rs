use std::borrow::Cow;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Monospace text metrics for fitting labels into fixed-width table nodes.
pub struct TextMetrics {
    pub char_width: f64,
    pub padding_x: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.2,
            padding_x: 16.0,
        }
    }
}

impl TextMetrics {
    pub fn text_width(&self, text: &str) -> f64 {
        let width = UnicodeWidthStr::width(text);
        width as f64 * self.char_width
    }

    /// Truncate `text` with an ellipsis so it fits in `max_width`.
    pub fn fit<'a>(&self, text: &'a str, max_width: f64) -> Cow<'a, str> {
        if self.text_width(text) <= max_width {
            return Cow::Borrowed(text);
        }

        let budget = ((max_width / self.char_width).floor() as usize).saturating_sub(1);
        let mut used = 0;
        let mut out = String::new();
        for c in text.chars() {
            let w = UnicodeWidthChar::width(c).unwrap_or(0);
            if used + w > budget {
                break;
            }
            used += w;
            out.push(c);
        }
        out.push('…');
        Cow::Owned(out)
    }
}
