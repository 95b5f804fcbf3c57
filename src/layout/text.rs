//! Greedy line breaking for styled spans.
//!
//! Words are separated by spaces; `\n` forces a break. A word wider than the
//! line is split between characters so text never runs past the right edge.

use super::{FontMetrics, Span};

/// A run of same-span text within a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// Offset from the start of the line.
    pub x: f64,
    pub text: String,
    /// Index into the spans passed to [`wrap`].
    pub span: usize,
}

/// One laid out line.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub runs: Vec<Run>,
    pub width: f64,
    /// Largest line height among the spans on this line.
    pub line_height: f64,
    /// Largest font size among the spans on this line.
    pub size: f64,
}

impl Line {
    fn empty(span: &Span) -> Self {
        Self {
            runs: Vec::new(),
            width: 0.0,
            line_height: span.style.line_height,
            size: span.style.size,
        }
    }

    fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    fn push(&mut self, index: usize, span: &Span, word: &str, gap: f64, word_width: f64) {
        match self.runs.last_mut() {
            Some(run) if run.span == index => {
                if gap > 0.0 {
                    run.text.push(' ');
                }
                run.text.push_str(word);
            }
            _ => {
                let text = if gap > 0.0 {
                    format!(" {}", word)
                } else {
                    word.to_string()
                };
                self.runs.push(Run {
                    x: self.width,
                    text,
                    span: index,
                });
            }
        }
        self.width += gap + word_width;
        self.line_height = self.line_height.max(span.style.line_height);
        self.size = self.size.max(span.style.size);
    }
}

/// Split `word` into pieces no wider than `max_width` (at least one char each).
fn split_word<'w>(
    word: &'w str,
    span: &Span,
    max_width: f64,
    metrics: &dyn FontMetrics,
) -> Vec<&'w str> {
    let width = |s: &str| metrics.text_width(s, &span.style.font, span.style.size);
    if width(word) <= max_width {
        return vec![word];
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (i, c) in word.char_indices() {
        let end = i + c.len_utf8();
        if i > start && width(&word[start..end]) > max_width {
            pieces.push(&word[start..i]);
            start = i;
        }
    }
    pieces.push(&word[start..]);
    pieces
}

/// Break `spans` into lines no wider than `max_width`.
///
/// Always returns at least one line.
pub fn wrap(spans: &[Span], max_width: f64, metrics: &dyn FontMetrics) -> Vec<Line> {
    let Some(first) = spans.first() else {
        return Vec::new();
    };

    let mut lines = Vec::new();
    let mut line = Line::empty(first);
    let mut gap = false;

    for (index, span) in spans.iter().enumerate() {
        let measure = |s: &str| metrics.text_width(s, &span.style.font, span.style.size);
        for (n, segment) in span.text.split('\n').enumerate() {
            if n > 0 {
                lines.push(std::mem::replace(&mut line, Line::empty(span)));
                gap = false;
            }
            for (j, word) in segment.split(' ').enumerate() {
                if j > 0 {
                    gap = true;
                }
                if word.is_empty() {
                    continue;
                }
                for piece in split_word(word, span, max_width, metrics) {
                    let piece_width = measure(piece);
                    let mut space = if gap && !line.is_empty() {
                        measure(" ")
                    } else {
                        0.0
                    };
                    if !line.is_empty() && line.width + space + piece_width > max_width {
                        lines.push(std::mem::replace(&mut line, Line::empty(span)));
                        space = 0.0;
                    }
                    line.push(index, span, piece, space, piece_width);
                    gap = false;
                }
            }
        }
    }
    lines.push(line);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{StandardMetrics, TextStyle};

    fn span(text: &str, size: f64) -> Span {
        Span {
            text: text.into(),
            style: TextStyle {
                font: "Helvetica".into(),
                size,
                line_height: size * 1.1,
            },
        }
    }

    fn texts(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.runs.iter().map(|r| r.text.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_hard_breaks() {
        let lines = wrap(&[span("CH44\nMax Muster\nCH-8000", 10.0)], 500.0, &StandardMetrics);
        assert_eq!(texts(&lines), vec!["CH44", "Max Muster", "CH-8000"]);
    }

    #[test]
    fn test_greedy_wrap() {
        // "0000" = 22.24pt at 10pt, space = 2.78pt
        let lines = wrap(&[span("0000 0000 0000", 10.0)], 50.0, &StandardMetrics);
        assert_eq!(texts(&lines), vec!["0000 0000", "0000"]);
        assert!(lines.iter().all(|l| l.width <= 50.0));
    }

    #[test]
    fn test_long_word_is_split() {
        let word = "0".repeat(30);
        let lines = wrap(&[span(&word, 10.0)], 50.0, &StandardMetrics);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.width <= 50.0 + 1e-9));
        assert_eq!(texts(&lines).concat(), word);
    }

    #[test]
    fn test_spans_join_without_space() {
        let lines = wrap(
            &[span("Name AV1:", 7.0), span(" UV;Data", 8.0)],
            500.0,
            &StandardMetrics,
        );
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].runs.len(), 2);
        assert_eq!(lines[0].runs[1].text, " UV;Data");
        assert!(lines[0].runs[1].x > 0.0);
        assert_eq!(lines[0].size, 8.0);

        let joined = wrap(&[span("ab", 7.0), span("cd", 7.0)], 500.0, &StandardMetrics);
        assert_eq!(texts(&joined), vec!["abcd"]);
    }

    #[test]
    fn test_empty_text_is_one_line() {
        assert_eq!(wrap(&[span("", 10.0)], 100.0, &StandardMetrics).len(), 1);
        assert!(wrap(&[], 100.0, &StandardMetrics).is_empty());
    }
}
