use crate::measure::TextMeasure;
use crate::text::{SourceLine, TextSpan};
use crate::types::{FontStyle, Pt};

/// One positioned run of text on an emitted line. `x_offset` is relative to
/// the content box, not the page edge.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSegment {
    pub text: String,
    pub emphasized: bool,
    pub x_offset: Pt,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLine {
    pub segments: Vec<LineSegment>,
}

/// Greedy span wrapper. Spans are placed left to right from `indent`; a span
/// that would cross `max_width` flushes the line and restarts at `indent`.
/// A span wider than the line by itself is emitted alone and overflows (no
/// hyphenation). Lazy: lines are produced on demand and the wrapper knows
/// nothing about pages.
pub fn wrap<'a, M: TextMeasure + ?Sized>(
    line: &'a SourceLine,
    measure: &'a M,
    font_size: Pt,
    max_width: Pt,
    indent: Pt,
) -> WrappedLines<'a, M> {
    WrappedLines {
        spans: &line.spans,
        measure,
        font_size,
        max_width,
        indent,
        index: 0,
    }
}

pub struct WrappedLines<'a, M: ?Sized> {
    spans: &'a [TextSpan],
    measure: &'a M,
    font_size: Pt,
    max_width: Pt,
    indent: Pt,
    index: usize,
}

impl<'a, M: TextMeasure + ?Sized> Iterator for WrappedLines<'a, M> {
    type Item = RenderedLine;

    fn next(&mut self) -> Option<RenderedLine> {
        if self.index >= self.spans.len() {
            return None;
        }
        let mut segments = Vec::new();
        let mut cursor = self.indent;
        while let Some(span) = self.spans.get(self.index) {
            let style = if span.emphasized {
                FontStyle::Bold
            } else {
                FontStyle::Regular
            };
            let width = self.measure.text_width(&span.text, style, self.font_size);
            if !segments.is_empty() && cursor + width > self.max_width {
                break;
            }
            segments.push(LineSegment {
                text: span.text.clone(),
                emphasized: span.emphasized,
                x_offset: cursor,
            });
            cursor += width;
            self.index += 1;
            if cursor > self.max_width {
                // The span was placed at the line start and overflows on its
                // own; nothing else fits after it.
                break;
            }
        }
        Some(RenderedLine { segments })
    }
}
