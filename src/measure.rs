use crate::types::{FontStyle, Pt};

/// Width-measurement capability injected into the layout algorithms. The
/// real measurer belongs to whatever renders the document; layout only needs
/// the widths, so it stays testable without a font engine.
pub trait TextMeasure {
    fn text_width(&self, text: &str, style: FontStyle, font_size: Pt) -> Pt;
}

impl<F> TextMeasure for F
where
    F: Fn(&str, FontStyle, Pt) -> Pt,
{
    fn text_width(&self, text: &str, style: FontStyle, font_size: Pt) -> Pt {
        self(text, style, font_size)
    }
}

/// Heuristic default: every character advances a fixed fraction of an em,
/// bold slightly wider. Coarse, but stable, and good enough to paginate with
/// when no renderer metrics are attached.
#[derive(Debug, Clone, Copy)]
pub struct CharCellMetrics {
    pub em_fraction: f32,
    pub bold_factor: f32,
}

impl Default for CharCellMetrics {
    fn default() -> Self {
        Self {
            em_fraction: 0.6,
            bold_factor: 1.05,
        }
    }
}

impl TextMeasure for CharCellMetrics {
    fn text_width(&self, text: &str, style: FontStyle, font_size: Pt) -> Pt {
        let char_width = (font_size * self.em_fraction).max(Pt::from_f32(1.0));
        let count = text.chars().count() as i32;
        let base = char_width * count;
        match style {
            FontStyle::Regular => base,
            FontStyle::Bold => base * self.bold_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_cell_width_scales_with_length_and_size() {
        let metrics = CharCellMetrics::default();
        let size = Pt::from_f32(10.0);
        let one = metrics.text_width("a", FontStyle::Regular, size);
        assert_eq!(one, Pt::from_f32(6.0));
        let five = metrics.text_width("abcde", FontStyle::Regular, size);
        assert_eq!(five, Pt::from_f32(30.0));
        assert_eq!(
            metrics.text_width("", FontStyle::Regular, size),
            Pt::ZERO
        );
    }

    #[test]
    fn bold_is_wider_than_regular() {
        let metrics = CharCellMetrics::default();
        let size = Pt::from_f32(11.0);
        let regular = metrics.text_width("Leaves:", FontStyle::Regular, size);
        let bold = metrics.text_width("Leaves:", FontStyle::Bold, size);
        assert!(bold > regular);
    }

    #[test]
    fn closures_satisfy_the_measure_trait() {
        let fixed_width = |text: &str, _style: FontStyle, _size: Pt| {
            Pt::from_f32(text.chars().count() as f32)
        };
        assert_eq!(
            fixed_width.text_width("abcd", FontStyle::Regular, Pt::from_f32(9.0)),
            Pt::from_f32(4.0)
        );
    }
}
