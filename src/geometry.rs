use crate::types::{Orientation, Pt, Rect, Size};

/// The page margin is a fixed half inch on all sides, per the source report
/// format.
pub const PAGE_MARGIN_IN: f32 = 0.5;

/// Resolved physical page layout for one document. Immutable once chosen;
/// the margin is always strictly less than half of either page dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub size: Size,
    pub margin: Pt,
}

impl PageGeometry {
    /// Pure function of orientation: US letter in the requested rotation
    /// with the fixed margin.
    pub fn resolve(orientation: Orientation) -> PageGeometry {
        let size = match orientation {
            Orientation::Portrait => Size::letter(),
            Orientation::Landscape => Size::letter_landscape(),
        };
        PageGeometry {
            size,
            margin: Pt::from_inches(PAGE_MARGIN_IN),
        }
    }

    pub fn content_width(&self) -> Pt {
        self.size.width - self.margin * 2
    }

    /// The area inside the margins available for placed elements.
    pub fn content_rect(&self) -> Rect {
        Rect {
            x: self.margin,
            y: self.margin,
            width: self.content_width(),
            height: self.size.height - self.margin * 2,
        }
    }

    /// Vertical pagination bound: content past this y belongs on a new page.
    pub fn bottom_limit(&self) -> Pt {
        self.size.height - self.margin
    }
}

/// The write position during one assembly pass: page index plus vertical
/// offset from the page top. Threaded by value through the layout helpers;
/// never shared ambient state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub page: usize,
    pub y: Pt,
}

impl Cursor {
    pub fn top_of(page: usize, geometry: &PageGeometry) -> Cursor {
        Cursor {
            page,
            y: geometry.margin,
        }
    }

    pub fn advance(self, dy: Pt) -> Cursor {
        Cursor {
            page: self.page,
            y: self.y + dy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portrait_letter_geometry() {
        let geom = PageGeometry::resolve(Orientation::Portrait);
        assert_eq!(geom.size, Size::from_inches(8.5, 11.0));
        assert_eq!(geom.margin, Pt::from_inches(0.5));
        assert_eq!(geom.content_width(), Pt::from_inches(7.5));
        assert_eq!(geom.bottom_limit(), Pt::from_inches(10.5));
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let geom = PageGeometry::resolve(Orientation::Landscape);
        assert_eq!(geom.size, Size::from_inches(11.0, 8.5));
        assert_eq!(geom.content_width(), Pt::from_inches(10.0));
        let content = geom.content_rect();
        assert_eq!(content.x, geom.margin);
        assert_eq!(content.y, geom.margin);
        assert_eq!(content.height, Pt::from_inches(7.5));
    }

    #[test]
    fn margin_is_under_half_of_both_dimensions() {
        for orientation in [Orientation::Portrait, Orientation::Landscape] {
            let geom = PageGeometry::resolve(orientation);
            assert!(geom.margin < geom.size.width / 2);
            assert!(geom.margin < geom.size.height / 2);
        }
    }
}
