use crate::canvas::Canvas;
use crate::error::KeyplateError;
use crate::geometry::{Cursor, PageGeometry};
use crate::types::Pt;

/// Key used by the per-page section `Meta` tags the composer and paginator
/// emit.
pub const META_SECTION_KEY: &str = "kp:section";

/// Fixed-row-height table pagination. The paginator owns only the vertical
/// arithmetic: cell drawing is delegated to the caller's closures so the
/// same machinery works for any fixed-column table.
///
/// Guarantee: every page that carries at least one row also carries the
/// header, drawn before that page's first row.
#[derive(Debug, Clone, Copy)]
pub struct TablePaginator {
    pub row_height: Pt,
    pub header_height: Pt,
}

impl TablePaginator {
    pub fn new(row_height: Pt, header_height: Pt) -> Self {
        Self {
            row_height,
            header_height,
        }
    }

    /// Draws the header, then rows, breaking to a fresh page whenever the
    /// next row would cross the bottom margin. Returns the cursor after the
    /// last row so callers can continue below the table.
    pub fn paginate<R>(
        &self,
        canvas: &mut Canvas,
        geometry: &PageGeometry,
        mut cursor: Cursor,
        section: &str,
        rows: &[R],
        mut draw_header: impl FnMut(&mut Canvas, Pt),
        mut draw_row: impl FnMut(&mut Canvas, &R, Pt) -> Result<(), KeyplateError>,
    ) -> Result<Cursor, KeyplateError> {
        draw_header(canvas, cursor.y);
        cursor = cursor.advance(self.header_height);

        for row in rows {
            if cursor.y + self.row_height > geometry.bottom_limit() {
                canvas.show_page();
                cursor = Cursor::top_of(cursor.page + 1, geometry);
                canvas.meta(META_SECTION_KEY, section);
                draw_header(canvas, cursor.y);
                cursor = cursor.advance(self.header_height);
            }
            draw_row(canvas, row, cursor.y)?;
            cursor = cursor.advance(self.row_height);
        }
        Ok(cursor)
    }
}
