use crate::bitmap::Bitmap;
use crate::canvas::{Canvas, Command, Document};
use crate::debug::DebugLogger;
use crate::error::KeyplateError;
use crate::fit::{fit_longest_side, fit_within};
use crate::geometry::{Cursor, PageGeometry};
use crate::measure::{CharCellMetrics, TextMeasure};
use crate::metrics::{DocumentMetrics, PageMetrics};
use crate::table::{META_SECTION_KEY, TablePaginator};
use crate::text::source_lines;
use crate::types::{Color, FontStyle, Orientation, Pt, Rect};
use crate::wrap::wrap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

const TITLE_FONT_SIZE: f32 = 18.0;
const BODY_FONT_SIZE: f32 = 11.0;
const HEADER_FONT_SIZE: f32 = 10.0;
const ROW_FONT_SIZE: f32 = 9.0;

// Vertical rhythm, in inches, from the source report format.
const COVER_TITLE_DROP_IN: f32 = 0.3;
const COVER_IMAGE_DROP_IN: f32 = 0.6;
const THUMB_MAX_SIDE_IN: f32 = 3.0;
const THUMB_GAP_IN: f32 = 0.3;
const HEADING_GAP_IN: f32 = 0.5;
const LINE_HEIGHT_IN: f32 = 0.25;
const BULLET_INDENT_IN: f32 = 0.2;
const ROW_HEIGHT_IN: f32 = 0.4;
const HEADER_HEIGHT_IN: f32 = 0.3;
const SWATCH_INSET_IN: f32 = 0.05;
const SWATCH_SIDE_IN: f32 = 0.25;
const SWATCH_RISE_IN: f32 = 0.2;
const NUMBER_CENTER_IN: f32 = 0.5;

const GUIDE_HEADING: &str = "Coloring Guide";
const KEY_HEADING: &str = "Color Key";
const BULLET_GLYPH: &str = "\u{2022}";

const KEY_COLUMNS: [&str; 5] = ["Swatch", "Hex", "Picture Part", "Pencil Color", "No."];

/// One row of the color key. The swatch fill is derived from `hex` at render
/// time, so a malformed entry aborts the whole build instead of painting a
/// default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorEntry {
    pub hex: String,
    pub picture_part: String,
    pub pencil_name: String,
    pub pencil_number: String,
}

impl ColorEntry {
    pub fn new(
        hex: impl Into<String>,
        picture_part: impl Into<String>,
        pencil_name: impl Into<String>,
        pencil_number: impl Into<String>,
    ) -> Self {
        Self {
            hex: hex.into(),
            picture_part: picture_part.into(),
            pencil_name: pencil_name.into(),
            pencil_number: pencil_number.into(),
        }
    }

    pub fn swatch(&self) -> Result<Color, KeyplateError> {
        Color::from_hex(&self.hex)
    }
}

/// Everything the compositor consumes. Produced by external collaborators:
/// the generated line art, the uploaded photo, the raw instructions text and
/// the extracted palette.
#[derive(Debug, Clone)]
pub struct ReportSpec {
    pub title: String,
    pub cover: Bitmap,
    pub photo: Bitmap,
    pub instructions: String,
    pub colors: Vec<ColorEntry>,
}

/// Assembles the three-section report: cover page, coloring guide, color
/// key. One composer builds one document; all cursor state lives inside the
/// single `compose` pass.
pub struct ReportComposer {
    spec: ReportSpec,
    orientation: Option<Orientation>,
    measure: Box<dyn TextMeasure>,
    cancel: Option<Arc<AtomicBool>>,
    debug: Option<DebugLogger>,
}

impl ReportComposer {
    pub fn new(spec: ReportSpec) -> Self {
        Self {
            spec,
            orientation: None,
            measure: Box::new(CharCellMetrics::default()),
            cancel: None,
            debug: None,
        }
    }

    /// Overrides the orientation; by default it follows the photo's aspect.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Installs renderer-supplied text metrics in place of the heuristic
    /// default.
    pub fn with_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    /// Cooperative cancellation, checked between page sections.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Writes a JSONL build log (page breaks, counters) to `path`.
    pub fn with_debug_log(mut self, path: impl AsRef<Path>) -> Result<Self, KeyplateError> {
        self.debug = Some(DebugLogger::new(path)?);
        Ok(self)
    }

    pub fn compose(self) -> Result<Document, KeyplateError> {
        Ok(self.compose_with_metrics()?.0)
    }

    pub fn compose_with_metrics(self) -> Result<(Document, DocumentMetrics), KeyplateError> {
        let started = Instant::now();
        let orientation = self.orientation.unwrap_or_else(|| {
            Orientation::for_photo(self.spec.photo.width, self.spec.photo.height)
        });
        let geometry = PageGeometry::resolve(orientation);
        let mut canvas = Canvas::new(geometry.size);

        self.check_cancelled()?;
        self.compose_cover(&mut canvas, &geometry)?;

        self.check_cancelled()?;
        let cursor = self.compose_guide(&mut canvas, &geometry)?;

        self.check_cancelled()?;
        self.compose_key(&mut canvas, &geometry, cursor)?;

        if let Some(debug) = &self.debug {
            debug.emit_summary("compose");
            debug.flush();
        }

        let document = canvas.finish();
        let metrics = document_metrics(&document, started);
        Ok((document, metrics))
    }

    fn check_cancelled(&self) -> Result<(), KeyplateError> {
        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Err(KeyplateError::Cancelled);
            }
        }
        Ok(())
    }

    fn draw_centered(&self, canvas: &mut Canvas, geometry: &PageGeometry, y: Pt, text: &str) {
        let width = self
            .measure
            .text_width(text, FontStyle::Regular, Pt::from_f32(TITLE_FONT_SIZE));
        canvas.draw_string((geometry.size.width - width) / 2, y, text);
    }

    /// Page 1: title plus the line art fit into the rest of the content box.
    fn compose_cover(
        &self,
        canvas: &mut Canvas,
        geometry: &PageGeometry,
    ) -> Result<(), KeyplateError> {
        canvas.meta(META_SECTION_KEY, "cover");
        canvas.set_fill_color(Color::BLACK);
        canvas.set_font_size(Pt::from_f32(TITLE_FONT_SIZE));
        self.draw_centered(
            canvas,
            geometry,
            geometry.margin + Pt::from_inches(COVER_TITLE_DROP_IN),
            &self.spec.title,
        );

        let image_top = geometry.margin + Pt::from_inches(COVER_IMAGE_DROP_IN);
        let target = Rect {
            x: geometry.margin,
            y: image_top,
            width: geometry.content_width(),
            height: geometry.size.height - image_top - geometry.margin,
        };
        let placed = fit_within(self.spec.cover.aspect_ratio()?, target)?;
        canvas.draw_image(
            placed.x,
            placed.y,
            placed.width,
            placed.height,
            &self.spec.cover.resource_id,
        );
        canvas.show_page();
        Ok(())
    }

    /// Page 2..: photo thumbnail, heading, then the wrapped instructions
    /// with a page test after every emitted line.
    fn compose_guide(
        &self,
        canvas: &mut Canvas,
        geometry: &PageGeometry,
    ) -> Result<Cursor, KeyplateError> {
        canvas.meta(META_SECTION_KEY, "guide");
        let mut cursor = Cursor::top_of(1, geometry);

        let thumb = fit_longest_side(
            self.spec.photo.aspect_ratio()?,
            Pt::from_inches(THUMB_MAX_SIDE_IN),
        )?;
        let thumb_x = geometry.margin + (geometry.content_width() - thumb.width) / 2;
        canvas.draw_image(
            thumb_x,
            cursor.y,
            thumb.width,
            thumb.height,
            &self.spec.photo.resource_id,
        );
        cursor = cursor.advance(thumb.height + Pt::from_inches(THUMB_GAP_IN));

        canvas.set_fill_color(Color::BLACK);
        canvas.set_font_size(Pt::from_f32(TITLE_FONT_SIZE));
        self.draw_centered(canvas, geometry, cursor.y, GUIDE_HEADING);
        cursor = cursor.advance(Pt::from_inches(HEADING_GAP_IN));

        let body_size = Pt::from_f32(BODY_FONT_SIZE);
        let line_height = Pt::from_inches(LINE_HEIGHT_IN);
        let bullet_indent = Pt::from_inches(BULLET_INDENT_IN);
        canvas.set_font_size(body_size);

        for line in source_lines(&self.spec.instructions) {
            let indent = if line.is_bullet {
                bullet_indent
            } else {
                Pt::ZERO
            };
            let mut emitted = 0usize;
            for rendered in wrap(
                &line,
                self.measure.as_ref(),
                body_size,
                geometry.content_width(),
                indent,
            ) {
                cursor = self.guide_page_test(canvas, geometry, cursor, body_size);
                if line.is_bullet && emitted == 0 {
                    canvas.set_font_style(FontStyle::Bold);
                    canvas.draw_string(geometry.margin, cursor.y, BULLET_GLYPH);
                }
                for segment in &rendered.segments {
                    let style = if segment.emphasized {
                        FontStyle::Bold
                    } else {
                        FontStyle::Regular
                    };
                    canvas.set_font_style(style);
                    canvas.draw_string(
                        geometry.margin + segment.x_offset,
                        cursor.y,
                        &segment.text,
                    );
                }
                cursor = cursor.advance(line_height);
                emitted += 1;
            }
            if emitted == 0 {
                // Marker-only line: keep the vertical rhythm, and the glyph
                // if it was a bullet.
                cursor = self.guide_page_test(canvas, geometry, cursor, body_size);
                if line.is_bullet {
                    canvas.set_font_style(FontStyle::Bold);
                    canvas.draw_string(geometry.margin, cursor.y, BULLET_GLYPH);
                }
                cursor = cursor.advance(line_height);
            }
        }
        Ok(cursor)
    }

    fn guide_page_test(
        &self,
        canvas: &mut Canvas,
        geometry: &PageGeometry,
        cursor: Cursor,
        body_size: Pt,
    ) -> Cursor {
        if cursor.y <= geometry.bottom_limit() {
            return cursor;
        }
        canvas.show_page();
        let next = Cursor::top_of(cursor.page + 1, geometry);
        canvas.meta(META_SECTION_KEY, "guide");
        canvas.set_font_size(body_size);
        if let Some(debug) = &self.debug {
            debug.page_break("guide", cursor.page, next.page);
        }
        next
    }

    /// Final section: the color-key table, headers repeated per page.
    fn compose_key(
        &self,
        canvas: &mut Canvas,
        geometry: &PageGeometry,
        cursor: Cursor,
    ) -> Result<(), KeyplateError> {
        canvas.show_page();
        let mut cursor = Cursor::top_of(cursor.page + 1, geometry);
        canvas.meta(META_SECTION_KEY, "key");

        canvas.set_fill_color(Color::BLACK);
        canvas.set_font_size(Pt::from_f32(TITLE_FONT_SIZE));
        self.draw_centered(canvas, geometry, cursor.y, KEY_HEADING);
        cursor = cursor.advance(Pt::from_inches(HEADING_GAP_IN));

        // The pencil-name column absorbs the extra landscape width.
        let name_width = if geometry.size.width > geometry.size.height {
            5.8
        } else {
            3.3
        };
        let widths = [0.7, 1.0, 1.8, name_width, 0.7].map(Pt::from_inches);
        let mut column_x = [Pt::ZERO; KEY_COLUMNS.len()];
        let mut x = geometry.margin;
        for (index, width) in widths.iter().enumerate() {
            column_x[index] = x;
            x += *width;
        }

        let header_size = Pt::from_f32(HEADER_FONT_SIZE);
        let row_size = Pt::from_f32(ROW_FONT_SIZE);
        let measure = self.measure.as_ref();
        let paginator = TablePaginator::new(
            Pt::from_inches(ROW_HEIGHT_IN),
            Pt::from_inches(HEADER_HEIGHT_IN),
        );
        let start_page = cursor.page;
        let end = paginator.paginate(
            canvas,
            geometry,
            cursor,
            "key",
            &self.spec.colors,
            |canvas, y| {
                canvas.set_fill_color(Color::BLACK);
                canvas.set_font_size(header_size);
                canvas.set_font_style(FontStyle::Bold);
                for (index, header) in KEY_COLUMNS.iter().enumerate() {
                    canvas.draw_string(column_x[index], y, *header);
                }
            },
            |canvas, entry, y| {
                canvas.set_font_size(row_size);
                canvas.set_font_style(FontStyle::Regular);

                let swatch = entry.swatch()?;
                canvas.set_fill_color(swatch);
                canvas.fill_rect(
                    column_x[0] + Pt::from_inches(SWATCH_INSET_IN),
                    y - Pt::from_inches(SWATCH_RISE_IN),
                    Pt::from_inches(SWATCH_SIDE_IN),
                    Pt::from_inches(SWATCH_SIDE_IN),
                );
                canvas.set_fill_color(Color::BLACK);

                canvas.draw_string(column_x[1], y, &entry.hex);
                canvas.draw_string(column_x[2], y, &entry.picture_part);
                canvas.draw_string(column_x[3], y, &entry.pencil_name);
                let number_width =
                    measure.text_width(&entry.pencil_number, FontStyle::Regular, row_size);
                canvas.draw_string(
                    column_x[4] + Pt::from_inches(NUMBER_CENTER_IN) - number_width / 2,
                    y,
                    &entry.pencil_number,
                );
                Ok(())
            },
        )?;

        if let Some(debug) = &self.debug {
            for page in start_page..end.page {
                debug.page_break("key", page, page + 1);
            }
            debug.increment("compose.header_repeat.key", (end.page - start_page) as u64);
        }
        Ok(())
    }
}

fn document_metrics(document: &Document, started: Instant) -> DocumentMetrics {
    let pages = document
        .pages
        .iter()
        .enumerate()
        .map(|(index, page)| PageMetrics {
            page_number: index + 1,
            command_count: page.commands.len(),
            content_count: page
                .commands
                .iter()
                .filter(|command| {
                    matches!(
                        command,
                        Command::DrawString { .. }
                            | Command::DrawImage { .. }
                            | Command::FillRect { .. }
                    )
                })
                .count(),
        })
        .collect();
    DocumentMetrics {
        pages,
        total_render_ms: started.elapsed().as_secs_f64() * 1000.0,
    }
}

/// Derives the report title from an uploaded file name the way the host
/// application does: drop the extension, treat `-`/`_` as spaces, Title Case
/// each word.
pub fn title_from_file_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    let base = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };
    let spaced: String = base
        .chars()
        .map(|ch| if ch == '-' || ch == '_' { ' ' } else { ch })
        .collect();
    spaced
        .to_lowercase()
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
