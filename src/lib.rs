//! keyplate composes a printable coloring report from generated line art, a
//! reference photo, an instructions block and an extracted color palette.
//!
//! The output is a [`Document`]: an ordered list of pages, each a buffer of
//! renderer-agnostic draw commands. Nothing here rasterizes or encodes; a
//! downstream renderer replays the commands against whatever backend it has.
//!
//! The report always has three sections, in order:
//!
//! 1. a cover page with the title and the line art fit inside the margins,
//! 2. a coloring guide: photo thumbnail, heading, then the wrapped
//!    instructions with `**bold**` emphasis and bullet lists,
//! 3. a color key table whose header repeats on every page it spills onto.
//!
//! Page orientation follows the photo's aspect unless overridden. All
//! lengths are fixed-point points ([`Pt`]), so layout is deterministic
//! across platforms.

pub mod bitmap;
pub mod canvas;
mod debug;
pub mod error;
pub mod fit;
pub mod geometry;
pub mod measure;
pub mod metrics;
pub mod report;
pub mod table;
pub mod text;
pub mod types;
pub mod wrap;

pub use bitmap::{Bitmap, PendingBitmap};
pub use canvas::{Canvas, Command, Document, Page};
pub use error::KeyplateError;
pub use fit::{fit_longest_side, fit_within};
pub use geometry::{Cursor, PAGE_MARGIN_IN, PageGeometry};
pub use measure::{CharCellMetrics, TextMeasure};
pub use metrics::{DocumentMetrics, PageMetrics};
pub use report::{ColorEntry, ReportComposer, ReportSpec, title_from_file_name};
pub use table::{META_SECTION_KEY, TablePaginator};
pub use text::{SourceLine, TextSpan, source_lines, tokenize};
pub use types::{Color, FontStyle, Orientation, Pt, Rect, Size};
pub use wrap::{LineSegment, RenderedLine, wrap};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn palette(count: usize) -> Vec<ColorEntry> {
        (0..count)
            .map(|index| {
                ColorEntry::new(
                    format!("#18{:02X}1B", index % 256),
                    format!("Region {index}"),
                    format!("Pencil {index}"),
                    format!("{}", 100 + index),
                )
            })
            .collect()
    }

    fn spec(colors: usize) -> ReportSpec {
        ReportSpec {
            title: "Autumn Leaves 01".to_string(),
            cover: Bitmap::from_dimensions("cover", 1024, 1024),
            photo: Bitmap::from_dimensions("photo", 600, 800),
            instructions: "Work from light to dark.\n\
                           \n\
                           - **Leaves:** Use a deep green, **pressing firmly** at the veins.\n\
                           - **Sky:** Light blue with a soft touch.\n\
                           Blend edges with a colorless blender."
                .to_string(),
            colors: palette(colors),
        }
    }

    fn section_of(page: &Page) -> Option<&str> {
        page.commands.iter().find_map(|command| match command {
            Command::Meta { key, value } if key == META_SECTION_KEY => Some(value.as_str()),
            _ => None,
        })
    }

    fn strings_of(page: &Page) -> Vec<&str> {
        page.commands
            .iter()
            .filter_map(|command| match command {
                Command::DrawString { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn full_report_has_cover_guide_and_key_in_order() {
        let document = ReportComposer::new(spec(5)).compose().unwrap();
        assert_eq!(document.pages.len(), 3);
        assert_eq!(section_of(&document.pages[0]), Some("cover"));
        assert_eq!(section_of(&document.pages[1]), Some("guide"));
        assert_eq!(section_of(&document.pages[2]), Some("key"));

        let cover = &document.pages[0];
        assert!(strings_of(cover).contains(&"Autumn Leaves 01"));
        assert!(cover.commands.iter().any(|command| matches!(
            command,
            Command::DrawImage { resource_id, .. } if resource_id == "cover"
        )));

        let guide = &document.pages[1];
        let guide_strings = strings_of(guide);
        assert!(guide_strings.contains(&"Coloring Guide"));
        assert!(guide_strings.contains(&"\u{2022}"));
        assert!(guide_strings.contains(&"Leaves:"));
        assert!(guide.commands.iter().any(|command| matches!(
            command,
            Command::DrawImage { resource_id, .. } if resource_id == "photo"
        )));
        assert!(
            guide
                .commands
                .contains(&Command::SetFontStyle(FontStyle::Bold))
        );

        let key_strings = strings_of(&document.pages[2]);
        assert!(key_strings.contains(&"Color Key"));
        assert!(key_strings.contains(&"Swatch"));
        assert!(key_strings.contains(&"Region 0"));
    }

    #[test]
    fn orientation_follows_the_photo() {
        let portrait = ReportComposer::new(spec(3)).compose().unwrap();
        assert_eq!(portrait.page_size, Size::letter());

        let mut wide = spec(3);
        wide.photo = Bitmap::from_dimensions("photo", 800, 600);
        let landscape = ReportComposer::new(wide).compose().unwrap();
        assert_eq!(landscape.page_size, Size::letter_landscape());

        let forced = ReportComposer::new(spec(3))
            .with_orientation(Orientation::Landscape)
            .compose()
            .unwrap();
        assert_eq!(forced.page_size, Size::letter_landscape());
    }

    #[test]
    fn long_palette_repeats_the_key_header_on_every_page() {
        // 60 rows of 0.4in: 23 fit under the first heading, 24 per later
        // page, so the key spans three pages.
        let document = ReportComposer::new(spec(60)).compose().unwrap();
        let key_pages: Vec<&Page> = document
            .pages
            .iter()
            .filter(|page| section_of(page) == Some("key"))
            .collect();
        assert_eq!(key_pages.len(), 3);
        for page in &key_pages {
            assert!(strings_of(page).contains(&"Swatch"));
        }
        // The heading itself appears only on the first key page.
        let headings = key_pages
            .iter()
            .filter(|page| strings_of(page).contains(&"Color Key"))
            .count();
        assert_eq!(headings, 1);
        // Every row painted exactly once across the section.
        let all_rows: usize = key_pages
            .iter()
            .map(|page| {
                strings_of(page)
                    .iter()
                    .filter(|text| text.starts_with("Region "))
                    .count()
            })
            .sum();
        assert_eq!(all_rows, 60);
    }

    #[test]
    fn each_key_row_paints_its_swatch() {
        let document = ReportComposer::new(spec(4)).compose().unwrap();
        let key = document
            .pages
            .iter()
            .find(|page| section_of(page) == Some("key"))
            .unwrap();
        let swatches = key
            .commands
            .iter()
            .filter(|command| matches!(command, Command::FillRect { .. }))
            .count();
        assert_eq!(swatches, 4);
        assert!(
            key.commands
                .contains(&Command::SetFillColor(Color::rgb(0x18, 0x00, 0x1B)))
        );
    }

    #[test]
    fn malformed_hex_aborts_the_whole_build() {
        let mut bad = spec(3);
        bad.colors[1].hex = "#12345".to_string();
        assert!(matches!(
            ReportComposer::new(bad).compose(),
            Err(KeyplateError::InvalidColorFormat(_))
        ));
    }

    #[test]
    fn cancellation_is_observed_before_work_starts() {
        let flag = Arc::new(AtomicBool::new(true));
        let result = ReportComposer::new(spec(3))
            .with_cancel_flag(flag)
            .compose();
        assert!(matches!(result, Err(KeyplateError::Cancelled)));

        let live = Arc::new(AtomicBool::new(false));
        assert!(
            ReportComposer::new(spec(3))
                .with_cancel_flag(Arc::clone(&live))
                .compose()
                .is_ok()
        );
        live.store(true, Ordering::Relaxed);
    }

    #[test]
    fn long_instructions_continue_on_a_fresh_guide_page() {
        let mut long = spec(3);
        long.instructions = (0..80)
            .map(|index| format!("- **Step {index}:** keep the strokes even."))
            .collect::<Vec<_>>()
            .join("\n");
        let document = ReportComposer::new(long).compose().unwrap();
        let guide_pages = document
            .pages
            .iter()
            .filter(|page| section_of(page) == Some("guide"))
            .count();
        assert!(guide_pages > 1);
    }

    #[test]
    fn metrics_match_the_emitted_document() {
        let (document, metrics) = ReportComposer::new(spec(5))
            .compose_with_metrics()
            .unwrap();
        assert_eq!(metrics.pages.len(), document.pages.len());
        for (index, page) in metrics.pages.iter().enumerate() {
            assert_eq!(page.page_number, index + 1);
            assert_eq!(page.command_count, document.pages[index].commands.len());
            assert!(page.content_count > 0);
            assert!(page.content_count <= page.command_count);
        }
        assert!(metrics.total_render_ms >= 0.0);
    }

    #[test]
    fn debug_log_records_page_breaks() {
        let path = std::env::temp_dir().join(format!(
            "keyplate-debug-{}-{:?}.jsonl",
            std::process::id(),
            std::thread::current().id()
        ));
        ReportComposer::new(spec(60))
            .with_debug_log(&path)
            .unwrap()
            .compose()
            .unwrap();
        let log = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(log.contains("\"type\":\"compose.page_break\""));
        assert!(log.contains("\"section\":\"key\""));
        assert!(log.contains("\"type\":\"debug.summary\""));
    }
}
