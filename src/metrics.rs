/// Per-page accounting for one compose pass, derived from the emitted
/// command stream.
#[derive(Debug, Clone, Default)]
pub struct PageMetrics {
    pub page_number: usize,
    pub command_count: usize,
    /// Painted content items only: images, text runs, filled rectangles.
    pub content_count: usize,
}

#[derive(Debug, Clone, Default)]
pub struct DocumentMetrics {
    pub pages: Vec<PageMetrics>,
    pub total_render_ms: f64,
}
