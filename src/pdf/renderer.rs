//! PDF exporter implementation - ranked records → single-page banded report

use super::layout::{
    fit_text, format_thousands, mm_to_pt, truncate_name, Align, PageGeometry, BODY_FONT_SIZE,
    CELL_PADDING, COLUMNS, HEADER_FONT_SIZE, HEADER_ROW_HEIGHT, LOGO_HEIGHT, LOGO_WIDTH, LOGO_X,
    LOGO_Y, ROW_HEIGHT, THICK_LINE, THIN_LINE, TITLE_BASELINE, TITLE_FONT_SIZE, TITLE_HEIGHT,
};
use super::metrics::{encode_win_ansi, text_width_pt};
use crate::core::sorter::{rank_rows, sort_records, RankedRow};
use crate::error::{AdvisorError, AdvisorResult};
use crate::types::{AdvisorRecord, ExportLayoutParams, Rgb, SortState};
use miniz_oxide::deflate::compress_to_vec_zlib;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};
use std::path::Path;
use tracing::{debug, info};

const FONT_NAME: Name<'static> = Name(b"F1");
const LOGO_NAME: Name<'static> = Name(b"Im1");

/// Bundled brand mark drawn in the title band
const BUNDLED_BRAND_MARK: &[u8] = include_bytes!("../../assets/brand-mark.png");

/// Line height as a multiple of font size for wrapped header labels
const LINE_SPACING: f32 = 1.15;
/// Baseline offset below a line's vertical centre, as a multiple of font size
const BASELINE_DROP: f32 = 0.35;

/// Decoded brand image ready for embedding
#[derive(Debug, Clone)]
pub struct BrandMark {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl BrandMark {
    /// The image compiled into the binary
    pub fn bundled() -> AdvisorResult<Self> {
        Self::from_bytes(BUNDLED_BRAND_MARK)
    }

    /// Decode a PNG or JPEG image
    pub fn from_bytes(bytes: &[u8]) -> AdvisorResult<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| AdvisorError::Render(format!("Failed to decode brand mark: {}", e)))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();

        let rgb: Vec<u8> = rgba.pixels().flat_map(|p| [p.0[0], p.0[1], p.0[2]]).collect();
        let alpha = rgba
            .pixels()
            .any(|p| p.0[3] < 255)
            .then(|| rgba.pixels().map(|p| p.0[3]).collect());

        Ok(Self {
            width,
            height,
            rgb,
            alpha,
        })
    }

    pub fn from_path(path: &Path) -> AdvisorResult<Self> {
        let bytes = std::fs::read(path).map_err(|source| AdvisorError::UnreadableFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }
}

/// Content stream builder working in top-left millimetre coordinates
struct Canvas {
    content: Content,
    page_height_pt: f32,
}

impl Canvas {
    fn new(page_height: f64) -> Self {
        Self {
            content: Content::new(),
            page_height_pt: mm_to_pt(page_height),
        }
    }

    fn y(&self, top_mm: f64) -> f32 {
        self.page_height_pt - mm_to_pt(top_mm)
    }

    fn fill_rect(&mut self, x: f64, top: f64, w: f64, h: f64, fill: Rgb) {
        let (r, g, b) = fill.unit();
        let bottom = self.y(top + h);
        self.content
            .set_fill_rgb(r, g, b)
            .rect(mm_to_pt(x), bottom, mm_to_pt(w), mm_to_pt(h))
            .fill_nonzero();
    }

    fn stroke_rect(&mut self, x: f64, top: f64, w: f64, h: f64, line_width: f64) {
        let bottom = self.y(top + h);
        self.content
            .set_line_width(mm_to_pt(line_width))
            .set_stroke_rgb(0.0, 0.0, 0.0)
            .rect(mm_to_pt(x), bottom, mm_to_pt(w), mm_to_pt(h))
            .stroke();
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, line_width: f64, color: Rgb) {
        let (r, g, b) = color.unit();
        let (start, end) = (self.y(y1), self.y(y2));
        self.content
            .set_line_width(mm_to_pt(line_width))
            .set_stroke_rgb(r, g, b)
            .move_to(mm_to_pt(x1), start)
            .line_to(mm_to_pt(x2), end)
            .stroke();
    }

    /// Draw one line of text; `x_pt`/`baseline_pt` are already in PDF space
    fn text(&mut self, x_pt: f32, baseline_pt: f32, size: f32, color: Rgb, text: &str) {
        let (r, g, b) = color.unit();
        let encoded = encode_win_ansi(text);
        self.content.set_fill_rgb(r, g, b);
        self.content
            .begin_text()
            .set_font(FONT_NAME, size)
            .next_line(x_pt, baseline_pt)
            .show(Str(&encoded))
            .end_text();
    }

    /// Text lines aligned inside a cell and centred vertically
    #[allow(clippy::too_many_arguments)]
    fn cell_text(
        &mut self,
        x: f64,
        top: f64,
        w: f64,
        h: f64,
        lines: &[&str],
        align: Align,
        size: f32,
        color: Rgb,
    ) {
        let line_height = size * LINE_SPACING;
        let centre = self.y(top + h / 2.0);
        let first = centre + (lines.len() as f32 - 1.0) * line_height / 2.0 - size * BASELINE_DROP;

        for (i, line) in lines.iter().enumerate() {
            let width = text_width_pt(line, size);
            let x_pt = match align {
                Align::Left => mm_to_pt(x + CELL_PADDING),
                Align::Center => mm_to_pt(x) + (mm_to_pt(w) - width) / 2.0,
                Align::Right => mm_to_pt(x + w - CELL_PADDING) - width,
            };
            self.text(x_pt, first - i as f32 * line_height, size, color, line);
        }
    }

    fn image(&mut self, x: f64, top: f64, w: f64, h: f64, name: Name<'_>) {
        let bottom = self.y(top + h);
        self.content.save_state();
        self.content
            .transform([mm_to_pt(w), 0.0, 0.0, mm_to_pt(h), mm_to_pt(x), bottom]);
        self.content.x_object(name);
        self.content.restore_state();
    }
}

/// PDF exporter for the active-advisor table
pub struct PdfExporter {
    records: Vec<AdvisorRecord>,
    layout: ExportLayoutParams,
    brand_mark: BrandMark,
}

impl PdfExporter {
    /// Sort `records` once and pair them with layout parameters and a brand mark
    pub fn new(
        records: &[AdvisorRecord],
        sort: SortState,
        layout: ExportLayoutParams,
        brand_mark: BrandMark,
    ) -> Self {
        Self {
            records: sort_records(records, sort),
            layout,
            brand_mark,
        }
    }

    /// Records in export order
    pub fn records(&self) -> &[AdvisorRecord] {
        &self.records
    }

    pub fn geometry(&self) -> PageGeometry {
        PageGeometry::new(self.records.len(), self.layout.height_multiplier())
    }

    /// Display cells of one ranked row: rank, code, truncated name, status, policies, premium
    pub fn row_cells(row: &RankedRow<'_>) -> [String; 6] {
        let record = row.record;
        [
            row.rank.to_string(),
            record.advisor_code.clone(),
            truncate_name(&record.advisor_name),
            record.advisor_status.clone(),
            record.no_of_policies.to_string(),
            format_thousands(record.annualized_premium),
        ]
    }

    /// Uncompressed page content stream
    pub fn content_stream(&self) -> Vec<u8> {
        let geometry = self.geometry();
        let mut canvas = Canvas::new(geometry.page_height);

        self.draw_title(&mut canvas, &geometry);
        for row in rank_rows(&self.records) {
            self.draw_row(&mut canvas, &geometry, &row);
        }
        self.draw_table_header(&mut canvas, &geometry);

        canvas.content.finish().as_slice().to_vec()
    }

    fn draw_title(&self, canvas: &mut Canvas, geometry: &PageGeometry) {
        canvas.fill_rect(0.0, 0.0, geometry.page_width, TITLE_HEIGHT, Rgb::BRAND_PALE);
        canvas.line(
            0.0,
            TITLE_HEIGHT,
            geometry.page_width,
            TITLE_HEIGHT,
            THICK_LINE,
            Rgb::BRAND,
        );
        canvas.image(LOGO_X, LOGO_Y, LOGO_WIDTH, LOGO_HEIGHT, LOGO_NAME);

        let available = geometry.page_width - 2.0 * (LOGO_X + LOGO_WIDTH);
        let title = fit_text(self.layout.header_text(), available, TITLE_FONT_SIZE);
        let width = text_width_pt(&title, TITLE_FONT_SIZE);
        let x_pt = mm_to_pt(geometry.page_width / 2.0) - width / 2.0;
        let baseline = canvas.y(TITLE_BASELINE);
        canvas.text(x_pt, baseline, TITLE_FONT_SIZE, Rgb::BRAND, &title);
    }

    fn draw_table_header(&self, canvas: &mut Canvas, geometry: &PageGeometry) {
        let top = geometry.table_top();
        for (col, spec) in COLUMNS.iter().enumerate() {
            let x = geometry.column_left(col);
            canvas.fill_rect(x, top, spec.width, HEADER_ROW_HEIGHT, Rgb::BRAND);
            canvas.stroke_rect(x, top, spec.width, HEADER_ROW_HEIGHT, THICK_LINE);
            canvas.cell_text(
                x,
                top,
                spec.width,
                HEADER_ROW_HEIGHT,
                spec.header,
                Align::Center,
                HEADER_FONT_SIZE,
                Rgb::WHITE,
            );
        }
    }

    fn draw_row(&self, canvas: &mut Canvas, geometry: &PageGeometry, row: &RankedRow<'_>) {
        let top = geometry.row_top(row.rank - 1);
        let cells = Self::row_cells(row);

        for (col, spec) in COLUMNS.iter().enumerate() {
            let x = geometry.column_left(col);
            canvas.fill_rect(x, top, spec.width, ROW_HEIGHT, row.tier.fill());
            canvas.stroke_rect(x, top, spec.width, ROW_HEIGHT, THIN_LINE);

            let text = fit_text(&cells[col], spec.width - 2.0 * CELL_PADDING, BODY_FONT_SIZE);
            canvas.cell_text(
                x,
                top,
                spec.width,
                ROW_HEIGHT,
                &[text.as_str()],
                spec.align,
                BODY_FONT_SIZE,
                row.tier.text(),
            );
        }
    }

    /// Render the complete document
    pub fn export_bytes(&self) -> AdvisorResult<Vec<u8>> {
        let geometry = self.geometry();
        debug!(?geometry, "Computed page geometry");

        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let page_id = alloc();
        let content_id = alloc();
        let font_id = alloc();
        let image_id = alloc();
        let mask_id = alloc();
        let info_id = alloc();

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id).kids([page_id]).count(1);
        pdf.document_info(info_id)
            .title(TextStr(self.layout.header_text()))
            .producer(TextStr(concat!("active-advisors ", env!("CARGO_PKG_VERSION"))));

        pdf.type1_font(font_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        self.embed_brand_mark(&mut pdf, image_id, mask_id);

        let raw = self.content_stream();
        let compressed = compress_to_vec_zlib(&raw, 6);
        pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);

        {
            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(
                0.0,
                0.0,
                mm_to_pt(geometry.page_width),
                mm_to_pt(geometry.page_height),
            ))
            .parent(pages_id)
            .contents(content_id);

            let mut resources = page.resources();
            resources.fonts().pair(FONT_NAME, font_id);
            resources.x_objects().pair(LOGO_NAME, image_id);
        }

        let bytes = pdf.finish();
        info!(
            rows = geometry.row_count,
            width_mm = geometry.page_width,
            height_mm = geometry.page_height,
            bytes = bytes.len(),
            "PDF export built"
        );
        Ok(bytes)
    }

    fn embed_brand_mark(&self, pdf: &mut Pdf, image_id: Ref, mask_id: Ref) {
        let mark = &self.brand_mark;
        let (width, height) = (mark.width as i32, mark.height as i32);

        if let Some(alpha) = &mark.alpha {
            let compressed_alpha = compress_to_vec_zlib(alpha, 6);
            let mut mask = pdf.image_xobject(mask_id, &compressed_alpha);
            mask.filter(Filter::FlateDecode);
            mask.width(width);
            mask.height(height);
            mask.color_space().device_gray();
            mask.bits_per_component(8);
        }

        let compressed_rgb = compress_to_vec_zlib(&mark.rgb, 6);
        let mut xobj = pdf.image_xobject(image_id, &compressed_rgb);
        xobj.filter(Filter::FlateDecode);
        xobj.width(width);
        xobj.height(height);
        xobj.color_space().device_rgb();
        xobj.bits_per_component(8);
        if mark.alpha.is_some() {
            xobj.s_mask(mask_id);
        }
    }

    /// Render and write to `output_path`
    pub fn export(&self, output_path: &Path) -> AdvisorResult<()> {
        let bytes = self.export_bytes()?;
        std::fs::write(output_path, bytes)?;
        info!(path = %output_path.display(), "PDF export saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BandTier;

    fn exporter(records: &[AdvisorRecord]) -> PdfExporter {
        PdfExporter::new(
            records,
            SortState::default(),
            ExportLayoutParams::default(),
            BrandMark::bundled().unwrap(),
        )
    }

    #[test]
    fn test_bundled_brand_mark_decodes() {
        let mark = BrandMark::bundled().unwrap();
        assert_eq!(mark.dimensions(), (250, 80));
        assert!(mark.has_alpha());
    }

    #[test]
    fn test_bad_brand_mark_is_render_error() {
        assert!(matches!(
            BrandMark::from_bytes(b"not an image"),
            Err(AdvisorError::Render(_))
        ));
    }

    #[test]
    fn test_row_cells() {
        let record = AdvisorRecord::new(
            "A100",
            "Kumara Perera Mudiyanselage Don Sunil",
            "Active",
            12,
            1234567.5,
        );
        let row = RankedRow {
            rank: 4,
            tier: BandTier::for_rank(4),
            record: &record,
        };
        let cells = PdfExporter::row_cells(&row);
        assert_eq!(cells[0], "4");
        assert_eq!(cells[2], "Kumara Perera Mudiyanselage Don");
        assert_eq!(cells[4], "12");
        assert_eq!(cells[5], "1,234,567.5");
        // display truncation leaves the record intact
        assert_eq!(record.advisor_name, "Kumara Perera Mudiyanselage Don Sunil");
    }

    #[test]
    fn test_export_bytes_envelope() {
        let records = vec![AdvisorRecord::new("A1", "Jane Doe", "Active", 1, 10.0)];
        let bytes = exporter(&records).export_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
        let tail = String::from_utf8_lossy(&bytes[bytes.len().saturating_sub(32)..]).to_string();
        assert!(tail.contains("%%EOF"));
    }

    #[test]
    fn test_empty_table_still_renders() {
        let exporter = exporter(&[]);
        assert_eq!(exporter.geometry().page_height, (25.0_f64 * 1.18).ceil());
        assert!(exporter.export_bytes().is_ok());
    }
}
