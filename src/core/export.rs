use crate::core::{CalculationRecord, Storage};
use crate::utils::error::{AppError, Result};
use printpdf::{BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};
use serde::{Deserialize, Serialize};
use std::ops::Range;

pub const DEFAULT_FILE_NAME: &str = "last_5_distances.pdf";
pub const HEADER: [&str; 4] = ["From", "To", "Unit", "Distance"];

const LINE_HEIGHT_FACTOR: f32 = 1.15;
const BASELINE_FACTOR: f32 = 0.85;

/// Fixed page and table geometry, in PDF points (1/72 inch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLayout {
    pub title: String,
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub title_top: f32,
    pub table_top: f32,
    pub font_size: f32,
    pub title_font_size: f32,
    pub cell_padding: f32,
    pub border_width: f32,
}

impl Default for ReportLayout {
    fn default() -> Self {
        // A4 portrait
        Self {
            title: "Last 5 City Distance Calculations".to_string(),
            page_width: 595.28,
            page_height: 841.89,
            margin: 40.0,
            title_top: 40.0,
            table_top: 60.0,
            font_size: 14.0,
            title_font_size: 16.0,
            cell_padding: 10.0,
            border_width: 0.5,
        }
    }
}

impl ReportLayout {
    pub fn row_height(&self) -> f32 {
        self.font_size * LINE_HEIGHT_FACTOR + 2.0 * self.cell_padding
    }

    pub fn table_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    /// Data rows that fit below a header row starting at `top`. Non-finite
    /// geometry fits nothing.
    fn rows_fitting(&self, top: f32) -> usize {
        let available = self.page_height - self.margin - top;
        let slots = (available / self.row_height()).floor();
        if !slots.is_finite() || slots < 2.0 {
            0
        } else {
            slots as usize - 1
        }
    }

    /// Splits `row_count` data rows into per-page ranges. The first page
    /// starts at `table_top`; continuation pages start at the top margin.
    pub fn paginate(&self, row_count: usize) -> Result<Vec<Range<usize>>> {
        let first = self.rows_fitting(self.table_top);
        let rest = self.rows_fitting(self.margin);
        if first == 0 || rest == 0 {
            return Err(AppError::DocumentGeneration {
                message: "page is too small for a header and one row".to_string(),
            });
        }

        let mut pages = Vec::new();
        let mut start = 0;
        let mut per_page = first;
        while start < row_count {
            let end = (start + per_page).min(row_count);
            pages.push(start..end);
            start = end;
            per_page = rest;
        }
        Ok(pages)
    }
}

/// The table content of an export, independent of how it is drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryReport {
    pub title: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl HistoryReport {
    pub fn from_records(title: &str, records: &[CalculationRecord]) -> Self {
        let rows = records
            .iter()
            .map(|record| {
                vec![
                    record.from.to_string(),
                    record.to.to_string(),
                    record.unit.label().to_string(),
                    record.distance_text(),
                ]
            })
            .collect();

        Self {
            title: title.to_string(),
            header: HEADER.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedReport {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn mm(points: f32) -> Mm {
    Mm(points * 25.4 / 72.0)
}

fn generation_error<E: std::fmt::Debug>(error: E) -> AppError {
    AppError::DocumentGeneration {
        message: format!("{:?}", error),
    }
}

pub fn render_pdf(report: &HistoryReport, layout: &ReportLayout) -> Result<RenderedReport> {
    let pages = layout.paginate(report.rows.len())?;
    tracing::debug!(
        "Rendering {} rows on {} page(s)",
        report.rows.len(),
        pages.len()
    );

    let width = mm(layout.page_width);
    let height = mm(layout.page_height);
    let (doc, first_page, first_layer) = PdfDocument::new(report.title.as_str(), width, height, "Table");
    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(generation_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(generation_error)?,
    };

    for (index, range) in pages.iter().enumerate() {
        let layer = if index == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(width, height, "Table");
            doc.get_page(page).get_layer(layer)
        };

        let top = if index == 0 {
            layer.use_text(
                report.title.as_str(),
                layout.title_font_size,
                mm(layout.margin),
                mm(layout.page_height - layout.title_top),
                &fonts.bold,
            );
            layout.table_top
        } else {
            layout.margin
        };

        draw_table(&layer, &fonts, layout, top, &report.header, &report.rows[range.clone()]);
    }

    let bytes = doc.save_to_bytes().map_err(generation_error)?;
    Ok(RenderedReport {
        bytes,
        pages: pages.len(),
    })
}

fn draw_table(
    layer: &PdfLayerReference,
    fonts: &Fonts,
    layout: &ReportLayout,
    top: f32,
    header: &[String],
    rows: &[Vec<String>],
) {
    let columns = header.len().max(1);
    let column_width = layout.table_width() / columns as f32;
    let row_height = layout.row_height();
    let left = layout.margin;
    let right = left + layout.table_width();
    let line_count = rows.len() + 1;
    let bottom = top + row_height * line_count as f32;

    // PDF y grows upwards; layout measures from the top of the page.
    let y = |from_top: f32| mm(layout.page_height - from_top);

    let all_rows = std::iter::once((header, &fonts.bold))
        .chain(rows.iter().map(|row| (row.as_slice(), &fonts.regular)));
    for (i, (cells, font)) in all_rows.enumerate() {
        let row_top = top + row_height * i as f32;
        let baseline = row_top + layout.cell_padding + layout.font_size * BASELINE_FACTOR;
        for (col, text) in cells.iter().enumerate() {
            let x = left + column_width * col as f32 + layout.cell_padding;
            layer.use_text(text.as_str(), layout.font_size, mm(x), y(baseline), font);
        }
    }

    layer.set_outline_thickness(layout.border_width);
    for i in 0..=line_count {
        let row_y = y(top + row_height * i as f32);
        layer.add_line(segment((mm(left), row_y), (mm(right), row_y)));
    }
    for col in 0..=columns {
        let x = mm(left + column_width * col as f32);
        layer.add_line(segment((x, y(top)), (x, y(bottom))));
    }
}

fn segment(start: (Mm, Mm), end: (Mm, Mm)) -> Line {
    Line {
        points: vec![
            (Point::new(start.0, start.1), false),
            (Point::new(end.0, end.1), false),
        ],
        is_closed: false,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportedDocument {
    pub file_name: String,
    pub location: String,
    pub rows: usize,
    pub pages: usize,
    pub bytes: usize,
}

/// Writes the ledger's current contents as a PDF table under a fixed name.
pub struct ReportExporter<S: Storage> {
    storage: S,
    file_name: String,
    layout: ReportLayout,
}

impl<S: Storage> ReportExporter<S> {
    pub fn new(storage: S) -> Self {
        Self::with_layout(storage, DEFAULT_FILE_NAME.to_string(), ReportLayout::default())
    }

    pub fn with_layout(storage: S, file_name: String, layout: ReportLayout) -> Self {
        Self {
            storage,
            file_name,
            layout,
        }
    }

    /// `Ok(None)` when there is nothing to export.
    pub async fn export(&self, records: &[CalculationRecord]) -> Result<Option<ExportedDocument>> {
        if records.is_empty() {
            tracing::info!("History is empty, nothing to export");
            return Ok(None);
        }

        let report = HistoryReport::from_records(&self.layout.title, records);
        let rendered = render_pdf(&report, &self.layout)?;

        tracing::debug!(
            "Writing {} ({} bytes) to storage",
            self.file_name,
            rendered.bytes.len()
        );
        self.storage
            .write_file(&self.file_name, &rendered.bytes)
            .await?;

        let document = ExportedDocument {
            file_name: self.file_name.clone(),
            location: self.storage.locate(&self.file_name),
            rows: report.rows.len(),
            pages: rendered.pages,
            bytes: rendered.bytes.len(),
        };
        tracing::info!(
            "Exported {} calculation(s) to {}",
            document.rows,
            document.location
        );
        Ok(Some(document))
    }
}
