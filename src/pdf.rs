//! Student performance report rendered as an A4 PDF.

use crate::data::performance::StudentPerformance;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Rect, Rgb,
};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const BOTTOM: f32 = 20.0;
const ROW_H: f32 = 7.0;

// Table column x offsets: #, activity, date, award, marks.
const COLS: [f32; 5] = [MARGIN, MARGIN + 10.0, MARGIN + 92.0, MARGIN + 122.0, MARGIN + 157.0];

fn rgb(r: f32, g: f32, b: f32) -> Color {
    Color::Rgb(Rgb::new(r, g, b, None))
}

struct Writer {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl Writer {
    fn text(&self, s: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(s, size, Mm(x), Mm(self.y), font);
    }

    fn fill(&self, color: Color, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.layer.set_fill_color(color);
        self.layer.add_rect(Rect::new(Mm(x1), Mm(y1), Mm(x2), Mm(y2)));
        self.layer.set_fill_color(rgb(0.0, 0.0, 0.0));
    }

    fn rule(&self) {
        self.fill(
            rgb(0.8, 0.8, 0.8),
            MARGIN,
            self.y - 0.2,
            PAGE_W - MARGIN,
            self.y + 0.2,
        );
    }

    fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_H - MARGIN;
    }

    fn section(&mut self, title: &str) {
        self.y -= 10.0;
        self.text(title, 13.0, MARGIN, true);
        self.y -= 2.5;
        self.rule();
        self.y -= 6.0;
    }

    fn field(&mut self, label: &str, value: &str) {
        self.text(label, 10.0, MARGIN, true);
        self.text(value, 10.0, MARGIN + 55.0, false);
        self.y -= 6.0;
    }

    fn table_header(&mut self) {
        self.fill(
            rgb(0.91, 0.93, 0.97),
            MARGIN,
            self.y - 2.0,
            PAGE_W - MARGIN,
            self.y + 5.0,
        );
        for (x, label) in COLS.iter().zip(["#", "Activity", "Date", "Award", "Marks"]) {
            self.text(label, 10.0, *x + 1.0, true);
        }
        self.y -= ROW_H;
    }
}

/// Long activity names are cut so they stay inside their column.
fn fit(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

fn display_date(raw: &str) -> String {
    raw.get(..10)
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|d| d.format("%d %b %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn render_performance_pdf(report: &StudentPerformance, generated_on: NaiveDate) -> Result<Vec<u8>> {
    let title = format!("Performance Report - {}", report.student.pin);
    let (doc, page, layer) = PdfDocument::new(&title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| anyhow!("failed to load font: {e:?}"))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| anyhow!("failed to load font: {e:?}"))?;
    let layer = doc.get_page(page).get_layer(layer);
    let mut w = Writer {
        doc,
        layer,
        regular,
        bold,
        y: PAGE_H,
    };

    // Header band.
    w.fill(rgb(0.16, 0.29, 0.62), 0.0, PAGE_H - 38.0, PAGE_W, PAGE_H);
    w.layer.set_fill_color(rgb(1.0, 1.0, 1.0));
    w.y = PAGE_H - 18.0;
    w.text("SABL Student Performance Report", 20.0, MARGIN, true);
    w.y -= 9.0;
    w.text(
        &format!("Generated on {}", generated_on.format("%d %B %Y")),
        10.0,
        MARGIN,
        false,
    );
    w.layer.set_fill_color(rgb(0.0, 0.0, 0.0));
    w.y = PAGE_H - 40.0;

    let s = &report.student;
    w.section("Student Details");
    w.field("Name", &s.name);
    w.field("PIN", &s.pin);
    w.field("Branch", &s.branch);
    w.field("Year", &s.year);
    w.field("Section", &s.section);

    w.section("Summary");
    w.field(
        "Events Participated",
        &format!("{} / {}", report.participations.len(), report.total_events),
    );
    w.field("Participation Rate", &format!("{}%", report.participation_rate));
    w.field("Standing", report.standing);
    w.field("Participation Marks", &report.total_marks.to_string());
    w.field("Extra Marks", &report.extra_marks.to_string());
    w.field("Overall Marks", &report.overall_marks.to_string());

    w.section("Participations");
    if report.participations.is_empty() {
        w.text("No participations recorded", 10.0, MARGIN, false);
    } else {
        w.table_header();
        for (i, p) in report.participations.iter().enumerate() {
            if w.y < BOTTOM {
                w.new_page();
                w.table_header();
            }
            let cells = [
                (i + 1).to_string(),
                fit(&p.activity_name, 44),
                display_date(&p.activity_date),
                p.participant.award.as_str().to_string(),
                p.participant.marks.to_string(),
            ];
            for (x, cell) in COLS.iter().zip(cells.iter()) {
                w.text(cell, 9.5, *x + 1.0, false);
            }
            w.y -= ROW_H;
        }
    }

    w.doc
        .save_to_bytes()
        .map_err(|e| anyhow!("failed to write pdf: {e:?}"))
}
