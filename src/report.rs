//! PDF rendering of student report cards.
//!
//! Rendering goes through printpdf with the built-in Helvetica faces, so no
//! font files ship with the binary. Layout is a single A4 page: a title, the
//! student's name, one row per mark, and the summary line.

use crate::api::models::reports::StudentReport;
use crate::errors::Error;
use printpdf::{BuiltinFont, Mm, PdfDocument};

/// Render a report card to PDF bytes.
pub fn render_pdf(report: &StudentReport) -> Result<Vec<u8>, Error> {
    let (doc, page, layer) = PdfDocument::new("Grade Report", Mm(210.0), Mm(297.0), "report");

    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(|e| Error::Internal {
        operation: format!("load builtin font: {e}"),
    })?;
    let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(|e| Error::Internal {
        operation: format!("load builtin font: {e}"),
    })?;

    let layer = doc.get_page(page).get_layer(layer);

    // Start below the top margin and step one line height per row
    let mut y = 277.0;
    layer.use_text("Grade Report", 20.0, Mm(20.0), Mm(y), &bold);
    y -= 16.0;

    layer.use_text(format!("Student: {}", report.student_name), 12.0, Mm(20.0), Mm(y), &regular);
    y -= 16.0;

    layer.use_text("Subject", 12.0, Mm(20.0), Mm(y), &bold);
    layer.use_text("Score", 12.0, Mm(120.0), Mm(y), &bold);
    layer.use_text("Grade", 12.0, Mm(160.0), Mm(y), &bold);
    y -= 8.0;

    for mark in &report.marks {
        layer.use_text(mark.subject.as_str(), 12.0, Mm(20.0), Mm(y), &regular);
        layer.use_text(format!("{}", mark.score), 12.0, Mm(120.0), Mm(y), &regular);
        layer.use_text(mark.grade.to_string(), 12.0, Mm(160.0), Mm(y), &regular);
        y -= 8.0;
    }

    y -= 8.0;
    layer.use_text(
        format!(
            "Total: {}    Percentage: {}%    Overall grade: {}",
            report.total_score, report.percentage, report.overall_grade
        ),
        12.0,
        Mm(20.0),
        Mm(y),
        &bold,
    );

    doc.save_to_bytes().map_err(|e| Error::Internal {
        operation: format!("serialize PDF: {e}"),
    })
}
