use crate::format::Report;
use genpdf::elements::{Break, Paragraph};
use genpdf::error::Error;
use genpdf::fonts::{FontCache, FontData, FontFamily};
use genpdf::style::{Color, Style, StyledString};
use genpdf::{Document, Element, Margins, PaperSize};
use std::path::PathBuf;

const FALLBACK_FONT: &str = "LiberationSans";

const PAPER_WIDTH_MM: f64 = 210.0;
const MARGIN_MM: i32 = 10;
const FEEDBACK_INDENT_MM: i32 = 7;
const BODY_SIZE: u8 = 11;
const CODE_SIZE: u8 = 9;

#[derive(Debug, Clone)]
pub struct PdfSettings {
    pub fonts_dir: PathBuf,
    pub font_family: String,
}

fn load_font(settings: &PdfSettings) -> Result<FontFamily<FontData>, Error> {
    // Fall back to LiberationSans in the same directory.
    if let Ok(family) = genpdf::fonts::from_files(&settings.fonts_dir, &settings.font_family, None)
    {
        return Ok(family);
    }
    genpdf::fonts::from_files(&settings.fonts_dir, FALLBACK_FONT, None)
}

fn configure_document(settings: &PdfSettings, title: &str) -> Result<Document, Error> {
    let mut doc = Document::new(load_font(settings)?);
    doc.set_title(title);
    doc.set_paper_size(PaperSize::A4);
    doc.set_font_size(BODY_SIZE);
    doc.set_line_spacing(1.0f64);

    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(MARGIN_MM);
    doc.set_page_decorator(decorator);
    Ok(doc)
}

fn printable_width(indent_mm: i32) -> f64 {
    PAPER_WIDTH_MM - f64::from(2 * MARGIN_MM + indent_mm)
}

/// Hard-wraps `text` so no line is wider than `width_mm` in `style`.
///
/// genpdf drops a word that does not fit on an empty line, so the column count
/// is derived from the widest glyph in the text and over-long words are split.
fn wrap_to_width(text: &str, style: Style, font_cache: &FontCache, width_mm: f64) -> Vec<String> {
    let text = text.replace('\t', "    ");
    let widest = text
        .chars()
        .map(|c| f64::from(style.char_width(font_cache, c)))
        .fold(0.0, f64::max);
    if widest <= 0.0 {
        return vec![text];
    }
    let columns = ((width_mm * 0.98 / widest).floor() as usize).max(1);
    textwrap::wrap(&text, textwrap::Options::new(columns).break_words(true))
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Pushes `text` one wrapped line per paragraph; internal newlines are kept.
fn push_wrapped(doc: &mut Document, text: &str, style: Style, indent_mm: i32) {
    let width = printable_width(indent_mm);
    let lines: Vec<String> = text
        .split('\n')
        .flat_map(|line| wrap_to_width(line, style, doc.font_cache(), width))
        .collect();

    for line in lines {
        let paragraph = Paragraph::new(StyledString::new(line, style));
        if indent_mm > 0 {
            doc.push(paragraph.padded(Margins::trbl(0, 0, 0, indent_mm)));
        } else {
            doc.push(paragraph);
        }
    }
}

/// Renders `report` to PDF bytes. Pages break automatically.
pub fn render(report: &Report, settings: &PdfSettings) -> Result<Vec<u8>, Error> {
    let mut doc = configure_document(settings, &report.filename)?;
    let body = Style::new().with_font_size(BODY_SIZE);

    push_wrapped(
        &mut doc,
        &report.filename,
        Style::new().bold().with_font_size(16),
        0,
    );
    doc.push(Paragraph::new(StyledString::new(
        format!("Date: {}", report.date.format("%Y-%m-%d")),
        body,
    )));
    doc.push(Break::new(1));

    doc.push(Paragraph::new(StyledString::new(
        "Source",
        Style::new().bold().with_font_size(13),
    )));
    let code = Style::new().with_font_size(CODE_SIZE);
    for line in &report.source {
        push_wrapped(
            &mut doc,
            &format!("{:>4}  {}", line.number, line.text),
            code,
            0,
        );
    }
    doc.push(Break::new(1));

    doc.push(Paragraph::new(StyledString::new(
        report.heading(),
        Style::new().bold().with_font_size(14),
    )));
    doc.push(Break::new(0.5));

    if let Some(notice) = &report.empty_notice {
        push_wrapped(&mut doc, notice, body.italic(), 0);
    }

    let feedback_style = body.with_color(Color::Rgb(0, 70, 160));
    for entry in &report.entries {
        for line in &entry.lines {
            push_wrapped(&mut doc, line, body, 0);
        }
        push_wrapped(&mut doc, &entry.feedback, feedback_style, FEEDBACK_INDENT_MM);
        doc.push(Break::new(0.5));
    }

    if let Some(summary) = &report.summary {
        doc.push(Break::new(1));
        push_wrapped(&mut doc, summary, body.bold(), 0);
    }

    let mut bytes = Vec::new();
    doc.render(&mut bytes)?;
    Ok(bytes)
}
