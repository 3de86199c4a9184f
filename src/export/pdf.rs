use printpdf::{
    BuiltinFont, Color, Greyscale, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, Rgb,
    TextItem,
};

use super::wrap::wrap_text;
use crate::{
    errors::{AppError, AppResult},
    quiz::QuizSession,
};

pub const EXPORT_FILENAME: &str = "quiz-results.pdf";
const DOCUMENT_TITLE: &str = "Quiz Results";

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const PT_PER_MM: f32 = 72.0 / 25.4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineStyle {
    Title,
    Summary,
    Question,
    Body,
    Spacer,
}

impl LineStyle {
    fn font(self) -> BuiltinFont {
        match self {
            LineStyle::Title | LineStyle::Question => BuiltinFont::HelveticaBold,
            _ => BuiltinFont::Helvetica,
        }
    }

    fn font_size(self) -> f32 {
        match self {
            LineStyle::Title => 18.0,
            LineStyle::Summary => 12.0,
            LineStyle::Question => 11.0,
            LineStyle::Body | LineStyle::Spacer => 10.0,
        }
    }

    /// Vertical space the line takes, in millimetres.
    fn advance_mm(self) -> f32 {
        match self {
            LineStyle::Title => 11.0,
            LineStyle::Summary => 7.0,
            LineStyle::Question => 6.0,
            LineStyle::Body => 5.5,
            LineStyle::Spacer => 4.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutLine {
    pub text: String,
    pub style: LineStyle,
    /// Index of the question this line belongs to, if any.
    pub question: Option<usize>,
}

impl LayoutLine {
    fn new(text: impl Into<String>, style: LineStyle, question: Option<usize>) -> Self {
        Self {
            text: text.into(),
            style,
            question,
        }
    }

    fn spacer() -> Self {
        Self::new("", LineStyle::Spacer, None)
    }
}

fn push_wrapped(
    lines: &mut Vec<LayoutLine>,
    text: &str,
    style: LineStyle,
    question: Option<usize>,
) {
    let max_width_pt = (PAGE_WIDTH_MM - 2.0 * MARGIN_MM) * PT_PER_MM;
    for line in wrap_text(text, style.font_size(), max_width_pt) {
        lines.push(LayoutLine::new(line, style, question));
    }
}

/// The result document as a flat list of lines, before pagination.
pub fn layout_lines(session: &QuizSession) -> Vec<LayoutLine> {
    let score = session.score();
    let mut lines = vec![
        LayoutLine::new(DOCUMENT_TITLE, LineStyle::Title, None),
        LayoutLine::new(
            format!("Score: {}%", score.display_percentage()),
            LineStyle::Summary,
            None,
        ),
        LayoutLine::new(
            format!("Correct answers: {} of {}", score.correct_count, score.total),
            LineStyle::Summary,
            None,
        ),
        LayoutLine::spacer(),
    ];

    for item in session.review() {
        let index = Some(item.index);
        push_wrapped(
            &mut lines,
            &format!("{}. {}", item.index + 1, item.question),
            LineStyle::Question,
            index,
        );
        push_wrapped(
            &mut lines,
            &format!("Correct answer: {}", item.correct_option),
            LineStyle::Body,
            index,
        );

        let answer = match (&item.selected_option, item.is_correct) {
            (Some(selected), true) => format!("Your answer: {} [correct]", selected),
            (Some(selected), false) => format!("Your answer: {} [incorrect]", selected),
            (None, _) => "Your answer: not answered".to_string(),
        };
        push_wrapped(&mut lines, &answer, LineStyle::Body, index);
        lines.push(LayoutLine::spacer());
    }

    lines
}

/// A line placed on a page at `y_mm` from the bottom edge.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    pub line: LayoutLine,
    pub y_mm: f32,
}

/// Splits lines across A4 pages, starting a new page whenever the next line would cross the
/// bottom margin. Spacers are dropped at the top of a page.
pub fn paginate(lines: Vec<LayoutLine>) -> Vec<Vec<PlacedLine>> {
    let top = PAGE_HEIGHT_MM - MARGIN_MM;
    let mut pages = Vec::new();
    let mut page = Vec::new();
    let mut cursor = top;

    for line in lines {
        let advance = line.style.advance_mm();
        if cursor - advance < MARGIN_MM && !page.is_empty() {
            pages.push(std::mem::take(&mut page));
            cursor = top;
        }
        if line.style == LineStyle::Spacer && page.is_empty() {
            continue;
        }

        cursor -= advance;
        page.push(PlacedLine { line, y_mm: cursor });
    }

    if !page.is_empty() || pages.is_empty() {
        pages.push(page);
    }
    pages
}

fn push_pdf_text(ops: &mut Vec<Op>, placed: &PlacedLine, color: &Color) {
    let font = placed.line.style.font();
    let font_size = placed.line.style.font_size();
    ops.extend([
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point::new(Mm(MARGIN_MM), Mm(placed.y_mm)),
        },
        Op::SetFontSizeBuiltinFont {
            size: Pt(font_size),
            font,
        },
        Op::SetLineHeight {
            lh: Pt(font_size * 1.2),
        },
        Op::SetFillColor { col: color.clone() },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(placed.line.text.clone())],
            font,
        },
        Op::EndTextSection,
    ]);
}

/// Renders the finished session into PDF bytes.
pub fn render_pdf(session: &QuizSession) -> Vec<u8> {
    let text_color = Color::Greyscale(Greyscale::new(0.08, None));
    let accent_color = Color::Rgb(Rgb {
        r: 0.16,
        g: 0.4,
        b: 0.69,
        icc_profile: None,
    });

    let pages = paginate(layout_lines(session))
        .into_iter()
        .map(|placed_lines| {
            let mut ops = Vec::new();
            for placed in placed_lines
                .iter()
                .filter(|p| p.line.style != LineStyle::Spacer)
            {
                let color = if placed.line.style == LineStyle::Title {
                    &accent_color
                } else {
                    &text_color
                };
                push_pdf_text(&mut ops, placed, color);
            }
            PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops)
        })
        .collect();

    let mut document = PdfDocument::new(DOCUMENT_TITLE);
    let mut warnings = Vec::new();
    let bytes = document
        .with_pages(pages)
        .save(&PdfSaveOptions::default(), &mut warnings);

    if !warnings.is_empty() {
        log::debug!("PDF export produced {} warnings", warnings.len());
    }
    bytes
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ResultExporter;

impl ResultExporter {
    /// Renders off the async runtime. The session is copied, never modified.
    pub async fn export(&self, session: &QuizSession) -> AppResult<Vec<u8>> {
        let session = session.clone();
        let bytes = tokio::task::spawn_blocking(move || render_pdf(&session))
            .await
            .map_err(|e| {
                log::error!("PDF export task failed: {}", e);
                AppError::ExportFailed
            })?;

        if bytes.is_empty() {
            log::error!("PDF export produced an empty document");
            return Err(AppError::ExportFailed);
        }

        log::info!("Exported quiz results ({} bytes)", bytes.len());
        Ok(bytes)
    }
}
