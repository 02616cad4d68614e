//! Achievement certificates: an A4-landscape PDF for a contestant who placed.
//!
//! `compose` lays out the text (pure, testable); `render` draws it with the
//! built-in Helvetica faces. Everything is centred on the page.

pub mod handlers;
pub mod metrics;

use chrono::{DateTime, Datelike, Utc};
use printpdf::path::PaintMode;
use printpdf::{BuiltinFont, Color, Mm, PdfDocument, Rect, Rgb};
use thiserror::Error;
use tracing::info;

use crate::certificate::metrics::{metrics, Typeface};
use crate::errors::{join_error, AppError};
use crate::results::models::{ordinal, Placement};
use crate::results::store::find_placement;
use crate::storage::Repository;
use crate::users::UserRecord;

pub const PAGE_WIDTH_MM: f32 = 297.0;
pub const PAGE_HEIGHT_MM: f32 = 210.0;
/// Widest a line may run: inside the inner border with a little air.
const TEXT_WIDTH_MM: f32 = 247.0;

const NOT_AVAILABLE: &str =
    "Certificate not available. Results must be declared and you must be a winner.";

#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("no contestant ID on this account")]
    NoContestantId,

    #[error("no placement found for {0}")]
    NoPlacement(String),

    #[error("pdf rendering failed: {0}")]
    Render(String),
}

impl From<CertificateError> for AppError {
    fn from(e: CertificateError) -> Self {
        match e {
            CertificateError::NoContestantId | CertificateError::NoPlacement(_) => {
                AppError::NotFound(NOT_AVAILABLE.to_string())
            }
            CertificateError::Render(msg) => {
                AppError::Internal(anyhow::anyhow!("certificate rendering failed: {msg}"))
            }
        }
    }
}

type Rgb8 = (u8, u8, u8);

const BACKGROUND: Rgb8 = (248, 250, 252);
const OUTER_BORDER: Rgb8 = (139, 92, 246);
const INNER_BORDER: Rgb8 = (251, 191, 36);
const TITLE: Rgb8 = (88, 28, 135);
const MUTED: Rgb8 = (100, 116, 139);
const NAME: Rgb8 = (30, 41, 59);
const BRAND: Rgb8 = (139, 92, 246);

/// One centred line of text. `baseline_mm` is measured from the top edge.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub face: Typeface,
    pub size_pt: f32,
    pub color: Rgb8,
    pub baseline_mm: f32,
}

impl TextLine {
    fn new(
        text: impl Into<String>,
        face: Typeface,
        size_pt: f32,
        color: Rgb8,
        baseline_mm: f32,
    ) -> Self {
        Self {
            text: text.into(),
            face,
            size_pt,
            color,
            baseline_mm,
        }
    }

    /// Left edge that centres the line on the page.
    pub fn x_mm(&self) -> f32 {
        let width = metrics(self.face).width_mm(&self.text, self.size_pt);
        ((PAGE_WIDTH_MM - width) / 2.0).max(0.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CertificateLayout {
    pub contestant_id: String,
    pub lines: Vec<TextLine>,
}

impl CertificateLayout {
    pub fn file_name(&self) -> String {
        format!("Kalakriti_Certificate_{}.pdf", self.contestant_id)
    }
}

/// Lays out the certificate text for `name` at `placement`.
pub fn compose(name: &str, placement: &Placement, issued_at: DateTime<Utc>) -> CertificateLayout {
    let name_size = metrics(Typeface::HelveticaBold).fit_size(name, 32.0, 16.0, TEXT_WIDTH_MM);
    let published_year = placement.published_date.unwrap_or(issued_at).year();

    let lines = vec![
        TextLine::new("Certificate of Achievement", Typeface::HelveticaBold, 40.0, TITLE, 50.0),
        TextLine::new("This is to certify that", Typeface::Helvetica, 16.0, MUTED, 70.0),
        TextLine::new(name, Typeface::HelveticaBold, name_size, NAME, 90.0),
        TextLine::new(
            format!(
                "has secured {} position in {}",
                ordinal(placement.position),
                placement.category_name
            ),
            Typeface::Helvetica,
            14.0,
            MUTED,
            105.0,
        ),
        TextLine::new(
            format!(
                "at Kalakriti {} Competition",
                placement.event_type.display_name()
            ),
            Typeface::Helvetica,
            14.0,
            MUTED,
            115.0,
        ),
        TextLine::new(
            format!("{} - {}", placement.season, published_year),
            Typeface::Helvetica,
            14.0,
            MUTED,
            125.0,
        ),
        TextLine::new("Kalakriti Events", Typeface::HelveticaBold, 12.0, BRAND, 165.0),
        TextLine::new(
            format!("Issue Date: {}", issued_at.format("%d/%m/%Y")),
            Typeface::Helvetica,
            10.0,
            MUTED,
            175.0,
        ),
        TextLine::new(
            format!("Contestant ID: {}", placement.participant_id),
            Typeface::Helvetica,
            10.0,
            MUTED,
            182.0,
        ),
    ];

    CertificateLayout {
        contestant_id: placement.participant_id.clone(),
        lines,
    }
}

fn color((r, g, b): Rgb8) -> Color {
    Color::Rgb(Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

/// Rectangle from top-left corner and size, in page coordinates.
fn rect(x: f32, top: f32, width: f32, height: f32) -> Rect {
    Rect::new(
        Mm(x),
        Mm(PAGE_HEIGHT_MM - top - height),
        Mm(x + width),
        Mm(PAGE_HEIGHT_MM - top),
    )
}

fn render_err<E: std::fmt::Debug>(e: E) -> CertificateError {
    CertificateError::Render(format!("{e:?}"))
}

/// Draws the layout into PDF bytes.
pub fn render(layout: &CertificateLayout) -> Result<Vec<u8>, CertificateError> {
    let (doc, page, layer) = PdfDocument::new(
        format!("Kalakriti Certificate {}", layout.contestant_id),
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        "Certificate",
    );
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(render_err)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(render_err)?;
    let canvas = doc.get_page(page).get_layer(layer);

    canvas.set_fill_color(color(BACKGROUND));
    canvas.add_rect(rect(0.0, 0.0, PAGE_WIDTH_MM, PAGE_HEIGHT_MM).with_mode(PaintMode::Fill));

    // Double border: thick violet outside, thin amber inside. Thickness in pt.
    canvas.set_outline_color(color(OUTER_BORDER));
    canvas.set_outline_thickness(3.0 / 0.3528);
    canvas.add_rect(rect(10.0, 10.0, 277.0, 190.0).with_mode(PaintMode::Stroke));
    canvas.set_outline_color(color(INNER_BORDER));
    canvas.set_outline_thickness(1.0 / 0.3528);
    canvas.add_rect(rect(15.0, 15.0, 267.0, 180.0).with_mode(PaintMode::Stroke));

    for line in &layout.lines {
        let font = match line.face {
            Typeface::Helvetica => &regular,
            Typeface::HelveticaBold => &bold,
        };
        canvas.set_fill_color(color(line.color));
        canvas.use_text(
            line.text.clone(),
            line.size_pt,
            Mm(line.x_mm()),
            Mm(PAGE_HEIGHT_MM - line.baseline_mm),
            font,
        );
    }

    doc.save_to_bytes().map_err(render_err)
}

/// A rendered certificate ready to download.
pub struct CertificateFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Looks up the user's placement and renders their certificate.
pub async fn certificate_for(
    repo: &Repository,
    user: &UserRecord,
) -> Result<CertificateFile, AppError> {
    let contestant_id = user
        .contestant_id
        .as_deref()
        .ok_or(CertificateError::NoContestantId)?;
    let placement = find_placement(repo, contestant_id)
        .await?
        .ok_or_else(|| CertificateError::NoPlacement(contestant_id.to_string()))?;

    let layout = compose(&user.full_name, &placement, Utc::now());
    let file_name = layout.file_name();
    let bytes = tokio::task::spawn_blocking(move || render(&layout))
        .await
        .map_err(|e| join_error("render_certificate", e))??;

    info!(
        "Certificate issued to {} for {} season {} ({} bytes)",
        contestant_id,
        placement.event_type,
        placement.season,
        bytes.len()
    );
    Ok(CertificateFile { file_name, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventType;
    use crate::results::models::{AgeCategory, ResultBucket};
    use chrono::TimeZone;

    fn placement(bucket: ResultBucket, position: u32) -> Placement {
        Placement {
            participant_id: "S1D25042".to_string(),
            name: "Asha Patil".to_string(),
            event_type: EventType::Dance,
            season: "Season 1".to_string(),
            published_date: Some(Utc.with_ymd_and_hms(2025, 3, 14, 10, 0, 0).unwrap()),
            bucket,
            category_name: bucket.display_name().to_string(),
            position,
            score: 94.0,
        }
    }

    fn issued() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_compose_interpolates_placement() {
        let layout = compose(
            "Asha Patil",
            &placement(ResultBucket::Age(AgeCategory::Children), 2),
            issued(),
        );
        let texts: Vec<&str> = layout.lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Certificate of Achievement",
                "This is to certify that",
                "Asha Patil",
                "has secured 2nd position in Children (7yr-15yr)",
                "at Kalakriti Dance Competition",
                "Season 1 - 2025",
                "Kalakriti Events",
                "Issue Date: 19/10/2026",
                "Contestant ID: S1D25042",
            ]
        );
        assert_eq!(layout.file_name(), "Kalakriti_Certificate_S1D25042.pdf");
    }

    #[test]
    fn test_lines_are_centred() {
        let layout = compose("Asha Patil", &placement(ResultBucket::Top100, 17), issued());
        for line in &layout.lines {
            let width = metrics(line.face).width_mm(&line.text, line.size_pt);
            let centre = line.x_mm() + width / 2.0;
            assert!((centre - PAGE_WIDTH_MM / 2.0).abs() < 0.01, "{}", line.text);
        }
    }

    #[test]
    fn test_long_names_shrink_to_fit() {
        let name = "Srinivasa Venkata Raghavendra Subrahmanya Lakshminarayana Iyer";
        let layout = compose(name, &placement(ResultBucket::Top100, 1), issued());
        let line = &layout.lines[2];
        assert!(line.size_pt < 32.0);
        assert!(metrics(line.face).width_mm(name, line.size_pt) <= TEXT_WIDTH_MM);
    }

    #[test]
    fn test_unpublished_date_falls_back_to_issue_year() {
        let mut p = placement(ResultBucket::Age(AgeCategory::Adult), 1);
        p.published_date = None;
        let layout = compose("Asha", &p, issued());
        assert_eq!(layout.lines[5].text, "Season 1 - 2026");
    }

    #[test]
    fn test_render_produces_a_pdf() {
        let layout = compose(
            "Asha Patil",
            &placement(ResultBucket::Age(AgeCategory::Adult), 1),
            issued(),
        );
        let bytes = render(&layout).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn test_missing_placement_message() {
        let err: AppError = CertificateError::NoPlacement("S1A25001".to_string()).into();
        match err {
            AppError::NotFound(msg) => assert_eq!(msg, NOT_AVAILABLE),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
