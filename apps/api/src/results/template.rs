use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::events::EventType;

const HEADER: [&str; 4] = ["Name", "Participant ID", "Score", "Remarks"];
const TOP100_ROWS: u32 = 100;
const HIGHLIGHTED_ROWS: u32 = 20;

type SampleRow = (&'static str, u32, f64, &'static str);

const ADULT_SAMPLES: [SampleRow; 5] = [
    ("Abhishek Kadu", 1001, 95.5, "Excellent creativity"),
    ("Kartik Shambharkar", 1002, 94.2, "Great technique"),
    ("Pratik Pandey", 1003, 92.8, "Good composition"),
    ("Punam Wagh", 1004, 91.5, "Nice colors"),
    ("Shraddha Ramteke", 1005, 90.2, "Creative approach"),
];

const CHILDREN_SAMPLES: [SampleRow; 5] = [
    ("Gauri Dahake", 2001, 93.5, "Amazing for age"),
    ("Shital Parise", 2002, 92.1, "Very creative"),
    ("Chetan Urje", 2003, 90.8, "Good details"),
    ("Zoya Khan", 2004, 89.5, "Nice style"),
    ("Arju Shah", 2005, 88.2, "Good effort"),
];

const PRESCHOOL_SAMPLES: [SampleRow; 5] = [
    ("Rohit Bhise", 3001, 91.5, "Exceptional talent"),
    ("Pranita Singh", 3002, 90.1, "Great colors"),
    ("Yash Kadu", 3003, 88.8, "Nice work"),
    ("Rina Bhasme", 3004, 87.5, "Creative ideas"),
    ("Dolly Panbase", 3005, 86.2, "Good attempt"),
];

pub fn template_file_name(event_type: EventType) -> String {
    format!("{event_type}-results-template.xlsx")
}

/// Sample ID prefix, e.g. "ART24" or "DAN24".
fn id_prefix(event_type: EventType) -> String {
    let stem: String = event_type.as_str().chars().take(3).collect();
    format!("{}24", stem.to_uppercase())
}

/// Builds the four-sheet results template and returns the `.xlsx` bytes.
pub fn build_template(event_type: EventType) -> Result<Vec<u8>, XlsxError> {
    let prefix = id_prefix(event_type);
    let bold = Format::new().set_bold();
    let mut workbook = Workbook::new();

    for (sheet_name, samples) in [
        ("Adult", &ADULT_SAMPLES),
        ("Children", &CHILDREN_SAMPLES),
        ("Preschool", &PRESCHOOL_SAMPLES),
    ] {
        let sheet = workbook.add_worksheet();
        sheet.set_name(sheet_name)?;
        for (col, title) in HEADER.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, *title, &bold)?;
        }
        for (row, (name, id, score, remarks)) in samples.iter().enumerate() {
            let row = row as u32 + 1;
            sheet.write_string(row, 0, *name)?;
            sheet.write_string(row, 1, format!("{prefix}-{id}"))?;
            sheet.write_number(row, 2, *score)?;
            sheet.write_string(row, 3, *remarks)?;
        }
    }

    let sheet = workbook.add_worksheet();
    sheet.set_name("Top100")?;
    for (col, title) in HEADER.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }
    for i in 0..TOP100_ROWS {
        let highlighted = i < HIGHLIGHTED_ROWS;
        let row = i + 1;
        let name = if highlighted {
            format!("Highlighted Artist {row}")
        } else {
            format!("Artist {row}")
        };
        sheet.write_string(row, 0, name)?;
        sheet.write_string(row, 1, format!("{prefix}-T{row:03}"))?;
        sheet.write_number(row, 2, 95.0 - f64::from(i) * 0.5)?;
        sheet.write_string(
            row,
            3,
            if highlighted { "Top 20 Highlighted" } else { "Top 100 Artist" },
        )?;
    }

    workbook.save_to_buffer()
}
