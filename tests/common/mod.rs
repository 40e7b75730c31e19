//! Synthetic salary reports built with lopdf.
//!
//! Text is set in Courier at 10pt with explicit widths, so every glyph is
//! exactly 6pt wide and 10pt tall.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

/// Left edge of each table column.
pub const COLUMN_X: [i64; 6] = [50, 120, 220, 320, 380, 470];

/// Baseline of the first data row.
const FIRST_ROW_Y: i64 = 700;
const ROW_STEP: i64 = 15;

/// A string drawn at a baseline position (PDF coordinates, origin bottom-left).
pub type Text = (i64, i64, String);

pub type Row<'a> = [&'a str; 6];

fn text(x: i64, y: i64, s: &str) -> Text {
    (x, y, s.to_string())
}

fn table(rows: &[Row]) -> Vec<Text> {
    let mut out = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let y = FIRST_ROW_Y - ROW_STEP * i as i64;
        for (x, cell) in COLUMN_X.iter().zip(row) {
            if !cell.is_empty() {
                out.push(text(*x, y, cell));
            }
        }
    }
    out
}

fn header(position: &str) -> Vec<Text> {
    let cells = [
        "Club",
        "Last Name",
        "First Name",
        position,
        "Base Salary",
        "Guaranteed Compensation",
    ];
    COLUMN_X
        .iter()
        .zip(cells)
        .map(|(x, cell)| text(*x, 720, cell))
        .collect()
}

/// A page in the pre-2019 layout: title, column header, rows, `Source:` footer.
pub fn legacy_page(rows: &[Row], number: u32) -> Vec<Text> {
    let mut page = vec![text(50, 750, "Major League Soccer Players Union")];
    page.extend(header("Pos"));
    page.extend(table(rows));
    page.push(text(50, 60, "Source: MLS Players Union"));
    page.push(text(300, 40, &number.to_string()));
    page
}

/// A legacy page whose footer is missing.
pub fn legacy_page_without_footer(rows: &[Row], number: u32) -> Vec<Text> {
    let mut page = vec![text(50, 750, "Major League Soccer Players Union")];
    page.extend(header("Pos"));
    page.extend(table(rows));
    page.push(text(300, 40, &number.to_string()));
    page
}

/// First page of a 2019-style report: 22 header words, rows, page number.
pub fn modern_first_page(rows: &[Row]) -> Vec<Text> {
    let mut page = vec![text(
        50,
        750,
        "Major League Soccer Players Union 2019 Salary Guide As Of September 2019",
    )];
    page.extend(header("Position"));
    page.extend(table(rows));
    page.push(text(300, 40, "1"));
    page
}

/// A later page of a 2019-style report: one running word, rows, page number.
pub fn modern_page(rows: &[Row], number: u32) -> Vec<Text> {
    let mut page = vec![text(50, 760, "MLSPA")];
    page.extend(table(rows));
    page.push(text(300, 40, &number.to_string()));
    page
}

/// Serialize pages of text into a PDF.
pub fn report_pdf(pages: &[Vec<Text>]) -> Vec<u8> {
    build_pdf(pages, false)
}

/// Like [`report_pdf`], but each page only paints a Form XObject holding its
/// text. The form carries its own fonts and a `/Matrix` shifting it 10pt
/// right, which the text offsets cancel, so glyphs land where
/// [`report_pdf`] puts them.
pub fn report_pdf_with_forms(pages: &[Vec<Text>]) -> Vec<u8> {
    build_pdf(pages, true)
}

fn text_operations(page: &[Text], dx: i64) -> Vec<Operation> {
    let mut operations = Vec::new();
    for (x, y, s) in page {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new("Tf", vec!["F1".into(), 10.into()]));
        operations.push(Operation::new("Td", vec![(*x + dx).into(), (*y).into()]));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(s.as_str())],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    operations
}

fn build_pdf(pages: &[Vec<Text>], via_form: bool) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let widths: Vec<Object> = vec![Object::Integer(600); 95];
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
        "FirstChar" => 32,
        "LastChar" => 126,
        "Widths" => widths,
    });
    let font_resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let (operations, resources) = if via_form {
            let form = Content {
                operations: text_operations(page, -10),
            };
            let form_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Form",
                    "BBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                    "Matrix" => vec![1.into(), 0.into(), 0.into(), 1.into(), 10.into(), 0.into()],
                    "Resources" => font_resources_id,
                },
                form.encode().expect("form encodes"),
            ));
            let operations = vec![
                Operation::new("q", vec![]),
                Operation::new("Do", vec!["Fm1".into()]),
                Operation::new("Q", vec![]),
            ];
            // No fonts at page level: the form's own resources must be used.
            let resources = doc.add_object(dictionary! {
                "XObject" => dictionary! {
                    "Fm1" => form_id,
                },
            });
            (operations, resources)
        } else {
            (text_operations(page, 0), font_resources_id)
        };

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("content encodes"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources,
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
            // Inherited by every page.
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("document saves");
    bytes
}

/// Write `pages` as the report for `year` under `<data_dir>/pdfs/`.
pub fn write_report(data_dir: &Path, year: i32, pages: &[Vec<Text>]) {
    let dir = data_dir.join("pdfs");
    fs::create_dir_all(&dir).expect("create pdfs dir");
    fs::write(
        dir.join(format!("mls-salaries-{}.pdf", year)),
        report_pdf(pages),
    )
    .expect("write report");
}

pub const LEGACY_PAGE_1: &[Row] = &[
    ["CHI", "Anibaba", "Jalil", "D", "$65,000.00", "$72,500.00"],
    ["LA", "Van Dyke", "Andrew", "M-F", "$44,000.00", "$44,000.00"],
    ["Pool", "Hamid", "Bill", "", "$1,250,000.00", "$1,400,000.00"],
];

pub const LEGACY_PAGE_2: &[Row] = &[
    ["NE", "Alston", "Kevin", "D", "$170,000.00", "$178,000.00"],
    ["TFC", "De Rosario", "Dwayne", "M", "$550,000.00", ""],
];

pub const MODERN_PAGE_1: &[Row] = &[
    ["ATL", "Almiron", "Miguel", "M", "$1,100,000.00", "$2,297,000.00"],
    ["MNUFC", "Alexander", "Eric", "M", "$100,000.00", "$100,000.00"],
];

pub const MODERN_PAGE_2: &[Row] = &[
    ["NYCFC", "Villa", "David", "F", "$5,610,000.00", "$5,610,000.00"],
];

pub const HEADER_LINE: &str =
    "club,last_name,first_name,position,base_salary,guaranteed_compensation";
