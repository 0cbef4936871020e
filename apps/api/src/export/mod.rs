//! Spreadsheet export of the current listing set.

use std::io::Cursor;

use thiserror::Error;
use tracing::debug;

use crate::models::listing::Listing;

pub const SHEET_NAME: &str = "Jobs";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
/// Filename offered by the download endpoint.
pub const DOWNLOAD_FILENAME: &str = "Job_Listings.xlsx";

pub const HEADERS: [&str; 10] = [
    "Title",
    "Company",
    "Location",
    "Description",
    "Apply Link",
    "Via",
    "Posted",
    "Job Type",
    "Experience Level",
    "Date Posted Category",
];

/// 1-based column of "Apply Link".
const LINK_COLUMN: u32 = 5;
const LINK_LABEL: &str = "Click Here";
const LINK_COLOR: &str = "FF0000FF";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("could not create worksheet: {0}")]
    Sheet(String),

    #[error("could not write workbook: {0}")]
    Write(String),
}

/// `HYPERLINK("<url>", "Click Here")`, with embedded quotes doubled.
pub fn hyperlink_formula(url: &str) -> String {
    format!("HYPERLINK(\"{}\", \"{LINK_LABEL}\")", url.replace('"', "\"\""))
}

/// Writes one `Jobs` sheet: a header row, then one row per listing. Apply links
/// become clickable formulas; missing links are written as "N/A".
pub fn write_listings_xlsx(listings: &[Listing]) -> Result<Vec<u8>, ExportError> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    let sheet = book
        .new_sheet(SHEET_NAME)
        .map_err(|e| ExportError::Sheet(e.to_string()))?;

    for (col, header) in (1u32..).zip(HEADERS) {
        sheet.get_cell_mut((col, 1)).set_value(header);
    }

    for (row, listing) in (2u32..).zip(listings) {
        let r = &listing.record;
        let values = [
            r.title.as_str(),
            r.company.as_str(),
            r.location.as_str(),
            r.description.as_str(),
            "",
            r.via.as_str(),
            r.posted.as_str(),
            r.job_type.as_str(),
            r.experience_level.as_str(),
            listing.date_posted_category.label(),
        ];
        for (col, value) in (1u32..).zip(values) {
            if col != LINK_COLUMN {
                sheet.get_cell_mut((col, row)).set_value(value);
            }
        }

        let cell = sheet.get_cell_mut((LINK_COLUMN, row));
        if r.has_apply_link() {
            cell.set_formula(hyperlink_formula(&r.apply_link));
            let font = cell.get_style_mut().get_font_mut();
            font.get_color_mut().set_argb(LINK_COLOR);
            font.set_underline("single");
        } else {
            cell.set_value("N/A");
        }
    }

    let mut buffer = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buffer)
        .map_err(|e| ExportError::Write(e.to_string()))?;

    let bytes = buffer.into_inner();
    debug!("Exported {} listings ({} bytes)", listings.len(), bytes.len());
    Ok(bytes)
}
