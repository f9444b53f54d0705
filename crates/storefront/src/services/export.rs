//! CSV export for the admin panel.
//!
//! Cells containing a comma, quote or newline are quoted, with inner quotes
//! doubled.

use std::borrow::Cow;
use std::fmt::Write;

use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Incrementally built CSV document.
#[derive(Debug, Clone)]
pub struct CsvDocument {
    body: String,
}

impl CsvDocument {
    /// Start a document with a header row.
    #[must_use]
    pub fn new(headers: &[&str]) -> Self {
        let mut doc = Self {
            body: String::new(),
        };
        doc.push_row(headers.iter().copied());
        doc
    }

    /// Append one row.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut first = true;
        for cell in cells {
            if !first {
                self.body.push(',');
            }
            first = false;
            let _ = write!(self.body, "{}", escape_cell(cell.as_ref()));
        }
        self.body.push('\n');
    }

    /// The document text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.body
    }

    /// Serve the document as a file download.
    #[must_use]
    pub fn into_download(self, filename: &str) -> Response {
        (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{filename}\""),
                ),
            ],
            self.body,
        )
            .into_response()
    }
}

fn escape_cell(cell: &str) -> Cow<'_, str> {
    if cell.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", cell.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(cell)
    }
}
