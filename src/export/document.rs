//! Paginated report documents

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::traits::ReportSink;
use crate::types::*;

/// Footer timestamp layout
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata printed in every page header and footer. Timestamps are UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    pub title: String,
    pub session_id: Uuid,
    /// When the scanning session began
    pub started_at: NaiveDateTime,
    /// When the document was produced
    pub generated_at: NaiveDateTime,
}

/// One page of a paginated report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    pub total_pages: usize,
    pub rows: Vec<VerifyRow>,
}

impl Page {
    /// Footer right-hand text, e.g. `2/5`
    pub fn page_label(&self) -> String {
        format!("{}/{}", self.number, self.total_pages)
    }
}

/// A report laid out into fixed-size pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedDocument {
    pub meta: DocumentMeta,
    pub pages: Vec<Page>,
}

impl PaginatedDocument {
    /// Footer left-hand timestamp
    pub fn stamp(&self) -> String {
        self.meta.generated_at.format(STAMP_FORMAT).to_string()
    }

    /// Plain-text rendering: header, table and footer per page, pages
    /// separated by a form feed.
    pub fn to_text(&self) -> String {
        let barcode_width = self
            .pages
            .iter()
            .flat_map(|p| p.rows.iter())
            .map(|r| r.barcode.chars().count())
            .max()
            .unwrap_or(0)
            .max("BARCODE".len());

        let stamp = self.stamp();
        let started = self.meta.started_at.format(STAMP_FORMAT);
        let pages: Vec<String> = self
            .pages
            .iter()
            .map(|page| {
                let mut out = String::new();
                out.push_str(&format!(
                    "{}  [{}]  started {} UTC\n",
                    self.meta.title, self.meta.session_id, started
                ));
                let header = format!(
                    "{:<bw$}  {:>8}  {:>8}  {:<7}",
                    "BARCODE",
                    "REQUIRED",
                    "SCANNED",
                    "STATUS",
                    bw = barcode_width
                );
                out.push_str(&"-".repeat(header.len()));
                out.push('\n');
                out.push_str(header.trim_end());
                out.push('\n');
                for row in &page.rows {
                    let line = format!(
                        "{:<bw$}  {:>8}  {:>8}  {:<7}",
                        row.barcode,
                        row.required,
                        row.scanned,
                        row.status.as_str(),
                        bw = barcode_width
                    );
                    out.push_str(line.trim_end());
                    out.push('\n');
                }
                let label = page.page_label();
                let gap = header.len().saturating_sub(stamp.len() + label.len()).max(1);
                out.push_str(&format!("{}{}{}\n", stamp, " ".repeat(gap), label));
                out
            })
            .collect();
        pages.join("\u{c}")
    }
}

/// Paginated-document sink
#[derive(Debug, Clone)]
pub struct DocumentSink {
    rows_per_page: usize,
    meta: DocumentMeta,
}

impl DocumentSink {
    /// Create a sink laying out `rows_per_page` rows per page
    pub fn new(rows_per_page: usize, meta: DocumentMeta) -> Self {
        Self {
            rows_per_page,
            meta,
        }
    }
}

impl ReportSink for DocumentSink {
    type Output = PaginatedDocument;

    fn render(&self, rows: &[VerifyRow]) -> VerifyResult<PaginatedDocument> {
        if self.rows_per_page == 0 {
            return Err(VerifyError::InvalidConfig(
                "rows per page must be at least 1".to_string(),
            ));
        }

        let chunks: Vec<&[VerifyRow]> = if rows.is_empty() {
            vec![rows]
        } else {
            rows.chunks(self.rows_per_page).collect()
        };
        let total_pages = chunks.len();
        let pages = chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| Page {
                number: i + 1,
                total_pages,
                rows: chunk.to_vec(),
            })
            .collect();

        Ok(PaginatedDocument {
            meta: self.meta.clone(),
            pages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn meta() -> DocumentMeta {
        DocumentMeta {
            title: "Verify report".to_string(),
            session_id: Uuid::nil(),
            started_at: NaiveDate::from_ymd_opt(2024, 3, 7)
                .unwrap()
                .and_hms_opt(8, 30, 0)
                .unwrap(),
            generated_at: NaiveDate::from_ymd_opt(2024, 3, 7)
                .unwrap()
                .and_hms_opt(9, 5, 2)
                .unwrap(),
        }
    }

    fn rows(n: usize) -> Vec<VerifyRow> {
        (0..n)
            .map(|i| VerifyRow {
                barcode: format!("B{:03}", i),
                required: 1,
                scanned: 1,
                status: Status::Ok,
                in_catalog: true,
            })
            .collect()
    }

    #[test]
    fn test_pagination() {
        let doc = DocumentSink::new(4, meta()).render(&rows(10)).unwrap();
        assert_eq!(doc.pages.len(), 3);
        assert_eq!(doc.pages[0].rows.len(), 4);
        assert_eq!(doc.pages[2].rows.len(), 2);
        assert_eq!(doc.pages[2].page_label(), "3/3");
        assert_eq!(doc.pages[1].rows[0].barcode, "B004");
    }

    #[test]
    fn test_empty_report_has_one_page() {
        let doc = DocumentSink::new(4, meta()).render(&[]).unwrap();
        assert_eq!(doc.pages.len(), 1);
        assert!(doc.pages[0].rows.is_empty());
        assert_eq!(doc.pages[0].page_label(), "1/1");
    }

    #[test]
    fn test_zero_rows_per_page_rejected() {
        let result = DocumentSink::new(0, meta()).render(&rows(1));
        assert!(matches!(result, Err(VerifyError::InvalidConfig(_))));
    }

    #[test]
    fn test_text_rendering() {
        let doc = DocumentSink::new(2, meta()).render(&rows(3)).unwrap();
        assert_eq!(doc.stamp(), "2024-03-07 09:05:02");

        let text = doc.to_text();
        let pages: Vec<&str> = text.split('\u{c}').collect();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].starts_with(
            "Verify report  [00000000-0000-0000-0000-000000000000]  started 2024-03-07 08:30:00 UTC"
        ));
        assert!(pages[1].contains("started 2024-03-07 08:30:00 UTC"));
        assert!(pages[0].contains("B000"));
        assert!(pages[0].trim_end().ends_with("1/2"));
        assert!(pages[1].contains("2024-03-07 09:05:02"));
        assert!(pages[1]
            .lines()
            .any(|l| l.starts_with("B002") && l.ends_with("1  OK")));
    }
}
