//! Ranked result export as JSON, CSV, XML or XLSX documents.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use serde::Serialize;

use crate::error::SearchError;
use crate::types::{SearchResult, Source, SourceDetails};

/// Column headings shared by the CSV and XLSX exports.
pub const COLUMNS: [&str; 5] = ["Source", "Title", "Description", "Score", "URL"];

/// CSV header row.
pub const CSV_HEADER: &str = "Source,Title,Description,Score,URL";

/// Worksheet name in the XLSX export.
pub const SHEET_NAME: &str = "Search Results";

/// Supported export document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
    Xml,
    Xlsx,
}

impl ExportFormat {
    /// File extension used for the attachment name.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Xml => "xml",
            Self::Xlsx => "xlsx",
        }
    }

    /// `Content-Type` header value for the document.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Csv => "text/csv; charset=utf-8",
            Self::Xml => "application/xml; charset=utf-8",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// `search-results-<millis>.<ext>`
    pub fn file_name(&self, exported_at: DateTime<Utc>) -> String {
        format!(
            "search-results-{}.{}",
            exported_at.timestamp_millis(),
            self.extension()
        )
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "xml" => Ok(Self::Xml),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(SearchError::Config(format!(
                "unsupported export format: {other:?} (expected json, csv, xml or xlsx)"
            ))),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDocument<'a> {
    export_date: String,
    count: usize,
    results: Vec<JsonRow<'a>>,
}

#[derive(Serialize)]
struct JsonRow<'a> {
    source: Source,
    title: &'a str,
    snippet: &'a str,
    score: f64,
    url: &'a str,
    metadata: serde_json::Value,
}

/// Render `results` in `format`, stamped with `exported_at`.
///
/// JSON, CSV and XML documents are UTF-8 text; XLSX is a binary workbook.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if a document writer fails.
pub fn export(
    results: &[SearchResult],
    format: ExportFormat,
    exported_at: DateTime<Utc>,
) -> Result<Vec<u8>, SearchError> {
    let export_date = exported_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    match format {
        ExportFormat::Json => to_json(results, export_date).map(String::into_bytes),
        ExportFormat::Csv => to_csv(results).map(String::into_bytes),
        ExportFormat::Xml => Ok(to_xml(results, &export_date).into_bytes()),
        ExportFormat::Xlsx => to_xlsx(results).map_err(|e| encode_error(&e)),
    }
}

fn encode_error(err: &dyn fmt::Display) -> SearchError {
    SearchError::Parse(format!("failed to encode export: {err}"))
}

fn to_json(results: &[SearchResult], export_date: String) -> Result<String, SearchError> {
    let rows = results
        .iter()
        .map(|result| {
            Ok(JsonRow {
                source: result.source(),
                title: &result.title,
                snippet: &result.snippet,
                score: result.score,
                url: &result.url,
                metadata: metadata_value(&result.details)?,
            })
        })
        .collect::<Result<Vec<_>, serde_json::Error>>()
        .map_err(|e| encode_error(&e))?;

    let document = JsonDocument {
        export_date,
        count: rows.len(),
        results: rows,
    };
    serde_json::to_string_pretty(&document).map_err(|e| encode_error(&e))
}

fn metadata_value(details: &SourceDetails) -> Result<serde_json::Value, serde_json::Error> {
    match details {
        SourceDetails::Wikipedia(meta) => serde_json::to_value(meta),
        SourceDetails::HackerNews(meta) => serde_json::to_value(meta),
        SourceDetails::OpenLibrary(meta) => serde_json::to_value(meta),
        SourceDetails::GitHub(meta) => serde_json::to_value(meta),
    }
}

/// Rows are separated by `\n` with no trailing terminator. Text fields are
/// quoted only when they hold a delimiter, quote or line break.
fn to_csv(results: &[SearchResult]) -> Result<String, SearchError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(COLUMNS).map_err(|e| encode_error(&e))?;
    for result in results {
        let score = result.score.to_string();
        writer
            .write_record([
                result.source().id(),
                result.title.as_str(),
                result.snippet.as_str(),
                score.as_str(),
                result.url.as_str(),
            ])
            .map_err(|e| encode_error(&e))?;
    }

    let bytes = writer.into_inner().map_err(|e| encode_error(&e))?;
    let mut text = String::from_utf8(bytes).map_err(|e| encode_error(&e))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

fn to_xml(results: &[SearchResult], export_date: &str) -> String {
    let items = results
        .iter()
        .map(|result| {
            format!(
                "  <result>\n    <source>{}</source>\n    <title>{}</title>\n    <snippet>{}</snippet>\n    <score>{}</score>\n    <url>{}</url>\n  </result>",
                escape_xml(result.source().id()),
                escape_xml(&result.title),
                escape_xml(&result.snippet),
                result.score,
                escape_xml(&result.url),
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<searchResults exportDate=\"{}\" count=\"{}\">\n{items}\n</searchResults>",
        escape_xml(export_date),
        results.len(),
    )
}

/// Replace the five XML special characters with entities.
pub fn escape_xml(text: &str) -> String {
    quick_xml::escape::escape(text).into_owned()
}

/// One worksheet: a bold heading row, then one row per result with the
/// score as a number cell.
fn to_xlsx(results: &[SearchResult]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let heading = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in (0u16..).zip(COLUMNS) {
        sheet.write_string_with_format(0, col, title, &heading)?;
    }
    for (row, result) in (1u32..).zip(results) {
        sheet.write_string(row, 0, result.source().id())?;
        sheet.write_string(row, 1, &result.title)?;
        sheet.write_string(row, 2, &result.snippet)?;
        sheet.write_number(row, 3, result.score)?;
        sheet.write_string(row, 4, &result.url)?;
    }

    workbook.save_to_buffer()
}
