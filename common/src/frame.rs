//! Tabular view over scraped postings and its delimited-text export.

use csv::{QuoteStyle, WriterBuilder};
use std::fmt;
use std::path::Path;

use crate::{JobPost, ScrapeError};

/// Widest a preview cell may get before it is cut with an ellipsis.
const PREVIEW_CELL_WIDTH: usize = 24;

const JOB_COLUMNS: [&str; 13] = [
    "id",
    "site",
    "job_url",
    "title",
    "company",
    "location",
    "date_posted",
    "interval",
    "min_amount",
    "max_amount",
    "currency",
    "is_remote",
    "description",
];

/// A single cell. Numbers and booleans are written unquoted on export.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Value {
    fn text_or_null(s: &str) -> Value {
        if s.is_empty() {
            Value::Null
        } else {
            Value::Text(s.to_string())
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_) | Value::Bool(_))
    }

    fn preview(&self) -> String {
        match self {
            Value::Null => "NaN".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            // Debug keeps the trailing `.0` on whole floats.
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Null => Ok(()),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

/// How a result set is written to disk.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub quote: u8,
    pub quote_style: QuoteStyle,
    pub escape: u8,
    /// When true, quotes are doubled and `escape` is ignored.
    pub double_quote: bool,
    /// Prepend a 0-based row index column.
    pub index: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quote: b'"',
            quote_style: QuoteStyle::NonNumeric,
            escape: b'\\',
            double_quote: false,
            index: false,
        }
    }
}

/// What the runner needs from a scrape result, independent of its shape.
pub trait ResultSet {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn columns(&self) -> Vec<String>;

    /// Text rendering of the first `n` rows.
    fn head(&self, n: usize) -> String;

    fn write_csv(&self, path: &Path, options: &CsvOptions) -> Result<(), ScrapeError>;
}

/// Column-ordered table of values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFrame {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl JobFrame {
    /// Builds a frame, rejecting rows whose width differs from the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, ScrapeError> {
        for (row, values) in rows.iter().enumerate() {
            if values.len() != columns.len() {
                return Err(ScrapeError::Shape {
                    row,
                    found: values.len(),
                    expected: columns.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    pub fn from_posts(posts: &[JobPost]) -> Self {
        let columns = JOB_COLUMNS.iter().map(|c| c.to_string()).collect();
        let rows = posts
            .iter()
            .map(|post| {
                let pay = post.compensation.as_ref();
                vec![
                    Value::from(post.id.as_str()),
                    Value::from(post.site.as_str()),
                    Value::from(post.job_url.as_str()),
                    Value::from(post.title.as_str()),
                    Value::text_or_null(&post.company),
                    Value::text_or_null(&post.location),
                    Value::from(post.date_posted.map(|d| d.to_string())),
                    Value::from(pay.and_then(|p| p.interval).map(|i| i.as_str())),
                    Value::from(pay.and_then(|p| p.min_amount)),
                    Value::from(pay.and_then(|p| p.max_amount)),
                    Value::from(pay.and_then(|p| p.currency.clone())),
                    Value::from(post.is_remote),
                    Value::text_or_null(&post.description),
                ]
            })
            .collect();
        Self { columns, rows }
    }

    /// Renders one cell. Under `NonNumeric` quoting follows the value's
    /// type (text and nulls quoted, numbers and booleans bare), so the
    /// cells are pre-quoted here and the writer runs with `QuoteStyle::Never`.
    fn csv_field(value: &Value, options: &CsvOptions) -> String {
        let escape = char::from(options.escape);
        let text = match value {
            // Escape the escape byte itself so a reader using the same
            // escape gets the value back verbatim.
            Value::Text(s) if !options.double_quote => {
                s.replace(escape, &format!("{escape}{escape}"))
            }
            other => other.to_string(),
        };

        if !matches!(options.quote_style, QuoteStyle::NonNumeric) || value.is_numeric() {
            return text;
        }

        let quote = char::from(options.quote);
        let escaped = if options.double_quote {
            text.replace(quote, &format!("{quote}{quote}"))
        } else {
            text.replace(quote, &format!("{escape}{quote}"))
        };
        format!("{quote}{escaped}{quote}")
    }
}

impl ResultSet for JobFrame {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn columns(&self) -> Vec<String> {
        self.columns.clone()
    }

    fn head(&self, n: usize) -> String {
        let shown = &self.rows[..n.min(self.rows.len())];

        let cells: Vec<Vec<String>> = shown
            .iter()
            .map(|row| row.iter().map(|v| truncate(&v.preview())).collect())
            .collect();

        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.chars().count()).collect();
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }
        let gutter = shown.len().saturating_sub(1).to_string().len();

        let mut lines = Vec::with_capacity(cells.len() + 1);
        let header = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, &w)| format!("{c:<w$}"))
            .collect::<Vec<_>>()
            .join("  ");
        lines.push(format!("{:gutter$}  {}", "", header).trim_end().to_string());

        for (i, row) in cells.iter().enumerate() {
            let line = row
                .iter()
                .zip(&widths)
                .map(|(c, &w)| format!("{c:<w$}"))
                .collect::<Vec<_>>()
                .join("  ");
            lines.push(format!("{i:<gutter$}  {line}").trim_end().to_string());
        }

        lines.join("\n")
    }

    fn write_csv(&self, path: &Path, options: &CsvOptions) -> Result<(), ScrapeError> {
        let quote_style = match options.quote_style {
            QuoteStyle::NonNumeric => QuoteStyle::Never,
            other => other,
        };
        let mut writer = WriterBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .quote_style(quote_style)
            .escape(options.escape)
            .double_quote(options.double_quote)
            .from_path(path)?;

        let mut header: Vec<String> = Vec::with_capacity(self.columns.len() + 1);
        if options.index {
            header.push(Self::csv_field(&Value::Null, options));
        }
        header.extend(
            self.columns
                .iter()
                .map(|c| Self::csv_field(&Value::from(c.as_str()), options)),
        );
        writer.write_record(&header)?;

        for (i, row) in self.rows.iter().enumerate() {
            let mut record: Vec<String> = Vec::with_capacity(row.len() + 1);
            if options.index {
                record.push(Self::csv_field(&Value::Int(i as i64), options));
            }
            record.extend(row.iter().map(|v| Self::csv_field(v, options)));
            writer.write_record(&record)?;
        }

        writer.flush()?;
        Ok(())
    }
}

fn truncate(cell: &str) -> String {
    let flat = cell.replace(['\n', '\r'], " ");
    if flat.chars().count() <= PREVIEW_CELL_WIDTH {
        return flat;
    }
    let mut cut: String = flat.chars().take(PREVIEW_CELL_WIDTH - 3).collect();
    cut.push_str("...");
    cut
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Compensation, CompensationInterval, Site};
    use chrono::NaiveDate;
    use std::fs;

    fn sample_post() -> JobPost {
        JobPost {
            id: "li-4012".to_string(),
            site: Site::LinkedIn,
            job_url: "https://www.linkedin.com/jobs/view/4012".to_string(),
            title: "Software Engineer".to_string(),
            company: "Acme".to_string(),
            location: "San Francisco, CA".to_string(),
            date_posted: NaiveDate::from_ymd_opt(2026, 10, 17),
            compensation: Some(Compensation {
                interval: Some(CompensationInterval::Yearly),
                min_amount: Some(150000.0),
                max_amount: Some(190000.0),
                currency: Some("USD".to_string()),
            }),
            is_remote: Some(false),
            description: String::new(),
        }
    }

    fn reader() -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder.escape(Some(b'\\')).double_quote(false);
        builder
    }

    #[test]
    fn test_from_posts_column_order() {
        let frame = JobFrame::from_posts(&[sample_post()]);
        assert_eq!(frame.columns()[0], "id");
        assert_eq!(frame.columns().len(), 13);
        assert_eq!(frame.len(), 1);

        let row = &frame.rows[0];
        assert_eq!(row[1], Value::Text("linkedin".to_string()));
        assert_eq!(row[6], Value::Text("2026-10-17".to_string()));
        assert_eq!(row[7], Value::Text("yearly".to_string()));
        assert_eq!(row[8], Value::Float(150000.0));
        assert_eq!(row[11], Value::Bool(false));
        assert_eq!(row[12], Value::Null);
    }

    #[test]
    fn test_new_rejects_ragged_rows() {
        let err = JobFrame::new(
            vec!["title".to_string(), "company".to_string()],
            vec![vec![Value::from("Engineer")]],
        )
        .unwrap_err();
        assert!(matches!(err, ScrapeError::Shape { row: 0, found: 1, expected: 2 }));
    }

    #[test]
    fn test_head_limits_rows_and_truncates() {
        let rows = (0..8)
            .map(|i| vec![Value::Int(i), Value::from("a".repeat(40))])
            .collect();
        let frame = JobFrame::new(vec!["n".to_string(), "text".to_string()], rows).unwrap();

        let preview = frame.head(5);
        let lines: Vec<&str> = preview.lines().collect();
        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("text"));
        assert!(lines[5].starts_with('4'));
        assert!(lines[1].ends_with("..."));
        assert!(!preview.contains(&"a".repeat(25)));
    }

    #[test]
    fn test_head_on_short_frame() {
        let frame = JobFrame::from_posts(&[sample_post()]);
        assert_eq!(frame.head(5).lines().count(), 2);
    }

    #[test]
    fn test_write_csv_quotes_non_numeric_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        let frame = JobFrame::new(
            vec!["title".to_string(), "min_amount".to_string()],
            vec![vec![Value::from("Engineer"), Value::Float(120000.0)]],
        )
        .unwrap();

        frame.write_csv(&path, &CsvOptions::default()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "\"title\",\"min_amount\"\n\"Engineer\",120000.0\n");
    }

    #[test]
    fn test_write_csv_round_trips_awkward_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        let awkward = r#"Engineer, "Platform" \ Infra"#;
        let frame = JobFrame::new(
            vec!["title".to_string(), "company".to_string()],
            vec![vec![Value::from(awkward), Value::from("Acme")]],
        )
        .unwrap();

        frame.write_csv(&path, &CsvOptions::default()).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains(r#"\"Platform\""#));

        let mut rdr = reader().from_path(&path).unwrap();
        let headers = rdr.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["title", "company"]);
        let record = rdr.records().next().unwrap().unwrap();
        assert_eq!(&record[0], awkward);
        assert_eq!(&record[1], "Acme");
    }

    #[test]
    fn test_write_csv_with_index_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        let frame = JobFrame::from_posts(&[sample_post(), sample_post()]);
        let options = CsvOptions {
            index: true,
            ..CsvOptions::default()
        };

        frame.write_csv(&path, &options).unwrap();

        let mut rdr = reader().from_path(&path).unwrap();
        assert_eq!(&rdr.headers().unwrap()[0], "");
        let indices: Vec<String> = rdr
            .records()
            .map(|r| r.unwrap()[0].to_string())
            .collect();
        assert_eq!(indices, vec!["0", "1"]);
    }

    #[test]
    fn test_write_csv_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        fs::write(&path, "stale contents that are much longer than the new file\n").unwrap();

        let frame = JobFrame::new(vec!["id".to_string()], vec![vec![Value::Int(7)]]).unwrap();
        frame.write_csv(&path, &CsvOptions::default()).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "\"id\"\n7\n");
    }

    #[test]
    fn test_write_csv_quotes_by_value_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        let frame = JobFrame::new(
            vec![
                "zip".to_string(),
                "note".to_string(),
                "remote".to_string(),
                "max_amount".to_string(),
                "currency".to_string(),
            ],
            vec![vec![
                Value::from("94105"),
                Value::from("NaN"),
                Value::Bool(true),
                Value::Int(190000),
                Value::Null,
            ]],
        )
        .unwrap();

        frame.write_csv(&path, &CsvOptions::default()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        let row = written.lines().nth(1).unwrap();
        assert_eq!(row, r#""94105","NaN",True,190000,"""#);

        let mut rdr = reader().from_path(&path).unwrap();
        let record = rdr.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "94105");
        assert_eq!(&record[4], "");
    }

    #[test]
    fn test_write_csv_doubled_quotes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        let title = r#"Say "hi", C:\temp ok"#;
        let frame = JobFrame::new(vec!["title".to_string()], vec![vec![Value::from(title)]]).unwrap();
        let options = CsvOptions {
            double_quote: true,
            ..CsvOptions::default()
        };

        frame.write_csv(&path, &options).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains(r#""Say ""hi"", C:\temp ok""#));

        let mut rdr = csv::ReaderBuilder::new().from_path(&path).unwrap();
        let record = rdr.records().next().unwrap().unwrap();
        assert_eq!(&record[0], title);
    }
}
