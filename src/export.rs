use rust_xlsxwriter::Workbook;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::ExportError;
use crate::results::{COLUMNS, Extraction, ExtractionStats, ProductRecord};

/// Serialized forms of the product table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Json,
    /// Spreadsheet with a `Products` sheet and, when available, a `Statistics` sheet
    Xlsx,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Tsv => "tsv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// Whether the output is text that can go to a terminal
    pub fn is_text(&self) -> bool {
        !matches!(self, ExportFormat::Xlsx)
    }
}

/// `{stem}_products.{ext}`, the name downloads get by default
pub fn default_file_name(stem: &str, format: ExportFormat) -> String {
    format!("{}_products.{}", stem.replace(['/', '\\'], "_"), format.extension())
}

/// Write `records` to `writer` in `format`
pub fn write_records<W: Write>(
    writer: W,
    records: &[ProductRecord],
    format: ExportFormat,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => write_delimited(writer, records, b','),
        ExportFormat::Tsv => write_delimited(writer, records, b'\t'),
        ExportFormat::Json => {
            let mut writer = writer;
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.write_all(b"\n")?;
            Ok(())
        }
        ExportFormat::Xlsx => {
            let mut writer = writer;
            writer.write_all(&workbook_bytes(records, None)?)?;
            Ok(())
        }
    }
}

/// Build a workbook: the table on `Products`, the counters on `Statistics`
pub fn workbook_bytes(
    records: &[ProductRecord],
    stats: Option<&ExtractionStats>,
) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();

    let products = workbook.add_worksheet();
    products.set_name("Products")?;
    for (col, header) in COLUMNS.iter().enumerate() {
        products.write_string(0, col as u16, *header)?;
    }
    for (row, record) in records.iter().enumerate() {
        for (col, value) in record.to_row().iter().enumerate() {
            products.write_string(row as u32 + 1, col as u16, *value)?;
        }
    }

    if let Some(stats) = stats {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Statistics")?;
        for (col, (name, value)) in stats.entries().iter().enumerate() {
            sheet.write_string(0, col as u16, *name)?;
            sheet.write_number(1, col as u16, *value as f64)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_delimited<W: Write>(
    writer: W,
    records: &[ProductRecord],
    delimiter: u8,
) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    // Header goes out even for an empty table
    wtr.write_record(COLUMNS)?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render the table to a string
pub fn records_to_string(
    records: &[ProductRecord],
    format: ExportFormat,
) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_records(&mut buffer, records, format)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write the table to a file, replacing it if present
pub fn export_records(
    path: impl AsRef<Path>,
    records: &[ProductRecord],
    format: ExportFormat,
) -> Result<(), ExportError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_records(&mut writer, records, format)?;
    writer.flush()?;
    ::log::info!(
        "Exported {} records to {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Write the extraction result to a file; spreadsheets also carry the statistics
pub fn export_extraction(
    path: impl AsRef<Path>,
    extraction: &Extraction,
    format: ExportFormat,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Xlsx => {
            let bytes = workbook_bytes(&extraction.records, Some(&extraction.stats))?;
            std::fs::write(path.as_ref(), bytes)?;
            ::log::info!(
                "Exported {} records to {}",
                extraction.records.len(),
                path.as_ref().display()
            );
            Ok(())
        }
        _ => export_records(path, &extraction.records, format),
    }
}

/// Write the statistics mapping as a JSON object
pub fn export_stats(path: impl AsRef<Path>, stats: &ExtractionStats) -> Result<(), ExportError> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, stats)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> ProductRecord {
        ProductRecord {
            name: format!("Phone {}, 5G", n),
            price: "12999".to_string(),
            rating: "4.1 out of 5 stars".to_string(),
            product_url: format!("https://www.amazon.in/dp/B0{}?a=1&b=2", n),
            image_url: format!("https://m.media-amazon.com/images/I/{}.jpg", n),
            source_file: format!("phone_{}.html", n),
        }
    }

    #[test]
    fn test_csv_has_fixed_columns_and_quoting() {
        let out = records_to_string(&[record(1), record(2)], ExportFormat::Csv).unwrap();
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "Product Name,Price,Rating,Product URL,Image URL,Source File"
        );
        assert!(lines[1].starts_with("\"Phone 1, 5G\",12999,"));
        assert!(lines[2].ends_with(",phone_2.html"));
    }

    #[test]
    fn test_tsv_uses_tabs() {
        let out = records_to_string(&[record(1)], ExportFormat::Tsv).unwrap();
        let mut lines = out.lines();
        assert_eq!(lines.next().unwrap().split('\t').count(), 6);
        let row: Vec<&str> = lines.next().unwrap().split('\t').collect();
        assert_eq!(row[0], "Phone 1, 5G");
        assert_eq!(row[5], "phone_1.html");
    }

    #[test]
    fn test_empty_table_keeps_header() {
        let out = records_to_string(&[], ExportFormat::Csv).unwrap();
        assert_eq!(out.lines().count(), 1);

        let out = records_to_string(&[], ExportFormat::Json).unwrap();
        assert_eq!(out.trim(), "[]");
    }

    #[test]
    fn test_json_record_array() {
        let out = records_to_string(&[record(3)], ExportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let rows = value.as_array().unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Product Name"], "Phone 3, 5G");
        assert_eq!(rows[0]["Product URL"], "https://www.amazon.in/dp/B03?a=1&b=2");
        assert_eq!(rows[0]["Source File"], "phone_3.html");
    }

    #[test]
    fn test_export_files() {
        let dir = tempfile::tempdir().unwrap();
        let table = dir.path().join("phone_products.csv");
        let stats_path = dir.path().join("phone_stats.json");

        export_records(&table, &[record(1)], ExportFormat::Csv).unwrap();
        let stats = ExtractionStats {
            complete_records: 1,
            total_files: 4,
            missing_prices: 3,
            ..Default::default()
        };
        export_stats(&stats_path, &stats).unwrap();

        assert_eq!(std::fs::read_to_string(&table).unwrap().lines().count(), 2);
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&stats_path).unwrap()).unwrap();
        assert_eq!(value["total_files"], 4);
        assert_eq!(value["missing_prices"], 3);
        assert_eq!(value["errors"], 0);
    }

    #[test]
    fn test_xlsx_workbook_is_zip_archive() {
        let mut out = Vec::new();
        write_records(&mut out, &[record(1), record(2)], ExportFormat::Xlsx).unwrap();
        assert!(out.starts_with(b"PK"));

        let empty = workbook_bytes(&[], None).unwrap();
        assert!(empty.starts_with(b"PK"));
    }

    #[test]
    fn test_export_extraction_xlsx_with_statistics() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(default_file_name("phone", ExportFormat::Xlsx));
        let extraction = Extraction {
            records: vec![record(1)],
            stats: ExtractionStats {
                complete_records: 1,
                total_files: 2,
                missing_images: 1,
                ..Default::default()
            },
        };

        export_extraction(&path, &extraction, ExportFormat::Xlsx).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
        assert!(bytes.len() > workbook_bytes(&[], None).unwrap().len());
    }

    #[test]
    fn test_default_file_name_uses_extension() {
        assert_eq!(default_file_name("phone", ExportFormat::Csv), "phone_products.csv");
        assert_eq!(default_file_name("phone", ExportFormat::Tsv), "phone_products.tsv");
        assert_eq!(default_file_name("phone", ExportFormat::Json), "phone_products.json");
        assert_eq!(
            default_file_name("usb c/cable", ExportFormat::Xlsx),
            "usb c_cable_products.xlsx"
        );
        assert!(ExportFormat::Csv.is_text());
        assert!(!ExportFormat::Xlsx.is_text());
    }
}
