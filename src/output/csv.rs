//! Catalog export as CSV
//!
//! Columns are `Category,Name,Price,Rating`; an empty `Rating` cell means
//! the product is unrated. Exports replace the previous file as a whole: the
//! rows are written to a sibling temp file which is then renamed over the
//! target.

use crate::catalog::{Catalog, ProductRecord};
use crate::output::{ExportError, ExportResult};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::mem::take;
use std::path::{Path, PathBuf};

/// Header row of the catalog export
pub const HEADER: [&str; 4] = ["Category", "Name", "Price", "Rating"];

/// Writes the catalog to `path`, replacing any previous export
///
/// # Arguments
///
/// * `catalog` - Snapshot to export
/// * `path` - Target CSV file
///
/// # Returns
///
/// * `Ok(())` - The file now holds exactly this catalog
/// * `Err(ExportError)` - Nothing was replaced and no temp file is left behind
pub fn export_catalog(catalog: &Catalog, path: &Path) -> ExportResult<()> {
    let temp_path = temp_path_for(path);

    let written = write_temp(catalog, &temp_path)
        .and_then(|()| fs::rename(&temp_path, path).map_err(ExportError::from));
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    tracing::info!(
        "Exported {} products to '{}'",
        catalog.len(),
        path.display()
    );
    Ok(())
}

fn write_temp(catalog: &Catalog, temp_path: &Path) -> ExportResult<()> {
    let file = File::create(temp_path)?;
    let mut writer = BufWriter::new(file);
    write_catalog(catalog, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Writes the header and one row per record to any writer
pub fn write_catalog<W: Write>(catalog: &Catalog, mut writer: W) -> ExportResult<()> {
    write_row(&mut writer, &HEADER)?;
    for record in catalog.records() {
        write_row(
            &mut writer,
            &[
                record.category.as_str(),
                record.name.as_str(),
                record.price.as_str(),
                record.rating.as_deref().unwrap_or(""),
            ],
        )?;
    }
    Ok(())
}

/// Loads a previously exported catalog
///
/// Category order is the order of first appearance in the file.
pub fn import_catalog(path: &Path) -> ExportResult<Catalog> {
    let text = fs::read_to_string(path)?;
    parse_catalog(&text)
}

/// Parses exported CSV text into a catalog
pub fn parse_catalog(text: &str) -> ExportResult<Catalog> {
    let mut rows = parse_rows(text).into_iter();

    let header = rows
        .next()
        .ok_or_else(|| ExportError::Format("missing header row".to_string()))?;
    if header.iter().map(String::as_str).ne(HEADER.iter().copied()) {
        return Err(ExportError::Format(format!(
            "unexpected header {:?}, expected {:?}",
            header, HEADER
        )));
    }

    let mut categories: Vec<String> = Vec::new();
    let mut records = Vec::new();

    for (line, row) in rows.enumerate() {
        let [category, name, price, rating]: [String; 4] =
            row.try_into().map_err(|row: Vec<String>| {
                ExportError::Format(format!(
                    "row {} has {} columns, expected {}",
                    line + 2,
                    row.len(),
                    HEADER.len()
                ))
            })?;

        if !categories.contains(&category) {
            categories.push(category.clone());
        }

        records.push(ProductRecord {
            category,
            name,
            price,
            rating: (!rating.is_empty()).then_some(rating),
        });
    }

    Ok(Catalog::new(categories, records))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "catalog.csv".into());
    name.push(".tmp");
    path.with_file_name(name)
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn write_row<W: Write>(writer: &mut W, row: &[&str]) -> std::io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            writer.write_all(b",")?;
        }
        if needs_quotes(cell) {
            write!(writer, "\"{}\"", cell.replace('"', "\"\""))?;
        } else {
            writer.write_all(cell.as_bytes())?;
        }
    }
    writer.write_all(b"\n")
}

/// Splits CSV text into rows of fields; tolerates CRLF and quoted newlines
fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' if field.is_empty() => in_quotes = true,
            ',' if !in_quotes => row.push(take(&mut field)),
            '\r' | '\n' if !in_quotes => {
                if ch == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                row.push(take(&mut field));
                // Blank lines carry no record
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}
