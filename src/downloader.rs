#[cfg(feature = "web")]
use crate::error::{Result, ShowcaseError};
use crate::record::{ProjectRecord, fields};
use std::collections::BTreeSet;

/// Column order used by both exports
///
/// The recognised project columns come first, in their usual order, followed
/// by any other column present in the records, sorted by name.
///
/// # Arguments
/// * `projects` - The records being exported
///
/// # Returns
/// * `Vec<String>` - Header names
pub fn export_columns(projects: &[ProjectRecord]) -> Vec<String> {
    let mut extra: BTreeSet<&str> = BTreeSet::new();
    for project in projects {
        extra.extend(project.keys().filter(|k| !fields::ALL.contains(k)));
    }

    fields::ALL
        .iter()
        .map(|c| c.to_string())
        .chain(extra.into_iter().map(String::from))
        .collect()
}

/// Convert projects to CSV format
///
/// Creates a string with a header row followed by one line per project.
/// Values containing commas, quotes or newlines are quoted with inner quotes
/// doubled, so spreadsheet programs read them back intact.
///
/// # Examples
/// ```
/// use showcase::downloader::to_csv;
/// use showcase::record::ProjectRecord;
///
/// let arm = ProjectRecord::from_pairs([("Name", "Arm"), ("Software", "ROS, Python")]);
/// let csv = to_csv(&[arm]);
/// assert!(csv.starts_with("Name,Type,Description,Video Link,Materials,Software,Code\n"));
/// assert!(csv.contains("Arm,,,,,\"ROS, Python\","));
/// ```
pub fn to_csv(projects: &[ProjectRecord]) -> String {
    let columns = export_columns(projects);
    let mut csv_content = String::new();

    let header: Vec<String> = columns.iter().map(|c| escape_csv(c)).collect();
    csv_content.push_str(&header.join(","));
    csv_content.push('\n');

    for project in projects {
        let row: Vec<String> = columns
            .iter()
            .map(|c| escape_csv(project.field(c)))
            .collect();
        csv_content.push_str(&row.join(","));
        csv_content.push('\n');
    }

    csv_content
}

fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Convert projects to XLSX format
///
/// Writes the same grid as [`to_csv`] using the rust_xlsxwriter library, with
/// the header row in bold.
///
/// # Returns
/// * `Result<Vec<u8>>` - XLSX file content as bytes or an export error
#[cfg(feature = "web")]
pub fn to_xlsx(projects: &[ProjectRecord]) -> Result<Vec<u8>> {
    use rust_xlsxwriter::{Format, Workbook, Worksheet};

    let export_err = |e: rust_xlsxwriter::XlsxError| ShowcaseError::Export(e.to_string());
    let columns = export_columns(projects);

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();
    let bold = Format::new().set_bold();

    for (c, column) in columns.iter().enumerate() {
        worksheet
            .write_string_with_format(0, c as u16, column.as_str(), &bold)
            .map_err(export_err)?;
    }

    for (r, project) in projects.iter().enumerate() {
        for (c, column) in columns.iter().enumerate() {
            let value = project.field(column);
            if value.is_empty() {
                continue;
            }
            worksheet
                .write_string((r + 1) as u32, c as u16, value)
                .map_err(export_err)?;
        }
    }

    workbook.push_worksheet(worksheet);
    workbook.save_to_buffer().map_err(export_err)
}

/// Download file name with a timestamp, e.g. `projects-20240131-154500.csv`
pub fn export_filename(extension: &str) -> String {
    format!(
        "projects-{}.{}",
        chrono::Local::now().format("%Y%m%d-%H%M%S"),
        extension
    )
}
