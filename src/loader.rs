use crate::record::ProjectRecord;
use std::error::Error;
use std::fs;
use std::path::Path;

/// Load project records from a CSV file on disk
///
/// Reads the whole file and hands it to [`parse_csv`]. Only I/O failures are
/// reported; ragged rows are dropped the same way they are for downloaded CSV.
///
/// # Arguments
/// * `filepath` - Path to the CSV file to load
///
/// # Returns
/// * `Result<Vec<ProjectRecord>, Box<dyn Error>>` - The parsed records or an I/O error
///
/// # Examples
/// ```no_run
/// use showcase::loader::from_csv;
///
/// match from_csv("projects.csv") {
///     Ok(projects) => println!("Loaded {} projects", projects.len()),
///     Err(e) => eprintln!("Error loading CSV: {}", e),
/// }
/// ```
pub fn from_csv(filepath: impl AsRef<Path>) -> Result<Vec<ProjectRecord>, Box<dyn Error>> {
    let text = fs::read_to_string(filepath)?;
    Ok(parse_csv(&text))
}

/// Parse CSV text whose first line is the header row
///
/// Each data line becomes a [`ProjectRecord`] keyed by the trimmed header
/// names. A line whose field count differs from the header count is skipped
/// without any report. Fewer than two lines (no data) yields an empty list.
///
/// # Arguments
/// * `text` - Raw CSV text, lines separated by `\n` or `\r\n`
///
/// # Returns
/// * `Vec<ProjectRecord>` - One record per well-formed data line, in input order
///
/// # Examples
/// ```
/// use showcase::loader::parse_csv;
///
/// let projects = parse_csv("Name,Type\nArm,Robotics\nBadRow\nGripper,Automation");
/// assert_eq!(projects.len(), 2);
/// assert_eq!(projects[1].name(), "Gripper");
/// ```
pub fn parse_csv(text: &str) -> Vec<ProjectRecord> {
    let lines: Vec<&str> = text
        .trim()
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    if lines.len() < 2 {
        return Vec::new();
    }

    let headers: Vec<String> = parse_csv_line(lines[0])
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut projects = Vec::new();
    for line in &lines[1..] {
        let values = parse_csv_line(line);
        if values.len() != headers.len() {
            continue;
        }

        projects.push(ProjectRecord::from_pairs(
            headers
                .iter()
                .zip(values.iter())
                .map(|(header, value)| (header.clone(), value.trim().to_string())),
        ));
    }

    projects
}

/// Split one CSV line into fields
///
/// A `"` toggles the quoted state and is dropped from the output; a `,` ends
/// the current field only outside quotes. Doubled quotes are not unescaped and
/// unbalanced quotes are tolerated. The last field is always pushed, so the
/// result is never empty.
///
/// # Examples
/// ```
/// use showcase::loader::parse_csv_line;
///
/// assert_eq!(parse_csv_line(r#"a,"b,c",d"#), vec!["a", "b,c", "d"]);
/// assert_eq!(parse_csv_line(""), vec![""]);
/// ```
pub fn parse_csv_line(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;

    for c in line.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                // End of field
                result.push(std::mem::take(&mut current_field));
            }
            _ => current_field.push(c),
        }
    }

    // Add the last field
    result.push(current_field);

    result
}
