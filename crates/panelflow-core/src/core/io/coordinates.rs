use std::fs;
use std::io::Read;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Raw contour coordinates as read from a file, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirfoilCoordinates {
    /// First non-numeric line of the file, typically the section name in Selig-style files.
    pub title: Option<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl AirfoilCoordinates {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum CoordinateError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),
    #[error("No coordinate pairs found")]
    NoCoordinates,
}

/// Reads an airfoil coordinate table.
///
/// Each row contributes its first two numeric fields as an `(x, y)` pair. Fields may be
/// separated by commas or by any run of spaces and tabs, decided row by row, so a comma in a
/// title line does not affect the data rows. Rows with fewer than two numeric fields (blank
/// lines, headers, point counts) are skipped.
///
/// # Errors
///
/// Returns [`CoordinateError`] if the input cannot be read or contains no coordinate pair.
pub fn read_coordinates<R: Read>(reader: R) -> Result<AirfoilCoordinates, CoordinateError> {
    let mut table = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut coordinates = AirfoilCoordinates::default();
    let mut skipped = 0usize;
    for record in table.records() {
        let record = record?;
        // Commas split fields; whitespace splits them further, so each row picks its own delimiter.
        let tokens: Vec<&str> = record.iter().flat_map(str::split_whitespace).collect();
        let numbers: Vec<f64> = tokens
            .iter()
            .map_while(|token| token.parse::<f64>().ok())
            .take(2)
            .collect();

        if let [x, y] = numbers[..] {
            coordinates.x.push(x);
            coordinates.y.push(y);
        } else {
            if coordinates.title.is_none() && coordinates.is_empty() && !tokens.is_empty() {
                let fields: Vec<&str> = record.iter().filter(|f| !f.is_empty()).collect();
                coordinates.title = Some(fields.join(", "));
            }
            skipped += 1;
        }
    }

    if coordinates.is_empty() {
        return Err(CoordinateError::NoCoordinates);
    }

    debug!(
        points = coordinates.len(),
        skipped_rows = skipped,
        "Coordinate table read."
    );
    Ok(coordinates)
}

/// Reads an airfoil coordinate file from disk. See [`read_coordinates`].
pub fn read_coordinates_from_path<P: AsRef<Path>>(
    path: P,
) -> Result<AirfoilCoordinates, CoordinateError> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|e| CoordinateError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    read_coordinates(file)
}
