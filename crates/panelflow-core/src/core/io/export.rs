use serde::Serialize;
use std::io::Write;
use thiserror::Error;

/// One row of a surface distribution table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceRecord {
    pub panel: usize,
    pub x: f64,
    pub y: f64,
    pub side: &'static str,
    pub beta: f64,
    pub length: f64,
    pub sigma: f64,
    pub vt: f64,
    pub cp: f64,
}

/// One row of an angle-of-attack sweep table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseRecord {
    pub alpha_deg: f64,
    pub cl: f64,
    pub cl_pressure: f64,
    pub cm: f64,
    pub cm_pressure: f64,
    pub center_of_pressure: f64,
    pub gamma: f64,
    pub iterations: usize,
    pub converged: bool,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes surface rows as headed CSV.
pub fn write_surface_csv<W: Write>(
    writer: W,
    records: &[SurfaceRecord],
) -> Result<(), ExportError> {
    write_records(writer, records)
}

/// Writes sweep rows as headed CSV.
pub fn write_sweep_csv<W: Write>(writer: W, records: &[CaseRecord]) -> Result<(), ExportError> {
    write_records(writer, records)
}

fn write_records<W: Write, R: Serialize>(writer: W, records: &[R]) -> Result<(), ExportError> {
    let mut table = csv::Writer::from_writer(writer);
    for record in records {
        table.serialize(record)?;
    }
    table.flush()?;
    Ok(())
}
