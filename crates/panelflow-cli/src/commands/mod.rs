pub mod analyze;
pub mod sweep;

use crate::cli::GeometrySource;
use crate::error::{CliError, Result};
use panelflow::core::geometry::{discretize, naca::Naca4};
use panelflow::core::io::coordinates::read_coordinates_from_path;
use panelflow::core::models::panel::Panel;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use tracing::info;

/// Points per surface when sampling a NACA section before it is re-paneled.
const NACA_POINTS_PER_SIDE: usize = 200;

/// A discretized airfoil ready for analysis.
pub struct LoadedAirfoil {
    pub name: String,
    pub panels: Vec<Panel>,
}

pub fn load_airfoil(source: &GeometrySource, panel_count: usize) -> Result<LoadedAirfoil> {
    let (name, x, y) = match (&source.input, &source.naca) {
        (Some(path), _) => {
            info!("Loading airfoil coordinates from {:?}", path);
            let coordinates =
                read_coordinates_from_path(path).map_err(|e| CliError::FileParsing {
                    path: path.clone(),
                    source: e.into(),
                })?;
            let name = coordinates.title.clone().unwrap_or_else(|| {
                path.file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.display().to_string())
            });
            (name, coordinates.x, coordinates.y)
        }
        (None, Some(designation)) => {
            let section = Naca4::parse(designation)?;
            info!("Generating NACA {} coordinates.", designation);
            let (x, y) = section.coordinates(NACA_POINTS_PER_SIDE);
            let digits = designation
                .trim()
                .trim_start_matches("NACA")
                .trim_start_matches("naca")
                .trim();
            (format!("NACA {}", digits), x, y)
        }
        (None, None) => {
            return Err(CliError::Argument(
                "either --input or --naca is required".to_string(),
            ));
        }
    };

    let panels = discretize(&x, &y, panel_count)?;
    info!("Discretized '{}' into {} panels.", name, panels.len());
    Ok(LoadedAirfoil { name, panels })
}

pub fn create_output(path: &Path) -> Result<BufWriter<File>> {
    info!("Writing results to {:?}", path);
    Ok(BufWriter::new(File::create(path)?))
}
