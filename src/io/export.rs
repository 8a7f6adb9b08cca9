//! CSV export for per-building simulation estimates.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::BuildingEstimate;

/// Column header for the estimates CSV.
pub const HEADER: [&str; 5] = [
    "building_id",
    "energy_demand",
    "water_demand",
    "material_flow",
    "stress_level",
];

/// Exports per-building estimates to a CSV file at the given path.
///
/// Writes a header row followed by one row per building, in input order.
///
/// # Arguments
///
/// * `estimates` - Per-building results of one simulation
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(estimates: &[BuildingEstimate], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(estimates, buf)
}

/// Writes per-building estimates as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(estimates: &[BuildingEstimate], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER)?;

    for e in estimates {
        wtr.write_record(&[
            e.building_id.clone(),
            format!("{:.2}", e.energy_demand),
            format!("{:.2}", e.water_demand),
            format!("{:.2}", e.material_flow),
            format!("{:.2}", e.stress_level),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_estimate(n: usize) -> BuildingEstimate {
        BuildingEstimate {
            building_id: format!("building-{n}"),
            energy_demand: 648.0,
            water_demand: 384.0,
            material_flow: 800.0,
            stress_level: 0.73,
        }
    }

    fn render(estimates: &[BuildingEstimate]) -> String {
        let mut buf = Vec::new();
        write_csv(estimates, &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn header_is_stable() {
        let output = render(&[make_estimate(1)]);
        assert_eq!(
            output.lines().next().unwrap_or(""),
            "building_id,energy_demand,water_demand,material_flow,stress_level"
        );
    }

    #[test]
    fn one_row_per_building() {
        let estimates: Vec<BuildingEstimate> = (1..=5).map(make_estimate).collect();
        assert_eq!(render(&estimates).lines().count(), 6);
    }

    #[test]
    fn values_use_two_decimals() {
        let output = render(&[make_estimate(1)]);
        assert_eq!(
            output.lines().nth(1).unwrap_or(""),
            "building-1,648.00,384.00,800.00,0.73"
        );
    }

    #[test]
    fn empty_input_writes_header_only() {
        assert_eq!(render(&[]).lines().count(), 1);
    }

    #[test]
    fn export_to_file() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let path = dir.path().join("estimates.csv");
        export_csv(&[make_estimate(1), make_estimate(2)], &path).expect("export should succeed");
        let content = std::fs::read_to_string(&path).expect("file should exist");
        assert_eq!(content.lines().count(), 3);
    }
}
