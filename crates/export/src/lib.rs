//! Export helpers for CSV and JSON artifacts.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Create a writer for the target path, handling stdout (`-`) by convention.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    Ok(Box::new(BufWriter::new(file)))
}

pub mod exclusion {
    use std::cmp::Ordering;
    use std::fs::{self, File};
    use std::io::{self, Write};
    use std::path::Path;

    use macro_core::Quantity;
    use macro_core::vector::Vector3;
    use macro_integrator::{ExclusionCurve, InteractionParameters, KinematicParameters, VelocityAxis};
    use serde::Serialize;
    use serde_json::to_writer_pretty;

    const HEADER: &str = "grid_index,vx,vy,vz,mass,cross_section";

    /// One CSV row; either value may be missing when only one pass emitted at that point.
    #[derive(Debug, Clone, PartialEq)]
    pub struct Row {
        pub grid_index: usize,
        pub velocity: Vector3,
        pub mass: Option<f64>,
        pub cross_section: Option<f64>,
    }

    impl Row {
        pub fn write_to(&self, writer: &mut dyn Write) -> io::Result<()> {
            writeln!(
                writer,
                "{},{},{},{},{},{}",
                self.grid_index,
                self.velocity[0],
                self.velocity[1],
                self.velocity[2],
                self.mass.map(|m| format!("{m:e}")).unwrap_or_default(),
                self.cross_section.map(|s| format!("{s:e}")).unwrap_or_default(),
            )
        }
    }

    /// Join both passes on grid index, in walk order.
    pub fn rows(curve: &ExclusionCurve) -> Vec<Row> {
        let masses = &curve.mass.samples;
        let sigmas = &curve.cross_section.samples;
        let mut rows = Vec::with_capacity(masses.len().max(sigmas.len()));
        let (mut i, mut j) = (0, 0);
        while i < masses.len() || j < sigmas.len() {
            let order = match (masses.get(i), sigmas.get(j)) {
                (Some(m), Some(s)) => m.grid_index.cmp(&s.grid_index),
                (Some(_), None) => Ordering::Less,
                _ => Ordering::Greater,
            };
            let row = match order {
                Ordering::Less => {
                    let m = &masses[i];
                    i += 1;
                    Row {
                        grid_index: m.grid_index,
                        velocity: m.velocity,
                        mass: Some(m.mass),
                        cross_section: None,
                    }
                }
                Ordering::Greater => {
                    let s = &sigmas[j];
                    j += 1;
                    Row {
                        grid_index: s.grid_index,
                        velocity: s.velocity,
                        mass: None,
                        cross_section: Some(s.cross_section),
                    }
                }
                Ordering::Equal => {
                    let (m, s) = (&masses[i], &sigmas[j]);
                    i += 1;
                    j += 1;
                    Row {
                        grid_index: m.grid_index,
                        velocity: m.velocity,
                        mass: Some(m.mass),
                        cross_section: Some(s.cross_section),
                    }
                }
            };
            rows.push(row);
        }
        rows
    }

    /// Write the header and every joined row.
    pub fn write_csv(writer: &mut dyn Write, curve: &ExclusionCurve) -> io::Result<()> {
        writeln!(writer, "{}", HEADER)?;
        for row in rows(curve) {
            row.write_to(writer)?;
        }
        Ok(())
    }

    /// JSON sidecar describing a run.
    #[derive(Debug, Serialize)]
    pub struct Summary<'a> {
        pub generated_at: String,
        pub axis_unit: &'a str,
        pub axis_len: usize,
        pub bin_width: Quantity,
        pub kinematics: &'a KinematicParameters,
        pub interaction: &'a InteractionParameters,
        pub accepted: usize,
        pub mass_samples: usize,
        pub cross_section_samples: usize,
        pub vbar: Quantity,
        pub vhold_mass_pass: Quantity,
        pub vhold_final: Quantity,
    }

    impl<'a> Summary<'a> {
        pub fn new(
            axis: &'a VelocityAxis,
            kinematics: &'a KinematicParameters,
            interaction: &'a InteractionParameters,
            curve: &ExclusionCurve,
        ) -> Self {
            Self {
                generated_at: chrono::Utc::now().to_rfc3339(),
                axis_unit: axis.unit().symbol,
                axis_len: axis.len(),
                bin_width: axis.bin_width(),
                kinematics,
                interaction,
                accepted: curve.mass.accepted,
                mass_samples: curve.mass.samples.len(),
                cross_section_samples: curve.cross_section.samples.len(),
                vbar: curve.vbar(),
                vhold_mass_pass: curve.mass.vhold,
                vhold_final: curve.vhold(),
            }
        }
    }

    /// Write the summary as pretty JSON, creating parent directories.
    pub fn write_summary(path: &Path, summary: &Summary<'_>) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        to_writer_pretty(File::create(path)?, summary)?;
        Ok(())
    }
}

pub mod reference {
    use std::io::{self, Write};

    use macro_density::ReferenceCurve;

    /// Write a `mass_g` column followed by one cm^2 column per reference curve.
    pub fn write_csv(writer: &mut dyn Write, masses_g: &[f64]) -> io::Result<()> {
        let names: Vec<&str> = ReferenceCurve::ALL.iter().map(|c| c.name()).collect();
        writeln!(writer, "mass_g,{}", names.join(","))?;
        for &m in masses_g {
            let values: Vec<String> = ReferenceCurve::ALL
                .iter()
                .map(|c| format!("{:e}", c.at(m)))
                .collect();
            writeln!(writer, "{:e},{}", m, values.join(","))?;
        }
        Ok(())
    }
}
