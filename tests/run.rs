use std::io::Write;

use macro_lightning::config::{EscapeVelocityRegistry, load_run_config};
use macro_lightning::core::Unit;
use macro_lightning::integrator::ErrorClass;
use macro_lightning::run::{self, RunError};

fn write_manifest(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .expect("temp manifest");
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn coarse_toml_manifest_runs_with_defaults() {
    let config = load_run_config("configs/runs/coarse.toml").expect("coarse manifest");
    let registry = EscapeVelocityRegistry::default();
    let inputs = run::resolve(&config, &registry).unwrap();
    assert_eq!(inputs.axis.len(), 25);
    assert_eq!(inputs.interaction.mass_unit, Unit::G);

    let curve = run::run(&config, &registry).unwrap();
    assert!(!curve.mass.samples.is_empty());
    assert!(!curve.cross_section.samples.is_empty());
}

#[test]
fn fiducial_manifest_parses() {
    let config = load_run_config("configs/runs/fiducial.yaml").expect("fiducial manifest");
    let inputs = run::resolve(&config, &EscapeVelocityRegistry::default()).unwrap();
    assert_eq!(inputs.axis.len(), 320);
    assert!((inputs.kinematics.infall.value - 16.66).abs() < 0.05);
}

#[test]
fn escape_chain_overrides_infall() {
    let manifest = write_manifest(
        r#"
axis: { start: -300 km/s, stop: 350 km/s, step: 50 km/s }
interaction: { sigma_factor: 1e4 cm^2 km^2 / s^2, mass_unit: kg }
escape_chain:
  bodies: ["11.186 km/s", "42.1 km/s", "550 km/s"]
"#,
    );
    let config = load_run_config(manifest.path()).unwrap();
    let inputs = run::resolve(&config, &EscapeVelocityRegistry::default()).unwrap();
    assert!((inputs.kinematics.infall.value - 161.94929058).abs() < 1e-6);
    assert_eq!(inputs.interaction.mass_unit, Unit::KG);
}

#[test]
fn unknown_units_and_bodies_are_reported() {
    let manifest = write_manifest(
        r#"
axis: { start: 0 km/s, stop: 10 km/s, step: 1 km/s }
interaction: { sigma_factor: 1 m^4 / s^2, sigma_unit: furlong }
"#,
    );
    let config = load_run_config(manifest.path()).unwrap();
    match run::resolve(&config, &EscapeVelocityRegistry::default()) {
        Err(RunError::Integration(err)) => assert_eq!(err.class(), ErrorClass::Uninterpretable),
        other => panic!("expected an uninterpretable unit, got {other:?}"),
    }

    let manifest = write_manifest(
        r#"
axis: { start: 0 km/s, stop: 10 km/s, step: 1 km/s }
interaction: { sigma_factor: 1 m^4 / s^2 }
escape_chain: { bodies: [Earth, Vulcan] }
"#,
    );
    let config = load_run_config(manifest.path()).unwrap();
    assert!(matches!(
        run::resolve(&config, &EscapeVelocityRegistry::default()),
        Err(RunError::Config(_))
    ));
}

#[test]
fn bare_numbers_are_not_quantities() {
    let manifest = write_manifest(
        r#"
axis: { start: 0, stop: 10 km/s, step: 1 km/s }
interaction: { sigma_factor: 1 m^4 / s^2 }
"#,
    );
    assert!(load_run_config(manifest.path()).is_err());
}

#[test]
fn facade_reports_its_version() {
    assert_eq!(macro_lightning::version(), "0.1.0");
}
