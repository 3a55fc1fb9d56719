use assert_cmd::Command;
use predicates::prelude::*;

fn manifest(name: &str) -> String {
    format!("{}/../../configs/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn exclusion_writes_csv_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("curve.csv");
    let summary_path = dir.path().join("summary.json");

    Command::cargo_bin("exclusion")
        .unwrap()
        .args(["--config", &manifest("runs/coarse.toml")])
        .arg("--output")
        .arg(&csv_path)
        .arg("--summary")
        .arg(&summary_path)
        .assert()
        .success()
        .stderr(predicate::str::contains("cross-section samples"));

    let mut reader = csv::Reader::from_path(&csv_path).unwrap();
    assert_eq!(&reader.headers().unwrap()[4], "mass");
    assert!(reader.records().count() > 0);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(summary_path).unwrap()).unwrap();
    assert!(json["accepted"].as_u64().unwrap() > 0);
}

#[test]
fn exclusion_streams_to_stdout() {
    Command::cargo_bin("exclusion")
        .unwrap()
        .args(["--config", &manifest("runs/coarse.toml"), "--output", "-", "--parallel"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("grid_index,vx,vy,vz,mass,cross_section"));
}

#[test]
fn exclusion_selects_extra_parameter_sets() {
    let dir = tempfile::tempdir().unwrap();
    let run = dir.path().join("chain.yaml");
    std::fs::write(
        &run,
        "axis: { start: -300 km/s, stop: 350 km/s, step: 50 km/s }\n\
         interaction: { sigma_factor: 1e4 cm^2 km^2 / s^2 }\n\
         escape_chain: { bodies: [Moon, Earth] }\n",
    )
    .unwrap();

    Command::cargo_bin("exclusion")
        .unwrap()
        .arg("--config")
        .arg(&run)
        .args(["--output", "-"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Moon"));

    Command::cargo_bin("exclusion")
        .unwrap()
        .arg("--config")
        .arg(&run)
        .args(["--parameter-sets", &manifest("escape_sets.yaml")])
        .args(["--select", "rounded", "--output", "-"])
        .assert()
        .success();
}

#[test]
fn exclusion_rejects_missing_manifest() {
    Command::cargo_bin("exclusion")
        .unwrap()
        .args(["--config", "does/not/exist.yaml", "--output", "-"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load run manifest"));
}

#[test]
fn reference_curves_to_stdout() {
    Command::cargo_bin("reference_curves")
        .unwrap()
        .args(["--min-exp", "1", "--max-exp", "5", "--points", "5", "--output", "-"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "mass_g,atomic_density,nuclear_density,black_hole,cmb,kepler_top,lmc_top",
        ))
        .stdout(predicate::function(|out: &str| out.lines().count() == 6));
}

#[test]
fn reference_curves_rejects_empty_grid() {
    Command::cargo_bin("reference_curves")
        .unwrap()
        .args(["--points", "0", "--output", "-"])
        .assert()
        .failure();
}
