use std::path::PathBuf;

use ap_app::{AdsorbateStatus, RunOptions, RunRequest, run, validate};
use ap_project::read_two_column;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ap-app-{name}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

const PROPERTIES: &str = "\
NAME CO2
MOLECULAR_MASS 44.01
PRESSURE_CRITICAL 7.3773
TEMPERATURE_CRITICAL 304.1282
";

const CONFIG: &str = r#"
name: scenario
adsorbates:
  - name: CO2
    properties: co2.prop
    datasets:
      - name: langmuir-298
        kind: isotherm
        condition: 24.85
        source: { model: { kind: langmuir, parameters: [[5.0], [0.1]] }, range: [0.01, 10.0], points: 50 }
        saturation_pressure: { kind: constant, value: 10.0 }
        density: { kind: constant, value: 1000.0 }
      - name: measured-298
        kind: isotherm
        condition: 24.85
        source: { file: measured.dat }
        saturation_pressure: { kind: constant, value: 10.0 }
        density: { kind: constant, value: 1000.0 }
    units: { temperature: C }
    output_units: { pressure: bar }
    predictions:
      - { kind: isotherm, name: replay, temperature: 24.85, range: { min: 1.0, max: 5.0, count: 9 } }
      - { kind: isostere, loading: 1.0, free: temperature, range: { values: [0.0, 25.0, 50.0] } }
    diagnostics: { density: { min: 0.0, max: 50.0, count: 6 } }
    enthalpy: { temperature: 24.85 }
  - name: broken
    properties: co2.prop
    datasets:
      - name: a
        kind: isotherm
        condition: 298.0
        source: { file: measured.dat }
        saturation_pressure: { kind: no_such_model }
        density: { kind: empirical }
"#;

fn write_inputs(dir: &std::path::Path) -> PathBuf {
    std::fs::write(dir.join("co2.prop"), PROPERTIES).unwrap();
    let measured: String = [0.5, 1.0, 2.0, 4.0]
        .iter()
        .map(|p: &f64| format!("{p} {}\n", 5.0 * 0.1 * p / (1.0 + 0.1 * p)))
        .collect();
    std::fs::write(dir.join("measured.dat"), format!("# p q\n{measured}")).unwrap();
    let config = dir.join("run.yaml");
    std::fs::write(&config, CONFIG).unwrap();
    config
}

#[test]
fn run_completes_good_adsorbate_and_reports_broken_one() {
    let dir = scratch_dir("run");
    let config = write_inputs(&dir);
    let report = run(&RunRequest {
        config_path: &config,
        options: RunOptions::default(),
    })
    .unwrap();

    assert_eq!(report.completed(), 1);
    assert_eq!(report.failed(), 1);

    let co2 = &report.adsorbates[0];
    let AdsorbateStatus::Completed(summary) = &co2.status else {
        panic!("CO2 failed: {:?}", co2.status);
    };
    // the saturated model point is dropped; the measured points pool in
    assert_eq!(summary.curve_points, 49 + 4);
    assert_eq!(summary.predictions.len(), 2);
    assert_eq!(summary.predictions[0].points, 9);
    assert_eq!(summary.predictions[1].points, 3);

    let AdsorbateStatus::Failed { error } = &report.adsorbates[1].status else {
        panic!("broken adsorbate should fail");
    };
    assert!(error.contains("no_such_model"), "{error}");

    let out = dir.join("Output").join("scenario").join("CO2");
    let replay = read_two_column(&out.join("predictions").join("replay.dat")).unwrap();
    // pressures come back in bar
    assert!((replay[0].0 - 10.0).abs() < 1e-9);
    let expected = 5.0 * 0.1 * 1.0 / (1.0 + 0.1 * 1.0);
    assert!((replay[0].1 - expected).abs() < 0.01 * expected);

    assert!(out.join("characteristic_curve.dat").exists());
    assert_eq!(read_two_column(&out.join("density.dat")).unwrap().len(), 6);
    assert!(!read_two_column(&out.join("enthalpy.dat")).unwrap().is_empty());
}

#[test]
fn validate_resolves_without_writing() {
    let dir = scratch_dir("validate");
    let config = write_inputs(&dir);
    let report = validate(&config).unwrap();
    assert!(!report.is_valid());
    assert_eq!(report.adsorbates[0].1, Ok((2, 2)));
    assert!(report.adsorbates[1].1.is_err());
    assert!(!dir.join("Output").exists());
}

#[test]
fn output_directory_override_and_dry_run() {
    let dir = scratch_dir("dry");
    let config = write_inputs(&dir);
    let report = run(&RunRequest {
        config_path: &config,
        options: RunOptions {
            write_outputs: false,
            output_directory: Some(dir.join("elsewhere")),
        },
    })
    .unwrap();
    let AdsorbateStatus::Completed(summary) = &report.adsorbates[0].status else {
        panic!("CO2 failed");
    };
    assert!(summary.files.is_empty());
    assert!(!dir.join("elsewhere").exists());
}
