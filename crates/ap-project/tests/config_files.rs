use std::path::PathBuf;

use ap_project::{
    DataKindDef, ProjectError, RunConfig, load_config, load_properties, read_two_column, save_json,
    save_yaml, write_two_column,
};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ap-project-{name}-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

const CONFIG: &str = r#"
name: methane
adsorbates:
  - name: CH4
    properties: ch4.prop
    datasets:
      - name: iso-273
        kind: isotherm
        condition: 273.15
        source: { file: ch4_273.dat }
        saturation_pressure: { kind: library }
        density: { kind: ozawa }
"#;

#[test]
fn yaml_config_round_trips_through_json() {
    let dir = scratch_dir("roundtrip");
    let yaml = dir.join("run.yaml");
    std::fs::write(&yaml, CONFIG).unwrap();

    let config = load_config(&yaml).unwrap();
    assert_eq!(config.adsorbates[0].datasets[0].kind, DataKindDef::Isotherm);

    let json = dir.join("run.json");
    save_json(&json, &config).unwrap();
    let back: RunConfig = load_config(&json).unwrap();
    assert_eq!(config, back);

    let yaml2 = dir.join("run2.yml");
    save_yaml(&yaml2, &back).unwrap();
    assert_eq!(load_config(&yaml2).unwrap(), config);
}

#[test]
fn invalid_config_fails_validation() {
    let dir = scratch_dir("invalid");
    let path = dir.join("run.yaml");
    std::fs::write(&path, CONFIG.replace("condition: 273.15", "condition: -1.0")).unwrap();
    assert!(matches!(load_config(&path), Err(ProjectError::Validation(_))));
}

#[test]
fn data_and_properties_files_load() {
    let dir = scratch_dir("files");
    let data = dir.join("nested").join("curve.dat");
    write_two_column(&data, "potential volume", &[(0.5, 0.3), (4.0, 0.1)]).unwrap();
    assert_eq!(read_two_column(&data).unwrap(), vec![(0.5, 0.3), (4.0, 0.1)]);

    let props = dir.join("ch4.json");
    std::fs::write(&props, r#"{"name": "CH4", "critical_temperature": 190.564}"#).unwrap();
    assert_eq!(load_properties(&props).unwrap().critical_temperature, Some(190.564));

    let missing = dir.join("absent.prop");
    assert!(matches!(load_properties(&missing), Err(ProjectError::Io(_))));
}
