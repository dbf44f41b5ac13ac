use ap_adsorbate::{
    DensityModel, MolecularProperties, Property, PropertyCorrelation, SaturationModel,
    sample_curve,
};
use ap_core::{ApError, Diagnostics, Sweep};

fn methane() -> MolecularProperties {
    MolecularProperties::new("methane")
        .with(Property::MolarMass, 16.043)
        .with(Property::CriticalPressure, 4.5992)
        .with(Property::CriticalTemperature, 190.56)
        .with(Property::BoilingTemperature, 111.67)
        .with(Property::TriplePointTemperature, 90.69)
        .with(Property::BoilingDensity, 422.6)
        .with(Property::AcentricFactor, 0.01142)
}

#[test]
fn saturation_curve_is_increasing_and_sorted() {
    let props = methane();
    let model = SaturationModel::from_name("peng_robinson").unwrap().resolve(&props).unwrap();
    let mut diags = Diagnostics::new();
    let sweep = Sweep::linear(100.0, 180.0, 9).unwrap();
    let curve = sample_curve(&model, &sweep, &mut diags);
    assert_eq!(curve.len(), 9);
    assert!(diags.is_empty());
    assert!(curve.windows(2).all(|w| w[1].0 > w[0].0 && w[1].1 > w[0].1));
}

#[test]
fn eos_agrees_with_library_table() {
    let props = methane();
    let pr = SaturationModel::from_name("peng_robinson").unwrap().resolve(&props).unwrap();
    let lib = SaturationModel::from_name("library").unwrap().resolve(&props).unwrap();
    for t in [120.0, 150.0, 170.0] {
        let a = pr.value_at(t).unwrap();
        let b = lib.value_at(t).unwrap();
        assert!((a - b).abs() / b < 0.05, "T = {t}: PR {a} vs table {b}");
    }
}

#[test]
fn supercritical_points_are_recorded_and_skipped_under_reject() {
    let props = methane();
    let model = SaturationModel::from_name("peng_robinson").unwrap().resolve(&props).unwrap();
    let mut diags = Diagnostics::new();
    let sweep = Sweep::linear(170.0, 210.0, 5).unwrap();
    let curve = sample_curve(&model, &sweep, &mut diags);
    // 200 K and 210 K lie above Tc
    assert_eq!(curve.len(), 3);
    assert!(diags.count_where(|e| matches!(e, ApError::OutOfRange { .. })) >= 2);
}

#[test]
fn density_curve_covers_sweep() {
    let props = methane();
    let model = DensityModel::from_name("hauer").unwrap().resolve(&props).unwrap();
    let mut diags = Diagnostics::new();
    let curve = sample_curve(&model, &Sweep::linear(100.0, 180.0, 5).unwrap(), &mut diags);
    assert_eq!(curve.len(), 5);
    assert!(curve.windows(2).all(|w| w[1].1 < w[0].1));
}
