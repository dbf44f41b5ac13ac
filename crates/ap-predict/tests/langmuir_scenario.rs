//! End-to-end: synthetic Langmuir isotherm -> characteristic curve -> predictions.

use ap_adsorbate::{AdsorbateDensity, DensityModel, MolecularProperties, SaturationModel, SaturationPressure};
use ap_core::{ApError, Diagnostics};
use ap_curve::{CharacteristicCurve, CurveModels, IsothermDataset, build};
use ap_isotherms::{IsothermKind, IsothermModel};
use ap_predict::{
    FreeVariable, PredictionContext, PredictionKind, PredictionRequest, Range, predict,
};

const T: f64 = 298.0;

fn models() -> (SaturationPressure, AdsorbateDensity) {
    let props = MolecularProperties::new("co2");
    (
        SaturationModel::Constant { value: 10.0 }.resolve(&props).unwrap(),
        DensityModel::Constant { value: 1000.0 }.resolve(&props).unwrap(),
    )
}

fn langmuir() -> IsothermModel {
    IsothermModel::single(IsothermKind::Langmuir, &[5.0, 0.1]).unwrap()
}

fn scenario() -> (IsothermDataset, CharacteristicCurve, Diagnostics) {
    let (p0, rho) = models();
    let dataset = IsothermDataset::from_model("langmuir", T, &langmuir(), 0.01, 10.0, 50).unwrap();
    let mut diags = Diagnostics::new();
    let curve = build(
        &dataset,
        CurveModels {
            saturation_pressure: &p0,
            density: &rho,
        },
        &mut diags,
    )
    .unwrap();
    (dataset, curve, diags)
}

#[test]
fn saturated_point_is_dropped_from_curve() {
    let (_, curve, diags) = scenario();
    // p = 10 MPa equals p₀ and has no finite potential
    assert_eq!(curve.len(), 49);
    assert_eq!(diags.count_where(|e| matches!(e, ApError::DomainError { .. })), 1);
    assert_eq!(curve.monotonicity_violations(), 0);
}

#[test]
fn isotherm_at_source_temperature_reproduces_data() {
    let (dataset, curve, _) = scenario();
    let (p0, rho) = models();
    let ctx = PredictionContext::new(&curve, &p0, &rho);

    let pressures: Vec<f64> = dataset.points.iter().map(|(p, _)| *p).collect();
    let request = PredictionRequest::new(
        "replay",
        PredictionKind::Isotherm { temperature: T },
        Range::Explicit(pressures),
    );
    let mut diags = Diagnostics::new();
    let result = predict(&request, &ctx, &mut diags).unwrap();
    assert_eq!(result.len(), 50);
    assert!(diags.is_empty(), "{:?}", diags.entries());

    let model = langmuir();
    for (p, q) in result.points {
        let expected = model.loading(p).unwrap();
        assert!(
            (q - expected).abs() <= 0.01 * expected,
            "p = {p}: predicted {q}, expected {expected}"
        );
    }
}

#[test]
fn isostere_pressure_and_temperature_grids_agree() {
    let (_, curve, _) = scenario();
    let (p0, rho) = models();
    let ctx = PredictionContext::new(&curve, &p0, &rho);
    let mut diags = Diagnostics::new();

    let over_t = predict(
        &PredictionRequest::new(
            "over-t",
            PredictionKind::Isostere {
                loading: 0.5,
                free: FreeVariable::Temperature,
            },
            Range::Explicit(vec![250.0, 300.0, 350.0]),
        ),
        &ctx,
        &mut diags,
    )
    .unwrap();
    assert_eq!(over_t.len(), 3);
    for &(t, p) in &over_t.points {
        assert!((ctx.loading_at(t, p).unwrap() - 0.5).abs() < 1e-6);
    }
    // isosteres rise with temperature
    assert!(over_t.points.windows(2).all(|w| w[0].1 < w[1].1));

    let pressures: Vec<f64> = over_t.points.iter().map(|(_, p)| *p).collect();
    let over_p = predict(
        &PredictionRequest::new(
            "over-p",
            PredictionKind::Isostere {
                loading: 0.5,
                free: FreeVariable::Pressure,
            },
            Range::Explicit(pressures),
        ),
        &ctx,
        &mut diags,
    )
    .unwrap();
    assert!(diags.is_empty(), "{:?}", diags.entries());
    for ((t_expected, _), (t, _)) in over_t.points.iter().zip(&over_p.points) {
        assert!((t - t_expected).abs() < 1e-6, "{t} vs {t_expected}");
    }
}

#[test]
fn isotherm_range_outside_reach_is_clamped() {
    let (_, curve, _) = scenario();
    let (p0, rho) = models();
    let ctx = PredictionContext::new(&curve, &p0, &rho);
    let request = PredictionRequest::new(
        "wide",
        PredictionKind::Isotherm { temperature: T },
        Range::Explicit(vec![0.001, 1.0, 20.0]),
    );
    let mut diags = Diagnostics::new();
    let result = predict(&request, &ctx, &mut diags).unwrap();

    assert_eq!(result.len(), 3);
    assert!((result.points[0].0 - 0.01).abs() < 1e-9);
    assert_eq!(result.points[2].0, 10.0);
    assert_eq!(diags.count_where(|e| matches!(e, ApError::OutOfRange { .. })), 2);
}
