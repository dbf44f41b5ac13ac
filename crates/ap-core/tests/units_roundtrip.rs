use ap_core::{QuantityKind, convert, convert_loading};
use proptest::prelude::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1e-9)
}

proptest! {
    #[test]
    fn every_unit_round_trips(value in 1e-3f64..1e4, kind_idx in 0usize..6) {
        let kind = QuantityKind::ALL[kind_idx];
        let base = kind.base_unit();
        for unit in kind.supported_units() {
            let there = convert(value, kind, base, unit).unwrap();
            let back = convert(there, kind, unit, base).unwrap();
            prop_assert!(close(back, value), "{kind} {unit}: {value} -> {there} -> {back}");
        }
    }

    #[test]
    fn molar_loading_round_trips(value in 1e-3f64..1e3, molar_mass in 2.0f64..300.0) {
        for unit in ap_core::MOLAR_LOADING_UNITS {
            let there = convert_loading(value, "mg/g", unit, Some(molar_mass)).unwrap();
            let back = convert_loading(there, unit, "mg/g", Some(molar_mass)).unwrap();
            prop_assert!(close(back, value));
        }
    }

    #[test]
    fn pressure_conversion_is_monotone(a in 1e-3f64..1e3, b in 1e-3f64..1e3) {
        prop_assume!(a < b);
        for unit in QuantityKind::Pressure.supported_units() {
            let ca = convert(a, QuantityKind::Pressure, "MPa", unit).unwrap();
            let cb = convert(b, QuantityKind::Pressure, "MPa", unit).unwrap();
            prop_assert!(ca < cb);
        }
    }
}
