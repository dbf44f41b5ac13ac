//! Built-in saturation-pressure tables.
//!
//! Vapor pressures along the liquid-vapor coexistence line, from the triple
//! point (or a convenient low temperature) up to the critical point.
//! Temperatures in K, pressures in MPa.

use ap_core::{ApError, ApResult};

use crate::table::Table;

struct LibraryEntry {
    name: &'static str,
    aliases: &'static [&'static str],
    points: &'static [(f64, f64)],
}

const CO2: &[(f64, f64)] = &[
    (216.59, 0.518),
    (220.0, 0.599),
    (230.0, 0.893),
    (240.0, 1.283),
    (250.0, 1.785),
    (260.0, 2.419),
    (270.0, 3.203),
    (280.0, 4.161),
    (290.0, 5.318),
    (300.0, 6.713),
    (304.13, 7.377),
];

const CH4: &[(f64, f64)] = &[
    (90.69, 0.0117),
    (100.0, 0.0344),
    (110.0, 0.0881),
    (120.0, 0.1914),
    (130.0, 0.3681),
    (140.0, 0.6412),
    (150.0, 1.0405),
    (160.0, 1.5921),
    (170.0, 2.3281),
    (180.0, 3.2861),
    (190.56, 4.5992),
];

const N2: &[(f64, f64)] = &[
    (63.15, 0.0125),
    (70.0, 0.0386),
    (77.35, 0.1013),
    (80.0, 0.1370),
    (90.0, 0.3605),
    (100.0, 0.7783),
    (110.0, 1.4670),
    (120.0, 2.5106),
    (126.19, 3.3958),
];

const AR: &[(f64, f64)] = &[
    (83.81, 0.0689),
    (87.30, 0.1013),
    (90.0, 0.1337),
    (100.0, 0.3238),
    (110.0, 0.6654),
    (120.0, 1.2130),
    (130.0, 2.0262),
    (140.0, 3.1649),
    (150.69, 4.8630),
];

const LIBRARY: [LibraryEntry; 4] = [
    LibraryEntry {
        name: "CO2",
        aliases: &["carbon dioxide", "carbon_dioxide", "r744"],
        points: CO2,
    },
    LibraryEntry {
        name: "CH4",
        aliases: &["methane", "r50"],
        points: CH4,
    },
    LibraryEntry {
        name: "N2",
        aliases: &["nitrogen"],
        points: N2,
    },
    LibraryEntry {
        name: "Ar",
        aliases: &["argon", "r740"],
        points: AR,
    },
];

/// Names of the adsorbates with a built-in table.
pub fn library_names() -> impl Iterator<Item = &'static str> {
    LIBRARY.iter().map(|e| e.name)
}

/// Saturation-pressure table for `name` (case-insensitive name or alias).
pub fn saturation_table(name: &str) -> ApResult<Table> {
    let key = name.trim().to_ascii_lowercase();
    let entry = LIBRARY
        .iter()
        .find(|e| e.name.to_ascii_lowercase() == key || e.aliases.contains(&key.as_str()))
        .ok_or_else(|| ApError::UnsupportedModel {
            name: name.to_string(),
            family: "saturation pressure library",
        })?;
    Table::new(entry.points.to_vec())
}
