//! Molecular-properties files.
//!
//! Two formats: the key/value text format
//!
//! ```text
//! NAME CO2
//! MOLECULAR_MASS 44.01
//! PRESSURE_CRITICAL 7.3773
//! ```
//!
//! and JSON with snake_case field names. Values are in base units
//! (g/mol, MPa, K, kg/m³). Missing properties are allowed.

use std::path::Path;

use ap_adsorbate::{MolecularProperties, Property};
use serde::{Deserialize, Serialize};

use crate::{ProjectError, ProjectResult};

/// JSON form of [`MolecularProperties`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PropertiesDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub molar_mass: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_pressure: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boiling_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triple_point_temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boiling_density: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acentric_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kappa1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kappa2: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kappa3: Option<f64>,
}

impl From<PropertiesDef> for MolecularProperties {
    fn from(def: PropertiesDef) -> Self {
        Self {
            name: def.name,
            molar_mass: def.molar_mass,
            critical_pressure: def.critical_pressure,
            critical_temperature: def.critical_temperature,
            boiling_temperature: def.boiling_temperature,
            triple_point_temperature: def.triple_point_temperature,
            boiling_density: def.boiling_density,
            acentric_factor: def.acentric_factor,
            kappa1: def.kappa1,
            kappa2: def.kappa2,
            kappa3: def.kappa3,
        }
    }
}

/// Parse the key/value text format. `path` is only used in error messages.
pub fn parse_properties(text: &str, path: &Path) -> ProjectResult<MolecularProperties> {
    let mut props = MolecularProperties::default();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let parse_error = |what: String| ProjectError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            what,
        };

        let mut words = line.split_whitespace();
        let (Some(key), Some(value)) = (words.next(), words.next()) else {
            return Err(parse_error(format!("expected `KEY value`, got `{line}`")));
        };

        match key {
            "NAME" => props.name = Some(value.to_string()),
            "SOURCE" | "__SOURCE__" => {}
            _ => {
                let property = Property::from_file_key(key).ok_or_else(|| {
                    parse_error(format!("`{key}` is not a recognised properties key"))
                })?;
                let value: f64 = value
                    .parse()
                    .map_err(|_| parse_error(format!("`{value}` is not a number for {key}")))?;
                props.set(property, value);
            }
        }
    }

    let missing: Vec<&str> = Property::ALL
        .into_iter()
        .filter(|p| props.get(*p).is_none())
        .map(Property::file_key)
        .collect();
    if !missing.is_empty() {
        tracing::debug!(path = %path.display(), ?missing, "properties file leaves keys unset");
    }
    Ok(props)
}

/// Load a properties file, choosing the format by extension.
pub fn load_properties(path: &Path) -> ProjectResult<MolecularProperties> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        let def: PropertiesDef = serde_json::from_str(&content)?;
        Ok(def.into())
    } else {
        parse_properties(&content, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CO2: &str = "\
NAME CO2
MOLECULAR_MASS 44.01
PRESSURE_CRITICAL 7.3773
TEMPERATURE_CRITICAL 304.1282

# boiling point is the sublimation point at 1 atm
TEMPERATURE_BOILING 194.67
ACENTRIC_FACTOR 0.22394
";

    #[test]
    fn parses_key_value_file() {
        let props = parse_properties(CO2, Path::new("co2.prop")).unwrap();
        assert_eq!(props.name.as_deref(), Some("CO2"));
        assert_eq!(props.molar_mass, Some(44.01));
        assert_eq!(props.critical_temperature, Some(304.1282));
        assert_eq!(props.boiling_density, None);
    }

    #[test]
    fn unknown_key_is_rejected_with_line() {
        let err = parse_properties("NAME X\nBOILING 100\n", Path::new("x.prop")).unwrap_err();
        match err {
            ProjectError::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn non_numeric_value_is_rejected() {
        assert!(parse_properties("MOLECULAR_MASS heavy", Path::new("x.prop")).is_err());
    }

    #[test]
    fn json_rejects_unknown_fields() {
        let ok: PropertiesDef = serde_json::from_str(r#"{"name": "N2", "molar_mass": 28.0}"#).unwrap();
        assert_eq!(MolecularProperties::from(ok).molar_mass, Some(28.0));
        assert!(serde_json::from_str::<PropertiesDef>(r#"{"mass": 28.0}"#).is_err());
    }
}
