//! Listing of every model a configuration can name.

use ap_adsorbate::{DensityModel, SaturationModel};
use ap_isotherms::IsothermKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFamily {
    Isotherm,
    SaturationPressure,
    Density,
}

impl ModelFamily {
    pub fn name(self) -> &'static str {
        match self {
            Self::Isotherm => "isotherm",
            Self::SaturationPressure => "saturation_pressure",
            Self::Density => "density",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEntry {
    pub family: ModelFamily,
    pub name: &'static str,
    /// Parameter rows for isotherms, optional configuration keys otherwise
    pub parameters: &'static [&'static str],
    pub multi_site: bool,
}

fn saturation_parameters(name: &str) -> &'static [&'static str] {
    match name {
        "constant" => &["value"],
        "amankwah" => &["exponent"],
        "widom_banuti" => &["slope"],
        "peng_robinson" | "prsv1" | "prsv2" => &["supercritical"],
        "tabulated" => &["file"],
        "library" => &["adsorbate"],
        _ => &[],
    }
}

fn density_parameters(name: &str) -> &'static [&'static str] {
    match name {
        "constant" => &["value"],
        "hauer" | "ozawa" => &["expansion"],
        "tabulated" => &["file"],
        _ => &[],
    }
}

pub fn model_catalog() -> Vec<ModelEntry> {
    let isotherms = IsothermKind::all().map(|kind| {
        let schema = kind.schema();
        ModelEntry {
            family: ModelFamily::Isotherm,
            name: kind.name(),
            parameters: schema.names,
            multi_site: schema.multi_site,
        }
    });
    let saturation = SaturationModel::NAMES.into_iter().map(|name| ModelEntry {
        family: ModelFamily::SaturationPressure,
        name,
        parameters: saturation_parameters(name),
        multi_site: false,
    });
    let density = DensityModel::NAMES.into_iter().map(|name| ModelEntry {
        family: ModelFamily::Density,
        name,
        parameters: density_parameters(name),
        multi_site: false,
    });
    isotherms.chain(saturation).chain(density).collect()
}
