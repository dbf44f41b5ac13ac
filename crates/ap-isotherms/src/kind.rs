//! Isotherm model catalog.

use std::fmt;

use ap_core::{ApError, ApResult};

/// Named parameters of an isotherm model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterSchema {
    /// Parameter names, in row order
    pub names: &'static [&'static str],
    /// Whether rows may hold more than one site
    pub multi_site: bool,
}

/// Supported isotherm equations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsothermKind {
    Langmuir,
    NSiteLangmuir,
    AntiLangmuir,
    Bet,
    Henry,
    Freundlich,
    Sips,
    NSiteSips,
    LangmuirFreundlich,
    NSiteLangmuirFreundlich,
    RedlichPeterson,
    Toth,
    Unilan,
    OBrienMyers,
    Quadratic,
    AsymptoticTemkin,
    BingelWalton,
}

struct CatalogEntry {
    kind: IsothermKind,
    name: &'static str,
    aliases: &'static [&'static str],
    schema: ParameterSchema,
}

const fn single(names: &'static [&'static str]) -> ParameterSchema {
    ParameterSchema {
        names,
        multi_site: false,
    }
}

const fn multi(names: &'static [&'static str]) -> ParameterSchema {
    ParameterSchema {
        names,
        multi_site: true,
    }
}

const CATALOG: [CatalogEntry; 17] = [
    CatalogEntry {
        kind: IsothermKind::Langmuir,
        name: "langmuir",
        aliases: &[],
        schema: single(&["q_sat", "b"]),
    },
    CatalogEntry {
        kind: IsothermKind::NSiteLangmuir,
        name: "n_site_langmuir",
        aliases: &["nsite_langmuir", "multisite_langmuir", "dsl"],
        schema: multi(&["q_sat", "b"]),
    },
    CatalogEntry {
        kind: IsothermKind::AntiLangmuir,
        name: "anti_langmuir",
        aliases: &["antilangmuir"],
        schema: single(&["a", "b"]),
    },
    CatalogEntry {
        kind: IsothermKind::Bet,
        name: "bet",
        aliases: &[],
        schema: single(&["n_m", "c", "n"]),
    },
    CatalogEntry {
        kind: IsothermKind::Henry,
        name: "henry",
        aliases: &[],
        schema: single(&["k"]),
    },
    CatalogEntry {
        kind: IsothermKind::Freundlich,
        name: "freundlich",
        aliases: &[],
        schema: single(&["k", "n"]),
    },
    CatalogEntry {
        kind: IsothermKind::Sips,
        name: "sips",
        aliases: &[],
        schema: single(&["q_sat", "b", "n"]),
    },
    CatalogEntry {
        kind: IsothermKind::NSiteSips,
        name: "n_site_sips",
        aliases: &["nsite_sips"],
        schema: multi(&["q_sat", "b", "n"]),
    },
    CatalogEntry {
        kind: IsothermKind::LangmuirFreundlich,
        name: "langmuir_freundlich",
        aliases: &[],
        schema: single(&["q_sat", "b", "n"]),
    },
    CatalogEntry {
        kind: IsothermKind::NSiteLangmuirFreundlich,
        name: "n_site_langmuir_freundlich",
        aliases: &["nsite_langmuir_freundlich"],
        schema: multi(&["q_sat", "b", "n"]),
    },
    CatalogEntry {
        kind: IsothermKind::RedlichPeterson,
        name: "redlich_peterson",
        aliases: &[],
        schema: single(&["k", "a", "beta"]),
    },
    CatalogEntry {
        kind: IsothermKind::Toth,
        name: "toth",
        aliases: &[],
        schema: single(&["q_sat", "b", "t"]),
    },
    CatalogEntry {
        kind: IsothermKind::Unilan,
        name: "unilan",
        aliases: &[],
        schema: single(&["q_sat", "b", "s"]),
    },
    CatalogEntry {
        kind: IsothermKind::OBrienMyers,
        name: "obrien_myers",
        aliases: &["o_brien_myers"],
        schema: single(&["q_sat", "b", "sigma"]),
    },
    CatalogEntry {
        kind: IsothermKind::Quadratic,
        name: "quadratic",
        aliases: &[],
        schema: single(&["q_sat", "b", "c"]),
    },
    CatalogEntry {
        kind: IsothermKind::AsymptoticTemkin,
        name: "asymptotic_temkin",
        aliases: &["temkin"],
        schema: single(&["q_sat", "b", "tau"]),
    },
    CatalogEntry {
        kind: IsothermKind::BingelWalton,
        name: "bingel_walton",
        aliases: &[],
        schema: single(&["q_sat", "a", "b"]),
    },
];

fn normalize(name: &str) -> String {
    name.trim()
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == '-' || c == ' ' || c == '\'' { '_' } else { c })
        .collect()
}

impl IsothermKind {
    pub fn all() -> impl Iterator<Item = IsothermKind> {
        CATALOG.iter().map(|e| e.kind)
    }

    fn entry(self) -> &'static CatalogEntry {
        // CATALOG holds every variant exactly once, in declaration order
        &CATALOG[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.entry().name
    }

    pub fn schema(self) -> ParameterSchema {
        self.entry().schema
    }

    /// Resolve a model name (case-insensitive, `-`/space treated as `_`).
    pub fn from_name(name: &str) -> ApResult<Self> {
        let key = normalize(name);
        CATALOG
            .iter()
            .find(|e| e.name == key || e.aliases.contains(&key.as_str()))
            .map(|e| e.kind)
            .ok_or_else(|| ApError::UnsupportedModel {
                name: name.to_string(),
                family: "isotherm",
            })
    }
}

impl fmt::Display for IsothermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for IsothermKind {
    type Err = ApError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
