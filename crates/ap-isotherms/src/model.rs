//! Parameterized isotherm models and synthetic dataset generation.

use ap_core::{ApError, ApResult, Sweep};

use crate::kind::IsothermKind;

/// An isotherm equation with validated parameters.
///
/// `parameters[i][j]` is parameter `i` (schema order) of site `j`.
/// Pressure is in MPa, loading in the unit the parameters were fitted in.
#[derive(Debug, Clone, PartialEq)]
pub struct IsothermModel {
    kind: IsothermKind,
    parameters: Vec<Vec<f64>>,
}

impl IsothermModel {
    pub fn new(kind: IsothermKind, parameters: Vec<Vec<f64>>) -> ApResult<Self> {
        let schema = kind.schema();
        if parameters.len() != schema.names.len() {
            return Err(ApError::InvalidParameterCount {
                model: kind.name(),
                expected: format!("{} rows ({})", schema.names.len(), schema.names.join(", ")),
                got: format!("{} rows", parameters.len()),
            });
        }

        let sites = parameters[0].len();
        if sites == 0 || parameters.iter().any(|row| row.len() != sites) {
            let lengths: Vec<String> = parameters.iter().map(|r| r.len().to_string()).collect();
            return Err(ApError::InvalidParameterCount {
                model: kind.name(),
                expected: "equal-length, non-empty parameter rows".to_string(),
                got: format!("row lengths [{}]", lengths.join(", ")),
            });
        }
        if !schema.multi_site && sites != 1 {
            return Err(ApError::InvalidParameterCount {
                model: kind.name(),
                expected: "1 value per parameter".to_string(),
                got: format!("{sites} values per parameter"),
            });
        }

        for (name, row) in schema.names.iter().zip(&parameters) {
            if let Some(bad) = row.iter().find(|v| !v.is_finite()) {
                return Err(ApError::domain(format!(
                    "{} parameter {name} is not finite ({bad})",
                    kind.name()
                )));
            }
        }

        Ok(Self { kind, parameters })
    }

    /// Single-site convenience constructor taking one value per parameter.
    pub fn single(kind: IsothermKind, values: &[f64]) -> ApResult<Self> {
        Self::new(kind, values.iter().map(|v| vec![*v]).collect())
    }

    pub fn kind(&self) -> IsothermKind {
        self.kind
    }

    pub fn parameters(&self) -> &[Vec<f64>] {
        &self.parameters
    }

    pub fn sites(&self) -> usize {
        self.parameters[0].len()
    }

    fn site(&self, j: usize) -> impl Iterator<Item = f64> + '_ {
        self.parameters.iter().map(move |row| row[j])
    }

    /// Loading at pressure `p` [MPa].
    pub fn loading(&self, p: f64) -> ApResult<f64> {
        if !p.is_finite() || p < 0.0 {
            return Err(ApError::domain(format!(
                "{} evaluated at invalid pressure {p}",
                self.kind
            )));
        }

        let mut total = 0.0;
        for j in 0..self.sites() {
            let params: Vec<f64> = self.site(j).collect();
            total += site_loading(self.kind, &params, p)?;
        }

        if !total.is_finite() {
            return Err(ApError::domain(format!(
                "{} produced non-finite loading at p = {p}",
                self.kind
            )));
        }
        Ok(total)
    }

    /// Sample the model at `count` evenly spaced pressures in `[p_min, p_max]`.
    pub fn synthesize(&self, p_min: f64, p_max: f64, count: usize) -> ApResult<Vec<(f64, f64)>> {
        if p_min < 0.0 {
            return Err(ApError::invalid_range(format!(
                "isotherm pressure range must be non-negative, got p_min = {p_min}"
            )));
        }
        let sweep = Sweep::linear(p_min, p_max, count)?;
        sweep
            .generate_points()
            .into_iter()
            .map(|p| self.loading(p).map(|q| (p, q)))
            .collect()
    }
}

/// Validate parameters for `kind` and sample it over `[p_min, p_max]`.
pub fn synthesize(
    kind: IsothermKind,
    parameters: Vec<Vec<f64>>,
    p_min: f64,
    p_max: f64,
    count: usize,
) -> ApResult<Vec<(f64, f64)>> {
    IsothermModel::new(kind, parameters)?.synthesize(p_min, p_max, count)
}

fn site_loading(kind: IsothermKind, params: &[f64], p: f64) -> ApResult<f64> {
    use IsothermKind::*;

    let q = match kind {
        Langmuir | NSiteLangmuir => {
            let (q_sat, b) = (params[0], params[1]);
            q_sat * b * p / (1.0 + b * p)
        }
        AntiLangmuir => {
            let (a, b) = (params[0], params[1]);
            let denom = 1.0 - b * p;
            if denom <= 0.0 {
                return Err(ApError::domain(format!(
                    "anti_langmuir requires b*p < 1 (b*p = {})",
                    b * p
                )));
            }
            a * p / denom
        }
        Bet => {
            let (n_m, c, n) = (params[0], params[1], params[2]);
            let denom = (1.0 - n * p) * (1.0 - n * p + c * p);
            if denom <= 0.0 {
                return Err(ApError::domain(format!(
                    "bet denominator is non-positive at p = {p}"
                )));
            }
            n_m * c * p / denom
        }
        Henry => params[0] * p,
        Freundlich => {
            let (k, n) = (params[0], params[1]);
            if n == 0.0 {
                return Err(ApError::domain("freundlich exponent n must be non-zero"));
            }
            k * p.powf(1.0 / n)
        }
        Sips | NSiteSips => {
            let (q_sat, b, n) = (params[0], params[1], params[2]);
            let x = (b * p).powf(n);
            q_sat * x / (1.0 + x)
        }
        LangmuirFreundlich | NSiteLangmuirFreundlich => {
            let (q_sat, b, n) = (params[0], params[1], params[2]);
            let x = b * p.powf(n);
            q_sat * x / (1.0 + x)
        }
        RedlichPeterson => {
            let (k, a, beta) = (params[0], params[1], params[2]);
            k * p / (1.0 + a * p.powf(beta))
        }
        Toth => {
            let (q_sat, b, t) = (params[0], params[1], params[2]);
            if t == 0.0 {
                return Err(ApError::domain("toth heterogeneity t must be non-zero"));
            }
            q_sat * b * p / (1.0 + (b * p).powf(t)).powf(1.0 / t)
        }
        Unilan => {
            let (q_sat, b, s) = (params[0], params[1], params[2]);
            if s.abs() < 1e-12 {
                // s -> 0 recovers Langmuir
                q_sat * b * p / (1.0 + b * p)
            } else {
                let num = 1.0 + b * s.exp() * p;
                let den = 1.0 + b * (-s).exp() * p;
                q_sat / (2.0 * s) * (num / den).ln()
            }
        }
        OBrienMyers => {
            let (q_sat, b, sigma) = (params[0], params[1], params[2]);
            let bp = b * p;
            let one = 1.0 + bp;
            q_sat * (bp / one + sigma * sigma * bp * (1.0 - bp) / (2.0 * one.powi(3)))
        }
        Quadratic => {
            let (q_sat, b, c) = (params[0], params[1], params[2]);
            q_sat * (b * p + 2.0 * c * p * p) / (1.0 + b * p + c * p * p)
        }
        AsymptoticTemkin => {
            let (q_sat, b, tau) = (params[0], params[1], params[2]);
            let theta = b * p / (1.0 + b * p);
            q_sat * (theta + tau * theta * theta * (theta - 1.0))
        }
        BingelWalton => {
            let (q_sat, a, b) = (params[0], params[1], params[2]);
            if a == 0.0 {
                return Err(ApError::domain("bingel_walton parameter a must be non-zero"));
            }
            let e = (-(a + b) * p).exp();
            q_sat * (1.0 - e) / (1.0 + (b / a) * e)
        }
    };
    Ok(q)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-10 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn langmuir_matches_closed_form() {
        let m = IsothermModel::single(IsothermKind::Langmuir, &[5.0, 0.1]).unwrap();
        assert!(close(m.loading(10.0).unwrap(), 2.5));
        assert_eq!(m.loading(0.0).unwrap(), 0.0);
    }

    #[test]
    fn n_site_sums_sites() {
        let dual = IsothermModel::new(
            IsothermKind::NSiteLangmuir,
            vec![vec![3.0, 2.0], vec![0.5, 0.05]],
        )
        .unwrap();
        let a = IsothermModel::single(IsothermKind::Langmuir, &[3.0, 0.5]).unwrap();
        let b = IsothermModel::single(IsothermKind::Langmuir, &[2.0, 0.05]).unwrap();
        let p = 1.7;
        assert!(close(
            dual.loading(p).unwrap(),
            a.loading(p).unwrap() + b.loading(p).unwrap()
        ));
        assert_eq!(dual.sites(), 2);
    }

    #[test]
    fn mismatched_rows_are_rejected() {
        let err = IsothermModel::new(
            IsothermKind::NSiteSips,
            vec![vec![1.0, 2.0], vec![0.1], vec![1.0, 1.0]],
        )
        .unwrap_err();
        assert!(matches!(err, ApError::InvalidParameterCount { .. }));

        let err = IsothermModel::single(IsothermKind::Toth, &[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, ApError::InvalidParameterCount { .. }));

        let err =
            IsothermModel::new(IsothermKind::Langmuir, vec![vec![1.0, 2.0], vec![0.1, 0.2]])
                .unwrap_err();
        assert!(matches!(err, ApError::InvalidParameterCount { .. }));
    }

    #[test]
    fn synthesize_rejects_bad_ranges() {
        let params = vec![vec![5.0], vec![0.1]];
        assert!(matches!(
            synthesize(IsothermKind::Langmuir, params.clone(), 10.0, 1.0, 50),
            Err(ApError::InvalidRange { .. })
        ));
        assert!(matches!(
            synthesize(IsothermKind::Langmuir, params.clone(), 1.0, 1.0, 50),
            Err(ApError::InvalidRange { .. })
        ));
        assert!(matches!(
            synthesize(IsothermKind::Langmuir, params, 0.0, 1.0, 1),
            Err(ApError::InvalidRange { .. })
        ));
    }

    #[test]
    fn synthesize_is_evenly_spaced() {
        let points = synthesize(IsothermKind::Henry, vec![vec![2.0]], 0.0, 4.0, 5).unwrap();
        let expected = [(0.0, 0.0), (1.0, 2.0), (2.0, 4.0), (3.0, 6.0), (4.0, 8.0)];
        assert_eq!(points.len(), expected.len());
        for ((p, q), (ep, eq)) in points.iter().zip(expected) {
            assert!(close(*p, ep) && close(*q, eq));
        }
    }

    #[test]
    fn anti_langmuir_domain() {
        let m = IsothermModel::single(IsothermKind::AntiLangmuir, &[1.0, 0.5]).unwrap();
        assert!(close(m.loading(1.0).unwrap(), 2.0));
        assert!(matches!(m.loading(2.0), Err(ApError::DomainError { .. })));
    }

    #[test]
    fn unilan_small_spread_reduces_to_langmuir() {
        let unilan = IsothermModel::single(IsothermKind::Unilan, &[4.0, 0.3, 1e-6]).unwrap();
        let langmuir = IsothermModel::single(IsothermKind::Langmuir, &[4.0, 0.3]).unwrap();
        let p = 2.5;
        let diff = (unilan.loading(p).unwrap() - langmuir.loading(p).unwrap()).abs();
        assert!(diff < 1e-8);
    }

    #[test]
    fn toth_with_unit_exponent_is_langmuir() {
        let toth = IsothermModel::single(IsothermKind::Toth, &[4.0, 0.3, 1.0]).unwrap();
        let langmuir = IsothermModel::single(IsothermKind::Langmuir, &[4.0, 0.3]).unwrap();
        assert!(close(toth.loading(3.0).unwrap(), langmuir.loading(3.0).unwrap()));
    }

    #[test]
    fn bet_and_quadratic_values() {
        let bet = IsothermModel::single(IsothermKind::Bet, &[2.0, 10.0, 0.5]).unwrap();
        // 2*10*0.5 / ((1-0.25)(1-0.25+5)) = 10 / (0.75*5.75)
        assert!(close(bet.loading(0.5).unwrap(), 10.0 / (0.75 * 5.75)));

        let quad = IsothermModel::single(IsothermKind::Quadratic, &[1.0, 1.0, 1.0]).unwrap();
        // (1 + 2) / (1 + 1 + 1)
        assert!(close(quad.loading(1.0).unwrap(), 1.0));
    }

    #[test]
    fn negative_pressure_is_a_domain_error() {
        let m = IsothermModel::single(IsothermKind::Henry, &[1.0]).unwrap();
        assert!(matches!(m.loading(-1.0), Err(ApError::DomainError { .. })));
    }
}
