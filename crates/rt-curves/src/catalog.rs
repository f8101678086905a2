use crate::error::{CurveError, CurveResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Curve family tag. Each element type draws its curves from exactly one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveFamily {
    /// BE3/IEEE inverse-time overcurrent (`Tt = AD/(M^N - C) + B*pickup + K`)
    Idmt,
    /// IEC 60255 standard inverse-time overcurrent (`t = TMS*k/(x^E - 1)`)
    Iec,
    /// Overfluxing (volts-per-hertz) inverse curves
    VoltsPerHertz,
    /// Inverse-time undervoltage
    Undervoltage,
}

impl fmt::Display for CurveFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idmt => write!(f, "IDMT"),
            Self::Iec => write!(f, "IEC"),
            Self::VoltsPerHertz => write!(f, "volts-per-hertz"),
            Self::Undervoltage => write!(f, "undervoltage"),
        }
    }
}

/// BE3/IEEE curve constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IdmtConstants {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub n: f64,
    pub k: f64,
}

/// IEC curve constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IecConstants {
    pub k: f64,
    pub e: f64,
}

/// Volts-per-hertz curve shape; only the exponent on the V/Hz ratio differs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoltsPerHertzConstants {
    pub exponent: f64,
}

/// Closed-form shape of a curve. The variant doubles as the family tag.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum CurveShape {
    Idmt(IdmtConstants),
    Iec(IecConstants),
    VoltsPerHertz(VoltsPerHertzConstants),
    InverseUndervoltage,
}

impl CurveShape {
    pub fn family(&self) -> CurveFamily {
        match self {
            Self::Idmt(_) => CurveFamily::Idmt,
            Self::Iec(_) => CurveFamily::Iec,
            Self::VoltsPerHertz(_) => CurveFamily::VoltsPerHertz,
            Self::InverseUndervoltage => CurveFamily::Undervoltage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CurveSpec {
    pub id: &'static str,
    pub display_name: &'static str,
    pub aliases: &'static [&'static str],
    pub shape: CurveShape,
}

impl CurveSpec {
    pub fn family(&self) -> CurveFamily {
        self.shape.family()
    }

    /// True when `id` is the canonical id or one of the aliases (case-insensitive).
    pub fn answers_to(&self, id: &str) -> bool {
        let id = id.trim();
        self.id.eq_ignore_ascii_case(id)
            || self.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(id))
    }

    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        if query.is_empty() {
            return true;
        }

        self.id.to_ascii_lowercase().contains(&query)
            || self.display_name.to_ascii_lowercase().contains(&query)
            || self
                .aliases
                .iter()
                .any(|alias| alias.to_ascii_lowercase().contains(&query))
    }
}

#[allow(clippy::too_many_arguments)]
const fn idmt(
    id: &'static str,
    display_name: &'static str,
    aliases: &'static [&'static str],
    a: f64,
    b: f64,
    c: f64,
    n: f64,
    k: f64,
) -> CurveSpec {
    CurveSpec {
        id,
        display_name,
        aliases,
        shape: CurveShape::Idmt(IdmtConstants { a, b, c, n, k }),
    }
}

const fn iec(
    id: &'static str,
    display_name: &'static str,
    aliases: &'static [&'static str],
    k: f64,
    e: f64,
) -> CurveSpec {
    CurveSpec {
        id,
        display_name,
        aliases,
        shape: CurveShape::Iec(IecConstants { k, e }),
    }
}

const fn volts_per_hertz(
    id: &'static str,
    display_name: &'static str,
    aliases: &'static [&'static str],
    exponent: f64,
) -> CurveSpec {
    CurveSpec {
        id,
        display_name,
        aliases,
        shape: CurveShape::VoltsPerHertz(VoltsPerHertzConstants { exponent }),
    }
}

// BE3-GPR time characteristic constants, figures A-1 to A-17.
#[rustfmt::skip]
static CURVE_CATALOG: [CurveSpec; 25] = [
    idmt("A-1", "S1, Short Inverse", &["1", "S1", "short inverse 1"], 0.2663, 0.03393, 1.0, 1.2969, 0.028),
    idmt("A-2", "S2, Short Inverse", &["2", "S2", "short inverse 2"], 0.0286, 0.0280, 1.0, 0.9844, 0.028),
    idmt("A-3", "L1, Long Inverse", &["3", "L1", "long inverse 1"], 5.6143, 2.18592, 1.0, 1.0, 0.028),
    idmt("A-4", "L2, Long Inverse", &["4", "L2", "long inverse 2"], 2.3955, 0.0, 1.0, 0.3125, 0.028),
    idmt("A-5", "D, Definite Time", &["5", "D", "definite time"], 0.4797, 0.21359, 1.0, 1.5625, 0.028),
    idmt("A-6", "M, Moderately Inverse", &["6", "M", "moderately inverse"], 0.3022, 0.12840, 1.0, 0.5, 0.028),
    idmt("A-7", "I1, Inverse Time", &["7", "I1", "inverse time 1"], 8.9341, 0.17966, 1.0, 2.0938, 0.028),
    idmt("A-8", "I2, Inverse Time", &["8", "I2", "inverse time 2"], 0.2747, 0.10426, 1.0, 0.4375, 0.028),
    idmt("A-9", "V1, Very Inverse", &["9", "V1", "very inverse 1"], 5.4678, 0.10814, 1.0, 2.0469, 0.028),
    idmt("A-10", "V2, Very Inverse", &["10", "V2", "very inverse 2"], 4.4309, 0.09910, 1.0, 1.9531, 0.028),
    idmt("A-11", "E1, Extremely Inverse", &["11", "E1", "extremely inverse 1"], 7.7624, 0.02758, 1.0, 2.0938, 0.028),
    idmt("A-12", "E2, Extremely Inverse", &["12", "E2", "extremely inverse 2"], 4.9883, 0.01290, 1.0, 2.0469, 0.028),
    idmt("A-13", "Standard Inverse", &["13", "standard inverse"], 0.01414, 0.0, 1.0, 0.0200, 0.028),
    idmt("A-14", "Very Inverse (It)", &["14", "very inverse"], 1.4636, 0.0, 1.0, 1.0469, 0.028),
    idmt("A-15", "Extremely Inverse (I2t)", &["15", "extremely inverse"], 8.2506, 0.0, 1.0, 2.0469, 0.028),
    idmt("A-16", "Long Time Inverse", &["16", "long time inverse"], 12.1212, 0.0, 1.0, 1.0, 0.028),
    idmt("A-17", "Fixed Time", &["17", "fixed time"], 0.0, 1.0, 0.0, 0.0, 0.028),
    iec("IEC-A", "IEC Curve A (Standard Inverse)", &["A", "standard inverse"], 0.140, 0.020),
    iec("IEC-B", "IEC Curve B (Very Inverse)", &["B", "very inverse"], 13.5, 1.0),
    iec("IEC-C", "IEC Curve C (Extremely Inverse)", &["C", "extremely inverse"], 80.0, 2.0),
    iec("IEC-SI", "IEC Short Inverse", &["S", "short", "short inverse"], 0.05, 0.04),
    volts_per_hertz("VPH-A", "Volts/Hertz Curve A (square)", &["A"], 2.0),
    volts_per_hertz("VPH-B", "Volts/Hertz Curve B (linear)", &["B"], 1.0),
    volts_per_hertz("VPH-C", "Volts/Hertz Curve C (square root)", &["C"], 0.5),
    CurveSpec {
        id: "UV",
        display_name: "Inverse Time Undervoltage",
        aliases: &["inverse", "undervoltage"],
        shape: CurveShape::InverseUndervoltage,
    },
];

pub fn curve_catalog() -> &'static [CurveSpec] {
    &CURVE_CATALOG
}

pub fn curves_in(family: CurveFamily) -> impl Iterator<Item = &'static CurveSpec> {
    curve_catalog()
        .iter()
        .filter(move |curve| curve.family() == family)
}

pub fn filter_curve_catalog(query: &str) -> Vec<CurveSpec> {
    curve_catalog()
        .iter()
        .copied()
        .filter(|curve| curve.matches_query(query))
        .collect()
}

/// Resolve a canonical curve id (case-insensitive).
pub fn lookup(id: &str) -> CurveResult<&'static CurveSpec> {
    let trimmed = id.trim();
    curve_catalog()
        .iter()
        .find(|curve| curve.id.eq_ignore_ascii_case(trimmed))
        .ok_or_else(|| CurveError::UnknownCurve { id: id.to_string() })
}

/// Resolve an identifier inside one family's namespace.
///
/// Aliases are only consulted within `family`, so `"A"` resolves to `IEC-A` for
/// the IEC family and to `VPH-A` for volts-per-hertz.
pub fn lookup_in(family: CurveFamily, id: &str) -> CurveResult<&'static CurveSpec> {
    if let Some(curve) = curves_in(family).find(|curve| curve.answers_to(id)) {
        return Ok(curve);
    }

    match lookup(id) {
        Ok(other) => Err(CurveError::WrongFamily {
            id: other.id.to_string(),
            expected: family,
            found: other.family(),
        }),
        Err(err) => Err(err),
    }
}
