//! Postal code to Paris arrondissement derivation.
//!
//! Paris postal codes are `75` followed by three digits whose last two name
//! the arrondissement (`75001` is the 1st, `75116` the 16th). The mapping is
//! deliberately loose: anything starting with `75` whose final two characters
//! are decimal digits yields a number, even one no arrondissement carries.

use serde::{Deserialize, Serialize};

/// Department code shared by every Paris postal code.
pub const PARIS_DEPARTMENT_PREFIX: &str = "75";

/// Paris has twenty arrondissements, numbered from 1.
pub const ARRONDISSEMENT_COUNT: u8 = 20;

/// Derives the district number from a postal code.
///
/// Returns `None` when the code is absent, lies outside the `75` department,
/// or does not end in two decimal digits. No upper bound is applied, so
/// `"75099"` yields `99`. A sign in the last two characters, as in
/// `"750+1"`, is not a digit and yields `None`.
pub fn resolve_district(postal_code: Option<&str>) -> Option<u8> {
    let code = postal_code?;
    if !code.starts_with(PARIS_DEPARTMENT_PREFIX) {
        return None;
    }

    let (start, _) = code.char_indices().rev().nth(1)?;
    let tail = &code[start..];
    if !tail.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    tail.parse().ok()
}

pub fn is_known_arrondissement(district: u8) -> bool {
    (1..=ARRONDISSEMENT_COUNT).contains(&district)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangePolicy {
    /// Accept any two-digit suffix.
    #[default]
    Lenient,
    /// Only accept 1 through 20.
    Strict,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DistrictResolver {
    policy: RangePolicy,
}

impl DistrictResolver {
    pub fn new(policy: RangePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    pub fn resolve(&self, postal_code: Option<&str>) -> Option<u8> {
        let district = resolve_district(postal_code)?;
        match self.policy {
            RangePolicy::Lenient => {
                if !is_known_arrondissement(district) {
                    tracing::warn!(
                        "Postal code {:?} maps to district {}, which is not a Paris arrondissement",
                        postal_code,
                        district
                    );
                }
                Some(district)
            }
            RangePolicy::Strict => is_known_arrondissement(district).then_some(district),
        }
    }
}
