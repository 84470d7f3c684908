//! Gas compositions as normalized mole fractions.

use std::collections::BTreeMap;

use crate::error::{FluidError, FluidResult};
use crate::species::Species;
use ct_core::numeric::ensure_non_negative;

/// Species below this mole fraction are dropped after normalization.
const TRACE_MOLE_FRACTION: f64 = 1e-15;

/// Relative slack for calling a composition pure.
const PURE_TOL: f64 = 1e-10;

/// Mole fractions live in [0, 1], so one relative bound floored at 1 covers
/// both the near-zero and the near-one case.
fn fractions_agree(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() <= tol * a.abs().max(b.abs()).max(1.0)
}

/// Mole fractions of a gas, one entry per species, summing to 1.
///
/// Entries are kept sorted by species so equal compositions compare equal
/// regardless of input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    items: Vec<(Species, f64)>,
}

impl Composition {
    pub fn pure(species: Species) -> Self {
        Self {
            items: vec![(species, 1.0)],
        }
    }

    /// Normalize `(species, amount)` pairs into mole fractions.
    ///
    /// Amounts may be in any molar unit; repeated species add up. Fails on an
    /// empty list, a negative or non-finite amount, or a zero total.
    pub fn new_mole_fractions(fractions: Vec<(Species, f64)>) -> FluidResult<Self> {
        if fractions.is_empty() {
            return Err(FluidError::InvalidArg {
                what: "empty composition",
            });
        }

        let mut amounts: BTreeMap<Species, f64> = BTreeMap::new();
        for (species, amount) in fractions {
            let amount = ensure_non_negative(amount, "mole fraction")?;
            *amounts.entry(species).or_default() += amount;
        }
        let total: f64 = amounts.values().sum();
        if !(total.is_finite() && total > 0.0) {
            return Err(FluidError::NonPhysical {
                what: "mole fractions must have a positive finite sum",
            });
        }

        let items: Vec<(Species, f64)> = amounts
            .into_iter()
            .map(|(species, amount)| (species, amount / total))
            .filter(|&(_, x)| x > TRACE_MOLE_FRACTION)
            .collect();
        if items.is_empty() {
            return Err(FluidError::NonPhysical {
                what: "only trace species left",
            });
        }
        Ok(Self { items })
    }

    /// Mix compositions weighted by their molar amounts.
    pub fn blend(parts: &[(&Composition, f64)]) -> FluidResult<Self> {
        let mut amounts = Vec::new();
        for &(composition, moles) in parts {
            let moles = ensure_non_negative(moles, "molar amount in blend")?;
            amounts.extend(composition.iter().map(|(species, x)| (species, x * moles)));
        }
        Self::new_mole_fractions(amounts)
    }

    /// Zero for absent species.
    pub fn mole_fraction(&self, species: Species) -> f64 {
        self.items
            .binary_search_by_key(&species, |&(s, _)| s)
            .map_or(0.0, |i| self.items[i].1)
    }

    /// The single species of a pure composition.
    pub fn is_pure(&self) -> Option<Species> {
        match self.items.as_slice() {
            [(species, x)] if fractions_agree(*x, 1.0, PURE_TOL) => Some(*species),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Species, f64)> + '_ {
        self.items.iter().copied()
    }

    /// Σ xᵢ·Mᵢ [kg/kmol]
    pub fn molar_mass(&self) -> f64 {
        self.iter().map(|(species, x)| x * species.molar_mass()).sum()
    }

    pub fn mass_fraction(&self, species: Species) -> f64 {
        self.mole_fraction(species) * species.molar_mass() / self.molar_mass()
    }

    /// Renormalized composition without `species`, e.g. the dry gas after a
    /// scrubber.
    pub fn without(&self, species: Species) -> FluidResult<Self> {
        let rest: Vec<(Species, f64)> = self.iter().filter(|&(s, _)| s != species).collect();
        if rest.is_empty() {
            return Err(FluidError::NonPhysical {
                what: "composition empty after removing species",
            });
        }
        Self::new_mole_fractions(rest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-10;

    #[test]
    fn pure_composition() {
        let comp = Composition::pure(Species::CH4);
        assert_eq!(comp.is_pure(), Some(Species::CH4));
        assert_eq!(comp.mole_fraction(Species::CH4), 1.0);
        assert_eq!(comp.mole_fraction(Species::N2), 0.0);
    }

    #[test]
    fn normalization_non_unit_sum() {
        let comp =
            Composition::new_mole_fractions(vec![(Species::CH4, 8.0), (Species::Ethane, 2.0)])
                .unwrap();
        assert!(fractions_agree(comp.mole_fraction(Species::CH4), 0.8, TOL));
        assert!(fractions_agree(comp.mole_fraction(Species::Ethane), 0.2, TOL));
    }

    #[test]
    fn repeated_species_are_merged() {
        let comp = Composition::new_mole_fractions(vec![
            (Species::CH4, 1.0),
            (Species::N2, 1.0),
            (Species::CH4, 2.0),
        ])
        .unwrap();
        assert_eq!(comp.iter().count(), 2);
        assert!(fractions_agree(comp.mole_fraction(Species::CH4), 0.75, TOL));
    }

    #[test]
    fn invalid_inputs() {
        assert!(Composition::new_mole_fractions(vec![]).is_err());
        assert!(
            Composition::new_mole_fractions(vec![(Species::CH4, -0.5), (Species::N2, 1.5)])
                .is_err()
        );
        assert!(
            Composition::new_mole_fractions(vec![(Species::CH4, 0.0), (Species::N2, 0.0)])
                .is_err()
        );
        assert!(Composition::new_mole_fractions(vec![(Species::CH4, f64::NAN)]).is_err());
    }

    #[test]
    fn blend_is_molar_weighted() {
        let methane = Composition::pure(Species::CH4);
        let nitrogen = Composition::pure(Species::N2);
        let mix = Composition::blend(&[(&methane, 3.0), (&nitrogen, 1.0)]).unwrap();
        assert!(fractions_agree(mix.mole_fraction(Species::CH4), 0.75, TOL));
        assert!(fractions_agree(mix.mole_fraction(Species::N2), 0.25, TOL));
    }

    #[test]
    fn without_water_renormalizes() {
        let wet =
            Composition::new_mole_fractions(vec![(Species::CH4, 0.9), (Species::H2O, 0.1)])
                .unwrap();
        let dry = wet.without(Species::H2O).unwrap();
        assert_eq!(dry.is_pure(), Some(Species::CH4));
        assert!(Composition::pure(Species::H2O).without(Species::H2O).is_err());
    }

    #[test]
    fn mass_fractions_sum_to_one() {
        let comp = Composition::new_mole_fractions(vec![
            (Species::CH4, 0.85),
            (Species::Ethane, 0.1),
            (Species::CO2, 0.05),
        ])
        .unwrap();
        let sum: f64 = comp.iter().map(|(s, _)| comp.mass_fraction(s)).sum();
        assert!(fractions_agree(sum, 1.0, TOL));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn normalized_sum_is_one(fracs in prop::collection::vec(0.0_f64..1.0_f64, 1..6)) {
            let species = [Species::CH4, Species::Ethane, Species::N2, Species::CO2, Species::H2O];
            let composition_input: Vec<(Species, f64)> = fracs
                .iter()
                .enumerate()
                .map(|(i, &f)| (species[i % species.len()], f))
                .collect();

            if let Ok(comp) = Composition::new_mole_fractions(composition_input) {
                let sum: f64 = comp.iter().map(|(_, f)| f).sum();
                prop_assert!(fractions_agree(sum, 1.0, 1e-9));
            }
        }
    }
}
