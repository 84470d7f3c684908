//! Equation-of-state selection and the fluid model it travels with.

use crate::composition::Composition;

/// Equation of state a property backend should use for a fluid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EosModel {
    #[default]
    Srk,
    Pr,
    GergSrk,
    GergPr,
}

impl EosModel {
    pub fn key(&self) -> &'static str {
        match self {
            EosModel::Srk => "SRK",
            EosModel::Pr => "PR",
            EosModel::GergSrk => "GERG_SRK",
            EosModel::GergPr => "GERG_PR",
        }
    }
}

impl std::str::FromStr for EosModel {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SRK" => Ok(EosModel::Srk),
            "PR" => Ok(EosModel::Pr),
            "GERG_SRK" => Ok(EosModel::GergSrk),
            "GERG_PR" => Ok(EosModel::GergPr),
            _ => Err("unknown equation of state"),
        }
    }
}

/// Composition plus equation of state: everything a backend needs besides P and T.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidModel {
    pub composition: Composition,
    pub eos: EosModel,
}

impl FluidModel {
    pub fn new(composition: Composition, eos: EosModel) -> Self {
        Self { composition, eos }
    }

    /// Molar mass [kg/mol].
    pub fn molar_mass_kg_per_mol(&self) -> f64 {
        self.composition.molar_mass() / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::Species;

    #[test]
    fn eos_key_round_trip() {
        for eos in [EosModel::Srk, EosModel::Pr, EosModel::GergSrk, EosModel::GergPr] {
            assert_eq!(eos.key().parse::<EosModel>().unwrap(), eos);
        }
        assert!("vdW".parse::<EosModel>().is_err());
    }

    #[test]
    fn molar_mass_in_si() {
        let gas = FluidModel::new(Composition::pure(Species::CH4), EosModel::default());
        assert!((gas.molar_mass_kg_per_mol() - 0.016043).abs() < 1e-9);
    }
}
