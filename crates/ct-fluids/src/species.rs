//! Chemical species found in natural gas and process streams.

/// Natural-gas components supported by the property backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Species {
    /// Methane (CH₄)
    CH4,
    /// Ethane (C₂H₆)
    Ethane,
    /// Propane (C₃H₈)
    Propane,
    /// Isobutane
    Isobutane,
    /// n-Butane
    NButane,
    /// Isopentane
    Isopentane,
    /// n-Pentane
    NPentane,
    /// n-Hexane
    NHexane,
    /// Nitrogen (N₂)
    N2,
    /// Carbon dioxide (CO₂)
    CO2,
    /// Water (H₂O)
    H2O,
    /// Oxygen (O₂)
    O2,
    /// Argon (Ar)
    Ar,
    /// Hydrogen (H₂)
    H2,
    /// Helium (He)
    He,
    /// Carbon monoxide (CO)
    CO,
}

impl Species {
    pub const ALL: [Species; 16] = [
        Species::CH4,
        Species::Ethane,
        Species::Propane,
        Species::Isobutane,
        Species::NButane,
        Species::Isopentane,
        Species::NPentane,
        Species::NHexane,
        Species::N2,
        Species::CO2,
        Species::H2O,
        Species::O2,
        Species::Ar,
        Species::H2,
        Species::He,
        Species::CO,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Species::CH4 => "methane",
            Species::Ethane => "ethane",
            Species::Propane => "propane",
            Species::Isobutane => "i_butane",
            Species::NButane => "n_butane",
            Species::Isopentane => "i_pentane",
            Species::NPentane => "n_pentane",
            Species::NHexane => "n_hexane",
            Species::N2 => "nitrogen",
            Species::CO2 => "CO2",
            Species::H2O => "water",
            Species::O2 => "oxygen",
            Species::Ar => "argon",
            Species::H2 => "hydrogen",
            Species::He => "helium",
            Species::CO => "CO",
        }
    }

    /// Map to rfluids Pure enum (CoolProp backend).
    pub(crate) fn rfluids_pure(&self) -> rfluids::substance::Pure {
        use rfluids::substance::Pure;
        match self {
            Species::CH4 => Pure::Methane,
            Species::Ethane => Pure::Ethane,
            Species::Propane => Pure::nPropane,
            Species::Isobutane => Pure::Isobutane,
            Species::NButane => Pure::nButane,
            Species::Isopentane => Pure::Isopentane,
            Species::NPentane => Pure::nPentane,
            Species::NHexane => Pure::nHexane,
            Species::N2 => Pure::Nitrogen,
            Species::CO2 => Pure::CarbonDioxide,
            Species::H2O => Pure::Water,
            Species::O2 => Pure::Oxygen,
            Species::Ar => Pure::Argon,
            Species::H2 => Pure::Hydrogen,
            Species::He => Pure::Helium,
            Species::CO => Pure::CarbonMonoxide,
        }
    }

    /// Molar mass [kg/kmol].
    pub fn molar_mass(&self) -> f64 {
        match self {
            Species::CH4 => 16.043,
            Species::Ethane => 30.070,
            Species::Propane => 44.097,
            Species::Isobutane => 58.124,
            Species::NButane => 58.124,
            Species::Isopentane => 72.151,
            Species::NPentane => 72.151,
            Species::NHexane => 86.178,
            Species::N2 => 28.014,
            Species::CO2 => 44.010,
            Species::H2O => 18.015,
            Species::O2 => 31.999,
            Species::Ar => 39.948,
            Species::H2 => 2.016,
            Species::He => 4.003,
            Species::CO => 28.010,
        }
    }

    /// Ideal-gas molar heat capacity cp° near 300 K [J/(mol·K)].
    pub fn ideal_gas_cp_molar(&self) -> f64 {
        match self {
            Species::CH4 => 35.69,
            Species::Ethane => 52.49,
            Species::Propane => 73.60,
            Species::Isobutane => 96.65,
            Species::NButane => 98.49,
            Species::Isopentane => 118.8,
            Species::NPentane => 120.1,
            Species::NHexane => 142.6,
            Species::N2 => 29.12,
            Species::CO2 => 37.12,
            Species::H2O => 33.58,
            Species::O2 => 29.38,
            Species::Ar => 20.79,
            Species::H2 => 28.84,
            Species::He => 20.79,
            Species::CO => 29.14,
        }
    }
}

impl std::str::FromStr for Species {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "CH4" | "METHANE" | "C1" => Ok(Species::CH4),
            "C2H6" | "ETHANE" | "C2" => Ok(Species::Ethane),
            "C3H8" | "PROPANE" | "C3" => Ok(Species::Propane),
            "I_BUTANE" | "ISOBUTANE" | "IC4" => Ok(Species::Isobutane),
            "N_BUTANE" | "NBUTANE" | "BUTANE" | "NC4" => Ok(Species::NButane),
            "I_PENTANE" | "ISOPENTANE" | "IC5" => Ok(Species::Isopentane),
            "N_PENTANE" | "NPENTANE" | "PENTANE" | "NC5" => Ok(Species::NPentane),
            "N_HEXANE" | "NHEXANE" | "HEXANE" | "NC6" => Ok(Species::NHexane),
            "N2" | "NITROGEN" => Ok(Species::N2),
            "CO2" | "CARBON DIOXIDE" | "CARBONDIOXIDE" => Ok(Species::CO2),
            "H2O" | "WATER" => Ok(Species::H2O),
            "O2" | "OXYGEN" => Ok(Species::O2),
            "AR" | "ARGON" => Ok(Species::Ar),
            "H2" | "HYDROGEN" => Ok(Species::H2),
            "HE" | "HELIUM" => Ok(Species::He),
            "CO" | "CARBON MONOXIDE" | "CARBONMONOXIDE" => Ok(Species::CO),
            _ => Err("unknown species"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trip() {
        for species in Species::ALL {
            assert_eq!(species.key().parse::<Species>().unwrap(), species);
        }
    }

    #[test]
    fn parse_aliases() {
        assert_eq!("C1".parse::<Species>().unwrap(), Species::CH4);
        assert_eq!("n-butane".parse::<Species>().unwrap(), Species::NButane);
        assert!("RP1".parse::<Species>().is_err());
    }

    #[test]
    fn heat_capacity_above_monatomic_limit() {
        // cp° >= 5/2 R for every ideal gas
        for species in Species::ALL {
            assert!(species.ideal_gas_cp_molar() >= 20.78, "{species:?}");
        }
    }
}
