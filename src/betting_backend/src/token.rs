use candid::CandidType;
use serde::{Deserialize, Serialize};

/// The two value tokens the platform settles in. SUI is the primary chain
/// token, SBETS the secondary platform token.
#[derive(CandidType, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Currency {
    SUI,
    SBETS,
}

impl Currency {
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::SUI => "SUI",
            Currency::SBETS => "SBETS",
        }
    }

    pub fn decimals(&self) -> u8 {
        9
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "SUI" => Ok(Currency::SUI),
            "SBETS" => Ok(Currency::SBETS),
            _ => Err(format!("Unknown currency {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse() {
        assert_eq!("sui".parse::<Currency>().unwrap(), Currency::SUI);
        assert_eq!("SBETS".parse::<Currency>().unwrap(), Currency::SBETS);
        assert!("USDC".parse::<Currency>().is_err());
    }
}
