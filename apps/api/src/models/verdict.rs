use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The LLM's categorical recommendation. Stored as upper-case TEXT.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Build,
    Bail,
    Caution,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::Build, Verdict::Bail, Verdict::Caution];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Build => "BUILD",
            Verdict::Bail => "BAIL",
            Verdict::Caution => "CAUTION",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown verdict '{0}'")]
pub struct UnknownVerdict(pub String);

impl FromStr for Verdict {
    type Err = UnknownVerdict;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUILD" => Ok(Verdict::Build),
            "BAIL" => Ok(Verdict::Bail),
            "CAUTION" => Ok(Verdict::Caution),
            _ => Err(UnknownVerdict(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("build".parse::<Verdict>().unwrap(), Verdict::Build);
        assert_eq!(" Bail ".parse::<Verdict>().unwrap(), Verdict::Bail);
        assert_eq!("CAUTION".parse::<Verdict>().unwrap(), Verdict::Caution);
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!("MAYBE".parse::<Verdict>().is_err());
        assert!("".parse::<Verdict>().is_err());
    }

    #[test]
    fn test_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Verdict::Caution).unwrap(), "\"CAUTION\"");
    }
}
