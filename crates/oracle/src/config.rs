use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// How doubly-controlled NOTs are realized inside the decoder and the readout.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// One Toffoli gate per doubly-controlled NOT.
    #[default]
    Standard,
    /// Hadamard-conjugated CCZ built from CNOT, T and T† only.
    TDepth,
}

/// Construction-time options for an oracle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OracleConfig {
    pub strategy: Strategy,
}

impl OracleConfig {
    pub const fn with_strategy(strategy: Strategy) -> Self {
        Self { strategy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_names() {
        assert_eq!(Strategy::TDepth.to_string(), "t-depth");
        assert_eq!("standard".parse::<Strategy>().unwrap(), Strategy::Standard);
        assert_eq!("t-depth".parse::<Strategy>().unwrap(), Strategy::TDepth);

        let config: OracleConfig = serde_json::from_str(r#"{"strategy": "t-depth"}"#).unwrap();
        assert_eq!(config, OracleConfig::with_strategy(Strategy::TDepth));
        let config: OracleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, OracleConfig::default());
    }
}
