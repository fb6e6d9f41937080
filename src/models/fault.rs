// Fault injection wire types

use serde::{Deserialize, Serialize};

/// Simulated failure condition requested against one service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FaultMode {
    #[default]
    None,
    HighCpu,
    HighErrorRate,
    Down,
}

impl FaultMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultMode::None => "NONE",
            FaultMode::HighCpu => "HIGH_CPU",
            FaultMode::HighErrorRate => "HIGH_ERROR_RATE",
            FaultMode::Down => "DOWN",
        }
    }
}

impl std::fmt::Display for FaultMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FaultMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NONE" => Ok(FaultMode::None),
            "HIGH_CPU" => Ok(FaultMode::HighCpu),
            "HIGH_ERROR_RATE" => Ok(FaultMode::HighErrorRate),
            "DOWN" => Ok(FaultMode::Down),
            other => Err(format!("unknown fault mode: {other}")),
        }
    }
}

/// Body of `POST /services/{service_name}/fault`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SetFaultRequest {
    pub mode: FaultMode,
}

/// Response body confirming which mode is now in effect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaultAck {
    pub service_name: String,
    pub mode: FaultMode,
}
