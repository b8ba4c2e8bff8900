use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthStage {
    Seedling,
    Juvenile,
    Mature,
    FullGrown,
}

impl GrowthStage {
    pub fn for_days(days: i64) -> Self {
        match days {
            d if d <= 30 => GrowthStage::Seedling,
            d if d <= 180 => GrowthStage::Juvenile,
            d if d <= 365 => GrowthStage::Mature,
            _ => GrowthStage::FullGrown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GrowthStage::Seedling => "seedling",
            GrowthStage::Juvenile => "juvenile",
            GrowthStage::Mature => "mature",
            GrowthStage::FullGrown => "full-grown",
        }
    }
}

impl Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
