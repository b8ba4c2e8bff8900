use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::growth_stages::GrowthStage;

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PlantStatus {
    #[default]
    Growing,
    Mature,
}

impl PlantStatus {
    pub fn from_stage(stage: GrowthStage) -> Self {
        match stage {
            GrowthStage::Seedling | GrowthStage::Juvenile => PlantStatus::Growing,
            GrowthStage::Mature | GrowthStage::FullGrown => PlantStatus::Mature,
        }
    }
}

impl Display for PlantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            PlantStatus::Growing => "growing",
            PlantStatus::Mature => "mature",
        };
        write!(f, "{}", status)
    }
}
