use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PackagePeriod {
    Monthly,
    Quarterly,
    Yearly,
}

impl PackagePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackagePeriod::Monthly => "monthly",
            PackagePeriod::Quarterly => "quarterly",
            PackagePeriod::Yearly => "yearly",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "monthly" => Some(PackagePeriod::Monthly),
            "quarterly" => Some(PackagePeriod::Quarterly),
            "yearly" => Some(PackagePeriod::Yearly),
            _ => None,
        }
    }
}

impl Display for PackagePeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
