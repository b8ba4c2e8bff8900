use std::fmt::Display;

/// One way of finding a package or location from the free-text value stored on a payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceLookup {
    ById(i32),
    ByName(String),
}

impl ReferenceLookup {
    /// Lookups to attempt for a raw reference, in order: the text itself first,
    /// then its integer reading when it has one. Blank input yields nothing.
    pub fn candidates(raw: &str) -> Vec<ReferenceLookup> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let mut lookups = vec![ReferenceLookup::ByName(trimmed.to_string())];
        if let Ok(id) = trimmed.parse::<i32>() {
            lookups.push(ReferenceLookup::ById(id));
        }
        lookups
    }
}

impl Display for ReferenceLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReferenceLookup::ById(id) => write!(f, "id:{}", id),
            ReferenceLookup::ByName(name) => write!(f, "name:{}", name),
        }
    }
}
