//! Charity registry.
//!
//! Charities are static reference data loaded from configuration once at
//! startup. The donation flow only ever reads them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Immutable id → charity mapping.
#[derive(Clone, Debug, Default)]
pub struct CharityRegistry {
    by_id: HashMap<String, Charity>,
}

impl CharityRegistry {
    /// Builds the registry, rejecting blank and duplicate ids.
    pub fn new(charities: impl IntoIterator<Item = Charity>) -> ResultEngine<Self> {
        let mut by_id = HashMap::new();
        for mut charity in charities {
            charity.id = charity.id.trim().to_string();
            if charity.id.is_empty() {
                return Err(EngineError::InvalidId(
                    "charity id must not be empty".to_string(),
                ));
            }
            if by_id.contains_key(&charity.id) {
                return Err(EngineError::ExistingKey(charity.id));
            }
            by_id.insert(charity.id.clone(), charity);
        }
        Ok(Self { by_id })
    }

    pub fn get(&self, id: &str) -> Option<&Charity> {
        self.by_id.get(id)
    }

    /// Returns the charity or `KeyNotFound("Charity")`.
    pub fn require(&self, id: &str) -> ResultEngine<&Charity> {
        self.get(id)
            .ok_or_else(|| EngineError::KeyNotFound("Charity".to_string()))
    }

    /// All charities, sorted by id.
    pub fn list(&self) -> Vec<&Charity> {
        let mut all: Vec<&Charity> = self.by_id.values().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn charity(id: &str) -> Charity {
        Charity {
            id: id.to_string(),
            name: id.to_uppercase(),
            website: None,
            description: None,
        }
    }

    #[test]
    fn lookup_by_id() {
        let registry = CharityRegistry::new([charity("c1"), charity("c2")]).unwrap();
        assert_eq!(registry.get("c2").map(|c| c.name.as_str()), Some("C2"));
        assert!(registry.get("c3").is_none());
        assert_eq!(
            registry.require("c3").unwrap_err(),
            EngineError::KeyNotFound("Charity".to_string())
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = CharityRegistry::new([charity("c1"), charity(" c1 ")]).unwrap_err();
        assert_eq!(err, EngineError::ExistingKey("c1".to_string()));
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert!(CharityRegistry::new([charity("  ")]).is_err());
    }

    #[test]
    fn list_is_sorted() {
        let registry =
            CharityRegistry::new([charity("zeta"), charity("alpha"), charity("mid")]).unwrap();
        let ids: Vec<&str> = registry.list().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["alpha", "mid", "zeta"]);
        assert_eq!(registry.len(), 3);
    }
}
