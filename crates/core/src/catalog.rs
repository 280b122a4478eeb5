use std::collections::HashMap;

use crate::errors::{BookingError, BookingResult};
use crate::models::provider::{Provider, ProviderQuery};

/// Immutable directory of doctors and labs.
#[derive(Debug, Clone, Default)]
pub struct ProviderCatalog {
    providers: Vec<Provider>,
    by_id: HashMap<String, usize>,
}

impl ProviderCatalog {
    /// Builds a catalog, rejecting duplicate ids and malformed schedules.
    pub fn new(providers: Vec<Provider>) -> BookingResult<Self> {
        let mut by_id = HashMap::with_capacity(providers.len());

        for (index, provider) in providers.iter().enumerate() {
            provider.validate()?;
            if by_id.insert(provider.id.clone(), index).is_some() {
                return Err(BookingError::Validation(format!(
                    "duplicate provider id '{}'",
                    provider.id
                )));
            }
        }

        Ok(Self { providers, by_id })
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Provider> {
        self.by_id.get(id).map(|&index| &self.providers[index])
    }

    pub fn require(&self, id: &str) -> BookingResult<&Provider> {
        self.get(id)
            .ok_or_else(|| BookingError::NotFound(format!("Provider with ID {} not found", id)))
    }

    /// Verified providers matching every filter in `query`, ordered by name.
    ///
    /// Location matches as a case-insensitive substring, specialization as a
    /// case-insensitive exact value.
    pub fn search(&self, query: &ProviderQuery) -> Vec<&Provider> {
        let location = normalized(query.location.as_deref());
        let specialization = normalized(query.specialization.as_deref());

        let mut matches: Vec<&Provider> = self
            .providers
            .iter()
            .filter(|p| p.verified)
            .filter(|p| query.kind.map_or(true, |kind| p.kind == kind))
            .filter(|p| match &location {
                Some(term) => p
                    .location
                    .as_deref()
                    .is_some_and(|loc| loc.to_lowercase().contains(term.as_str())),
                None => true,
            })
            .filter(|p| match &specialization {
                Some(term) => p
                    .specialization
                    .as_deref()
                    .is_some_and(|spec| spec.trim().to_lowercase() == *term),
                None => true,
            })
            .collect();

        matches.sort_by(|a, b| a.name.cmp(&b.name));
        matches
    }
}

fn normalized(term: Option<&str>) -> Option<String> {
    term.map(|t| t.trim().to_lowercase()).filter(|t| !t.is_empty())
}
