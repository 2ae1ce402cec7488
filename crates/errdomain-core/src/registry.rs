//! A collection of domains.

use std::collections::BTreeMap;

use tracing::debug;

use crate::descriptor::Descriptor;
use crate::domain::{Domain, DomainOptions};

/// Owns every [`Domain`] created through it, in creation order.
#[derive(Debug, Default)]
pub struct Registry {
    /// Creation sequence number → domain. Keys are never reused.
    domains: BTreeMap<usize, Domain>,
    next_id: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a domain, stores it and returns it for registration.
    pub fn create_domain(&mut self, options: DomainOptions) -> &mut Domain {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        debug!(id, domains = self.domains.len() + 1, "Created error domain");
        self.domains
            .entry(id)
            .or_insert_with(|| Domain::with_options(options))
    }

    /// Iterates domains in creation order.
    pub fn domains(&self) -> impl Iterator<Item = &Domain> + '_ {
        self.domains.values()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Returns the first descriptor registered under `code`, searching
    /// domains in creation order.
    pub fn find_descriptor(&self, code: &str) -> Option<&Descriptor> {
        self.domains
            .values()
            .find_map(|domain| domain.find_error_descriptor_for_code(code))
    }
}
