//! Credential slots for the multimodal provider

use crate::types::ProviderFailure;

/// Ordered, fixed set of API keys configured at startup
#[derive(Debug, Clone, Default)]
pub struct CredentialSet {
    slots: Vec<Option<String>>,
}

impl CredentialSet {
    pub fn new(slots: Vec<Option<String>>) -> Self {
        let slots = slots
            .into_iter()
            .map(|slot| slot.filter(|key| !key.trim().is_empty()))
            .collect();
        Self { slots }
    }

    /// Pick the credential for `index`.
    ///
    /// An unset or out-of-range slot falls back to slot 0, then to the first
    /// configured slot. Returns the slot actually used with its key.
    pub fn select(&self, index: Option<usize>) -> Result<(usize, &str), ProviderFailure> {
        let requested = index.unwrap_or(0);

        if let Some(key) = self.get(requested) {
            return Ok((requested, key));
        }
        if let Some(key) = self.get(0) {
            return Ok((0, key));
        }

        self.slots
            .iter()
            .enumerate()
            .find_map(|(slot, key)| key.as_deref().map(|key| (slot, key)))
            .ok_or_else(|| {
                ProviderFailure::configuration(format!(
                    "Google API key {} is not configured",
                    requested
                ))
            })
    }

    /// Number of configured (non-empty) slots
    pub fn configured(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn get(&self, slot: usize) -> Option<&str> {
        self.slots.get(slot).and_then(|key| key.as_deref())
    }
}
