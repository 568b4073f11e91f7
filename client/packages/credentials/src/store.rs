use serde::Serialize;

use crate::provider::ProviderId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CredentialSlot {
    pub provider_id: ProviderId,
    pub token: String,
    pub host: String,
    pub token_touched: bool,
    pub host_touched: bool,
}

impl CredentialSlot {
    fn empty(provider_id: ProviderId) -> Self {
        Self {
            provider_id,
            token: String::new(),
            host: String::new(),
            token_touched: false,
            host_touched: false,
        }
    }

    pub fn is_touched(&self) -> bool {
        self.token_touched || self.host_touched
    }
}

/// Edit state of the git provider form: one slot per provider.
///
/// `touched` flips on the first non-empty value and stays set, even when the
/// field is cleared again, until `reset`. An edited-to-empty field is an
/// explicit intent that the reconciler must not confuse with "never edited".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSlotStore {
    slots: [CredentialSlot; 5],
}

impl CredentialSlotStore {
    pub fn new() -> Self {
        Self {
            slots: ProviderId::ALL.map(CredentialSlot::empty),
        }
    }

    pub fn set_token(&mut self, provider: ProviderId, value: impl Into<String>) {
        let slot = &mut self.slots[provider.index()];
        slot.token = value.into();
        if !slot.token.is_empty() {
            slot.token_touched = true;
        }
    }

    pub fn set_host(&mut self, provider: ProviderId, value: impl Into<String>) {
        let slot = &mut self.slots[provider.index()];
        slot.host = value.into();
        if !slot.host.is_empty() {
            slot.host_touched = true;
        }
    }

    /// Empties both fields and marks them edited, which the reconciler
    /// reports as an explicit disconnect of this provider.
    pub fn clear(&mut self, provider: ProviderId) {
        let slot = &mut self.slots[provider.index()];
        slot.token.clear();
        slot.host.clear();
        slot.token_touched = true;
        slot.host_touched = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.slots.iter().any(CredentialSlot::is_touched)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn slot(&self, provider: ProviderId) -> &CredentialSlot {
        &self.slots[provider.index()]
    }

    pub fn slots(&self) -> &[CredentialSlot] {
        &self.slots
    }
}

impl Default for CredentialSlotStore {
    fn default() -> Self {
        Self::new()
    }
}
