use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::provider::ProviderId;
use crate::store::CredentialSlotStore;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct ProviderToken {
    pub token: String,
    pub host: String,
}

impl ProviderToken {
    fn trimmed(token: &str, host: &str) -> Self {
        Self {
            token: token.trim().to_string(),
            host: host.trim().to_string(),
        }
    }
}

/// Token and host for every provider. The backend treats the request as
/// authoritative for exactly these five keys, so a partial map is never built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema, ToSchema)]
#[serde(transparent)]
pub struct CredentialReconciliationPayload(BTreeMap<ProviderId, ProviderToken>);

impl CredentialReconciliationPayload {
    fn from_fn(mut entry: impl FnMut(ProviderId) -> ProviderToken) -> Self {
        Self(
            ProviderId::ALL
                .into_iter()
                .map(|provider| (provider, entry(provider)))
                .collect(),
        )
    }

    pub fn get(&self, provider: ProviderId) -> &ProviderToken {
        // Every constructor fills all five providers.
        &self.0[&provider]
    }

    pub fn providers(&self) -> impl Iterator<Item = ProviderId> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ProviderId, &ProviderToken)> + '_ {
        self.0.iter().map(|(provider, token)| (*provider, token))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_all_empty(&self) -> bool {
        self.0
            .values()
            .all(|entry| entry.token.is_empty() && entry.host.is_empty())
    }
}

/// Deserialization accepts any subset of providers and fills the rest with
/// empty entries, keeping the five-key invariant on the read side as well.
impl<'de> Deserialize<'de> for CredentialReconciliationPayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let mut raw = BTreeMap::<ProviderId, ProviderToken>::deserialize(deserializer)?;
        Ok(Self::from_fn(|provider| raw.remove(&provider).unwrap_or_default()))
    }
}

/// Body of the provider save call. `disconnect_all` is only ever sent as
/// `true`, so "clear everything" and "nothing was edited" stay distinguishable
/// even though their token maps are identical. The `cleared_*` lists do the
/// same per field: an empty value listed there was edited to empty and means
/// disconnect, an unlisted empty value means no change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema)]
pub struct ProviderTokensRequest {
    pub provider_tokens: CredentialReconciliationPayload,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cleared_tokens: Vec<ProviderId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cleared_hosts: Vec<ProviderId>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub disconnect_all: bool,
}

/// Providers whose token or host was edited and then cleared, in canonical
/// provider order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearedFields {
    pub tokens: Vec<ProviderId>,
    pub hosts: Vec<ProviderId>,
}

impl ClearedFields {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && self.hosts.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconciliationRequest {
    Save {
        payload: CredentialReconciliationPayload,
        cleared: ClearedFields,
    },
    DisconnectAll(CredentialReconciliationPayload),
}

impl ReconciliationRequest {
    pub fn payload(&self) -> &CredentialReconciliationPayload {
        match self {
            Self::Save { payload, .. } | Self::DisconnectAll(payload) => payload,
        }
    }

    /// Always empty for a disconnect-all, which already clears everything.
    pub fn cleared(&self) -> ClearedFields {
        match self {
            Self::Save { cleared, .. } => cleared.clone(),
            Self::DisconnectAll(_) => ClearedFields::default(),
        }
    }

    pub fn is_disconnect_all(&self) -> bool {
        matches!(self, Self::DisconnectAll(_))
    }

    pub fn to_body(&self) -> ProviderTokensRequest {
        let ClearedFields { tokens, hosts } = self.cleared();
        ProviderTokensRequest {
            provider_tokens: self.payload().clone(),
            cleared_tokens: tokens,
            cleared_hosts: hosts,
            disconnect_all: self.is_disconnect_all(),
        }
    }
}

pub struct CredentialReconciler;

impl CredentialReconciler {
    /// All five slots, touched or not. Values are trimmed.
    pub fn build_payload(store: &CredentialSlotStore) -> CredentialReconciliationPayload {
        CredentialReconciliationPayload::from_fn(|provider| {
            let slot = store.slot(provider);
            ProviderToken::trimmed(&slot.token, &slot.host)
        })
    }

    /// Touched fields whose trimmed value is empty: explicit per-field
    /// disconnects, as opposed to fields that were never edited.
    pub fn cleared_fields(store: &CredentialSlotStore) -> ClearedFields {
        let mut cleared = ClearedFields::default();
        for slot in store.slots() {
            if slot.token_touched && slot.token.trim().is_empty() {
                cleared.tokens.push(slot.provider_id);
            }
            if slot.host_touched && slot.host.trim().is_empty() {
                cleared.hosts.push(slot.provider_id);
            }
        }
        cleared
    }

    pub fn disconnect_all_payload() -> CredentialReconciliationPayload {
        CredentialReconciliationPayload::from_fn(|_| ProviderToken::default())
    }

    pub fn save_request(store: &CredentialSlotStore) -> ReconciliationRequest {
        ReconciliationRequest::Save {
            payload: Self::build_payload(store),
            cleared: Self::cleared_fields(store),
        }
    }

    pub fn disconnect_all_request() -> ReconciliationRequest {
        ReconciliationRequest::DisconnectAll(Self::disconnect_all_payload())
    }

    pub fn submit_enabled(store: &CredentialSlotStore, in_flight: bool) -> bool {
        store.is_dirty() && !in_flight
    }
}
