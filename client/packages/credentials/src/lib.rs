//! Git provider credential slots and the reconciliation of all five of them
//! into one save or disconnect-all request.

mod connections;
mod provider;
mod reconciler;
mod store;

pub use connections::ProviderConnections;
pub use provider::{ProviderId, UnknownProvider};
pub use reconciler::{
    ClearedFields, CredentialReconciler, CredentialReconciliationPayload, ProviderToken,
    ProviderTokensRequest, ReconciliationRequest,
};
pub use store::{CredentialSlot, CredentialSlotStore};
