use std::collections::BTreeMap;

use crate::provider::ProviderId;

/// Which providers the backend already holds credentials for, and the host
/// recorded for each. Built from the settings `provider_tokens_set` map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderConnections {
    hosts: BTreeMap<ProviderId, Option<String>>,
}

impl ProviderConnections {
    /// Unknown provider keys are ignored.
    pub fn from_tokens_set<I, K>(tokens_set: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<String>)>,
        K: AsRef<str>,
    {
        let hosts = tokens_set
            .into_iter()
            .filter_map(|(key, host)| {
                let provider = key.as_ref().parse::<ProviderId>().ok()?;
                let host = host.filter(|value| !value.trim().is_empty());
                Some((provider, host))
            })
            .collect();
        Self { hosts }
    }

    pub fn is_connected(&self, provider: ProviderId) -> bool {
        self.hosts.contains_key(&provider)
    }

    pub fn existing_host(&self, provider: ProviderId) -> Option<&str> {
        self.hosts.get(&provider).and_then(|host| host.as_deref())
    }

    pub fn connected(&self) -> Vec<ProviderId> {
        self.hosts.keys().copied().collect()
    }

    /// The disconnect action is only meaningful when something is connected.
    pub fn disconnect_enabled(&self) -> bool {
        !self.hosts.is_empty()
    }
}
