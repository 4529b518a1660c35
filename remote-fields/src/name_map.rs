use apollo_compiler::Name;
use indexmap::IndexMap;

use crate::error::ConfigurationError;

/// Translation between the client-facing names of a delegated field and the names the remote
/// side expects.
///
/// Covers the root field (`remoteType`) and the immediate children of the root
/// (`remoteFieldMap`). Field renames must be invertible so that result keys can be mapped back
/// unambiguously.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMap {
    remote_type: Option<Name>,
    to_remote: IndexMap<Name, Name>,
    to_local: IndexMap<Name, Name>,
}

impl NameMap {
    pub fn new(
        remote_type: Option<Name>,
        fields: impl IntoIterator<Item = (Name, Name)>,
    ) -> Result<Self, ConfigurationError> {
        let mut to_remote = IndexMap::new();
        let mut to_local: IndexMap<Name, Name> = IndexMap::new();
        for (local, remote) in fields {
            if let Some(first) = to_local.get(&remote) {
                return Err(ConfigurationError::DuplicateRemoteName {
                    remote,
                    first: first.clone(),
                    second: local,
                });
            }
            if to_remote.contains_key(&local) {
                return Err(ConfigurationError::DuplicateLocalName { local });
            }
            to_local.insert(remote.clone(), local.clone());
            to_remote.insert(local, remote);
        }
        Ok(Self {
            remote_type,
            to_remote,
            to_local,
        })
    }

    /// Name of the root field in outgoing documents, if it differs from the client's.
    pub fn remote_type(&self) -> Option<&Name> {
        self.remote_type.as_ref()
    }

    pub fn to_remote(&self, local: &str) -> Option<&Name> {
        self.to_remote.get(local)
    }

    pub fn to_local(&self, remote: &str) -> Option<&Name> {
        self.to_local.get(remote)
    }

    /// Returns true if at least one child field is renamed.
    pub fn renames_fields(&self) -> bool {
        !self.to_remote.is_empty()
    }

    /// Returns true if nothing is renamed at all.
    pub fn is_identity(&self) -> bool {
        self.remote_type.is_none() && self.to_remote.is_empty()
    }

    /// Local to remote pairs, in configuration order.
    pub fn fields(&self) -> impl Iterator<Item = (&Name, &Name)> {
        self.to_remote.iter()
    }
}
