use apollo_compiler::Name;
use indexmap::IndexMap;
use serde_json_bytes::ByteString;
use serde_json_bytes::Value;

use crate::Object;

/// Response keys of a delegated selection that differ from the client's, remote key to client
/// key.
///
/// Built per delegation by [`extract_selection`](crate::extract_selection): an aliased child is
/// answered under its alias whatever its field name, so only unaliased renamed children appear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamedKeys {
    to_local: IndexMap<Name, Name>,
}

impl RenamedKeys {
    pub(crate) fn insert(&mut self, remote: Name, local: Name) {
        self.to_local.insert(remote, local);
    }

    /// The client's key for the remote response key `remote`, if it was renamed.
    pub fn to_local(&self, remote: &str) -> Option<&Name> {
        self.to_local.get(remote)
    }

    pub fn is_empty(&self) -> bool {
        self.to_local.is_empty()
    }
}

/// Translates the keys of a remote result back to client-facing names.
///
/// Objects have their renamed keys restored, lists have each object element restored. Only the
/// top level is touched, matching the one-level renaming done when the outgoing selection was
/// extracted. Other keys are kept as they are.
pub fn remap_result(value: Value, renamed_keys: &RenamedKeys) -> Value {
    if renamed_keys.is_empty() {
        return value;
    }
    match value {
        Value::Object(object) => Value::Object(remap_object(object, renamed_keys)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| match item {
                    Value::Object(object) => Value::Object(remap_object(object, renamed_keys)),
                    other => other,
                })
                .collect(),
        ),
        other => other,
    }
}

fn remap_object(object: Object, renamed_keys: &RenamedKeys) -> Object {
    object
        .into_iter()
        .map(|(key, value)| match renamed_keys.to_local(key.as_str()) {
            Some(local) => (ByteString::from(local.as_str()), value),
            None => (key, value),
        })
        .collect()
}
