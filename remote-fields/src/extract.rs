use crate::name_map::NameMap;
use crate::remap::RenamedKeys;
use crate::selection::Field;
use crate::selection::Selection;

/// The selection sent to the remote side, and how its response keys differ from the client's.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedSelection {
    pub field: Field,
    /// Response keys the remote result uses in place of the client's.
    pub renamed_keys: RenamedKeys,
}

/// Builds the selection sent to the remote side for `field`.
///
/// The result is an independent copy: the root is renamed to the map's remote type and the
/// immediate children are renamed according to the field map. Fields inside inline fragments
/// directly under the root count as immediate children, deeper fields are left as requested.
/// Arguments, aliases, directives and ordering are kept.
///
/// An aliased child keeps its response key when renamed, so only unaliased renamed children
/// end up in [`ExtractedSelection::renamed_keys`].
pub fn extract_selection(field: &Field, name_map: &NameMap) -> ExtractedSelection {
    let mut extracted = field.clone();
    let mut renamed_keys = RenamedKeys::default();
    if let Some(remote_type) = name_map.remote_type() {
        extracted.name = remote_type.clone();
    }
    if name_map.renames_fields() {
        rename_children(&mut extracted.selection_set, name_map, &mut renamed_keys);
    }
    ExtractedSelection {
        field: extracted,
        renamed_keys,
    }
}

fn rename_children(
    selection_set: &mut [Selection],
    name_map: &NameMap,
    renamed_keys: &mut RenamedKeys,
) {
    for selection in selection_set {
        match selection {
            Selection::Field(child) => {
                if let Some(remote) = name_map.to_remote(&child.name) {
                    if child.alias.is_none() {
                        renamed_keys.insert(remote.clone(), child.name.clone());
                    }
                    child.name = remote.clone();
                }
            }
            Selection::InlineFragment(fragment) => {
                rename_children(&mut fragment.selection_set, name_map, renamed_keys)
            }
        }
    }
}
