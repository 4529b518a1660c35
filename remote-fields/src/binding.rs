use std::sync::Arc;

use apollo_compiler::Name;
use indexmap::IndexMap;

use crate::error::ConfigurationError;
use crate::resolver::RemoteResolver;

/// Ancestors of every registered type, nearest first, computed once when the schema is built.
#[derive(Debug, Clone, Default)]
pub struct TypeHierarchy {
    ancestors: IndexMap<Name, Vec<Name>>,
}

impl TypeHierarchy {
    /// Computes the ancestor chains from each type's direct parent.
    pub(crate) fn new<'a>(
        parents: impl IntoIterator<Item = (&'a Name, Option<&'a Name>)>,
    ) -> Result<Self, ConfigurationError> {
        let parents: IndexMap<&Name, Option<&Name>> = parents.into_iter().collect();
        let mut ancestors = IndexMap::with_capacity(parents.len());
        for (&type_name, &parent) in &parents {
            let mut chain: Vec<Name> = Vec::new();
            let mut next = parent;
            while let Some(ancestor) = next {
                if ancestor == type_name || chain.contains(ancestor) {
                    return Err(ConfigurationError::CyclicTypeHierarchy {
                        type_name: ancestor.clone(),
                    });
                }
                let Some(&grand_parent) = parents.get(ancestor) else {
                    return Err(ConfigurationError::UnknownType {
                        type_name: ancestor.to_string(),
                    });
                };
                chain.push(ancestor.clone());
                next = grand_parent;
            }
            ancestors.insert(type_name.clone(), chain);
        }
        Ok(Self { ancestors })
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.ancestors.contains_key(type_name)
    }

    /// Ancestors of `type_name`, nearest first. Empty for unknown types.
    pub fn ancestors(&self, type_name: &str) -> &[Name] {
        self.ancestors
            .get(type_name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The type itself followed by its ancestors.
    pub(crate) fn lineage<'a>(&'a self, type_name: &'a Name) -> impl Iterator<Item = &'a Name> {
        std::iter::once(type_name).chain(self.ancestors(type_name))
    }
}

/// Picks the resolver handling a field of `type_name`: the field's explicit resolver, else the
/// type's own default, else the nearest ancestor's default.
pub(crate) fn resolve_binding(
    hierarchy: &TypeHierarchy,
    defaults: &IndexMap<Name, Arc<dyn RemoteResolver>>,
    type_name: &Name,
    explicit: Option<&Arc<dyn RemoteResolver>>,
) -> Option<Arc<dyn RemoteResolver>> {
    explicit
        .or_else(|| {
            hierarchy
                .lineage(type_name)
                .find_map(|type_name| defaults.get(type_name))
        })
        .cloned()
}
