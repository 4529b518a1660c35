use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use apollo_compiler::Name;
use indexmap::IndexMap;
use serde_json_bytes::Value;

use crate::binding::resolve_binding;
use crate::binding::TypeHierarchy;
use crate::configuration::Configuration;
use crate::document::OperationDocument;
use crate::error::ConfigurationError;
use crate::error::DelegationError;
use crate::extract::extract_selection;
use crate::name_map::NameMap;
use crate::remap::remap_result;
use crate::resolver::FieldContext;
use crate::resolver::RemoteResolver;
use crate::resolver::ResolverCatalog;
use crate::selection::Field;
use crate::variables::VariableValues;

/// Delegation options of a single field.
#[derive(Clone, Default)]
pub struct FieldOptions {
    remote: bool,
    resolver: Option<Arc<dyn RemoteResolver>>,
    remote_type: Option<Name>,
    remote_fields: Vec<(Name, Name)>,
}

impl FieldOptions {
    /// Delegate using the resolver registered on the owning type or its nearest ancestor.
    pub fn remote() -> Self {
        Self {
            remote: true,
            ..Default::default()
        }
    }

    /// Delegate using `resolver`, whatever the owning type registered.
    pub fn with_resolver(resolver: Arc<dyn RemoteResolver>) -> Self {
        Self {
            resolver: Some(resolver),
            ..Default::default()
        }
    }

    /// Name of the root field in the outgoing document.
    pub fn remote_type(mut self, remote_type: Name) -> Self {
        self.remote_type = Some(remote_type);
        self
    }

    /// Renames the immediate child `local` to `remote` in the outgoing document, and `remote`
    /// back to `local` in the result.
    pub fn remote_field(mut self, local: Name, remote: Name) -> Self {
        self.remote_fields.push((local, remote));
        self
    }

    fn is_delegated(&self) -> bool {
        self.remote || self.resolver.is_some()
    }
}

impl fmt::Debug for FieldOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldOptions")
            .field("remote", &self.remote)
            .field("resolver", &self.resolver.is_some())
            .field("remote_type", &self.remote_type)
            .field("remote_fields", &self.remote_fields)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
struct TypeRegistration {
    parent: Option<Name>,
    resolver: Option<Arc<dyn RemoteResolver>>,
    fields: IndexMap<Name, FieldOptions>,
}

/// Collects type and field registrations, then compiles them into a [`RemoteSchema`].
///
/// Types are registered implicitly the first time they are mentioned.
#[derive(Debug, Clone, Default)]
pub struct RemoteSchemaBuilder {
    types: IndexMap<Name, TypeRegistration>,
}

impl RemoteSchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn registration(&mut self, type_name: Name) -> &mut TypeRegistration {
        self.types.entry(type_name).or_default()
    }

    /// Registers a type without anything attached, so that other types can extend it.
    pub fn object_type(mut self, type_name: Name) -> Self {
        self.registration(type_name);
        self
    }

    /// Makes `type_name` inherit the default resolver of `parent` and its ancestors.
    pub fn extends(mut self, type_name: Name, parent: Name) -> Self {
        self.registration(type_name).parent = Some(parent);
        self
    }

    /// Registers the default resolver of `type_name`, used by its remote fields and by the
    /// remote fields of types extending it.
    pub fn remote_resolver(mut self, type_name: Name, resolver: Arc<dyn RemoteResolver>) -> Self {
        self.registration(type_name).resolver = Some(resolver);
        self
    }

    pub fn field(mut self, type_name: Name, field_name: Name, options: FieldOptions) -> Self {
        self.registration(type_name)
            .fields
            .insert(field_name, options);
        self
    }

    /// Resolves every binding and validates the setup.
    ///
    /// Bindings are fixed here: the schema does not observe anything registered afterwards.
    pub fn build(self) -> Result<RemoteSchema, ConfigurationError> {
        let hierarchy = TypeHierarchy::new(
            self.types
                .iter()
                .map(|(name, registration)| (name, registration.parent.as_ref())),
        )?;

        let defaults: IndexMap<Name, Arc<dyn RemoteResolver>> = self
            .types
            .iter()
            .filter_map(|(name, registration)| {
                registration
                    .resolver
                    .clone()
                    .map(|resolver| (name.clone(), resolver))
            })
            .collect();

        let mut fields: HashMap<Name, HashMap<Name, Arc<FieldDelegation>>> = HashMap::new();
        for (type_name, registration) in &self.types {
            for (field_name, options) in &registration.fields {
                if !options.is_delegated() {
                    if options.remote_type.is_some() || !options.remote_fields.is_empty() {
                        tracing::warn!(
                            type_name = %type_name,
                            field_name = %field_name,
                            "field renames remote names but is not remote, it will be resolved locally"
                        );
                    }
                    continue;
                }
                let resolver = resolve_binding(
                    &hierarchy,
                    &defaults,
                    type_name,
                    options.resolver.as_ref(),
                )
                .ok_or_else(|| ConfigurationError::UnresolvedRemoteResolver {
                    type_name: type_name.clone(),
                    field_name: field_name.clone(),
                })?;
                let name_map = NameMap::new(
                    options.remote_type.clone(),
                    options.remote_fields.iter().cloned(),
                )?;
                tracing::debug!(
                    type_name = %type_name,
                    field_name = %field_name,
                    resolver = ?resolver,
                    "registered remote field"
                );
                fields.entry(type_name.clone()).or_default().insert(
                    field_name.clone(),
                    Arc::new(FieldDelegation { resolver, name_map }),
                );
            }
        }

        Ok(RemoteSchema {
            hierarchy,
            defaults,
            fields,
        })
    }
}

/// How one remote field is delegated: the resolver it goes to and how names are translated.
#[derive(Debug)]
pub struct FieldDelegation {
    resolver: Arc<dyn RemoteResolver>,
    name_map: NameMap,
}

impl FieldDelegation {
    pub fn resolver(&self) -> &Arc<dyn RemoteResolver> {
        &self.resolver
    }

    pub fn name_map(&self) -> &NameMap {
        &self.name_map
    }

    /// Builds the standalone document sent to the resolver for `field`.
    pub fn document(
        &self,
        field: &Field,
        variables: &VariableValues,
    ) -> Result<OperationDocument, DelegationError> {
        let root = extract_selection(field, &self.name_map)
            .field
            .bind_variables(variables)?;
        Ok(OperationDocument::new(root))
    }

    /// Sends the field's document to the resolver and maps the result back to client names.
    #[tracing::instrument(skip_all, level = "trace", fields(parent_type = %context.parent_type, field = %context.field.name))]
    pub async fn resolve(&self, context: &FieldContext<'_>) -> Result<Value, DelegationError> {
        let extracted = extract_selection(context.field, &self.name_map);
        let document = OperationDocument::new(extracted.field.bind_variables(context.variables)?)
            .to_query_string();
        tracing::trace!(%document, "delegating field to remote resolver");
        let value = self
            .resolver
            .resolve_remote_field(document, context)
            .await
            .map_err(DelegationError::Resolver)?;
        Ok(remap_result(value, &extracted.renamed_keys))
    }
}

/// Outcome of resolving one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldResolution {
    /// The field is not delegated, the host executor resolves it as usual.
    Local,
    /// The remote result, with client-facing keys.
    Remote(Value),
}

/// Compiled remote field setup.
///
/// Immutable once built; share it behind an `Arc` and resolve fields concurrently.
#[derive(Debug)]
pub struct RemoteSchema {
    hierarchy: TypeHierarchy,
    defaults: IndexMap<Name, Arc<dyn RemoteResolver>>,
    fields: HashMap<Name, HashMap<Name, Arc<FieldDelegation>>>,
}

impl RemoteSchema {
    pub fn builder() -> RemoteSchemaBuilder {
        RemoteSchemaBuilder::new()
    }

    /// Builds the schema from declarative configuration, resolving resolver names through
    /// `catalog`.
    pub fn from_configuration(
        configuration: &Configuration,
        catalog: &ResolverCatalog,
    ) -> Result<Self, ConfigurationError> {
        configuration.to_builder(catalog)?.build()
    }

    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    /// The default resolver `type_name` inherits, if any.
    pub fn remote_resolver(&self, type_name: &Name) -> Option<Arc<dyn RemoteResolver>> {
        resolve_binding(&self.hierarchy, &self.defaults, type_name, None)
    }

    /// The delegation of `type_name.field_name`, or `None` if the field resolves locally.
    pub fn delegation(&self, type_name: &str, field_name: &str) -> Option<&Arc<FieldDelegation>> {
        self.fields.get(type_name)?.get(field_name)
    }

    pub fn is_remote(&self, type_name: &str, field_name: &str) -> bool {
        self.delegation(type_name, field_name).is_some()
    }

    /// Resolves the field described by `context`.
    ///
    /// Local fields are left to the host; remote fields are delegated and their result
    /// translated back to client-facing names.
    pub async fn resolve_field(
        &self,
        context: &FieldContext<'_>,
    ) -> Result<FieldResolution, DelegationError> {
        match self.delegation(context.parent_type, &context.field.name) {
            None => Ok(FieldResolution::Local),
            Some(delegation) => {
                tracing::debug!(
                    parent_type = %context.parent_type,
                    field = %context.field.name,
                    "resolving remote field"
                );
                delegation.resolve(context).await.map(FieldResolution::Remote)
            }
        }
    }
}
