//! Declarative remote field setup, read from YAML (or JSON).
//!
//! ```yaml
//! types:
//!   Query:
//!     remoteResolver: library
//!     fields:
//!       book:
//!         remote: true
//!       citation:
//!         remoteResolver: citations
//!         remoteType: otherType
//!         remoteFieldMap:
//!           content: text
//! ```
//!
//! Resolvers are referred to by name and looked up in a [`ResolverCatalog`] when the schema is
//! built.

use std::sync::Arc;

use apollo_compiler::Name;
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigurationError;
use crate::resolver::RemoteResolver;
use crate::resolver::ResolverCatalog;
use crate::schema::FieldOptions;
use crate::schema::RemoteSchemaBuilder;

/// Remote field configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// Object types, keyed by type name.
    #[serde(default)]
    pub types: IndexMap<String, TypeConfiguration>,
}

/// Configuration of one object type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct TypeConfiguration {
    /// The parent type. Remote fields of this type inherit the nearest registered
    /// `remoteResolver` among its ancestors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Default resolver for remote fields of this type and of types extending it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_resolver: Option<String>,

    /// Fields, keyed by field name.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, FieldConfiguration>,
}

/// Configuration of one field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct FieldConfiguration {
    /// Delegate the field to the resolver inherited by its type.
    ///
    /// Defaults to false
    #[serde(default)]
    pub remote: bool,

    /// Delegate the field to this resolver, whatever its type inherits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_resolver: Option<String>,

    /// Name of the root field in the document sent to the resolver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_type: Option<String>,

    /// Renames of the field's immediate children, client name to remote name.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub remote_field_map: IndexMap<String, String>,
}

impl Configuration {
    pub fn from_yaml(source: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_yaml::from_str(source)?)
    }

    /// JSON schema of the configuration, for editors and validation tooling.
    pub fn json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(Configuration)
    }

    /// Turns the configuration into builder registrations, looking resolvers up in `catalog`.
    #[tracing::instrument(skip_all, level = "trace")]
    pub fn to_builder(
        &self,
        catalog: &ResolverCatalog,
    ) -> Result<RemoteSchemaBuilder, ConfigurationError> {
        let mut builder = RemoteSchemaBuilder::new();
        for (type_name, type_configuration) in &self.types {
            let type_name = graphql_name(type_name)?;
            builder = builder.object_type(type_name.clone());
            if let Some(parent) = &type_configuration.extends {
                builder = builder.extends(type_name.clone(), graphql_name(parent)?);
            }
            if let Some(resolver) = &type_configuration.remote_resolver {
                let resolver = lookup(catalog, &type_name, resolver)?;
                builder = builder.remote_resolver(type_name.clone(), resolver);
            }
            for (field_name, field) in &type_configuration.fields {
                let field_name = graphql_name(field_name)?;
                let mut options = match &field.remote_resolver {
                    Some(resolver) => {
                        FieldOptions::with_resolver(lookup(catalog, &type_name, resolver)?)
                    }
                    None if field.remote => FieldOptions::remote(),
                    None => FieldOptions::default(),
                };
                if let Some(remote_type) = &field.remote_type {
                    options = options.remote_type(graphql_name(remote_type)?);
                }
                for (local, remote) in &field.remote_field_map {
                    options = options.remote_field(graphql_name(local)?, graphql_name(remote)?);
                }
                builder = builder.field(type_name.clone(), field_name, options);
            }
        }
        Ok(builder)
    }
}

fn graphql_name(name: &str) -> Result<Name, ConfigurationError> {
    Name::new(name).map_err(|_| ConfigurationError::InvalidName {
        name: name.to_owned(),
    })
}

fn lookup(
    catalog: &ResolverCatalog,
    type_name: &Name,
    resolver: &str,
) -> Result<Arc<dyn RemoteResolver>, ConfigurationError> {
    catalog
        .get(resolver)
        .cloned()
        .ok_or_else(|| ConfigurationError::InvalidResolverCapability {
            type_name: type_name.to_string(),
            resolver: resolver.to_owned(),
        })
}
