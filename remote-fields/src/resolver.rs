use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use apollo_compiler::Name;
use async_trait::async_trait;
use serde_json_bytes::Value;

use crate::selection::Field;
use crate::variables::VariableValues;

/// Error type returned by remote resolvers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A remote resolver executes delegated documents against a remote data source.
///
/// The returned value becomes the field's result once its keys are mapped back to client-facing
/// names. It is typically an object, a list of objects or null. Errors are handed back to the
/// host executor untouched: retries and timeouts are the resolver's business.
#[async_trait]
pub trait RemoteResolver: Send + Sync + fmt::Debug {
    async fn resolve_remote_field(
        &self,
        document: String,
        context: &FieldContext<'_>,
    ) -> Result<Value, BoxError>;
}

/// Everything known about the field being resolved.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// Name of the type owning the field.
    pub parent_type: &'a Name,
    /// The field as requested by the client, before any renaming.
    pub field: &'a Field,
    pub variables: &'a VariableValues,
    extensions: Option<&'a http::Extensions>,
}

impl<'a> FieldContext<'a> {
    pub fn new(parent_type: &'a Name, field: &'a Field, variables: &'a VariableValues) -> Self {
        Self {
            parent_type,
            field,
            variables,
            extensions: None,
        }
    }

    /// Attaches request-scoped data from the host, such as credentials a resolver forwards.
    pub fn with_extensions(mut self, extensions: &'a http::Extensions) -> Self {
        self.extensions = Some(extensions);
        self
    }

    /// Gets a value the host attached to the request.
    pub fn extension<T: Send + Sync + 'static>(&self) -> Option<&'a T> {
        self.extensions.and_then(|extensions| extensions.get::<T>())
    }
}

/// Remote resolvers that configuration files may refer to by name.
///
/// Configuration cannot be checked by the compiler, so resolver names are checked when the
/// schema is built: a name that does not lead to a resolver fails the build with
/// [`ConfigurationError::InvalidResolverCapability`](crate::ConfigurationError).
#[derive(Debug, Clone, Default)]
pub struct ResolverCatalog {
    resolvers: HashMap<String, Arc<dyn RemoteResolver>>,
}

impl ResolverCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, resolver: Arc<dyn RemoteResolver>) -> Self {
        self.insert(name, resolver);
        self
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        resolver: Arc<dyn RemoteResolver>,
    ) -> Option<Arc<dyn RemoteResolver>> {
        self.resolvers.insert(name.into(), resolver)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn RemoteResolver>> {
        self.resolvers.get(name)
    }
}

#[cfg(test)]
mod tests {
    use apollo_compiler::name;
    use serde_json_bytes::json;

    use super::*;

    #[derive(Debug)]
    struct Echo;

    #[async_trait]
    impl RemoteResolver for Echo {
        async fn resolve_remote_field(
            &self,
            document: String,
            context: &FieldContext<'_>,
        ) -> Result<Value, BoxError> {
            let token = context.extension::<String>().cloned().unwrap_or_default();
            Ok(json!({"document": document, "token": token}))
        }
    }

    #[tokio::test]
    async fn extensions_reach_the_resolver() {
        let parent_type = name!("Query");
        let field = Field::new(name!("books"));
        let variables = VariableValues::default();
        let mut extensions = http::Extensions::new();
        extensions.insert("secret".to_owned());

        let context = FieldContext::new(&parent_type, &field, &variables).with_extensions(&extensions);
        let value = Echo
            .resolve_remote_field("query {\n  books\n}".to_owned(), &context)
            .await
            .unwrap();
        assert_eq!(value, json!({"document": "query {\n  books\n}", "token": "secret"}));
    }

    #[test]
    fn catalog_lookup() {
        let catalog = ResolverCatalog::new().with("echo", Arc::new(Echo));
        assert!(catalog.get("echo").is_some());
        assert!(catalog.get("other").is_none());
    }
}
