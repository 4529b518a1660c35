//! Errors raised while configuring remote fields or delegating a field at request time.

use apollo_compiler::Name;
use displaydoc::Display;
use thiserror::Error;

use crate::resolver::BoxError;

/// Errors found while building a [`RemoteSchema`](crate::RemoteSchema).
///
/// All of them are fatal: a schema with a broken delegation setup is never handed out.
#[derive(Error, Display, Debug)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// Remote resolver '{resolver}' registered on '{type_name}' does not expose `resolve_remote_field`
    InvalidResolverCapability {
        /// The type the resolver was registered on.
        type_name: String,
        /// The name the resolver was referenced by.
        resolver: String,
    },

    /// Field '{type_name}.{field_name}' is remote but no remote resolver is set on the type or any of its ancestors
    UnresolvedRemoteResolver {
        /// The type owning the field.
        type_name: Name,
        /// The delegated field.
        field_name: Name,
    },

    /// Type '{type_name}' is not registered
    UnknownType {
        /// The unknown type.
        type_name: String,
    },

    /// Type '{type_name}' is its own ancestor
    CyclicTypeHierarchy {
        /// A type taking part in the cycle.
        type_name: Name,
    },

    /// '{name}' is not a valid GraphQL name
    InvalidName {
        /// The offending name.
        name: String,
    },

    /// Fields '{first}' and '{second}' are both mapped to remote field '{remote}'
    DuplicateRemoteName {
        /// The remote name both fields map to.
        remote: Name,
        /// The first local field.
        first: Name,
        /// The second local field.
        second: Name,
    },

    /// Field '{local}' is mapped twice
    DuplicateLocalName {
        /// The local field mapped more than once.
        local: Name,
    },

    /// Could not parse configuration: {0}
    Parse(#[from] serde_yaml::Error),
}

/// Errors converting the host's parsed operation into delegable selections.
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SelectionError {
    /// Operation '{name}' was not found in the document
    UnknownOperation {
        /// The requested operation name.
        name: String,
    },

    /// Document does not contain any operation
    MissingOperation,

    /// Fragment '{name}' is not defined
    UnknownFragment {
        /// The spread fragment.
        name: Name,
    },

    /// Fragment '{name}' spreads itself
    FragmentCycle {
        /// A fragment taking part in the cycle.
        name: Name,
    },

    /// Literal '{value}' cannot be represented
    InvalidLiteral {
        /// The literal as written in the operation.
        value: String,
    },
}

/// Errors building [`VariableValues`](crate::VariableValues) from a request.
#[derive(Error, Display, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum VariableError {
    /// '{name}' is not a valid variable name
    InvalidName {
        /// The offending name.
        name: String,
    },

    /// Variable '{name}' has an invalid value: {reason}
    InvalidValue {
        /// The variable name.
        name: Name,
        /// Why the value was refused.
        reason: String,
    },

    /// Default value of variable '{name}' is invalid: {source}
    InvalidDefault {
        /// The variable name.
        name: Name,
        /// The conversion failure.
        source: SelectionError,
    },
}

/// Errors delegating a single field. They abort that field only.
///
/// Remote resolver failures are displayed exactly as the resolver reported them.
#[derive(Error, Display, Debug)]
#[non_exhaustive]
pub enum DelegationError {
    /// variable '${name}' is used by the delegated selection but has no value
    MissingVariableBinding {
        /// The unbound variable.
        name: Name,
    },

    /// {0}
    Resolver(#[source] BoxError),
}

impl DelegationError {
    /// Returns the resolver's own error, if that is what failed.
    pub fn into_resolver_error(self) -> Option<BoxError> {
        match self {
            DelegationError::Resolver(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use apollo_compiler::name;

    use super::*;

    #[test]
    fn configuration_messages() {
        let error = ConfigurationError::UnresolvedRemoteResolver {
            type_name: name!("Query"),
            field_name: name!("books"),
        };
        insta::assert_snapshot!(error, @"Field 'Query.books' is remote but no remote resolver is set on the type or any of its ancestors");

        let error = ConfigurationError::InvalidResolverCapability {
            type_name: "Query".to_owned(),
            resolver: "books".to_owned(),
        };
        insta::assert_snapshot!(error, @"Remote resolver 'books' registered on 'Query' does not expose `resolve_remote_field`");
    }

    #[test]
    fn resolver_errors_pass_through() {
        let inner: BoxError = "backend unavailable".into();
        let error = DelegationError::Resolver(inner);
        assert_eq!(error.to_string(), "backend unavailable");
        assert_eq!(
            std::error::Error::source(&error).map(ToString::to_string),
            Some("backend unavailable".to_owned())
        );
        let inner = error.into_resolver_error().expect("resolver error");
        assert_eq!(inner.to_string(), "backend unavailable");
    }

    #[test]
    fn missing_variable_message() {
        let error = DelegationError::MissingVariableBinding {
            name: name!("bookId"),
        };
        assert_eq!(
            error.to_string(),
            "variable '$bookId' is used by the delegated selection but has no value"
        );
    }
}
