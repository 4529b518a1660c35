//! ## Remote fields
//!
//! Lets individual fields of a GraphQL schema be resolved by a remote resolver instead of the
//! local resolution pipeline.
//!
//! When a field is delegated, the sub-selection the client requested at that field is rebuilt
//! into a standalone query document: arguments are printed as literals (runtime variables are
//! inlined, so the document declares no variables), the root field and its immediate children
//! may be renamed to the names the remote side expects, and the remote result is translated
//! back to client-facing names before being handed to the host executor.
//!
//! ```text
//! query {            <- always an anonymous query operation
//!   otherType {      <- root renamed by `remoteType`
//!     id
//!     text           <- child renamed by `remoteFieldMap` (content -> text)
//!   }
//! }
//! ```
//!
//! The entry point is [`RemoteSchema`], built once from a [`Configuration`] or through
//! [`RemoteSchemaBuilder`] and immutable afterwards.

#![warn(
    rustdoc::broken_intra_doc_links,
    unreachable_pub,
    unreachable_patterns,
    unused,
    unused_qualifications,
    dead_code,
    while_true,
    unconditional_panic,
    clippy::all
)]

mod binding;
pub mod configuration;
mod display_helpers;
mod document;
pub mod error;
mod extract;
mod name_map;
mod remap;
mod resolver;
mod schema;
pub mod selection;
mod value;
mod variables;

pub use crate::binding::TypeHierarchy;
pub use crate::configuration::Configuration;
pub use crate::document::OperationDocument;
pub use crate::error::ConfigurationError;
pub use crate::error::DelegationError;
pub use crate::error::SelectionError;
pub use crate::error::VariableError;
pub use crate::extract::extract_selection;
pub use crate::extract::ExtractedSelection;
pub use crate::name_map::NameMap;
pub use crate::remap::remap_result;
pub use crate::remap::RenamedKeys;
pub use crate::resolver::BoxError;
pub use crate::resolver::FieldContext;
pub use crate::resolver::RemoteResolver;
pub use crate::resolver::ResolverCatalog;
pub use crate::schema::FieldDelegation;
pub use crate::schema::FieldOptions;
pub use crate::schema::FieldResolution;
pub use crate::schema::RemoteSchema;
pub use crate::schema::RemoteSchemaBuilder;
pub use crate::value::InputValue;
pub use crate::value::IntValue;
pub use crate::variables::VariableValues;

/// JSON object, as returned by remote resolvers.
pub type Object = serde_json_bytes::Map<serde_json_bytes::ByteString, serde_json_bytes::Value>;

pub use serde_json_bytes::Value;
