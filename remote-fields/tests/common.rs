use std::sync::Arc;

use apollo_compiler::ast;
use apollo_compiler::ast::OperationType;
use apollo_compiler::name;
use apollo_compiler::Schema;
use async_trait::async_trait;
use parking_lot::Mutex;
use remote_fields::selection::root_fields;
use remote_fields::selection::Field;
use remote_fields::BoxError;
use remote_fields::FieldContext;
use remote_fields::FieldResolution;
use remote_fields::Object;
use remote_fields::RemoteResolver;
use remote_fields::RemoteSchema;
use remote_fields::ResolverCatalog;
use remote_fields::VariableValues;
use serde_json_bytes::json;
use serde_json_bytes::ByteString;
use serde_json_bytes::Value;

pub(crate) const SCHEMA: &str = r#"
type Query {
  authors: [Author!]!
  books: [Book!]!
  book(id: ID!): Book!
  citations: [Citation!]!
  citation: Citation!
}

type Author {
  id: ID!
  name: String!
}

type Book {
  id: ID!
  name: String!
}

type Citation {
  id: ID!
  content: String!
}
"#;

pub(crate) const LIBRARY: &str = r#"
types:
  Query:
    remoteResolver: library
    fields:
      authors: {}
      books:
        remote: true
      book:
        remote: true
      citations:
        remoteResolver: citations
      citation:
        remoteResolver: citations
        remoteType: otherType
        remoteFieldMap:
          content: text
"#;

pub(crate) fn authors() -> Value {
    json!([
        {"id": "1", "name": "Victor Pelevin"},
        {"id": "2", "name": "Vladimir Sorokin"}
    ])
}

pub(crate) fn books() -> Value {
    json!([
        {"id": "1", "name": "Generation \"П\""},
        {"id": "2", "name": "Blue Salo"}
    ])
}

pub(crate) fn citations() -> Value {
    json!([
        {"id": "1", "content": "Агитпроп бессмертен. Меняются только слова."},
        {"id": "2", "content": "Ясауууух пашооооо!!!"}
    ])
}

/// Citations as the remote side names them.
pub(crate) fn remote_citations() -> Value {
    json!([
        {"id": "1", "text": "Агитпроп бессмертен. Меняются только слова."},
        {"id": "2", "text": "Ясауууух пашооооо!!!"}
    ])
}

/// Answers delegated documents from fixed data, keyed by the document's root field.
#[derive(Debug)]
pub(crate) struct StubResolver {
    respond: fn(&str) -> Option<Value>,
    documents: Mutex<Vec<String>>,
}

impl StubResolver {
    fn new(respond: fn(&str) -> Option<Value>) -> Arc<Self> {
        Arc::new(Self {
            respond,
            documents: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn library() -> Arc<Self> {
        Self::new(|root| match root {
            "books" => Some(books()),
            "book" => books().as_array().and_then(|books| books.get(1).cloned()),
            _ => None,
        })
    }

    pub(crate) fn citations() -> Arc<Self> {
        Self::new(|root| match root {
            "citations" => Some(citations()),
            "otherType" => remote_citations()
                .as_array()
                .and_then(|citations| citations.first().cloned()),
            _ => None,
        })
    }

    /// Documents received so far.
    pub(crate) fn documents(&self) -> Vec<String> {
        self.documents.lock().clone()
    }
}

#[async_trait]
impl RemoteResolver for StubResolver {
    async fn resolve_remote_field(
        &self,
        document: String,
        _context: &FieldContext<'_>,
    ) -> Result<Value, BoxError> {
        let root = root_field_name(&document)?;
        self.documents.lock().push(document);
        (self.respond)(&root).ok_or_else(|| format!("no data for '{root}'").into())
    }
}

/// Parses a delegated document and checks its shape: one anonymous query, no variables.
fn root_field_name(document: &str) -> Result<String, BoxError> {
    let document = ast::Document::parse(document, "remote.graphql")
        .map_err(|invalid| invalid.errors.to_string())?;
    let [ast::Definition::OperationDefinition(operation)] = document.definitions.as_slice() else {
        return Err("expected a single operation".into());
    };
    if operation.operation_type != OperationType::Query
        || operation.name.is_some()
        || !operation.variables.is_empty()
    {
        return Err("expected an anonymous query without variables".into());
    }
    match operation.selection_set.as_slice() {
        [ast::Selection::Field(field)] => Ok(field.name.to_string()),
        _ => Err("expected a single root field".into()),
    }
}

/// Always fails, with a message the host can recognize.
#[derive(Debug)]
pub(crate) struct Unavailable;

#[async_trait]
impl RemoteResolver for Unavailable {
    async fn resolve_remote_field(
        &self,
        _document: String,
        _context: &FieldContext<'_>,
    ) -> Result<Value, BoxError> {
        Err("library backend unavailable".into())
    }
}

pub(crate) struct Catalog {
    pub(crate) library: Arc<StubResolver>,
    pub(crate) citations: Arc<StubResolver>,
}

impl Catalog {
    pub(crate) fn new() -> Self {
        Self {
            library: StubResolver::library(),
            citations: StubResolver::citations(),
        }
    }

    pub(crate) fn resolvers(&self) -> ResolverCatalog {
        ResolverCatalog::new()
            .with("library", self.library.clone())
            .with("citations", self.citations.clone())
    }
}

#[derive(Debug, Default)]
pub(crate) struct Response {
    pub(crate) data: Object,
    pub(crate) errors: Vec<String>,
}

/// Executes the root fields of `query` the way a host executor would: remote fields through
/// `remote`, local fields from fixed data.
pub(crate) async fn execute(remote: &RemoteSchema, query: &str, variables: Value) -> Response {
    let schema = Schema::parse_and_validate(SCHEMA, "schema.graphql").unwrap();
    let document = ast::Document::parse(query, "query.graphql").unwrap();
    let operation = document
        .definitions
        .iter()
        .find_map(|definition| match definition {
            ast::Definition::OperationDefinition(operation) => Some(operation),
            _ => None,
        })
        .unwrap();
    let empty = Object::new();
    let variables =
        VariableValues::from_request(&schema, operation, variables.as_object().unwrap_or(&empty))
            .unwrap();

    let parent_type = name!("Query");
    let mut response = Response::default();
    for field in root_fields(&document, None).unwrap() {
        let context = FieldContext::new(&parent_type, &field, &variables);
        let value = match remote.resolve_field(&context).await {
            Ok(FieldResolution::Remote(value)) => value,
            Ok(FieldResolution::Local) => local_field(&field),
            Err(error) => {
                response.errors.push(error.to_string());
                Value::Null
            }
        };
        response
            .data
            .insert(ByteString::from(field.response_key().as_str()), value);
    }
    response
}

impl Response {
    pub(crate) fn field(&self, response_key: &str) -> &Value {
        self.data
            .get(response_key)
            .unwrap_or_else(|| panic!("'{response_key}' missing from the response"))
    }
}

fn local_field(field: &Field) -> Value {
    match field.name.as_str() {
        "authors" => authors(),
        _ => Value::Null,
    }
}
