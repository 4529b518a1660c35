use std::fmt;

use crate::display_helpers::write_block;
use crate::display_helpers::State;
use crate::selection::Field;

/// A standalone query sent to a remote resolver: an anonymous `query` operation with a single
/// root field and no variable definitions.
///
/// Build it from a field whose variables have already been bound, see
/// [`Field::bind_variables`], so the document does not depend on anything from the client's
/// request.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationDocument {
    root: Field,
}

impl OperationDocument {
    pub fn new(root: Field) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Field {
        &self.root
    }

    /// The document text, trimmed.
    pub fn to_query_string(&self) -> String {
        self.to_string().trim().to_owned()
    }
}

impl fmt::Display for OperationDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut state = State::new(f);
        state.write("query")?;
        write_block(&mut state, std::slice::from_ref(&self.root), |state, root| {
            root.write(state)
        })
    }
}

#[cfg(test)]
mod tests {
    use apollo_compiler::name;

    use super::*;
    use crate::value::InputValue;
    use crate::value::IntValue;

    #[test]
    fn book_query() {
        let root = Field::new(name!("book"))
            .with_argument(name!("id"), InputValue::Int(IntValue::from(2)))
            .with_selection(Field::new(name!("id")))
            .with_selection(Field::new(name!("name")));
        let document = OperationDocument::new(root.clone());
        assert_eq!(document.root(), &root);
        assert_eq!(
            document.to_query_string(),
            "query {\n  book(id: 2) {\n    id\n    name\n  }\n}"
        );
    }

    #[test]
    fn leaf_root() {
        let root = Field::new(name!("bookCount"))
            .with_argument(name!("author"), InputValue::String("Victor Pelevin".to_owned()));
        insta::assert_snapshot!(OperationDocument::new(root), @r###"
        query {
          bookCount(author: "Victor Pelevin")
        }
        "###);
    }

    #[test]
    fn nested_arguments() {
        let root = Field::new(name!("books"))
            .with_argument(
                name!("filter"),
                InputValue::Object(vec![
                    (
                        name!("ids"),
                        InputValue::List(vec![
                            InputValue::Int(IntValue::from(1)),
                            InputValue::Int(IntValue::from(2)),
                        ]),
                    ),
                    (name!("order"), InputValue::Enum(name!("DESC"))),
                ]),
            )
            .with_argument(name!("first"), InputValue::Null)
            .with_selection(
                Field::new(name!("author"))
                    .with_selection(Field::new(name!("name")))
                    .with_alias(name!("writer")),
            );
        insta::assert_snapshot!(OperationDocument::new(root).to_query_string(), @r###"
        query {
          books(filter: {ids: [1, 2], order: DESC}, first: null) {
            writer: author {
              name
            }
          }
        }
        "###);
    }
}
