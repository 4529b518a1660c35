use apollo_compiler::ast;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::Name;
use apollo_compiler::Schema;
use indexmap::IndexMap;
use serde_json_bytes::Value;

use crate::error::VariableError;
use crate::value::json_key;
use crate::value::InputValue;
use crate::Object;

/// The runtime variable values bound for one execution.
///
/// Values are stored as literals so they can be inlined into delegated documents, which never
/// declare variables of their own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableValues {
    values: IndexMap<Name, InputValue>,
}

impl VariableValues {
    /// Binds request variables without type information.
    ///
    /// JSON strings are printed as GraphQL strings. Use [`VariableValues::from_request`] when
    /// variables may hold enum values.
    pub fn from_json(variables: &Object) -> Result<Self, VariableError> {
        let values = variables
            .iter()
            .map(|(key, value)| {
                let name = Name::new(key.as_str()).map_err(|_| VariableError::InvalidName {
                    name: key.as_str().to_owned(),
                })?;
                let value = InputValue::from_json(value).map_err(|reason| {
                    VariableError::InvalidValue {
                        name: name.clone(),
                        reason,
                    }
                })?;
                Ok((name, value))
            })
            .collect::<Result<_, _>>()?;
        Ok(Self { values })
    }

    /// Binds request variables the way the host executor coerces them: JSON values follow the
    /// declared variable types (strings in enum positions become enum values) and variables
    /// missing from the request take their declared default value.
    ///
    /// Variables that are neither provided nor defaulted stay unbound.
    pub fn from_request(
        schema: &Schema,
        operation: &ast::OperationDefinition,
        variables: &Object,
    ) -> Result<Self, VariableError> {
        let mut values = IndexMap::with_capacity(operation.variables.len());
        for definition in &operation.variables {
            let name = &definition.name;
            let value = match variables.get(name.as_str()) {
                Some(value) => coerce(schema, &definition.ty, value).map_err(|reason| {
                    VariableError::InvalidValue {
                        name: name.clone(),
                        reason,
                    }
                })?,
                None => match &definition.default_value {
                    Some(default) => InputValue::from_ast(default).map_err(|source| {
                        VariableError::InvalidDefault {
                            name: name.clone(),
                            source,
                        }
                    })?,
                    None => continue,
                },
            };
            values.insert(name.clone(), value);
        }
        Ok(Self { values })
    }

    /// Binds `name` to `value`, replacing any previous binding.
    pub fn insert(&mut self, name: Name, value: InputValue) -> Option<InputValue> {
        self.values.insert(name, value)
    }

    pub fn get(&self, name: &str) -> Option<&InputValue> {
        self.values.get(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(Name, InputValue)> for VariableValues {
    fn from_iter<T: IntoIterator<Item = (Name, InputValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

fn coerce(schema: &Schema, ty: &ast::Type, value: &Value) -> Result<InputValue, String> {
    match value {
        Value::Null => Ok(InputValue::Null),
        Value::Array(items) if ty.is_list() => Ok(InputValue::List(
            items
                .iter()
                .map(|item| coerce(schema, ty.item_type(), item))
                .collect::<Result<_, _>>()?,
        )),
        // A single value is accepted for a list type and printed as is.
        _ if ty.is_list() => coerce(schema, ty.item_type(), value),
        _ => match (schema.types.get(ty.inner_named_type()), value) {
            (Some(ExtendedType::Enum(definition)), Value::String(s)) => {
                let name = Name::new(s.as_str())
                    .ok()
                    .filter(|name| definition.values.contains_key(name))
                    .ok_or_else(|| {
                        format!("'{}' is not a value of enum {}", s.as_str(), definition.name)
                    })?;
                Ok(InputValue::Enum(name))
            }
            (Some(ExtendedType::Enum(definition)), _) => {
                Err(format!("expected a value of enum {}", definition.name))
            }
            (Some(ExtendedType::InputObject(definition)), Value::Object(object)) => {
                let fields = object
                    .iter()
                    .map(|(key, value)| {
                        let name = json_key(key.as_str())?;
                        let value = match definition.fields.get(&name) {
                            Some(field) => coerce(schema, &field.ty, value)?,
                            None => InputValue::from_json(value)?,
                        };
                        Ok((name, value))
                    })
                    .collect::<Result<_, String>>()?;
                Ok(InputValue::Object(fields))
            }
            _ => InputValue::from_json(value),
        },
    }
}

#[cfg(test)]
mod tests {
    use apollo_compiler::name;
    use pretty_assertions::assert_eq;
    use serde_json_bytes::json;

    use super::*;
    use crate::value::IntValue;

    const SCHEMA: &str = r#"
        type Query {
          books(filter: BookFilter, order: Order = ASC, first: Int = 10): [Book!]!
        }

        type Book {
          id: ID!
          name: String!
        }

        enum Order {
          ASC
          DESC
        }

        input BookFilter {
          order: Order
          orders: [Order!]
          name: String
        }
    "#;

    fn operation(source: &str) -> ast::OperationDefinition {
        let document = ast::Document::parse(source, "query.graphql").unwrap();
        match &document.definitions[0] {
            ast::Definition::OperationDefinition(operation) => (**operation).clone(),
            _ => panic!("expected an operation"),
        }
    }

    fn bind(query: &str, variables: Value) -> Result<VariableValues, VariableError> {
        let schema = Schema::parse_and_validate(SCHEMA, "schema.graphql").unwrap();
        VariableValues::from_request(
            &schema,
            &operation(query),
            variables.as_object().unwrap(),
        )
    }

    #[test]
    fn untyped_binding() {
        let variables =
            VariableValues::from_json(json!({"bookId": 2, "name": "x"}).as_object().unwrap())
                .unwrap();
        assert_eq!(variables.len(), 2);
        assert_eq!(
            variables.get("bookId"),
            Some(&InputValue::Int(IntValue::from(2)))
        );
        assert_eq!(
            variables.get("name"),
            Some(&InputValue::String("x".to_owned()))
        );
        assert_eq!(variables.get("other"), None);
    }

    #[test]
    fn enum_positions_become_enum_values() {
        let variables = bind(
            "query($order: Order, $filter: BookFilter) { books(order: $order, filter: $filter) { id } }",
            json!({"order": "DESC", "filter": {"order": "ASC", "orders": ["DESC", "ASC"], "name": "Salo"}}),
        )
        .unwrap();
        assert_eq!(variables.get("order"), Some(&InputValue::Enum(name!("DESC"))));
        assert_eq!(
            variables.get("filter").unwrap().to_string(),
            r#"{order: ASC, orders: [DESC, ASC], name: "Salo"}"#
        );
    }

    #[test]
    fn defaults_apply_to_missing_variables() {
        let variables = bind(
            "query($order: Order = DESC, $first: Int = 5, $filter: BookFilter) { books(order: $order, first: $first, filter: $filter) { id } }",
            json!({"first": null}),
        )
        .unwrap();
        assert_eq!(variables.get("order"), Some(&InputValue::Enum(name!("DESC"))));
        // An explicit null is a value, not a missing variable.
        assert_eq!(variables.get("first"), Some(&InputValue::Null));
        assert_eq!(variables.get("filter"), None);
    }

    #[test]
    fn unknown_enum_value_is_refused() {
        let error = bind(
            "query($order: Order) { books(order: $order) { id } }",
            json!({"order": "SIDEWAYS"}),
        )
        .unwrap_err();
        insta::assert_snapshot!(error, @"Variable 'order' has an invalid value: 'SIDEWAYS' is not a value of enum Order");
    }

    #[test]
    fn single_value_for_list_type() {
        let variables = bind(
            "query($orders: [Order!]) { books(filter: {orders: $orders}) { id } }",
            json!({"orders": "ASC"}),
        )
        .unwrap();
        assert_eq!(variables.get("orders"), Some(&InputValue::Enum(name!("ASC"))));
    }
}
