use std::fmt;
use std::fmt::Write;

use apollo_compiler::ast;
use apollo_compiler::Name;
use serde_json_bytes::Value;

use crate::display_helpers::DisplaySeparated;
use crate::error::DelegationError;
use crate::error::SelectionError;
use crate::variables::VariableValues;

/// An argument value as it appears in a selection.
///
/// Every variant but [`InputValue::Variable`] is a literal. Variables are replaced by their bound
/// value before a document is printed, see [`InputValue::bind_variables`].
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Null,
    Boolean(bool),
    Int(IntValue),
    /// Always finite.
    Float(f64),
    String(String),
    Enum(Name),
    List(Vec<InputValue>),
    Object(Vec<(Name, InputValue)>),
    Variable(Name),
}

impl InputValue {
    pub(crate) fn from_ast(value: &ast::Value) -> Result<Self, SelectionError> {
        Ok(match value {
            ast::Value::Null => InputValue::Null,
            ast::Value::Boolean(b) => InputValue::Boolean(*b),
            ast::Value::Enum(name) => InputValue::Enum(name.clone()),
            ast::Value::Variable(name) => InputValue::Variable(name.clone()),
            ast::Value::String(s) => InputValue::String(s.clone()),
            ast::Value::Int(i) => InputValue::Int(IntValue(i.to_string())),
            ast::Value::Float(f) => float_literal(&f.to_string())?,
            ast::Value::List(items) => InputValue::List(
                items
                    .iter()
                    .map(|item| Self::from_ast(item))
                    .collect::<Result<_, _>>()?,
            ),
            ast::Value::Object(fields) => InputValue::Object(
                fields
                    .iter()
                    .map(|(name, value)| Ok((name.clone(), Self::from_ast(value)?)))
                    .collect::<Result<_, SelectionError>>()?,
            ),
        })
    }

    /// Converts a JSON value without type information: strings stay strings.
    pub(crate) fn from_json(value: &Value) -> Result<Self, String> {
        Ok(match value {
            Value::Null => InputValue::Null,
            Value::Bool(b) => InputValue::Boolean(*b),
            Value::Number(number) if number.is_f64() => number
                .as_f64()
                .filter(|f| f.is_finite())
                .map(InputValue::Float)
                .ok_or_else(|| format!("number {number} is out of range"))?,
            Value::Number(number) => InputValue::Int(IntValue(number.to_string())),
            Value::String(s) => InputValue::String(s.as_str().to_owned()),
            Value::Array(items) => InputValue::List(
                items
                    .iter()
                    .map(Self::from_json)
                    .collect::<Result<_, _>>()?,
            ),
            Value::Object(object) => InputValue::Object(
                object
                    .iter()
                    .map(|(key, value)| Ok((json_key(key.as_str())?, Self::from_json(value)?)))
                    .collect::<Result<_, String>>()?,
            ),
        })
    }

    /// Replaces every variable reference, at any depth, by its bound value.
    pub fn bind_variables(self, variables: &VariableValues) -> Result<Self, DelegationError> {
        Ok(match self {
            InputValue::Variable(name) => match variables.get(&name) {
                Some(value) => value.clone(),
                None => return Err(DelegationError::MissingVariableBinding { name }),
            },
            InputValue::List(items) => InputValue::List(
                items
                    .into_iter()
                    .map(|item| item.bind_variables(variables))
                    .collect::<Result<_, _>>()?,
            ),
            InputValue::Object(fields) => InputValue::Object(
                fields
                    .into_iter()
                    .map(|(name, value)| Ok((name, value.bind_variables(variables)?)))
                    .collect::<Result<_, DelegationError>>()?,
            ),
            literal => literal,
        })
    }

    /// Returns true if no variable reference appears in this value.
    pub fn is_literal(&self) -> bool {
        match self {
            InputValue::Variable(_) => false,
            InputValue::List(items) => items.iter().all(Self::is_literal),
            InputValue::Object(fields) => fields.iter().all(|(_, value)| value.is_literal()),
            _ => true,
        }
    }
}

/// An integer literal, kept as written so that values past the range of machine integers are
/// forwarded unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntValue(String);

impl IntValue {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The value as an `i64`, if it fits.
    pub fn as_i64(&self) -> Option<i64> {
        self.0.parse().ok()
    }
}

impl From<i64> for IntValue {
    fn from(value: i64) -> Self {
        IntValue(value.to_string())
    }
}

impl fmt::Display for IntValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub(crate) fn json_key(key: &str) -> Result<Name, String> {
    Name::new(key).map_err(|_| format!("'{key}' is not a valid input field name"))
}

fn float_literal(text: &str) -> Result<InputValue, SelectionError> {
    text.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(InputValue::Float)
        .ok_or_else(|| SelectionError::InvalidLiteral {
            value: text.to_owned(),
        })
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Null => f.write_str("null"),
            InputValue::Boolean(b) => write!(f, "{b}"),
            InputValue::Int(i) => write!(f, "{i}"),
            InputValue::Float(float) => f.write_str(ryu::Buffer::new().format_finite(*float)),
            InputValue::String(s) => write_string(f, s),
            InputValue::Enum(name) => write!(f, "{name}"),
            InputValue::List(items) => write!(
                f,
                "{}",
                DisplaySeparated {
                    open: "[",
                    items,
                    close: "]",
                }
            ),
            InputValue::Object(fields) => {
                f.write_char('{')?;
                for (index, (name, value)) in fields.iter().enumerate() {
                    if index != 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_char('}')
            }
            InputValue::Variable(name) => write!(f, "${name}"),
        }
    }
}

fn write_string(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{8}' => f.write_str("\\b")?,
            '\u{c}' => f.write_str("\\f")?,
            c if c.is_control() => write!(f, "\\u{:04X}", c as u32)?,
            c => f.write_char(c)?,
        }
    }
    f.write_char('"')
}
