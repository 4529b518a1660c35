//! Owned selection tree of a delegated field.
//!
//! The host executor hands the crate the field being resolved as a [`Field`]. [`root_fields`]
//! builds those from a parsed client operation, expanding fragment spreads so that a field
//! carries everything needed to print it without the rest of the client document.

use std::collections::HashMap;
use std::fmt;

use apollo_compiler::ast;
use apollo_compiler::Name;
use apollo_compiler::Node;

use crate::display_helpers::write_block;
use crate::display_helpers::DisplaySeparated;
use crate::display_helpers::State;
use crate::error::DelegationError;
use crate::error::SelectionError;
use crate::value::InputValue;
use crate::variables::VariableValues;

/// A requested field, with its arguments and child selections.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub alias: Option<Name>,
    pub name: Name,
    pub arguments: Vec<Argument>,
    pub directives: Vec<Directive>,
    /// Empty for leaf fields.
    pub selection_set: Vec<Selection>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field(Field),
    InlineFragment(InlineFragment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct InlineFragment {
    pub type_condition: Option<Name>,
    pub directives: Vec<Directive>,
    pub selection_set: Vec<Selection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: Name,
    pub value: InputValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub name: Name,
    pub arguments: Vec<Argument>,
}

impl Field {
    /// A leaf field without arguments.
    pub fn new(name: Name) -> Self {
        Self {
            alias: None,
            name,
            arguments: Vec::new(),
            directives: Vec::new(),
            selection_set: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: Name) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn with_argument(mut self, name: Name, value: InputValue) -> Self {
        self.arguments.push(Argument { name, value });
        self
    }

    pub fn with_selection(mut self, selection: impl Into<Selection>) -> Self {
        self.selection_set.push(selection.into());
        self
    }

    /// The key this field's value is stored under in a response.
    pub fn response_key(&self) -> &Name {
        self.alias.as_ref().unwrap_or(&self.name)
    }

    /// Returns a copy where every variable reference is replaced by its bound value.
    pub fn bind_variables(&self, variables: &VariableValues) -> Result<Field, DelegationError> {
        Ok(Field {
            alias: self.alias.clone(),
            name: self.name.clone(),
            arguments: bind_arguments(&self.arguments, variables)?,
            directives: bind_directives(&self.directives, variables)?,
            selection_set: bind_selection_set(&self.selection_set, variables)?,
        })
    }

    pub(crate) fn write(&self, state: &mut State<'_, '_>) -> fmt::Result {
        if let Some(alias) = &self.alias {
            state.write(format_args!("{alias}: "))?;
        }
        state.write(&self.name)?;
        write_arguments(state, &self.arguments)?;
        write_directives(state, &self.directives)?;
        write_selection_set(state, &self.selection_set)
    }
}

impl From<Field> for Selection {
    fn from(field: Field) -> Self {
        Selection::Field(field)
    }
}

impl From<InlineFragment> for Selection {
    fn from(fragment: InlineFragment) -> Self {
        Selection::InlineFragment(fragment)
    }
}

impl Selection {
    fn bind_variables(&self, variables: &VariableValues) -> Result<Selection, DelegationError> {
        Ok(match self {
            Selection::Field(field) => Selection::Field(field.bind_variables(variables)?),
            Selection::InlineFragment(fragment) => Selection::InlineFragment(InlineFragment {
                type_condition: fragment.type_condition.clone(),
                directives: bind_directives(&fragment.directives, variables)?,
                selection_set: bind_selection_set(&fragment.selection_set, variables)?,
            }),
        })
    }

    fn write(&self, state: &mut State<'_, '_>) -> fmt::Result {
        match self {
            Selection::Field(field) => field.write(state),
            Selection::InlineFragment(fragment) => {
                state.write("...")?;
                if let Some(type_condition) = &fragment.type_condition {
                    state.write(format_args!(" on {type_condition}"))?;
                }
                write_directives(state, &fragment.directives)?;
                write_selection_set(state, &fragment.selection_set)
            }
        }
    }
}

fn bind_arguments(
    arguments: &[Argument],
    variables: &VariableValues,
) -> Result<Vec<Argument>, DelegationError> {
    arguments
        .iter()
        .map(|argument| {
            Ok(Argument {
                name: argument.name.clone(),
                value: argument.value.clone().bind_variables(variables)?,
            })
        })
        .collect()
}

fn bind_directives(
    directives: &[Directive],
    variables: &VariableValues,
) -> Result<Vec<Directive>, DelegationError> {
    directives
        .iter()
        .map(|directive| {
            Ok(Directive {
                name: directive.name.clone(),
                arguments: bind_arguments(&directive.arguments, variables)?,
            })
        })
        .collect()
}

fn bind_selection_set(
    selection_set: &[Selection],
    variables: &VariableValues,
) -> Result<Vec<Selection>, DelegationError> {
    selection_set
        .iter()
        .map(|selection| selection.bind_variables(variables))
        .collect()
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.value)
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.arguments.is_empty() {
            let arguments = DisplaySeparated {
                open: "(",
                items: &self.arguments,
                close: ")",
            };
            write!(f, "{arguments}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write(&mut State::new(f))
    }
}

fn write_arguments(state: &mut State<'_, '_>, arguments: &[Argument]) -> fmt::Result {
    if arguments.is_empty() {
        return Ok(());
    }
    state.write(DisplaySeparated {
        open: "(",
        items: arguments,
        close: ")",
    })
}

fn write_directives(state: &mut State<'_, '_>, directives: &[Directive]) -> fmt::Result {
    directives
        .iter()
        .try_for_each(|directive| state.write(format_args!(" {directive}")))
}

pub(crate) fn write_selection_set(
    state: &mut State<'_, '_>,
    selection_set: &[Selection],
) -> fmt::Result {
    write_block(state, selection_set, |state, selection| selection.write(state))
}

/// Converts the root fields of an operation in a parsed client document.
///
/// With no `operation_name`, the first operation of the document is used. Fragment spreads are
/// replaced by inline fragments on the fragment's type condition.
pub fn root_fields(
    document: &ast::Document,
    operation_name: Option<&str>,
) -> Result<Vec<Field>, SelectionError> {
    let mut operations = document
        .definitions
        .iter()
        .filter_map(|definition| match definition {
            ast::Definition::OperationDefinition(operation) => Some(operation),
            _ => None,
        });
    let operation = match operation_name {
        Some(name) => operations
            .find(|operation| operation.name.as_ref().is_some_and(|n| n.as_str() == name))
            .ok_or_else(|| SelectionError::UnknownOperation {
                name: name.to_owned(),
            })?,
        None => operations.next().ok_or(SelectionError::MissingOperation)?,
    };

    let converter = Converter::new(document);
    let mut fields = Vec::new();
    converter.collect_root_fields(&operation.selection_set, &mut fields, &mut Vec::new())?;
    Ok(fields)
}

impl Field {
    /// Converts a single field of a parsed client document.
    ///
    /// `document` is used to look up the fragments spread inside the field.
    pub fn from_ast(field: &ast::Field, document: &ast::Document) -> Result<Self, SelectionError> {
        Converter::new(document).field(field, &mut Vec::new())
    }
}

struct Converter<'doc> {
    fragments: HashMap<&'doc Name, &'doc Node<ast::FragmentDefinition>>,
}

impl<'doc> Converter<'doc> {
    fn new(document: &'doc ast::Document) -> Self {
        let fragments = document
            .definitions
            .iter()
            .filter_map(|definition| match definition {
                ast::Definition::FragmentDefinition(fragment) => Some((&fragment.name, fragment)),
                _ => None,
            })
            .collect();
        Self { fragments }
    }

    fn fragment(
        &self,
        name: &Name,
        visiting: &[Name],
    ) -> Result<&'doc Node<ast::FragmentDefinition>, SelectionError> {
        if visiting.contains(name) {
            return Err(SelectionError::FragmentCycle { name: name.clone() });
        }
        self.fragments
            .get(name)
            .copied()
            .ok_or_else(|| SelectionError::UnknownFragment { name: name.clone() })
    }

    /// Root fields of an operation, looking through fragments at the top level.
    fn collect_root_fields(
        &self,
        selection_set: &[ast::Selection],
        fields: &mut Vec<Field>,
        visiting: &mut Vec<Name>,
    ) -> Result<(), SelectionError> {
        for selection in selection_set {
            match selection {
                ast::Selection::Field(field) => fields.push(self.field(field, visiting)?),
                ast::Selection::InlineFragment(fragment) => {
                    self.collect_root_fields(&fragment.selection_set, fields, visiting)?
                }
                ast::Selection::FragmentSpread(spread) => {
                    let fragment = self.fragment(&spread.fragment_name, visiting)?;
                    visiting.push(spread.fragment_name.clone());
                    self.collect_root_fields(&fragment.selection_set, fields, visiting)?;
                    visiting.pop();
                }
            }
        }
        Ok(())
    }

    fn field(&self, field: &ast::Field, visiting: &mut Vec<Name>) -> Result<Field, SelectionError> {
        Ok(Field {
            alias: field.alias.clone(),
            name: field.name.clone(),
            arguments: arguments(&field.arguments)?,
            directives: directives(&field.directives)?,
            selection_set: self.selection_set(&field.selection_set, visiting)?,
        })
    }

    fn selection_set(
        &self,
        selection_set: &[ast::Selection],
        visiting: &mut Vec<Name>,
    ) -> Result<Vec<Selection>, SelectionError> {
        selection_set
            .iter()
            .map(|selection| {
                Ok(match selection {
                    ast::Selection::Field(field) => Selection::Field(self.field(field, visiting)?),
                    ast::Selection::InlineFragment(fragment) => {
                        Selection::InlineFragment(InlineFragment {
                            type_condition: fragment.type_condition.clone(),
                            directives: directives(&fragment.directives)?,
                            selection_set: self.selection_set(&fragment.selection_set, visiting)?,
                        })
                    }
                    ast::Selection::FragmentSpread(spread) => {
                        let fragment = self.fragment(&spread.fragment_name, visiting)?;
                        visiting.push(spread.fragment_name.clone());
                        let selection_set = self.selection_set(&fragment.selection_set, visiting);
                        visiting.pop();
                        Selection::InlineFragment(InlineFragment {
                            type_condition: Some(fragment.type_condition.clone()),
                            directives: directives(&spread.directives)?,
                            selection_set: selection_set?,
                        })
                    }
                })
            })
            .collect()
    }
}

fn arguments(arguments: &[Node<ast::Argument>]) -> Result<Vec<Argument>, SelectionError> {
    arguments
        .iter()
        .map(|argument| {
            Ok(Argument {
                name: argument.name.clone(),
                value: InputValue::from_ast(&argument.value)?,
            })
        })
        .collect()
}

fn directives(directives: &ast::DirectiveList) -> Result<Vec<Directive>, SelectionError> {
    directives
        .iter()
        .map(|directive| {
            Ok(Directive {
                name: directive.name.clone(),
                arguments: arguments(&directive.arguments)?,
            })
        })
        .collect()
}
