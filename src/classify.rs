use crate::config::SetterArity;
use crate::operation::{Operation, OperationTable};
use crate::types::TypeInfo;
use log::{debug, trace};

pub const GETTER_PREFIX: &str = "get";
pub const SETTER_PREFIX: &str = "set";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorKind {
    Getter,
    Setter,
}

/// An operation recognised as reading or writing a named property.
#[derive(Debug, Clone, Copy)]
pub struct Accessor<'a> {
    kind: AccessorKind,
    property: &'a str,
    operation: &'a Operation,
}

impl<'a> Accessor<'a> {
    pub fn kind(&self) -> AccessorKind {
        self.kind
    }

    /// Operation name with the `get`/`set` prefix removed
    pub fn property(&self) -> &'a str {
        self.property
    }

    pub fn operation(&self) -> &'a Operation {
        self.operation
    }

    /// Type produced by a getter, or accepted by a setter's first
    /// parameter. `None` for a setter without parameters.
    pub fn value_type(&self) -> Option<&'a TypeInfo> {
        match self.kind {
            AccessorKind::Getter => Some(self.operation.returns()),
            AccessorKind::Setter => self.operation.params().first(),
        }
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{85}' | '\u{2028}' | '\u{2029}')
}

/// Strip `prefix` off `name`, requiring at least one more character and
/// no line breaks in the remainder.
fn property_name<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    name.strip_prefix(prefix)
        .filter(|rest| !rest.is_empty() && !rest.contains(is_line_terminator))
}

/// Classify `operation` as a getter: a `get...` name, no parameters and a
/// non-unit result.
pub fn getter(operation: &Operation) -> Option<Accessor<'_>> {
    let property = property_name(operation.name(), GETTER_PREFIX)?;
    if !operation.params().is_empty() || operation.returns().is_unit() {
        return None;
    }
    Some(Accessor {
        kind: AccessorKind::Getter,
        property,
        operation,
    })
}

/// Classify `operation` as a setter: a `set...` name, and under
/// [`SetterArity::Strict`] exactly one parameter.
pub fn setter(operation: &Operation, arity: SetterArity) -> Option<Accessor<'_>> {
    let property = property_name(operation.name(), SETTER_PREFIX)?;
    if arity == SetterArity::Strict && operation.params().len() != 1 {
        debug!(
            "skipping `{}`: takes {} parameters",
            operation.name(),
            operation.params().len()
        );
        return None;
    }
    Some(Accessor {
        kind: AccessorKind::Setter,
        property,
        operation,
    })
}

/// All public getters of a type, in table order
pub fn getters<T>(table: &OperationTable<T>) -> Vec<Accessor<'_>>
where
    T: 'static,
{
    table
        .public()
        .filter_map(getter)
        .inspect(|g| trace!("getter `{}` -> property `{}`", g.operation.name(), g.property))
        .collect()
}

/// All public setters of a type, in table order
pub fn setters<T>(table: &OperationTable<T>, arity: SetterArity) -> Vec<Accessor<'_>>
where
    T: 'static,
{
    table
        .public()
        .filter_map(|op| setter(op, arity))
        .inspect(|s| trace!("setter `{}` -> property `{}`", s.operation.name(), s.property))
        .collect()
}
