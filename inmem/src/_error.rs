use conclude_api::concept::ValueType;
use conclude_api::label::Label;
use thiserror::Error;

use crate::schema::TypeKind;

/// Type alias for `Result` with default error `SchemaError`.
///
/// Can be used like `std::result::Result` as well.
pub type Result<T, E = SchemaError> = std::result::Result<T, E>;

/// This error is raised when a declaration or a lookup in a [`Schema`](crate::Schema) fails.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The label is not declared in the schema.
    #[error("The type '{0}' is not defined")]
    UnknownLabel(Label),
    /// The label is already declared in the schema.
    #[error("The type '{0}' is already defined")]
    DuplicateLabel(Label),
    /// The label names a type of another kind than expected.
    #[error("The type '{label}' is not {expected}")]
    KindMismatch {
        /// The faulty label.
        label: Label,
        /// The kind the label was expected to have.
        expected: TypeKind,
    },
    /// The value does not match the value type of the attribute type.
    #[error("The type '{label}' holds values of type {expected:?}, not {found:?}")]
    ValueTypeMismatch {
        /// The attribute type.
        label: Label,
        /// Its value type, if any.
        expected: Option<ValueType>,
        /// The value type found instead.
        found: ValueType,
    },
}
