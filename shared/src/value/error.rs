use thiserror::Error;

use crate::value::binding_type::BindingType;

/// Errors raised while coercing or comparing dynamically typed values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The value cannot be represented as the requested type
    #[error("Cannot convert a value of type {from:?} to type {to:?}")]
    IncompatibleType { from: BindingType, to: BindingType },

    /// A string could not be parsed as the requested scalar type
    #[error("Cannot parse '{text}' as {to:?}")]
    Unparsable { text: String, to: BindingType },

    /// Two values have no defined ordering (NaN, or a multi-axis type compared as a scalar)
    #[error("Values of type {binding_type:?} cannot be ordered")]
    NotComparable { binding_type: BindingType },
}
