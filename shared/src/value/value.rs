use std::{cmp::Ordering, fmt};

use naia_serde::{BitReader, BitWrite, Serde, SerdeErr};

use crate::value::{
    binding_type::BindingType,
    error::ValueError,
    vector::{Colour, Vector2, Vector3, Vector4},
};

/// A dynamically typed property value. The variant is the runtime type tag.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Bool(bool),
    Integer(i64),
    Real(f64),
    String(String),
    /// Enumerations travel as their integer discriminant.
    Enum(i64),
    Vector2(Vector2),
    Vector3(Vector3),
    Vector4(Vector4),
    Colour(Colour),
}

impl Value {
    pub fn binding_type(&self) -> BindingType {
        match self {
            Value::Bool(_) => BindingType::Bool,
            Value::Integer(_) => BindingType::Integer,
            Value::Real(_) => BindingType::Real,
            Value::String(_) => BindingType::String,
            Value::Enum(_) => BindingType::Enum,
            Value::Vector2(_) => BindingType::Vector2,
            Value::Vector3(_) => BindingType::Vector3,
            Value::Vector4(_) => BindingType::Vector4,
            Value::Colour(_) => BindingType::Colour,
        }
    }

    /// Converts this value to `target`. Numeric types (bool, integer, real,
    /// enum) convert between each other and to/from strings; multi-axis types
    /// only convert to themselves.
    pub fn coerce_to(&self, target: BindingType) -> Result<Value, ValueError> {
        let from = self.binding_type();
        if from == target {
            return Ok(self.clone());
        }

        let incompatible = ValueError::IncompatibleType { from, to: target };

        if from.is_multi_axis() || target.is_multi_axis() {
            return Err(incompatible);
        }

        match target {
            BindingType::String => Ok(Value::String(self.to_string())),
            BindingType::Bool => match self {
                Value::Integer(v) | Value::Enum(v) => Ok(Value::Bool(*v != 0)),
                Value::Real(v) => Ok(Value::Bool(*v != 0.0)),
                Value::String(text) => match text.trim() {
                    "true" | "1" => Ok(Value::Bool(true)),
                    "false" | "0" => Ok(Value::Bool(false)),
                    _ => Err(ValueError::Unparsable {
                        text: text.clone(),
                        to: target,
                    }),
                },
                _ => Err(incompatible),
            },
            BindingType::Integer | BindingType::Enum => {
                let integer = match self {
                    Value::Bool(v) => i64::from(*v),
                    Value::Integer(v) | Value::Enum(v) => *v,
                    Value::Real(v) => real_to_integer(*v).ok_or(incompatible)?,
                    Value::String(text) => text.trim().parse::<i64>().map_err(|_| {
                        ValueError::Unparsable {
                            text: text.clone(),
                            to: target,
                        }
                    })?,
                    _ => return Err(incompatible),
                };
                if target == BindingType::Enum {
                    Ok(Value::Enum(integer))
                } else {
                    Ok(Value::Integer(integer))
                }
            }
            BindingType::Real => match self {
                Value::Bool(v) => Ok(Value::Real(if *v { 1.0 } else { 0.0 })),
                Value::Integer(v) | Value::Enum(v) => Ok(Value::Real(*v as f64)),
                Value::String(text) => text.trim().parse::<f64>().map(Value::Real).map_err(|_| {
                    ValueError::Unparsable {
                        text: text.clone(),
                        to: target,
                    }
                }),
                _ => Err(incompatible),
            },
            _ => Err(incompatible),
        }
    }

    /// Orders two scalar values of the same type. Callers coerce first.
    pub fn compare(&self, other: &Value) -> Result<Ordering, ValueError> {
        let binding_type = self.binding_type();
        let not_comparable = ValueError::NotComparable { binding_type };

        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => Ok(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Ok(a.cmp(b)),
            (Value::Enum(a), Value::Enum(b)) => Ok(a.cmp(b)),
            (Value::Real(a), Value::Real(b)) => a.partial_cmp(b).ok_or(not_comparable),
            (Value::String(a), Value::String(b)) => Ok(a.cmp(b)),
            (a, b) if a.binding_type() != b.binding_type() => Err(ValueError::IncompatibleType {
                from: b.binding_type(),
                to: binding_type,
            }),
            _ => Err(not_comparable),
        }
    }

    /// Per-axis components for multi-axis types, `None` for scalars.
    pub fn axes(&self) -> Option<Vec<f32>> {
        match self {
            Value::Vector2(v) => Some(v.axes()),
            Value::Vector3(v) => Some(v.axes()),
            Value::Vector4(v) => Some(v.axes()),
            Value::Colour(v) => Some(v.axes()),
            _ => None,
        }
    }

    /// Rebuilds a multi-axis value of the same type from `axes`.
    pub fn with_axes(&self, axes: &[f32]) -> Option<Value> {
        match self {
            Value::Vector2(_) => Vector2::from_axes(axes).map(Value::Vector2),
            Value::Vector3(_) => Vector3::from_axes(axes).map(Value::Vector3),
            Value::Vector4(_) => Vector4::from_axes(axes).map(Value::Vector4),
            Value::Colour(_) => Colour::from_axes(axes).map(Value::Colour),
            _ => None,
        }
    }
}

fn real_to_integer(value: f64) -> Option<i64> {
    if !value.is_finite() || value < i64::MIN as f64 || value > i64::MAX as f64 {
        return None;
    }
    Some(value.trunc() as i64)
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(v) => write!(f, "{}", v),
            Value::Integer(v) | Value::Enum(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{}", v),
            Value::Vector2(v) => write!(f, "({}, {})", v.x, v.y),
            Value::Vector3(v) => write!(f, "({}, {}, {})", v.x, v.y, v.z),
            Value::Vector4(v) => write!(f, "({}, {}, {}, {})", v.x, v.y, v.z, v.w),
            Value::Colour(v) => write!(f, "rgba({}, {}, {}, {})", v.r, v.g, v.b, v.a),
        }
    }
}

impl Serde for Value {
    fn ser(&self, writer: &mut dyn BitWrite) {
        self.binding_type().ser(writer);
        match self {
            Value::Bool(v) => v.ser(writer),
            Value::Integer(v) | Value::Enum(v) => v.ser(writer),
            Value::Real(v) => v.ser(writer),
            Value::String(v) => v.ser(writer),
            Value::Vector2(v) => v.ser(writer),
            Value::Vector3(v) => v.ser(writer),
            Value::Vector4(v) => v.ser(writer),
            Value::Colour(v) => v.ser(writer),
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let value = match BindingType::de(reader)? {
            BindingType::Bool => Value::Bool(bool::de(reader)?),
            BindingType::Integer => Value::Integer(i64::de(reader)?),
            BindingType::Real => Value::Real(f64::de(reader)?),
            BindingType::String => Value::String(String::de(reader)?),
            BindingType::Enum => Value::Enum(i64::de(reader)?),
            BindingType::Vector2 => Value::Vector2(Vector2::de(reader)?),
            BindingType::Vector3 => Value::Vector3(Vector3::de(reader)?),
            BindingType::Vector4 => Value::Vector4(Vector4::de(reader)?),
            BindingType::Colour => Value::Colour(Colour::de(reader)?),
        };
        Ok(value)
    }

    fn bit_length(&self) -> u32 {
        let payload = match self {
            Value::Bool(v) => v.bit_length(),
            Value::Integer(v) | Value::Enum(v) => v.bit_length(),
            Value::Real(v) => v.bit_length(),
            Value::String(v) => v.bit_length(),
            Value::Vector2(v) => v.bit_length(),
            Value::Vector3(v) => v.bit_length(),
            Value::Vector4(v) => v.bit_length(),
            Value::Colour(v) => v.bit_length(),
        };
        self.binding_type().bit_length() + payload
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Real(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vector2> for Value {
    fn from(value: Vector2) -> Self {
        Value::Vector2(value)
    }
}

impl From<Vector3> for Value {
    fn from(value: Vector3) -> Self {
        Value::Vector3(value)
    }
}

impl From<Vector4> for Value {
    fn from(value: Vector4) -> Self {
        Value::Vector4(value)
    }
}

impl From<Colour> for Value {
    fn from(value: Colour) -> Self {
        Value::Colour(value)
    }
}
