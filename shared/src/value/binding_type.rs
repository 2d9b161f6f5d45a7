use naia_serde::SerdeInternal;

/// Runtime type tag carried by every [`Value`](crate::Value). Nine variants,
/// so the derived wire tag is four bits wide.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, SerdeInternal)]
pub enum BindingType {
    Bool,
    Integer,
    Real,
    String,
    Enum,
    Vector2,
    Vector3,
    Vector4,
    Colour,
}

impl BindingType {
    /// Types whose bounds are checked one axis at a time.
    pub fn is_multi_axis(&self) -> bool {
        matches!(
            self,
            BindingType::Vector2 | BindingType::Vector3 | BindingType::Vector4 | BindingType::Colour
        )
    }

    /// Types that convert freely between each other.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            BindingType::Bool | BindingType::Integer | BindingType::Real | BindingType::Enum
        )
    }
}

