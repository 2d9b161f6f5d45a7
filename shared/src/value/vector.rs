use naia_serde::SerdeInternal;

// Fixed-size float tuples, one f32 per axis on the wire.
macro_rules! impl_axes {
    ($name:ident { $($field:ident),+ }) => {
        #[derive(Clone, Copy, Debug, Default, PartialEq, SerdeInternal)]
        pub struct $name {
            $(pub $field: f32,)+
        }

        impl $name {
            pub fn new($($field: f32),+) -> Self {
                Self { $($field),+ }
            }

            /// Axis values in declaration order.
            pub fn axes(&self) -> Vec<f32> {
                vec![$(self.$field),+]
            }

            /// Builds a value from axes in declaration order. Returns `None`
            /// if the slice has the wrong length.
            pub fn from_axes(axes: &[f32]) -> Option<Self> {
                let mut iter = axes.iter();
                let output = Self {
                    $($field: *iter.next()?,)+
                };
                if iter.next().is_some() {
                    return None;
                }
                Some(output)
            }
        }
    };
}

impl_axes!(Vector2 { x, y });
impl_axes!(Vector3 { x, y, z });
impl_axes!(Vector4 { x, y, z, w });
impl_axes!(Colour { r, g, b, a });
