use crate::props::Value;
use crate::vnode::{VNode, create_text_element};

/// Trait for values that can appear in a child list.
///
/// Virtual nodes pass through unchanged. Primitive values are wrapped into
/// text nodes whose `nodeValue` keeps the primitive value, so a child list
/// never holds anything but [`VNode`]s.
pub trait IntoChild {
    fn into_child(self) -> VNode;
}

impl IntoChild for VNode {
    fn into_child(self) -> VNode {
        self
    }
}

impl IntoChild for &VNode {
    fn into_child(self) -> VNode {
        self.clone()
    }
}

// Every primitive that converts into a Value becomes a text node
macro_rules! impl_text_child {
    ($($ty:ty),*) => {
        $(
            impl IntoChild for $ty {
                fn into_child(self) -> VNode {
                    create_text_element(Value::from(self))
                }
            }
        )*
    };
}

impl_text_child!(
    &str, String, &String, char, bool, f32, f64, i8, i16, i32, i64, isize, u8, u16, u32, u64,
    usize
);

impl IntoChild for Value {
    fn into_child(self) -> VNode {
        create_text_element(self)
    }
}
