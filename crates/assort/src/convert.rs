//! Conversion protocols.
//!
//! Elements declare how they reduce to plain data by implementing one or
//! more of [`ToArray`], [`ToStringValue`] and [`ToInt`], and by exposing
//! those capabilities through [`Element`]. The
//! [normalizer](crate::normalize::normalize) queries the capabilities in a
//! fixed priority order.

use std::fmt;

use serde_json::Value;

use crate::filter::FilterItem;
use crate::normalize::normalize;

/// Reduces a value to a plain array or mapping.
///
/// The returned value is trusted to already be plain data; it is not
/// normalized again.
pub trait ToArray {
    fn to_array(&self) -> Value;
}

/// Reduces a value to its explicit string form.
pub trait ToStringValue {
    fn to_string_value(&self) -> String;
}

/// Reduces a value to an integer.
pub trait ToInt {
    fn to_int(&self) -> i64;
}

/// Capabilities an element exposes to collections.
///
/// Each capability accessor returns `None` by default. Override the ones the type
/// supports; [`plain`](Element::plain) is the fallback used when no
/// conversion protocol applies.
///
/// # Example
///
/// ```
/// use assort::{normalize, Element, ToInt};
///
/// struct Priority(u8);
///
/// impl ToInt for Priority {
///     fn to_int(&self) -> i64 {
///         self.0 as i64
///     }
/// }
///
/// impl Element for Priority {
///     fn as_to_int(&self) -> Option<&dyn ToInt> {
///         Some(self)
///     }
/// }
///
/// assert_eq!(normalize(&Priority(3)), serde_json::json!(3));
/// ```
pub trait Element {
    /// Array-convertible capability.
    fn as_to_array(&self) -> Option<&dyn ToArray> {
        None
    }

    /// String-convertible capability.
    fn as_to_string(&self) -> Option<&dyn ToStringValue> {
        None
    }

    /// Int-convertible capability.
    fn as_to_int(&self) -> Option<&dyn ToInt> {
        None
    }

    /// Generic textual representation, lower priority than
    /// [`as_to_string`](Element::as_to_string).
    fn as_display(&self) -> Option<&dyn fmt::Display> {
        None
    }

    /// Filterable-item capability used by filters and grouping.
    fn as_filter_item(&self) -> Option<&dyn FilterItem> {
        None
    }

    /// The element itself as plain data.
    fn plain(&self) -> Value {
        Value::Null
    }
}

macro_rules! impl_plain_element {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Element for $ty {
                fn plain(&self) -> Value {
                    Value::from(*self)
                }
            }
        )*
    };
}

impl_plain_element!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool);

impl Element for char {
    fn plain(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl Element for String {
    fn plain(&self) -> Value {
        Value::String(self.clone())
    }
}

impl Element for &'static str {
    fn plain(&self) -> Value {
        Value::String((*self).to_string())
    }
}

impl Element for Value {
    fn plain(&self) -> Value {
        self.clone()
    }
}

impl<T: Element> Element for Option<T> {
    fn as_to_array(&self) -> Option<&dyn ToArray> {
        self.as_ref().and_then(Element::as_to_array)
    }

    fn as_to_string(&self) -> Option<&dyn ToStringValue> {
        self.as_ref().and_then(Element::as_to_string)
    }

    fn as_to_int(&self) -> Option<&dyn ToInt> {
        self.as_ref().and_then(Element::as_to_int)
    }

    fn as_display(&self) -> Option<&dyn fmt::Display> {
        self.as_ref().and_then(Element::as_display)
    }

    fn as_filter_item(&self) -> Option<&dyn FilterItem> {
        self.as_ref().and_then(Element::as_filter_item)
    }

    fn plain(&self) -> Value {
        self.as_ref().map_or(Value::Null, Element::plain)
    }
}

impl<T: Element> Element for Box<T> {
    fn as_to_array(&self) -> Option<&dyn ToArray> {
        (**self).as_to_array()
    }

    fn as_to_string(&self) -> Option<&dyn ToStringValue> {
        (**self).as_to_string()
    }

    fn as_to_int(&self) -> Option<&dyn ToInt> {
        (**self).as_to_int()
    }

    fn as_display(&self) -> Option<&dyn fmt::Display> {
        (**self).as_display()
    }

    fn as_filter_item(&self) -> Option<&dyn FilterItem> {
        (**self).as_filter_item()
    }

    fn plain(&self) -> Value {
        (**self).plain()
    }
}

impl<T: Element> ToArray for Vec<T> {
    fn to_array(&self) -> Value {
        Value::Array(self.iter().map(normalize).collect())
    }
}

impl<T: Element> Element for Vec<T> {
    fn as_to_array(&self) -> Option<&dyn ToArray> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Both;

    impl ToArray for Both {
        fn to_array(&self) -> Value {
            json!({"kind": "both"})
        }
    }

    impl ToStringValue for Both {
        fn to_string_value(&self) -> String {
            "both".to_string()
        }
    }

    impl Element for Both {
        fn as_to_array(&self) -> Option<&dyn ToArray> {
            Some(self)
        }

        fn as_to_string(&self) -> Option<&dyn ToStringValue> {
            Some(self)
        }
    }

    #[test]
    fn primitives_are_plain() {
        assert_eq!(42i32.plain(), json!(42));
        assert_eq!(7u8.plain(), json!(7));
        assert_eq!(true.plain(), json!(true));
        assert_eq!(1.5f64.plain(), json!(1.5));
        assert_eq!('x'.plain(), json!("x"));
        assert_eq!("abc".plain(), json!("abc"));
        assert_eq!(String::from("abc").plain(), json!("abc"));
        assert!(42i32.as_to_array().is_none());
        assert!(42i32.as_filter_item().is_none());
    }

    #[test]
    fn option_forwards_capabilities() {
        let some = Some(Both);
        assert!(some.as_to_array().is_some());
        assert!(some.as_to_string().is_some());

        let none: Option<Both> = None;
        assert!(none.as_to_array().is_none());
        assert_eq!(none.plain(), Value::Null);
        assert_eq!(Some(3i64).plain(), json!(3));
    }

    #[test]
    fn vec_is_array_convertible() {
        let values = vec![1i64, 2, 3];
        let array = values.as_to_array().map(|a| a.to_array());
        assert_eq!(array, Some(json!([1, 2, 3])));
    }

    #[test]
    fn boxed_elements_forward() {
        let boxed = Box::new(Both);
        assert!(boxed.as_to_array().is_some());
        assert_eq!(Box::new(5i64).plain(), json!(5));
    }
}
