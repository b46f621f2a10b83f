//! Value types a bindable field may declare, and how raw property strings
//! are converted into them.
//!
//! | Target   | Accepted text                                                        |
//! |----------|----------------------------------------------------------------------|
//! | string   | verbatim, no trimming                                                |
//! | bool     | `true` / `false`, ASCII case-insensitive, surrounding whitespace trimmed |
//! | char     | exactly one character, not trimmed                                   |
//! | integers | optional sign and decimal digits, surrounding whitespace trimmed     |
//! | floats   | Rust float syntax, surrounding whitespace trimmed, finite values only |

use std::fmt;

use serde::Serialize;
use uuid::Uuid;

/// The declared type of a bindable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
}

impl ValueType {
    /// Short lowercase name used in diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Bool => "bool",
            ValueType::Char => "char",
            ValueType::I8 => "i8",
            ValueType::I16 => "i16",
            ValueType::I32 => "i32",
            ValueType::I64 => "i64",
            ValueType::U8 => "u8",
            ValueType::U16 => "u16",
            ValueType::U32 => "u32",
            ValueType::U64 => "u64",
            ValueType::F32 => "f32",
            ValueType::F64 => "f64",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A Rust type that can be bound from a single property string.
pub trait PropertyValue: Sized {
    const VALUE_TYPE: ValueType;

    /// Converts raw property text. The error is a human-readable reason.
    fn parse_property(raw: &str) -> Result<Self, String>;

    /// Canonical text form, such that `parse_property(render)` yields an equal value.
    /// Returns `None` when the value is unset.
    fn render(&self) -> Option<String>;

    /// Produces a value derived from `seed`, within the type's representable domain.
    fn synthesize(seed: Uuid) -> Self;
}

impl PropertyValue for String {
    const VALUE_TYPE: ValueType = ValueType::String;

    fn parse_property(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn render(&self) -> Option<String> {
        Some(self.clone())
    }

    fn synthesize(seed: Uuid) -> Self {
        seed.to_string()
    }
}

impl PropertyValue for bool {
    const VALUE_TYPE: ValueType = ValueType::Bool;

    fn parse_property(raw: &str) -> Result<Self, String> {
        let s = raw.trim();
        if s.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if s.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err("expected `true` or `false`".to_string())
        }
    }

    fn render(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn synthesize(seed: Uuid) -> Self {
        seed.as_u128() & 1 == 1
    }
}

impl PropertyValue for char {
    const VALUE_TYPE: ValueType = ValueType::Char;

    fn parse_property(raw: &str) -> Result<Self, String> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err("expected exactly one character".to_string()),
        }
    }

    fn render(&self) -> Option<String> {
        Some(self.to_string())
    }

    fn synthesize(seed: Uuid) -> Self {
        const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
        ALPHABET[(seed.as_u128() % ALPHABET.len() as u128) as usize] as char
    }
}

macro_rules! impl_integer {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl PropertyValue for $ty {
                const VALUE_TYPE: ValueType = ValueType::$variant;

                fn parse_property(raw: &str) -> Result<Self, String> {
                    raw.trim().parse::<$ty>().map_err(|e| e.to_string())
                }

                fn render(&self) -> Option<String> {
                    Some(self.to_string())
                }

                fn synthesize(seed: Uuid) -> Self {
                    // Truncation keeps the low bits, covering the whole domain.
                    seed.as_u128() as $ty
                }
            }
        )*
    };
}

impl_integer!(
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
);

macro_rules! impl_float {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl PropertyValue for $ty {
                const VALUE_TYPE: ValueType = ValueType::$variant;

                fn parse_property(raw: &str) -> Result<Self, String> {
                    let value = raw.trim().parse::<$ty>().map_err(|e| e.to_string())?;
                    if value.is_finite() {
                        Ok(value)
                    } else {
                        Err("non-finite values are not accepted".to_string())
                    }
                }

                fn render(&self) -> Option<String> {
                    Some(self.to_string())
                }

                fn synthesize(seed: Uuid) -> Self {
                    (seed.as_u128() as u32) as $ty / 64.0
                }
            }
        )*
    };
}

impl_float!(f32 => F32, f64 => F64);

impl<V: PropertyValue> PropertyValue for Option<V> {
    const VALUE_TYPE: ValueType = V::VALUE_TYPE;

    fn parse_property(raw: &str) -> Result<Self, String> {
        V::parse_property(raw).map(Some)
    }

    fn render(&self) -> Option<String> {
        self.as_ref().and_then(PropertyValue::render)
    }

    fn synthesize(seed: Uuid) -> Self {
        Some(V::synthesize(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_is_verbatim() {
        assert_eq!(String::parse_property("  spaced  ").unwrap(), "  spaced  ");
        assert_eq!(String::parse_property("").unwrap(), "");
    }

    #[test]
    fn test_bool_table() {
        assert!(bool::parse_property("true").unwrap());
        assert!(bool::parse_property(" TRUE ").unwrap());
        assert!(!bool::parse_property("False").unwrap());
        for rejected in ["1", "0", "yes", "no", "on", "off", ""] {
            assert!(bool::parse_property(rejected).is_err(), "{rejected:?}");
        }
    }

    #[test]
    fn test_integer_parsing() {
        assert_eq!(i64::parse_property(" 500 ").unwrap(), 500);
        assert_eq!(i32::parse_property("-42").unwrap(), -42);
        assert_eq!(u16::parse_property("+8080").unwrap(), 8080);
        assert!(u8::parse_property("256").is_err());
        assert!(u32::parse_property("-1").is_err());
        assert!(i64::parse_property("0x10").is_err());
        assert!(i64::parse_property("1_000").is_err());
        assert!(i64::parse_property("abc").is_err());
    }

    #[test]
    fn test_float_rejects_non_finite() {
        assert_eq!(f64::parse_property("2.5").unwrap(), 2.5);
        assert!(f64::parse_property("inf").is_err());
        assert!(f32::parse_property("NaN").is_err());
    }

    #[test]
    fn test_char_requires_single_character() {
        assert_eq!(char::parse_property("x").unwrap(), 'x');
        assert!(char::parse_property("xy").is_err());
        assert!(char::parse_property("").is_err());
    }

    #[test]
    fn test_option_wraps_inner_type() {
        assert_eq!(<Option<u32>>::VALUE_TYPE, ValueType::U32);
        assert_eq!(<Option<u32>>::parse_property("7").unwrap(), Some(7));
        assert_eq!(None::<u32>.render(), None);
    }

    #[test]
    fn test_synthesized_values_render_losslessly() {
        for _ in 0..64 {
            let seed = Uuid::new_v4();

            let f = f64::synthesize(seed);
            assert_eq!(f64::parse_property(&f.render().unwrap()).unwrap(), f);

            let f = f32::synthesize(seed);
            assert_eq!(f32::parse_property(&f.render().unwrap()).unwrap(), f);

            let i = i8::synthesize(seed);
            assert_eq!(i8::parse_property(&i.render().unwrap()).unwrap(), i);

            let c = char::synthesize(seed);
            assert_eq!(char::parse_property(&c.render().unwrap()).unwrap(), c);
        }
    }

    #[test]
    fn test_synthesized_strings_are_unique() {
        let a = String::synthesize(Uuid::new_v4());
        let b = String::synthesize(Uuid::new_v4());
        assert_ne!(a, b);
    }
}
