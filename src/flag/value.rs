//! Typed flag values
//!
//! A flag owns a type-erased [`Value`]; the application keeps a [`FlagVar`]
//! handle pointing at the same storage and reads it after parsing.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Storage behind a flag, written by the parser
pub trait Value {
    /// Assign from the raw command-line text
    fn set(&self, raw: &str) -> Result<(), String>;

    /// Current value rendered as text
    fn current(&self) -> String;

    /// Boolean flags take no separate argument token
    fn is_bool(&self) -> bool {
        false
    }
}

/// Types that can be bound to a flag
pub trait FlagType: Clone + 'static {
    /// Parse the raw command-line text
    fn parse_flag(raw: &str) -> Result<Self, String>;

    /// Render for help and lookups
    fn format_flag(&self) -> String;

    /// See [`Value::is_bool`]
    const IS_BOOL: bool = false;
}

impl FlagType for bool {
    const IS_BOOL: bool = true;

    fn parse_flag(raw: &str) -> Result<Self, String> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err("parse error".to_string()),
        }
    }

    fn format_flag(&self) -> String {
        self.to_string()
    }
}

impl FlagType for String {
    fn parse_flag(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn format_flag(&self) -> String {
        self.clone()
    }
}

macro_rules! numeric_flag_type {
    ($($ty:ty),*) => {
        $(
            impl FlagType for $ty {
                fn parse_flag(raw: &str) -> Result<Self, String> {
                    raw.parse::<$ty>().map_err(|e| e.to_string())
                }

                fn format_flag(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

numeric_flag_type!(i32, i64, u32, u64, usize, f64);

/// Handle to the variable bound to a flag
///
/// Clones share storage. The handle is `!Send`: a command tree and its
/// flag variables belong to a single thread.
pub struct FlagVar<T> {
    inner: Rc<RefCell<T>>,
}

impl<T: FlagType> FlagVar<T> {
    pub(crate) fn new(initial: T) -> Self {
        FlagVar {
            inner: Rc::new(RefCell::new(initial)),
        }
    }

    /// Current value
    pub fn get(&self) -> T {
        self.inner.borrow().clone()
    }

    /// Overwrite the value without going through a flag set
    pub fn replace(&self, value: T) -> T {
        self.inner.replace(value)
    }
}

impl<T> Clone for FlagVar<T> {
    fn clone(&self) -> Self {
        FlagVar {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for FlagVar<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FlagVar").field(&self.inner.borrow()).finish()
    }
}

impl<T: FlagType> Value for FlagVar<T> {
    fn set(&self, raw: &str) -> Result<(), String> {
        let parsed = T::parse_flag(raw)?;
        *self.inner.borrow_mut() = parsed;
        Ok(())
    }

    fn current(&self) -> String {
        self.inner.borrow().format_flag()
    }

    fn is_bool(&self) -> bool {
        T::IS_BOOL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_spellings() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert_eq!(bool::parse_flag(raw), Ok(true), "{raw}");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert_eq!(bool::parse_flag(raw), Ok(false), "{raw}");
        }
        assert!(bool::parse_flag("yes").is_err());
        assert!(bool::parse_flag("tRUE").is_err());
    }

    #[test]
    fn test_numeric_parse_errors_carry_reason() {
        assert_eq!(i64::parse_flag("-42"), Ok(-42));
        assert_eq!(
            i64::parse_flag("4x"),
            Err("invalid digit found in string".to_string())
        );
        assert!(u64::parse_flag("-1").is_err());
        assert_eq!(f64::parse_flag("2.5"), Ok(2.5));
    }

    #[test]
    fn test_flag_var_shares_storage() {
        let var = FlagVar::new(String::from("world"));
        let handle = var.clone();

        var.set("rust").unwrap();
        assert_eq!(handle.get(), "rust");
        assert_eq!(handle.current(), "rust");
        assert!(!handle.is_bool());
    }

    #[test]
    fn test_failed_set_keeps_value() {
        let var = FlagVar::new(7i64);
        assert!(var.set("seven").is_err());
        assert_eq!(var.get(), 7);
    }

    #[test]
    fn test_replace() {
        let var = FlagVar::new(true);
        assert!(var.replace(false));
        assert!(!var.get());
        assert!(var.is_bool());
    }
}
