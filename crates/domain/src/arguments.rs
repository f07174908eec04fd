//! Arguments — the positional values and named options of one invocation.
//!
//! A trigger or operation captures its arguments once, when the rule is
//! built, and hands the same immutable set to its provider on every call.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProviderError;

/// Positional values plus named options.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl Arguments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from positional values only.
    #[must_use]
    pub fn positional<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            args: values.into_iter().map(Into::into).collect(),
            options: Map::new(),
        }
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    #[must_use]
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Positional argument `index` as a string.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidArguments`] when the argument is
    /// missing or not a string.
    pub fn str_at(&self, index: usize) -> Result<&str, ProviderError> {
        self.args
            .get(index)
            .ok_or_else(|| missing(index))?
            .as_str()
            .ok_or_else(|| mistyped(index, "a string"))
    }

    /// Positional argument `index` as an unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidArguments`] when the argument is
    /// missing or not a non-negative integer.
    pub fn u64_at(&self, index: usize) -> Result<u64, ProviderError> {
        self.args
            .get(index)
            .ok_or_else(|| missing(index))?
            .as_u64()
            .ok_or_else(|| mistyped(index, "a non-negative integer"))
    }

    /// Every positional argument as a string.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidArguments`] if any argument is not a string.
    pub fn strings(&self) -> Result<Vec<&str>, ProviderError> {
        (0..self.args.len()).map(|index| self.str_at(index)).collect()
    }

    /// Named option `key` as a string, if present.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidArguments`] when the option is present
    /// but not a string.
    pub fn option_str(&self, key: &str) -> Result<Option<&str>, ProviderError> {
        match self.options.get(key) {
            None => Ok(None),
            Some(value) => value.as_str().map(Some).ok_or_else(|| {
                ProviderError::InvalidArguments(format!("option {key:?} must be a string"))
            }),
        }
    }
}

fn missing(index: usize) -> ProviderError {
    ProviderError::InvalidArguments(format!("missing argument {index}"))
}

fn mistyped(index: usize, expected: &str) -> ProviderError {
    ProviderError::InvalidArguments(format!("argument {index} must be {expected}"))
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, value) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str(")")?;
        if !self.options.is_empty() {
            f.write_str(" {")?;
            for (i, (key, value)) in self.options.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key}: {value}")?;
            }
            f.write_str("}")?;
        }
        Ok(())
    }
}

/// How a multi-target condition folds its per-target answers.
///
/// Selected by the `op` option: `"and"` requires every target, anything
/// else (or no option at all) accepts any target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Combine {
    #[default]
    Any,
    All,
}

impl Combine {
    /// Read the `op` option.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidArguments`] when `op` is not a string.
    pub fn from_options(arguments: &Arguments) -> Result<Self, ProviderError> {
        Ok(match arguments.option_str("op")? {
            Some("and") => Self::All,
            _ => Self::Any,
        })
    }

    /// Fold per-target answers. An empty input is `true` for [`Combine::All`]
    /// and `false` for [`Combine::Any`].
    #[must_use]
    pub fn fold(self, answers: impl IntoIterator<Item = bool>) -> bool {
        let mut answers = answers.into_iter();
        match self {
            Self::All => answers.all(|answer| answer),
            Self::Any => answers.any(|answer| answer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_build_positional_arguments() {
        let args = Arguments::positional(["on", "lamp"]);
        assert_eq!(args.len(), 2);
        assert_eq!(args.str_at(0).unwrap(), "on");
        assert_eq!(args.str_at(1).unwrap(), "lamp");
        assert!(args.options.is_empty());
    }

    #[test]
    fn should_report_missing_argument() {
        let args = Arguments::new();
        assert!(args.is_empty());
        let err = args.str_at(0).unwrap_err();
        assert_eq!(err.to_string(), "invalid arguments: missing argument 0");
    }

    #[test]
    fn should_reject_wrongly_typed_argument() {
        let args = Arguments::positional([json!("twenty")]);
        assert!(matches!(args.u64_at(0), Err(ProviderError::InvalidArguments(_))));
    }

    #[test]
    fn should_read_integer_arguments() {
        let args = Arguments::positional([20, 0]);
        assert_eq!(args.u64_at(0).unwrap(), 20);
        assert_eq!(args.u64_at(1).unwrap(), 0);
    }

    #[test]
    fn should_read_string_option() {
        let args = Arguments::positional(["Macbook"]).with_option("op", "or");
        assert_eq!(args.option_str("op").unwrap(), Some("or"));
        assert_eq!(args.option_str("missing").unwrap(), None);
    }

    #[test]
    fn should_reject_non_string_option() {
        let args = Arguments::new().with_option("op", 1);
        assert!(args.option_str("op").is_err());
    }

    #[test]
    fn should_collect_all_strings() {
        let args = Arguments::positional(["Macbook", "iPhone"]);
        assert_eq!(args.strings().unwrap(), vec!["Macbook", "iPhone"]);

        let mixed = Arguments::positional([json!("Macbook"), json!(3)]);
        assert!(mixed.strings().is_err());
    }

    #[test]
    fn should_display_arguments_and_options() {
        let args = Arguments::positional(["on", "lamp"]).with_option("payload", "{}");
        assert_eq!(args.to_string(), r#"("on", "lamp") {payload: "{}"}"#);
        assert_eq!(Arguments::positional([0, 1]).to_string(), "(0, 1)");
    }

    #[test]
    fn should_select_combinator_from_op_option() {
        let and = Arguments::new().with_option("op", "and");
        let or = Arguments::new().with_option("op", "or");
        assert_eq!(Combine::from_options(&and).unwrap(), Combine::All);
        assert_eq!(Combine::from_options(&or).unwrap(), Combine::Any);
        let neither = Arguments::new();
        assert_eq!(Combine::from_options(&neither).unwrap(), Combine::Any);
    }

    #[test]
    fn should_fold_answers() {
        assert!(Combine::Any.fold([false, true]));
        assert!(!Combine::All.fold([false, true]));
        assert!(Combine::All.fold([true, true]));
        assert!(Combine::All.fold([]));
        assert!(!Combine::Any.fold([]));
    }

    #[test]
    fn should_deserialize_with_defaults() {
        let args: Arguments = serde_json::from_value(json!({"args": [1, 2]})).unwrap();
        assert_eq!(args.len(), 2);
        assert!(args.options.is_empty());
    }
}
