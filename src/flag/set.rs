//! Flag set: registration and parsing of one tree level's flags

use crate::error::{FlagError, FlagResult};
use crate::flag::value::{FlagType, FlagVar, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::trace;

/// A single registered flag
pub struct Flag {
    name: String,
    usage: String,
    default: String,
    value: Box<dyn Value>,
}

impl Flag {
    /// Flag name, without leading dashes
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Help description, may be empty
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Default value as text
    pub fn default_value(&self) -> &str {
        &self.default
    }

    /// Current value as text
    pub fn value(&self) -> String {
        self.value.current()
    }

    pub fn is_bool(&self) -> bool {
        self.value.is_bool()
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("usage", &self.usage)
            .field("default", &self.default)
            .field("value", &self.value.current())
            .finish()
    }
}

/// Named collection of flags recognized at one level of a command tree
///
/// Parsing stops at the first token that is not a flag; everything from
/// there on is kept as positional arguments.
#[derive(Debug)]
pub struct FlagSet {
    name: String,
    flags: BTreeMap<String, Flag>,
    actual: BTreeSet<String>,
    args: Vec<String>,
    parsed: bool,
}

impl FlagSet {
    /// Create an empty flag set
    pub fn new(name: impl Into<String>) -> Self {
        FlagSet {
            name: name.into(),
            flags: BTreeMap::new(),
            actual: BTreeSet::new(),
            args: Vec::new(),
            parsed: false,
        }
    }

    /// Name of the set (the owning command's name)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a flag backed by a custom [`Value`]
    ///
    /// # Panics
    ///
    /// Panics if a flag with the same name is already registered.
    pub fn var_value(&mut self, name: &str, usage: &str, value: impl Value + 'static) {
        if self.flags.contains_key(name) {
            panic!("{} flag redefined: {}", self.name, name);
        }
        let flag = Flag {
            name: name.to_string(),
            usage: usage.to_string(),
            default: value.current(),
            value: Box::new(value),
        };
        self.flags.insert(name.to_string(), flag);
    }

    /// Register a typed flag and return the handle to its variable
    ///
    /// # Panics
    ///
    /// Panics if a flag with the same name is already registered.
    pub fn var<T: FlagType>(&mut self, name: &str, default: T, usage: &str) -> FlagVar<T> {
        let var = FlagVar::new(default);
        self.var_value(name, usage, var.clone());
        var
    }

    pub fn bool(&mut self, name: &str, default: bool, usage: &str) -> FlagVar<bool> {
        self.var(name, default, usage)
    }

    pub fn string(&mut self, name: &str, default: &str, usage: &str) -> FlagVar<String> {
        self.var(name, default.to_string(), usage)
    }

    pub fn int(&mut self, name: &str, default: i64, usage: &str) -> FlagVar<i64> {
        self.var(name, default, usage)
    }

    pub fn uint(&mut self, name: &str, default: u64, usage: &str) -> FlagVar<u64> {
        self.var(name, default, usage)
    }

    pub fn float(&mut self, name: &str, default: f64, usage: &str) -> FlagVar<f64> {
        self.var(name, default, usage)
    }

    /// Parse flag tokens from the front of `args`
    ///
    /// On success the remaining tokens are available from [`FlagSet::args`].
    pub fn parse<I, S>(&mut self, args: I) -> FlagResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut idx = 0;

        self.parsed = true;
        self.actual.clear();

        loop {
            match self.parse_one(&tokens, &mut idx) {
                Ok(true) => continue,
                Ok(false) => break,
                Err(err) => {
                    self.args = tokens.split_off(idx.min(tokens.len()));
                    return Err(err);
                }
            }
        }

        self.args = tokens.split_off(idx);
        Ok(())
    }

    /// Consume one flag at `idx`; `Ok(false)` once flags are exhausted
    fn parse_one(&mut self, tokens: &[String], idx: &mut usize) -> FlagResult<bool> {
        let Some(token) = tokens.get(*idx) else {
            return Ok(false);
        };
        if token.len() < 2 || !token.starts_with('-') {
            return Ok(false);
        }

        let mut minuses = 1;
        if token.as_bytes()[1] == b'-' {
            minuses += 1;
            if token.len() == 2 {
                // "--" ends the flags
                *idx += 1;
                return Ok(false);
            }
        }

        let body = &token[minuses..];
        if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
            return Err(FlagError::BadSyntax(token.clone()));
        }
        *idx += 1;

        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        let Some(flag) = self.flags.get(name) else {
            if name == "help" || name == "h" {
                return Err(FlagError::HelpRequested);
            }
            return Err(FlagError::NotDefined(name.to_string()));
        };

        if flag.value.is_bool() {
            let raw = inline.unwrap_or("true");
            flag.value.set(raw).map_err(|reason| FlagError::InvalidBool {
                name: name.to_string(),
                value: raw.to_string(),
                reason,
            })?;
        } else {
            let raw = match inline {
                Some(value) => value.to_string(),
                None => match tokens.get(*idx) {
                    Some(next) => {
                        *idx += 1;
                        next.clone()
                    }
                    None => return Err(FlagError::MissingArgument(name.to_string())),
                },
            };
            flag.value.set(&raw).map_err(|reason| FlagError::InvalidValue {
                name: name.to_string(),
                value: raw.clone(),
                reason,
            })?;
        }

        trace!(set = %self.name, flag = name, "parsed flag");
        self.actual.insert(name.to_string());
        Ok(true)
    }

    /// Positional arguments left after the last parse
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The i-th positional argument
    pub fn arg(&self, i: usize) -> Option<&str> {
        self.args.get(i).map(String::as_str)
    }

    /// Whether [`FlagSet::parse`] has been called
    pub fn parsed(&self) -> bool {
        self.parsed
    }

    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.get(name)
    }

    /// Assign a flag programmatically, with the same validation as parsing
    pub fn set(&mut self, name: &str, value: &str) -> FlagResult<()> {
        let flag = self
            .flags
            .get(name)
            .ok_or_else(|| FlagError::NotDefined(name.to_string()))?;
        flag.value
            .set(value)
            .map_err(|reason| FlagError::InvalidValue {
                name: name.to_string(),
                value: value.to_string(),
                reason,
            })?;
        self.actual.insert(name.to_string());
        Ok(())
    }

    /// Whether the flag was given in the last parse (or via [`FlagSet::set`])
    pub fn is_set(&self, name: &str) -> bool {
        self.actual.contains(name)
    }

    /// All flags in lexicographic order
    pub fn iter(&self) -> impl Iterator<Item = &Flag> {
        self.flags.values()
    }

    /// Call `f` for every flag in lexicographic order
    pub fn visit_all(&self, f: impl FnMut(&Flag)) {
        self.iter().for_each(f);
    }

    /// Call `f` for the flags that have been set, in lexicographic order
    pub fn visit(&self, f: impl FnMut(&Flag)) {
        self.iter()
            .filter(|flag| self.actual.contains(flag.name()))
            .for_each(f);
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (FlagSet, FlagVar<bool>, FlagVar<String>, FlagVar<i64>) {
        let mut set = FlagSet::new("test");
        let verbose = set.bool("verbose", false, "enable verbose output");
        let name = set.string("name", "world", "who to greet");
        let times = set.int("times", 1, "");
        (set, verbose, name, times)
    }

    #[test]
    fn test_parse_single_and_double_dash() {
        let (mut set, verbose, name, _) = sample();
        set.parse(["-verbose", "--name", "rust", "run"]).unwrap();

        assert!(verbose.get());
        assert_eq!(name.get(), "rust");
        assert_eq!(set.args(), ["run"]);
        assert!(set.parsed());
    }

    #[test]
    fn test_parse_inline_values() {
        let (mut set, verbose, name, times) = sample();
        set.parse(["--times=3", "-name=a=b", "-verbose=false"]).unwrap();

        assert_eq!(times.get(), 3);
        assert_eq!(name.get(), "a=b");
        assert!(!verbose.get());
        assert!(set.args().is_empty());
    }

    #[test]
    fn test_parse_stops_at_first_positional() {
        let (mut set, verbose, _, _) = sample();
        set.parse(["build", "-verbose"]).unwrap();

        assert!(!verbose.get());
        assert_eq!(set.args(), ["build", "-verbose"]);
    }

    #[test]
    fn test_bool_does_not_consume_next_token() {
        let (mut set, verbose, _, _) = sample();
        set.parse(["-verbose", "false"]).unwrap();

        assert!(verbose.get());
        assert_eq!(set.args(), ["false"]);
    }

    #[test]
    fn test_double_dash_terminator() {
        let (mut set, _, _, _) = sample();
        set.parse(["--", "-verbose", "x"]).unwrap();
        assert_eq!(set.args(), ["-verbose", "x"]);
    }

    #[test]
    fn test_single_dash_is_positional() {
        let (mut set, _, _, _) = sample();
        set.parse(["-", "x"]).unwrap();
        assert_eq!(set.args(), ["-", "x"]);
    }

    #[test]
    fn test_unknown_flag() {
        let (mut set, _, _, _) = sample();
        let err = set.parse(["--target=x"]).unwrap_err();
        assert_eq!(err, FlagError::NotDefined("target".to_string()));
    }

    #[test]
    fn test_undefined_help_is_a_help_request() {
        let mut set = FlagSet::new("bare");
        assert_eq!(set.parse(["-h"]), Err(FlagError::HelpRequested));
        assert_eq!(set.parse(["--help"]), Err(FlagError::HelpRequested));
    }

    #[test]
    fn test_bad_syntax() {
        let (mut set, _, _, _) = sample();
        assert_eq!(
            set.parse(["---verbose"]),
            Err(FlagError::BadSyntax("---verbose".to_string()))
        );
        assert_eq!(
            set.parse(["-=x"]),
            Err(FlagError::BadSyntax("-=x".to_string()))
        );
    }

    #[test]
    fn test_missing_argument() {
        let (mut set, _, _, _) = sample();
        assert_eq!(
            set.parse(["-name"]),
            Err(FlagError::MissingArgument("name".to_string()))
        );
    }

    #[test]
    fn test_invalid_values() {
        let (mut set, _, _, _) = sample();
        let err = set.parse(["-times", "many"]).unwrap_err();
        assert!(matches!(err, FlagError::InvalidValue { ref name, .. } if name == "times"));

        let err = set.parse(["-verbose=maybe"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid boolean value \"maybe\" for -verbose: parse error"
        );
    }

    #[test]
    fn test_visit_order_and_set_tracking() {
        let (mut set, _, _, _) = sample();
        set.parse(["-verbose", "-times", "2"]).unwrap();

        let mut all = Vec::new();
        set.visit_all(|f| all.push(f.name().to_string()));
        assert_eq!(all, ["name", "times", "verbose"]);

        let mut given = Vec::new();
        set.visit(|f| given.push(f.name().to_string()));
        assert_eq!(given, ["times", "verbose"]);

        set.parse(Vec::<String>::new()).unwrap();
        assert!(!set.is_set("verbose"));
    }

    #[test]
    fn test_lookup_and_set() {
        let (mut set, _, name, _) = sample();

        let flag = set.lookup("name").unwrap();
        assert_eq!(flag.default_value(), "world");
        assert_eq!(flag.usage(), "who to greet");

        set.set("name", "ferris").unwrap();
        assert_eq!(name.get(), "ferris");
        assert!(set.is_set("name"));
        assert_eq!(set.lookup("name").unwrap().value(), "ferris");
        assert_eq!(set.lookup("name").unwrap().default_value(), "world");

        assert_eq!(
            set.set("nope", "1"),
            Err(FlagError::NotDefined("nope".to_string()))
        );
    }

    #[test]
    fn test_uint_and_float_flags() {
        let mut set = FlagSet::new("nums");
        assert!(set.is_empty());
        let count = set.uint("count", 1, "how many");
        let ratio = set.float("ratio", 0.5, "");
        assert!(!set.is_empty());

        set.parse(["-count", "4", "--ratio=1.25", "a", "b"]).unwrap();
        assert_eq!(count.get(), 4);
        assert_eq!(ratio.get(), 1.25);
        assert_eq!(set.arg(0), Some("a"));
        assert_eq!(set.arg(1), Some("b"));
        assert_eq!(set.arg(2), None);
        assert_eq!(set.lookup("ratio").unwrap().default_value(), "0.5");
    }

    #[test]
    fn test_negative_uint_is_invalid() {
        let mut set = FlagSet::new("nums");
        let count = set.uint("count", 1, "");

        let err = set.parse(["-count=-1"]).unwrap_err();
        assert!(matches!(err, FlagError::InvalidValue { ref name, ref value, .. }
            if name == "count" && value == "-1"));
        assert_eq!(count.get(), 1);
    }

    #[test]
    #[should_panic(expected = "flag redefined: verbose")]
    fn test_redefinition_panics() {
        let (mut set, _, _, _) = sample();
        set.bool("verbose", true, "again");
    }
}
