//! Named functions callable from expressions.
//!
//! A [`FunctionRegistry`] maps names to [`Function`]s. The registry is an
//! explicit value handed to the expression parser; [`FunctionRegistry::default`]
//! seeds it with the built-ins listed in [`BUILTINS`]. Registration is
//! first-wins: registering a name that already exists leaves the earlier one in
//! place.
//!
//! The arithmetic operators are also [`Function`]s, but anonymous ones; they
//! are reachable through [`Operator`](super::ast::Operator) and never through
//! the registry.

use std::borrow::Cow;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::f64::consts::PI;
use std::sync::{Arc, LazyLock};

use log::debug;
use phf::phf_map;

use crate::error::{Error, SyntaxError};

/// Signature of a built-in calculation.
pub type BuiltinFn = fn(&[f64]) -> Result<f64, SyntaxError>;

/// Signature of a user-supplied calculation.
pub type CustomFn = dyn Fn(&[f64]) -> Result<f64, SyntaxError> + Send + Sync;

#[derive(Clone)]
enum Calculation {
    Builtin(BuiltinFn),
    Custom(Arc<CustomFn>),
}

/// A pure calculation with a name and an accepted argument count.
#[derive(Clone)]
pub struct Function {
    name: Option<Cow<'static, str>>,
    min: usize,
    max: usize,
    calc: Calculation,
}

impl std::fmt::Debug for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("min", &self.min)
            .field("max", &self.max)
            .finish_non_exhaustive()
    }
}

impl Function {
    const fn builtin(name: Option<&'static str>, min: usize, max: usize, calc: BuiltinFn) -> Self {
        let name = match name {
            Some(n) => Some(Cow::Borrowed(n)),
            None => None,
        };
        Self {
            name,
            min,
            max,
            calc: Calculation::Builtin(calc),
        }
    }

    /// Create a named function accepting `min..=max` arguments.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `min > max` or the name is empty.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tokeval::parser::functions::Function;
    ///
    /// let double = Function::new("double", 1, 1, |args| Ok(args.iter().sum::<f64>() * 2.0))
    ///     .unwrap_or_else(|e| panic!("{e}"));
    /// assert_eq!(double.call(&[4.0]), Ok(8.0));
    /// ```
    pub fn new(
        name: impl Into<String>,
        min: usize,
        max: usize,
        calc: impl Fn(&[f64]) -> Result<f64, SyntaxError> + Send + Sync + 'static,
    ) -> Result<Self, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidArgument("function name is empty".into()));
        }
        if min > max {
            return Err(Error::InvalidArgument(format!(
                "function '{name}' has min arity {min} above max arity {max}"
            )));
        }
        Ok(Self {
            name: Some(Cow::Owned(name)),
            min,
            max,
            calc: Calculation::Custom(Arc::new(calc)),
        })
    }

    /// The registered name, `None` for operator functions.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fewest accepted arguments.
    #[must_use]
    pub fn min_args(&self) -> usize {
        self.min
    }

    /// Most accepted arguments.
    #[must_use]
    pub fn max_args(&self) -> usize {
        self.max
    }

    /// Check that `count` arguments are acceptable.
    ///
    /// # Errors
    /// Returns [`SyntaxError::ArgumentCountOutOfRange`] otherwise.
    pub fn check_arity(&self, count: usize) -> Result<(), SyntaxError> {
        if (self.min..=self.max).contains(&count) {
            Ok(())
        } else {
            Err(SyntaxError::ArgumentCountOutOfRange {
                name: self.name().unwrap_or("<operator>").to_string(),
                found: count,
                min: self.min,
                max: self.max,
            })
        }
    }

    /// Apply the function to `args` after checking their count.
    ///
    /// # Errors
    /// Returns [`SyntaxError::ArgumentCountOutOfRange`] for a bad count, or
    /// whatever the calculation itself reports.
    pub fn call(&self, args: &[f64]) -> Result<f64, SyntaxError> {
        self.check_arity(args.len())?;
        match &self.calc {
            Calculation::Builtin(f) => f(args),
            Calculation::Custom(f) => f(args),
        }
    }
}

fn arity_mismatch(args: &[f64]) -> SyntaxError {
    SyntaxError::ArgumentCountOutOfRange {
        name: "<builtin>".into(),
        found: args.len(),
        min: 1,
        max: 2,
    }
}

fn unary(args: &[f64], f: fn(f64) -> f64) -> Result<f64, SyntaxError> {
    match args {
        [x] => Ok(f(*x)),
        _ => Err(arity_mismatch(args)),
    }
}

fn binary(args: &[f64], f: fn(f64, f64) -> Result<f64, SyntaxError>) -> Result<f64, SyntaxError> {
    match args {
        [a, b] => f(*a, *b),
        _ => Err(arity_mismatch(args)),
    }
}

fn add(args: &[f64]) -> Result<f64, SyntaxError> {
    binary(args, |a, b| Ok(a + b))
}

fn subtract(args: &[f64]) -> Result<f64, SyntaxError> {
    binary(args, |a, b| Ok(a - b))
}

fn multiply(args: &[f64]) -> Result<f64, SyntaxError> {
    binary(args, |a, b| Ok(a * b))
}

fn divide(args: &[f64]) -> Result<f64, SyntaxError> {
    binary(args, |a, b| {
        if b == 0.0 {
            Err(SyntaxError::DivideByZero)
        } else {
            Ok(a / b)
        }
    })
}

fn power(args: &[f64]) -> Result<f64, SyntaxError> {
    binary(args, |a, b| Ok(a.powf(b)))
}

fn root(args: &[f64]) -> Result<f64, SyntaxError> {
    match args {
        [x] => Ok(x.sqrt()),
        [x, n] => Ok(x.powf(n.recip())),
        _ => Err(arity_mismatch(args)),
    }
}

fn sin(args: &[f64]) -> Result<f64, SyntaxError> {
    unary(args, f64::sin)
}

fn asin(args: &[f64]) -> Result<f64, SyntaxError> {
    unary(args, f64::asin)
}

fn cos(args: &[f64]) -> Result<f64, SyntaxError> {
    unary(args, f64::cos)
}

fn acos(args: &[f64]) -> Result<f64, SyntaxError> {
    unary(args, f64::acos)
}

fn tan(args: &[f64]) -> Result<f64, SyntaxError> {
    unary(args, f64::tan)
}

fn atan(args: &[f64]) -> Result<f64, SyntaxError> {
    unary(args, f64::atan)
}

fn rad(args: &[f64]) -> Result<f64, SyntaxError> {
    unary(args, |deg| deg * PI / 180.0)
}

fn deg(args: &[f64]) -> Result<f64, SyntaxError> {
    unary(args, |rad| rad * 180.0 / PI)
}

/// Anonymous `a + b`.
pub static ADD: Function = Function::builtin(None, 2, 2, add);
/// Anonymous `a - b`.
pub static SUBTRACT: Function = Function::builtin(None, 2, 2, subtract);
/// Anonymous `a * b`.
pub static MULTIPLY: Function = Function::builtin(None, 2, 2, multiply);
/// Anonymous `a / b`; fails on a zero divisor.
pub static DIVIDE: Function = Function::builtin(None, 2, 2, divide);
/// Anonymous `a ^ b`.
pub static POWER: Function = Function::builtin(None, 2, 2, power);
/// `root(x)` is the square root, `root(x, n)` the `n`th root.
pub static ROOT: Function = Function::builtin(Some("root"), 1, 2, root);

static SIN: Function = Function::builtin(Some("sin"), 1, 1, sin);
static ASIN: Function = Function::builtin(Some("asin"), 1, 1, asin);
static COS: Function = Function::builtin(Some("cos"), 1, 1, cos);
static ACOS: Function = Function::builtin(Some("acos"), 1, 1, acos);
static TAN: Function = Function::builtin(Some("tan"), 1, 1, tan);
static ATAN: Function = Function::builtin(Some("atan"), 1, 1, atan);
static RAD: Function = Function::builtin(Some("rad"), 1, 1, rad);
static DEG: Function = Function::builtin(Some("deg"), 1, 1, deg);

/// Functions every default registry starts with. Angles are in radians.
pub static BUILTINS: phf::Map<&'static str, &'static Function> = phf_map! {
    "root" => &ROOT,
    "sin" => &SIN,
    "asin" => &ASIN,
    "cos" => &COS,
    "acos" => &ACOS,
    "tan" => &TAN,
    "atan" => &ATAN,
    "rad" => &RAD,
    "deg" => &DEG,
};

static BUILTIN_REGISTRY: LazyLock<FunctionRegistry> = LazyLock::new(FunctionRegistry::default);

/// Case-sensitive, first-registration-wins catalogue of named functions.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    functions: HashMap<String, Function>,
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for function in BUILTINS.values() {
            registry.register((*function).clone());
        }
        registry
    }
}

impl FunctionRegistry {
    /// A registry with no functions at all.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }

    /// Shared read-only registry holding only the built-ins.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN_REGISTRY
    }

    /// Add `function` unless its name is already taken.
    ///
    /// Returns whether the function was added. Anonymous functions are never
    /// added.
    pub fn register(&mut self, function: Function) -> bool {
        let Some(name) = function.name().map(str::to_owned) else {
            return false;
        };
        match self.functions.entry(name) {
            Entry::Occupied(entry) => {
                debug!("function '{}' already registered; keeping the first", entry.key());
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(function);
                true
            }
        }
    }

    /// Find the function registered under exactly `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    /// Number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether no function is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
