//! Component tree for parsed arithmetic expressions.
//!
//! Precedence is fully encoded in the shape of the tree by the time a
//! [`Component`] exists: a [`Composite`] is evaluated strictly left to right,
//! and tighter-binding operators live in nested components. Every node can
//! report the free variables beneath it and accept a new value for one of
//! them.

use crate::error::SyntaxError;
use crate::parser::functions::Function;

use super::precedence::Operator;

/// A node in an expression tree.
#[derive(Debug, Clone)]
pub enum Component {
    /// A number known at parse time.
    Constant(f64),
    /// A named quantity, optionally scaled by a coefficient.
    Variable(Variable),
    /// A parenthesised sub-expression.
    Group(Box<Component>),
    /// A call to a registered function.
    Call(FunctionCall),
    /// Two or more operands of one precedence tier.
    Composite(Composite),
}

/// A named variable such as `x` or `3x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    coefficient: Option<f64>,
    value: f64,
}

impl Variable {
    /// An unbound variable, which evaluates to zero until set.
    #[must_use]
    pub fn new(name: impl Into<String>, coefficient: Option<f64>) -> Self {
        Self {
            name: name.into(),
            coefficient,
            value: 0.0,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The coefficient as written, `None` when it was omitted.
    #[must_use]
    pub fn coefficient(&self) -> Option<f64> {
        self.coefficient
    }

    /// The currently bound value, before the coefficient is applied.
    #[must_use]
    pub fn bound_value(&self) -> f64 {
        self.value
    }

    fn value(&self) -> f64 {
        self.coefficient.unwrap_or(1.0) * self.value
    }
}

/// A function applied to argument sub-expressions.
#[derive(Debug, Clone)]
pub struct FunctionCall {
    function: Function,
    args: Vec<Component>,
    coefficient: Option<f64>,
    variables: Vec<String>,
}

impl FunctionCall {
    /// Bind `function` to `args`. The caller is responsible for the arity
    /// check; evaluation repeats it.
    #[must_use]
    pub fn new(function: Function, args: Vec<Component>, coefficient: Option<f64>) -> Self {
        let mut variables = Vec::new();
        for arg in &args {
            merge_variables(&mut variables, arg.variables());
        }
        Self {
            function,
            args,
            coefficient,
            variables,
        }
    }

    #[must_use]
    pub fn function(&self) -> &Function {
        &self.function
    }

    #[must_use]
    pub fn args(&self) -> &[Component] {
        &self.args
    }

    /// Multiplier written before the function name, as in `2sin(x)`.
    #[must_use]
    pub fn coefficient(&self) -> Option<f64> {
        self.coefficient
    }

    fn value(&self) -> Result<f64, SyntaxError> {
        let args = self
            .args
            .iter()
            .map(Component::value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.coefficient.unwrap_or(1.0) * self.function.call(&args)?)
    }
}

/// Operands joined by operators of a single tier.
///
/// There is always exactly one more operand than operators: `first`, then one
/// operand per entry of `rest`.
#[derive(Debug, Clone)]
pub struct Composite {
    first: Box<Component>,
    rest: Vec<(Operator, Component)>,
    variables: Vec<String>,
}

impl Composite {
    /// Start a composite with its leading operand.
    #[must_use]
    pub fn new(first: Component) -> Self {
        let variables = first.variables().to_vec();
        Self {
            first: Box::new(first),
            rest: Vec::new(),
            variables,
        }
    }

    /// Append `op operand`.
    pub fn push(&mut self, op: Operator, operand: Component) {
        merge_variables(&mut self.variables, operand.variables());
        self.rest.push((op, operand));
    }

    #[must_use]
    pub fn first(&self) -> &Component {
        &self.first
    }

    #[must_use]
    pub fn rest(&self) -> &[(Operator, Component)] {
        &self.rest
    }

    fn value(&self) -> Result<f64, SyntaxError> {
        self.rest
            .iter()
            .try_fold(self.first.value()?, |acc, (op, operand)| {
                op.apply(acc, operand.value()?)
            })
    }
}

fn merge_variables(into: &mut Vec<String>, names: &[String]) {
    for name in names {
        if !into.contains(name) {
            into.push(name.clone());
        }
    }
}

impl Component {
    /// Distinct free variable names in order of first appearance.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        match self {
            Self::Constant(_) => &[],
            Self::Variable(var) => std::slice::from_ref(&var.name),
            Self::Group(inner) => inner.variables(),
            Self::Call(call) => &call.variables,
            Self::Composite(composite) => &composite.variables,
        }
    }

    /// Whether `name` occurs anywhere beneath this node.
    #[must_use]
    pub fn has_variable(&self, name: &str) -> bool {
        self.variables().iter().any(|v| v == name)
    }

    /// Whether this node contains any free variable.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.variables().is_empty()
    }

    /// Bind every occurrence of `name` to `value`.
    ///
    /// Returns whether anything was bound. Subtrees that do not mention the
    /// name are not visited.
    pub fn set_variable(&mut self, name: &str, value: f64) -> bool {
        if !self.has_variable(name) {
            return false;
        }
        match self {
            Self::Constant(_) => false,
            Self::Variable(var) => {
                var.value = value;
                true
            }
            Self::Group(inner) => inner.set_variable(name, value),
            Self::Call(call) => call
                .args
                .iter_mut()
                .fold(false, |found, arg| arg.set_variable(name, value) || found),
            Self::Composite(composite) => {
                let first = composite.first.set_variable(name, value);
                composite
                    .rest
                    .iter_mut()
                    .fold(first, |found, (_, operand)| {
                        operand.set_variable(name, value) || found
                    })
            }
        }
    }

    /// Evaluate with the currently bound variable values.
    ///
    /// # Errors
    /// Returns [`SyntaxError::DivideByZero`] when a division by zero is
    /// reached, or any error a called function reports.
    pub fn value(&self) -> Result<f64, SyntaxError> {
        match self {
            Self::Constant(n) => Ok(*n),
            Self::Variable(var) => Ok(var.value()),
            Self::Group(inner) => inner.value(),
            Self::Call(call) => call.value(),
            Self::Composite(composite) => composite.value(),
        }
    }

    /// Display the component as a simple S-expression for tests.
    #[must_use]
    pub fn to_sexpr(&self) -> String {
        match self {
            Self::Constant(n) => n.to_string(),
            Self::Variable(var) => with_coefficient(var.coefficient, var.name.clone()),
            Self::Group(inner) => format!("(group {})", inner.to_sexpr()),
            Self::Call(call) => {
                let name = call.function.name().unwrap_or("<op>");
                let args: Vec<String> = call.args.iter().map(Self::to_sexpr).collect();
                let body = if args.is_empty() {
                    format!("({name})")
                } else {
                    format!("({name} {})", args.join(" "))
                };
                with_coefficient(call.coefficient, body)
            }
            Self::Composite(composite) => composite.rest.iter().fold(
                composite.first.to_sexpr(),
                |acc, (op, operand)| format!("({} {acc} {})", op.symbol(), operand.to_sexpr()),
            ),
        }
    }
}

fn with_coefficient(coefficient: Option<f64>, body: String) -> String {
    match coefficient {
        Some(c) => format!("(* {c} {body})"),
        None => body,
    }
}

impl From<Variable> for Component {
    fn from(var: Variable) -> Self {
        Self::Variable(var)
    }
}

impl From<FunctionCall> for Component {
    fn from(call: FunctionCall) -> Self {
        Self::Call(call)
    }
}

impl From<Composite> for Component {
    fn from(composite: Composite) -> Self {
        Self::Composite(composite)
    }
}
