//! Average formulas such as `(SE1 + 2*SE2 + PW)/4`.
//!
//! A formula is a tree of terms. Each term is either a grade name or a
//! parenthesised `+`-separated list of terms, optionally scaled by integer
//! multipliers (`2`, `2*3`, `2*`) in front, a multiplier after a closing
//! parenthesis, and a `/n` divisor at the end. A term's weighting is the
//! fraction of the final average it accounts for; for a list it is the sum of
//! its members. The formula as a whole must account for exactly `1/1`.

use log::debug;
use num_traits::ToPrimitive;

use crate::error::SyntaxError;
use crate::parser::literal::parse_number;
use crate::tokenizer::Cursor;

use super::calculator::{Calculator, Grade};
use super::error::GradeError;
use super::fraction::Fraction;

#[derive(Debug)]
struct Term {
    weighting: Fraction,
    name: Option<String>,
    children: Vec<Term>,
}

/// Multipliers and divisors must be whole numbers that fit an `i64`.
fn to_factor(n: f64) -> Result<i64, GradeError> {
    Some(n)
        .filter(|n| n.fract().abs() <= 0.0)
        .and_then(|n| n.to_i64())
        .ok_or_else(|| GradeError::InvalidExpression(format!("factor {n} is not an integer")))
}

fn read_name(cursor: &mut Cursor) -> Option<String> {
    let is_start = |c: char| c.is_ascii_alphabetic() || c == '_';
    let is_rest = |c: char| c.is_ascii_alphanumeric() || c == '_';
    if !cursor.peek().is_some_and(is_start) {
        return None;
    }
    let mut name = String::new();
    while let Some(ch) = cursor.peek().filter(|c| is_rest(*c)) {
        name.push(ch);
        cursor.pop();
    }
    Some(name)
}

impl Term {
    fn parse(cursor: &mut Cursor) -> Result<Self, GradeError> {
        let mut multiplier = parse_number(cursor, false)?;
        while cursor.is_next('*') {
            if let Some(n) = parse_number(cursor, false)? {
                multiplier = Some(multiplier.map_or(n, |m| m * n));
            }
        }

        let mut children = Vec::new();
        if cursor.is_next('(') {
            loop {
                children.push(Self::parse(cursor)?);
                if !cursor.is_next('+') {
                    break;
                }
            }
            if !cursor.is_next(')') {
                return Err(SyntaxError::ExpectedChar(')').into());
            }
            if let Some(n) = parse_number(cursor, false)? {
                multiplier = Some(multiplier.map_or(n, |m| m * n));
            }
        }

        let name = if children.is_empty() {
            cursor.skip_whitespace();
            Some(read_name(cursor).ok_or(GradeError::MissingVariable)?)
        } else {
            None
        };

        let mut term = Self {
            weighting: Fraction::ONE,
            name,
            children,
        };
        term.sum_children()?;
        if let Some(m) = multiplier {
            term.multiply(to_factor(m)?)?;
        }
        if cursor.is_next('/') {
            if let Some(d) = parse_number(cursor, false)? {
                term.divide(to_factor(d)?)?;
            }
        }
        Ok(term)
    }

    /// Scale by `n`; zero is ignored.
    fn multiply(&mut self, n: i64) -> Result<(), GradeError> {
        if n == 0 {
            return Ok(());
        }
        if self.children.is_empty() {
            self.weighting.scale_up(n)?;
        } else {
            for child in &mut self.children {
                child.multiply(n)?;
            }
            self.sum_children()?;
        }
        Ok(())
    }

    /// Divide by `n`; zero is ignored.
    fn divide(&mut self, n: i64) -> Result<(), GradeError> {
        if n == 0 {
            return Ok(());
        }
        if self.children.is_empty() {
            self.weighting.scale_down(n)?;
        } else {
            for child in &mut self.children {
                child.divide(n)?;
            }
            self.sum_children()?;
        }
        Ok(())
    }

    fn sum_children(&mut self) -> Result<(), GradeError> {
        let mut children = self.children.iter().map(|c| c.weighting);
        if let Some(first) = children.next() {
            self.weighting = children.try_fold(first, Fraction::checked_add)?;
        }
        Ok(())
    }
}

/// Leaf terms that become grades.
///
/// A term with a single child is unwrapped recursively; the children of a
/// term with several are taken as they are.
fn grade_terms(terms: Vec<Term>) -> Vec<Term> {
    let mut out = Vec::new();
    for term in terms {
        match term.children.len() {
            0 => out.push(term),
            1 => out.extend(grade_terms(term.children)),
            _ => out.extend(term.children),
        }
    }
    out
}

/// A [`Calculator`] whose grades and weightings come from an average formula.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionCalculator {
    formula: String,
    calculator: Calculator,
}

impl ExpressionCalculator {
    /// Parse `formula` into weighted grades.
    ///
    /// # Errors
    /// Returns [`GradeError::InvalidExpression`] when the weightings do not
    /// add up to one, and a syntax or missing-variable error for malformed
    /// text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tokeval::grade::ExpressionCalculator;
    ///
    /// let calc = ExpressionCalculator::parse("(SE1 + 2*SE2 + PW)/4")
    ///     .unwrap_or_else(|e| panic!("{e}"));
    /// let weights: Vec<_> = calc.calculator().grades().iter().map(|g| g.weighting()).collect();
    /// assert_eq!(weights, [1, 2, 1]);
    /// ```
    pub fn parse(formula: &str) -> Result<Self, GradeError> {
        let mut cursor = Cursor::from(formula);
        let calculator = Self::from_cursor(&mut cursor)?;
        cursor.skip_whitespace();
        if let Some(ch) = cursor.peek() {
            return Err(SyntaxError::UnexpectedCharacter(ch).into());
        }
        Ok(Self {
            formula: formula.to_owned(),
            calculator,
        })
    }

    /// Read one formula from `cursor` and build its calculator.
    ///
    /// # Errors
    /// As for [`parse`](Self::parse), without the trailing-input check.
    pub fn from_cursor(cursor: &mut Cursor) -> Result<Calculator, GradeError> {
        let root = Term::parse(cursor)?;
        let total = root.weighting.reduced()?;
        if !total.is_one() {
            return Err(GradeError::InvalidExpression(format!(
                "weightings add up to {total}, not 1"
            )));
        }

        let mut leaves = if root.children.is_empty() {
            vec![root]
        } else {
            grade_terms(root.children)
        };

        let mut denominators: Vec<i64> = Vec::new();
        for leaf in &leaves {
            let d = leaf.weighting.denominator();
            if !denominators.contains(&d) {
                denominators.push(d);
            }
        }

        let mut grades = Vec::with_capacity(leaves.len());
        for leaf in &mut leaves {
            let own = leaf.weighting.denominator();
            for &d in denominators.iter().filter(|&&d| d != own) {
                leaf.weighting.expand(d)?;
            }
            let name = leaf.name.take().ok_or_else(|| {
                GradeError::InvalidExpression("nested group in place of a grade".into())
            })?;
            grades.push(Grade::new(name, leaf.weighting.numerator()));
        }
        debug!("formula defines {} grades", grades.len());
        Ok(Calculator::new(grades))
    }

    #[must_use]
    pub fn formula(&self) -> &str {
        &self.formula
    }

    #[must_use]
    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn calculator_mut(&mut self) -> &mut Calculator {
        &mut self.calculator
    }

    #[must_use]
    pub fn into_calculator(self) -> Calculator {
        self.calculator
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn weights(formula: &str) -> Vec<(String, i64)> {
        ExpressionCalculator::parse(formula)
            .unwrap_or_else(|e| panic!("{formula}: {e}"))
            .calculator()
            .grades()
            .iter()
            .map(|g| (g.name().to_owned(), g.weighting()))
            .collect()
    }

    #[rstest]
    #[case("(SE1 + 2*SE2 + PW)/4", &[("SE1", 1), ("SE2", 2), ("PW", 1)])]
    #[case("(A + B)/2", &[("A", 1), ("B", 1)])]
    #[case("((A + B)/2 + C)/2", &[("A", 2), ("B", 2), ("C", 4)])]
    #[case("(3A + *B)/4", &[("A", 3), ("B", 1)])]
    #[case("(A/2 + B/3 + C/6)", &[("A", 18), ("B", 12), ("C", 6)])]
    #[case("Final", &[("Final", 1)])]
    fn weightings_from_formula(#[case] formula: &str, #[case] expected: &[(&str, i64)]) {
        let expected: Vec<(String, i64)> = expected
            .iter()
            .map(|(n, w)| ((*n).to_owned(), *w))
            .collect();
        assert_eq!(weights(formula), expected);
    }

    #[rstest]
    #[case("(A + B)/3")]
    #[case("(A + B)")]
    fn weightings_must_sum_to_one(#[case] formula: &str) {
        assert!(matches!(
            ExpressionCalculator::parse(formula),
            Err(GradeError::InvalidExpression(_))
        ));
    }

    #[rstest]
    #[case("(A + )/2", GradeError::MissingVariable)]
    #[case("(A + B/2", GradeError::Syntax(SyntaxError::ExpectedChar(')')))]
    #[case("A B", GradeError::Syntax(SyntaxError::UnexpectedCharacter('B')))]
    #[case("(2.5A + B)/3.5", GradeError::InvalidExpression("factor 2.5 is not an integer".into()))]
    #[case("(A + B)/2.5", GradeError::InvalidExpression("factor 2.5 is not an integer".into()))]
    #[case("4*(4611686018427387904A)", GradeError::InvalidExpression("weighting is out of range".into()))]
    #[case("(A/4611686018427387904 + B/3)", GradeError::InvalidExpression("weighting is out of range".into()))]
    fn malformed_formula(#[case] formula: &str, #[case] expected: GradeError) {
        assert_eq!(ExpressionCalculator::parse(formula), Err(expected));
    }

    #[test]
    fn solves_for_missing_grade() {
        let mut calc = ExpressionCalculator::parse("(SE1 + 2*SE2 + PW)/4")
            .unwrap_or_else(|e| panic!("{e}"));
        let grades = calc.calculator_mut();
        grades.set("SE1", 6.0).unwrap_or_else(|e| panic!("{e}"));
        grades.set("SE2", 9.0).unwrap_or_else(|e| panic!("{e}"));
        let needed = grades
            .required_grade("PW", 7.5)
            .unwrap_or_else(|e| panic!("{e}"));
        assert!((needed - 6.0).abs() < 1e-12);
    }
}
