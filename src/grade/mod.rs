//! Weighted-average grade solver.
//!
//! A [`Calculator`] holds named [`Grade`]s with integer weightings and can
//! report the current average or the value one grade needs to reach a target
//! average. [`ExpressionCalculator`] derives the grades and weightings from
//! an average formula.

mod calculator;
mod error;
mod formula;
mod fraction;

pub use calculator::{Calculator, Grade};
pub use error::GradeError;
pub use formula::ExpressionCalculator;
pub use fraction::Fraction;
