//! Weighted grades and the averages computed over them.

use crate::json::{JsonArray, JsonCodec, JsonError, JsonObject, JsonType, JsonValue};

use super::error::GradeError;

/// A named grade with an integer weighting and an optional value.
#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    name: String,
    weighting: i64,
    value: Option<f64>,
}

impl Grade {
    /// An unset grade.
    #[must_use]
    pub fn new(name: impl Into<String>, weighting: i64) -> Self {
        Self {
            name: name.into(),
            weighting,
            value: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn weighting(&self) -> i64 {
        self.weighting
    }

    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn set(&mut self, value: f64) {
        self.value = Some(value);
    }

    pub fn reset(&mut self) {
        self.value = None;
    }

    #[must_use]
    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    #[expect(
        clippy::cast_precision_loss,
        reason = "weightings are small integers"
    )]
    fn weight(&self) -> f64 {
        self.weighting as f64
    }
}

impl JsonCodec for Grade {
    fn to_json(&self) -> JsonValue {
        let mut obj = JsonObject::new();
        obj.set("name", self.name.as_str());
        obj.set("weighting", self.weighting);
        obj.set("value", self.value);
        obj.into()
    }

    fn from_json(json: &JsonValue) -> Result<Self, JsonError> {
        let obj = json.as_object().ok_or_else(|| JsonError::WrongType {
            at: "grade".into(),
            expected: JsonType::Object,
            found: json.value_type(),
        })?;
        let value = if obj.has("value") && !obj.is_null("value")? {
            Some(obj.get_f64("value")?)
        } else {
            None
        };
        Ok(Self {
            name: obj.get_str("name")?.to_owned(),
            weighting: obj.get_i64("weighting")?,
            value,
        })
    }
}

/// An ordered set of grades.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calculator {
    grades: Vec<Grade>,
}

impl Calculator {
    #[must_use]
    pub fn new(grades: Vec<Grade>) -> Self {
        Self { grades }
    }

    #[must_use]
    pub fn grades(&self) -> &[Grade] {
        &self.grades
    }

    #[must_use]
    pub fn grade(&self, name: &str) -> Option<&Grade> {
        self.grades.iter().find(|g| g.name == name)
    }

    pub fn grade_mut(&mut self, name: &str) -> Option<&mut Grade> {
        self.grades.iter_mut().find(|g| g.name == name)
    }

    /// Set the value of the grade called `name`.
    ///
    /// # Errors
    /// Returns [`GradeError::UnknownGrade`] when there is no such grade.
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), GradeError> {
        self.grade_mut(name)
            .ok_or_else(|| GradeError::UnknownGrade(name.to_owned()))?
            .set(value);
        Ok(())
    }

    /// Weighted average of the grades that are set; `0.0` when none are.
    #[must_use]
    pub fn average(&self) -> f64 {
        let (total, weight) = self
            .grades
            .iter()
            .filter_map(|g| g.value.map(|v| (v * g.weight(), g.weight())))
            .fold((0.0, 0.0), |(t, w), (gt, gw)| (t + gt, w + gw));
        if weight == 0.0 { 0.0 } else { total / weight }
    }

    /// The value grade `name` needs for the average to reach `target`.
    ///
    /// Every other grade that is set counts toward the average; the value
    /// currently held by `name` itself is ignored.
    ///
    /// # Errors
    /// Returns [`GradeError::UnknownGrade`] for an unknown name and
    /// [`GradeError::ZeroWeighting`] when the grade carries no weight.
    pub fn required_grade(&self, name: &str, target: f64) -> Result<f64, GradeError> {
        let grade = self
            .grade(name)
            .ok_or_else(|| GradeError::UnknownGrade(name.to_owned()))?;
        if grade.weighting == 0 {
            return Err(GradeError::ZeroWeighting(name.to_owned()));
        }
        let (total, weight) = self
            .grades
            .iter()
            .filter(|g| g.name != name)
            .filter_map(|g| g.value.map(|v| (v * g.weight(), g.weight())))
            .fold((0.0, grade.weight()), |(t, w), (gt, gw)| (t + gt, w + gw));
        Ok((target * weight - total) / grade.weight())
    }
}

impl JsonCodec for Calculator {
    fn to_json(&self) -> JsonValue {
        self.grades
            .iter()
            .map(Grade::to_json)
            .collect::<JsonArray>()
            .into()
    }

    fn from_json(json: &JsonValue) -> Result<Self, JsonError> {
        let arr = json.as_array().ok_or_else(|| JsonError::WrongType {
            at: "grades".into(),
            expected: JsonType::Array,
            found: json.value_type(),
        })?;
        let grades = arr
            .iter()
            .map(Grade::from_json)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { grades })
    }
}
