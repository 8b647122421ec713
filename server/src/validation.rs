/// A single rejected request field.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FieldViolation {
    field: &'static str,
    message: String,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ValidationError(Vec<FieldViolation>);

impl ValidationError {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.0
    }
}

/// Collects violations while extracting request fields, so every bad field is reported at once.
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<FieldViolation>,
}

impl Validator {
    /// Passes through text that is present and non-empty. Anything else is recorded and replaced by `""`.
    pub fn not_empty(&mut self, field: &'static str, value: Option<String>) -> String {
        match value {
            Some(value) if !value.is_empty() => value,
            _ => {
                self.violations
                    .push(FieldViolation::new(field, format!("{field} must not be empty")));
                String::new()
            }
        }
    }

    pub fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.violations.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError(self.violations))
        }
    }
}

#[cfg(test)]
mod test {
    use crate::validation::{FieldViolation, Validator};

    #[test]
    fn accepts_present_fields() {
        let mut validator = Validator::default();
        let title = validator.not_empty("title", Some("title".to_string()));

        assert_eq!(validator.finish(title), Ok("title".to_string()));
    }

    #[test]
    fn reports_each_missing_or_empty_field() {
        let mut validator = Validator::default();
        validator.not_empty("title", None);
        validator.not_empty("author", Some(String::new()));
        validator.not_empty("isbn", Some("isbn".to_string()));

        let error = validator.finish(()).expect_err("two fields are invalid");
        assert_eq!(
            error.violations(),
            &[
                FieldViolation::new("title", "title must not be empty"),
                FieldViolation::new("author", "author must not be empty"),
            ]
        );
        assert_eq!(error.violations()[1].field(), "author");
    }

    #[test]
    fn whitespace_counts_as_present() {
        let mut validator = Validator::default();
        let author = validator.not_empty("author", Some("   ".to_string()));

        assert_eq!(validator.finish(author), Ok("   ".to_string()));
    }
}
