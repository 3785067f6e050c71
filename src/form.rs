//! Data model of a marathon application: the field values, the per-field
//! errors and the rules that derive one from the other.

use crate::config::{DEFAULT_PHOTO_CONTENT_TYPE, MAX_AGE, MIN_VALID_AGE};
use crate::validators::{is_valid_email, is_valid_phone_number};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Experience level of the runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Level {
    /// All levels in display order. The first one is the default selection.
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(pub String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown level: {}", self.0)
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

/// An attached photo as read from the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub name: String,
    pub content_type: String,
    pub bytes: Rc<[u8]>,
}

impl Photo {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Rc<[u8]>>,
    ) -> Self {
        let content_type = content_type.into();
        Self {
            name: name.into(),
            content_type: if content_type.is_empty() {
                DEFAULT_PHOTO_CONTENT_TYPE.to_string()
            } else {
                content_type
            },
            bytes: bytes.into(),
        }
    }
}

// Raw bytes are summarised rather than dumped into the snapshot.
impl Serialize for Photo {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Photo", 3)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("type", &self.content_type)?;
        state.serialize_field("size", &self.bytes.len())?;
        state.end()
    }
}

/// Everything the runner has typed, picked or attached so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub photo: Option<Photo>,
    pub age: u8,
    pub level: Level,
}

impl FormValues {
    pub fn set_text(&mut self, field: TextField, value: String) {
        match field {
            TextField::FirstName => self.first_name = value,
            TextField::LastName => self.last_name = value,
            TextField::Email => self.email = value,
            TextField::PhoneNumber => self.phone_number = value,
        }
    }

    pub fn text(&self, field: TextField) -> &str {
        match field {
            TextField::FirstName => &self.first_name,
            TextField::LastName => &self.last_name,
            TextField::Email => &self.email,
            TextField::PhoneNumber => &self.phone_number,
        }
    }

    /// Store the slider position, clamped to the slider's range.
    pub fn set_age(&mut self, age: u8) {
        self.age = age.min(MAX_AGE);
    }
}

/// Fields that carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Email,
    PhoneNumber,
    Photo,
    Age,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::FirstName,
        Field::LastName,
        Field::Email,
        Field::PhoneNumber,
        Field::Photo,
        Field::Age,
    ];

    /// Name of the field in the submitted payload.
    pub fn name(&self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::PhoneNumber => "phoneNumber",
            Field::Photo => "photo",
            Field::Age => "age",
        }
    }
}

/// Single-line text inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    FirstName,
    LastName,
    Email,
    PhoneNumber,
}

impl TextField {
    pub const ALL: [TextField; 4] = [
        TextField::FirstName,
        TextField::LastName,
        TextField::Email,
        TextField::PhoneNumber,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TextField::FirstName => "First Name",
            TextField::LastName => "Last Name",
            TextField::Email => "Email Address",
            TextField::PhoneNumber => "Phone Number",
        }
    }
}

impl From<TextField> for Field {
    fn from(field: TextField) -> Self {
        match field {
            TextField::FirstName => Field::FirstName,
            TextField::LastName => Field::LastName,
            TextField::Email => Field::Email,
            TextField::PhoneNumber => Field::PhoneNumber,
        }
    }
}

/// Why a single field failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    Required(Field),
    InvalidEmail,
    InvalidPhoneNumber,
    AgeTooLow,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldError::Required(field) => {
                let what = match field {
                    Field::FirstName => "First name",
                    Field::LastName => "Last name",
                    Field::Email => "Email",
                    Field::PhoneNumber => "Phone number",
                    Field::Photo => "Photo",
                    Field::Age => "Age",
                };
                write!(f, "{} is required", what)
            }
            FieldError::InvalidEmail => write!(f, "Invalid email address"),
            FieldError::InvalidPhoneNumber => write!(
                f,
                "Please use correct formatting. \n Example: +48 123 456 789"
            ),
            FieldError::AgeTooLow => write!(f, "Age cannot be less than {}", MIN_VALID_AGE),
        }
    }
}

impl std::error::Error for FieldError {}

/// One optional error per validated field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    pub first_name: Option<FieldError>,
    pub last_name: Option<FieldError>,
    pub email: Option<FieldError>,
    pub phone_number: Option<FieldError>,
    pub photo: Option<FieldError>,
    pub age: Option<FieldError>,
}

impl FormErrors {
    /// Derive the complete error record from the current values.
    pub fn validate(values: &FormValues) -> Self {
        Self {
            first_name: required(&values.first_name, Field::FirstName),
            last_name: required(&values.last_name, Field::LastName),
            email: required(&values.email, Field::Email).or_else(|| {
                (!is_valid_email(&values.email)).then_some(FieldError::InvalidEmail)
            }),
            phone_number: required(&values.phone_number, Field::PhoneNumber).or_else(|| {
                (!is_valid_phone_number(&values.phone_number))
                    .then_some(FieldError::InvalidPhoneNumber)
            }),
            photo: values
                .photo
                .is_none()
                .then_some(FieldError::Required(Field::Photo)),
            age: (values.age < MIN_VALID_AGE).then_some(FieldError::AgeTooLow),
        }
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.slot(field).as_ref()
    }

    pub fn clear(&mut self, field: Field) {
        *self.slot_mut(field) = None;
    }

    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|&field| self.get(field).is_none())
    }

    /// Fields currently carrying an error, in form order.
    pub fn failing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|&field| self.get(field).is_some())
            .collect()
    }

    /// Rendered message for `field`, empty when the field is fine.
    pub fn message(&self, field: Field) -> String {
        self.get(field).map(|e| e.to_string()).unwrap_or_default()
    }

    fn slot(&self, field: Field) -> &Option<FieldError> {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::PhoneNumber => &self.phone_number,
            Field::Photo => &self.photo,
            Field::Age => &self.age,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<FieldError> {
        match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Email => &mut self.email,
            Field::PhoneNumber => &mut self.phone_number,
            Field::Photo => &mut self.photo,
            Field::Age => &mut self.age,
        }
    }
}

fn required(value: &str, field: Field) -> Option<FieldError> {
    value.is_empty().then_some(FieldError::Required(field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_values() -> FormValues {
        FormValues {
            first_name: "Jan".into(),
            last_name: "Kowalski".into(),
            email: "jan@example.com".into(),
            phone_number: "+48 123 456 789".into(),
            photo: Some(Photo::new("me.png", "image/png", vec![1u8, 2, 3])),
            age: 30,
            level: Level::Advanced,
        }
    }

    #[test]
    fn test_defaults_fail_every_required_field() {
        let errors = FormErrors::validate(&FormValues::default());
        assert_eq!(errors.failing(), Field::ALL.to_vec());
        assert_eq!(errors.message(Field::FirstName), "First name is required");
        assert_eq!(errors.message(Field::LastName), "Last name is required");
        assert_eq!(errors.message(Field::Email), "Email is required");
        assert_eq!(errors.message(Field::PhoneNumber), "Phone number is required");
        assert_eq!(errors.message(Field::Photo), "Photo is required");
        assert_eq!(errors.message(Field::Age), "Age cannot be less than 1");
    }

    #[test]
    fn test_complete_values_pass() {
        assert!(FormErrors::validate(&complete_values()).is_empty());
    }

    #[test]
    fn test_shape_errors() {
        let mut values = complete_values();
        values.email = "a@b".into();
        values.phone_number = "abc".into();
        let errors = FormErrors::validate(&values);
        assert_eq!(errors.email, Some(FieldError::InvalidEmail));
        assert_eq!(errors.phone_number, Some(FieldError::InvalidPhoneNumber));
        assert_eq!(errors.failing(), vec![Field::Email, Field::PhoneNumber]);
        assert_eq!(
            errors.message(Field::PhoneNumber),
            "Please use correct formatting. \n Example: +48 123 456 789"
        );
    }

    #[test]
    fn test_age_boundary() {
        let mut values = complete_values();
        values.age = 0;
        assert_eq!(
            FormErrors::validate(&values).message(Field::Age),
            "Age cannot be less than 1"
        );
        values.age = 1;
        assert!(FormErrors::validate(&values).get(Field::Age).is_none());
    }

    #[test]
    fn test_set_age_clamps_to_slider_max() {
        let mut values = FormValues::default();
        values.set_age(250);
        assert_eq!(values.age, MAX_AGE);
    }

    #[test]
    fn test_clear_only_touches_one_field() {
        let mut errors = FormErrors::validate(&FormValues::default());
        errors.clear(Field::Email);
        assert!(errors.get(Field::Email).is_none());
        assert_eq!(errors.failing().len(), Field::ALL.len() - 1);
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!(Level::default(), Level::Beginner);
        assert_eq!("Intermediate".parse::<Level>(), Ok(Level::Intermediate));
        assert!("Expert".parse::<Level>().is_err());
    }

    #[test]
    fn test_photo_defaults_content_type() {
        let photo = Photo::new("x", "", Vec::<u8>::new());
        assert_eq!(photo.content_type, DEFAULT_PHOTO_CONTENT_TYPE);
    }

    #[test]
    fn test_snapshot_summarises_photo() {
        let json = serde_json::to_value(complete_values()).unwrap();
        assert_eq!(json["firstName"], "Jan");
        assert_eq!(json["level"], "Advanced");
        assert_eq!(json["photo"]["size"], 3);
        assert_eq!(json["photo"]["type"], "image/png");
    }
}
