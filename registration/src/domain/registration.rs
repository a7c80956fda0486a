//! Registration input and the rules that validate it.
//!
//! Raw form values arrive as [`RawRegistration`]. [`validate`] checks every
//! field independently and either returns a typed [`RegistrationInput`] or a
//! [`ValidationErrors`] map holding the first failing rule of each field.

use std::collections::BTreeMap;
use std::fmt;
use std::num::IntErrorKind;
use std::sync::OnceLock;

use regex::Regex;
use zeroize::Zeroizing;

/// Youngest accepted age, inclusive.
pub const AGE_MIN: u8 = 18;
/// Oldest accepted age, inclusive.
pub const AGE_MAX: u8 = 100;
/// Minimum number of characters in a password.
pub const PASSWORD_MIN_CHARS: usize = 6;

/// Form fields in the order they are presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    /// Full name.
    Name,
    /// Age in whole years.
    Age,
    /// Contact email address.
    Email,
    /// Account password.
    Password,
}

impl Field {
    /// Field name as it appears in the form and on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Age => "age",
            Self::Email => "email",
            Self::Password => "password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category of a field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Text field is blank after trimming.
    EmptyField,
    /// Value is shorter than the required length.
    TooShort,
    /// Value is absent or cannot be read as a number.
    MissingField,
    /// Number lies outside the accepted bounds.
    OutOfRange,
    /// Value does not match the expected format.
    InvalidFormat,
}

impl FieldErrorKind {
    /// Machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::EmptyField => "empty_field",
            Self::TooShort => "too_short",
            Self::MissingField => "missing_field",
            Self::OutOfRange => "out_of_range",
            Self::InvalidFormat => "invalid_format",
        }
    }
}

/// A validation failure attached to one field, with the message shown inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    kind: FieldErrorKind,
    message: String,
}

impl FieldError {
    fn new(kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    fn name_required() -> Self {
        Self::new(FieldErrorKind::EmptyField, "Name is required")
    }

    fn password_too_short() -> Self {
        Self::new(
            FieldErrorKind::TooShort,
            format!("Password must be at least {PASSWORD_MIN_CHARS} characters"),
        )
    }

    fn age_required() -> Self {
        Self::new(FieldErrorKind::MissingField, "Age is required")
    }

    fn age_not_a_whole_number() -> Self {
        Self::new(FieldErrorKind::MissingField, "Age must be a whole number")
    }

    fn age_too_young() -> Self {
        Self::new(
            FieldErrorKind::OutOfRange,
            format!("Minimum age is {AGE_MIN}"),
        )
    }

    fn age_too_old() -> Self {
        Self::new(
            FieldErrorKind::OutOfRange,
            format!("Maximum age is {AGE_MAX}"),
        )
    }

    fn email_required() -> Self {
        Self::new(FieldErrorKind::EmptyField, "Email is required")
    }

    fn email_malformed() -> Self {
        Self::new(FieldErrorKind::InvalidFormat, "Email format is invalid")
    }

    /// Failure category.
    #[must_use]
    pub const fn kind(&self) -> FieldErrorKind {
        self.kind
    }

    /// Human-readable message displayed next to the field.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Field-level errors keyed by field, one message per invalid field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<Field, FieldError>);

impl ValidationErrors {
    /// Error recorded for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.get(&field)
    }

    /// Whether `field` failed validation.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Iterate errors in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.0.iter().map(|(field, error)| (*field, error))
    }

    /// Fields that failed, in form order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    /// Number of invalid fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn capture<T>(&mut self, field: Field, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.0.entry(field).or_insert(error);
                None
            }
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, error) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {error}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Outcome of [`validate`].
pub type ValidationResult = Result<RegistrationInput, ValidationErrors>;

/// User's name, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a [`PersonName`].
    ///
    /// # Errors
    ///
    /// Returns an [`FieldErrorKind::EmptyField`] error when the trimmed input is empty.
    pub fn new(name: &str) -> Result<Self, FieldError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(FieldError::name_required());
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Age in whole years within `[AGE_MIN, AGE_MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Age(u8);

impl Age {
    /// Validate a numeric age.
    ///
    /// # Errors
    ///
    /// Returns an [`FieldErrorKind::OutOfRange`] error outside the accepted bounds.
    pub fn new(years: i64) -> Result<Self, FieldError> {
        if years < i64::from(AGE_MIN) {
            return Err(FieldError::age_too_young());
        }
        if years > i64::from(AGE_MAX) {
            return Err(FieldError::age_too_old());
        }
        u8::try_from(years)
            .map(Self)
            .map_err(|_| FieldError::age_too_old())
    }

    /// Parse the raw text of the age field.
    ///
    /// Absent or blank input and non-integer text are reported as
    /// [`FieldErrorKind::MissingField`]; integers too large for any numeric type
    /// still count as out of range. Decimal text with an all-zero fraction,
    /// such as `30.0`, reads as the whole number it denotes.
    ///
    /// # Errors
    ///
    /// Returns the first failing age rule.
    pub fn parse(raw: Option<&str>) -> Result<Self, FieldError> {
        let text = raw
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .ok_or_else(FieldError::age_required)?;

        match integral_part(text).parse::<i64>() {
            Ok(years) => Self::new(years),
            Err(error) => Err(match error.kind() {
                IntErrorKind::PosOverflow => FieldError::age_too_old(),
                IntErrorKind::NegOverflow => FieldError::age_too_young(),
                _ => FieldError::age_not_a_whole_number(),
            }),
        }
    }

    /// Age in years.
    #[must_use]
    pub const fn years(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Drop a zero fraction so `30.0` and `30.` read as `30`.
fn integral_part(text: &str) -> &str {
    match text.split_once('.') {
        Some((whole, fraction)) if !whole.is_empty() && fraction.bytes().all(|b| b == b'0') => {
            whole
        }
        _ => text,
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Dot-separated local atoms, dot-terminated domain labels, alphabetic TLD.
        let pattern = concat!(
            r"^[A-Za-z0-9_'+\-]+(\.[A-Za-z0-9_'+\-]+)*",
            r"@([A-Za-z0-9]([A-Za-z0-9\-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$",
        );
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address, trimmed and matching the accepted address grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrorKind::EmptyField`] for blank input and
    /// [`FieldErrorKind::InvalidFormat`] when the address is malformed.
    pub fn new(email: &str) -> Result<Self, FieldError> {
        let trimmed = email.trim();
        if trimmed.is_empty() {
            return Err(FieldError::email_required());
        }
        if !email_regex().is_match(trimmed) {
            return Err(FieldError::email_malformed());
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Address with the local part masked, suitable for logs.
    ///
    /// # Examples
    /// ```
    /// use registration::domain::EmailAddress;
    ///
    /// let email = EmailAddress::new("ana@example.com").unwrap();
    /// assert_eq!(email.masked(), "a***@example.com");
    /// ```
    #[must_use]
    pub fn masked(&self) -> String {
        match self.0.split_once('@') {
            Some((local, domain)) => {
                let mut chars = local.chars();
                match (chars.next(), chars.next()) {
                    (Some(first), Some(_)) => format!("{first}***@{domain}"),
                    _ => format!("*@{domain}"),
                }
            }
            None => "***@***".to_owned(),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Password kept verbatim, wiped on drop and never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and construct a [`Password`].
    ///
    /// Length is counted in characters; whitespace is significant.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrorKind::TooShort`] below [`PASSWORD_MIN_CHARS`].
    pub fn new(password: &str) -> Result<Self, FieldError> {
        if password.chars().count() < PASSWORD_MIN_CHARS {
            return Err(FieldError::password_too_short());
        }
        Ok(Self(Zeroizing::new(password.to_owned())))
    }

    /// Plain-text password for serialisation.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Raw field values as entered in the form.
///
/// `age` holds the text of the numeric field; `None` means the field was left
/// empty.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RawRegistration {
    /// Name as typed.
    pub name: String,
    /// Text of the age field, if any.
    pub age: Option<String>,
    /// Email as typed.
    pub email: String,
    /// Password as typed.
    pub password: String,
}

impl fmt::Debug for RawRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawRegistration")
            .field("name", &self.name)
            .field("age", &self.age)
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Validated registration record ready for submission.
///
/// ## Invariants
/// - `name` and `email` are trimmed and non-empty.
/// - `email` matches the accepted address grammar.
/// - `age` is within `[AGE_MIN, AGE_MAX]`.
/// - `password` has at least [`PASSWORD_MIN_CHARS`] characters.
///
/// # Examples
/// ```
/// use registration::domain::{RawRegistration, validate};
///
/// let raw = RawRegistration {
///     name: "Ana".into(),
///     age: Some("30".into()),
///     email: "ana@x.com".into(),
///     password: "secret".into(),
/// };
/// let input = validate(&raw).unwrap();
/// assert_eq!(input.age().years(), 30);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationInput {
    name: PersonName,
    age: Age,
    email: EmailAddress,
    password: Password,
}

impl RegistrationInput {
    /// Build a record from already validated components.
    #[must_use]
    pub const fn new(name: PersonName, age: Age, email: EmailAddress, password: Password) -> Self {
        Self {
            name,
            age,
            email,
            password,
        }
    }

    /// Trimmed name.
    #[must_use]
    pub const fn name(&self) -> &PersonName {
        &self.name
    }

    /// Age within the accepted bounds.
    #[must_use]
    pub const fn age(&self) -> Age {
        self.age
    }

    /// Trimmed, well-formed email address.
    #[must_use]
    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password exactly as entered.
    #[must_use]
    pub const fn password(&self) -> &Password {
        &self.password
    }
}

impl TryFrom<&RawRegistration> for RegistrationInput {
    type Error = ValidationErrors;

    fn try_from(raw: &RawRegistration) -> Result<Self, Self::Error> {
        validate(raw)
    }
}

/// Validate every field of `raw`.
///
/// Fields are checked independently, so the error map reports every invalid
/// field at once. Within one field the first failing rule wins.
///
/// Name and email are trimmed before their rules apply: a name of only spaces
/// counts as blank and surrounding whitespace on an email is dropped. The
/// password is never trimmed.
///
/// # Errors
///
/// Returns [`ValidationErrors`] when any field fails.
pub fn validate(raw: &RawRegistration) -> ValidationResult {
    let mut errors = ValidationErrors::default();

    let name = errors.capture(Field::Name, PersonName::new(&raw.name));
    let password = errors.capture(Field::Password, Password::new(&raw.password));
    let age = errors.capture(Field::Age, Age::parse(raw.age.as_deref()));
    let email = errors.capture(Field::Email, EmailAddress::new(&raw.email));

    match (name, age, email, password) {
        (Some(name), Some(age), Some(email), Some(password)) => {
            Ok(RegistrationInput::new(name, age, email, password))
        }
        _ => Err(errors),
    }
}
