//! User field validation for create and update requests.
//!
//! Field order is fixed: username, password, name, surname, patronymic,
//! date of birth, phone number, registration address, gender, role. Within
//! a field the rules also run in a fixed order, so a value breaking several
//! rules always reports the earliest one.

use std::sync::LazyLock;

use hotelier_postgres::types::{Gender, UserRole};
use jiff::civil::Date;
use regex::Regex;

use crate::validate::ValidationError;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9]+$").unwrap());
static RUSSIAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[А-Яа-я]+$").unwrap());
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[0-9]{10,15}$").unwrap());
// The `.-:` range inside the class is deliberate and matches a few extra
// punctuation characters between `.` and `:`.
static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-zА-Яа-я0-9 ,.-:]+$").unwrap());

const DATE_FORMAT: &str = "%Y-%m-%d";

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Walks an ordered `(holds, message)` rule list and reports the first
/// broken rule.
fn first_violation(rules: &[(bool, &'static str)]) -> Result<(), ValidationError> {
    match rules.iter().find(|(holds, _)| !holds) {
        Some(&(_, message)) => Err(ValidationError(message)),
        None => Ok(()),
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn has_letters_and_digits(password: &str) -> bool {
    password.bytes().any(|b| b.is_ascii_alphabetic())
        && password.bytes().any(|b| b.is_ascii_digit())
}

fn parse_date(value: &str) -> Result<Date, ValidationError> {
    Date::strptime(DATE_FORMAT, value)
        .map_err(|_| ValidationError("Invalid date format. Use YYYY-MM-DD"))
}

fn parse_gender(value: &str) -> Result<Gender, ValidationError> {
    value.parse().map_err(|_| ValidationError("Invalid gender"))
}

fn parse_role(value: &str) -> Result<UserRole, ValidationError> {
    value.parse().map_err(|_| ValidationError("Invalid role"))
}

/// Raw field values for creating a user.
///
/// All fields are optional at this level so that a missing field reports its
/// "required" message instead of failing deserialization. `username_taken`
/// is the prefetched uniqueness lookup for the requested username.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateUserInput<'a> {
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub confirm_password: Option<&'a str>,
    pub name: Option<&'a str>,
    pub surname: Option<&'a str>,
    pub patronymic: Option<&'a str>,
    pub date_of_birth: Option<&'a str>,
    pub phone_number: Option<&'a str>,
    pub registration_address: Option<&'a str>,
    pub gender: Option<&'a str>,
    pub role: Option<&'a str>,
    pub username_taken: bool,
}

/// Fully validated create payload.
///
/// The password is still plaintext here; hashing happens in the handler
/// right before the insert.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCreateUser {
    pub username: String,
    pub password: String,
    pub name: String,
    pub surname: String,
    pub patronymic: String,
    pub date_of_birth: Date,
    pub phone_number: String,
    pub registration_address: String,
    pub gender: Gender,
    pub role: UserRole,
}

impl CreateUserInput<'_> {
    /// Runs the full pipeline, stopping at the first broken rule.
    pub fn validate(&self) -> Result<ValidCreateUser, ValidationError> {
        let username = self.validate_username()?;
        let password = self.validate_password()?;
        let name = self.validate_name()?;
        let surname = self.validate_surname()?;
        let patronymic = self.validate_patronymic()?;
        let date_of_birth = self.validate_date_of_birth()?;
        let phone_number = self.validate_phone_number()?;
        let registration_address = self.validate_registration_address()?;
        let gender = self.validate_gender()?;
        let role = self.validate_role()?;

        Ok(ValidCreateUser {
            username: username.to_owned(),
            password: password.to_owned(),
            name: name.to_owned(),
            surname: surname.to_owned(),
            patronymic: patronymic.unwrap_or_default().to_owned(),
            date_of_birth,
            phone_number: phone_number.to_owned(),
            registration_address: registration_address.to_owned(),
            gender,
            role,
        })
    }

    fn validate_username(&self) -> Result<&str, ValidationError> {
        let Some(username) = present(self.username) else {
            return Err(ValidationError("Username is required"));
        };
        first_violation(&[
            (
                !self.username_taken,
                "User with this username is already there",
            ),
            (
                (4..=20).contains(&char_len(username)),
                "Username must be between 4 and 20 characters",
            ),
            (
                USERNAME_RE.is_match(username),
                "Username must contain only letters and digits",
            ),
        ])?;
        Ok(username)
    }

    fn validate_password(&self) -> Result<&str, ValidationError> {
        let Some(password) = present(self.password) else {
            return Err(ValidationError("Password is required"));
        };
        first_violation(&[
            (
                (8..=20).contains(&char_len(password)),
                "Password must be between 8 and 20 characters",
            ),
            (
                has_letters_and_digits(password),
                "Password must contain both letters and numbers",
            ),
            (
                Some(password) == self.confirm_password,
                "Passwords do not match",
            ),
        ])?;
        Ok(password)
    }

    fn validate_name(&self) -> Result<&str, ValidationError> {
        let Some(name) = present(self.name) else {
            return Err(ValidationError("Name is required"));
        };
        first_violation(&[
            (
                RUSSIAN_RE.is_match(name),
                "Name must contain only Russian letters",
            ),
            (
                (2..=50).contains(&char_len(name)),
                "Name must be between 2 and 50 characters",
            ),
        ])?;
        Ok(name)
    }

    fn validate_surname(&self) -> Result<&str, ValidationError> {
        let Some(surname) = present(self.surname) else {
            return Err(ValidationError("Surname is required"));
        };
        first_violation(&[
            (
                RUSSIAN_RE.is_match(surname),
                "Surname must contain only Russian letters",
            ),
            (
                (2..=50).contains(&char_len(surname)),
                "Surname must be between 2 and 50 characters",
            ),
        ])?;
        Ok(surname)
    }

    fn validate_patronymic(&self) -> Result<Option<&str>, ValidationError> {
        let Some(patronymic) = present(self.patronymic) else {
            return Ok(None);
        };
        first_violation(&[
            (
                RUSSIAN_RE.is_match(patronymic),
                "Patronymic must contain only Russian letters",
            ),
            (
                (2..=50).contains(&char_len(patronymic)),
                "Patronymic must be between 2 and 50 characters",
            ),
        ])?;
        Ok(Some(patronymic))
    }

    fn validate_date_of_birth(&self) -> Result<Date, ValidationError> {
        let Some(date_of_birth) = present(self.date_of_birth) else {
            return Err(ValidationError("Date of birth is required"));
        };
        parse_date(date_of_birth)
    }

    fn validate_phone_number(&self) -> Result<&str, ValidationError> {
        let Some(phone_number) = present(self.phone_number) else {
            return Err(ValidationError("Phone number is required"));
        };
        first_violation(&[(
            PHONE_RE.is_match(phone_number),
            "Invalid phone number format",
        )])?;
        Ok(phone_number)
    }

    fn validate_registration_address(&self) -> Result<&str, ValidationError> {
        let Some(registration_address) = present(self.registration_address) else {
            return Err(ValidationError("Registration address is required"));
        };
        first_violation(&[
            (
                (5..=100).contains(&char_len(registration_address)),
                "Registration address must be between 5 and 100 characters",
            ),
            (
                ADDRESS_RE.is_match(registration_address),
                "Registration address can only contain letters, numbers, and the following symbols: , . - :",
            ),
        ])?;
        Ok(registration_address)
    }

    fn validate_gender(&self) -> Result<Gender, ValidationError> {
        parse_gender(self.gender.unwrap_or_default())
    }

    fn validate_role(&self) -> Result<UserRole, ValidationError> {
        parse_role(self.role.unwrap_or_default())
    }
}

/// Raw field values for a partial update.
///
/// `None` means the field was absent from the request and is neither
/// validated nor written. A present-but-empty string is a value and goes
/// through the rules like any other.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateUserInput<'a> {
    /// Username the user currently holds; a request naming the same
    /// username skips every username rule.
    pub current_username: &'a str,
    pub username_taken: bool,
    pub username: Option<&'a str>,
    pub password: Option<&'a str>,
    pub name: Option<&'a str>,
    pub surname: Option<&'a str>,
    pub patronymic: Option<&'a str>,
    pub date_of_birth: Option<&'a str>,
    pub phone_number: Option<&'a str>,
    pub registration_address: Option<&'a str>,
    pub gender: Option<&'a str>,
    pub role: Option<&'a str>,
}

/// Fully validated update payload; only present fields are `Some`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidUpdateUser {
    pub username: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub patronymic: Option<String>,
    pub date_of_birth: Option<Date>,
    pub phone_number: Option<String>,
    pub registration_address: Option<String>,
    pub gender: Option<Gender>,
    pub role: Option<UserRole>,
}

impl UpdateUserInput<'_> {
    /// Runs the pipeline over the present fields only, in the same field
    /// order as creation.
    pub fn validate(&self) -> Result<ValidUpdateUser, ValidationError> {
        let username = self.validate_username()?;
        let password = self.validate_password()?;
        let name = self.validate_name()?;
        let surname = self.validate_surname()?;
        let patronymic = self.validate_patronymic()?;
        let date_of_birth = self.validate_date_of_birth()?;
        let phone_number = self.validate_phone_number()?;
        let registration_address = self.validate_registration_address()?;
        let gender = self.validate_gender()?;
        let role = self.validate_role()?;

        Ok(ValidUpdateUser {
            username: username.map(str::to_owned),
            password: password.map(str::to_owned),
            name: name.map(str::to_owned),
            surname: surname.map(str::to_owned),
            patronymic: patronymic.map(str::to_owned),
            date_of_birth,
            phone_number: phone_number.map(str::to_owned),
            registration_address: registration_address.map(str::to_owned),
            gender,
            role,
        })
    }

    fn validate_username(&self) -> Result<Option<&str>, ValidationError> {
        let Some(username) = self.username else {
            return Ok(None);
        };
        // Keeping the current username is always allowed, even when the
        // uniqueness lookup reports it as taken by its owner.
        if username == self.current_username {
            return Ok(Some(username));
        }
        first_violation(&[
            (
                !self.username_taken,
                "User with this username already exists",
            ),
            (
                (4..=20).contains(&char_len(username)),
                "Username must be between 4 and 20 characters",
            ),
            (
                USERNAME_RE.is_match(username),
                "Username must contain only letters and digits",
            ),
        ])?;
        Ok(Some(username))
    }

    fn validate_password(&self) -> Result<Option<&str>, ValidationError> {
        let Some(password) = self.password else {
            return Ok(None);
        };
        first_violation(&[
            (
                (8..=20).contains(&char_len(password)),
                "Password must be between 8 and 20 characters",
            ),
            (
                has_letters_and_digits(password),
                "Password must contain both letters and numbers",
            ),
        ])?;
        Ok(Some(password))
    }

    fn validate_name(&self) -> Result<Option<&str>, ValidationError> {
        let Some(name) = self.name else {
            return Ok(None);
        };
        first_violation(&[
            (
                RUSSIAN_RE.is_match(name),
                "Name must contain only Russian letters",
            ),
            (
                (2..=50).contains(&char_len(name)),
                "Name must be between 2 and 50 characters",
            ),
        ])?;
        Ok(Some(name))
    }

    fn validate_surname(&self) -> Result<Option<&str>, ValidationError> {
        let Some(surname) = self.surname else {
            return Ok(None);
        };
        first_violation(&[
            (
                RUSSIAN_RE.is_match(surname),
                "Surname must contain only Russian letters",
            ),
            (
                (2..=50).contains(&char_len(surname)),
                "Surname must be between 2 and 50 characters",
            ),
        ])?;
        Ok(Some(surname))
    }

    fn validate_patronymic(&self) -> Result<Option<&str>, ValidationError> {
        let Some(patronymic) = self.patronymic else {
            return Ok(None);
        };
        // An empty patronymic clears the field without further checks.
        if patronymic.is_empty() {
            return Ok(Some(patronymic));
        }
        first_violation(&[
            (
                RUSSIAN_RE.is_match(patronymic),
                "Patronymic must contain only Russian letters",
            ),
            (
                (2..=50).contains(&char_len(patronymic)),
                "Patronymic must be between 2 and 50 characters",
            ),
        ])?;
        Ok(Some(patronymic))
    }

    fn validate_date_of_birth(&self) -> Result<Option<Date>, ValidationError> {
        self.date_of_birth.map(parse_date).transpose()
    }

    fn validate_phone_number(&self) -> Result<Option<&str>, ValidationError> {
        let Some(phone_number) = self.phone_number else {
            return Ok(None);
        };
        first_violation(&[(
            PHONE_RE.is_match(phone_number),
            "Invalid phone number format",
        )])?;
        Ok(Some(phone_number))
    }

    fn validate_registration_address(&self) -> Result<Option<&str>, ValidationError> {
        let Some(registration_address) = self.registration_address else {
            return Ok(None);
        };
        first_violation(&[
            (
                (5..=100).contains(&char_len(registration_address)),
                "Registration address must be between 5 and 100 characters",
            ),
            (
                ADDRESS_RE.is_match(registration_address),
                "Registration address can only contain letters, numbers, and the following symbols: , . - :",
            ),
        ])?;
        Ok(Some(registration_address))
    }

    fn validate_gender(&self) -> Result<Option<Gender>, ValidationError> {
        self.gender.map(parse_gender).transpose()
    }

    fn validate_role(&self) -> Result<Option<UserRole>, ValidationError> {
        self.role.map(parse_role).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateUserInput<'static> {
        CreateUserInput {
            username: Some("ivanov1"),
            password: Some("secret123"),
            confirm_password: Some("secret123"),
            name: Some("Иван"),
            surname: Some("Иванов"),
            patronymic: Some("Иванович"),
            date_of_birth: Some("1990-05-17"),
            phone_number: Some("+79161234567"),
            registration_address: Some("Москва, ул. Ленина 10"),
            gender: Some("male"),
            role: Some("user"),
            username_taken: false,
        }
    }

    #[test]
    fn valid_input_passes() {
        let valid = valid_create().validate().expect("input must validate");

        assert_eq!(valid.username, "ivanov1");
        assert_eq!(valid.patronymic, "Иванович");
        assert_eq!(valid.date_of_birth, jiff::civil::date(1990, 5, 17));
        assert_eq!(valid.gender, Gender::Male);
        assert_eq!(valid.role, UserRole::User);
    }

    #[test]
    fn missing_username_reports_before_everything_else() {
        // Every other field is broken too; username still wins.
        let input = CreateUserInput {
            username_taken: true,
            ..CreateUserInput::default()
        };

        let error = input.validate().unwrap_err();
        assert_eq!(error.message(), "Username is required");
    }

    #[test]
    fn taken_username_beats_its_format_rules() {
        let input = CreateUserInput {
            username: Some("x"),
            username_taken: true,
            ..valid_create()
        };

        let error = input.validate().unwrap_err();
        assert_eq!(error.message(), "User with this username is already there");
    }

    #[test]
    fn username_length_beats_charset() {
        let input = CreateUserInput {
            username: Some("я!"),
            ..valid_create()
        };

        let error = input.validate().unwrap_err();
        assert_eq!(error.message(), "Username must be between 4 and 20 characters");

        let input = CreateUserInput {
            username: Some("пользователь"),
            ..valid_create()
        };

        let error = input.validate().unwrap_err();
        assert_eq!(
            error.message(),
            "Username must contain only letters and digits"
        );
    }

    #[test]
    fn surrounding_whitespace_never_reaches_storage() {
        // The charset rules reject padded values outright, so no trimming
        // happens downstream.
        let input = CreateUserInput {
            username: Some(" ivanov1 "),
            ..valid_create()
        };
        assert_eq!(
            input.validate().unwrap_err().message(),
            "Username must contain only letters and digits"
        );

        let input = CreateUserInput {
            phone_number: Some("+79161234567 "),
            ..valid_create()
        };
        assert_eq!(
            input.validate().unwrap_err().message(),
            "Invalid phone number format"
        );
    }

    #[test]
    fn password_rules_in_order() {
        let short = CreateUserInput {
            password: Some("a1"),
            confirm_password: Some("a1"),
            ..valid_create()
        };
        assert_eq!(
            short.validate().unwrap_err().message(),
            "Password must be between 8 and 20 characters"
        );

        let letters_only = CreateUserInput {
            password: Some("abcdefgh"),
            confirm_password: Some("abcdefgh"),
            ..valid_create()
        };
        assert_eq!(
            letters_only.validate().unwrap_err().message(),
            "Password must contain both letters and numbers"
        );

        let mismatch = CreateUserInput {
            password: Some("secret123"),
            confirm_password: Some("secret124"),
            ..valid_create()
        };
        assert_eq!(
            mismatch.validate().unwrap_err().message(),
            "Passwords do not match"
        );

        let no_confirm = CreateUserInput {
            confirm_password: None,
            ..valid_create()
        };
        assert_eq!(
            no_confirm.validate().unwrap_err().message(),
            "Passwords do not match"
        );
    }

    #[test]
    fn name_charset_beats_length() {
        // A single Latin letter breaks both rules; charset is reported.
        let input = CreateUserInput {
            name: Some("A"),
            ..valid_create()
        };
        assert_eq!(
            input.validate().unwrap_err().message(),
            "Name must contain only Russian letters"
        );

        let input = CreateUserInput {
            name: Some("Я"),
            ..valid_create()
        };
        assert_eq!(
            input.validate().unwrap_err().message(),
            "Name must be between 2 and 50 characters"
        );
    }

    #[test]
    fn missing_patronymic_is_allowed() {
        let input = CreateUserInput {
            patronymic: None,
            ..valid_create()
        };

        let valid = input.validate().expect("patronymic is optional");
        assert_eq!(valid.patronymic, "");
    }

    #[test]
    fn bad_date_format_is_rejected() {
        let input = CreateUserInput {
            date_of_birth: Some("17.05.1990"),
            ..valid_create()
        };

        assert_eq!(
            input.validate().unwrap_err().message(),
            "Invalid date format. Use YYYY-MM-DD"
        );
    }

    #[test]
    fn phone_number_format() {
        for phone in ["+79161234567", "79161234567", "1234567890"] {
            let input = CreateUserInput {
                phone_number: Some(phone),
                ..valid_create()
            };
            assert!(input.validate().is_ok(), "{phone} must be accepted");
        }

        for phone in ["123", "+7 916 123 45 67", "phone12345"] {
            let input = CreateUserInput {
                phone_number: Some(phone),
                ..valid_create()
            };
            assert_eq!(
                input.validate().unwrap_err().message(),
                "Invalid phone number format",
                "{phone} must be rejected"
            );
        }
    }

    #[test]
    fn address_length_beats_charset() {
        // Too short and with a forbidden character; length is reported.
        let input = CreateUserInput {
            registration_address: Some("!!"),
            ..valid_create()
        };
        assert_eq!(
            input.validate().unwrap_err().message(),
            "Registration address must be between 5 and 100 characters"
        );

        let input = CreateUserInput {
            registration_address: Some("Ленина 10 (кв. 5)"),
            ..valid_create()
        };
        assert_eq!(
            input.validate().unwrap_err().message(),
            "Registration address can only contain letters, numbers, and the following symbols: , . - :"
        );
    }

    #[test]
    fn unknown_gender_and_role_are_rejected() {
        let input = CreateUserInput {
            gender: Some("other"),
            ..valid_create()
        };
        assert_eq!(input.validate().unwrap_err().message(), "Invalid gender");

        let input = CreateUserInput {
            role: Some("root"),
            ..valid_create()
        };
        assert_eq!(input.validate().unwrap_err().message(), "Invalid role");
    }

    #[test]
    fn update_with_no_fields_is_empty() {
        let input = UpdateUserInput {
            current_username: "ivanov1",
            ..UpdateUserInput::default()
        };

        let valid = input.validate().expect("empty update must validate");
        assert_eq!(valid, ValidUpdateUser::default());
    }

    #[test]
    fn update_validates_only_present_fields() {
        // Name is broken but absent fields stay unchecked.
        let input = UpdateUserInput {
            current_username: "ivanov1",
            name: Some("John"),
            ..UpdateUserInput::default()
        };

        assert_eq!(
            input.validate().unwrap_err().message(),
            "Name must contain only Russian letters"
        );
    }

    #[test]
    fn update_keeping_current_username_skips_all_checks() {
        // The prefetch reports the name as taken because its owner holds it.
        let input = UpdateUserInput {
            current_username: "ivanov1",
            username: Some("ivanov1"),
            username_taken: true,
            ..UpdateUserInput::default()
        };

        let valid = input.validate().expect("own username must pass");
        assert_eq!(valid.username.as_deref(), Some("ivanov1"));
    }

    #[test]
    fn update_to_taken_username_is_rejected() {
        let input = UpdateUserInput {
            current_username: "ivanov1",
            username: Some("petrov2"),
            username_taken: true,
            ..UpdateUserInput::default()
        };

        assert_eq!(
            input.validate().unwrap_err().message(),
            "User with this username already exists"
        );
    }

    #[test]
    fn update_has_no_confirm_password_rule() {
        let input = UpdateUserInput {
            current_username: "ivanov1",
            password: Some("secret123"),
            ..UpdateUserInput::default()
        };

        let valid = input.validate().expect("password alone must pass");
        assert_eq!(valid.password.as_deref(), Some("secret123"));
    }

    #[test]
    fn update_empty_patronymic_clears_the_field() {
        let input = UpdateUserInput {
            current_username: "ivanov1",
            patronymic: Some(""),
            ..UpdateUserInput::default()
        };

        let valid = input.validate().expect("empty patronymic must pass");
        assert_eq!(valid.patronymic.as_deref(), Some(""));
    }

    #[test]
    fn update_bad_date_is_rejected() {
        let input = UpdateUserInput {
            current_username: "ivanov1",
            date_of_birth: Some("not-a-date"),
            ..UpdateUserInput::default()
        };

        assert_eq!(
            input.validate().unwrap_err().message(),
            "Invalid date format. Use YYYY-MM-DD"
        );
    }

    #[test]
    fn field_order_is_stable_across_multiple_failures() {
        // Password and phone are both broken; password is the earlier field.
        let input = UpdateUserInput {
            current_username: "ivanov1",
            password: Some("short"),
            phone_number: Some("123"),
            ..UpdateUserInput::default()
        };

        assert_eq!(
            input.validate().unwrap_err().message(),
            "Password must be between 8 and 20 characters"
        );
    }
}
