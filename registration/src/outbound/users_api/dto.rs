//! Wire payload for `POST /users`.
//!
//! Borrows from the domain record so the password is never copied into a
//! second owned buffer.

use serde::Serialize;

use crate::domain::RegistrationInput;

#[derive(Serialize)]
pub(super) struct CreateUserRequestDto<'a> {
    name: &'a str,
    age: u8,
    email: &'a str,
    password: &'a str,
}

impl<'a> From<&'a RegistrationInput> for CreateUserRequestDto<'a> {
    fn from(input: &'a RegistrationInput) -> Self {
        Self {
            name: input.name().as_ref(),
            age: input.age().years(),
            email: input.email().as_ref(),
            password: input.password().expose(),
        }
    }
}
