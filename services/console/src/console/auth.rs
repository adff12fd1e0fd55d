use std::io::{self, BufRead, Write};

use rentease::marketplace::validation::{
    is_single_word, is_valid_email, is_valid_mobile_number, is_valid_password, validate_age,
};
use rentease::marketplace::{Actor, MarketplaceError, ProfileUpdate, SignUpForm, User};

use super::Console;
use crate::render;

const AGE_HINT: &str = "You must be at least 18 and enter a realistic age.";
const EMAIL_HINT: &str = "Enter a valid email address.";
const MOBILE_HINT: &str = "Enter a 10 digit mobile number starting with 6, 7, 8 or 9.";

impl<R: BufRead, W: Write> Console<'_, R, W> {
    pub(super) fn login(&mut self) -> io::Result<()> {
        let app = self.app;
        render::heading(&mut self.output, "Log In")?;

        let attempts = app.max_login_attempts;
        for attempt in 1..=attempts {
            let username = self.prompt("Username")?;
            let password = self.prompt("Password")?;
            match app.marketplace.users().login(&username, &password) {
                Ok(Some(actor)) => {
                    writeln!(self.output, "Login successful.")?;
                    return self.dashboard(&actor);
                }
                Ok(None) => {
                    let left = attempts - attempt;
                    if left == 0 {
                        writeln!(
                            self.output,
                            "Login failed. You have used all {attempts} attempts."
                        )?;
                    } else {
                        writeln!(
                            self.output,
                            "Invalid username or password. You have {left} attempt(s) left."
                        )?;
                    }
                }
                Err(err) => return self.report(&err),
            }
        }
        Ok(())
    }

    pub(super) fn sign_up(&mut self) -> io::Result<()> {
        let app = self.app;
        render::heading(&mut self.output, "Sign Up")?;

        let username =
            self.prompt_text("Username", "Username must be a single word.", is_single_word)?;
        let password = self.prompt_text(
            "Password",
            "Password must be longer than 8 characters with upper-case, lower-case, digit and special characters.",
            is_valid_password,
        )?;
        let name = self.prompt_text("Full name", "Name cannot be empty.", |value| {
            !value.is_empty()
        })?;
        let age = self.prompt_parsed("Age", AGE_HINT, |age: &u8| validate_age(*age).is_ok())?;
        let email = self.prompt_text("Email", EMAIL_HINT, is_valid_email)?;
        let phone_number = self.prompt_text("Mobile number", MOBILE_HINT, is_valid_mobile_number)?;
        let address = self.prompt_text("Address", "Address cannot be empty.", |value| {
            !value.is_empty()
        })?;

        let form = SignUpForm {
            username,
            password,
            name,
            age,
            email,
            phone_number,
            address,
        };
        match app.marketplace.users().sign_up(form) {
            Ok(user) => writeln!(
                self.output,
                "Account '{}' created. You can log in now.",
                user.username
            ),
            Err(err) => self.report(&err),
        }
    }

    pub(super) fn profile(&mut self, actor: &Actor) -> io::Result<()> {
        let app = self.app;
        loop {
            let user = match app.marketplace.users().find_by_username(actor.username()) {
                Ok(Some(user)) => user,
                Ok(None) => {
                    let missing = MarketplaceError::UserNotFound(actor.username().to_string());
                    return self.report(&missing);
                }
                Err(err) => return self.report(&err),
            };

            render::heading(&mut self.output, "Your Profile")?;
            render::user_profile(&mut self.output, &user)?;
            writeln!(self.output, "1. Update Profile")?;
            writeln!(self.output, "2. Go Back")?;
            match self.choice()? {
                Some(1) => self.update_profile(actor, &user)?,
                Some(2) => return Ok(()),
                _ => self.invalid_choice()?,
            }
        }
    }

    fn update_profile(&mut self, actor: &Actor, current: &User) -> io::Result<()> {
        let app = self.app;
        writeln!(self.output, "Press Enter to keep the current value.")?;

        let name = self.prompt_or_keep("Name", &current.name, "Name cannot be empty.", |value| {
            !value.is_empty()
        })?;
        let age = loop {
            let raw = self.prompt(&format!("Age [{}]", current.age))?;
            if raw.is_empty() {
                break current.age;
            }
            match raw.parse::<u8>() {
                Ok(age) if validate_age(age).is_ok() => break age,
                _ => writeln!(self.output, "{AGE_HINT}")?,
            }
        };
        let email = self.prompt_or_keep("Email", &current.email, EMAIL_HINT, is_valid_email)?;
        let phone_number = self.prompt_or_keep(
            "Mobile number",
            &current.phone_number,
            MOBILE_HINT,
            is_valid_mobile_number,
        )?;
        let address =
            self.prompt_or_keep("Address", &current.address, "Address cannot be empty.", |value| {
                !value.is_empty()
            })?;

        let update = ProfileUpdate {
            name,
            age,
            email,
            phone_number,
            address,
        };
        match app.marketplace.users().update_profile(actor, update) {
            Ok(_) => writeln!(self.output, "Profile updated."),
            Err(err) => self.report(&err),
        }
    }

    fn prompt_or_keep(
        &mut self,
        label: &str,
        current: &str,
        hint: &str,
        accept: impl Fn(&str) -> bool,
    ) -> io::Result<String> {
        loop {
            let value = self.prompt(&format!("{label} [{current}]"))?;
            if value.is_empty() {
                return Ok(current.to_string());
            }
            if accept(&value) {
                return Ok(value);
            }
            writeln!(self.output, "{hint}")?;
        }
    }
}
