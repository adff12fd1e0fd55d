//! Numbered-menu front end over any line reader and writer.
//!
//! Marketplace failures are shown to the user and the current menu carries on; only I/O
//! errors end a session. Input running dry ends it cleanly.

mod admin;
mod auth;
mod landlord;
mod listing_form;
mod tenant;

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use rentease::marketplace::{Actor, MarketplaceError};
use tracing::warn;

use crate::infra::App;
use crate::render;

pub(crate) struct Console<'a, R, W> {
    app: &'a App,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub(crate) fn new(app: &'a App, input: R, output: W) -> Self {
        Self { app, input, output }
    }

    pub(crate) fn run(&mut self) -> io::Result<()> {
        match self.main_menu() {
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                writeln!(self.output)?;
                writeln!(self.output, "Input closed. Goodbye!")?;
                self.output.flush()
            }
            other => other,
        }
    }

    fn main_menu(&mut self) -> io::Result<()> {
        loop {
            render::heading(&mut self.output, "Welcome to RentEase")?;
            writeln!(self.output, "1. Log In")?;
            writeln!(self.output, "2. Sign Up")?;
            writeln!(self.output, "3. Exit")?;
            match self.choice()? {
                Some(1) => self.login()?,
                Some(2) => self.sign_up()?,
                Some(3) => {
                    writeln!(self.output, "Thank you for using RentEase. Goodbye!")?;
                    return self.output.flush();
                }
                _ => self.invalid_choice()?,
            }
        }
    }

    fn dashboard(&mut self, actor: &Actor) -> io::Result<()> {
        if actor.is_admin() {
            self.admin_dashboard(actor)
        } else {
            self.user_dashboard(actor)
        }
    }

    fn user_dashboard(&mut self, actor: &Actor) -> io::Result<()> {
        loop {
            render::heading(
                &mut self.output,
                &format!("Welcome, {}", actor.username()),
            )?;
            writeln!(self.output, "1. Landlord Section")?;
            writeln!(self.output, "2. Tenant Section")?;
            writeln!(self.output, "3. View Profile")?;
            writeln!(self.output, "4. Logout")?;
            match self.choice()? {
                Some(1) => self.landlord_section(actor)?,
                Some(2) => self.tenant_section(actor)?,
                Some(3) => self.profile(actor)?,
                Some(4) => {
                    writeln!(self.output, "Logged out.")?;
                    return Ok(());
                }
                _ => self.invalid_choice()?,
            }
        }
    }

    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    fn choice(&mut self) -> io::Result<Option<usize>> {
        Ok(self.prompt("Enter your choice")?.parse().ok())
    }

    fn invalid_choice(&mut self) -> io::Result<()> {
        writeln!(self.output, "Invalid choice. Please try again.")
    }

    /// Re-prompts until the text passes `accept`.
    fn prompt_text(
        &mut self,
        label: &str,
        hint: &str,
        accept: impl Fn(&str) -> bool,
    ) -> io::Result<String> {
        loop {
            let value = self.prompt(label)?;
            if accept(&value) {
                return Ok(value);
            }
            writeln!(self.output, "{hint}")?;
        }
    }

    /// Re-prompts until the input parses and passes `accept`.
    fn prompt_parsed<T: FromStr>(
        &mut self,
        label: &str,
        hint: &str,
        accept: impl Fn(&T) -> bool,
    ) -> io::Result<T> {
        loop {
            match self.prompt(label)?.parse::<T>() {
                Ok(value) if accept(&value) => return Ok(value),
                _ => writeln!(self.output, "{hint}")?,
            }
        }
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.prompt(&format!("{question} (y/n)"))?;
        Ok(matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    /// Picks one of `count` numbered entries. `None` means the user went back.
    fn select(&mut self, count: usize) -> io::Result<Option<usize>> {
        loop {
            let raw = self.prompt(&format!("Select a number (1-{count}, 0 to go back)"))?;
            match raw.parse::<usize>() {
                Ok(0) => return Ok(None),
                Ok(number) if number <= count => return Ok(Some(number - 1)),
                _ => writeln!(self.output, "Please enter a number between 0 and {count}.")?,
            }
        }
    }

    fn pick_option<T: Copy>(
        &mut self,
        title: &str,
        options: &[T],
        label: fn(T) -> &'static str,
    ) -> io::Result<T> {
        writeln!(self.output, "{title}")?;
        for (index, option) in options.iter().enumerate() {
            writeln!(self.output, "{}. {}", index + 1, label(*option))?;
        }
        loop {
            let raw = self.prompt("Select an option")?;
            match raw.parse::<usize>() {
                Ok(number) if (1..=options.len()).contains(&number) => {
                    return Ok(options[number - 1])
                }
                _ => writeln!(
                    self.output,
                    "Please choose between 1 and {}.",
                    options.len()
                )?,
            }
        }
    }

    fn report(&mut self, err: &MarketplaceError) -> io::Result<()> {
        if matches!(
            err,
            MarketplaceError::Repository(_)
                | MarketplaceError::Credentials(_)
                | MarketplaceError::RentalSyncFailed { .. }
        ) {
            warn!(error = %err, "marketplace operation failed");
        }
        writeln!(self.output, "Error: {err}")
    }
}
