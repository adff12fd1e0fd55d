use std::io::{self, BufRead, Write};

use rentease::marketplace::Actor;

use super::Console;
use crate::render;

impl<R: BufRead, W: Write> Console<'_, R, W> {
    pub(super) fn admin_dashboard(&mut self, actor: &Actor) -> io::Result<()> {
        loop {
            render::heading(&mut self.output, "Admin Dashboard")?;
            writeln!(self.output, "1. View All Users")?;
            writeln!(self.output, "2. Delete a User")?;
            writeln!(self.output, "3. Approve Properties")?;
            writeln!(self.output, "4. Logout")?;
            match self.choice()? {
                Some(1) => self.view_users(actor)?,
                Some(2) => self.delete_user(actor)?,
                Some(3) => self.approve_properties(actor)?,
                Some(4) => {
                    writeln!(self.output, "Logged out.")?;
                    return Ok(());
                }
                _ => self.invalid_choice()?,
            }
        }
    }

    fn view_users(&mut self, actor: &Actor) -> io::Result<()> {
        let app = self.app;
        let overview = match app.marketplace.users_overview(actor) {
            Ok(overview) => overview,
            Err(err) => return self.report(&err),
        };
        render::heading(&mut self.output, "Registered Users")?;
        if overview.is_empty() {
            return writeln!(self.output, "No users registered.");
        }
        for (index, entry) in overview.iter().enumerate() {
            render::user_overview(&mut self.output, index + 1, entry)?;
        }
        Ok(())
    }

    fn delete_user(&mut self, actor: &Actor) -> io::Result<()> {
        let app = self.app;
        let username = self.prompt("Username to delete (Enter to go back)")?;
        if username.is_empty() {
            return Ok(());
        }
        if !self.confirm(&format!(
            "Delete '{username}' together with their listings?"
        ))? {
            return Ok(());
        }
        match app.marketplace.delete_user(actor, &username) {
            Ok(report) => writeln!(
                self.output,
                "Deleted '{username}': {} properties removed, {} pending requests rejected.",
                report.properties_deleted, report.requests_rejected
            ),
            Err(err) => self.report(&err),
        }
    }

    fn approve_properties(&mut self, actor: &Actor) -> io::Result<()> {
        let app = self.app;
        loop {
            let pending = match app.marketplace.pending_properties(actor) {
                Ok(pending) => pending,
                Err(err) => return self.report(&err),
            };
            render::heading(&mut self.output, "Properties Awaiting Approval")?;
            if pending.is_empty() {
                return writeln!(self.output, "No properties are waiting for approval.");
            }
            for (index, property) in pending.iter().enumerate() {
                render::property_line(&mut self.output, index + 1, property)?;
            }

            let Some(index) = self.select(pending.len())? else {
                return Ok(());
            };
            let property = &pending[index];
            render::property_details(&mut self.output, property)?;
            if self.confirm("Approve this property?")? {
                match app.marketplace.approve_property(actor, &property.id) {
                    Ok(()) => writeln!(self.output, "Property approved.")?,
                    Err(err) => self.report(&err)?,
                }
            }
        }
    }
}
