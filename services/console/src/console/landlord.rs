use std::io::{self, BufRead, Write};

use rentease::marketplace::{Actor, ListingScope, RequestDecision, RequestId};

use super::Console;
use crate::render;

impl<R: BufRead, W: Write> Console<'_, R, W> {
    pub(super) fn landlord_section(&mut self, actor: &Actor) -> io::Result<()> {
        loop {
            render::heading(&mut self.output, "Landlord Section")?;
            writeln!(self.output, "1. List Your Property")?;
            writeln!(self.output, "2. View and Manage Listed Properties")?;
            writeln!(self.output, "3. Manage Rent Requests")?;
            writeln!(self.output, "4. Go Back")?;
            match self.choice()? {
                Some(1) => self.list_property(actor)?,
                Some(2) => self.manage_listings(actor)?,
                Some(3) => self.manage_requests(actor)?,
                Some(4) => return Ok(()),
                _ => self.invalid_choice()?,
            }
        }
    }

    fn list_property(&mut self, actor: &Actor) -> io::Result<()> {
        let app = self.app;
        render::heading(&mut self.output, "List Your Property")?;
        let draft = self.listing_draft()?;
        match app.marketplace.properties().list_property(actor, draft) {
            Ok(property) => writeln!(
                self.output,
                "'{}' has been listed and is awaiting admin approval.",
                property.title
            ),
            Err(err) => self.report(&err),
        }
    }

    fn manage_listings(&mut self, actor: &Actor) -> io::Result<()> {
        let app = self.app;
        let scope = ListingScope::OwnedBy(actor.username().to_string());
        loop {
            let listings = match app.marketplace.properties().listed_properties(&scope) {
                Ok(listings) => listings,
                Err(err) => return self.report(&err),
            };
            render::heading(&mut self.output, "Your Listed Properties")?;
            if listings.is_empty() {
                return writeln!(self.output, "You have not listed any properties yet.");
            }
            for (index, property) in listings.iter().enumerate() {
                render::property_line(&mut self.output, index + 1, property)?;
            }

            let Some(index) = self.select(listings.len())? else {
                return Ok(());
            };
            let property = &listings[index];
            render::property_details(&mut self.output, property)?;
            writeln!(self.output, "1. Update Property")?;
            writeln!(self.output, "2. Delete Property")?;
            writeln!(self.output, "3. Go Back")?;
            match self.choice()? {
                Some(1) => {
                    let draft = self.listing_draft()?;
                    match app
                        .marketplace
                        .properties()
                        .update_listed_property(actor, &property.id, draft)
                    {
                        Ok(_) => writeln!(
                            self.output,
                            "Property updated. Tenants will see it again once an admin approves it."
                        )?,
                        Err(err) => self.report(&err)?,
                    }
                }
                Some(2) => {
                    if self.confirm(&format!("Delete '{}'?", property.title))? {
                        match app
                            .marketplace
                            .properties()
                            .delete_listed_property(actor, &property.id)
                        {
                            Ok(()) => writeln!(self.output, "Property deleted.")?,
                            Err(err) => self.report(&err)?,
                        }
                    }
                }
                Some(3) => {}
                _ => self.invalid_choice()?,
            }
        }
    }

    fn manage_requests(&mut self, actor: &Actor) -> io::Result<()> {
        let app = self.app;
        loop {
            let inbox = match app.marketplace.landlord_inbox(actor) {
                Ok(inbox) => inbox,
                Err(err) => return self.report(&err),
            };
            render::heading(&mut self.output, "Rent Requests")?;
            if inbox.is_empty() {
                return writeln!(self.output, "No rent requests yet.");
            }
            for (index, view) in inbox.iter().enumerate() {
                render::request_line(&mut self.output, index + 1, view)?;
            }

            let Some(index) = self.select(inbox.len())? else {
                return Ok(());
            };
            let view = &inbox[index];
            if let Some(property) = &view.property {
                render::property_details(&mut self.output, property)?;
            }
            if let Some(tenant) = &view.tenant {
                writeln!(self.output, "Requested by:")?;
                render::user_profile(&mut self.output, tenant)?;
            }
            writeln!(self.output, "1. Accept")?;
            writeln!(self.output, "2. Reject")?;
            writeln!(self.output, "3. Go Back")?;
            match self.choice()? {
                Some(1) => self.decide(actor, &view.request.id, RequestDecision::Accept)?,
                Some(2) => self.decide(actor, &view.request.id, RequestDecision::Reject)?,
                Some(3) => {}
                _ => self.invalid_choice()?,
            }
        }
    }

    fn decide(
        &mut self,
        actor: &Actor,
        id: &RequestId,
        decision: RequestDecision,
    ) -> io::Result<()> {
        let app = self.app;
        match app.marketplace.respond_to_request(actor, id, decision) {
            Ok(request) => writeln!(self.output, "Request {}.", request.status.label()),
            Err(err) => self.report(&err),
        }
    }
}
