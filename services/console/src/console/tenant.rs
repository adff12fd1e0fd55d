use std::io::{self, BufRead, Write};

use rentease::marketplace::{Actor, Property, PropertyId, PropertyType, SearchCriteria};

use super::Console;
use crate::render;

impl<R: BufRead, W: Write> Console<'_, R, W> {
    pub(super) fn tenant_section(&mut self, actor: &Actor) -> io::Result<()> {
        loop {
            render::heading(&mut self.output, "Tenant Section")?;
            writeln!(self.output, "1. Search Properties")?;
            writeln!(self.output, "2. Your Wishlist")?;
            writeln!(self.output, "3. Your Rent Requests' Status")?;
            writeln!(self.output, "4. Go Back")?;
            match self.choice()? {
                Some(1) => self.search(actor)?,
                Some(2) => self.wishlist(actor)?,
                Some(3) => self.request_status(actor)?,
                Some(4) => return Ok(()),
                _ => self.invalid_choice()?,
            }
        }
    }

    fn search(&mut self, actor: &Actor) -> io::Result<()> {
        let app = self.app;
        render::heading(&mut self.output, "Search Properties")?;
        let property_type =
            self.pick_option("Property type:", &PropertyType::ordered(), PropertyType::label)?;
        writeln!(self.output, "Leave a field empty to skip it.")?;
        let pincode = loop {
            let raw = self.prompt("Pincode")?;
            if raw.is_empty() {
                break None;
            }
            match raw.parse::<u32>() {
                Ok(pincode) => break Some(pincode),
                Err(_) => writeln!(self.output, "Pincode must be a number.")?,
            }
        };
        let known = match pincode {
            Some(pincode) => self.looked_up_address(pincode)?,
            None => None,
        };
        let (area, city, state) = match known {
            Some(address) => (address.area, address.city, address.state),
            None => (
                self.prompt("Area")?,
                self.prompt("City")?,
                self.prompt("State")?,
            ),
        };

        let criteria = SearchCriteria {
            property_type,
            area,
            city,
            state,
            pincode,
        };
        let results: Vec<Property> = match app.marketplace.properties().search_properties(&criteria)
        {
            Ok(found) => found.into_iter().filter(|property| property.approved).collect(),
            Err(err) => return self.report(&err),
        };
        self.browse_results(actor, &results)
    }

    fn browse_results(&mut self, actor: &Actor, results: &[Property]) -> io::Result<()> {
        let app = self.app;
        if results.is_empty() {
            return writeln!(self.output, "No properties match your search.");
        }
        loop {
            render::heading(&mut self.output, "Search Results")?;
            for (index, property) in results.iter().enumerate() {
                render::property_line(&mut self.output, index + 1, property)?;
            }
            let Some(index) = self.select(results.len())? else {
                return Ok(());
            };
            let property = &results[index];
            render::property_details(&mut self.output, property)?;
            writeln!(self.output, "1. Add to Wishlist")?;
            writeln!(self.output, "2. Send Rent Request")?;
            writeln!(self.output, "3. Go Back")?;
            match self.choice()? {
                Some(1) => match app
                    .marketplace
                    .users()
                    .add_to_wishlist(actor.username(), property.id.clone())
                {
                    Ok(()) => writeln!(self.output, "Added to your wishlist.")?,
                    Err(err) => self.report(&err)?,
                },
                Some(2) => self.send_request(actor, &property.id)?,
                Some(3) => {}
                _ => self.invalid_choice()?,
            }
        }
    }

    fn wishlist(&mut self, actor: &Actor) -> io::Result<()> {
        let app = self.app;
        loop {
            let saved = match app.marketplace.wishlist(actor) {
                Ok(saved) => saved,
                Err(err) => return self.report(&err),
            };
            render::heading(&mut self.output, "Your Wishlist")?;
            if saved.is_empty() {
                return writeln!(self.output, "Your wishlist is empty.");
            }
            for (index, property) in saved.iter().enumerate() {
                render::property_line(&mut self.output, index + 1, property)?;
            }

            let Some(index) = self.select(saved.len())? else {
                return Ok(());
            };
            let property = &saved[index];
            render::property_details(&mut self.output, property)?;
            writeln!(self.output, "1. Send Rent Request")?;
            writeln!(self.output, "2. Remove from Wishlist")?;
            writeln!(self.output, "3. Go Back")?;
            match self.choice()? {
                Some(1) => self.send_request(actor, &property.id)?,
                Some(2) => match app
                    .marketplace
                    .users()
                    .remove_from_wishlist(actor.username(), &property.id)
                {
                    Ok(true) => writeln!(self.output, "Removed from your wishlist.")?,
                    Ok(false) => writeln!(self.output, "That property was not in your wishlist.")?,
                    Err(err) => self.report(&err)?,
                },
                Some(3) => {}
                _ => self.invalid_choice()?,
            }
        }
    }

    fn send_request(&mut self, actor: &Actor, property_id: &PropertyId) -> io::Result<()> {
        let app = self.app;
        match app.marketplace.request_property(actor, property_id) {
            Ok(_) => writeln!(self.output, "Rent request sent to the landlord."),
            Err(err) => self.report(&err),
        }
    }

    fn request_status(&mut self, actor: &Actor) -> io::Result<()> {
        let app = self.app;
        let sent = match app.marketplace.tenant_requests(actor) {
            Ok(sent) => sent,
            Err(err) => return self.report(&err),
        };
        render::heading(&mut self.output, "Your Rent Requests")?;
        if sent.is_empty() {
            return writeln!(self.output, "You have not sent any rent requests.");
        }
        for (index, view) in sent.iter().enumerate() {
            render::request_line(&mut self.output, index + 1, view)?;
        }
        Ok(())
    }
}
