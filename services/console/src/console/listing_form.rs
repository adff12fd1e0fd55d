use std::io::{self, BufRead, Write};

use rentease::geocoding::LookupError;
use rentease::marketplace::validation::{validate_pincode, MAX_FLAT_BHK, MAX_HOUSE_ROOMS};
use rentease::marketplace::{
    Address, CommercialDetails, CommercialSubtype, FlatDetails, FurnishedCategory, HouseDetails,
    ListingDraft, PropertyDetails, PropertyType,
};
use tracing::debug;

use super::Console;

impl<R: BufRead, W: Write> Console<'_, R, W> {
    /// Collects a complete listing. Used for both new listings and edits.
    pub(super) fn listing_draft(&mut self) -> io::Result<ListingDraft> {
        let title = self.prompt_text("Title", "Title cannot be empty.", |value| !value.is_empty())?;
        let pincode = self.prompt_parsed("Pincode", "Enter a six digit pincode.", |pincode: &u32| {
            validate_pincode(*pincode).is_ok()
        })?;
        let address = self.address_for(pincode)?;
        let rent_amount = self.prompt_parsed(
            "Monthly rent",
            "Enter a non-negative amount.",
            |rent: &f64| rent.is_finite() && *rent >= 0.0,
        )?;

        let property_type =
            self.pick_option("Property type:", &PropertyType::ordered(), PropertyType::label)?;
        let details = match property_type {
            PropertyType::Commercial => self.commercial_details()?,
            PropertyType::House => self.house_details()?,
            PropertyType::Flat => self.flat_details()?,
        };

        Ok(ListingDraft {
            title,
            address,
            rent_amount,
            details,
        })
    }

    fn address_for(&mut self, pincode: u32) -> io::Result<Address> {
        if let Some(found) = self.looked_up_address(pincode)? {
            return Ok(found);
        }

        writeln!(self.output, "Please enter the address.")?;
        let area = self.prompt_text("Area", "Area cannot be empty.", |value| !value.is_empty())?;
        let city = self.prompt_text("City", "City cannot be empty.", |value| !value.is_empty())?;
        let state =
            self.prompt_text("State", "State cannot be empty.", |value| !value.is_empty())?;
        Ok(Address {
            area,
            city,
            state,
            pincode,
        })
    }

    /// Offers the address the lookup service knows for `pincode`. `None` when the lookup is
    /// off, fails, or the user declines the suggestion.
    pub(super) fn looked_up_address(&mut self, pincode: u32) -> io::Result<Option<Address>> {
        let app = self.app;
        match app.lookup.lookup(pincode) {
            Ok(found) => {
                writeln!(
                    self.output,
                    "Address found: {}, {}, {}",
                    found.area, found.city, found.state
                )?;
                if self.confirm("Use this address?")? {
                    return Ok(Some(found));
                }
            }
            Err(LookupError::Disabled) => {}
            Err(err) => {
                debug!(pincode, error = %err, "pincode lookup failed");
                writeln!(self.output, "Could not look up the pincode: {err}")?;
            }
        }
        Ok(None)
    }

    fn commercial_details(&mut self) -> io::Result<PropertyDetails> {
        let floor_area = self.prompt_text("Floor area", "Floor area cannot be empty.", |value| {
            !value.is_empty()
        })?;
        let subtype = self.pick_option(
            "Commercial type:",
            &CommercialSubtype::ordered(),
            CommercialSubtype::label,
        )?;
        Ok(PropertyDetails::Commercial(CommercialDetails {
            floor_area,
            subtype,
        }))
    }

    fn house_details(&mut self) -> io::Result<PropertyDetails> {
        let rooms = self.prompt_parsed(
            "Number of rooms",
            &format!("Rooms must be between 1 and {MAX_HOUSE_ROOMS}."),
            |rooms: &u8| (1..=MAX_HOUSE_ROOMS).contains(rooms),
        )?;
        let furnished = self.furnished()?;
        let amenities = self.amenities()?;
        Ok(PropertyDetails::House(HouseDetails {
            rooms,
            furnished,
            amenities,
        }))
    }

    fn flat_details(&mut self) -> io::Result<PropertyDetails> {
        let furnished = self.furnished()?;
        let amenities = self.amenities()?;
        let bhk = self.prompt_parsed(
            "BHK",
            &format!("BHK must be between 1 and {MAX_FLAT_BHK}."),
            |bhk: &u8| (1..=MAX_FLAT_BHK).contains(bhk),
        )?;
        Ok(PropertyDetails::Flat(FlatDetails {
            furnished,
            amenities,
            bhk,
        }))
    }

    fn furnished(&mut self) -> io::Result<FurnishedCategory> {
        self.pick_option(
            "Furnishing:",
            &FurnishedCategory::ordered(),
            FurnishedCategory::label,
        )
    }

    fn amenities(&mut self) -> io::Result<Vec<String>> {
        let raw = self.prompt("Amenities (comma separated, Enter for none)")?;
        Ok(split_amenities(&raw))
    }
}

fn split_amenities(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|amenity| !amenity.is_empty())
        .map(str::to_string)
        .collect()
}
