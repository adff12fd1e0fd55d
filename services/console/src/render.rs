//! Plain-text rendering of marketplace records for the menus.

use std::io::{self, Write};

use rentease::marketplace::{Property, RequestView, User, UserOverview};

const RULE: &str = "--------------------------------------------------";

pub(crate) fn heading(out: &mut impl Write, title: &str) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "{title}")?;
    writeln!(out, "{RULE}")
}

pub(crate) fn property_line(
    out: &mut impl Write,
    index: usize,
    property: &Property,
) -> io::Result<()> {
    writeln!(
        out,
        "{index}. {} [{}] - Rs. {:.2} - {}",
        property.title,
        property.type_label(),
        property.rent_amount,
        property.address
    )
}

pub(crate) fn property_details(out: &mut impl Write, property: &Property) -> io::Result<()> {
    writeln!(out, "Title: {}", property.title)?;
    writeln!(out, "Type: {}", property.type_label())?;
    writeln!(out, "Address: {}", property.address)?;
    writeln!(out, "Landlord: {}", property.landlord_username)?;
    writeln!(out, "Rent: Rs. {:.2}", property.rent_amount)?;
    match &property.details {
        Some(details) => writeln!(out, "Details: {details}")?,
        None => writeln!(out, "Details: not available")?,
    }
    writeln!(
        out,
        "Approved: {}, Rented: {}",
        yes_no(property.approved),
        yes_no(property.rented)
    )
}

pub(crate) fn request_line(
    out: &mut impl Write,
    index: usize,
    view: &RequestView,
) -> io::Result<()> {
    let title = view
        .property
        .as_ref()
        .map(|property| property.title.as_str())
        .unwrap_or("<listing removed>");
    writeln!(
        out,
        "{index}. {title} - tenant: {}, landlord: {} - {} (sent {})",
        view.request.tenant_username,
        view.request.landlord_username,
        view.request.status.label(),
        view.request.created_at.format("%Y-%m-%d %H:%M")
    )
}

pub(crate) fn user_profile(out: &mut impl Write, user: &User) -> io::Result<()> {
    writeln!(out, "Username: {}", user.username)?;
    writeln!(out, "Name: {}", user.name)?;
    writeln!(out, "Age: {}", user.age)?;
    writeln!(out, "Email: {}", user.email)?;
    writeln!(out, "Phone: {}", user.phone_number)?;
    writeln!(out, "Address: {}", user.address)?;
    writeln!(out, "Role: {}", user.role.label())
}

pub(crate) fn user_overview(
    out: &mut impl Write,
    index: usize,
    overview: &UserOverview,
) -> io::Result<()> {
    let user = &overview.user;
    writeln!(
        out,
        "{index}. {} ({}) - {}, {}",
        user.username, user.name, user.email, user.phone_number
    )?;
    if overview.listings.is_empty() {
        return writeln!(out, "   no listed properties");
    }
    for property in &overview.listings {
        writeln!(
            out,
            "   - {} [{}] approved: {}, rented: {}",
            property.title,
            property.type_label(),
            yes_no(property.approved),
            yes_no(property.rented)
        )?;
    }
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
