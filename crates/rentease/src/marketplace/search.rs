//! Tenant-facing listing search.

use super::domain::{Property, PropertyType};

/// Search input. Text fields are matched case-insensitively as trimmed substrings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub property_type: PropertyType,
    pub area: String,
    pub city: String,
    pub state: String,
    pub pincode: Option<u32>,
}

impl SearchCriteria {
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type,
            area: String::new(),
            city: String::new(),
            state: String::new(),
            pincode: None,
        }
    }

    /// The type must match exactly; the address then matches when any clause holds, in
    /// order: area+city+pincode, city+pincode, pincode alone, state alone.
    ///
    /// An empty text field is a substring of everything, so a blank state matches every
    /// listing of the requested type.
    pub fn matches(&self, property: &Property) -> bool {
        if property.property_type != Some(self.property_type) {
            return false;
        }

        let area = normalize(&self.area);
        let city = normalize(&self.city);
        let state = normalize(&self.state);

        let listed_area = normalize(&property.address.area);
        let listed_city = normalize(&property.address.city);
        let listed_state = normalize(&property.address.state);
        let pincode_matches = self.pincode == Some(property.address.pincode);

        (listed_area.contains(&area) && listed_city.contains(&city) && pincode_matches)
            || (listed_city.contains(&city) && pincode_matches)
            || pincode_matches
            || listed_state.contains(&state)
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}
