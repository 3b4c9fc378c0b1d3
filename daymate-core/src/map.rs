use crate::location::Location;

pub const DEFAULT_MAP_BASE: &str = "https://www.google.com/maps?q=";

/// Embeddable map URL for `location`.
pub fn map_preview_url(base: &str, location: &Location) -> String {
    format!("{base}{}&output=embed", location.encoded())
}
