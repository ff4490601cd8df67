pub mod buyersearchdtos;
pub mod chatdtos;
pub mod messagedtos;
pub mod notificationdtos;
pub mod pagination;
pub mod propertydtos;

use crate::search::listing_query::parse_flag;

/// Boolean query-string filter; a missing or blank value means "don't filter".
pub fn optional_flag(raw: Option<&str>) -> Option<bool> {
    raw.map(str::trim).filter(|s| !s.is_empty()).map(parse_flag)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_flag_is_no_filter() {
        assert_eq!(optional_flag(None), None);
        assert_eq!(optional_flag(Some("  ")), None);
        assert_eq!(optional_flag(Some("True")), Some(true));
        assert_eq!(optional_flag(Some("0")), Some(false));
    }
}
