use crate::server::response::ApiError;
use crate::store::Page;

const MAX_NAME_LEN: usize = 200;
const MAX_PAGE_SIZE: i64 = 500;

/// Validates a user-supplied entity name: non-empty and within bounds.
pub fn validate_name(name: &str, entity: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::bad_request(format!(
            "{entity} name cannot be empty"
        )));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ApiError::bad_request(format!(
            "{entity} name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validates a cut range. Frame-out must be strictly after frame-in.
pub fn validate_frame_range(frame_in: i64, frame_out: i64) -> Result<(), ApiError> {
    if frame_out <= frame_in {
        return Err(ApiError::bad_request(format!(
            "frame_out ({frame_out}) must be greater than frame_in ({frame_in})"
        )));
    }
    Ok(())
}

/// Parses a "START-END" frame range filter, rejecting malformed and
/// inverted ranges alike.
pub fn parse_frame_range(range: &str) -> Result<(i64, i64), ApiError> {
    let invalid =
        || ApiError::bad_request(format!("invalid frame range '{range}', expected START-END"));

    let (start, end) = range.split_once('-').ok_or_else(invalid)?;
    let start: i64 = start.trim().parse().map_err(|_| invalid())?;
    let end: i64 = end.trim().parse().map_err(|_| invalid())?;

    if end < start {
        return Err(ApiError::bad_request(format!(
            "invalid frame range '{range}', end is before start"
        )));
    }
    Ok((start, end))
}

/// Builds a [`Page`] from optional query parameters, bounding the limit.
pub fn validate_page(limit: Option<i64>, offset: Option<i64>) -> Result<Page, ApiError> {
    let mut page = Page::default();

    if let Some(limit) = limit {
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(ApiError::bad_request(format!(
                "limit must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        page.limit = limit;
    }
    if let Some(offset) = offset {
        if offset < 0 {
            return Err(ApiError::bad_request("offset cannot be negative"));
        }
        page.offset = offset;
    }

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_range_valid() {
        assert_eq!(parse_frame_range("1001-1100").unwrap(), (1001, 1100));
        assert_eq!(parse_frame_range(" 1 - 5 ").unwrap(), (1, 5));
    }

    #[test]
    fn test_frame_range_malformed() {
        assert!(parse_frame_range("1001").is_err());
        assert!(parse_frame_range("a-b").is_err());
        assert!(parse_frame_range("").is_err());
    }

    #[test]
    fn test_frame_range_inverted() {
        assert!(parse_frame_range("1100-1001").is_err());
    }

    #[test]
    fn test_validate_frame_range() {
        assert!(validate_frame_range(1001, 1100).is_ok());
        assert!(validate_frame_range(1100, 1001).is_err());
        assert!(validate_frame_range(1001, 1001).is_err());
    }

    #[test]
    fn test_page_bounds() {
        let page = validate_page(None, None).unwrap();
        assert_eq!(page.limit, 100);
        assert_eq!(page.offset, 0);

        assert!(validate_page(Some(0), None).is_err());
        assert!(validate_page(Some(501), None).is_err());
        assert!(validate_page(None, Some(-1)).is_err());

        let page = validate_page(Some(500), Some(20)).unwrap();
        assert_eq!(page.limit, 500);
        assert_eq!(page.offset, 20);
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("demo", "project").is_ok());
        assert!(validate_name("", "project").is_err());
        assert!(validate_name("   ", "project").is_err());
        assert!(validate_name(&"x".repeat(201), "project").is_err());
    }
}
