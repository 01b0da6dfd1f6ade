//! Maps Sling position ids to display labels.

/// Label used when a position id is missing or not in the table.
pub const UNKNOWN_POSITION: &str = "Unknown";

/// Known position ids and their calendar labels.
const POSITIONS: &[(i64, &str)] = &[
    (18984501, "Shadowing Front Desk"),
    (1710948, "Front Desk"),
    (1710949, "Check In Desk"),
];

/// Resolve a position id to its display label. Total: unknown or missing
/// ids come back as the sentinel rather than an error.
pub fn resolve(position_id: Option<i64>) -> &'static str {
    position_id
        .and_then(|id| POSITIONS.iter().find(|(known, _)| *known == id))
        .map(|(_, label)| *label)
        .unwrap_or(UNKNOWN_POSITION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_positions_resolve() {
        assert_eq!(resolve(Some(18984501)), "Shadowing Front Desk");
        assert_eq!(resolve(Some(1710948)), "Front Desk");
        assert_eq!(resolve(Some(1710949)), "Check In Desk");
    }

    #[test]
    fn test_unknown_position_is_sentinel() {
        assert_eq!(resolve(Some(999)), UNKNOWN_POSITION);
        assert_eq!(resolve(Some(0)), UNKNOWN_POSITION);
        assert_eq!(resolve(Some(-1)), UNKNOWN_POSITION);
    }

    #[test]
    fn test_missing_position_is_sentinel() {
        assert_eq!(resolve(None), UNKNOWN_POSITION);
    }
}
