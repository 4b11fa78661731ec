//! Identifier generation

use uuid::Uuid;

/// Generate a new time-ordered identifier.
///
/// UUID v7 sorts lexicographically in creation order, which lets cursor
/// pagination walk rows by primary key alone.
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_ordered() {
        let first = new_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = new_id();
        assert!(first < second);
        assert_eq!(first.len(), 36);
    }
}
