//! "Seen the memorize walkthrough" flag

use super::database::Database;
use crate::constants::storage_keys::{ONBOARDING, ONBOARDING_DONE};
use crate::types::Result;

pub fn is_onboarding_complete(db: &Database) -> Result<bool> {
    Ok(db.get(ONBOARDING)?.as_deref() == Some(ONBOARDING_DONE))
}

pub fn complete_onboarding(db: &Database) -> Result<()> {
    db.set(ONBOARDING, ONBOARDING_DONE)
}

pub fn reset_onboarding(db: &Database) -> Result<()> {
    db.delete(ONBOARDING)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_onboarding_flag() {
        let db = Database::open_in_memory().unwrap();
        assert!(!is_onboarding_complete(&db).unwrap());

        complete_onboarding(&db).unwrap();
        assert!(is_onboarding_complete(&db).unwrap());

        reset_onboarding(&db).unwrap();
        assert!(!is_onboarding_complete(&db).unwrap());
    }
}
