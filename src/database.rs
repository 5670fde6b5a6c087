//! The share-holder database boundary.

use std::collections::{HashMap, HashSet};

use crate::errors::MspError;

/// Capabilities the sharing scheme needs from a share-holder database.
///
/// Distribution consults [`valid_user`](UserDatabase::valid_user) to
/// reject predicates naming strangers. Path selection consults
/// [`can_get_share`](UserDatabase::can_get_share), which must be total
/// and side-effect-free. Recovery fetches with
/// [`get_share`](UserDatabase::get_share), which returns every share
/// held for a participant in the order they were distributed.
pub trait UserDatabase {
    fn valid_user(&self, name: &str) -> bool;

    fn can_get_share(&self, name: &str) -> bool;

    fn get_share(&self, name: &str) -> Result<Vec<Vec<u8>>, MspError>;
}

/// An in-memory [`UserDatabase`] for tests and the command line.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    users: HashSet<String>,
    shares: HashMap<String, Vec<Vec<u8>>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a participant without giving it any shares.
    pub fn register(&mut self, name: impl Into<String>) {
        self.users.insert(name.into());
    }

    /// Stores a participant's share list, registering the name.
    pub fn insert_shares(&mut self, name: impl Into<String>, shares: Vec<Vec<u8>>) {
        let name = name.into();
        self.users.insert(name.clone());
        self.shares.insert(name, shares);
    }
}

impl UserDatabase for MemoryDatabase {
    fn valid_user(&self, name: &str) -> bool {
        self.users.contains(name)
    }

    fn can_get_share(&self, name: &str) -> bool {
        self.shares.contains_key(name)
    }

    fn get_share(&self, name: &str) -> Result<Vec<Vec<u8>>, MspError> {
        self.shares
            .get(name)
            .cloned()
            .ok_or_else(|| MspError::UnknownParticipant(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registered_users_are_valid_but_shareless() {
        let mut db = MemoryDatabase::new();
        db.register("Alice");

        assert!(db.valid_user("Alice"));
        assert!(!db.can_get_share("Alice"));
        assert!(matches!(
            db.get_share("Alice"),
            Err(MspError::UnknownParticipant(_))
        ));
    }

    #[test]
    fn inserted_shares_come_back_in_order() {
        let mut db = MemoryDatabase::new();
        db.insert_shares("Bob", vec![vec![1], vec![2]]);

        assert!(db.valid_user("Bob"));
        assert!(db.can_get_share("Bob"));
        assert_eq!(db.get_share("Bob").unwrap(), vec![vec![1], vec![2]]);
    }
}
