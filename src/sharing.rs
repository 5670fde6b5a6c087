//! # Share distribution and secret recovery.
//!
//! The dealer multiplies a Vandermonde matrix against a coefficient
//! vector whose first entry is the secret, handing row i to child i of
//! the gate; nested gates treat their share as a sub-secret and
//! recurse. Recovery picks a cheapest satisfying set of children,
//! solves the matching square Vandermonde submatrix for the recovery
//! vector r with r . M = e1, and projects the gathered shares back
//! onto the secret coordinate: r . (M . s) = e1 . s.

use std::collections::HashMap;

use rand::{CryptoRng, RngCore};

use crate::arith::gf2n::Field;
use crate::arith::matrices::Matrix;
use crate::arith::rows::Row;
use crate::database::UserDatabase;
use crate::errors::MspError;
use crate::predicate::{Child, Predicate};

/// Participant name to that participant's shares, ordered by the
/// name's occurrences in a pre-order walk of the predicate.
pub type ShareMap = HashMap<String, Vec<Vec<u8>>>;

impl Predicate {
    /// Splits `secret` into one share per leaf occurrence of the
    /// predicate. The field is chosen by the secret's length (16 or 32
    /// bytes); every named participant must pass
    /// [`valid_user`](UserDatabase::valid_user).
    pub fn distribute_shares<D, R>(
        &self,
        secret: &[u8],
        db: &D,
        rng: &mut R,
    ) -> Result<ShareMap, MspError>
    where
        D: UserDatabase,
        R: RngCore + CryptoRng,
    {
        let field = Field::for_secret(secret.len())
            .ok_or(MspError::UnsupportedSecretSize(secret.len()))?;
        self.split(field, secret, db, rng)
    }

    fn split<D, R>(
        &self,
        field: &'static Field,
        secret: &[u8],
        db: &D,
        rng: &mut R,
    ) -> Result<ShareMap, MspError>
    where
        D: UserDatabase,
        R: RngCore + CryptoRng,
    {
        let indexes: Vec<usize> = (1..=self.children.len()).collect();
        let vandermonde = Matrix::vandermonde(field, &indexes, self.min);

        // s[0] carries the secret, the rest blind it.
        let mut coefficients = Vec::with_capacity(self.min);
        coefficients.push(field.elem(secret));
        for _ in 1..self.min {
            coefficients.push(field.random(rng)?);
        }
        let shares = vandermonde.mul(&Row::from_elems(field, coefficients));

        let mut out = ShareMap::new();
        for (i, child) in self.children.iter().enumerate() {
            let share = shares[i].bytes().to_vec();
            match child {
                Child::Name(n) => {
                    if !db.valid_user(&n.name) {
                        return Err(MspError::UnknownParticipant(n.name.clone()));
                    }
                    out.entry(n.name.clone()).or_default().push(share);
                }
                Child::Gate(gate) => {
                    for (name, mut sub) in gate.split(field, &share, db, rng)? {
                        out.entry(name).or_default().append(&mut sub);
                    }
                }
            }
        }
        Ok(out)
    }

    /// Rebuilds the secret from the shares reachable through `db`.
    /// Shares are fetched once per participant and cached for the
    /// duration of this call.
    pub fn recover_secret<D: UserDatabase>(&self, db: &D) -> Result<Vec<u8>, MspError> {
        let mut cache = ShareMap::new();
        self.reassemble(db, &mut cache)
    }

    fn reassemble<D: UserDatabase>(
        &self,
        db: &D,
        cache: &mut ShareMap,
    ) -> Result<Vec<u8>, MspError> {
        let path = self.path(db).ok_or(MspError::InsufficientShares)?;

        for name in &path.names {
            if !cache.contains_key(name) {
                let shares = db.get_share(name)?;
                cache.insert(name.clone(), shares);
            }
        }

        let mut gathered: Vec<Vec<u8>> = Vec::with_capacity(path.locations.len());
        for &location in &path.locations {
            match &self.children[location] {
                Child::Name(n) => {
                    let list = cache
                        .get(&n.name)
                        .ok_or_else(|| MspError::UnknownParticipant(n.name.clone()))?;
                    // Consume the occurrence's slot; surplus entries in
                    // a longer list stay untouched.
                    let share = list.get(n.index).ok_or_else(|| MspError::DatabaseMismatch {
                        name: n.name.clone(),
                        index: n.index,
                    })?;
                    gathered.push(share.clone());
                }
                Child::Gate(gate) => gathered.push(gate.reassemble(db, cache)?),
            }
        }

        let field = Field::for_secret(gathered[0].len())
            .ok_or(MspError::UnsupportedSecretSize(gathered[0].len()))?;

        let indexes: Vec<usize> = path.locations.iter().map(|l| l + 1).collect();
        let submatrix = Matrix::vandermonde(field, &indexes, self.min);
        let recovery = submatrix.recovery().ok_or(MspError::SingularSubmatrix)?;

        let shares = Row::from_elems(field, gathered.iter().map(|b| field.elem(b)).collect());
        Ok(shares.dot(&recovery).into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryDatabase;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SECRET16: &[u8; 16] = b"sixteen byte key";
    const SECRET32: &[u8; 32] = b"thirty-two bytes of shared state";

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    fn parse(s: &str) -> Predicate {
        s.parse().unwrap()
    }

    /// A database that recognizes every participant of the predicate.
    fn registry(predicate: &Predicate) -> MemoryDatabase {
        let mut db = MemoryDatabase::new();
        for name in predicate.participants() {
            db.register(name);
        }
        db
    }

    /// A recovery database holding shares for `names` only.
    fn authorize(all: &ShareMap, names: &[&str]) -> MemoryDatabase {
        let mut db = MemoryDatabase::new();
        for (name, shares) in all {
            if names.contains(&name.as_str()) {
                db.insert_shares(name.clone(), shares.clone());
            }
        }
        db
    }

    fn distribute(predicate: &Predicate, secret: &[u8]) -> ShareMap {
        predicate
            .distribute_shares(secret, &registry(predicate), &mut rng())
            .unwrap()
    }

    #[test]
    fn two_of_three_round_trip() {
        let p = parse("(2, Alice, Bob, Carl)");
        let shares = distribute(&p, SECRET16);

        for pair in [["Alice", "Bob"], ["Alice", "Carl"], ["Bob", "Carl"]] {
            let got = p.recover_secret(&authorize(&shares, &pair)).unwrap();
            assert_eq!(got, SECRET16);
        }
    }

    #[test]
    fn one_participant_is_not_enough() {
        let p = parse("(2, Alice, Bob, Carl)");
        let shares = distribute(&p, SECRET16);

        assert!(matches!(
            p.recover_secret(&authorize(&shares, &["Alice"])),
            Err(MspError::InsufficientShares)
        ));
    }

    #[test]
    fn nested_gate_round_trip() {
        let p = parse("(2, (1, Alice, Bob), Carl)");
        let shares = distribute(&p, SECRET16);

        let got = p
            .recover_secret(&authorize(&shares, &["Alice", "Carl"]))
            .unwrap();
        assert_eq!(got, SECRET16);

        assert!(matches!(
            p.recover_secret(&authorize(&shares, &["Bob"])),
            Err(MspError::InsufficientShares)
        ));
    }

    #[test]
    fn infix_and_behaves_like_a_two_of_two_gate() {
        let p = parse("Alice & Bob");
        assert_eq!(p, parse("(2, Alice, Bob)"));
        let shares = distribute(&p, SECRET16);

        let got = p
            .recover_secret(&authorize(&shares, &["Alice", "Bob"]))
            .unwrap();
        assert_eq!(got, SECRET16);

        assert!(matches!(
            p.recover_secret(&authorize(&shares, &["Alice"])),
            Err(MspError::InsufficientShares)
        ));
    }

    #[test]
    fn infix_grouping_round_trip() {
        let p = parse("(Alice | Bob) & Carl");
        assert_eq!(p, parse("(2, (1, Alice, Bob), Carl)"));
        let shares = distribute(&p, SECRET16);

        let got = p
            .recover_secret(&authorize(&shares, &["Alice", "Carl"]))
            .unwrap();
        assert_eq!(got, SECRET16);

        // Both halves of the disjunction without Carl stay short.
        assert!(matches!(
            p.recover_secret(&authorize(&shares, &["Alice", "Bob"])),
            Err(MspError::InsufficientShares)
        ));
    }

    #[test]
    fn thirty_two_byte_secrets_use_the_larger_field() {
        let p = parse("(2, Alice, Bob, (1, Carl, Dave))");
        let shares = distribute(&p, SECRET32);
        assert!(shares.values().flatten().all(|s| s.len() == 32));

        let got = p
            .recover_secret(&authorize(&shares, &["Bob", "Carl"]))
            .unwrap();
        assert_eq!(got, SECRET32);
    }

    #[test]
    fn unsupported_secret_sizes_are_rejected() {
        let p = parse("(2, Alice, Bob)");
        let db = registry(&p);
        assert!(matches!(
            p.distribute_shares(&[0u8; 24], &db, &mut rng()),
            Err(MspError::UnsupportedSecretSize(24))
        ));
    }

    #[test]
    fn unknown_participants_are_rejected_at_distribution() {
        let p = parse("(2, Alice, Bob, Dave)");
        let mut db = MemoryDatabase::new();
        db.register("Alice");
        db.register("Bob");

        assert!(matches!(
            p.distribute_shares(SECRET16, &db, &mut rng()),
            Err(MspError::UnknownParticipant(name)) if name == "Dave"
        ));
    }

    #[test]
    fn repeated_participants_get_one_share_per_occurrence() {
        let p = parse("(2, Alice, (1, Alice, Bob))");
        let shares = distribute(&p, SECRET16);
        assert_eq!(shares["Alice"].len(), 2);
        assert_eq!(shares["Bob"].len(), 1);

        // Alice alone satisfies both the outer and the nested gate.
        let got = p.recover_secret(&authorize(&shares, &["Alice"])).unwrap();
        assert_eq!(got, SECRET16);
    }

    #[test]
    fn surplus_shares_are_ignored_positionally() {
        let p = parse("(2, Alice, Bob)");
        let shares = distribute(&p, SECRET16);

        let mut db = MemoryDatabase::new();
        let mut padded = shares["Alice"].clone();
        padded.push(vec![0xAA; 16]);
        db.insert_shares("Alice", padded);
        db.insert_shares("Bob", shares["Bob"].clone());

        assert_eq!(p.recover_secret(&db).unwrap(), SECRET16);
    }

    #[test]
    fn short_share_lists_are_a_database_mismatch() {
        let p = parse("(1, Alice)");
        let mut db = MemoryDatabase::new();
        db.insert_shares("Alice", Vec::new());

        assert!(matches!(
            p.recover_secret(&db),
            Err(MspError::DatabaseMismatch { name, index: 0 }) if name == "Alice"
        ));
    }

    #[test]
    fn fresh_randomness_still_recovers() {
        let p = parse("(2, Alice, Bob, Carl)");
        let db = registry(&p);

        let first = p
            .distribute_shares(SECRET16, &db, &mut StdRng::seed_from_u64(1))
            .unwrap();
        let second = p
            .distribute_shares(SECRET16, &db, &mut StdRng::seed_from_u64(2))
            .unwrap();

        // Different blinding, same secret.
        assert_ne!(first, second);
        for shares in [first, second] {
            let got = p
                .recover_secret(&authorize(&shares, &["Alice", "Carl"]))
                .unwrap();
            assert_eq!(got, SECRET16);
        }
    }

    #[test]
    fn deep_nesting_round_trip() {
        let p = parse("(2, Alice, (2, Bob, (1, Carl, Dave)), Eve)");
        let shares = distribute(&p, SECRET16);

        let got = p
            .recover_secret(&authorize(&shares, &["Bob", "Dave", "Eve"]))
            .unwrap();
        assert_eq!(got, SECRET16);

        assert!(matches!(
            p.recover_secret(&authorize(&shares, &["Bob", "Carl", "Dave"])),
            Err(MspError::InsufficientShares)
        ));
    }
}
