//! # Monotone span program secret sharing.
//!
//! Splits a secret across the participants of a boolean access
//! predicate so that exactly the satisfying participant sets can
//! reconstruct it. Predicates are nested threshold gates over named
//! participants, written either in threshold form,
//! `(2, Alice, Bob, (1, Carl, Dave))`, or as an infix expression,
//! `Alice & (Bob | Carl)`. Shares are elements of GF(2^128) or
//! GF(2^256) (chosen by the secret's length), produced with Vandermonde
//! matrices and recombined through a Gauss-Jordan recovery vector.
//!
//! ```
//! use msp::{MemoryDatabase, Predicate};
//!
//! let predicate: Predicate = "(2, Alice, Bob, Carl)".parse()?;
//!
//! let mut db = MemoryDatabase::new();
//! for name in predicate.participants() {
//!     db.register(name);
//! }
//!
//! let secret = b"sixteen byte key";
//! let shares = predicate.distribute_shares(secret, &db, &mut rand::thread_rng())?;
//!
//! // Any two participants suffice.
//! let mut holders = MemoryDatabase::new();
//! holders.insert_shares("Alice", shares["Alice"].clone());
//! holders.insert_shares("Carl", shares["Carl"].clone());
//! assert_eq!(predicate.recover_secret(&holders)?, secret);
//! # Ok::<(), msp::MspError>(())
//! ```

pub mod arith;
pub mod database;
pub mod errors;
pub mod predicate;
pub mod sharing;

pub use database::{MemoryDatabase, UserDatabase};
pub use errors::MspError;
pub use predicate::{Child, Name, Predicate, SharePath};
pub use sharing::ShareMap;
