//! # Share Code Generation
//!
//! Codes are four random digits. The space is small (10,000 values) and codes
//! are drawn with retry-until-unused, which is fine at the scale this tool is
//! meant for and caps the number of files that can be stored at once.
//!
//! Checking "is this code free?" and then inserting it later is racy: two
//! uploads can pick the same code before either is stored. Uploads therefore
//! go through [`reserve`], which atomically claims a code in the
//! [`MappingStore`]'s reservation set. The [`Reservation`] guard either
//! commits the code with its file name or gives it back when dropped, so a
//! failed upload never leaks a code.

use crate::error::{CodedropError, Result};
use crate::model::{Code, CODE_SPACE};
use crate::store::MappingStore;
use rand::Rng;

/// A share code held for an upload that has not been committed yet.
#[derive(Debug)]
pub struct Reservation<'a> {
    store: &'a MappingStore,
    code: Code,
}

impl Reservation<'_> {
    pub fn code(&self) -> Code {
        self.code
    }

    /// Publish the code with its stored file name.
    pub fn commit(self, stored_name: String) {
        // Insert before the reservation is released (in Drop) so the code is
        // never observed as free in between.
        self.store.entries.insert(self.code, stored_name);
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        self.store.reserved.remove(&self.code);
    }
}

/// Pick a code that is not currently mapped. Does not claim it.
pub fn generate(store: &MappingStore) -> Result<Code> {
    generate_with(store, &mut rand::thread_rng())
}

pub fn generate_with<R: Rng + ?Sized>(store: &MappingStore, rng: &mut R) -> Result<Code> {
    loop {
        if store.entries.len() >= CODE_SPACE {
            return Err(CodedropError::CodeSpaceExhausted);
        }
        let candidate = Code::random(rng);
        if !store.entries.contains_key(&candidate) {
            return Ok(candidate);
        }
    }
}

/// Claim a code that is neither mapped nor reserved by another upload.
pub fn reserve(store: &MappingStore) -> Result<Reservation<'_>> {
    reserve_with(store, &mut rand::thread_rng())
}

pub fn reserve_with<'a, R: Rng + ?Sized>(
    store: &'a MappingStore,
    rng: &mut R,
) -> Result<Reservation<'a>> {
    loop {
        if codes_in_use(store) >= CODE_SPACE {
            return Err(CodedropError::CodeSpaceExhausted);
        }
        let candidate = Code::random(rng);
        if !store.reserved.insert(candidate) {
            continue;
        }
        // Reserve first, then check the live map: a code committed by another
        // thread is always in `entries` before it leaves `reserved`.
        if store.entries.contains_key(&candidate) {
            store.reserved.remove(&candidate);
            continue;
        }
        return Ok(Reservation {
            store,
            code: candidate,
        });
    }
}

/// Live codes plus reservations not yet committed.
///
/// A committed code sits in both sets until its guard drops, so near the
/// ceiling reserved codes already in `entries` are not counted twice.
fn codes_in_use(store: &MappingStore) -> usize {
    let live = store.entries.len();
    let reserved = store.reserved.len();
    if live + reserved < CODE_SPACE {
        return live + reserved;
    }
    let pending = store
        .reserved
        .iter()
        .filter(|code| !store.entries.contains_key(code.key()))
        .count();
    live + pending
}

impl MappingStore {
    /// Claim a free code for an upload. See [`reserve`].
    pub fn reserve(&self) -> Result<Reservation<'_>> {
        reserve(self)
    }
}
