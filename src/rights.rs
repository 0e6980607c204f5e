//!
//! Rights algebra for the hybrid access-control model.
//! Defines the bit flag for each right, the fixed per-role default rights, and
//! helpers for testing a mask against a required right.

use crate::types::{RightsMask, Role, Right};

/// Core rights bit flags (bits 0-3 defined, 4-31 must be zero).
pub mod core {
    use super::RightsMask;

    /// Permission to observe an object.
    pub const READ: RightsMask = 1 << 0; // 0b0001
    /// Permission to modify an object. Does NOT imply `READ`.
    pub const WRITE: RightsMask = 1 << 1; // 0b0010
    /// Permission to run an object.
    pub const EXECUTE: RightsMask = 1 << 2; // 0b0100
    /// Permission to pass an object on to another subject.
    pub const SHARE: RightsMask = 1 << 3; // 0b1000

    /// Every defined right.
    pub const ALL: RightsMask = READ | WRITE | EXECUTE | SHARE;
}

/// The rights a role holds regardless of any DAC grant.
///
/// ADMIN holds every right, AUDITOR holds READ, USER holds nothing.
#[inline]
pub const fn role_default_rights(role: Role) -> RightsMask {
    match role {
        Role::Admin => core::ALL,
        Role::Auditor => core::READ,
        Role::User => 0,
    }
}

/// Builds a mask from a set of rights.
pub fn mask_of<I: IntoIterator<Item = Right>>(rights: I) -> RightsMask {
    rights.into_iter().fold(0, |mask, right| mask | right.mask())
}

/// Expands a mask back into its rights, in catalog order. Undefined bits are dropped.
pub fn rights_in(mask: RightsMask) -> Vec<Right> {
    Right::ALL.into_iter().filter(|r| mask & r.mask() != 0).collect()
}

/// Checks if `have` contains every bit of `need`.
///
/// There are no implied rights, so this is a plain subset test:
/// `(have & need) == need`.
#[inline]
pub fn sufficient(have: RightsMask, need: RightsMask) -> bool {
    (have & need) == need
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_defaults() {
        assert_eq!(role_default_rights(Role::Admin), core::READ | core::WRITE | core::EXECUTE | core::SHARE);
        assert_eq!(role_default_rights(Role::Auditor), core::READ);
        assert_eq!(role_default_rights(Role::User), 0);
    }

    #[test]
    fn test_right_bits_match_core_flags() {
        assert_eq!(Right::Read.mask(), core::READ);
        assert_eq!(Right::Write.mask(), core::WRITE);
        assert_eq!(Right::Execute.mask(), core::EXECUTE);
        assert_eq!(Right::Share.mask(), core::SHARE);
    }

    #[test]
    fn test_sufficient_basic() {
        assert!(sufficient(core::READ, core::READ));
        assert!(!sufficient(0, core::READ));
        assert!(sufficient(core::WRITE | core::READ, core::READ));
        assert!(sufficient(core::ALL, core::SHARE | core::EXECUTE));
    }

    #[test]
    fn test_write_does_not_imply_read() {
        assert!(!sufficient(core::WRITE, core::READ));
        assert!(!sufficient(core::READ, core::WRITE));
    }

    #[test]
    fn test_mask_round_trip_through_rights() {
        let mask = mask_of([Right::Share, Right::Read]);
        assert_eq!(mask, core::READ | core::SHARE);
        assert_eq!(rights_in(mask), vec![Right::Read, Right::Share]);
        assert_eq!(rights_in(1 << 9), Vec::<Right>::new());
    }
}
