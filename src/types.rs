//! Shared catalog types: roles, rights, the OWN marker, and timestamps.
//!
//! The string forms (`"ADMIN"`, `"READ"`, `"OWN"`, ...) are the names callers
//! submit on the request surface of the engine, so every enum here parses from
//! and displays as its upper-case name.

use std::fmt;
use std::str::FromStr;

use crate::error::AcmError;

/// RightsMask, a 32-bit field with one bit per [`Right`].
/// - Bits 0-3: READ, WRITE, EXECUTE, SHARE.
/// - Bits 4-31: unused, must be zero.
pub type RightsMask = u32;

/// Role catalog. Each role maps to a fixed set of default rights
/// (see [`crate::rights::role_default_rights`]).
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Holds every right by default.
    Admin = 0,
    /// Holds READ by default.
    Auditor = 1,
    /// Holds nothing by default; relies on DAC grants.
    User = 2,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Auditor, Role::User];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Auditor => "AUDITOR",
            Role::User => "USER",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AcmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ADMIN" => Ok(Role::Admin),
            "AUDITOR" => Ok(Role::Auditor),
            "USER" => Ok(Role::User),
            _ => Err(AcmError::UnknownRole(value.to_string())),
        }
    }
}

/// Rights that may be exercised on an object and checked by
/// [`crate::engine::Engine::check_authorization`].
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Right {
    Read = 0,
    Write = 1,
    Execute = 2,
    Share = 3,
}

impl Right {
    pub const ALL: [Right; 4] = [Right::Read, Right::Write, Right::Execute, Right::Share];

    pub fn as_str(self) -> &'static str {
        match self {
            Right::Read => "READ",
            Right::Write => "WRITE",
            Right::Execute => "EXECUTE",
            Right::Share => "SHARE",
        }
    }

    /// The single bit this right occupies in a [`RightsMask`].
    #[inline]
    pub fn mask(self) -> RightsMask {
        1 << (self as u8)
    }
}

impl fmt::Display for Right {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Right {
    type Err = AcmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "READ" => Ok(Right::Read),
            "WRITE" => Ok(Right::Write),
            "EXECUTE" => Ok(Right::Execute),
            "SHARE" => Ok(Right::Share),
            _ => Err(AcmError::UnknownRight(value.to_string())),
        }
    }
}

/// The right carried by a DAC grant: one of the four [`Right`]s, or the
/// ownership marker. `Own` is never accepted by the authorization check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum GrantRight {
    Right(Right),
    Own(OwnMarker),
}

/// Serializes as the literal `"OWN"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub enum OwnMarker {
    #[serde(rename = "OWN")]
    Own,
}

impl GrantRight {
    pub const OWN: GrantRight = GrantRight::Own(OwnMarker::Own);

    pub fn as_str(self) -> &'static str {
        match self {
            GrantRight::Right(right) => right.as_str(),
            GrantRight::Own(_) => "OWN",
        }
    }

    pub fn is_own(self) -> bool {
        matches!(self, GrantRight::Own(_))
    }
}

impl From<Right> for GrantRight {
    fn from(right: Right) -> Self {
        GrantRight::Right(right)
    }
}

impl fmt::Display for GrantRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrantRight {
    type Err = AcmError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "OWN" {
            return Ok(GrantRight::OWN);
        }
        value.parse::<Right>().map(GrantRight::Right)
    }
}

/// Wall-clock instant in milliseconds since the UNIX epoch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// The instant `secs` whole seconds after `self`, saturating at `u64::MAX`.
    pub fn plus_secs(self, secs: u64) -> Timestamp {
        Timestamp(self.0.saturating_add(secs.saturating_mul(1_000)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_names_parse_back() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        for right in Right::ALL {
            assert_eq!(right.to_string().parse::<Right>().unwrap(), right);
            assert_eq!(right.as_str().parse::<GrantRight>().unwrap(), GrantRight::Right(right));
        }
        assert_eq!("OWN".parse::<GrantRight>().unwrap(), GrantRight::OWN);
    }

    #[test]
    fn own_is_not_a_right() {
        assert!(matches!("OWN".parse::<Right>(), Err(AcmError::UnknownRight(r)) if r == "OWN"));
        assert!("read".parse::<Right>().is_err());
        assert!("place".parse::<Role>().is_err());
    }

    #[test]
    fn right_masks_are_distinct_bits() {
        let all = Right::ALL.iter().fold(0, |acc, r| acc | r.mask());
        assert_eq!(all, 0b1111);
        assert_eq!(Right::Share.mask(), 1 << 3);
    }

    #[test]
    fn serde_uses_upper_case_names() {
        assert_eq!(serde_json::to_string(&Role::Auditor).unwrap(), "\"AUDITOR\"");
        assert_eq!(serde_json::to_string(&GrantRight::OWN).unwrap(), "\"OWN\"");
        assert_eq!(
            serde_json::from_str::<GrantRight>("\"EXECUTE\"").unwrap(),
            GrantRight::Right(Right::Execute)
        );
        assert_eq!(serde_json::from_str::<GrantRight>("\"OWN\"").unwrap(), GrantRight::OWN);
    }

    #[test]
    fn plus_secs_saturates() {
        assert_eq!(Timestamp(500).plus_secs(2), Timestamp(2_500));
        assert_eq!(Timestamp(u64::MAX - 1).plus_secs(1), Timestamp(u64::MAX));
    }
}
