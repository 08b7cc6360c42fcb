//! UTM zone designations and their EPSG projected CRS codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DsmError, DsmResult};

/// Hemisphere half of a UTM zone designation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hemisphere {
    North,
    South,
}

impl Hemisphere {
    pub fn letter(&self) -> char {
        match self {
            Hemisphere::North => 'N',
            Hemisphere::South => 'S',
        }
    }
}

/// A UTM zone such as `31N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtmZone {
    /// Zone number, 1 to 60
    pub number: u8,
    pub hemisphere: Hemisphere,
}

impl UtmZone {
    pub fn new(number: u8, hemisphere: Hemisphere) -> DsmResult<Self> {
        if !(1..=60).contains(&number) {
            return Err(DsmError::invalid_zone(format!(
                "zone number {} outside 1..=60",
                number
            )));
        }
        Ok(Self { number, hemisphere })
    }

    /// Parse a zone tag: one or two digits followed by a single `N` or `S`.
    ///
    /// Accepts "31N", "9S" and "09S"; the hemisphere letter is case-insensitive.
    pub fn from_tag(tag: &str) -> DsmResult<Self> {
        let tag = tag.trim();
        let digits_end = tag
            .char_indices()
            .find(|(_, c)| !c.is_ascii_digit())
            .map(|(i, _)| i)
            .unwrap_or(tag.len());

        if digits_end == 0 || digits_end > 2 {
            return Err(DsmError::invalid_zone(format!(
                "'{}': expected a 1-2 digit zone number",
                tag
            )));
        }

        let number: u8 = tag[..digits_end]
            .parse()
            .map_err(|_| DsmError::invalid_zone(format!("'{}': bad zone number", tag)))?;

        let hemisphere = match &tag[digits_end..] {
            "N" | "n" => Hemisphere::North,
            "S" | "s" => Hemisphere::South,
            other => {
                return Err(DsmError::invalid_zone(format!(
                    "'{}': hemisphere must be N or S, got '{}'",
                    tag, other
                )))
            }
        };

        tracing::debug!(zone = number, hemisphere = ?hemisphere, "Parsed UTM zone");
        Self::new(number, hemisphere)
    }

    /// The WGS84 / UTM projected CRS code for this zone.
    pub fn code(&self) -> ZoneCode {
        let base = match self.hemisphere {
            Hemisphere::North => 32600,
            Hemisphere::South => 32700,
        };
        ZoneCode(base + self.number as u16)
    }
}

impl FromStr for UtmZone {
    type Err = DsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.hemisphere.letter())
    }
}

/// EPSG code of a WGS84 / UTM projected CRS: `326zz` north, `327zz` south.
///
/// Only used as an opaque key in the output georeferencing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneCode(pub u16);

impl ZoneCode {
    pub fn value(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for ZoneCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.0)
    }
}
