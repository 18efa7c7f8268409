use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Unsigned rational as stored in EXIF GPS tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,
}

impl Rational {
    /// Whole value with denominator 1
    pub fn whole(numerator: u32) -> Self {
        Self {
            numerator,
            denominator: 1,
        }
    }
}

/// Degrees / minutes / seconds triple, each a whole rational
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dms {
    pub degrees: Rational,
    pub minutes: Rational,
    pub seconds: Rational,
}

impl Dms {
    pub fn new(degrees: u32, minutes: u32, seconds: u32) -> Self {
        Self {
            degrees: Rational::whole(degrees),
            minutes: Rational::whole(minutes),
            seconds: Rational::whole(seconds),
        }
    }

    pub fn as_array(&self) -> [Rational; 3] {
        [self.degrees, self.minutes, self.seconds]
    }

    /// Value in the log's degrees*100 + minutes convention
    pub fn to_degree_minutes(&self) -> f64 {
        let part = |r: Rational| r.numerator as f64 / r.denominator.max(1) as f64;
        part(self.degrees) * 100.0 + part(self.minutes) + part(self.seconds) / 60.0
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}°{:02}'{:02}\"",
            self.degrees.numerator, self.minutes.numerator, self.seconds.numerator
        )
    }
}

/// Positional metadata written into a single frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeoTag {
    pub latitude: Dms,
    pub latitude_ref: char,
    pub longitude: Dms,
    pub longitude_ref: char,
}

impl fmt::Display for GeoTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {} {}",
            self.latitude, self.latitude_ref, self.longitude, self.longitude_ref
        )
    }
}
