use std::{fmt, str::FromStr};

use crate::grammar;

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("Invalid GEO value: {0:?}")]
pub struct InvalidGeo(pub String);

/// A `GEO` position, `latitude;longitude` in degrees (RFC 5545 §3.8.1.6).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geo {
    pub latitude: f64,
    pub longitude: f64,
}

impl FromStr for Geo {
    type Err = InvalidGeo;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidGeo(s.to_owned());
        let (latitude, longitude) = s.split_once(';').ok_or_else(invalid)?;
        if !grammar::FLOAT.is_match(latitude) || !grammar::FLOAT.is_match(longitude) {
            return Err(invalid());
        }
        let latitude: f64 = latitude.parse().map_err(|_| invalid())?;
        let longitude: f64 = longitude.parse().map_err(|_| invalid())?;
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid());
        }
        Ok(Self { latitude, longitude })
    }
}

impl fmt::Display for Geo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.latitude, self.longitude)
    }
}
