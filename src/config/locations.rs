//! The ordered set of target locations, read from a YAML file of the form
//!
//! ```yaml
//! target_locations:
//!   Bhadla: [27.539669, 71.915253]
//!   Kamuthi: [9.347568, 78.392162]
//! ```
//!
//! The order of the entries is the patch order of the output arrays.

use crate::config::error::ConfigError;
use crate::types::geo::{LatLon, Location};
use log::debug;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use tokio::fs;

/// Target locations in configuration order.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSet {
    locations: Vec<Location>,
}

impl LocationSet {
    /// Builds a set from locations, rejecting empty sets and repeated names.
    pub fn new(locations: Vec<Location>) -> Result<Self, ConfigError> {
        if locations.is_empty() {
            return Err(ConfigError::NoLocations);
        }
        let mut seen = HashSet::with_capacity(locations.len());
        for location in &locations {
            if !seen.insert(location.name.as_str()) {
                return Err(ConfigError::DuplicateLocation(location.name.clone()));
            }
        }
        Ok(Self { locations })
    }

    /// Parses the YAML document. `origin` is only used in error messages.
    pub fn from_yaml_str(yaml: &str, origin: &Path) -> Result<Self, ConfigError> {
        let file: LocationFile = serde_yaml::from_str(yaml)
            .map_err(|e| ConfigError::LocationsParse(origin.to_path_buf(), e))?;
        Self::new(file.target_locations.0)
    }

    /// Reads and parses a location file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::LocationsRead(path.to_path_buf(), e))?;
        let set = Self::from_yaml_str(&yaml, path)?;
        debug!("Loaded {} target locations from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Location> {
        self.locations.iter()
    }

    pub fn as_slice(&self) -> &[Location] {
        &self.locations
    }
}

impl<'a> IntoIterator for &'a LocationSet {
    type Item = &'a Location;
    type IntoIter = std::slice::Iter<'a, Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.iter()
    }
}

#[derive(Deserialize)]
struct LocationFile {
    target_locations: OrderedLocations,
}

/// A YAML mapping deserialized in document order, keeping duplicate keys for validation.
struct OrderedLocations(Vec<Location>);

impl<'de> Deserialize<'de> for OrderedLocations {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = OrderedLocations;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of location names to [latitude, longitude]")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(OrderedLocations(Vec::new()))
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut locations = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, coordinate)) = map.next_entry::<String, LatLon>()? {
                    locations.push(Location::new(name, coordinate));
                }
                Ok(OrderedLocations(locations))
            }
        }

        deserializer.deserialize_any(OrderedVisitor)
    }
}
