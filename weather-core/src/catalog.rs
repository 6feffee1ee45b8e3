use serde::{Deserialize, Serialize};

/// A named location with coordinates in decimal degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Ordered set of named locations used to drive the synthetic generator.
///
/// Names are case-normalized (trimmed, lowercased) both on insert and on lookup.
/// Iteration order is insertion order; re-inserting a known name updates the
/// coordinates in place. Serializes as a plain list of entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CatalogEntry>", into = "Vec<CatalogEntry>")]
pub struct LocationCatalog {
    entries: Vec<CatalogEntry>,
}

impl LocationCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The six reference cities shipped with the dashboard.
    pub fn builtin() -> Self {
        [
            ("madrid", 40.4, -3.7),
            ("delhi", 28.6, 77.2),
            ("bhubaneswar", 20.29, 85.82),
            ("london", 51.50, -0.12),
            ("new york", 40.71, -74.00),
            ("tokyo", 35.67, 139.65),
        ]
        .into_iter()
        .collect()
    }

    pub fn insert(&mut self, name: &str, lat: f64, lon: f64) {
        let name = normalize(name);

        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.lat = lat;
                entry.lon = lon;
            }
            None => self.entries.push(CatalogEntry { name, lat, lon }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry> {
        let name = normalize(name);
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CatalogEntry> {
        self.entries.iter()
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl<'a> FromIterator<(&'a str, f64, f64)> for LocationCatalog {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64, f64)>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for (name, lat, lon) in iter {
            catalog.insert(name, lat, lon);
        }
        catalog
    }
}

impl FromIterator<CatalogEntry> for LocationCatalog {
    fn from_iter<I: IntoIterator<Item = CatalogEntry>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for entry in iter {
            catalog.insert(&entry.name, entry.lat, entry.lon);
        }
        catalog
    }
}

impl From<Vec<CatalogEntry>> for LocationCatalog {
    fn from(entries: Vec<CatalogEntry>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<LocationCatalog> for Vec<CatalogEntry> {
    fn from(catalog: LocationCatalog) -> Self {
        catalog.entries
    }
}

impl<'a> IntoIterator for &'a LocationCatalog {
    type Item = &'a CatalogEntry;
    type IntoIter = std::slice::Iter<'a, CatalogEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
