use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Separator used by the `Supplies Needed` column.
pub const SUPPLY_SEPARATOR: &str = ", ";

/// A relief item an employee can ask for.
///
/// `Other` carries tokens found in a stored file that are not part of the
/// catalogue. They survive a load/save cycle unchanged and price at zero.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Supply {
    Food,
    Water,
    BabySupplies,
    HygieneKit,
    MedicalKit,
    Blanket,
    Other(String),
}

impl Supply {
    /// Items offered on the intake form, in display order.
    pub const CATALOGUE: [Supply; 6] = [
        Supply::Food,
        Supply::Water,
        Supply::BabySupplies,
        Supply::HygieneKit,
        Supply::MedicalKit,
        Supply::Blanket,
    ];

    pub fn name(&self) -> &str {
        match self {
            Supply::Food => "Food",
            Supply::Water => "Water",
            Supply::BabySupplies => "Baby Supplies",
            Supply::HygieneKit => "Hygiene Kit",
            Supply::MedicalKit => "Medical Kit",
            Supply::Blanket => "Blanket",
            Supply::Other(name) => name,
        }
    }

    /// Unit price used by the budget estimate.
    pub fn unit_price(&self) -> u64 {
        match self {
            Supply::Food => 10,
            Supply::Water => 5,
            Supply::BabySupplies => 15,
            Supply::HygieneKit => 12,
            Supply::MedicalKit => 20,
            Supply::Blanket => 8,
            Supply::Other(_) => 0,
        }
    }

    /// Resolves a stored or submitted name; anything outside the catalogue
    /// becomes `Other`.
    pub fn from_name(name: &str) -> Supply {
        let name = name.trim();
        Supply::CATALOGUE
            .into_iter()
            .find(|item| item.name() == name)
            .unwrap_or_else(|| Supply::Other(name.to_string()))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Supply::Other(_))
    }
}

impl fmt::Display for Supply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Supply {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Supply::from_name(s))
    }
}

impl Serialize for Supply {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Supply {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Supply::from_name(&raw))
    }
}

/// Joins supplies into the single-cell form stored on disk, e.g. `"Food, Water"`.
pub fn join_supplies(items: &[Supply]) -> String {
    items
        .iter()
        .map(Supply::name)
        .collect::<Vec<_>>()
        .join(SUPPLY_SEPARATOR)
}

/// Inverse of [`join_supplies`]. Blank cells give an empty list.
pub fn split_supplies(cell: &str) -> Vec<Supply> {
    cell.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Supply::from_name)
        .collect()
}

/// Removes repeated selections, keeping the first occurrence of each.
pub fn dedup_supplies(items: Vec<Supply>) -> Vec<Supply> {
    let mut seen = Vec::with_capacity(items.len());
    for item in items {
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}
