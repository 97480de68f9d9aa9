use std::collections::BTreeSet;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// RoomBucket – the WGM column
// ---------------------------------------------------------------------------

/// Bucketed number of rooms of a dwelling.
///
/// The declaration order is the natural ordinal order "1" < … < "6+", so the
/// derived `Ord` sorts buckets the way the table and heatmap display them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoomBucket {
    One,
    Two,
    Three,
    Four,
    Five,
    SixPlus,
}

impl RoomBucket {
    /// All buckets in display order.
    pub const ALL: [RoomBucket; 6] = [
        RoomBucket::One,
        RoomBucket::Two,
        RoomBucket::Three,
        RoomBucket::Four,
        RoomBucket::Five,
        RoomBucket::SixPlus,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RoomBucket::One => "1",
            RoomBucket::Two => "2",
            RoomBucket::Three => "3",
            RoomBucket::Four => "4",
            RoomBucket::Five => "5",
            RoomBucket::SixPlus => "6+",
        }
    }

    /// Position in [`RoomBucket::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for RoomBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RoomBucket {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        RoomBucket::ALL
            .into_iter()
            .find(|b| b.label() == trimmed)
            .ok_or_else(|| DashboardError::UnknownRoomBucket(s.to_string()))
    }
}

impl Serialize for RoomBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

// CSV and JSON sources may carry the bucket as text ("6+") or as a bare
// number (1..5), so deserialization accepts both.
impl<'de> Deserialize<'de> for RoomBucket {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BucketVisitor;

        impl Visitor<'_> for BucketVisitor {
            type Value = RoomBucket;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a room bucket \"1\"..\"5\" or \"6+\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<RoomBucket, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<RoomBucket, E> {
                self.visit_str(&v.to_string())
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<RoomBucket, E> {
                self.visit_str(&v.to_string())
            }
        }

        deserializer.deserialize_any(BucketVisitor)
    }
}

// ---------------------------------------------------------------------------
// OccupancyRecord – one row of the source table
// ---------------------------------------------------------------------------

/// One dwelling-year observation.  Column names follow the published CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyRecord {
    #[serde(rename = "ID", deserialize_with = "text_or_number")]
    pub id: String,
    #[serde(rename = "Belegungsjahr", deserialize_with = "whole_number")]
    pub year: i32,
    #[serde(rename = "Quartiersgruppe Name")]
    pub neighborhood: String,
    #[serde(rename = "WGM")]
    pub rooms: RoomBucket,
    /// (adults + 0.5 × children) / rooms
    #[serde(rename = "Dichte")]
    pub density: f64,
    #[serde(rename = "Wechsel", deserialize_with = "whole_number")]
    pub turnover: u8,
    #[serde(rename = "Ueberbelegung", deserialize_with = "whole_number")]
    pub overcrowded: u8,
    #[serde(rename = "Anz_Kinder", deserialize_with = "whole_number")]
    pub children: u32,
}

impl OccupancyRecord {
    /// Check the value-level invariants serde cannot express.
    pub fn validate(&self) -> Result<(), DashboardError> {
        if !self.density.is_finite() || self.density < 0.0 {
            return Err(invalid("Dichte", format!("{} is not a non-negative number", self.density)));
        }
        if self.turnover > 1 {
            return Err(invalid("Wechsel", format!("{} is not a 0/1 flag", self.turnover)));
        }
        if self.overcrowded > 1 {
            return Err(invalid("Ueberbelegung", format!("{} is not a 0/1 flag", self.overcrowded)));
        }
        Ok(())
    }
}

fn invalid(column: &str, reason: String) -> DashboardError {
    DashboardError::InvalidValue {
        column: column.to_string(),
        reason,
    }
}

/// Identifiers are kept as text; numeric ids (`17`, `17.0`) are stringified.
fn text_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    struct IdVisitor;

    impl Visitor<'_> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or number identifier")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Integer columns accept whole-number floats (`1.0`) as well, since pandas
/// writes integer columns with missing values as floats.  Fractions fail.
fn whole_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    struct WholeVisitor<T>(PhantomData<T>);

    impl<T: TryFrom<i64>> Visitor<'_> for WholeVisitor<T> {
        type Value = T;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a whole number")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<T, E> {
            T::try_from(v).map_err(|_| E::custom(format!("{v} is out of range")))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<T, E> {
            let v = i64::try_from(v).map_err(|_| E::custom(format!("{v} is out of range")))?;
            self.visit_i64(v)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<T, E> {
            if !v.is_finite() || v.fract() != 0.0 || v.abs() > i64::MAX as f64 {
                return Err(E::custom(format!("{v} is not a whole number")));
            }
            self.visit_i64(v as i64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<T, E> {
            let trimmed = v.trim();
            if let Ok(n) = trimmed.parse::<i64>() {
                return self.visit_i64(n);
            }
            match trimmed.parse::<f64>() {
                Ok(f) => self.visit_f64(f),
                Err(_) => Err(E::custom(format!("{v:?} is not a whole number"))),
            }
        }
    }

    deserializer.deserialize_any(WholeVisitor(PhantomData))
}

// ---------------------------------------------------------------------------
// OccupancyDataset – the immutable data store
// ---------------------------------------------------------------------------

/// The full parsed dataset.  Built once at start-up and never mutated.
#[derive(Debug, Clone, Default)]
pub struct OccupancyDataset {
    /// All observations (rows).
    pub records: Vec<OccupancyRecord>,
    /// Sorted set of all neighborhood names.
    pub neighborhoods: BTreeSet<String>,
    /// Smallest and largest `Belegungsjahr`, if any rows exist.
    pub year_span: Option<(i32, i32)>,
}

impl OccupancyDataset {
    /// Build the column summaries from the loaded records.
    pub fn from_records(records: Vec<OccupancyRecord>) -> Self {
        let neighborhoods = records.iter().map(|r| r.neighborhood.clone()).collect();
        let year_span = records.iter().fold(None, |span, r| match span {
            None => Some((r.year, r.year)),
            Some((lo, hi)) => Some((r.year.min(lo), r.year.max(hi))),
        });
        OccupancyDataset {
            records,
            neighborhoods,
            year_span,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
