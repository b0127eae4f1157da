//! CSV import of the listing catalog.
//!
//! List columns hold `;`-separated labels. Seasonal prices are written as
//! `2025-06-01..2025-08-31=3500`, several entries separated by `;`.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

use super::domain::{Property, PropertyId, PropertyStatus, SeasonalPrice};
use super::repository::{PropertyRepository, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum CatalogImportError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid catalog CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: invalid {column} value '{value}'")]
    InvalidField {
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// Catalog loaded once from CSV and served from memory.
#[derive(Debug, Clone, Default)]
pub struct CsvPropertyCatalog {
    properties: Vec<Property>,
}

impl CsvPropertyCatalog {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut properties = Vec::new();
        for (index, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
            let row = record?;
            // Header is line 1.
            properties.push(row.into_property(index + 2)?);
        }

        Ok(Self { properties })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn into_properties(self) -> Vec<Property> {
        self.properties
    }
}

impl PropertyRepository for CsvPropertyCatalog {
    fn get_all_properties(&self) -> Result<Vec<Property>, RepositoryError> {
        Ok(self.properties.clone())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    district: String,
    #[serde(default)]
    property_type: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    rooms_count: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    area: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    monthly_rent: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    daily_price: Option<String>,
    #[serde(default)]
    seasonal_prices: String,
    #[serde(default)]
    amenities: String,
    #[serde(default)]
    views: String,
    #[serde(default)]
    nearby_objects: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pets_allowed: Option<String>,
    #[serde(default)]
    allowed_pet_types: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    children_allowed: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    parking_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    bathroom_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    heating_type: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    official_agreement: Option<String>,
    #[serde(default)]
    tax_options: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    available_from: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    max_guests: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    status: Option<String>,
    updated_at: String,
}

impl CatalogRow {
    fn into_property(self, row: usize) -> Result<Property, CatalogImportError> {
        let invalid = |column: &'static str, value: &str| CatalogImportError::InvalidField {
            row,
            column,
            value: value.to_string(),
        };

        let updated_at =
            parse_timestamp(&self.updated_at).ok_or_else(|| invalid("updated_at", &self.updated_at))?;
        let status = match self.status.as_deref() {
            None => PropertyStatus::Available,
            Some(raw) => PropertyStatus::parse(raw).ok_or_else(|| invalid("status", raw))?,
        };

        let mut property = Property::new(PropertyId(self.id), updated_at);
        property.title = self.title;
        property.address = self.address;
        property.description = self.description;
        property.district = self.district;
        property.property_type = self.property_type;
        property.rooms_count = parse_optional(self.rooms_count.as_deref(), "rooms_count", row)?;
        property.area = parse_optional(self.area.as_deref(), "area", row)?;
        property.monthly_rent = parse_optional(self.monthly_rent.as_deref(), "monthly_rent", row)?;
        property.daily_price = parse_optional(self.daily_price.as_deref(), "daily_price", row)?;
        property.seasonal_prices = parse_seasonal_prices(&self.seasonal_prices)
            .ok_or_else(|| invalid("seasonal_prices", &self.seasonal_prices))?;
        property.amenities = parse_list(&self.amenities);
        property.views = parse_list(&self.views);
        property.nearby_objects = parse_list(&self.nearby_objects);
        property.pets_allowed = parse_optional_flag(self.pets_allowed.as_deref(), "pets_allowed", row)?;
        property.allowed_pet_types = parse_list(&self.allowed_pet_types);
        property.children_allowed =
            parse_optional_flag(self.children_allowed.as_deref(), "children_allowed", row)?;
        property.parking_type = self.parking_type;
        property.bathroom_type = self.bathroom_type;
        property.heating_type = self.heating_type;
        property.official_agreement =
            parse_optional_flag(self.official_agreement.as_deref(), "official_agreement", row)?;
        property.tax_options = parse_list(&self.tax_options);
        property.available_from = match self.available_from.as_deref() {
            None => None,
            Some(raw) => Some(parse_date(raw).ok_or_else(|| invalid("available_from", raw))?),
        };
        property.max_guests = parse_optional(self.max_guests.as_deref(), "max_guests", row)?;
        property.status = status;

        Ok(property)
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_optional<T: std::str::FromStr>(
    raw: Option<&str>,
    column: &'static str,
    row: usize,
) -> Result<Option<T>, CatalogImportError> {
    raw.map(|value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|_| CatalogImportError::InvalidField {
                row,
                column,
                value: value.to_string(),
            })
    })
    .transpose()
}

fn parse_optional_flag(
    raw: Option<&str>,
    column: &'static str,
    row: usize,
) -> Result<Option<bool>, CatalogImportError> {
    raw.map(|value| {
        parse_flag(value).ok_or_else(|| CatalogImportError::InvalidField {
            row,
            column,
            value: value.to_string(),
        })
    })
    .transpose()
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "да" => Some(true),
        "false" | "no" | "n" | "0" | "нет" => Some(false),
        _ => None,
    }
}

fn parse_list(raw: &str) -> BTreeSet<String> {
    raw.split(';')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    parse_date(trimmed)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_seasonal_prices(raw: &str) -> Option<Vec<SeasonalPrice>> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (range, price) = entry.split_once('=')?;
            let (start, end) = range.split_once("..")?;
            let start = parse_date(start)?;
            let end = parse_date(end)?;
            if end < start {
                return None;
            }
            Some(SeasonalPrice {
                start,
                end,
                daily_price: price.trim().parse().ok()?,
            })
        })
        .collect()
}
