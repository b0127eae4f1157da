use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for agency clients.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClientId(pub String);

/// Identifier wrapper for catalog listings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyId(pub String);

/// Which half of the client's requirements is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RentalType {
    LongTerm,
    ShortTerm,
}

impl RentalType {
    pub const fn label(self) -> &'static str {
        match self {
            RentalType::LongTerm => "long_term",
            RentalType::ShortTerm => "short_term",
        }
    }
}

/// Requirements that only apply to monthly leases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LongTermPreferences {
    pub budget_min: Option<u32>,
    pub budget_max: Option<u32>,
    pub move_in_date: Option<NaiveDate>,
    pub needs_official_agreement: bool,
    pub tax_option: Option<String>,
}

/// Requirements that only apply to nightly stays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShortTermPreferences {
    pub budget_min: Option<u32>,
    pub budget_max: Option<u32>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests_count: Option<u32>,
}

/// A prospective tenant's search profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    #[serde(default)]
    pub full_name: String,
    pub rental_type: RentalType,
    #[serde(default)]
    pub preferred_district: String,
    #[serde(default)]
    pub desired_property_type: String,
    #[serde(default)]
    pub desired_rooms_count: Option<u32>,
    #[serde(default)]
    pub desired_area: Option<f64>,
    #[serde(default)]
    pub long_term: LongTermPreferences,
    #[serde(default)]
    pub short_term: ShortTermPreferences,
    #[serde(default)]
    pub preferred_amenities: BTreeSet<String>,
    #[serde(default)]
    pub preferred_views: BTreeSet<String>,
    #[serde(default)]
    pub preferred_nearby_objects: BTreeSet<String>,
    #[serde(default)]
    pub has_pets: bool,
    #[serde(default)]
    pub pet_types: BTreeSet<String>,
    #[serde(default)]
    pub with_children: bool,
    #[serde(default)]
    pub preferred_parking: Option<String>,
    #[serde(default)]
    pub preferred_bathroom: Option<String>,
    #[serde(default)]
    pub preferred_heating: Option<String>,
}

impl Client {
    /// An empty profile of the given rental type; every preference is "don't care".
    pub fn new(id: ClientId, rental_type: RentalType) -> Self {
        Self {
            id,
            full_name: String::new(),
            rental_type,
            preferred_district: String::new(),
            desired_property_type: String::new(),
            desired_rooms_count: None,
            desired_area: None,
            long_term: LongTermPreferences::default(),
            short_term: ShortTermPreferences::default(),
            preferred_amenities: BTreeSet::new(),
            preferred_views: BTreeSet::new(),
            preferred_nearby_objects: BTreeSet::new(),
            has_pets: false,
            pet_types: BTreeSet::new(),
            with_children: false,
            preferred_parking: None,
            preferred_bathroom: None,
            preferred_heating: None,
        }
    }

    /// Budget bounds for the active rental type only.
    pub fn budget(&self) -> BudgetBounds {
        match self.rental_type {
            RentalType::LongTerm => BudgetBounds {
                min: self.long_term.budget_min,
                max: self.long_term.budget_max,
            },
            RentalType::ShortTerm => BudgetBounds {
                min: self.short_term.budget_min,
                max: self.short_term.budget_max,
            },
        }
    }
}

/// Inclusive price bounds in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetBounds {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

impl BudgetBounds {
    pub fn is_unset(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Daily price override valid for an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalPrice {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub daily_price: u32,
}

impl SeasonalPrice {
    pub fn covers(&self, night: NaiveDate) -> bool {
        self.start <= night && night <= self.end
    }
}

/// Listing lifecycle status as maintained by the agency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyStatus {
    #[default]
    Available,
    Reserved,
    Occupied,
    Unavailable,
    Pending,
    Archived,
}

impl PropertyStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PropertyStatus::Available => "available",
            PropertyStatus::Reserved => "reserved",
            PropertyStatus::Occupied => "occupied",
            PropertyStatus::Unavailable => "unavailable",
            PropertyStatus::Pending => "pending",
            PropertyStatus::Archived => "archived",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" => Some(Self::Available),
            "reserved" => Some(Self::Reserved),
            "occupied" => Some(Self::Occupied),
            "unavailable" => Some(Self::Unavailable),
            "pending" => Some(Self::Pending),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

/// A rentable listing from the agency catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub property_type: String,
    #[serde(default)]
    pub rooms_count: Option<u32>,
    #[serde(default)]
    pub area: Option<f64>,
    #[serde(default)]
    pub monthly_rent: Option<u32>,
    #[serde(default)]
    pub daily_price: Option<u32>,
    #[serde(default)]
    pub seasonal_prices: Vec<SeasonalPrice>,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    #[serde(default)]
    pub views: BTreeSet<String>,
    #[serde(default)]
    pub nearby_objects: BTreeSet<String>,
    #[serde(default)]
    pub pets_allowed: Option<bool>,
    #[serde(default)]
    pub allowed_pet_types: BTreeSet<String>,
    #[serde(default)]
    pub children_allowed: Option<bool>,
    #[serde(default)]
    pub parking_type: Option<String>,
    #[serde(default)]
    pub bathroom_type: Option<String>,
    #[serde(default)]
    pub heating_type: Option<String>,
    #[serde(default)]
    pub official_agreement: Option<bool>,
    #[serde(default)]
    pub tax_options: BTreeSet<String>,
    #[serde(default)]
    pub available_from: Option<NaiveDate>,
    #[serde(default)]
    pub max_guests: Option<u32>,
    #[serde(default)]
    pub status: PropertyStatus,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// A bare listing with only identity and timestamp populated.
    pub fn new(id: PropertyId, updated_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: String::new(),
            address: String::new(),
            description: String::new(),
            district: String::new(),
            property_type: String::new(),
            rooms_count: None,
            area: None,
            monthly_rent: None,
            daily_price: None,
            seasonal_prices: Vec::new(),
            amenities: BTreeSet::new(),
            views: BTreeSet::new(),
            nearby_objects: BTreeSet::new(),
            pets_allowed: None,
            allowed_pet_types: BTreeSet::new(),
            children_allowed: None,
            parking_type: None,
            bathroom_type: None,
            heating_type: None,
            official_agreement: None,
            tax_options: BTreeSet::new(),
            available_from: None,
            max_guests: None,
            status: PropertyStatus::Available,
            updated_at,
        }
    }

    /// Price used by catalog filters: monthly rent when listed, otherwise the daily price.
    pub fn listed_price(&self) -> Option<u32> {
        self.monthly_rent.or(self.daily_price)
    }

    /// Mean nightly price over `[check_in, check_out)`, seasonal overrides first.
    ///
    /// Returns `None` when any night has neither an override nor a base daily price, or when
    /// the range is empty.
    pub fn nightly_price_for_stay(&self, check_in: NaiveDate, check_out: NaiveDate) -> Option<f64> {
        let mut total: u64 = 0;
        let mut nights: u64 = 0;
        for night in check_in.iter_days().take_while(|night| *night < check_out) {
            let price = self
                .seasonal_prices
                .iter()
                .find(|season| season.covers(night))
                .map(|season| season.daily_price)
                .or(self.daily_price)?;
            total += u64::from(price);
            nights += 1;
        }

        if nights == 0 {
            None
        } else {
            Some(total as f64 / nights as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn budget_reads_only_active_rental_type() {
        let mut client = Client::new(ClientId("c-1".to_string()), RentalType::ShortTerm);
        client.long_term.budget_max = Some(50_000);
        assert!(client.budget().is_unset());

        client.short_term.budget_max = Some(3_000);
        assert_eq!(client.budget().max, Some(3_000));
    }

    #[test]
    fn seasonal_prices_override_base_price_per_night() {
        let mut property = Property::new(
            PropertyId("p-1".to_string()),
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        );
        property.daily_price = Some(2_000);
        property.seasonal_prices.push(SeasonalPrice {
            start: date(2025, 7, 1),
            end: date(2025, 7, 31),
            daily_price: 4_000,
        });

        // Two nights in June at the base rate, two in July at the seasonal rate.
        let price = property
            .nightly_price_for_stay(date(2025, 6, 29), date(2025, 7, 3))
            .expect("all nights priced");
        assert_eq!(price, 3_000.0);
    }

    #[test]
    fn stay_price_is_unknown_without_base_rate_outside_season() {
        let mut property = Property::new(
            PropertyId("p-2".to_string()),
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        );
        property.seasonal_prices.push(SeasonalPrice {
            start: date(2025, 7, 1),
            end: date(2025, 7, 31),
            daily_price: 4_000,
        });

        assert!(property
            .nightly_price_for_stay(date(2025, 6, 30), date(2025, 7, 2))
            .is_none());
        assert!(property
            .nightly_price_for_stay(date(2025, 7, 2), date(2025, 7, 2))
            .is_none());
    }

    #[test]
    fn listed_price_prefers_monthly_rent() {
        let mut property = Property::new(
            PropertyId("p-3".to_string()),
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        );
        assert_eq!(property.listed_price(), None);
        property.daily_price = Some(2_500);
        assert_eq!(property.listed_price(), Some(2_500));
        property.monthly_rent = Some(45_000);
        assert_eq!(property.listed_price(), Some(45_000));
    }

    #[test]
    fn status_parses_labels() {
        assert_eq!(PropertyStatus::parse(" Archived "), Some(PropertyStatus::Archived));
        assert_eq!(PropertyStatus::parse("sold"), None);
        assert_eq!(PropertyStatus::Reserved.label(), "reserved");
    }
}
