use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::matching::domain::{Client, ClientId, Property, PropertyId, RentalType};
use crate::matching::recommender::Recommendation;
use crate::matching::repository::{ClientRepository, PropertyRepository, RepositoryError};
use crate::matching::vocabulary::MatchVocabulary;
use crate::matching::{recommendation_router, MatchingService};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn updated(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Long-term client from the central-district scenario.
pub(super) fn central_client() -> Client {
    let mut client = Client::new(ClientId("client-central".to_string()), RentalType::LongTerm);
    client.full_name = "Анна Петрова".to_string();
    client.preferred_district = "Центральный".to_string();
    client.desired_property_type = "Квартира".to_string();
    client.desired_rooms_count = Some(2);
    client.long_term.budget_max = Some(50_000);
    client
}

pub(super) fn short_term_client() -> Client {
    let mut client = Client::new(ClientId("client-weekend".to_string()), RentalType::ShortTerm);
    client.preferred_district = "Кировский".to_string();
    client.short_term.budget_max = Some(4_000);
    client.short_term.check_in = Some(date(2025, 7, 10));
    client.short_term.check_out = Some(date(2025, 7, 13));
    client.short_term.guests_count = Some(3);
    client
}

pub(super) fn apartment(id: &str, district: &str, monthly_rent: u32, rooms: u32) -> Property {
    let mut property = Property::new(PropertyId(id.to_string()), updated(1));
    property.title = format!("{rooms}-комнатная квартира");
    property.address = format!("ул. Ленина, {id}");
    property.district = district.to_string();
    property.property_type = "Квартира".to_string();
    property.monthly_rent = Some(monthly_rent);
    property.rooms_count = Some(rooms);
    property
}

pub(super) fn nightly(id: &str, district: &str, daily_price: u32, max_guests: u32) -> Property {
    let mut property = Property::new(PropertyId(id.to_string()), updated(1));
    property.district = district.to_string();
    property.property_type = "Студия".to_string();
    property.daily_price = Some(daily_price);
    property.max_guests = Some(max_guests);
    property
}

/// P1 matches the central client exactly, P2 differs only by district, P3 is over budget.
pub(super) fn scenario_catalog() -> Vec<Property> {
    vec![
        apartment("p1", "Центральный", 45_000, 2),
        apartment("p2", "Кировский", 45_000, 2),
        apartment("p3", "Центральный", 70_000, 2),
    ]
}

pub(super) fn ids(recommendations: &[Recommendation]) -> Vec<&str> {
    recommendations
        .iter()
        .map(|recommendation| recommendation.property.id.0.as_str())
        .collect()
}

#[derive(Default, Clone)]
pub(super) struct MemoryClients {
    records: Arc<Mutex<BTreeMap<ClientId, Client>>>,
}

impl MemoryClients {
    pub(super) fn with(clients: impl IntoIterator<Item = Client>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.records.lock().expect("client mutex poisoned");
            for client in clients {
                guard.insert(client.id.clone(), client);
            }
        }
        repository
    }
}

impl ClientRepository for MemoryClients {
    fn get_client(&self, id: &ClientId) -> Result<Client, RepositoryError> {
        let guard = self.records.lock().expect("client mutex poisoned");
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.0.clone()))
    }

    fn list_clients(&self) -> Result<Vec<Client>, RepositoryError> {
        let guard = self.records.lock().expect("client mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCatalog {
    listings: Vec<Property>,
}

impl MemoryCatalog {
    pub(super) fn with(listings: Vec<Property>) -> Self {
        Self { listings }
    }
}

impl PropertyRepository for MemoryCatalog {
    fn get_all_properties(&self) -> Result<Vec<Property>, RepositoryError> {
        Ok(self.listings.clone())
    }
}

pub(super) struct OfflineCatalog;

impl PropertyRepository for OfflineCatalog {
    fn get_all_properties(&self) -> Result<Vec<Property>, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }
}

pub(super) fn build_service(
    clients: Vec<Client>,
    catalog: Vec<Property>,
) -> MatchingService<MemoryClients, MemoryCatalog> {
    MatchingService::new(
        Arc::new(MemoryClients::with(clients)),
        Arc::new(MemoryCatalog::with(catalog)),
        MatchVocabulary::standard(),
    )
}

pub(super) fn router_with_service(
    service: MatchingService<MemoryClients, MemoryCatalog>,
) -> axum::Router {
    recommendation_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
