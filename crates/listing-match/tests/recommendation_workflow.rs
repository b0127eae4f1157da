//! End-to-end scenarios for catalog import, ranking and filtering through the public service
//! facade and HTTP router.

mod common {
    use std::collections::BTreeMap;

    use listing_match::matching::domain::{Client, ClientId};
    use listing_match::matching::repository::{ClientRepository, RepositoryError};

    pub const CATALOG_CSV: &str = "\
id,title,address,description,district,property_type,rooms_count,area,monthly_rent,daily_price,seasonal_prices,amenities,views,nearby_objects,pets_allowed,allowed_pet_types,children_allowed,parking_type,bathroom_type,heating_type,official_agreement,tax_options,available_from,max_guests,status,updated_at
lt-1,Двушка в центре,ул. Мира 10,Тихий двор,Центральный,Квартира,2,56,45000,,,Wi-Fi;Балкон,,Метро,да,Кошка,да,Во дворе,Раздельный,Центральное,да,Самозанятый,2025-09-01,,available,2025-08-20T10:00:00Z
lt-2,Двушка на окраине,ул. Лесная 3,Рядом лес,Кировский,Квартира,2,58,42000,,,Wi-Fi,,Школа,нет,,да,,,,,,2025-09-01,,available,2025-08-21T10:00:00Z
lt-3,Дом с садом,пер. Садовый 1,Большой участок,Центральный,Дом,4,140,90000,,,,,Парк,да,,да,Гараж,Несколько,Газовое,да,,2025-10-01,,reserved,2025-08-22T10:00:00Z
st-1,Студия у моря,наб. Морская 7,Вид на море,Кировский,Студия,1,30,,3000,2025-07-12..2025-07-20=4500,Wi-Fi;Кондиционер,На море,,,,,,,,,,2025-07-01,3,available,2025-06-01T08:00:00Z
st-2,Апартаменты в центре,ул. Мира 12,Для компании,Центральный,Апартаменты,3,70,,4200,,Wi-Fi,На город,,,,,,,,,,2025-07-01,6,available,2025-06-02T08:00:00Z
";

    pub const CLIENTS_JSON: &str = r#"[
        {
            "id": "family",
            "full_name": "Семья Ивановых",
            "rental_type": "LONG_TERM",
            "preferred_district": "центр",
            "desired_property_type": "apartment",
            "desired_rooms_count": 2,
            "long_term": { "budget_max": 50000, "needs_official_agreement": true },
            "preferred_amenities": ["wifi", "Балкон"],
            "has_pets": true,
            "pet_types": ["cat"],
            "with_children": true
        },
        {
            "id": "weekend",
            "rental_type": "SHORT_TERM",
            "preferred_district": "Кировский",
            "short_term": {
                "budget_max": 4000,
                "check_in": "2025-07-10",
                "check_out": "2025-07-14",
                "guests_count": 2
            }
        }
    ]"#;

    pub struct JsonClients {
        records: BTreeMap<ClientId, Client>,
    }

    impl JsonClients {
        pub fn parse(raw: &str) -> Self {
            let clients: Vec<Client> = serde_json::from_str(raw).expect("client list parses");
            Self {
                records: clients
                    .into_iter()
                    .map(|client| (client.id.clone(), client))
                    .collect(),
            }
        }
    }

    impl ClientRepository for JsonClients {
        fn get_client(&self, id: &ClientId) -> Result<Client, RepositoryError> {
            self.records
                .get(id)
                .cloned()
                .ok_or_else(|| RepositoryError::NotFound(id.0.clone()))
        }

        fn list_clients(&self) -> Result<Vec<Client>, RepositoryError> {
            Ok(self.records.values().cloned().collect())
        }
    }
}

use std::sync::Arc;

use axum::http::StatusCode;
use common::{JsonClients, CATALOG_CSV, CLIENTS_JSON};
use listing_match::matching::{
    recommendation_router, ClientId, ClientRepository, CsvPropertyCatalog, MatcherKind,
    MatchVocabulary, MatchingService, PropertyFilter, RecommendationView,
};
use serde_json::Value;
use tower::ServiceExt;

fn service() -> MatchingService<JsonClients, CsvPropertyCatalog> {
    let catalog = CsvPropertyCatalog::from_reader(CATALOG_CSV.as_bytes()).expect("catalog parses");
    MatchingService::new(
        Arc::new(JsonClients::parse(CLIENTS_JSON)),
        Arc::new(catalog),
        MatchVocabulary::standard(),
    )
}

fn ids(recommendations: &[listing_match::matching::Recommendation]) -> Vec<String> {
    recommendations
        .iter()
        .map(|recommendation| recommendation.property.id.0.clone())
        .collect()
}

#[test]
fn family_profile_prefers_the_central_apartment() {
    let service = service();
    let ranked = service
        .recommend_for_client(&ClientId("family".to_string()))
        .expect("family ranks");

    assert_eq!(ranked.len(), 5);
    assert_eq!(ranked[0].property.id.0, "lt-1");
    assert!((ranked[0].score - 1.0).abs() < 1e-9);

    let no_pets = ranked
        .iter()
        .find(|recommendation| recommendation.property.id.0 == "lt-2")
        .expect("listing still ranked");
    assert!(no_pets.hard_failures.contains(&MatcherKind::Pets));
    assert_eq!(no_pets.score, 0.0);
}

#[test]
fn weekend_profile_uses_seasonal_rates() {
    let service = service();
    let ranked = service
        .recommend_for_client(&ClientId("weekend".to_string()))
        .expect("weekend ranks");

    let seaside = ranked
        .iter()
        .find(|recommendation| recommendation.property.id.0 == "st-1")
        .expect("seaside studio ranked");
    assert!(seaside.hard_failures.is_empty());
    assert!(seaside.score > 0.9);

    let central = ranked
        .iter()
        .find(|recommendation| recommendation.property.id.0 == "st-2")
        .expect("central apartments ranked");
    assert_eq!(central.hard_failures, vec![MatcherKind::ShortTermBudget]);
    assert_eq!(ranked[0].property.id.0, "st-1");
}

#[test]
fn view_narrows_and_restores_family_results() {
    let service = service();
    let mut view: RecommendationView = service
        .view_for_client(&ClientId("family".to_string()))
        .expect("view builds");

    view.update_filter(
        PropertyFilter::default()
            .with_price(Some(40_000), Some(60_000))
            .with_search("двор"),
    );
    assert_eq!(ids(view.visible()), vec!["lt-1".to_string()]);
    assert_eq!(view.active_filters_count(), 2);

    view.clear_filter();
    assert_eq!(view.visible().len(), 5);
}

#[test]
fn batch_covers_every_stored_client() {
    let service = service();
    let clients = JsonClients::parse(CLIENTS_JSON);
    let requested: Vec<ClientId> = clients
        .list_clients()
        .expect("clients listed")
        .into_iter()
        .map(|client| client.id)
        .collect();

    let results = service.recommend_batch(&requested).expect("catalog available");
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|slot| slot.outcome.is_ok()));
}

#[tokio::test]
async fn search_endpoint_filters_by_district() {
    let router = recommendation_router(Arc::new(service()));
    let filter = PropertyFilter::default().with_district("Центральный");

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/clients/family/recommendations/search")
                .header(axum::http::header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&filter).expect("filter serializes"),
                ))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: Value = serde_json::from_slice(&body).expect("json payload");
    let returned: Vec<&str> = payload["recommendations"]
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|entry| entry["property"]["id"].as_str())
        .collect();
    assert_eq!(returned, vec!["lt-1", "st-2", "lt-3"]);
}
