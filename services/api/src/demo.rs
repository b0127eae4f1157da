use crate::infra::{
    parse_date, InMemoryClientRepository, InMemoryPropertyRepository, MatchingSources,
};
use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Utc};
use clap::Args;
use listing_match::config::AppConfig;
use listing_match::error::AppError;
use listing_match::matching::{
    Client, ClientId, ClientRepository, MatchVocabulary, MatchingService, MatchingServiceError,
    Property, PropertyFilter, PropertyId, Recommendation, RecommendationsResponse, RentalType,
    SeasonalPrice,
};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Client identifier to rank listings for
    #[arg(long)]
    pub(crate) client: String,
    /// JSON file with an array of client profiles (defaults to MATCH_CLIENTS_PATH or the demo seed)
    #[arg(long)]
    pub(crate) clients: Option<PathBuf>,
    /// CSV listing catalog (defaults to MATCH_CATALOG_PATH or the demo seed)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// JSON option vocabulary (defaults to MATCH_VOCABULARY_PATH or the standard lists)
    #[arg(long)]
    pub(crate) vocabulary: Option<PathBuf>,
    /// Keep only these property types (repeatable)
    #[arg(long = "property-type")]
    pub(crate) property_types: Vec<String>,
    /// Keep only these districts (repeatable)
    #[arg(long = "district")]
    pub(crate) districts: Vec<String>,
    #[arg(long)]
    pub(crate) min_rooms: Option<u32>,
    #[arg(long)]
    pub(crate) max_rooms: Option<u32>,
    #[arg(long)]
    pub(crate) min_price: Option<u32>,
    #[arg(long)]
    pub(crate) max_price: Option<u32>,
    /// Free-text search over address, description, district and type
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Number of listings to print
    #[arg(long, default_value_t = 10)]
    pub(crate) limit: usize,
    /// Print the per-criterion breakdown for each listing
    #[arg(long)]
    pub(crate) explain: bool,
    /// Emit the result as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

impl RecommendArgs {
    pub(crate) fn filter(&self) -> PropertyFilter {
        PropertyFilter {
            property_types: self.property_types.iter().cloned().collect(),
            min_rooms: self.min_rooms,
            max_rooms: self.max_rooms,
            min_price: self.min_price,
            max_price: self.max_price,
            districts: self.districts.iter().cloned().collect(),
            search_query: self.search.clone().unwrap_or_default(),
        }
    }
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Listings shown per client
    #[arg(long, default_value_t = 3)]
    pub(crate) top: usize,
    /// Shift the seeded stay and move-in dates to start on this day (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Skip the filter walkthrough
    #[arg(long)]
    pub(crate) skip_filters: bool,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let mut matching = AppConfig::load()?.matching;
    override_path(&mut matching.clients_path, args.clients.clone());
    override_path(&mut matching.catalog_path, args.catalog.clone());
    override_path(&mut matching.vocabulary_path, args.vocabulary.clone());

    let sources = MatchingSources::load(&matching)?;
    let service = MatchingService::new(
        Arc::new(sources.clients),
        Arc::new(sources.properties),
        sources.vocabulary,
    );

    let client_id = ClientId(args.client.clone());
    let filter = args.filter();
    let mut visible = service.search(&client_id, &filter)?;
    let total = visible.len();
    visible.truncate(args.limit);

    if args.json {
        let response = RecommendationsResponse::new(client_id, &filter, visible);
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!(
        "Recommendations for {} ({} active filter(s), showing {} of {})",
        client_id.0,
        filter.active_filters_count(),
        visible.len(),
        total
    );
    for (rank, recommendation) in visible.iter().enumerate() {
        println!("{}", render_recommendation(rank + 1, recommendation));
        if args.explain {
            let outcome = service.explain(&client_id, &recommendation.property)?;
            for component in &outcome.components {
                println!(
                    "     - {} (weight {}): {:.2}{} | {}",
                    component.matcher.label(),
                    component.weight,
                    component.partial_score,
                    if component.hard_fail { " HARD FAIL" } else { "" },
                    component.notes
                );
            }
        }
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        top,
        start,
        skip_filters,
    } = args;

    let mut clients = seed_clients();
    let mut catalog = seed_catalog();
    if let Some(start) = start {
        shift_dates(&mut clients, &mut catalog, start)?;
    }

    let sources = MatchingSources {
        vocabulary: MatchVocabulary::standard(),
        clients: InMemoryClientRepository::from_clients(clients),
        properties: InMemoryPropertyRepository::from_properties(catalog),
    };
    let client_ids: Vec<ClientId> = sources
        .clients
        .list_clients()
        .map_err(MatchingServiceError::from)?
        .into_iter()
        .map(|client| client.id)
        .collect();
    let catalog_size = sources.properties.len();

    let service = MatchingService::new(
        Arc::new(sources.clients),
        Arc::new(sources.properties),
        sources.vocabulary,
    );

    println!("Listing match demo");
    println!(
        "- {} client profile(s) | {} listing(s) in catalog",
        client_ids.len(),
        catalog_size
    );

    for slot in service.recommend_batch(&client_ids)? {
        println!("\nClient {}", slot.client_id.0);
        match slot.outcome {
            Ok(ranked) => {
                let disqualified = ranked
                    .iter()
                    .filter(|recommendation| recommendation.is_disqualified())
                    .count();
                println!(
                    "  {} ranked | {} disqualified (kept at the bottom with score 0)",
                    ranked.len(),
                    disqualified
                );
                for (rank, recommendation) in ranked.iter().take(top).enumerate() {
                    println!("{}", render_recommendation(rank + 1, recommendation));
                    let outcome = service.explain(&slot.client_id, &recommendation.property)?;
                    println!("     {}", outcome.summary());
                }
            }
            Err(err) => println!("  Skipped: {err}"),
        }
    }

    if skip_filters {
        return Ok(());
    }

    let family = ClientId("lt-family".to_string());
    println!("\nFilter walkthrough for {}", family.0);
    let mut view = service.view_for_client(&family)?;
    println!("- unfiltered: {} listing(s)", view.visible().len());

    view.update_filter(PropertyFilter::default().with_price(Some(40_000), Some(55_000)));
    println!(
        "- price 40000-55000: {} listing(s) [{} active filter(s)]",
        view.visible().len(),
        view.active_filters_count()
    );

    let narrowed = view.filter().clone().with_search("школ");
    view.update_filter(narrowed);
    println!(
        "- plus search 'школ': {} listing(s) [{} active filter(s)]",
        view.visible().len(),
        view.active_filters_count()
    );
    for (rank, recommendation) in view.visible().iter().enumerate() {
        println!("{}", render_recommendation(rank + 1, recommendation));
    }

    view.clear_filter();
    println!("- cleared: {} listing(s)", view.visible().len());

    Ok(())
}

fn override_path(target: &mut Option<PathBuf>, value: Option<PathBuf>) {
    if value.is_some() {
        *target = value;
    }
}

pub(crate) fn render_recommendation(rank: usize, recommendation: &Recommendation) -> String {
    let property = &recommendation.property;
    let price = match (property.monthly_rent, property.daily_price) {
        (Some(rent), _) => format!("{rent}/month"),
        (None, Some(daily)) => format!("{daily}/night"),
        (None, None) => "price on request".to_string(),
    };
    let mut line = format!(
        "  {rank}. [{:>3.0}%] {} ({}) | {} | {}",
        recommendation.score * 100.0,
        property.title,
        property.id.0,
        property.district,
        price
    );
    if recommendation.is_disqualified() {
        let reasons: Vec<&str> = recommendation
            .hard_failures
            .iter()
            .map(|kind| kind.label())
            .collect();
        line.push_str(&format!(" | disqualified: {}", reasons.join(", ")));
    }
    line
}

/// Seed calendar date; the literals below are all valid.
fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("seed date is a valid calendar day")
}

fn seed_stamp(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, day, 9, 0, 0)
        .single()
        .expect("seed timestamp is unambiguous")
}

fn labels(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Moves every seeded date by the offset between `start` and the seeded season start.
/// Fails without touching anything when a shifted date leaves the calendar range.
fn shift_dates(
    clients: &mut [Client],
    catalog: &mut [Property],
    start: NaiveDate,
) -> Result<(), AppError> {
    let offset = start.signed_duration_since(date(2025, 7, 1));
    let mut shifted_clients = clients.to_vec();
    let mut shifted_catalog = catalog.to_vec();

    for client in shifted_clients.iter_mut() {
        shift_optional(&mut client.long_term.move_in_date, offset, start)?;
        shift_optional(&mut client.short_term.check_in, offset, start)?;
        shift_optional(&mut client.short_term.check_out, offset, start)?;
    }
    for property in shifted_catalog.iter_mut() {
        shift_optional(&mut property.available_from, offset, start)?;
        for season in &mut property.seasonal_prices {
            season.start = shift_date(season.start, offset, start)?;
            season.end = shift_date(season.end, offset, start)?;
        }
    }

    clients.clone_from_slice(&shifted_clients);
    catalog.clone_from_slice(&shifted_catalog);
    Ok(())
}

fn shift_optional(
    day: &mut Option<NaiveDate>,
    offset: TimeDelta,
    start: NaiveDate,
) -> Result<(), AppError> {
    if let Some(value) = day.as_mut() {
        *value = shift_date(*value, offset, start)?;
    }
    Ok(())
}

fn shift_date(
    day: NaiveDate,
    offset: TimeDelta,
    start: NaiveDate,
) -> Result<NaiveDate, AppError> {
    day.checked_add_signed(offset).ok_or_else(|| {
        AppError::InvalidArgument(format!(
            "--start {start} moves seeded date {day} outside the supported calendar range"
        ))
    })
}

pub(crate) fn seed_clients() -> Vec<Client> {
    let mut family = Client::new(ClientId("lt-family".to_string()), RentalType::LongTerm);
    family.full_name = "Ирина Соколова".to_string();
    family.preferred_district = "Центральный".to_string();
    family.desired_property_type = "Квартира".to_string();
    family.desired_rooms_count = Some(2);
    family.desired_area = Some(60.0);
    family.long_term.budget_min = Some(35_000);
    family.long_term.budget_max = Some(55_000);
    family.long_term.move_in_date = Some(date(2025, 9, 1));
    family.long_term.needs_official_agreement = true;
    family.preferred_amenities = labels(&["Wi-Fi", "Стиральная машина"]);
    family.preferred_nearby_objects = labels(&["Школа", "Детский сад"]);
    family.has_pets = true;
    family.pet_types = labels(&["Кошка"]);
    family.with_children = true;

    let mut couple = Client::new(ClientId("st-couple".to_string()), RentalType::ShortTerm);
    couple.full_name = "Дмитрий и Ольга".to_string();
    couple.preferred_district = "Кировский".to_string();
    couple.short_term.budget_max = Some(4_500);
    couple.short_term.check_in = Some(date(2025, 7, 18));
    couple.short_term.check_out = Some(date(2025, 7, 22));
    couple.short_term.guests_count = Some(2);
    couple.preferred_views = labels(&["На море"]);
    couple.preferred_amenities = labels(&["Кондиционер"]);

    let mut incomplete = Client::new(ClientId("lt-walk-in".to_string()), RentalType::LongTerm);
    incomplete.full_name = "Без бюджета".to_string();
    incomplete.preferred_district = "Советский".to_string();

    vec![family, couple, incomplete]
}

pub(crate) fn seed_catalog() -> Vec<Property> {
    let listing = |id: &str, title: &str, district: &str, property_type: &str, day: u32| {
        let mut property = Property::new(PropertyId(id.to_string()), seed_stamp(day));
        property.title = title.to_string();
        property.district = district.to_string();
        property.property_type = property_type.to_string();
        property
    };

    let mut central = listing("P-101", "Двушка у школы", "Центральный", "Квартира", 10);
    central.address = "ул. Советская, 12".to_string();
    central.description = "Рядом школа и детский сад, новый ремонт".to_string();
    central.rooms_count = Some(2);
    central.area = Some(58.0);
    central.monthly_rent = Some(48_000);
    central.amenities = labels(&["Wi-Fi", "Стиральная машина", "Балкон"]);
    central.nearby_objects = labels(&["Школа", "Детский сад", "Метро"]);
    central.pets_allowed = Some(true);
    central.allowed_pet_types = labels(&["Кошка"]);
    central.children_allowed = Some(true);
    central.official_agreement = Some(true);
    central.available_from = Some(date(2025, 8, 25));

    let mut late = listing("P-102", "Просторная двушка", "Центральный", "Квартира", 12);
    late.address = "пр. Мира, 40".to_string();
    late.description = "Тихий двор, парковка".to_string();
    late.rooms_count = Some(2);
    late.area = Some(66.0);
    late.monthly_rent = Some(52_000);
    late.amenities = labels(&["Wi-Fi"]);
    late.children_allowed = Some(true);
    late.official_agreement = Some(false);
    late.available_from = Some(date(2025, 9, 20));

    let mut no_pets = listing("P-103", "Тройка без животных", "Центральный", "Квартира", 14);
    no_pets.address = "ул. Ленина, 3".to_string();
    no_pets.rooms_count = Some(3);
    no_pets.area = Some(74.0);
    no_pets.monthly_rent = Some(54_000);
    no_pets.pets_allowed = Some(false);
    no_pets.children_allowed = Some(true);

    let mut suburb = listing("P-104", "Дом с садом", "Октябрьский", "Дом", 8);
    suburb.address = "пер. Садовый, 7".to_string();
    suburb.description = "Отдельный дом, школа в 10 минутах".to_string();
    suburb.rooms_count = Some(4);
    suburb.area = Some(120.0);
    suburb.monthly_rent = Some(65_000);
    suburb.nearby_objects = labels(&["Школа"]);

    let mut seaside = listing("S-201", "Студия у моря", "Кировский", "Студия", 11);
    seaside.address = "наб. Морская, 5".to_string();
    seaside.rooms_count = Some(1);
    seaside.daily_price = Some(3_800);
    seaside.seasonal_prices = vec![SeasonalPrice {
        start: date(2025, 7, 20),
        end: date(2025, 8, 31),
        daily_price: 5_000,
    }];
    seaside.views = labels(&["На море"]);
    seaside.amenities = labels(&["Кондиционер", "Wi-Fi"]);
    seaside.max_guests = Some(2);
    seaside.available_from = Some(date(2025, 7, 1));

    let mut loft = listing("S-202", "Лофт на набережной", "Кировский", "Апартаменты", 13);
    loft.address = "наб. Морская, 9".to_string();
    loft.rooms_count = Some(2);
    loft.daily_price = Some(4_200);
    loft.views = labels(&["На город"]);
    loft.amenities = labels(&["Кондиционер"]);
    loft.max_guests = Some(4);
    loft.available_from = Some(date(2025, 7, 15));

    let mut cramped = listing("S-203", "Комната у вокзала", "Железнодорожный", "Комната", 9);
    cramped.address = "ул. Вокзальная, 1".to_string();
    cramped.rooms_count = Some(1);
    cramped.daily_price = Some(1_500);
    cramped.max_guests = Some(1);

    vec![central, late, no_pets, suburb, seaside, loft, cramped]
}
