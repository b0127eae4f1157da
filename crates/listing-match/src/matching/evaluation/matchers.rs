use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::super::domain::{BudgetBounds, Client, Property};
use super::super::vocabulary::{MatchVocabulary, OptionKind};

/// Credit given when the client states a preference but the listing lacks the attribute.
pub const MISSING_ATTRIBUTE_CREDIT: f64 = 0.5;
/// Credit for a district that contains (or is contained in) the preferred one.
pub const DISTRICT_CONTAINS_CREDIT: f64 = 0.75;
pub const ROOMS_TOLERANCE: f64 = 2.0;
/// Area tolerance as a share of the desired area.
pub const AREA_TOLERANCE_RATIO: f64 = 0.25;
/// Width of the partial-credit band below the minimum budget, as a share of that minimum.
pub const BUDGET_TOLERANCE_RATIO: f64 = 0.25;
pub const MOVE_IN_TOLERANCE_DAYS: f64 = 30.0;
pub const STAY_TOLERANCE_DAYS: f64 = 7.0;

/// One comparable preference dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatcherKind {
    District,
    PropertyType,
    Rooms,
    Area,
    LongTermBudget,
    ShortTermBudget,
    MoveInDate,
    StayDates,
    Guests,
    Amenities,
    Views,
    NearbyObjects,
    Pets,
    Children,
    Parking,
    Bathroom,
    Heating,
    OfficialAgreement,
    TaxOption,
}

impl MatcherKind {
    pub const fn label(self) -> &'static str {
        match self {
            MatcherKind::District => "district",
            MatcherKind::PropertyType => "property type",
            MatcherKind::Rooms => "rooms",
            MatcherKind::Area => "area",
            MatcherKind::LongTermBudget => "monthly budget",
            MatcherKind::ShortTermBudget => "daily budget",
            MatcherKind::MoveInDate => "move-in date",
            MatcherKind::StayDates => "stay dates",
            MatcherKind::Guests => "guests",
            MatcherKind::Amenities => "amenities",
            MatcherKind::Views => "views",
            MatcherKind::NearbyObjects => "nearby objects",
            MatcherKind::Pets => "pets",
            MatcherKind::Children => "children",
            MatcherKind::Parking => "parking",
            MatcherKind::Bathroom => "bathroom",
            MatcherKind::Heating => "heating",
            MatcherKind::OfficialAgreement => "official agreement",
            MatcherKind::TaxOption => "tax option",
        }
    }

    pub(crate) fn evaluate(self, ctx: &MatchContext<'_>) -> MatchResult {
        match self {
            MatcherKind::District => match_district(ctx),
            MatcherKind::PropertyType => match_property_type(ctx),
            MatcherKind::Rooms => match_rooms(ctx),
            MatcherKind::Area => match_area(ctx),
            MatcherKind::LongTermBudget => match_long_term_budget(ctx),
            MatcherKind::ShortTermBudget => match_short_term_budget(ctx),
            MatcherKind::MoveInDate => match_move_in_date(ctx),
            MatcherKind::StayDates => match_stay_dates(ctx),
            MatcherKind::Guests => match_guests(ctx),
            MatcherKind::Amenities => set_overlap(
                ctx,
                OptionKind::Amenity,
                &ctx.client.preferred_amenities,
                &ctx.property.amenities,
            ),
            MatcherKind::Views => set_overlap(
                ctx,
                OptionKind::View,
                &ctx.client.preferred_views,
                &ctx.property.views,
            ),
            MatcherKind::NearbyObjects => set_overlap(
                ctx,
                OptionKind::NearbyObject,
                &ctx.client.preferred_nearby_objects,
                &ctx.property.nearby_objects,
            ),
            MatcherKind::Pets => match_pets(ctx),
            MatcherKind::Children => match_children(ctx),
            MatcherKind::Parking => preference_equality(
                ctx,
                OptionKind::Parking,
                ctx.client.preferred_parking.as_deref(),
                ctx.property.parking_type.as_deref(),
            ),
            MatcherKind::Bathroom => preference_equality(
                ctx,
                OptionKind::Bathroom,
                ctx.client.preferred_bathroom.as_deref(),
                ctx.property.bathroom_type.as_deref(),
            ),
            MatcherKind::Heating => preference_equality(
                ctx,
                OptionKind::Heating,
                ctx.client.preferred_heating.as_deref(),
                ctx.property.heating_type.as_deref(),
            ),
            MatcherKind::OfficialAgreement => match_official_agreement(ctx),
            MatcherKind::TaxOption => match_tax_option(ctx),
        }
    }
}

pub(crate) struct MatchContext<'a> {
    pub client: &'a Client,
    pub property: &'a Property,
    pub vocabulary: &'a MatchVocabulary,
}

/// Outcome of comparing one dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub partial_score: f64,
    pub hard_fail: bool,
    pub applicable: bool,
    pub notes: String,
}

impl MatchResult {
    pub fn not_applicable() -> Self {
        Self {
            partial_score: 0.0,
            hard_fail: false,
            applicable: false,
            notes: String::new(),
        }
    }

    pub fn scored(partial_score: f64, notes: impl Into<String>) -> Self {
        let partial_score = if partial_score.is_finite() {
            partial_score.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            partial_score,
            hard_fail: false,
            applicable: true,
            notes: notes.into(),
        }
    }

    pub fn missing(notes: impl Into<String>) -> Self {
        Self::scored(MISSING_ATTRIBUTE_CREDIT, notes)
    }

    pub fn disqualified(notes: impl Into<String>) -> Self {
        Self {
            partial_score: 0.0,
            hard_fail: true,
            applicable: true,
            notes: notes.into(),
        }
    }
}

/// `1 - min(1, |actual - desired| / width)`, clamped to `[0, 1]`.
pub fn range_credit(actual: f64, desired: f64, width: f64) -> f64 {
    let distance = (actual - desired).abs();
    if width.is_nan() || width <= 0.0 {
        return if distance == 0.0 { 1.0 } else { 0.0 };
    }
    (1.0 - (distance / width).min(1.0)).clamp(0.0, 1.0)
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn match_district(ctx: &MatchContext<'_>) -> MatchResult {
    if is_blank(&ctx.client.preferred_district) {
        return MatchResult::not_applicable();
    }
    if is_blank(&ctx.property.district) {
        return MatchResult::missing("listing has no district");
    }

    let wanted = ctx
        .vocabulary
        .canonical(OptionKind::District, &ctx.client.preferred_district);
    let actual = ctx
        .vocabulary
        .canonical(OptionKind::District, &ctx.property.district);

    if wanted == actual {
        MatchResult::scored(1.0, format!("district '{}' matches", ctx.property.district))
    } else if actual.contains(&wanted) || wanted.contains(&actual) {
        MatchResult::scored(
            DISTRICT_CONTAINS_CREDIT,
            format!(
                "district '{}' partially matches '{}'",
                ctx.property.district, ctx.client.preferred_district
            ),
        )
    } else {
        MatchResult::scored(
            0.0,
            format!(
                "district '{}' differs from '{}'",
                ctx.property.district, ctx.client.preferred_district
            ),
        )
    }
}

fn match_property_type(ctx: &MatchContext<'_>) -> MatchResult {
    if is_blank(&ctx.client.desired_property_type) {
        return MatchResult::not_applicable();
    }
    if is_blank(&ctx.property.property_type) {
        return MatchResult::missing("listing has no property type");
    }

    let wanted = ctx
        .vocabulary
        .canonical(OptionKind::PropertyType, &ctx.client.desired_property_type);
    let actual = ctx
        .vocabulary
        .canonical(OptionKind::PropertyType, &ctx.property.property_type);

    if wanted == actual {
        MatchResult::scored(1.0, format!("type '{}' matches", ctx.property.property_type))
    } else {
        MatchResult::scored(
            0.0,
            format!(
                "type '{}' differs from '{}'",
                ctx.property.property_type, ctx.client.desired_property_type
            ),
        )
    }
}

fn match_rooms(ctx: &MatchContext<'_>) -> MatchResult {
    let Some(desired) = ctx.client.desired_rooms_count else {
        return MatchResult::not_applicable();
    };
    let Some(actual) = ctx.property.rooms_count else {
        return MatchResult::missing("listing has no room count");
    };

    MatchResult::scored(
        range_credit(f64::from(actual), f64::from(desired), ROOMS_TOLERANCE),
        format!("{actual} room(s), desired {desired}"),
    )
}

fn match_area(ctx: &MatchContext<'_>) -> MatchResult {
    let desired = match ctx.client.desired_area {
        Some(area) if area > 0.0 => area,
        _ => return MatchResult::not_applicable(),
    };
    let Some(actual) = ctx.property.area else {
        return MatchResult::missing("listing has no area");
    };

    MatchResult::scored(
        range_credit(actual, desired, desired * AREA_TOLERANCE_RATIO),
        format!("{actual:.1} m², desired {desired:.1} m²"),
    )
}

fn price_within_budget(price: Option<f64>, bounds: BudgetBounds, unit: &str) -> MatchResult {
    if bounds.is_unset() {
        return MatchResult::not_applicable();
    }
    let Some(price) = price else {
        return MatchResult::missing(format!("listing has no {unit} price"));
    };

    if let Some(max) = bounds.max {
        if price > f64::from(max) {
            return MatchResult::disqualified(format!(
                "{unit} price {price:.0} exceeds maximum budget {max}"
            ));
        }
    }

    if let Some(min) = bounds.min {
        if price < f64::from(min) {
            let min = f64::from(min);
            return MatchResult::scored(
                range_credit(price, min, min * BUDGET_TOLERANCE_RATIO),
                format!("{unit} price {price:.0} below minimum budget {min:.0}"),
            );
        }
    }

    MatchResult::scored(1.0, format!("{unit} price {price:.0} within budget"))
}

fn match_long_term_budget(ctx: &MatchContext<'_>) -> MatchResult {
    let bounds = BudgetBounds {
        min: ctx.client.long_term.budget_min,
        max: ctx.client.long_term.budget_max,
    };
    let price = ctx.property.monthly_rent.map(f64::from);
    price_within_budget(price, bounds, "monthly")
}

fn match_short_term_budget(ctx: &MatchContext<'_>) -> MatchResult {
    let preferences = &ctx.client.short_term;
    let bounds = BudgetBounds {
        min: preferences.budget_min,
        max: preferences.budget_max,
    };
    let price = match (preferences.check_in, preferences.check_out) {
        (Some(check_in), Some(check_out)) if check_out > check_in => ctx
            .property
            .nightly_price_for_stay(check_in, check_out),
        _ => ctx.property.daily_price.map(f64::from),
    };
    price_within_budget(price, bounds, "nightly")
}

fn match_move_in_date(ctx: &MatchContext<'_>) -> MatchResult {
    let Some(move_in) = ctx.client.long_term.move_in_date else {
        return MatchResult::not_applicable();
    };
    let Some(available_from) = ctx.property.available_from else {
        return MatchResult::scored(1.0, "no availability restriction");
    };

    if available_from <= move_in {
        return MatchResult::scored(1.0, format!("available from {available_from}"));
    }

    let days_late = (available_from - move_in).num_days() as f64;
    MatchResult::scored(
        range_credit(days_late, 0.0, MOVE_IN_TOLERANCE_DAYS),
        format!("available {days_late:.0} day(s) after desired move-in {move_in}"),
    )
}

fn match_stay_dates(ctx: &MatchContext<'_>) -> MatchResult {
    let Some(check_in) = ctx.client.short_term.check_in else {
        return MatchResult::not_applicable();
    };
    let Some(available_from) = ctx.property.available_from else {
        return MatchResult::scored(1.0, "no availability restriction");
    };

    if available_from <= check_in {
        return MatchResult::scored(1.0, format!("available for check-in {check_in}"));
    }

    let days_late = (available_from - check_in).num_days() as f64;
    MatchResult::scored(
        range_credit(days_late, 0.0, STAY_TOLERANCE_DAYS),
        format!("available {days_late:.0} day(s) after check-in {check_in}"),
    )
}

fn match_guests(ctx: &MatchContext<'_>) -> MatchResult {
    let Some(guests) = ctx.client.short_term.guests_count else {
        return MatchResult::not_applicable();
    };
    let Some(capacity) = ctx.property.max_guests else {
        return MatchResult::missing("listing has no guest capacity");
    };

    if guests <= capacity {
        MatchResult::scored(1.0, format!("{guests} guest(s) within capacity {capacity}"))
    } else {
        MatchResult::disqualified(format!("{guests} guest(s) exceed capacity {capacity}"))
    }
}

fn set_overlap(
    ctx: &MatchContext<'_>,
    kind: OptionKind,
    wanted: &BTreeSet<String>,
    offered: &BTreeSet<String>,
) -> MatchResult {
    let wanted = ctx.vocabulary.canonical_set(kind, wanted);
    if wanted.is_empty() {
        return MatchResult::not_applicable();
    }
    let offered = ctx.vocabulary.canonical_set(kind, offered);
    let shared = wanted.intersection(&offered).count();

    MatchResult::scored(
        shared as f64 / wanted.len() as f64,
        format!("{shared} of {} preferred", wanted.len()),
    )
}

fn match_pets(ctx: &MatchContext<'_>) -> MatchResult {
    if !ctx.client.has_pets {
        return MatchResult::not_applicable();
    }

    match ctx.property.pets_allowed {
        None => MatchResult::missing("listing has no pet policy"),
        Some(false) => MatchResult::disqualified("pets are not allowed"),
        Some(true) => {
            let pets = ctx
                .vocabulary
                .canonical_set(OptionKind::PetType, &ctx.client.pet_types);
            let allowed = ctx
                .vocabulary
                .canonical_set(OptionKind::PetType, &ctx.property.allowed_pet_types);
            if pets.is_empty() || allowed.is_empty() {
                return MatchResult::scored(1.0, "pets allowed");
            }

            let accepted = pets.intersection(&allowed).count();
            if accepted == 0 {
                MatchResult::disqualified("none of the client's pets are allowed")
            } else {
                MatchResult::scored(
                    accepted as f64 / pets.len() as f64,
                    format!("{accepted} of {} pet type(s) allowed", pets.len()),
                )
            }
        }
    }
}

fn match_children(ctx: &MatchContext<'_>) -> MatchResult {
    if !ctx.client.with_children {
        return MatchResult::not_applicable();
    }

    match ctx.property.children_allowed {
        None => MatchResult::missing("listing has no children policy"),
        Some(false) => MatchResult::disqualified("children are not allowed"),
        Some(true) => MatchResult::scored(1.0, "children allowed"),
    }
}

fn preference_equality(
    ctx: &MatchContext<'_>,
    kind: OptionKind,
    wanted: Option<&str>,
    actual: Option<&str>,
) -> MatchResult {
    let wanted = match wanted {
        Some(value) if !is_blank(value) => value,
        _ => return MatchResult::not_applicable(),
    };
    let actual = match actual {
        Some(value) if !is_blank(value) => value,
        _ => return MatchResult::missing("listing does not specify"),
    };

    if ctx.vocabulary.canonical(kind, wanted) == ctx.vocabulary.canonical(kind, actual) {
        MatchResult::scored(1.0, format!("'{actual}' matches"))
    } else {
        MatchResult::scored(0.0, format!("'{actual}' differs from '{wanted}'"))
    }
}

fn match_official_agreement(ctx: &MatchContext<'_>) -> MatchResult {
    if !ctx.client.long_term.needs_official_agreement {
        return MatchResult::not_applicable();
    }

    match ctx.property.official_agreement {
        None => MatchResult::missing("listing does not state agreement terms"),
        Some(true) => MatchResult::scored(1.0, "official agreement offered"),
        Some(false) => MatchResult::scored(0.0, "no official agreement"),
    }
}

fn match_tax_option(ctx: &MatchContext<'_>) -> MatchResult {
    let wanted = match ctx.client.long_term.tax_option.as_deref() {
        Some(value) if !is_blank(value) => value,
        _ => return MatchResult::not_applicable(),
    };
    let offered = ctx
        .vocabulary
        .canonical_set(OptionKind::TaxOption, &ctx.property.tax_options);
    if offered.is_empty() {
        return MatchResult::missing("listing has no tax options");
    }

    if offered.contains(&ctx.vocabulary.canonical(OptionKind::TaxOption, wanted)) {
        MatchResult::scored(1.0, format!("tax option '{wanted}' offered"))
    } else {
        MatchResult::scored(0.0, format!("tax option '{wanted}' not offered"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_credit_is_linear_inside_tolerance() {
        assert_eq!(range_credit(2.0, 2.0, 2.0), 1.0);
        assert_eq!(range_credit(3.0, 2.0, 2.0), 0.5);
        assert_eq!(range_credit(1.0, 2.0, 2.0), 0.5);
        assert_eq!(range_credit(5.0, 2.0, 2.0), 0.0);
    }

    #[test]
    fn range_credit_with_zero_width_is_exact_match() {
        assert_eq!(range_credit(3.0, 3.0, 0.0), 1.0);
        assert_eq!(range_credit(3.5, 3.0, 0.0), 0.0);
        assert_eq!(range_credit(3.5, 3.0, f64::NAN), 0.0);
    }

    #[test]
    fn scored_results_are_clamped() {
        assert_eq!(MatchResult::scored(1.7, "").partial_score, 1.0);
        assert_eq!(MatchResult::scored(-0.2, "").partial_score, 0.0);
        assert_eq!(MatchResult::scored(f64::INFINITY, "").partial_score, 0.0);
    }

    #[test]
    fn budget_without_bounds_is_not_applicable() {
        let bounds = BudgetBounds { min: None, max: None };
        assert!(!price_within_budget(Some(10.0), bounds, "monthly").applicable);
    }

    #[test]
    fn budget_over_maximum_is_disqualifying() {
        let bounds = BudgetBounds {
            min: None,
            max: Some(50_000),
        };
        let result = price_within_budget(Some(50_001.0), bounds, "monthly");
        assert!(result.hard_fail);
        assert_eq!(result.partial_score, 0.0);

        let at_limit = price_within_budget(Some(50_000.0), bounds, "monthly");
        assert!(!at_limit.hard_fail);
        assert_eq!(at_limit.partial_score, 1.0);
    }

    #[test]
    fn budget_below_minimum_earns_partial_credit() {
        let bounds = BudgetBounds {
            min: Some(40_000),
            max: Some(60_000),
        };
        let result = price_within_budget(Some(35_000.0), bounds, "monthly");
        assert!(!result.hard_fail);
        assert!((result.partial_score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn budget_with_unknown_price_gets_missing_credit() {
        let bounds = BudgetBounds {
            min: None,
            max: Some(1_000),
        };
        let result = price_within_budget(None, bounds, "nightly");
        assert!(result.applicable);
        assert!(!result.hard_fail);
        assert_eq!(result.partial_score, MISSING_ATTRIBUTE_CREDIT);
    }
}
