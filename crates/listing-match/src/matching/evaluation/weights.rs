use super::super::domain::RentalType;
use super::matchers::MatcherKind;

/// Matchers consulted for monthly leases.
pub const LONG_TERM_MATCHERS: &[MatcherKind] = &[
    MatcherKind::LongTermBudget,
    MatcherKind::District,
    MatcherKind::PropertyType,
    MatcherKind::Rooms,
    MatcherKind::Area,
    MatcherKind::MoveInDate,
    MatcherKind::Pets,
    MatcherKind::Children,
    MatcherKind::OfficialAgreement,
    MatcherKind::TaxOption,
    MatcherKind::Amenities,
    MatcherKind::Views,
    MatcherKind::NearbyObjects,
    MatcherKind::Parking,
    MatcherKind::Bathroom,
    MatcherKind::Heating,
];

/// Matchers consulted for nightly stays.
pub const SHORT_TERM_MATCHERS: &[MatcherKind] = &[
    MatcherKind::ShortTermBudget,
    MatcherKind::District,
    MatcherKind::PropertyType,
    MatcherKind::Rooms,
    MatcherKind::Area,
    MatcherKind::StayDates,
    MatcherKind::Guests,
    MatcherKind::Pets,
    MatcherKind::Children,
    MatcherKind::Amenities,
    MatcherKind::Views,
    MatcherKind::NearbyObjects,
    MatcherKind::Parking,
    MatcherKind::Bathroom,
    MatcherKind::Heating,
];

pub fn matchers_for(rental_type: RentalType) -> &'static [MatcherKind] {
    match rental_type {
        RentalType::LongTerm => LONG_TERM_MATCHERS,
        RentalType::ShortTerm => SHORT_TERM_MATCHERS,
    }
}

/// Fixed weight of each dimension in the weighted mean.
pub const fn weight(kind: MatcherKind) -> u32 {
    match kind {
        MatcherKind::LongTermBudget | MatcherKind::ShortTermBudget => 5,
        MatcherKind::District => 4,
        MatcherKind::PropertyType | MatcherKind::Rooms | MatcherKind::StayDates => 3,
        MatcherKind::Area
        | MatcherKind::MoveInDate
        | MatcherKind::Guests
        | MatcherKind::Pets
        | MatcherKind::Children
        | MatcherKind::OfficialAgreement => 2,
        MatcherKind::TaxOption
        | MatcherKind::Amenities
        | MatcherKind::Views
        | MatcherKind::NearbyObjects
        | MatcherKind::Parking
        | MatcherKind::Bathroom
        | MatcherKind::Heating => 1,
    }
}
