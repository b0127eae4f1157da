//! Agency option lists (property types, districts, amenities, ...) used to compare free-form
//! labels entered by agents.
//!
//! The vocabulary is a plain value handed to the scoring engine. Editing the lists means building
//! a new vocabulary, never mutating one that is in use.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Dimension a label belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    PropertyType,
    District,
    Amenity,
    View,
    NearbyObject,
    PetType,
    Parking,
    Bathroom,
    Heating,
    TaxOption,
}

/// Known labels for one dimension plus alternate spellings mapped onto them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionList {
    pub values: Vec<String>,
    pub aliases: BTreeMap<String, String>,
}

impl OptionList {
    fn new(values: &[&str], aliases: &[(&str, &str)]) -> Self {
        Self {
            values: values.iter().map(|value| value.to_string()).collect(),
            aliases: aliases
                .iter()
                .map(|(alias, target)| (alias.to_string(), target.to_string()))
                .collect(),
        }
    }

    fn resolve(&self, normalized: &str) -> Option<String> {
        self.aliases
            .iter()
            .find(|(alias, _)| normalize_label(alias) == normalized)
            .map(|(_, target)| normalize_label(target))
    }

    fn contains(&self, normalized: &str) -> bool {
        self.values
            .iter()
            .any(|value| normalize_label(value) == normalized)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("failed to read vocabulary file {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid vocabulary file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Option lists for every matchable dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchVocabulary {
    pub property_types: OptionList,
    pub districts: OptionList,
    pub amenities: OptionList,
    pub views: OptionList,
    pub nearby_objects: OptionList,
    pub pet_types: OptionList,
    pub parking: OptionList,
    pub bathroom: OptionList,
    pub heating: OptionList,
    pub tax_options: OptionList,
}

impl Default for MatchVocabulary {
    fn default() -> Self {
        Self::standard()
    }
}

impl MatchVocabulary {
    /// Lists without any values or aliases; labels are only normalized.
    pub fn empty() -> Self {
        Self {
            property_types: OptionList::default(),
            districts: OptionList::default(),
            amenities: OptionList::default(),
            views: OptionList::default(),
            nearby_objects: OptionList::default(),
            pet_types: OptionList::default(),
            parking: OptionList::default(),
            bathroom: OptionList::default(),
            heating: OptionList::default(),
            tax_options: OptionList::default(),
        }
    }

    /// The agency's stock option lists.
    pub fn standard() -> Self {
        Self {
            property_types: OptionList::new(
                &["Квартира", "Дом", "Комната", "Студия", "Апартаменты", "Коттедж", "Таунхаус"],
                &[
                    ("apartment", "Квартира"),
                    ("flat", "Квартира"),
                    ("house", "Дом"),
                    ("room", "Комната"),
                    ("studio", "Студия"),
                    ("cottage", "Коттедж"),
                    ("townhouse", "Таунхаус"),
                ],
            ),
            districts: OptionList::new(
                &[
                    "Центральный",
                    "Кировский",
                    "Ленинский",
                    "Советский",
                    "Октябрьский",
                    "Железнодорожный",
                ],
                &[("центр", "Центральный"), ("city center", "Центральный")],
            ),
            amenities: OptionList::new(
                &[
                    "Wi-Fi",
                    "Кондиционер",
                    "Стиральная машина",
                    "Посудомоечная машина",
                    "Холодильник",
                    "Телевизор",
                    "Балкон",
                    "Лифт",
                    "Мебель",
                ],
                &[
                    ("wifi", "Wi-Fi"),
                    ("wi fi", "Wi-Fi"),
                    ("интернет", "Wi-Fi"),
                    ("air conditioning", "Кондиционер"),
                    ("washing machine", "Стиральная машина"),
                    ("dishwasher", "Посудомоечная машина"),
                ],
            ),
            views: OptionList::new(
                &["На море", "На горы", "На город", "Во двор", "На парк"],
                &[("sea", "На море"), ("mountains", "На горы"), ("city", "На город")],
            ),
            nearby_objects: OptionList::new(
                &["Школа", "Детский сад", "Метро", "Парк", "Магазин", "Больница"],
                &[("school", "Школа"), ("metro", "Метро"), ("subway", "Метро")],
            ),
            pet_types: OptionList::new(
                &["Кошка", "Собака", "Птица", "Грызун"],
                &[("cat", "Кошка"), ("dog", "Собака"), ("bird", "Птица")],
            ),
            parking: OptionList::new(
                &["Нет", "Во дворе", "Подземная", "Гараж"],
                &[("underground", "Подземная"), ("garage", "Гараж")],
            ),
            bathroom: OptionList::new(
                &["Совмещённый", "Раздельный", "Несколько"],
                &[("combined", "Совмещённый"), ("separate", "Раздельный")],
            ),
            heating: OptionList::new(
                &["Центральное", "Индивидуальное", "Газовое", "Электрическое"],
                &[("central", "Центральное"), ("gas", "Газовое")],
            ),
            tax_options: OptionList::new(
                &["Самозанятый", "ИП", "Физлицо"],
                &[("self-employed", "Самозанятый")],
            ),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| VocabularyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| VocabularyError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn list(&self, kind: OptionKind) -> &OptionList {
        match kind {
            OptionKind::PropertyType => &self.property_types,
            OptionKind::District => &self.districts,
            OptionKind::Amenity => &self.amenities,
            OptionKind::View => &self.views,
            OptionKind::NearbyObject => &self.nearby_objects,
            OptionKind::PetType => &self.pet_types,
            OptionKind::Parking => &self.parking,
            OptionKind::Bathroom => &self.bathroom,
            OptionKind::Heating => &self.heating,
            OptionKind::TaxOption => &self.tax_options,
        }
    }

    /// Normalized form of `raw`, with aliases resolved to their target label.
    pub fn canonical(&self, kind: OptionKind, raw: &str) -> String {
        let normalized = normalize_label(raw);
        self.list(kind).resolve(&normalized).unwrap_or(normalized)
    }

    pub fn canonical_set<'a, I>(&self, kind: OptionKind, labels: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a String>,
    {
        labels
            .into_iter()
            .map(|label| self.canonical(kind, label))
            .filter(|label| !label.is_empty())
            .collect()
    }

    pub fn is_known(&self, kind: OptionKind, raw: &str) -> bool {
        let canonical = self.canonical(kind, raw);
        self.list(kind).contains(&canonical)
    }
}

/// Trim, collapse inner whitespace and case-fold a label. `ё` folds to `е`.
pub fn normalize_label(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .replace('ё', "е")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize_label("  Центральный   Район "), "центральный район");
        assert_eq!(normalize_label("Совмещённый"), "совмещенный");
        assert_eq!(normalize_label("   "), "");
    }

    #[test]
    fn canonical_resolves_aliases() {
        let vocabulary = MatchVocabulary::standard();
        assert_eq!(
            vocabulary.canonical(OptionKind::PropertyType, "Apartment"),
            "квартира"
        );
        assert_eq!(
            vocabulary.canonical(OptionKind::PropertyType, "квартира"),
            "квартира"
        );
        assert_eq!(vocabulary.canonical(OptionKind::Amenity, "WiFi"), "wi-fi");
    }

    #[test]
    fn unknown_labels_are_normalized_but_not_known() {
        let vocabulary = MatchVocabulary::standard();
        assert_eq!(
            vocabulary.canonical(OptionKind::District, "Заречный "),
            "заречный"
        );
        assert!(!vocabulary.is_known(OptionKind::District, "Заречный"));
        assert!(vocabulary.is_known(OptionKind::District, "центр"));
    }

    #[test]
    fn empty_vocabulary_only_normalizes() {
        let vocabulary = MatchVocabulary::empty();
        assert_eq!(
            vocabulary.canonical(OptionKind::PropertyType, "Apartment"),
            "apartment"
        );
    }

    #[test]
    fn partial_json_falls_back_to_standard_lists() {
        let raw = r#"{ "districts": { "values": ["Приморский"], "aliases": { "seaside": "Приморский" } } }"#;
        let vocabulary: MatchVocabulary = serde_json::from_str(raw).expect("vocabulary parses");
        assert_eq!(
            vocabulary.canonical(OptionKind::District, "Seaside"),
            "приморский"
        );
        assert!(!vocabulary.is_known(OptionKind::District, "Центральный"));
        assert_eq!(
            vocabulary.property_types,
            MatchVocabulary::standard().property_types
        );
    }

    #[test]
    fn canonical_set_drops_blank_labels() {
        let vocabulary = MatchVocabulary::standard();
        let labels: BTreeSet<String> = ["wifi", " ", "Балкон"]
            .iter()
            .map(|label| label.to_string())
            .collect();
        let canonical = vocabulary.canonical_set(OptionKind::Amenity, &labels);
        assert_eq!(canonical.len(), 2);
        assert!(canonical.contains("wi-fi"));
        assert!(canonical.contains("балкон"));
    }
}
