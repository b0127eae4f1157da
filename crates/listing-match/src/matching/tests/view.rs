use super::common::*;
use crate::matching::filter::PropertyFilter;
use crate::matching::recommender::Recommender;
use crate::matching::view::RecommendationView;

fn view() -> RecommendationView {
    let ranked = Recommender::default()
        .recommend(&central_client(), &scenario_catalog())
        .expect("client is valid");
    RecommendationView::new(ranked)
}

#[test]
fn new_view_shows_the_full_ranking() {
    let view = view();
    assert_eq!(view.visible(), view.ranked());
    assert_eq!(view.active_filters_count(), 0);
}

#[test]
fn update_and_clear_filter_recompute_visible_list() {
    let mut view = view();

    view.update_filter(PropertyFilter::default().with_district("Кировский"));
    assert_eq!(ids(view.visible()), vec!["p2"]);
    assert_eq!(view.active_filters_count(), 1);
    assert_eq!(ids(view.ranked()), vec!["p1", "p2", "p3"]);

    view.clear_filter();
    assert_eq!(ids(view.visible()), vec!["p1", "p2", "p3"]);
    assert_eq!(view.filter(), &PropertyFilter::default());
}

#[test]
fn replacing_the_ranking_keeps_the_filter() {
    let mut view = view();
    view.update_filter(PropertyFilter::default().with_price(None, Some(50_000)));
    assert_eq!(ids(view.visible()), vec!["p1", "p2"]);

    let mut catalog = scenario_catalog();
    catalog.push(apartment("p4", "Центральный", 30_000, 2));
    let refreshed = Recommender::default()
        .recommend(&central_client(), &catalog)
        .expect("client is valid");
    view.replace_ranked(refreshed);

    assert_eq!(view.ranked().len(), 4);
    assert_eq!(ids(view.visible()), vec!["p1", "p4", "p2"]);
}
