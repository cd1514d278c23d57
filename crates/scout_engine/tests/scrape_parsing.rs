use pretty_assertions::assert_eq;
use scout_engine::{build_search_url, parse_detail_lines, parse_rating_label, search_hosts};

#[test]
fn default_host_comes_first_then_suggested_extensions() {
    let hosts = search_hosts(&["es".to_string(), ".de".to_string(), " ".to_string()]);
    assert_eq!(
        hosts,
        vec![
            "www.google.com".to_string(),
            "www.google.es".to_string(),
            "www.google.de".to_string(),
        ]
    );
}

#[test]
fn duplicate_extensions_are_collapsed() {
    let hosts = search_hosts(&["com".to_string(), "es".to_string(), "es".to_string()]);
    assert_eq!(
        hosts,
        vec!["www.google.com".to_string(), "www.google.es".to_string()]
    );
}

#[test]
fn search_url_encodes_the_query_into_the_path() {
    let url = build_search_url("www.google.com", "coffee & cake near me").expect("url");
    assert_eq!(url.host_str(), Some("www.google.com"));
    assert!(url.path().starts_with("/maps/search/"));
    assert!(url.path().contains("coffee%20&%20cake%20near%20me"));
    assert_eq!(url.query(), Some("hl=en"));
}

#[test]
fn rating_label_yields_rating_and_review_count() {
    let (rating, reviews) = parse_rating_label("4.6 stars 1,234 Reviews");
    assert_eq!(rating.as_deref(), Some("4.6"));
    assert_eq!(reviews.as_deref(), Some("1,234"));
}

#[test]
fn rating_label_without_reviews_keeps_only_the_rating() {
    let (rating, reviews) = parse_rating_label("5.0 stars");
    assert_eq!(rating.as_deref(), Some("5.0"));
    assert_eq!(reviews, None);
}

#[test]
fn garbage_rating_label_yields_nothing() {
    let (rating, reviews) = parse_rating_label("No reviews yet");
    assert_eq!(rating, None);
    assert_eq!(reviews, None);
}

#[test]
fn detail_lines_split_into_category_address_and_phone() {
    let lines = vec![
        "Cafe · Main St 4".to_string(),
        "Open ⋅ Closes 18:00 · +358 40 1234567".to_string(),
    ];
    let fields = parse_detail_lines(&lines);
    assert_eq!(fields.category.as_deref(), Some("Cafe"));
    assert_eq!(fields.address.as_deref(), Some("Main St 4"));
    assert_eq!(fields.phone.as_deref(), Some("+358 40 1234567"));
}

#[test]
fn missing_details_stay_unset() {
    let fields = parse_detail_lines(&[]);
    assert_eq!(fields, Default::default());
}

#[test]
fn opening_hours_are_not_mistaken_for_an_address() {
    let lines = vec!["Open 24 hours".to_string(), "Bar · Harbour Rd 12".to_string()];
    let fields = parse_detail_lines(&lines);
    assert_eq!(fields.address.as_deref(), Some("Harbour Rd 12"));
    assert_eq!(fields.category.as_deref(), Some("Bar"));
}
