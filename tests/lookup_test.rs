//! End-to-end tests for the spreadsheet-style lookup functions.
//!
//! Every test drives the public [`Sheet`] API over a canned transport, so the
//! full path is exercised: reference parsing, URL building, response decoding,
//! table shaping and the collapse of failures into the empty answer.
//!
//! - **Reference Tests** -- malformed references never reach the network
//! - **Link Tests** -- synonyms, inbound, outbound, mutual links, categories
//! - **Translation Tests** -- ordering, filtering, object output, expansion
//! - **Wikidata Tests** -- claim selection under each multi-value mode
//! - **Time Series Tests** -- pageviews and page edits, newest first
//! - **Failure Tests** -- every function answers empty on a dead network
//!
//! # Test Strategy
//!
//! `CannedTransport` maps URL fragments to response bodies and records every
//! URL it was asked for. The first route whose fragment appears in the URL
//! wins; an unrouted URL fails like a 404 would. Recorded URLs let tests check
//! request shape and, just as often, that no request happened at all.
//!
//! # Sample Data
//!
//! - `de:Berlin` with French, Italian and English language links
//! - Redirects `Berlin, Germany` and `Spree-Athen`
//! - A Wikidata entity with a single-valued and a two-valued item claim

use std::cell::RefCell;
use wikilookup::error::{LookupError, LookupResult};
use wikilookup::models::{Answer, Cell, DateArg};
use wikilookup::output::{render, OutputFormat};
use wikilookup::sheet::Sheet;
use wikilookup::transport::Transport;

#[derive(Default)]
struct CannedTransport {
    routes: Vec<(String, String)>,
    log: RefCell<Vec<String>>,
    dead: bool,
}

impl CannedTransport {
    fn new() -> Self {
        Self::default()
    }

    fn dead() -> Self {
        Self {
            dead: true,
            ..Self::default()
        }
    }

    fn route(mut self, fragment: &str, body: &str) -> Self {
        self.routes.push((fragment.to_string(), body.to_string()));
        self
    }

    fn requests(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

impl Transport for CannedTransport {
    fn get(&self, url: &str) -> LookupResult<String> {
        self.log.borrow_mut().push(url.to_string());
        if self.dead {
            return Err(LookupError::Status {
                url: url.to_string(),
                status: 502,
            });
        }
        self.routes
            .iter()
            .find(|(fragment, _)| url.contains(fragment.as_str()))
            .map(|(_, body)| body.clone())
            .ok_or_else(|| LookupError::Status {
                url: url.to_string(),
                status: 404,
            })
    }
}

const LANGLINKS: &str = r#"<?xml version="1.0"?><api batchcomplete=""><query><pages><page _idx="3354" pageid="3354" ns="0" title="Berlin"><langlinks><ll lang="en" xml:space="preserve">Berlin</ll><ll lang="fr" xml:space="preserve">Berlin (ville)</ll><ll lang="it" xml:space="preserve">Berlino</ll></langlinks></page></pages></query></api>"#;

const REDIRECTS: &str = r#"<?xml version="1.0"?><api batchcomplete=""><query><backlinks><bl pageid="1" ns="0" title="Berlin, Germany" redirect="" /><bl pageid="2" ns="0" title="Spree-Athen" redirect="" /></backlinks></query></api>"#;

const INBOUND: &str = r#"<api><query><backlinks><bl title="Brandenburg" /><bl title="Germany" /><bl title="Spree" /></backlinks></query></api>"#;

const OUTBOUND: &str = r#"<api><query><pages><page title="Berlin"><links><pl ns="0" title="Germany" /><pl ns="0" title="Potsdam" /><pl ns="0" title="Spree" /></links></page></pages></query></api>"#;

const CLAIMS: &str = r#"{"entities": {"Q64": {"id": "Q64", "claims": {
    "P17": [{"mainsnak": {"snaktype": "value", "datatype": "wikibase-item",
        "datavalue": {"value": {"numeric-id": 183, "id": "Q183"}, "type": "wikibase-entityid"}}}],
    "P190": [
        {"mainsnak": {"snaktype": "value", "datatype": "wikibase-item",
            "datavalue": {"value": {"numeric-id": 1486, "id": "Q1486"}, "type": "wikibase-entityid"}}},
        {"mainsnak": {"snaktype": "value", "datatype": "wikibase-item",
            "datavalue": {"value": {"numeric-id": 90, "id": "Q90"}, "type": "wikibase-entityid"}}}
    ]
}}}}"#;

const LABELS: &str = r#"{"entities": {
    "P17": {"id": "P17", "labels": {"en": {"language": "en", "value": "country"}}},
    "P190": {"id": "P190", "labels": {"en": {"language": "en", "value": "twinned administrative body"}}},
    "Q183": {"id": "Q183", "labels": {"en": {"language": "en", "value": "Germany"}}},
    "Q1486": {"id": "Q1486", "labels": {"en": {"language": "en", "value": "Buenos Aires"}}},
    "Q90": {"id": "Q90", "labels": {"en": {"language": "en", "value": "Paris"}}}
}}"#;

fn rows(answer: &Answer) -> Vec<Vec<String>> {
    answer
        .as_table()
        .expect("expected a table")
        .rows()
        .iter()
        .map(|row| row.iter().map(Cell::to_string).collect())
        .collect()
}

fn column(answer: &Answer) -> Vec<String> {
    rows(answer).into_iter().map(|mut row| row.remove(0)).collect()
}

// ============================================================================
// Reference Tests
// ============================================================================

#[test]
fn test_malformed_references_make_no_requests() {
    let sheet = Sheet::new(CannedTransport::new().route("", REDIRECTS));
    for input in ["", "Berlin", ":Berlin", "en:", "evil.example/x?:Berlin"] {
        assert_eq!(sheet.synonyms(input), Answer::Empty, "input {:?}", input);
    }
    assert!(sheet.transport().requests().is_empty());
}

#[test]
fn test_title_with_colon_keeps_remainder() {
    let sheet = Sheet::new(CannedTransport::new().route("list=categorymembers", REDIRECTS));
    sheet.category_members("en:Category:Parks in Berlin");
    let url = &sheet.transport().requests()[0];
    assert!(url.starts_with("https://en.wikipedia.org/w/api.php?action=query&format=xml"));
    assert!(url.ends_with("cmtitle=Category%3AParks_in_Berlin"));
}

// ============================================================================
// Link Tests
// ============================================================================

#[test]
fn test_synonyms_column() {
    let sheet = Sheet::new(CannedTransport::new().route("blfilterredir=redirects", REDIRECTS));
    assert_eq!(
        column(&sheet.synonyms("de:Berlin")),
        vec!["Berlin, Germany", "Spree-Athen"]
    );
    assert!(sheet.transport().requests()[0].starts_with("https://de.wikipedia.org/"));
}

#[test]
fn test_mutual_links_keep_inbound_order() {
    let sheet = Sheet::new(
        CannedTransport::new()
            .route("list=backlinks", INBOUND)
            .route("prop=links", OUTBOUND),
    );
    assert_eq!(column(&sheet.mutual_links("en:Berlin")), vec!["Germany", "Spree"]);
}

#[test]
fn test_no_overlap_is_empty() {
    let sheet = Sheet::new(
        CannedTransport::new()
            .route("list=backlinks", r#"<api><query><backlinks><bl title="Hamburg" /></backlinks></query></api>"#)
            .route("prop=links", OUTBOUND),
    );
    assert!(sheet.mutual_links("en:Berlin").is_empty());
}

#[test]
fn test_subcategories_use_category_namespace() {
    let sheet = Sheet::new(CannedTransport::new().route(
        "list=categorymembers",
        r#"<api><query><categorymembers><cm ns="14" title="Category:Parks in Mitte" /></categorymembers></query></api>"#,
    ));
    assert_eq!(
        column(&sheet.subcategories("en:Category:Parks_in_Berlin")),
        vec!["Category:Parks in Mitte"]
    );
    assert!(sheet.transport().requests()[0].contains("cmnamespace=14"));
}

// ============================================================================
// Translation Tests
// ============================================================================

#[test]
fn test_translate_everything_puts_source_last() {
    let sheet = Sheet::new(CannedTransport::new().route("prop=langlinks", LANGLINKS));
    let none: [&str; 0] = [];
    assert_eq!(
        rows(&sheet.translate("de:Berlin", &none, false, false)),
        vec![
            vec!["en", "Berlin"],
            vec!["fr", "Berlin (ville)"],
            vec!["it", "Berlino"],
            vec!["de", "Berlin"],
        ]
    );
}

#[test]
fn test_translate_unknown_target_keeps_seed() {
    let sheet = Sheet::new(CannedTransport::new().route("prop=langlinks", LANGLINKS));
    let answer = sheet.translate("de:Berlin", &["ja", "fr", "ja"], true, false);
    let json = serde_json::to_string(&answer).unwrap();
    assert_eq!(json, r#"{"ja":"Berlin","fr":"Berlin (ville)","de":"Berlin"}"#);
}

#[test]
fn test_expand_as_object() {
    let sheet = Sheet::new(
        CannedTransport::new()
            .route("prop=langlinks", LANGLINKS)
            .route("https://de.wikipedia.org/w/api.php?action=query&format=xml&blnamespace=0", REDIRECTS),
    );
    let answer = sheet.expand("de:Berlin", &["it"], true);
    let object = answer.as_object().expect("expected an object");
    assert_eq!(object["it"], serde_json::json!(["Berlino"]));
    assert_eq!(
        object["de"],
        serde_json::json!(["Berlin", "Berlin, Germany", "Spree-Athen"])
    );
}

// ============================================================================
// Wikidata Tests
// ============================================================================

fn wikidata_sheet() -> Sheet<CannedTransport> {
    Sheet::new(
        CannedTransport::new()
            .route("props=claims", CLAIMS)
            .route("props=labels", LABELS),
    )
}

#[test]
fn test_facts_default_mode_skips_multi_valued() {
    assert_eq!(
        rows(&wikidata_sheet().facts("en:Berlin", None)),
        vec![vec!["country", "Germany"]]
    );
}

#[test]
fn test_facts_first_and_all_modes() {
    let sheet = wikidata_sheet();
    assert_eq!(
        rows(&sheet.facts("en:Berlin", Some("First"))),
        vec![
            vec!["country", "Germany"],
            vec!["twinned administrative body", "Buenos Aires"],
        ]
    );
    assert_eq!(
        rows(&sheet.facts("en:Berlin", Some("ALL"))),
        vec![
            vec!["country", "Germany"],
            vec!["twinned administrative body", "Buenos Aires"],
            vec!["twinned administrative body", "Paris"],
        ]
    );
}

#[test]
fn test_facts_label_request_lists_properties_first() {
    let sheet = wikidata_sheet();
    sheet.facts("en:Berlin", None);
    let requests = sheet.transport().requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[1].ends_with("ids=P17%7CP190%7CQ183%7CQ1486%7CQ90"));
}

// ============================================================================
// Time Series Tests
// ============================================================================

#[test]
fn test_pageviews_newest_first() {
    let sheet = Sheet::new(CannedTransport::new().route(
        "/per-article/",
        r#"{"items": [
            {"timestamp": "2024010100", "views": 10},
            {"timestamp": "2024010200", "views": 20}
        ]}"#,
    ));
    let start = DateArg::parse("2024-01-01");
    let end = DateArg::parse("20240102");
    let answer = sheet.pageviews("en:Berlin", Some(&start), Some(&end));
    assert_eq!(
        rows(&answer),
        vec![
            vec!["2024-01-02T00:00:00Z", "20"],
            vec!["2024-01-01T00:00:00Z", "10"],
        ]
    );
    assert!(sheet.transport().requests()[0].ends_with("/Berlin/daily/20240101/20240102"));
}

#[test]
fn test_pageviews_bad_date_makes_no_request() {
    let sheet = Sheet::new(CannedTransport::new().route("", "{}"));
    let start = DateArg::parse("last tuesday");
    assert!(sheet.pageviews("en:Berlin", Some(&start), None).is_empty());
    assert!(sheet.transport().requests().is_empty());
}

#[test]
fn test_page_edits_deltas() {
    let sheet = Sheet::new(CannedTransport::new().route(
        "prop=revisions",
        r#"<api><query><pages><page title="Berlin"><revisions><rev size="100" timestamp="2024-01-03T12:00:00Z" /><rev size="140" timestamp="2024-01-02T12:00:00Z" /><rev size="130" timestamp="2024-01-01T12:00:00Z" /></revisions></page></pages></query></api>"#,
    ));
    let start = DateArg::parse("2024-01-01");
    let end = DateArg::parse("2024-01-03");
    let answer = sheet.page_edits("de:Berlin", Some(&start), Some(&end));
    assert_eq!(
        rows(&answer),
        vec![
            vec!["2024-01-03T12:00:00Z", "-40"],
            vec!["2024-01-02T12:00:00Z", "10"],
        ]
    );
    let url = &sheet.transport().requests()[0];
    assert!(url.starts_with("https://en.wikipedia.org/"));
    assert!(url.contains("rvstart=2024-01-03T23%3A59%3A59&rvend=2024-01-01T00%3A00%3A00"));
}

// ============================================================================
// Suggest and Output Tests
// ============================================================================

#[test]
fn test_suggest_renders_as_tsv() {
    let sheet = Sheet::new(CannedTransport::new().route(
        "suggestqueries",
        r#"<toplevel><CompleteSuggestion><suggestion data="berlin wall"/></CompleteSuggestion><CompleteSuggestion><suggestion data="berlin marathon"/></CompleteSuggestion></toplevel>"#,
    ));
    let answer = sheet.suggest("berlin", Some("de"));
    let mut out = Vec::new();
    render(&answer, OutputFormat::Tsv, &mut out).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "berlin wall\nberlin marathon\n");
    assert!(sheet.transport().requests()[0].ends_with("output=toolbar&hl=de&q=berlin"));
}

// ============================================================================
// Failure Tests
// ============================================================================

#[test]
fn test_dead_network_answers_empty() {
    let sheet = Sheet::new(CannedTransport::dead());
    let none: [&str; 0] = [];
    let answers = vec![
        sheet.synonyms("en:Berlin"),
        sheet.inbound_links("en:Berlin"),
        sheet.outbound_links("en:Berlin"),
        sheet.mutual_links("en:Berlin"),
        sheet.category_members("en:Category:Berlin"),
        sheet.subcategories("en:Category:Berlin"),
        sheet.translate("en:Berlin", &none, false, false),
        sheet.translate("en:Berlin", &["de"], true, true),
        sheet.expand("en:Berlin", &none, false),
        sheet.geo_coordinates("en:Berlin"),
        sheet.facts("en:Berlin", Some("all")),
        sheet.pageviews("en:Berlin", None, None),
        sheet.page_edits("en:Berlin", None, None),
        sheet.suggest("berlin", None),
    ];
    assert!(answers.iter().all(Answer::is_empty));
}

#[test]
fn test_api_error_element_answers_empty() {
    let sheet = Sheet::new(CannedTransport::new().route(
        "list=backlinks",
        r#"<api><error code="invalidtitle" info="Bad title" /></api>"#,
    ));
    assert!(sheet.inbound_links("en:<>").is_empty());
}

#[test]
fn test_repeated_lookups_are_identical() {
    let sheet = wikidata_sheet();
    assert_eq!(
        sheet.facts("en:Berlin", Some("all")),
        sheet.facts("en:Berlin", Some("all"))
    );
}
