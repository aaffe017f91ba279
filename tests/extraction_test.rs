//! Extraction precedence and tolerance on whole pages

use product_schema_validator::markup::{MarkupFormat, extract, extract_detailed};
use product_schema_validator::validation::validate_candidate;
use serde_json::json;

mod common;
use common::{WIDGET_JSON, html_page, json_ld, widget_page};

const MICRODATA_GADGET: &str = r#"
<div itemscope itemtype="https://schema.org/Product">
  <span itemprop="name">Gadget</span>
  <img itemprop="image" src="https://shop.example/gadget.jpg">
</div>"#;

const RDFA_LAMP: &str = r#"
<div vocab="https://schema.org/" typeof="Product">
  <span property="name">Lamp</span>
  <span property="schema:sku">LMP-7</span>
</div>"#;

#[test]
fn json_ld_wins_over_microdata() {
    let page = html_page(&json_ld(WIDGET_JSON), MICRODATA_GADGET);
    let extraction = extract_detailed(&page, None).expect("product expected");
    assert_eq!(extraction.format, MarkupFormat::JsonLd);
    assert_eq!(extraction.candidate.get("name"), Some(&json!("Widget")));
}

#[test]
fn microdata_wins_over_rdfa() {
    let page = html_page("", &format!("{RDFA_LAMP}{MICRODATA_GADGET}"));
    let extraction = extract_detailed(&page, None).expect("product expected");
    assert_eq!(extraction.format, MarkupFormat::Microdata);
    assert_eq!(extraction.candidate.get("name"), Some(&json!("Gadget")));
}

#[test]
fn rdfa_is_the_last_resort() {
    let page = html_page("", RDFA_LAMP);
    let extraction = extract_detailed(&page, None).expect("product expected");
    assert_eq!(extraction.format, MarkupFormat::Rdfa);
    assert_eq!(extraction.candidate.get("sku"), Some(&json!("LMP-7")));
    assert_eq!(extraction.candidate.get("@type"), Some(&json!("Product")));
}

#[test]
fn malformed_block_before_valid_product_is_skipped() {
    let head = format!(
        "{}{}",
        json_ld(r#"{"@type": "Product", "name": "Broken",,}"#),
        json_ld(WIDGET_JSON)
    );
    let candidate = extract(&html_page(&head, "")).expect("valid block should be used");
    assert_eq!(candidate.get("name"), Some(&json!("Widget")));
}

#[test]
fn non_product_json_ld_falls_through_to_microdata() {
    let head = json_ld(r#"{"@context":"https://schema.org","@type":"Organization","name":"Shop"}"#);
    let extraction = extract_detailed(&html_page(&head, MICRODATA_GADGET), None).unwrap();
    assert_eq!(extraction.format, MarkupFormat::Microdata);
}

#[test]
fn first_product_of_many_is_used() {
    let head = json_ld(
        r#"[{"@type":"BreadcrumbList"},{"@type":"Product","name":"First"},{"@type":"Product","name":"Second"}]"#,
    );
    let extraction = extract_detailed(&html_page(&head, ""), None).unwrap();
    assert_eq!(extraction.candidate.get("name"), Some(&json!("First")));
    assert_eq!(extraction.products_seen, 2);
}

#[test]
fn graph_and_type_arrays_are_understood() {
    let head = json_ld(
        r#"{"@context":"https://schema.org","@graph":[
            {"@type":"WebPage","name":"Page"},
            {"@type":["Product","IndividualProduct"],"name":"Graph Product"}
        ]}"#,
    );
    let candidate = extract(&html_page(&head, "")).unwrap();
    assert_eq!(candidate.get("name"), Some(&json!("Graph Product")));
}

#[test]
fn script_type_is_matched_loosely() {
    let head = format!(
        r#"<script type=" Application/LD+JSON; charset=utf-8 ">{WIDGET_JSON}</script>"#
    );
    assert!(extract(&html_page(&head, "")).is_some());
}

#[test]
fn plain_page_has_no_candidate() {
    let page = html_page(r#"<script>var x = {"@type": "Product"};</script>"#, "<p>Hello</p>");
    assert!(extract(&page).is_none());
    assert!(extract("").is_none());
}

const MICRODATA_SHOE: &str = r#"
<div itemscope itemtype="https://schema.org/Product">
  <h1 itemprop="name">Trail Shoe</h1>
  <img itemprop="image" src="/img/shoe.jpg">
  <a itemprop="url" href="shoe?colour=red">Trail Shoe</a>
  <div itemprop="offers" itemscope itemtype="https://schema.org/Offer">
    <meta itemprop="price" content="89.00">
    <meta itemprop="priceCurrency" content="USD">
    <meta itemprop="availability" content="InStock">
  </div>
</div>"#;

#[test]
fn relative_links_resolve_against_the_page_url() {
    let page = html_page("", MICRODATA_SHOE);
    let extraction =
        extract_detailed(&page, Some("https://shop.example/catalog/trail")).unwrap();
    let candidate = &extraction.candidate;
    assert_eq!(
        candidate.get("image"),
        Some(&json!("https://shop.example/img/shoe.jpg"))
    );
    assert_eq!(
        candidate.get("url"),
        Some(&json!("https://shop.example/catalog/shoe?colour=red"))
    );
    // Non-link values are untouched
    assert_eq!(candidate.get("offers").unwrap()["price"], json!("89.00"));

    let verdict = validate_candidate(candidate);
    assert!(verdict.valid, "unexpected errors: {:?}", verdict.error_messages());
}

#[test]
fn base_element_overrides_the_page_url() {
    let page = html_page(r#"<base href="https://cdn.example/assets/">"#, MICRODATA_SHOE);
    let from_page = extract_detailed(&page, Some("https://shop.example/p/1")).unwrap();
    assert_eq!(
        from_page.candidate.get("image"),
        Some(&json!("https://cdn.example/img/shoe.jpg"))
    );

    // An absolute base is enough on its own
    let standalone = extract(&page).unwrap();
    assert_eq!(
        standalone.get("image"),
        Some(&json!("https://cdn.example/img/shoe.jpg"))
    );
}

#[test]
fn links_stay_as_written_without_a_base() {
    let candidate = extract(&html_page("", MICRODATA_SHOE)).unwrap();
    assert_eq!(candidate.get("image"), Some(&json!("/img/shoe.jpg")));
}

#[test]
fn rdfa_links_resolve_too() {
    let body = r#"<div vocab="https://schema.org/" typeof="Product">
        <span property="name">Lamp</span>
        <img property="image" src="lamp.png">
    </div>"#;
    let extraction =
        extract_detailed(&html_page("", body), Some("https://shop.example/lights/")).unwrap();
    assert_eq!(
        extraction.candidate.get("image"),
        Some(&json!("https://shop.example/lights/lamp.png"))
    );
}

#[test]
fn commented_out_json_ld_is_still_read() {
    let head = format!(
        "<script type=\"application/ld+json\">\n<!--\n{WIDGET_JSON}\n-->\n</script>"
    );
    let candidate = extract(&html_page(&head, "")).expect("commented block should be read");
    assert_eq!(candidate.get("name"), Some(&json!("Widget")));

    let head = format!(
        "<script type=\"application/ld+json\">//<![CDATA[\n{WIDGET_JSON}\n//]]></script>"
    );
    assert!(extract(&html_page(&head, "")).is_some());
}

#[test]
fn widget_fixture_round_trips_through_extraction() {
    let candidate = extract(&widget_page()).unwrap();
    let expected: serde_json::Value = serde_json::from_str(WIDGET_JSON).unwrap();
    assert_eq!(candidate.into_value(), expected);
}
