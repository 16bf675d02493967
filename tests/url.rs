use pretty_assertions::assert_eq;

use trusted_templates::{http_url, values, ErrorKind, Format, Param, Url};

mod common;
use crate::common::strict_engine;

#[test]
fn url_with_path_parameter() {
    let mut url = Url::new("/path/:id/");
    url.param_set("id", 42);
    assert_eq!(url.get().unwrap().as_str(), "/path/42/");
}

#[test]
fn url_with_path_and_query_parameters() {
    let url = Url::new("/path/:id/");
    let rendered = url.get_with(vec![("id", Param::from(42)), ("sort", Param::from("name"))]).unwrap();
    assert_eq!(rendered.as_str(), "/path/42/?sort=name");
}

#[test]
fn path_values_are_not_repeated_in_the_query() {
    let mut url = Url::new("/user/:id/posts/");
    url.params_set(vec![("id", "7"), ("page", "2")]);
    assert_eq!(url.get().unwrap().as_str(), "/user/7/posts/?page=2");
}

#[test]
fn javascript_urls_are_refused() {
    for source in &["javascript:alert(1)", "  javascript:alert(1)", "java\tscript:alert(1)", "JAVASCRIPT:alert(1)"] {
        println!("{:?}", source);
        let mut url = Url::new(source);
        assert!(matches!(url.get().unwrap_err().kind, ErrorKind::InvalidScheme(_)));
        assert!(url.schemes_allowed_set(vec!["javascript"]).is_err());
        assert!(url.get().is_err());
    }
}

#[test]
fn composed_urls_go_in_url_slots() {
    let engine = strict_engine();
    let mut url = http_url("https://example.com/search/");
    url.param_set("q", "rust & \"templates\"");
    let html = engine.html(r#"<a href="?">?</a>"#, &values![url.get().unwrap(), "Search"]).unwrap();
    assert_eq!(
        html.as_str(),
        r#"<a href="https://example.com/search/?q=rust%20%26%20%22templates%22">Search</a>"#
    );

    // the same url as a plain string is refused
    let err = engine.html(r#"<a href="?">?</a>"#, &values!["https://example.com/", "Search"]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ValueKindMismatch { slot: 0, .. }));
}

#[test]
fn relative_urls() {
    let mut url = Url::new("/docs/guide/intro/");
    url.current_path_set("/docs/api/").format_set(Format::Relative);
    assert_eq!(url.get().unwrap().as_str(), "../guide/intro/");
}

#[test]
fn mailto_urls() {
    let url = Url::new("mailto:team@example.com");
    assert_eq!(url.get().unwrap().as_str(), "mailto:team%40example.com");
}

#[test]
fn urls_from_the_current_request() {
    let mut url = Url::current("/list/?page=3&filter=open");
    url.param_set("page", 4);
    assert_eq!(url.get().unwrap().as_str(), "/list/?page=4&filter=open");
    url.param_set("filter", Param::Null);
    assert_eq!(url.get().unwrap().as_str(), "/list/?page=4");
}

#[test]
fn list_parameters() {
    let mut url = Url::new("/");
    url.param_set("id", vec![1, 2, 3]);
    assert_eq!(url.get().unwrap().as_str(), "/?id[]=1&id[]=2&id[]=3");
}
