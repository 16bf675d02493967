use super::render_template;
use crate::errors::ErrorKind;
use crate::url::Url;
use crate::value::{DataUrl, Value};
use crate::values;

#[test]
fn error_missing_value() {
    let err = render_template(r#"<a href="?">?</a>"#, &values!["/example/"]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ArityMismatch { expected: 2, actual: 1 }));
    assert_eq!(err.to_string(), "Missing parameter 2 (expected 2, got 1)");
}

#[test]
fn error_extra_value() {
    let err = render_template("<p>?</p>", &values!["a", "b"]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ArityMismatch { expected: 1, actual: 2 }));
    let err = render_template("<p>x</p>", &values!["a"]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ArityMismatch { expected: 0, actual: 1 }));
}

#[test]
fn error_integer_as_string() {
    let err = render_template(
        r#"<img src="?" width="?" height="?" alt="?" />"#,
        &values!["/img/a.png", "100", 200, "A Red Square"],
    )
    .unwrap_err();
    match err.kind {
        ErrorKind::ValueKindMismatch { slot, ref kind, .. } => {
            assert_eq!(slot, 1);
            assert_eq!(kind, "an integer");
        }
        ref other => panic!("unexpected {:?}", other),
    }
    assert!(err.to_string().starts_with("Parameter 2 should be an integer"));
}

#[test]
fn error_absolute_urls_as_strings() {
    let inputs = vec![
        "https://evil.example.com/",
        "javascript:alert(1)",
        "//evil.example.com/",
        "/\\evil.example.com/",
        "relative/path",
        "",
    ];

    for input in inputs {
        println!("{:?}", input);
        let err = render_template(r#"<a href="?">x</a>"#, &values![input]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ValueKindMismatch { slot: 0, .. }));
    }
}

#[test]
fn error_non_image_inline_data() {
    let html = DataUrl::new("text/html", b"<script>alert(1)</script>".to_vec());
    let err = render_template(r#"<img src="?" alt="x" />"#, &values![html]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ValueKindMismatch { slot: 0, .. }));

    let png = DataUrl::new("image/png", vec![0]);
    assert!(render_template(r#"<a href="?">x</a>"#, &values![png]).is_err());
}

#[test]
fn error_invalid_tokens() {
    let inputs = vec![
        (r#"<p class="?">x</p>"#, "a\" onclick=\"x"),
        (r#"<p class="?">x</p>"#, "1st"),
        (r#"<p id="?">x</p>"#, "x"),
        (r#"<a href="/" target="?">x</a>"#, "_top"),
        (r#"<a href="/" rel="?">x</a>"#, "noopener opener"),
        (r#"<time datetime="?">x</time>"#, "<script>"),
    ];

    for (template, value) in inputs {
        println!("{:?} with {:?}", template, value);
        let err = render_template(template, &values![value]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ValueKindMismatch { .. }));
    }
}

#[test]
fn error_null_outside_text() {
    assert!(render_template(r#"<ol start="?"><li>x</li></ol>"#, &[Value::Null]).is_err());
    assert!(render_template(r#"<a href="?">x</a>"#, &[Value::Null]).is_err());
}

#[test]
fn error_reported_before_any_output() {
    // the second slot fails, the first one is fine
    let url = Url::new("/ok/").get().unwrap();
    let err = render_template(r#"<a href="?"><span tabindex="?">x</span></a>"#, &values![url, 1.5]).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::ValueKindMismatch { slot: 1, .. }));
}
