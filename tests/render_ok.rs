use pretty_assertions::assert_eq;

use trusted_templates::{ht, values, DataUrl, Url, Value};

mod common;
use crate::common::{assert_no_markup_from, strict_engine, HOSTILE};

#[test]
fn render_profile_link() {
    let engine = strict_engine();
    let html = engine.html(r#"<a href="?">?</a>"#, &values!["/example/", "My Profile"]).unwrap();
    assert_eq!(html.as_str(), r#"<a href="/example/">My Profile</a>"#);
}

#[test]
fn render_image_with_integer_sizes() {
    let engine = strict_engine();
    let src = Url::new("/img/red.png").get().unwrap();
    let html = engine
        .html(r#"<img src="?" width="?" height="?" alt="?" />"#, &values![src, 100, 200, "A Red Square"])
        .unwrap();
    assert_eq!(html.as_str(), r#"<img src="/img/red.png" width="100" height="200" alt="A Red Square" />"#);
}

#[test]
fn render_literal_question_mark_text() {
    let html = ht("<p>Why? Because.</p>", &[]).unwrap();
    assert_eq!(html.as_str(), "<p>Why? Because.</p>");
}

#[test]
fn render_full_page_fragment() {
    let engine = strict_engine();
    let template = r#"<div class="card" data-id="?">
  <h2>?</h2>
  <p><a href="?" rel="noopener">?</a></p>
  <p><time datetime="?">?</time></p>
  <table><tr><td colspan="?">?</td></tr></table>
</div>"#;
    let mut link = Url::new("/article/:slug/");
    link.param_set("slug", "hello-world");

    let html = engine
        .html(
            template,
            &values![
                "42",
                "Hello & welcome",
                link.get().unwrap(),
                "Read more",
                "2024-01-01",
                "New year",
                2,
                Value::Null
            ],
        )
        .unwrap();

    assert_eq!(
        html.as_str(),
        r#"<div class="card" data-id="42">
  <h2>Hello &amp; welcome</h2>
  <p><a href="/article/hello-world/" rel="noopener">Read more</a></p>
  <p><time datetime="2024-01-01">New year</time></p>
  <table><tr><td colspan="2"></td></tr></table>
</div>"#
    );
}

#[test]
fn hostile_values_never_add_markup() {
    let engine = strict_engine();
    let templates = vec![
        "<p>?</p>",
        r#"<div title="?">x</div>"#,
        r#"<strong title='?'>x</strong>"#,
        r#"<abbr title="?" aria-label="?">?</abbr>"#,
        r#"<span data-x="?">?</span>"#,
    ];

    for template in templates {
        let slots = engine.compile_html(template).unwrap().slot_count();
        for hostile in HOSTILE {
            let values: Vec<Value> = (0..slots).map(|_| Value::from(*hostile)).collect();
            let html = engine.html(template, &values).unwrap();
            assert_no_markup_from(html.as_str(), template);
        }
    }
}

#[test]
fn render_inline_image() {
    let engine = strict_engine();
    let png = DataUrl::new("image/png", vec![0x89, b'P', b'N', b'G']);
    let html = engine.html(r#"<img src="?" alt="logo" />"#, &values![png]).unwrap();
    assert_eq!(html.as_str(), r#"<img src="data:image/png;base64,iVBORw==" alt="logo" />"#);
}

#[test]
fn compiled_templates_can_be_reused() {
    let engine = strict_engine();
    let template = engine.compile_html("<li>?</li>").unwrap();
    let items: Vec<String> = ["a", "<b>", "c"]
        .iter()
        .map(|item| template.render(&values![*item]).unwrap().into_string())
        .collect();
    assert_eq!(items, vec!["<li>a</li>", "<li>&lt;b&gt;</li>", "<li>c</li>"]);
    assert_eq!(template.text(), "<li>?</li>");
}

#[test]
fn render_plain_text() {
    let engine = strict_engine();
    let out = engine.plain("Hi ?, ? is waiting", &values!["Ann", "<Bob>"]).unwrap();
    assert_eq!(out.as_str(), "Hi Ann, &lt;Bob&gt; is waiting");
}
