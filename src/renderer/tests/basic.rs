use pretty_assertions::assert_eq;

use super::render_template;
use crate::template::Template;
use crate::url::Url;
use crate::value::{DataUrl, Value};
use crate::values;

#[test]
fn render_simple_string() {
    let result = render_template("<h1>Hello world</h1>", &[]);
    assert_eq!(result.unwrap().as_str(), "<h1>Hello world</h1>");
}

#[test]
fn render_link() {
    let result = render_template(r#"<a href="?">?</a>"#, &values!["/example/", "My Profile"]);
    assert_eq!(result.unwrap().as_str(), r#"<a href="/example/">My Profile</a>"#);
}

#[test]
fn render_image() {
    let mut src = Url::new("/img/:name");
    src.param_set("name", "red square.png");
    let result = render_template(
        r#"<img src="?" width="?" height="?" alt="?" />"#,
        &values![src.get().unwrap(), 100, 200, "A Red Square"],
    );
    assert_eq!(
        result.unwrap().as_str(),
        r#"<img src="/img/red%20square.png" width="100" height="200" alt="A Red Square" />"#
    );
}

#[test]
fn render_literal_question_marks() {
    let inputs = vec![
        "<p>Is this a question?</p>",
        "<p>? at the start</p>",
        "<p>at the end ?</p>",
        r#"<abbr title="really?">x</abbr>"#,
        r#"<abbr title="? ?">x</abbr>"#,
        "<p>a>?</p>",
    ];

    for input in inputs {
        println!("{:?}", input);
        assert_eq!(render_template(input, &[]).unwrap().as_str(), input);
    }
}

#[test]
fn render_encodes_values() {
    let inputs = vec![
        ("<p>?</p>", "<script>alert(1)</script>", "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>"),
        ("<p>?</p>", "Fish & Chips", "<p>Fish &amp; Chips</p>"),
        (r#"<abbr title="?">x</abbr>"#, r#"" onmouseover="alert(1)"#, r#"<abbr title="&quot; onmouseover=&quot;alert(1)">x</abbr>"#),
        (r#"<em title='?'>x</em>"#, "' onmouseover='alert(1)", r#"<em title='&#x27; onmouseover=&#x27;alert(1)'>x</em>"#),
        ("<pre>?</pre>", "a\u{7}b", "<pre>a\u{FFFD}b</pre>"),
    ];

    for (template, value, expected) in inputs {
        println!("{:?} with {:?}", template, value);
        assert_eq!(render_template(template, &values![value]).unwrap().as_str(), expected);
    }
}

#[test]
fn render_composed_urls_are_encoded_too() {
    let mut url = Url::new("/search/");
    url.param_set("q", "a").param_set("page", 2);
    let result = render_template(r#"<a href="?">Next</a>"#, &values![url.get().unwrap()]);
    assert_eq!(result.unwrap().as_str(), r#"<a href="/search/?q=a&amp;page=2">Next</a>"#);
}

#[test]
fn render_null_as_empty_text() {
    let result = render_template("<p>?</p>", &[Value::Null]);
    assert_eq!(result.unwrap().as_str(), "<p></p>");
    let result = render_template("<p>?</p>", &values![None::<&str>]);
    assert_eq!(result.unwrap().as_str(), "<p></p>");
}

#[test]
fn render_inline_images() {
    let gif = DataUrl::new("image/gif", b"GIF89a".to_vec());
    let result = render_template(r#"<img src="?" alt="" />"#, &values![gif]);
    assert_eq!(result.unwrap().as_str(), r#"<img src="data:image/gif;base64,R0lGODlh" alt="" />"#);
}

#[test]
fn render_token_kinds() {
    let result = render_template(
        r#"<a href="/" class="?" target="?" rel="?">x</a>"#,
        &values!["nav main-link", "_blank", "noopener noreferrer"],
    );
    assert_eq!(
        result.unwrap().as_str(),
        r#"<a href="/" class="nav main-link" target="_blank" rel="noopener noreferrer">x</a>"#
    );
}

#[test]
fn render_datetimes() {
    let result = render_template(r#"<time datetime="?">?</time>"#, &values!["2024-02-29T12:00:00Z", "Leap day"]);
    assert_eq!(result.unwrap().as_str(), r#"<time datetime="2024-02-29T12:00:00Z">Leap day</time>"#);
}

#[cfg(feature = "datetime")]
#[test]
fn render_chrono_dates() {
    let date = chrono::NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
    let result = render_template(r#"<time datetime="?">?</time>"#, &values![date, "Leap day"]);
    assert_eq!(result.unwrap().as_str(), r#"<time datetime="2024-02-29">Leap day</time>"#);
}

#[test]
fn render_data_attributes() {
    let result = render_template(r#"<div data-config="?">x</div>"#, &values![r#"{"a":1}"#]);
    assert_eq!(result.unwrap().as_str(), r#"<div data-config="{&quot;a&quot;:1}">x</div>"#);
}

#[test]
fn render_nested_markup() {
    let result = render_template(
        "<ul>\n  <li><em>?</em></li>\n  <li><strong>?</strong></li>\n</ul>",
        &values!["one", 2],
    );
    assert_eq!(result.unwrap().as_str(), "<ul>\n  <li><em>one</em></li>\n  <li><strong>2</strong></li>\n</ul>");
}

#[test]
fn render_plain_template() {
    let tpl = Template::compile_plain("Dear ?, your order ? shipped?");
    assert_eq!(tpl.slot_count(), 3);
    let result = tpl.render(&values!["<Bob>", 12, "!"]);
    assert_eq!(result.unwrap().as_str(), "Dear &lt;Bob&gt;, your order 12 shipped!");
}

#[test]
fn rendered_html_serializes_as_a_string() {
    let html = render_template("<p>?</p>", &values!["a"]).unwrap();
    assert_eq!(serde_json::to_string(&html).unwrap(), r#""<p>a</p>""#);
}

#[test]
fn render_line_breaks_in_element_text() {
    let inputs = vec![
        ("<p>?</p>", "a\nb", "<p>a<br />\nb</p>"),
        ("<p>?</p>", "a\r\nb\rc", "<p>a<br />\r\nb<br />\rc</p>"),
        ("<pre>?</pre>", "a\nb", "<pre>a\nb</pre>"),
        (r#"<abbr title="?">x</abbr>"#, "a\nb", "<abbr title=\"a\nb\">x</abbr>"),
    ];

    for (template, value, expected) in inputs {
        println!("{:?} with {:?}", template, value);
        assert_eq!(render_template(template, &values![value]).unwrap().as_str(), expected);
    }
}
