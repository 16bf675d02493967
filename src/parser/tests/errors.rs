use crate::errors::ErrorKind;
use crate::parser::parse;

fn assert_err_msg(input: &str, needles: &[&str]) {
    let res = parse(input);
    assert!(res.is_err());
    let err = res.unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MalformedStructure { .. }), "{:?}", err.kind);
    let err_msg = err.to_string();
    println!("{}", err_msg);
    println!("Looking for:");
    for needle in needles {
        println!("{}", needle);
        assert!(err_msg.contains(needle));
    }
}

#[test]
fn unquoted_attribute() {
    assert_err_msg("<img src=? />", &["1:"]);
}

#[test]
fn unclosed_element() {
    assert_err_msg("<p>hello", &["expected"]);
}

#[test]
fn mismatched_closing_tag() {
    assert_err_msg("<p><b>x</p></b>", &["1:8", "closing tag </p> does not match <b>"]);
}

#[test]
fn redefined_attribute() {
    assert_err_msg("<p class=\"a\" class=\"b\">x</p>", &["1:14", "attribute `class` is redefined in <p>"]);
}

#[test]
fn stray_ampersand_and_angle_bracket() {
    assert_err_msg("<p>fish & chips</p>", &["1:"]);
    assert_err_msg("<p>1 < 2</p>", &["1:"]);
    assert_err_msg("<p title=\"a<b\">x</p>", &["1:"]);
}

#[test]
fn unknown_named_entity() {
    assert_err_msg("<p>&nbsp;</p>", &["1:"]);
}

#[test]
fn cdata_and_doctype_are_not_markup() {
    assert_err_msg("<![CDATA[?]]>", &["1:"]);
    assert_err_msg("<!DOCTYPE html><p>x</p>", &["1:"]);
}

#[test]
fn missing_whitespace_between_attributes() {
    assert_err_msg("<a href=\"/\"title=\"x\">y</a>", &["1:"]);
}

#[test]
fn error_position_on_later_line() {
    assert_err_msg("<p>\n  <b>x</i>\n</p>", &["2:7"]);
}
