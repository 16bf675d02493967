#![allow(dead_code)]

use trusted_templates::{Engine, Protection};

/// An engine refusing any runtime text
pub fn strict_engine() -> Engine {
    let mut engine = Engine::new();
    engine.set_protection(Protection::Fail);
    engine
}

/// Strings an attacker would try in every slot
pub const HOSTILE: &[&str] = &[
    "<script>alert(1)</script>",
    "\"><img src=x onerror=alert(1)>",
    "' onmouseover='alert(1)",
    "</p><p>",
    "&lt;already&gt;",
    "a\u{0}b",
];

/// Checks that whatever `value` held, the output has no markup the template didn't
pub fn assert_no_markup_from(output: &str, template: &str) {
    let count = |s: &str, c: char| s.matches(c).count();
    for c in &['<', '>', '"', '\''] {
        assert_eq!(count(output, *c), count(template, *c), "{:?} in {:?}", c, output);
    }
}
