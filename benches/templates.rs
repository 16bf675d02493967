#![feature(test)]
extern crate test;

use trusted_templates::{escape_html, values, Engine, Url};

const ARTICLE: &str = r#"<div class="article" data-id="?">
  <h1>?</h1>
  <p class="meta"><time datetime="?">?</time> by <a href="?" rel="noopener">?</a></p>
  <img src="?" width="?" height="?" alt="?" />
  <p>?</p>
</div>"#;

const PLAIN_TEXT: &str = "A paragraph without any character that needs to be escaped, which is the common case.";
const MARKUP_TEXT: &str = "A <b>paragraph</b> about Fast&Furious, \"quoted\" and 'single quoted'.";

#[bench]
fn bench_compile_article(b: &mut test::Bencher) {
    let engine = Engine::new();
    b.iter(|| {
        engine.clear_cache();
        engine.compile_html(ARTICLE)
    });
}

#[bench]
fn bench_compile_article_cached(b: &mut test::Bencher) {
    let engine = Engine::new();
    engine.compile_html(ARTICLE).unwrap();
    b.iter(|| engine.compile_html(ARTICLE));
}

#[bench]
fn bench_render_article(b: &mut test::Bencher) {
    let engine = Engine::new();
    let template = engine.compile_html(ARTICLE).unwrap();
    let author = Url::new("/author/:id/").get_with(vec![("id", 7)]).unwrap();
    let image = Url::new("/img/cover.png").get().unwrap();
    b.iter(|| {
        template.render(&values![
            "42",
            "Benchmarks & <you>",
            "2024-05-01T10:00:00Z",
            "1st May",
            author.clone(),
            "Jane",
            image.clone(),
            640,
            480,
            "Cover",
            MARKUP_TEXT
        ])
    });
}

#[bench]
fn bench_escape_plain_text(b: &mut test::Bencher) {
    b.iter(|| escape_html(PLAIN_TEXT));
}

#[bench]
fn bench_escape_markup_text(b: &mut test::Bencher) {
    b.iter(|| escape_html(MARKUP_TEXT));
}

#[bench]
fn bench_compose_url(b: &mut test::Bencher) {
    let mut url = Url::new("/search/:section/");
    url.param_set("section", "news").param_set("q", "rust templates").param_set("tag", vec!["a", "b"]);
    b.iter(|| url.get());
}
