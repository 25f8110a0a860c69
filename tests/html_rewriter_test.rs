//! Tests for the four rewrite passes

mod common;

use common::{MockFetcher, create_test_html, inlined_stylesheets, page_base};
use kodegen_tools_offline_html::fetcher::ResourceError;
use kodegen_tools_offline_html::html_rewriter::{HtmlRewriter, RewriteError, rewrite};

#[tokio::test]
async fn test_script_is_inlined_with_provenance() {
    let fetcher = MockFetcher::new().with("https://example.com/js/app.js", "console.log('hi');");
    let html = create_test_html("", r#"<script type="module" src="js/app.js" defer></script>"#);

    let out = rewrite(&html, &page_base(), &fetcher).await.unwrap();

    assert!(out.html.contains(
        "<!-- inlined from js/app.js -->\n<script type=\"module\" defer>\nconsole.log('hi');\n</script>"
    ));
    assert!(!out.html.contains("src="));
    assert_eq!(out.stats.scripts_inlined, 1);
}

#[tokio::test]
async fn test_script_with_body_is_left_alone() {
    let fetcher = MockFetcher::new();
    let html = r#"<script src="x.js">fallback()</script>"#;

    let out = rewrite(html, &page_base(), &fetcher).await.unwrap();

    assert_eq!(out.html, html);
    assert_eq!(fetcher.total_calls(), 0);
}

#[tokio::test]
async fn test_script_markup_inside_inlined_code_is_escaped() {
    let fetcher = MockFetcher::new()
        .with(
            "https://example.com/t.js",
            r#"if (x <!--y) document.write("<script></script>");"#,
        )
        .with("https://example.com/after.css", "p{}");
    let html = r#"<script src="t.js"></script><link rel="stylesheet" href="after.css">"#;

    let out = rewrite(html, &page_base(), &fetcher).await.unwrap();

    assert!(out.html.contains(r#"if (x \x3C!--y) document.write("\x3Cscript>\x3C/script>");"#));
    assert_eq!(out.html.matches("</script>").count(), 1);
    // the real end tag still closes the element, so the link after it is seen
    assert_eq!(out.stats.stylesheets_inlined, 1);
}

#[tokio::test]
async fn test_empty_comment_does_not_hide_following_markup() {
    let fetcher = MockFetcher::new().with("https://example.com/app.js", "run();");
    let html = r#"<!--><script src="app.js"></script><p>x</p><!-- note -->"#;

    let out = rewrite(html, &page_base(), &fetcher).await.unwrap();

    assert_eq!(fetcher.calls("https://example.com/app.js"), 1);
    assert_eq!(
        out.html,
        "<!--><!-- inlined from app.js -->\n<script>\nrun();\n</script><p>x</p><!-- note -->"
    );
}

#[tokio::test]
async fn test_non_utf8_script_and_stylesheet_are_decoded_lossily() {
    let fetcher = MockFetcher::new()
        .with("https://example.com/app.js", b"// caf\xe9\nrun();")
        .with("https://example.com/site.css", b"/* na\xefve */ p{}");
    let html = r#"<link rel="stylesheet" href="site.css"><script src="app.js"></script>"#;

    let out = rewrite(html, &page_base(), &fetcher).await.unwrap();

    assert!(out.html.contains("// caf\u{FFFD}\nrun();"));
    assert_eq!(inlined_stylesheets(&out.html), vec!["/* na\u{FFFD}ve */ p{}"]);
    assert_eq!(out.stats.scripts_inlined, 1);
    assert_eq!(out.stats.stylesheets_inlined, 1);
}

#[tokio::test]
async fn test_markup_inside_inlined_script_is_not_rewritten() {
    let js = r#"const tpl = '<link rel="stylesheet" href="never.css"><img crossorigin>';"#;
    let fetcher = MockFetcher::new().with("https://example.com/tpl.js", js);

    let out = rewrite(r#"<script src="tpl.js"></script>"#, &page_base(), &fetcher)
        .await
        .unwrap();

    assert!(out.html.contains(js));
    assert_eq!(fetcher.calls("https://example.com/never.css"), 0);
    assert_eq!(out.stats.attributes_stripped, 0);
}

#[tokio::test]
async fn test_script_failure_is_fatal() {
    let fetcher = MockFetcher::new();
    let html = r#"<script src="https://cdn.example.com/missing.js"></script>"#;

    let err = rewrite(html, &page_base(), &fetcher).await.unwrap_err();

    match err {
        RewriteError::Script { src, source } => {
            assert_eq!(src, "https://cdn.example.com/missing.js");
            assert!(matches!(source, ResourceError::Fetch(_)));
        }
        other => panic!("expected script error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_stylesheet_attributes_preserved() {
    let fetcher = MockFetcher::new().with("https://example.com/print.css", "body{color:black}");
    let html = r#"<link rel="stylesheet" href="print.css" media="print" integrity="sha384-abc" crossorigin="anonymous">"#;

    let out = rewrite(html, &page_base(), &fetcher).await.unwrap();

    assert!(out.html.starts_with("<!-- inlined from print.css -->\n<link rel=\"stylesheet\" media=\"print\" href=\"data:text/css;base64,"));
    assert!(!out.html.contains("integrity"));
    assert!(!out.html.contains("crossorigin"));
    assert_eq!(inlined_stylesheets(&out.html), vec!["body{color:black}"]);
    assert_eq!(out.stats.stylesheets_inlined, 1);
}

#[tokio::test]
async fn test_stylesheet_matching_rules() {
    let fetcher = MockFetcher::new()
        .with("https://example.com/a.css", "a{}")
        .with("https://example.com/b.css", "b{}");
    let html = concat!(
        r#"<LINK HREF='a.css' REL=StyleSheet />"#,
        r#"<link rel="alternate stylesheet" href="alt.css">"#,
        r#"<link rel="stylesheet" href="">"#,
        r#"<link rel="stylesheet" href="data:text/css;base64,eHt9">"#,
        r#"<link href="b.css" rel="stylesheet">"#,
    );

    let out = rewrite(html, &page_base(), &fetcher).await.unwrap();

    assert_eq!(out.stats.stylesheets_inlined, 2);
    // the pre-existing data: link is kept as authored
    assert_eq!(inlined_stylesheets(&out.html), vec!["a{}", "x{}", "b{}"]);
    assert!(out.html.contains(r#"<link rel="stylesheet" href="data:text/css;base64,eHt9">"#));
    assert!(out.html.contains(r#"<link rel="alternate stylesheet" href="alt.css">"#));
    assert!(out.html.contains(r#"<link rel="stylesheet" href="">"#));
    // self-closing form survives
    assert!(out.html.contains("\" />"));
}

#[tokio::test]
async fn test_stylesheet_assets_resolve_against_stylesheet() {
    let fetcher = MockFetcher::new()
        .with(
            "https://fonts.googleapis.com/css2?family=Inter&display=swap",
            "@font-face { src: url(https://fonts.gstatic.com/s/inter/v1/a.woff2); }",
        )
        .with("https://fonts.gstatic.com/s/inter/v1/a.woff2", b"font");
    let html = r#"<link href="https://fonts.googleapis.com/css2?family=Inter&amp;display=swap" rel="stylesheet">"#;

    let out = rewrite(html, &page_base(), &fetcher).await.unwrap();

    let sheets = inlined_stylesheets(&out.html);
    assert_eq!(sheets.len(), 1);
    assert!(sheets[0].contains("url(data:font/woff2;base64,Zm9udA==)"));
    assert_eq!(out.stats.assets_inlined, 1);
}

#[tokio::test]
async fn test_stylesheet_asset_failure_is_recorded() {
    let fetcher = MockFetcher::new().with("https://example.com/css/site.css", "a{background:url(gone.png)}");

    let out = rewrite(r#"<link rel="stylesheet" href="css/site.css">"#, &page_base(), &fetcher)
        .await
        .unwrap();

    assert_eq!(out.stats.asset_failures.len(), 1);
    assert_eq!(
        out.stats.asset_failures[0].location.as_deref(),
        Some("https://example.com/css/gone.png")
    );
    assert_eq!(inlined_stylesheets(&out.html), vec!["a{background:url(gone.png)}"]);
}

#[tokio::test]
async fn test_stylesheet_failure_is_fatal() {
    let fetcher = MockFetcher::new();

    let err = rewrite(r#"<link rel="stylesheet" href="nope.css">"#, &page_base(), &fetcher)
        .await
        .unwrap_err();

    assert!(matches!(err, RewriteError::Stylesheet { ref href, .. } if href == "nope.css"));
    assert!(err.to_string().contains("nope.css"));
}

#[tokio::test]
async fn test_resource_hints_removed() {
    let fetcher = MockFetcher::new();
    let html = create_test_html(
        concat!(
            r#"<link rel="preconnect" href="https://fonts.googleapis.com">"#,
            r#"<link rel="dns-prefetch" href="https://cdn.example.com">"#,
            r#"<link rel="icon" href="favicon.ico">"#,
        ),
        "<p>hello</p>",
    );

    let out = rewrite(&html, &page_base(), &fetcher).await.unwrap();

    assert!(!out.html.contains("preconnect"));
    assert!(!out.html.contains("dns-prefetch"));
    assert!(out.html.contains(r#"<link rel="icon" href="favicon.ico">"#));
    assert_eq!(out.stats.hints_removed, 2);
}

#[tokio::test]
async fn test_residual_transport_attributes_stripped() {
    let fetcher = MockFetcher::new();
    let html = r#"<img src="https://cdn.example.com/a.png" crossorigin="anonymous" alt="a"><video crossorigin></video>"#;

    let out = rewrite(html, &page_base(), &fetcher).await.unwrap();

    assert_eq!(
        out.html,
        r#"<img src="https://cdn.example.com/a.png" alt="a"><video></video>"#
    );
    assert_eq!(out.stats.attributes_stripped, 2);
}

#[tokio::test]
async fn test_document_without_references_is_unchanged() {
    let fetcher = MockFetcher::new();
    let html = create_test_html("<style>p { color: red }</style>", "<!-- <script src=\"x.js\"></script> --><p>plain</p>");

    let out = rewrite(&html, &page_base(), &fetcher).await.unwrap();

    assert_eq!(out.html, html);
    assert_eq!(fetcher.total_calls(), 0);
}

#[tokio::test]
async fn test_matches_processed_in_document_order() {
    let fetcher = MockFetcher::new()
        .with("https://example.com/1.js", "one()")
        .with("https://example.com/2.js", "two()")
        .with_random_delay(10);
    let html = r#"<script src="1.js"></script><script src="2.js"></script>"#;

    let out = HtmlRewriter::new(&fetcher)
        .max_css_depth(1)
        .rewrite(html, &page_base())
        .await
        .unwrap();

    let one = out.html.find("one()").unwrap();
    let two = out.html.find("two()").unwrap();
    assert!(one < two);
    assert_eq!(out.stats.scripts_inlined, 2);
}
