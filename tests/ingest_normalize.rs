// tests/ingest_normalize.rs
use aws_newsroom::ingest::normalize::{clean_description, extract_blog_urls, strip_html};

#[test]
fn strip_html_is_idempotent_and_markup_free() {
    let cases = [
        "<p>Hello <b>world</b></p>",
        "a<<b>>c",
        "5 < 6 > 4",
        "<a href=\"x\">link</a> trailing",
        "no markup at all",
        "",
        "<broken <nested> tags>",
    ];
    for case in cases {
        let once = strip_html(case);
        let twice = strip_html(&once);
        assert_eq!(once, twice, "not idempotent for {case:?}");
        assert!(
            !once.contains('<') && !once.contains('>'),
            "markup survived in {once:?}"
        );
    }
}

#[test]
fn strip_html_trims_and_flattens_simple_markup() {
    assert_eq!(strip_html("  <p>Hello <b>world</b></p>  "), "Hello world");
}

#[test]
fn clean_description_decodes_entities_before_stripping() {
    let html = "<p>Queues &amp; streams</p>";
    assert_eq!(clean_description(Some(html)).as_deref(), Some("Queues & streams"));
}

#[test]
fn extract_blog_urls_keeps_only_blog_path_anchors() {
    let html = r#"
        <p>Read more in <a href="https://aws.amazon.com/blogs/aws/launch-post/">the launch post</a>
        and <a href='https://aws.amazon.com/blogs/machine-learning/deep-dive/'>the deep dive</a>.
        Pricing is on <a href="https://aws.amazon.com/ec2/pricing/">the pricing page</a>.
        See also <a href="https://example.com/blogs/aws/">an impostor</a>.</p>
    "#;
    let urls = extract_blog_urls(Some(html));
    assert_eq!(
        urls,
        vec![
            "https://aws.amazon.com/blogs/aws/launch-post/".to_string(),
            "https://aws.amazon.com/blogs/machine-learning/deep-dive/".to_string(),
        ]
    );
}

#[test]
fn extract_blog_urls_dedups_within_one_item() {
    let html = r#"
        <a href="https://aws.amazon.com/blogs/aws/post/">first</a>
        <a href="https://aws.amazon.com/blogs/aws/post/">again</a>
    "#;
    let urls = extract_blog_urls(Some(html));
    assert_eq!(urls, vec!["https://aws.amazon.com/blogs/aws/post/".to_string()]);
}

#[test]
fn no_body_means_no_urls() {
    assert!(extract_blog_urls(None).is_empty());
    assert!(extract_blog_urls(Some("plain text")).is_empty());
}
