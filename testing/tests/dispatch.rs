use assert_matches::assert_matches;
use site_filters::filters::{apply, ConversionError, Context, FILTER_NAMES};
use site_filters::{Error, Value};
use site_filters_testing::value;

#[test]
fn test_names() {
    let ctx = Context::default();
    for name in FILTER_NAMES {
        assert_matches!(
            apply(&ctx, name, &Value::Nil, &[]),
            Ok(_) | Err(Error::InvalidArgument(_) | Error::Conversion(_)),
            "{name}"
        );
    }
    assert_matches!(
        apply(&ctx, "slugify", &Value::from("a b"), &[]),
        Err(Error::UnknownFilter(_))
    );
}

#[test]
fn test_pipeline() {
    let ctx = Context::default();
    let posts = value(
        r#"[
            {"title": "Later", "date": "2013-03-28 10:00:00 UTC"},
            {"title": "Earlier", "date": "2013-03-27 09:00:00 UTC"},
            {"title": "Undated"}
        ]"#,
    );
    let sorted = apply(&ctx, "sort", &posts, &[Value::from("date"), Value::from("last")]).unwrap();
    let titles: Vec<Value> = sorted
        .as_array()
        .unwrap()
        .iter()
        .map(|post| post.as_object().unwrap()["title"].clone())
        .collect();
    let sentence = apply(&ctx, "array_to_sentence_string", &Value::from(titles), &[]).unwrap();
    assert_eq!(sentence, Value::from("Earlier, Later, and Undated"));

    let escaped = apply(&ctx, "xml_escape", &Value::from("Tom & Jerry"), &[]).unwrap();
    assert_eq!(escaped, Value::from("Tom &amp; Jerry"));
}

#[test]
fn test_wrong_arguments() {
    let ctx = Context::default();
    let items = value("[1, 2]");
    assert_matches!(
        apply(&ctx, "xml_escape", &Value::from("x"), &[Value::from(1)]),
        Err(Error::InvalidArgument(_))
    );
    assert_matches!(
        apply(&ctx, "sort", &items, &[Value::from(1)]),
        Err(Error::InvalidArgument(_))
    );
    assert_matches!(
        apply(&ctx, "where", &items, &[Value::from("k")]),
        Err(Error::InvalidArgument(_))
    );
    assert_matches!(
        apply(&ctx, "group_by", &items, &[Value::from("k")]),
        Err(Error::InvalidGroupInput(_))
    );
}

#[test]
fn test_host_converters() {
    fn failing(_: &str) -> Result<String, ConversionError> {
        Err("stylesheet syntax error".into())
    }

    let ctx = Context::default()
        .with_textile(|raw: &str| -> Result<String, ConversionError> {
            Ok(format!("<p>{raw}</p>"))
        })
        .with_scss(failing);
    assert_eq!(
        apply(&ctx, "textilize", &Value::from("hi"), &[]).unwrap(),
        Value::from("<p>hi</p>")
    );
    let err = apply(&ctx, "scssify", &Value::from("p {"), &[]).unwrap_err();
    assert_matches!(&err, Error::Conversion(_));
    assert_eq!(err.to_string(), "conversion failed: stylesheet syntax error");
    assert_matches!(
        apply(&ctx, "sassify", &Value::from("p"), &[]),
        Err(Error::Conversion(_))
    );
}

#[cfg(feature = "config")]
#[test]
fn test_from_config() {
    use site_filters::Config;

    let config = Config::from_toml(
        r#"
        timezone = "-07:00"

        [markdown]
        smart_punctuation = true
        "#,
    )
    .unwrap();
    let ctx = Context::from_config(&config).unwrap();
    assert_eq!(ctx.local_offset().local_minus_utc(), -7 * 3600);
    assert_eq!(
        apply(&ctx, "date_to_rfc822", &Value::from(1399680607), &[]).unwrap(),
        Value::from("Fri, 09 May 2014 17:10:07 -0700")
    );
    assert_eq!(
        apply(&ctx, "date_to_string", &Value::from("2013-03-27 01:00:00"), &[]).unwrap(),
        Value::from("27 Mar 2013")
    );

    #[cfg(feature = "markdown")]
    assert_eq!(
        apply(&ctx, "markdownify", &Value::from("\"quoted\""), &[]).unwrap(),
        Value::from("<p>\u{201c}quoted\u{201d}</p>\n")
    );
}

#[cfg(feature = "markdown")]
#[test]
fn test_markdownify() {
    let ctx = Context::default();
    assert_eq!(
        apply(&ctx, "markdownify", &Value::from("something **really** simple"), &[]).unwrap(),
        Value::from("<p>something <strong>really</strong> simple</p>\n")
    );
    assert_eq!(
        apply(&ctx, "markdownify", &Value::from("| a |\n|---|\n| 1 |"), &[])
            .unwrap()
            .as_str()
            .map(|html| html.starts_with("<table>")),
        Some(true)
    );
}
