use assert_matches::assert_matches;
use site_filters::filters::{
    array_to_sentence_string, array_to_sentence_string_with, group_by, r#where,
    sort, sort_by_property, where_by, GroupKey, NilOrder,
};
use site_filters::{Error, Value};
use site_filters_testing::{value, Page};

#[test]
fn test_sentence() {
    let sentence = |items: &[i32]| array_to_sentence_string(items).unwrap().to_string();
    assert_eq!(sentence(&[]), "");
    assert_eq!(sentence(&[1]), "1");
    assert_eq!(sentence(&[1, 2]), "1 and 2");
    assert_eq!(sentence(&[1, 2, 3]), "1, 2, and 3");
    assert_eq!(sentence(&[1, 2, 3, 4]), "1, 2, 3, and 4");
    assert_eq!(
        array_to_sentence_string_with(&["tea", "coffee"], "or").unwrap().to_string(),
        "tea or coffee"
    );
}

#[test]
fn test_sort_codepoints() {
    let sorted = sort(value(r#"["foo_", "_foo", "foo"]"#).as_array().unwrap(), None, None);
    assert_eq!(Value::Array(sorted.unwrap()), value(r#"["_foo", "foo", "foo_"]"#));
}

#[test]
fn test_sort_nils() {
    let input = value(r#"[{"a": 2}, {"b": 1}, {"a": 1}]"#);
    let input = input.as_array().unwrap();
    assert_eq!(
        Value::Array(sort(input, Some("a"), Some(NilOrder::First)).unwrap()),
        value(r#"[{"b": 1}, {"a": 1}, {"a": 2}]"#)
    );
    assert_eq!(
        Value::Array(sort(input, Some("a"), Some(NilOrder::Last)).unwrap()),
        value(r#"[{"a": 1}, {"a": 2}, {"b": 1}]"#)
    );
}

#[test]
fn test_nil_placement_symmetry() {
    let input = value(
        r#"[{"k": 3}, {"x": 0}, {"k": 1}, {"k": null}, {"k": 2}, {"y": 0}, {"k": 1}]"#,
    );
    let input = input.as_array().unwrap();
    let first = sort(input, Some("k"), Some(NilOrder::First)).unwrap();
    let last = sort(input, Some("k"), Some(NilOrder::Last)).unwrap();

    let nils = 3;
    assert_eq!(first[..nils], last[last.len() - nils..]);
    assert_eq!(first[nils..], last[..last.len() - nils]);
    assert_eq!(first[..nils], [input[1].clone(), input[3].clone(), input[5].clone()]);
}

#[test]
fn test_sort_stability() {
    let input = value(
        r#"[{"k": 1, "i": 0}, {"k": 0, "i": 1}, {"k": 1, "i": 2}, {"k": 0, "i": 3}, {"k": 1, "i": 4}]"#,
    );
    let sorted = sort(input.as_array().unwrap(), Some("k"), None).unwrap();
    let order: Vec<_> = sorted
        .iter()
        .map(|item| item.as_object().unwrap()["i"].clone())
        .collect();
    assert_eq!(Value::Array(order), value("[1, 3, 0, 2, 4]"));
}

#[test]
fn test_sort_errors() {
    let mixed = value(r#"[1, "one"]"#);
    assert_matches!(
        sort(mixed.as_array().unwrap(), None, None),
        Err(Error::IncomparableTypes { .. })
    );

    let mixed = value(r#"[{"n": 2}, "two", {"n": 1}]"#);
    assert_matches!(
        sort(mixed.as_array().unwrap(), Some("n"), None),
        Err(Error::IncomparableTypes { left: "string", right: "record" })
    );
}

#[test]
fn test_sort_large_numbers() {
    let big = 1i64 << 53;
    let input = [Value::from(big + 1), Value::from(big as f64), Value::from(big)];
    let sorted = sort(&input, None, None).unwrap();
    assert_eq!(sorted, [input[1].clone(), input[2].clone(), input[0].clone()]);
}

#[test]
fn test_sort_host_records() {
    let pages = [
        Page::new("c", Some("post"), Some(3)),
        Page::new("a", None, None),
        Page::new("b", Some("page"), Some(1)),
    ];
    let sorted = sort_by_property(&pages, "weight", NilOrder::Last).unwrap();
    let titles: Vec<_> = sorted.iter().map(|page| page.title.as_str()).collect();
    assert_eq!(titles, ["b", "c", "a"]);
    let sorted = sort_by_property(&pages, "title", NilOrder::First).unwrap();
    let titles: Vec<_> = sorted.iter().map(|page| page.title.as_str()).collect();
    assert_eq!(titles, ["a", "b", "c"]);
}

#[test]
fn test_group_by_coverage() {
    let input = value(
        r#"[
            {"layout": "post", "i": 0},
            {"i": 1},
            {"layout": null, "i": 2},
            {"layout": "page", "i": 3},
            {"layout": "post", "i": 4},
            {"layout": "nil", "i": 5}
        ]"#,
    );
    let input = input.as_array().unwrap();
    let groups = group_by(input, "layout").unwrap();

    let names: Vec<_> = groups.iter().map(|group| group.name.as_str()).collect();
    assert_eq!(names, ["post", "page", "nil", "nil", ""]);
    assert_eq!(groups[2].key, GroupKey::Value("nil".into()));
    assert_eq!(groups[3].key, GroupKey::Nil);
    assert_eq!(groups[4].key, GroupKey::Missing);

    let total: usize = groups.iter().map(|group| group.items.len()).sum();
    assert_eq!(total, input.len());
    for item in input {
        let homes = groups.iter().filter(|group| group.items.contains(item)).count();
        assert_eq!(homes, 1, "{item:?}");
    }
}

#[test]
fn test_group_by_host_records() {
    let pages = [
        Page::new("a", Some("post"), None),
        Page::new("b", None, None),
        Page::new("c", Some("post"), None),
    ];
    let groups = group_by(&pages, "layout").unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].name, "post");
    assert_eq!(groups[0].items, [pages[0].clone(), pages[2].clone()]);
    // `Page` always has a layout property, an unset one is nil
    assert_eq!(groups[1].key, GroupKey::Nil);

    let groups = group_by(&pages, "author").unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].key, GroupKey::Missing);
    assert_eq!(groups[0].name, "");
}

#[test]
fn test_where() {
    let input = value(r#"[{"tag": "rust"}, {"tag": "ruby"}, {}, {"tag": "rust"}]"#);
    let rust = r#where(&input, "tag", &Value::from("rust"));
    assert_eq!(rust, value(r#"[{"tag": "rust"}, {"tag": "rust"}]"#));
    let untagged = r#where(&input, "tag", &Value::Nil);
    assert_eq!(untagged, value("[{}]"));

    let pages = [Page::new("a", Some("post"), None), Page::new("b", None, None)];
    assert_eq!(where_by(&pages, "layout", &Value::Nil), [pages[1].clone()]);
}
