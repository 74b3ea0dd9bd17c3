//! End-to-end behaviour of condition parsing and routing decisions.

use canary_router::routing::{Condition, Matcher, Operator, ParseError, Routing, SourceKind};

mod common;

use common::{get, get_with_cookie, get_with_header, rule_set};

#[test]
fn test_parse_keeps_operator_like_text() {
    let c = Condition::parse("$header_abc_!= == abc== asd ").unwrap();
    assert_eq!(c.source(), SourceKind::Header);
    assert_eq!(c.attribute(), "abc_!=");
    assert_eq!(c.operator(), Operator::Eq);
    assert_eq!(c.target(), "abc== asd");
}

#[test]
fn test_parse_rejects_not_equal() {
    assert!(matches!(
        Condition::parse("$header_abc != abc"),
        Err(ParseError::UnknownOperator { .. })
    ));
}

#[test]
fn test_sources_are_independent() {
    let header = Condition::parse("$header_abc == abc").unwrap();
    let cookie = Condition::parse("$cookie_abc == abc").unwrap();
    let query = Condition::parse("$query_abc == abc").unwrap();

    let req = get_with_header("/abc", "abc", "abc");
    assert_eq!(header.extract(&req), "abc");
    assert!(header.matches(&req));
    assert!(!cookie.matches(&req));
    assert!(!query.matches(&req));

    let req = get_with_cookie("/abc", "abc", "abc");
    assert_eq!(cookie.extract(&req), "abc");
    assert!(cookie.matches(&req));
    assert!(!header.matches(&req));

    let req = get("/abc?abc=abc");
    assert_eq!(query.extract(&req), "abc");
    assert!(query.matches(&req));
    assert!(!header.matches(&req));
}

#[test]
fn test_operators() {
    let cases = [
        ("$query_abc == abc", "/abc?abc=abc", true),
        ("$query_abc < 100", "/abc?abc=1", true),
        ("$query_abc <= 100", "/abc?abc=100", true),
        ("$query_abc > 100", "/abc?abc=101", true),
        ("$query_abc >= 100", "/abc?abc=100", true),
        ("$query_abc in 100", "/abc?abc=11001", true),
        ("$query_abc in 100", "/abc?abc=23456", false),
        ("$query_abc ~ ^1100", "/abc?abc=11001a", true),
        ("$query_abc ~ ^1100", "/abc?abc=21100", false),
        ("$query_abc < 100", "/abc?abc=abc", false),
        ("$query_abc > 100", "/abc", false),
    ];
    for (expr, uri, expected) in cases {
        let c = Condition::parse(expr).unwrap();
        assert_eq!(c.matches(&get(uri)), expected, "{expr} against {uri}");
    }
}

#[test]
fn test_single_rule_routing() {
    let r = Routing::parse(&rule_set(r#"["$query_abc == abc"]"#, None), "cluster", "/abc*").unwrap();
    assert!(r.matches(&get("/abc?abc=abc")));

    let r = Routing::parse(&rule_set(r#"["$query_abc == 10"]"#, None), "cluster", "/abc*").unwrap();
    assert!(!r.matches(&get("/abc?abc=20")));
}

#[test]
fn test_and_logic() {
    let r = Routing::parse(
        &rule_set(r#"["$query_abc == 10", "$query_123 == 20"]"#, None),
        "cluster",
        "/abc*",
    )
    .unwrap();

    assert!(r.matches(&get("/abc?abc=10&123=20")));
    assert!(!r.matches(&get("/abc?abc=10&123=30")));
    assert!(!r.matches(&get("/abc?abc=11&123=20")));
}

#[test]
fn test_or_overrides_failed_and() {
    let r = Routing::parse(
        &rule_set(
            r#"["$query_abc == 10","$query_123 == 20"]"#,
            Some(r#"["$query_or1 == 30", "$query_or2 == 40"]"#),
        ),
        "cluster",
        "/abc*",
    )
    .unwrap();

    assert!(r.matches(&get("/abc?abc=10&123=10&or2=40")));
    assert!(r.matches(&get("/abc?or1=30")));
    assert!(!r.matches(&get("/abc?abc=10&123=10&or2=41")));
}

#[test]
fn test_matching_is_repeatable() {
    let r = Routing::parse(
        &rule_set(r#"["$query_abc ~ ^1"]"#, Some(r#"["$header_x == y"]"#)),
        "cluster",
        "/abc*",
    )
    .unwrap();

    for req in [get("/abc?abc=12"), get("/abc?abc=21"), get_with_header("/abc", "x", "y")] {
        let first = r.matches(&req);
        assert_eq!(first, r.matches(&req));
    }
}

#[test]
fn test_invalid_condition_rejects_routing() {
    let err = Routing::parse(
        &rule_set(r#"["$query_abc == 10"]"#, Some(r#"["$query_or1 ~ [oops"]"#)),
        "cluster",
        "/abc*",
    )
    .unwrap_err();
    assert!(matches!(err, ParseError::Rule { field: "or", index: 0, .. }));
}

#[test]
fn test_concurrent_evaluation() {
    use std::sync::Arc;

    let r = Arc::new(
        Routing::parse(&rule_set(r#"["$query_n < 50"]"#, None), "cluster", "/").unwrap(),
    );
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let r = Arc::clone(&r);
            std::thread::spawn(move || {
                (0..100)
                    .filter(|n| r.matches(&get(&format!("/?n={}", n + t))))
                    .count()
            })
        })
        .collect();

    for (t, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), 50 - t);
    }
}
