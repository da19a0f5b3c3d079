// Licensed under MIT. See LICENSE for details.

use rstest::rstest;
use stlu::*;

fn _b<T>(a: T) -> Box<T> {
    Box::new(a)
}
fn _c(text: &str) -> Bound {
    Bound::Constant(Number::new(text.parse().unwrap(), text))
}
fn _cons(term: &str, relop: RelOp, bound: f64) -> Formula {
    Formula::Predicate(Predicate::Constraint(Constraint {
        relop,
        term: Term::Var(term.to_string()),
        bound: Term::Num(Number::from(bound)),
    }))
}

#[rstest]
#[case("G[0,5] a>3", Flag::Unspecified)]
#[case("G[0,5] a>3 w", Flag::Weak)]
#[case("G[0,5] a>3 s", Flag::Strong)]
#[case("E[0,5] a>3", Flag::Unspecified)]
#[case("E[0,5] a>3w", Flag::Weak)]
#[case("U[0,5](a, b)", Flag::Unspecified)]
#[case("U[0,5](a, b) s", Flag::Strong)]
#[case("(a & b) w", Flag::Weak)]
#[case("(a | b) s", Flag::Strong)]
#[case("(a -> b)", Flag::Unspecified)]
#[case("!a w", Flag::Weak)]
#[case("µ(0 1 0.5) s", Flag::Strong)]
fn test_flag_defaulting(#[case] input: &str, #[case] flag: Flag) {
    assert_eq!(parse(input).unwrap().flag(), Some(flag));
}

#[test]
fn test_interval_bound_kinds() {
    assert_eq!(
        parse("G[0,5] a>3"),
        Ok(Formula::Globally {
            interval: Interval {
                left: _c("0"),
                right: _c("5"),
            },
            sub: _b(_cons("a", RelOp::Gt, 3.0)),
            flag: Flag::Unspecified,
        })
    );

    let param = Param {
        name: "x".to_string(),
        default: Number::from(2.0),
        tolerance: Number::from(1.0),
    };
    assert_eq!(
        parse("G[x?2;1,5] a>3"),
        Ok(Formula::Globally {
            interval: Interval {
                left: Bound::Param(param),
                right: _c("5"),
            },
            sub: _b(_cons("a", RelOp::Gt, 3.0)),
            flag: Flag::Unspecified,
        })
    );
}

#[rstest]
#[case("a>=3", RelOp::Ge)]
#[case("a<=3", RelOp::Le)]
#[case("a==3", RelOp::Eq)]
#[case("a<3", RelOp::Lt)]
#[case("a>3", RelOp::Gt)]
#[case("a >= 3", RelOp::Ge)]
fn test_relop_longest_match(#[case] input: &str, #[case] relop: RelOp) {
    assert_eq!(parse(input), Ok(_cons("a", relop, 3.0)));
}

#[test]
fn test_operator_nesting() {
    assert_eq!(
        parse("({a>1}&{b<2})"),
        Ok(Formula::And {
            left: _b(_cons("a", RelOp::Gt, 1.0)),
            right: _b(_cons("b", RelOp::Lt, 2.0)),
            flag: Flag::Unspecified,
        })
    );
}

#[rstest]
#[case("G[0,5] a>3 w")]
#[case("U[0,5](a, (b | c)) s")]
#[case("!(a -> b)")]
#[case("µ(0.95 1 0.8)w")]
#[case("{a + 1} > b")]
fn test_parenthesization_is_transparent(#[case] input: &str) {
    let plain = parse(input).unwrap();
    assert_eq!(parse(&format!("({})", input)), Ok(plain.clone()));
    assert_eq!(parse(&format!("( (( {} )) )", input)), Ok(plain));
}

#[test]
fn test_mu_fields() {
    match parse("µ(0.95 1 0.8)w").unwrap() {
        Formula::Mu(mu) => {
            assert_eq!(mu.threshold().value(), 0.95);
            assert_eq!(mu.spread().value(), 1.0);
            assert_eq!(mu.confidence().value(), 0.8);
            assert_eq!(mu.flag(), Flag::Weak);
        }
        other => panic!("expected Mu, got {}", other),
    }
}

#[rstest]
#[case("G[0,5]", 6)]
#[case("G[0,5] ", 6)]
#[case("G[0,5] {a+b>3", 11)]
#[case("{a+b", 4)]
#[case("(a & b", 6)]
#[case("U[0,5](a b)", 8)]
#[case("a>3 )", 3)]
#[case("µ(0.95 1 2)", 9)]
#[case("a > {b + c", 10)]
#[case("G[0,5] a > {b + c", 17)]
#[case("G[0,5] a > ", 10)]
#[case("(a <= ) & b", 5)]
#[case("", 0)]
fn test_rejection_offset(#[case] input: &str, #[case] offset: usize) {
    let err = parse(input).unwrap_err();
    assert_eq!(err.offset, offset, "{}", err);
}

#[test]
fn test_rejection_names_attempted_rules() {
    let err = parse("G[0,5]").unwrap_err();
    assert_eq!(err.expected, vec![Expected::Rule("formula")]);
    assert_eq!(
        err.to_string(),
        "syntax error at offset 6: expected formula, found end of input"
    );

    let err = parse("G[0;5] a").unwrap_err();
    assert_eq!(err.offset, 3);
    assert_eq!(err.expected, vec![Expected::Token(",")]);
}

#[test]
fn test_parse_rule_start() {
    assert_eq!(
        grammar().parse_rule(Rule::Interval, "[ 1 , t?4;2 ]"),
        Ok(Node::Interval(Interval {
            left: _c("1"),
            right: Bound::Param(Param {
                name: "t".to_string(),
                default: Number::from(4.0),
                tolerance: Number::from(2.0),
            }),
        }))
    );
    assert!(grammar().parse_rule(Rule::Globally, "a > 3").is_err());
}

#[test]
fn test_parse_is_thread_safe() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let input = format!("G[0, {}] (a > {} & b) w", i + 1, i);
                parse(&input).map(|f| f.to_string())
            })
        })
        .collect();
    for (i, handle) in handles.into_iter().enumerate() {
        let rendered = handle.join().unwrap().unwrap();
        assert_eq!(rendered, format!("G[0, {}] (a > {} & b) w", i + 1, i));
    }
}
