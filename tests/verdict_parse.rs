use visual_verdict::verdict::{parse, Outcome, UNPARSEABLE_ISSUE};

#[test]
fn pass_line_yields_pass_without_issues() {
    for text in [
        "EVALUATION: PASS",
        "  evaluation:   pass  ",
        "EVALUATION: PASS\nLooks great, very 2004.",
        "Here is my verdict.\n\nEVALUATION: PASS\n",
    ] {
        let v = parse(text);
        assert_eq!(v.outcome, Outcome::Pass, "{text:?}");
        assert!(v.issues.is_empty(), "{text:?}");
    }
}

#[test]
fn pass_discards_trailing_bullets() {
    let v = parse("EVALUATION: PASS\n- header — rounded corners — border-radius:0");
    assert_eq!(v.outcome, Outcome::Pass);
    assert!(v.issues.is_empty());
}

#[test]
fn fail_collects_bullets_in_order() {
    let text = "EVALUATION: FAIL\nISSUES:\n\
        - nav — pill-shaped buttons — border-radius:0\n\
        - hero — oversized heading — font-size:14px\n\
        - nav — pill-shaped buttons — border-radius:0";
    let v = parse(text);
    assert_eq!(v.outcome, Outcome::Fail);
    assert_eq!(
        v.issues,
        vec![
            "nav — pill-shaped buttons — border-radius:0",
            "hero — oversized heading — font-size:14px",
            "nav — pill-shaped buttons — border-radius:0",
        ]
    );
}

#[test]
fn fail_ignores_non_bullet_lines() {
    let text = "EVALUATION: FAIL\nISSUES:\n  - footer — shadow — box-shadow:none  \nSome commentary\n-not a bullet";
    let v = parse(text);
    assert_eq!(v.issues, vec!["footer — shadow — box-shadow:none"]);
}

#[test]
fn fail_without_bullets_has_no_issues() {
    let v = parse("EVALUATION: FAIL");
    assert_eq!(v.outcome, Outcome::Fail);
    assert!(v.issues.is_empty());
}

#[test]
fn embedded_marker_falls_back_to_substring_scan() {
    let v = parse("**EVALUATION: PASS**");
    assert_eq!(v.outcome, Outcome::Pass);
    assert!(v.issues.is_empty());

    let v = parse("My answer: evaluation: fail because of shadows\n- card — shadow — none");
    assert_eq!(v.outcome, Outcome::Fail);
    assert!(v.issues.is_empty());
}

#[test]
fn substring_scan_prefers_pass() {
    let v = parse("> EVALUATION: FAIL or EVALUATION: PASS?");
    assert_eq!(v.outcome, Outcome::Pass);
}

#[test]
fn invalid_marker_value_falls_through() {
    let v = parse("EVALUATION: MOSTLY OK");
    assert_eq!(v.outcome, Outcome::Fail);
    assert_eq!(v.issues, vec![UNPARSEABLE_ISSUE]);
}

#[test]
fn unrecognizable_text_fails_closed() {
    for text in ["", "   ", "The page looks nice.", "- nav — pills — fix"] {
        let v = parse(text);
        assert_eq!(v.outcome, Outcome::Fail, "{text:?}");
        assert_eq!(v.issues, vec![UNPARSEABLE_ISSUE], "{text:?}");
    }
}

#[test]
fn parse_is_idempotent() {
    let text = "EVALUATION: FAIL\nISSUES:\n- a — b — c";
    assert_eq!(parse(text), parse(text));
}

#[test]
fn verdict_attaches_route() {
    let v = parse("EVALUATION: PASS").for_route("/cart");
    assert_eq!(v.route, "/cart");
    assert!(v.passed());
}

#[test]
fn fullwidth_colon_is_accepted() {
    let v = parse("EVALUATION： PASS");
    assert_eq!(v.outcome, Outcome::Pass);
    assert!(v.issues.is_empty());
}

#[test]
fn issue_text_keeps_original_case() {
    let v = parse("evaluation: fail\nISSUES:\n- Nav Bar — Rounded — border-radius:0");
    assert_eq!(v.outcome, Outcome::Fail);
    assert_eq!(v.issues, vec!["Nav Bar — Rounded — border-radius:0"]);
}

#[test]
fn issues_before_the_marker_are_ignored() {
    let v = parse("- stray bullet\nEVALUATION: FAIL\n- real issue");
    assert_eq!(v.issues, vec!["real issue"]);
}
