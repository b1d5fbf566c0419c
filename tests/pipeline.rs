mod common;

use common::{calls, models, unavailable, StubBackend};
use visual_verdict::backend::{BackendError, BackendKind};
use visual_verdict::pipeline::{ExitStatus, Pipeline};
use visual_verdict::report::{render_summary, RunReport};
use visual_verdict::resolver::{ProviderCandidate, ProviderResolver};
use visual_verdict::target::EvaluationTarget;
use visual_verdict::verdict::Outcome;

fn targets(routes: &[&str]) -> Vec<EvaluationTarget> {
    routes
        .iter()
        .map(|r| EvaluationTarget::new(*r, format!("png:{r}").into_bytes()))
        .collect()
}

#[test]
fn all_pass_exits_zero() {
    let (primary, _) = StubBackend::new("gemini");
    let primary = primary.reply("m1", Ok("EVALUATION: PASS"));
    let resolver = ProviderResolver::new().with_primary(Box::new(primary), models(&["m1"]), None);

    let result = Pipeline::new(resolver).run(targets(&["/", "/cart"])).unwrap();

    assert_eq!(result.verdicts.len(), 2);
    assert!(result.verdicts.iter().all(|p| p.verdict.outcome == Outcome::Pass));
    assert_eq!(result.outcome(), Outcome::Pass);
    assert_eq!(result.exit_status(), ExitStatus::Pass);
    assert_eq!(result.exit_status().code(), 0);
}

#[test]
fn one_fail_exits_one() {
    let (primary, _) = StubBackend::new("gemini");
    let primary = primary
        .reply(
            "m1",
            Ok("EVALUATION: FAIL\nISSUES:\n- nav — pill-shaped buttons — border-radius:0"),
        )
        .reply("m1", Ok("EVALUATION: PASS"));
    let resolver = ProviderResolver::new().with_primary(Box::new(primary), models(&["m1"]), None);

    let result = Pipeline::new(resolver).run(targets(&["/", "/cart"])).unwrap();

    let first = &result.verdicts[0].verdict;
    assert_eq!(first.route, "/");
    assert_eq!(first.outcome, Outcome::Fail);
    assert_eq!(first.issues, vec!["nav — pill-shaped buttons — border-radius:0"]);
    assert_eq!(result.verdicts[1].verdict.outcome, Outcome::Pass);
    assert_eq!(result.passed(), 1);
    assert_eq!(result.outcome(), Outcome::Fail);
    assert_eq!(result.exit_status().code(), 1);
}

#[test]
fn third_candidate_is_bound_for_the_whole_run() {
    let (primary, log) = StubBackend::new("gemini");
    let primary = primary
        .reply("m1", Err(unavailable("m1")))
        .reply("m2", Err(unavailable("m2")))
        .reply("m3", Ok("EVALUATION: PASS"));
    let resolver =
        ProviderResolver::new().with_primary(Box::new(primary), models(&["m1", "m2", "m3"]), None);

    let result = Pipeline::new(resolver).run(targets(&["/", "/cart"])).unwrap();

    assert_eq!(
        result.resolved_provider,
        Some(ProviderCandidate::new(BackendKind::PrimaryVision, "m3"))
    );
    assert_eq!(calls(&log), vec!["m1", "m2", "m3", "m3"]);
}

#[test]
fn backend_failure_aborts_remaining_targets() {
    let (primary, log) = StubBackend::new("gemini");
    let primary = primary
        .reply("m1", Ok("EVALUATION: PASS"))
        .reply("m1", Err(BackendError::Transport("request timed out".into())))
        .reply("m1", Ok("EVALUATION: PASS"));
    let resolver = ProviderResolver::new().with_primary(Box::new(primary), models(&["m1"]), None);

    let err = Pipeline::new(resolver)
        .run(targets(&["/", "/cart", "/search"]))
        .unwrap_err();

    let msg = format!("{err:#}");
    assert!(msg.contains("/cart"), "{msg}");
    assert!(msg.contains("timed out"), "{msg}");
    assert_eq!(calls(&log).len(), 2);
}

#[test]
fn unconfigured_run_fails_before_any_call() {
    let err = Pipeline::new(ProviderResolver::new())
        .run(targets(&["/"]))
        .unwrap_err();
    assert!(format!("{err:#}").contains("configuration error"));
}

#[test]
fn unparseable_response_is_a_fail_not_an_error() {
    let (primary, _) = StubBackend::new("gemini");
    let primary = primary.reply("m1", Ok("I'd rather not say."));
    let resolver = ProviderResolver::new().with_primary(Box::new(primary), models(&["m1"]), None);

    let result = Pipeline::new(resolver).run(targets(&["/"])).unwrap();
    assert_eq!(result.exit_status(), ExitStatus::Fail);
    assert_eq!(result.verdicts[0].verdict.issues.len(), 1);
}

#[test]
fn report_and_summary_reflect_result() {
    let (primary, _) = StubBackend::new("gemini");
    let primary = primary
        .reply("m1", Ok("EVALUATION: FAIL\nISSUES:\n- footer — shadow — box-shadow:none"))
        .reply("m1", Ok("EVALUATION: PASS"));
    let resolver = ProviderResolver::new().with_primary(Box::new(primary), models(&["m1"]), None);
    let result = Pipeline::new(resolver).run(targets(&["/", "/cart"])).unwrap();

    let report = RunReport::new(&result, "t0".into(), "t1".into());
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["outcome"], "FAIL");
    assert_eq!(json["passed"], 1);
    assert_eq!(json["total"], 2);
    assert_eq!(json["provider"]["model"], "m1");
    assert_eq!(json["verdicts"][0]["route"], "/");
    assert_eq!(json["verdicts"][0]["issues"][0], "footer — shadow — box-shadow:none");
    assert_eq!(json["verdicts"][0]["image_sha256"].as_str().unwrap().len(), 64);

    let summary = render_summary(&result);
    assert!(summary.contains("✗ / — FAIL"));
    assert!(summary.contains("    - footer — shadow — box-shadow:none"));
    assert!(summary.contains("✓ /cart — PASS"));
    assert!(summary.contains("Passed: 1/2 | Overall: FAIL"));
}
