use std::process::Command;

const WHY_PATH: &str = "./target/debug/why";

#[test]
fn running_without_a_source_argument_fails_with_a_usage_line() {
    let output = Command::new(WHY_PATH).output().expect("why should spawn");

    assert!(
        !output.status.success(),
        "why should exit non-zero when no source file is given"
    );
    let stderr = String::from_utf8(output.stderr).expect("stderr should be valid utf8");
    assert!(stderr.contains("Usage"), "expected a usage line, got: {stderr}");
}
