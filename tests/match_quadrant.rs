use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./demos/match_quadrant.why";
const EXPECTED: Expected = Expected {
    stdout: "10",
    stderr: "",
};

#[test]
fn quadrant_predicate_wins_over_default() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}
