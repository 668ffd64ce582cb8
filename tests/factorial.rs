use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./demos/factorial.why";
const EXPECTED: Expected = Expected {
    stdout: "120",
    stderr: "",
};

#[test]
fn recursive_factorial_of_five_is_120() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}
