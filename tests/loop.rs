use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./demos/loop.why";
const EXPECTED: Expected = Expected {
    stdout: "5",
    stderr: "",
};

#[test]
fn while_loop_counts_up_to_five() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}
