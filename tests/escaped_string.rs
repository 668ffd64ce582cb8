use std::{error::Error, path::Path};

use test_utils::{check_run, Expected};

const SRC_PATH: &str = "./demos/escaped_string.why";
const EXPECTED: Expected = Expected {
    stdout: "hello\nworld",
    stderr: "",
};

#[test]
fn printed_string_keeps_its_escaped_newline() -> Result<(), Box<dyn Error>> {
    check_run(Path::new(SRC_PATH), EXPECTED)
}
