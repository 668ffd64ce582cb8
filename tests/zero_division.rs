use std::{error::Error, path::Path};

use test_utils::check_failing_run;

const SRC_PATH: &str = "./demos/zero_division.why";

#[test]
fn division_by_zero_is_fatal() -> Result<(), Box<dyn Error>> {
    check_failing_run(Path::new(SRC_PATH))
}
