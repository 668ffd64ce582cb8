use std::{error::Error, path::Path};

use test_utils::check_failing_run;

const SRC_PATH: &str = "./demos/does_not_exist.why";

#[test]
fn nonexistent_source_path_is_reported_and_fails() -> Result<(), Box<dyn Error>> {
    check_failing_run(Path::new(SRC_PATH))
}
