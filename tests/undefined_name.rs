use std::{error::Error, path::Path};

use test_utils::check_failing_run;

const SRC_PATH: &str = "./demos/undefined_name.why";

#[test]
fn referencing_an_undefined_name_is_fatal() -> Result<(), Box<dyn Error>> {
    check_failing_run(Path::new(SRC_PATH))
}
