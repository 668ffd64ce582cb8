use std::{error::Error, path::Path};

use test_utils::check_failing_run;

const SRC_PATH: &str = "./demos/immutable_assignment.why";

#[test]
fn assigning_to_an_immutable_binding_is_fatal() -> Result<(), Box<dyn Error>> {
    check_failing_run(Path::new(SRC_PATH))
}
