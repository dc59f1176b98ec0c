//! Flatten a linked object to the raw bytes that go into the image
//! (`objcopy -O binary`).

use std::collections::HashMap;

use crate::runner::{CommandRunner, RunnerError, Stager};

const LINKED_TOKEN: &str = "linked-object";

pub fn binarize<'a>(
    linked: Vec<u8>,
    wave_name: &str,
    objcopy: &CommandRunner<'a>,
    stager: &'a Stager,
) -> Result<Vec<u8>, RunnerError> {
    let out = stager.scratch(&format!("{wave_name}.bin"))?;
    let out_arg = out.display().to_string();

    let inputs = HashMap::from([(LINKED_TOKEN.to_string(), linked)]);
    let args: Vec<String> = vec![
        "-O".into(),
        "binary".into(),
        LINKED_TOKEN.into(),
        out_arg.clone(),
    ];

    let runner = objcopy.clone().with_mapped_args(stager, inputs, out_arg);
    runner.run(&[], &args)
}
