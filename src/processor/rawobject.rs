//! Wrap a raw include file into a relocatable object (`ld -r -b binary`) so
//! the linker can place it like any other input.

use std::collections::HashMap;

use crate::runner::{CommandRunner, RunnerError, Stager};

/// Argument token the staged raw bytes are substituted for.
const RAW_INPUT: &str = "raw-binary-input";

/// Produce `<output_name>` on disk next to where the linker will look for it
/// and return the object bytes.
pub fn wrap_raw_object<'a>(
    data: Vec<u8>,
    output_name: &str,
    ld: &CommandRunner<'a>,
    stager: &'a Stager,
) -> Result<Vec<u8>, RunnerError> {
    let inputs = HashMap::from([(RAW_INPUT.to_string(), data)]);
    let runner = ld.clone().with_mapped_args(stager, inputs, output_name);
    let args: Vec<String> = ["-r", "-b", "binary", "-o", output_name, RAW_INPUT]
        .iter()
        .map(|s| s.to_string())
        .collect();
    runner.run(&[], &args)
}
