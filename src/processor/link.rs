//! Link one wave: entry object plus every wrapped raw object, placed by a
//! generated linker script, out to the configured ELF path.

use std::collections::HashMap;

use crate::model::{Config, Wave};
use crate::runner::{CommandRunner, RunnerError, Stager};

const SCRIPT_TOKEN: &str = "wave-ldscript";
const ENTRY_TOKEN: &str = "wave-entry-object";

/// Where the console maps the cartridge's code segment.
const BOOT_ADDRESS: u32 = 0x8000_0400;

pub fn link_wave<'a>(
    wave: &Wave,
    entry_object: Vec<u8>,
    config: &Config,
    ld: &CommandRunner<'a>,
    stager: &'a Stager,
) -> Result<Vec<u8>, RunnerError> {
    let script = linker_script(&wave.entry);
    let inputs = HashMap::from([
        (SCRIPT_TOKEN.to_string(), script.into_bytes()),
        (ENTRY_TOKEN.to_string(), entry_object),
    ]);

    let elf = config.elf_path.display().to_string();
    let mut args: Vec<String> = vec![
        "-o".into(),
        elf.clone(),
        "-T".into(),
        SCRIPT_TOKEN.into(),
        ENTRY_TOKEN.into(),
    ];
    for seg in &wave.raw_segments {
        for include in &seg.includes {
            args.push(format!("{include}.o"));
        }
    }
    if config.disable_overlap_check {
        args.push("--no-check-sections".into());
    }

    let runner = ld.clone().with_mapped_args(stager, inputs, elf);
    runner.run(&[], &args)
}

fn linker_script(entry: &str) -> String {
    format!(
        "ENTRY({entry})\n\
         SECTIONS {{\n\
         \t. = 0x{BOOT_ADDRESS:08x};\n\
         \t.text : {{ *(.text*) *(.data*) *(.rodata*) }}\n\
         \t/DISCARD/ : {{ *(.MIPS.abiflags) *(.reginfo) }}\n\
         }}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linker_script_sets_entry_and_base_address() {
        let script = linker_script("boot");
        assert!(script.contains("ENTRY(boot)"));
        assert!(script.contains("0x80000400"));
    }
}
