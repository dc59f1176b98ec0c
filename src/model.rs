use std::path::PathBuf;

use crate::cli::Cli;

/// Everything the pipeline needs, fixed once at startup. Built from the CLI
/// and passed down explicitly; nothing reads flag state ambiently.
#[derive(Debug, Clone)]
pub struct Config {
    pub spec_path: PathBuf,
    pub verbose: bool,
    pub disable_overlap_check: bool,
    /// Minimum ROM size in megabits; `None` or 0 means no tail padding.
    pub romsize_mbits: Option<u32>,
    pub fill_byte: u8,
    pub rom_path: PathBuf,
    pub elf_path: PathBuf,
    pub defines: Vec<String>,
    pub include_paths: Vec<String>,
    pub undefines: Vec<String>,
    pub cpp_command: String,
    pub as_command: String,
    pub ld_command: String,
    pub objcopy_command: String,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            spec_path: cli.spec,
            verbose: cli.verbose,
            disable_overlap_check: cli.disable_overlap_check,
            romsize_mbits: cli.romsize_mbits,
            fill_byte: cli.fill_byte,
            rom_path: cli.rom_name,
            elf_path: cli.rom_elf_name,
            defines: cli.defines,
            include_paths: cli.includes,
            undefines: cli.undefines,
            cpp_command: cli.cpp_command,
            as_command: cli.as_command,
            ld_command: cli.ld_command,
            objcopy_command: cli.objcopy_command,
        }
    }
}

/// The build specification after preprocessing and parsing: an ordered list
/// of waves, each producing one linked, binarized output.
#[derive(Debug, Clone, PartialEq)]
pub struct Spec {
    pub waves: Vec<Wave>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Wave {
    pub name: String,
    /// Entry symbol for the wave's bootstrap object.
    pub entry: String,
    pub raw_segments: Vec<RawSegment>,
}

/// A segment whose include files are wrapped into linkable objects as-is,
/// without compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSegment {
    pub name: String,
    pub includes: Vec<String>,
}
