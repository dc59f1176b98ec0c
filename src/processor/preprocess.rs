//! Run the spec source through cpp before parsing, so specs can use
//! `#define`/`#ifdef`/`#include` freely.

use anyhow::{Context, Result};

use crate::runner::CommandRunner;

/// Feed `source` to the preprocessor on stdin and return the expanded text.
pub fn preprocess(
    source: &[u8],
    cpp: &CommandRunner,
    include_paths: &[String],
    defines: &[String],
    undefines: &[String],
) -> Result<String> {
    let args = cpp_args(include_paths, defines, undefines);
    let out = cpp.run(source, &args)?;
    String::from_utf8(out).context("preprocessor produced non-UTF-8 output")
}

/// `-P` keeps linemarkers out of the text the parser sees; the `-I`/`-D`/`-U`
/// lists are forwarded verbatim; `-` reads the spec from stdin.
fn cpp_args(include_paths: &[String], defines: &[String], undefines: &[String]) -> Vec<String> {
    let mut args: Vec<String> = ["-E", "-P", "-x", "assembler-with-cpp"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    args.extend(include_paths.iter().map(|p| format!("-I{p}")));
    args.extend(defines.iter().map(|d| format!("-D{d}")));
    args.extend(undefines.iter().map(|u| format!("-U{u}")));
    args.push("-".into());
    args
}
