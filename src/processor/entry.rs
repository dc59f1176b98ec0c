//! Generate and assemble the tiny entry-point object for one wave.

use crate::model::Wave;
use crate::runner::{CommandRunner, RunnerError, Stager};

/// Assemble a bootstrap object exporting the wave's entry symbol. The
/// assembler reads the generated source from stdin and writes the object to
/// a scratch path, which is read back as the result.
pub fn create_entry_binary(
    wave: &Wave,
    assembler: &CommandRunner,
    stager: &Stager,
) -> Result<Vec<u8>, RunnerError> {
    let source = entry_source(&wave.entry);
    let out = stager.scratch(&format!("{}-entry.o", wave.name))?;
    let args = vec!["-o".to_string(), out.display().to_string()];
    let runner = assembler.clone().with_output_file(&out);
    runner.run(source.as_bytes(), &args)
}

fn entry_source(symbol: &str) -> String {
    format!(
        "\t.text\n\
         \t.globl {symbol}\n\
         {symbol}:\n\
         \tnop\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_source_exports_the_symbol() {
        let asm = entry_source("boot");
        assert!(asm.contains(".globl boot\n"));
        assert!(asm.contains("boot:\n"));
    }
}
