use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Build specification file
    pub spec: PathBuf,

    /// Print verbose information
    #[arg(short = 'd', long)]
    pub verbose: bool,

    /// Disable checks for overlapping sections
    #[arg(short = 'o', long = "disable_overlapping_section_checks")]
    pub disable_overlap_check: bool,

    /// ROM size (Mbit)
    #[arg(short = 's', long = "romsize")]
    pub romsize_mbits: Option<u32>,

    /// Fill byte for unwritten regions of the ROM image
    #[arg(short = 'f', long = "filldata_byte", default_value_t = 0)]
    pub fill_byte: u8,

    /// Output ROM image filename
    #[arg(short = 'r', long = "rom_name", default_value = "rom.n64")]
    pub rom_name: PathBuf,

    /// Output linked ELF filename
    #[arg(short = 'e', long = "rom_elf_name", default_value = "rom.out")]
    pub rom_elf_name: PathBuf,

    /// Macro definition for the preprocessor
    #[arg(short = 'D', long = "define")]
    pub defines: Vec<String>,

    /// Header search path for the preprocessor
    #[arg(short = 'I', long = "include")]
    pub includes: Vec<String>,

    /// Macro to undefine in the preprocessor
    #[arg(short = 'U', long = "undefine")]
    pub undefines: Vec<String>,

    /// cpp command to use
    #[arg(long = "cpp_command", default_value = "mips64-elf-gcc")]
    pub cpp_command: String,

    /// as command to use
    #[arg(long = "as_command", default_value = "mips64-elf-as")]
    pub as_command: String,

    /// ld command to use
    #[arg(long = "ld_command", default_value = "mips64-elf-ld")]
    pub ld_command: String,

    /// objcopy command to use
    #[arg(long = "objcopy_command", default_value = "mips64-elf-objcopy")]
    pub objcopy_command: String,
}
