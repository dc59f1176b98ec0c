//! End-to-end pipeline runs against a stub toolchain.
//!
//! The stubs mimic the call shapes of cpp/as/ld/objcopy with plain `sh`
//! scripts: the preprocessor echoes stdin, the assembler writes its stdin to
//! the `-o` path, the linker concatenates its existing-file inputs into the
//! `-o` path, and objcopy copies input to output.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use rombuild::build;
use rombuild::model::Config;
use rombuild::rom::CODE_START;

/// Concatenate every argument that names an existing file (minus the `-o`
/// target itself) into the `-o` target. Covers both `ld` call shapes:
/// `-r -b binary -o out in` and `-o elf -T script entry objs...`.
const LD_BODY: &str = r#"
out=; prev=
for a in "$@"; do
  [ "$prev" = "-o" ] && out=$a
  prev=$a
done
: > "$out"
prev=
for a in "$@"; do
  if [ "$prev" != "-o" ] && [ "$a" != "$out" ] && [ -f "$a" ]; then
    cat "$a" >> "$out"
  fi
  prev=$a
done
"#;

fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

fn stub_config(dir: &Path, spec_path: &Path) -> Config {
    let cpp = write_stub(dir, "fake-cpp", "exec cat");
    let assembler = write_stub(dir, "fake-as", r#"cat > "$2""#);
    let ld = write_stub(dir, "fake-ld", LD_BODY);
    let objcopy = write_stub(dir, "fake-objcopy", r#"cp "$3" "$4""#);

    Config {
        spec_path: spec_path.to_path_buf(),
        verbose: false,
        disable_overlap_check: false,
        romsize_mbits: None,
        fill_byte: 0xFF,
        rom_path: dir.join("rom.n64"),
        elf_path: dir.join("rom.out"),
        defines: Vec::new(),
        include_paths: Vec::new(),
        undefines: Vec::new(),
        cpp_command: cpp.display().to_string(),
        as_command: assembler.display().to_string(),
        ld_command: ld.display().to_string(),
        objcopy_command: objcopy.display().to_string(),
    }
}

#[test]
fn single_wave_lands_at_code_start() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path().join("game.spec");
    fs::write(&spec, "beginwave\n  name \"demo\"\n  entry boot\nendwave\n").unwrap();
    let config = stub_config(dir.path(), &spec);

    build(&config).unwrap();

    let rom = fs::read(&config.rom_path).unwrap();
    // everything before the code start is untouched fill
    assert!(rom[..CODE_START].iter().all(|&b| b == 0xFF));
    // the code-start bytes are exactly the wave's binarized output, which
    // the stub objcopy made identical to the linked ELF left on disk
    let elf = fs::read(&config.elf_path).unwrap();
    assert!(!elf.is_empty());
    assert_eq!(&rom[CODE_START..], &elf[..]);
    // the stub pipeline carries the entry symbol through ldscript and asm
    let tail = String::from_utf8_lossy(&rom[CODE_START..]);
    assert!(tail.contains("ENTRY(boot)"), "{tail}");
    assert!(tail.contains(".globl boot"), "{tail}");
}

#[test]
fn raw_includes_reach_the_linked_image() {
    let dir = tempfile::tempdir().unwrap();
    let asset = dir.path().join("font.bin");
    fs::write(&asset, b"RAWFONTDATA").unwrap();

    let spec = dir.path().join("game.spec");
    fs::write(
        &spec,
        format!(
            "beginwave\n  name \"demo\"\n  beginseg\n    name \"assets\"\n    flags RAW\n    include \"{}\"\n  endseg\nendwave\n",
            asset.display()
        ),
    )
    .unwrap();
    let config = stub_config(dir.path(), &spec);

    build(&config).unwrap();

    // the wrapped object was produced next to the include
    let wrapped = fs::read(format!("{}.o", asset.display())).unwrap();
    assert_eq!(wrapped, b"RAWFONTDATA");

    let rom = fs::read(&config.rom_path).unwrap();
    let tail = String::from_utf8_lossy(&rom[CODE_START..]);
    assert!(tail.contains("RAWFONTDATA"), "{tail}");
}

#[test]
fn later_waves_overwrite_the_code_start_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path().join("game.spec");
    fs::write(
        &spec,
        "beginwave\n  name \"one\"\n  entry boot1\nendwave\n\
         beginwave\n  name \"two\"\n  entry boot2\nendwave\n",
    )
    .unwrap();
    let config = stub_config(dir.path(), &spec);

    build(&config).unwrap();

    let rom = fs::read(&config.rom_path).unwrap();
    let tail = String::from_utf8_lossy(&rom[CODE_START..]);
    assert!(tail.contains("boot2"), "{tail}");
    assert!(!tail.contains("boot1"), "{tail}");
}

#[test]
fn romsize_gives_the_file_a_padded_tail() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path().join("game.spec");
    fs::write(&spec, "# no waves\n").unwrap();
    let mut config = stub_config(dir.path(), &spec);
    config.romsize_mbits = Some(8);

    build(&config).unwrap();

    // 8 Mbit -> 1,000,000 bytes, plus the single pad byte written there
    let len = fs::metadata(&config.rom_path).unwrap().len();
    assert_eq!(len, 1_000_001);
}

#[test]
fn missing_spec_file_fails_with_open_context() {
    let dir = tempfile::tempdir().unwrap();
    let config = stub_config(dir.path(), &dir.path().join("no-such.spec"));

    let err = build(&config).unwrap_err();
    assert!(format!("{err:#}").contains("could not open spec"), "{err:#}");
}

#[test]
fn failing_tool_aborts_the_run_with_its_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let spec = dir.path().join("game.spec");
    fs::write(&spec, "beginwave\n  name \"demo\"\nendwave\n").unwrap();
    let mut config = stub_config(dir.path(), &spec);
    let broken = write_stub(dir.path(), "broken-as", "echo as exploded >&2; exit 1");
    config.as_command = broken.display().to_string();

    let err = build(&config).unwrap_err();
    let chain = format!("{err:#}");
    assert!(chain.contains("could not create entry binary"), "{chain}");
    assert!(chain.contains("as exploded"), "{chain}");
    // no ROM image is produced when a wave fails
    assert!(!config.rom_path.exists());
}
