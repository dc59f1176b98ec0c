pub mod cli;
pub mod model;
pub mod parser;
pub mod processor;
pub mod rom;
pub mod runner;

use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};

use anyhow::{Context, Result};
use clap::Parser;

use model::Config;
use rom::RomImage;
use runner::{CommandRunner, Stager};

pub fn run() -> Result<()> {
    let config = Config::from(cli::Cli::parse());

    let level = if config.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new().filter_level(level).try_init().ok();

    build(&config)
}

/// Drive the whole pipeline for one configuration. Strictly sequential and
/// fail-fast: the first stage error aborts the run.
pub fn build(config: &Config) -> Result<()> {
    // Staged temp files live here and are removed on every exit path.
    let stager = Stager::new().context("could not create staging directory")?;

    let cpp = CommandRunner::exec(&config.cpp_command);
    let assembler = CommandRunner::exec(&config.as_command);
    let ld = CommandRunner::exec(&config.ld_command);
    let objcopy = CommandRunner::exec(&config.objcopy_command);

    // 1. ── Acquire, preprocess, parse ─────────────────────────────────
    let source = fs::read(&config.spec_path)
        .with_context(|| format!("could not open spec {}", config.spec_path.display()))?;

    let text = processor::preprocess::preprocess(
        &source,
        &cpp,
        &config.include_paths,
        &config.defines,
        &config.undefines,
    )
    .context("could not preprocess spec")?;

    let spec = parser::parse_spec(&text).context("could not parse spec")?;
    log::debug!("spec has {} wave(s)", spec.waves.len());

    // 2. ── Build each wave, in spec order ─────────────────────────────
    let mut image = RomImage::new_blank(config.fill_byte);
    for wave in &spec.waves {
        log::info!("Building wave `{}`", wave.name);

        for seg in &wave.raw_segments {
            for include in &seg.includes {
                let data = fs::read(include)
                    .with_context(|| format!("could not open include {include}"))?;
                processor::rawobject::wrap_raw_object(data, &format!("{include}.o"), &ld, &stager)
                    .with_context(|| format!("could not wrap raw object {include}"))?;
            }
        }

        let entry_object = processor::entry::create_entry_binary(wave, &assembler, &stager)
            .with_context(|| format!("could not create entry binary for wave `{}`", wave.name))?;

        let linked = processor::link::link_wave(wave, entry_object, config, &ld, &stager)
            .with_context(|| format!("could not link wave `{}`", wave.name))?;

        let flat = processor::binarize::binarize(linked, &wave.name, &objcopy, &stager)
            .with_context(|| format!("could not binarize wave `{}`", wave.name))?;

        // Every wave lands at the fixed code-start offset; with more than
        // one wave the last write wins.
        image.write_at(&flat, rom::CODE_START);
    }

    // 3. ── Finalize the output file ───────────────────────────────────
    let mut out = File::create(&config.rom_path)
        .with_context(|| format!("could not create ROM {}", config.rom_path.display()))?;

    if let Some(mbits) = config.romsize_mbits.filter(|m| *m > 0) {
        // One zero byte at the minimum size gives the image a padded tail
        // without filling it.
        let min_size = 1_000_000 * u64::from(mbits) / 8;
        out.seek(SeekFrom::Start(min_size))
            .and_then(|_| out.write_all(&[0]))
            .context("could not pad ROM")?;
        out.rewind().context("could not pad ROM")?;
    }

    image.save(&mut out).context("could not write ROM")?;
    Ok(())
}
