//! Shared loading helpers for the `vcdscope` commands.
//!
//! Resolves the configuration, reads (and if needed decompresses) a dump,
//! parses it and reports recoverable findings on stderr.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use flate2::read::GzDecoder;
use vcdscope_common::ContentHash;
use vcdscope_config::{discover_config, ViewerConfig};
use vcdscope_diagnostics::TerminalRenderer;
use vcdscope_source::SourceText;
use vcdscope_vcd::{parse_with, ParseOptions, ParseReport, WaveformStore};

use crate::error::CliError;
use crate::GlobalArgs;

/// A parsed dump and what is known about where it came from.
#[derive(Clone, Debug)]
pub struct LoadedWaveform {
    /// The file the dump was read from.
    pub path: PathBuf,
    /// The populated store, shared with any view over it.
    pub store: Arc<WaveformStore>,
    /// Warnings and unresolved references from the parse.
    pub report: ParseReport,
    /// Hash of the decompressed dump text.
    pub hash: ContentHash,
}

/// Loads the configuration named by `--config`, or `./vcdscope.toml`.
pub fn load_config(global: &GlobalArgs) -> Result<ViewerConfig, CliError> {
    let dir = std::env::current_dir()?;
    let explicit = global.config.as_deref().map(Path::new);
    let (config, source) = discover_config(explicit, &dir)?;
    if global.verbose {
        if let Some(path) = source {
            eprintln!("   Config {}", path.display());
        }
    }
    Ok(config)
}

/// Reads a dump into memory, decompressing it when the name ends in `.gz`.
pub fn read_waveform(path: &Path) -> Result<String, CliError> {
    let read_err = |source| CliError::Read {
        path: path.display().to_string(),
        source,
    };
    let file = File::open(path).map_err(read_err)?;
    let mut text = String::new();
    let gzipped = path.extension().is_some_and(|ext| ext == "gz");
    if gzipped {
        GzDecoder::new(BufReader::new(file))
            .read_to_string(&mut text)
            .map_err(read_err)?;
    } else {
        BufReader::new(file)
            .read_to_string(&mut text)
            .map_err(read_err)?;
    }
    Ok(text)
}

/// Parses dump text that came from `path`.
pub fn parse_text(
    path: &Path,
    text: &str,
    options: &ParseOptions,
    global: &GlobalArgs,
) -> Result<LoadedWaveform, CliError> {
    let name = path.display().to_string();
    let parsed = parse_with(text, options).map_err(|source| CliError::Parse {
        path: name.clone(),
        source,
    })?;
    let hash = ContentHash::of_text(text);

    if !global.quiet && !parsed.report.diagnostics.is_empty() {
        let renderer = TerminalRenderer::new(global.color, terminal_width());
        let source = SourceText::new(&name, text);
        eprint!("{}", renderer.render_all(&parsed.report.diagnostics, &source));
    }
    if global.verbose {
        let store = &parsed.store;
        eprintln!(
            "   Parsed {name}: {} signals, {} changes, max time #{}, hash {}",
            store.signal_count(),
            store.change_count(),
            store.max_time(),
            hash.short()
        );
    }

    Ok(LoadedWaveform {
        path: path.to_path_buf(),
        store: Arc::new(parsed.store),
        report: parsed.report,
        hash,
    })
}

/// Reads and parses the dump at `path`.
pub fn load_waveform(
    path: &Path,
    options: &ParseOptions,
    global: &GlobalArgs,
) -> Result<LoadedWaveform, CliError> {
    if !global.quiet {
        eprintln!("   Loading {}", path.display());
    }
    let text = read_waveform(path)?;
    parse_text(path, &text, options, global)
}

fn terminal_width() -> u16 {
    crossterm::terminal::size().map(|(cols, _)| cols).unwrap_or(80)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    const DUMP: &str = "\
$var wire 1 ! clk $end
$enddefinitions $end
#0
0!
#5
1!
";

    fn quiet() -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: None,
        }
    }

    #[test]
    fn reads_plain_and_gzipped() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("a.vcd");
        std::fs::write(&plain, DUMP).unwrap();

        let gz = dir.path().join("a.vcd.gz");
        let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        encoder.write_all(DUMP.as_bytes()).unwrap();
        encoder.finish().unwrap();

        assert_eq!(read_waveform(&plain).unwrap(), DUMP);
        assert_eq!(read_waveform(&gz).unwrap(), DUMP);
    }

    #[test]
    fn corrupt_gzip_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let gz = dir.path().join("bad.vcd.gz");
        std::fs::write(&gz, DUMP).unwrap();
        assert!(matches!(read_waveform(&gz), Err(CliError::Read { .. })));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read_waveform(Path::new("/nonexistent/dump.vcd")).unwrap_err();
        assert!(err.to_string().starts_with("cannot read /nonexistent/dump.vcd"));
    }

    #[test]
    fn load_hashes_and_shares_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.vcd");
        std::fs::write(&path, DUMP).unwrap();
        let loaded = load_waveform(&path, &ParseOptions::default(), &quiet()).unwrap();
        assert_eq!(loaded.store.max_time(), 5);
        assert_eq!(loaded.hash, ContentHash::of_text(DUMP));
        assert!(loaded.report.is_clean());
    }

    #[test]
    fn parse_error_names_the_file() {
        let err = parse_text(
            Path::new("broken.vcd"),
            "$var wire 1 ! clk $end\n",
            &ParseOptions::default(),
            &quiet(),
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Parse { .. }));
        assert!(err.to_string().starts_with("broken.vcd:"));
    }
}
