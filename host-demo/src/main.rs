use bridge::{Bridge, FileSource, TracingHooks, DEFAULT_ENTRY, DEFAULT_MEMORY_PAGES};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "host-demo",
    about = "Tiny host runner for emscripten-style wasm modules."
)]
struct Args {
    /// Path to the .wasm module
    path: PathBuf,

    /// Entry export to invoke
    #[arg(short, long, default_value = DEFAULT_ENTRY)]
    entry: String,

    /// Minimum import memory size in 64 KiB pages
    #[arg(long, default_value_t = DEFAULT_MEMORY_PAGES)]
    pages: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let bridge = Bridge::with_memory_pages(Arc::new(TracingHooks), args.pages)?;
    let ran = bridge.run_from_entry(&FileSource::new(&args.path), &args.entry)?;

    println!(
        "✅ call finished: module={} entry=`{}` bytes={}",
        args.path.display(),
        args.entry,
        ran
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_defaults() {
        let args = Args::try_parse_from(["host-demo", "module.wasm"]).unwrap();
        assert_eq!(args.entry, DEFAULT_ENTRY);
        assert_eq!(args.pages, DEFAULT_MEMORY_PAGES);
        assert_eq!(args.path, PathBuf::from("module.wasm"));
    }

    #[test]
    fn parses_entry_and_pages_overrides() {
        let args = Args::try_parse_from(["host-demo", "m.wasm", "--entry", "tick", "--pages", "4"])
            .unwrap();
        assert_eq!(args.entry, "tick");
        assert_eq!(args.pages, 4);
    }
}
