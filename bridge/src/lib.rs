//! Host bridge for emscripten-style WebAssembly modules.
//!
//! Loads a compiled module, supplies the import surface it expects (linear
//! memory, an indirect call table, heap/stack stubs, and a structured logging
//! callback), and fires its `main` entry point once. The flow is strictly
//! linear: fetch bytes, compile, instantiate, invoke, done.

pub mod hooks;
pub mod host;
pub mod source;
pub mod text;

pub use hooks::{HostHooks, LogLevel, TracingHooks};
pub use host::{Bridge, DEFAULT_ENTRY, DEFAULT_MEMORY_PAGES};
pub use source::{FileSource, ModuleSource, StaticSource};

/// Result alias used across the bridge.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure cases for a one-shot run. All are fatal; nothing is retried.
/// Malformed guest text is never an error anywhere in the bridge — logging
/// decodes lossily so a bad span cannot take the host down.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The module bytes could not be fetched.
    #[error("module source unavailable")]
    Source(#[source] std::io::Error),
    /// The engine could not be configured.
    #[error("engine initialization failed")]
    Engine(#[source] anyhow::Error),
    /// The binary was rejected at compile time.
    #[error("module failed to compile")]
    Compile(#[source] anyhow::Error),
    /// An import could not be satisfied, or instantiation itself trapped.
    #[error("module failed to instantiate")]
    Instantiate(#[source] anyhow::Error),
    /// The requested entry export is missing or has the wrong signature.
    #[error("entry point `{0}` not found")]
    EntryNotFound(String),
    /// The entry point trapped while running.
    #[error("entry point `{0}` trapped")]
    Trap(String, #[source] anyhow::Error),
}
