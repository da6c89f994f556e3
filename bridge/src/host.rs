//! wasmtime-backed host that supplies the emscripten-style import surface.

use crate::hooks::{HostHooks, LogLevel};
use crate::source::ModuleSource;
use crate::text;
use crate::{Error, Result};
use std::sync::Arc;
use wasmtime::{
    Caller, Config, Engine, Global, GlobalType, Linker, Memory, MemoryType, Module, Mutability,
    OptLevel, Ref, RefType, Store, Table, TableType, Val, ValType,
};

/// Default minimum size of the import memory, in 64 KiB pages.
pub const DEFAULT_MEMORY_PAGES: u32 = 1024;

/// Entry export invoked after instantiation.
pub const DEFAULT_ENTRY: &str = "main";

/// Per-store state shared with the host callbacks. Holds the one live handle
/// the callbacks need instead of any ambient global.
struct HostCtx {
    hooks: Arc<dyn HostHooks>,
    memory: Option<Memory>,
}

/// One-shot host for emscripten-style modules.
///
/// Each run gets a fresh store: compile the binary, wire the `env` imports,
/// instantiate, call the entry once. Nothing is cached between runs.
pub struct Bridge {
    engine: Engine,
    hooks: Arc<dyn HostHooks>,
    memory_pages: u32,
}

impl Bridge {
    /// Creates a bridge with the default import memory size.
    pub fn new(hooks: Arc<dyn HostHooks>) -> Result<Self> {
        Self::with_memory_pages(hooks, DEFAULT_MEMORY_PAGES)
    }

    /// Creates a bridge whose import memory starts at `pages` 64 KiB pages.
    pub fn with_memory_pages(hooks: Arc<dyn HostHooks>, pages: u32) -> Result<Self> {
        let mut config = Config::new();
        config.cranelift_opt_level(OptLevel::Speed);
        let engine = Engine::new(&config).map_err(Error::Engine)?;
        Ok(Self {
            engine,
            hooks,
            memory_pages: pages,
        })
    }

    /// Fetches module bytes from `source` and runs them. A source failure is
    /// fatal and produces no guest output. Returns the module size that ran.
    pub fn run_from(&self, source: &dyn ModuleSource) -> Result<usize> {
        self.run_from_entry(source, DEFAULT_ENTRY)
    }

    /// Same as [`run_from`](Self::run_from) with an explicit entry name.
    pub fn run_from_entry(&self, source: &dyn ModuleSource, entry: &str) -> Result<usize> {
        let bytes = source.fetch()?;
        self.load_and_run_entry(&bytes, entry)?;
        Ok(bytes.len())
    }

    /// Compiles, instantiates, and invokes the `main` export of `bytes`.
    pub fn load_and_run(&self, bytes: &[u8]) -> Result<()> {
        self.load_and_run_entry(bytes, DEFAULT_ENTRY)
    }

    /// Same as [`load_and_run`](Self::load_and_run) with an explicit entry name.
    pub fn load_and_run_entry(&self, bytes: &[u8], entry: &str) -> Result<()> {
        let module = Module::from_binary(&self.engine, bytes).map_err(Error::Compile)?;

        let mut store = Store::new(
            &self.engine,
            HostCtx {
                hooks: Arc::clone(&self.hooks),
                memory: None,
            },
        );

        let memory = Memory::new(&mut store, MemoryType::new(self.memory_pages, None))
            .map_err(Error::Engine)?;
        store.data_mut().memory = Some(memory);

        let table = Table::new(
            &mut store,
            TableType::new(RefType::FUNCREF, 0, None),
            Ref::Func(None),
        )
        .map_err(Error::Engine)?;
        let base = Global::new(
            &mut store,
            GlobalType::new(ValType::I32, Mutability::Const),
            Val::I32(0),
        )
        .map_err(Error::Engine)?;

        let mut linker: Linker<HostCtx> = Linker::new(&self.engine);
        linker
            .define(&store, "env", "memory", memory)
            .map_err(Error::Engine)?;
        linker
            .define(&store, "env", "table", table)
            .map_err(Error::Engine)?;
        linker
            .define(&store, "env", "__memory_base", base)
            .map_err(Error::Engine)?;
        linker
            .define(&store, "env", "__table_base", base)
            .map_err(Error::Engine)?;
        linker
            .func_wrap(
                "env",
                "emscripten_resize_heap",
                |caller: Caller<'_, HostCtx>, requested: i32| -> i32 {
                    caller.data().hooks.resize_heap(requested as u32)
                },
            )
            .map_err(Error::Engine)?;
        linker
            .func_wrap(
                "env",
                "__handle_stack_overflow",
                |caller: Caller<'_, HostCtx>| caller.data().hooks.stack_overflow(),
            )
            .map_err(Error::Engine)?;
        linker
            .func_wrap("env", "console_logger", host_console_logger)
            .map_err(Error::Engine)?;

        let instance = linker
            .instantiate(&mut store, &module)
            .map_err(Error::Instantiate)?;

        let entry_fn = instance
            .get_typed_func::<(), ()>(&mut store, entry)
            .map_err(|_| Error::EntryNotFound(entry.to_string()))?;
        entry_fn
            .call(&mut store, ())
            .map_err(|trap| Error::Trap(entry.to_string(), trap))
    }
}

/// Logging import: decode the `(ptr, len)` span out of the guest's memory and
/// hand it to the hooks. Cannot fail; a bad span decodes lossily or empty.
fn host_console_logger(mut caller: Caller<'_, HostCtx>, level: i32, ptr: i32, len: i32) {
    // Prefer the guest's exported memory, fall back to the import memory.
    let memory = caller
        .get_export("memory")
        .and_then(|export| export.into_memory())
        .or_else(|| caller.data().memory);
    let Some(memory) = memory else {
        return;
    };

    // The view is re-derived on every call; the guest may have grown memory
    // since the last one and a stale view would read a dead buffer.
    let message = {
        let data = memory.data(&caller);
        text::decode_span(data, ptr as u32 as usize, len as u32 as usize).into_owned()
    };
    caller.data().hooks.log(LogLevel::from_raw(level), &message);
}
