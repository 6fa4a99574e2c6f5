//! Module graph builder
//!
//! Turns feature flags into structured imports and registrations for the
//! startup module. Both are derived from declarative `(condition, item)`
//! tables so ordering is data, not control flow.
//!
//! Registration precedence:
//! - every `*Config` entry precedes the instance that reads it
//! - when unifying, the pre-built `webServer` precedes `WebSocketServerConfig`,
//!   because its `postRegister` hook writes into that config
//! - actions come last, nothing depends on them

use crate::error::Result;
use crate::flags::FeatureFlags;

pub const CORE_MODULE: &str = "@bitbeat/core";
pub const WEB_MODULE: &str = "@bitbeat/web";
pub const WEBSOCKET_MODULE: &str = "@bitbeat/websocket";

/// Symbols imported from one source module, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportGroup {
    pub source: String,
    pub symbols: Vec<String>,
}

impl ImportGroup {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            symbols: Vec::new(),
        }
    }

    fn push(&mut self, symbol: &str) {
        if !self.symbols.iter().any(|s| s == symbol) {
            self.symbols.push(symbol.to_string());
        }
    }
}

/// One component handed to `registerBulk`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationEntry {
    /// Class symbol, or the name of an already constructed instance
    pub target: String,
    /// `true`: the framework constructs `target`; `false`: `target` is an instance
    pub create_instance: bool,
}

impl RegistrationEntry {
    pub fn create(symbol: &str) -> Self {
        Self {
            target: symbol.to_string(),
            create_instance: true,
        }
    }

    pub fn existing(instance: &str) -> Self {
        Self {
            target: instance.to_string(),
            create_instance: false,
        }
    }
}

/// Pre-registration block that shares the web server's socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifyPreamble {
    /// Local binding holding the constructed web server
    pub instance: String,
    /// Class constructed into `instance`
    pub server_class: String,
    /// Config class whose defaults receive the listening server
    pub websocket_config: String,
}

/// Everything the renderer needs to emit the startup module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleGraph {
    pub imports: Vec<ImportGroup>,
    pub registrations: Vec<RegistrationEntry>,
    pub unify_preamble: Option<UnifyPreamble>,
}

impl ModuleGraph {
    /// True when nothing gets registered (no server selected)
    pub fn is_inert(&self) -> bool {
        self.registrations.is_empty()
    }

    /// All imported symbols, flattened in import order
    pub fn imported_symbols(&self) -> Vec<&str> {
        self.imports
            .iter()
            .flat_map(|g| g.symbols.iter().map(String::as_str))
            .collect()
    }
}

/// Build the module graph for `flags`
pub fn build_graph(flags: &FeatureFlags) -> Result<ModuleGraph> {
    flags.validate()?;

    let web = flags.web_server;
    let ws = flags.websocket_server;
    let unify = flags.unify_websocket;

    // Groups appear in the order their first symbol appears here
    let import_table: [(bool, &str, &str); 8] = [
        (true, CORE_MODULE, "registerBulk"),
        // the unify hook looks the websocket config up at runtime
        (unify, CORE_MODULE, "getInstance"),
        (web, WEB_MODULE, "WebServer"),
        (web, WEB_MODULE, "WebServerConfig"),
        (flags.status_action, WEB_MODULE, "Status"),
        (flags.documentation_action, WEB_MODULE, "Documentation"),
        (ws, WEBSOCKET_MODULE, "WebSocketServer"),
        (ws, WEBSOCKET_MODULE, "WebSocketServerConfig"),
    ];

    let mut imports: Vec<ImportGroup> = Vec::new();
    for (_, source, symbol) in import_table.iter().filter(|(on, _, _)| *on) {
        match imports.iter_mut().find(|g| g.source == *source) {
            Some(group) => group.push(symbol),
            None => {
                let mut group = ImportGroup::new(source);
                group.push(symbol);
                imports.push(group);
            }
        }
    }

    let registration_table = [
        (web, RegistrationEntry::create("WebServerConfig")),
        (web && !unify, RegistrationEntry::create("WebServer")),
        (unify, RegistrationEntry::existing("webServer")),
        (ws, RegistrationEntry::create("WebSocketServerConfig")),
        (ws, RegistrationEntry::create("WebSocketServer")),
        (flags.status_action, RegistrationEntry::create("Status")),
        (flags.documentation_action, RegistrationEntry::create("Documentation")),
    ];

    let registrations: Vec<RegistrationEntry> = registration_table
        .into_iter()
        .filter_map(|(on, entry)| on.then_some(entry))
        .collect();

    let unify_preamble = unify.then(|| UnifyPreamble {
        instance: "webServer".to_string(),
        server_class: "WebServer".to_string(),
        websocket_config: "WebSocketServerConfig".to_string(),
    });

    tracing::debug!(
        imports = imports.len(),
        registrations = registrations.len(),
        unify,
        "built module graph"
    );

    Ok(ModuleGraph {
        imports,
        registrations,
        unify_preamble,
    })
}
