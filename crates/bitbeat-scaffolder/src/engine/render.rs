//! Dialect renderer for the startup module
//!
//! Both dialects share one body; they only differ in how symbols are pulled
//! in and how the startup function is exported.

use super::format::format_source;
use super::graph::{ImportGroup, ModuleGraph, RegistrationEntry, UnifyPreamble};
use crate::flags::Dialect;

fn import_line(group: &ImportGroup, dialect: Dialect) -> String {
    let symbols = group.symbols.join(", ");
    match dialect {
        Dialect::TypeScript => format!("import {{ {} }} from '{}';", symbols, group.source),
        Dialect::JavaScript => format!("const {{ {} }} = require('{}');", symbols, group.source),
    }
}

fn export_header(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::TypeScript => "export default async () => {",
        Dialect::JavaScript => "module.exports = async () => {",
    }
}

fn preamble_lines(preamble: &UnifyPreamble, out: &mut Vec<String>) {
    let UnifyPreamble {
        instance,
        server_class,
        websocket_config,
    } = preamble;

    out.extend([
        format!("const {} = new {}();", instance, server_class),
        String::new(),
        "// attach the websocket server to the web server".to_string(),
        format!("{}.postRegister = () => {{", instance),
        format!("const webSocketServerConfig = getInstance({});", websocket_config),
        String::new(),
        "if (!webSocketServerConfig) {".to_string(),
        "throw new Error('Could not find websocket config.');".to_string(),
        "}".to_string(),
        String::new(),
        format!("const server = {}.runtime?.server;", instance),
        String::new(),
        "if (!server) {".to_string(),
        "throw new Error('Web server is not listening yet.');".to_string(),
        "}".to_string(),
        String::new(),
        "webSocketServerConfig.default = {".to_string(),
        "server,".to_string(),
        "};".to_string(),
        "};".to_string(),
        String::new(),
    ]);
}

fn registration_lines(entry: &RegistrationEntry, out: &mut Vec<String>) {
    out.push("{".to_string());
    out.push(format!("instance: {},", entry.target));
    if entry.create_instance {
        out.push("createInstance: true,".to_string());
    }
    out.push("},".to_string());
}

/// Lines of the startup function body, shared by both dialects
fn body_lines(graph: &ModuleGraph) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(preamble) = &graph.unify_preamble {
        preamble_lines(preamble, &mut out);
    }

    out.push("await registerBulk(".to_string());
    if graph.registrations.is_empty() {
        out.push("new Set([]),".to_string());
    } else {
        out.push("new Set([".to_string());
        for entry in &graph.registrations {
            registration_lines(entry, &mut out);
        }
        out.push("]),".to_string());
    }
    out.push(");".to_string());

    out
}

/// Render `graph` as a formatted startup module in `dialect`
pub fn render(graph: &ModuleGraph, dialect: Dialect) -> String {
    let mut lines: Vec<String> = graph
        .imports
        .iter()
        .map(|group| import_line(group, dialect))
        .collect();

    lines.push(String::new());
    lines.push(export_header(dialect).to_string());
    lines.extend(body_lines(graph));
    lines.push("};".to_string());

    tracing::debug!(%dialect, lines = lines.len(), "rendered startup module");
    format_source(&lines.join("\n"))
}
