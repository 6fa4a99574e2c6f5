//! create-bitbeat - Project scaffolding for bitbeat servers

use anyhow::Result;
use bitbeat_scaffolder::config::Answers;
use bitbeat_scaffolder::tui::CreateArgs;
use bitbeat_scaffolder::{FeatureFlags, ProductConfig};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// bitbeat product configuration
#[derive(Clone)]
pub struct BitbeatConfig;

impl ProductConfig for BitbeatConfig {
    fn name(&self) -> &'static str {
        "create-bitbeat"
    }

    fn display_name(&self) -> &'static str {
        "bitbeat"
    }

    fn default_registry_url(&self) -> &'static str {
        "https://registry.npmjs.org"
    }

    fn registry_url_env(&self) -> &'static str {
        "BITBEAT_REGISTRY_URL"
    }

    fn docs_url(&self) -> &'static str {
        "https://github.com/bitbeatjs/bitbeat"
    }

    fn cli_description(&self) -> &'static str {
        "CLI for scaffolding bitbeat server projects"
    }

    fn next_steps(&self, dir: &Path, flags: &FeatureFlags, installed: bool) -> Vec<String> {
        let mut steps = Vec::new();
        let current = std::env::current_dir().ok();
        let manager = flags.package_manager.binary();

        // Step 1: cd to directory if not current
        if current.as_deref() != Some(dir) {
            steps.push(format!("cd {}", dir.display()));
        }

        // Step 2: Install dependencies if that was skipped or failed
        if !installed {
            steps.push(format!("{} install", manager));
        }

        // Step 3: Compile TypeScript
        if flags.typescript {
            steps.push(format!("{} run build", manager));
        }

        // Step 4: Start the server
        steps.push(format!("{} start", manager));

        steps.push(format!("Read the docs: {}", self.docs_url()));

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "create-bitbeat")]
#[command(about = "CLI for scaffolding bitbeat server projects")]
#[command(version)]
pub struct Args {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new bitbeat project
    Create(CliCreateArgs),
}

#[derive(Parser, Debug, Default)]
pub struct CliCreateArgs {
    /// Project directory to create
    #[arg(short, long)]
    pub directory: Option<PathBuf>,

    /// YAML file with pre-filled answers
    #[arg(short, long)]
    pub answers: Option<PathBuf>,

    /// Package manager (npm or yarn; anything else falls back to npm)
    #[arg(short, long)]
    pub package_manager: Option<String>,

    /// Project name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Project version
    #[arg(long = "project-version")]
    pub project_version: Option<String>,

    /// Project description
    #[arg(long)]
    pub description: Option<String>,

    /// Project author
    #[arg(long)]
    pub author: Option<String>,

    /// Generate a TypeScript project
    #[arg(long, conflicts_with = "javascript")]
    pub typescript: bool,

    /// Generate a plain JavaScript project
    #[arg(long)]
    pub javascript: bool,

    /// Generate empty placeholder directories
    #[arg(long)]
    pub placeholder_directories: bool,

    /// Add a web server
    #[arg(long)]
    pub web_server: bool,

    /// Add a websocket server
    #[arg(long)]
    pub websocket_server: bool,

    /// Run the websocket server on the web server port
    #[arg(long)]
    pub unify: bool,

    /// Add a status action (requires --web-server)
    #[arg(long)]
    pub status_action: bool,

    /// Add a documentation action (requires --web-server)
    #[arg(long)]
    pub documentation_action: bool,

    /// Registry URL used for version lookups
    #[arg(long)]
    pub registry: Option<String>,

    /// Use built-in dependency versions instead of querying the registry
    #[arg(long)]
    pub pinned_versions: bool,

    /// Do not install dependencies after generating the project
    #[arg(long)]
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,
}

impl From<CliCreateArgs> for CreateArgs {
    fn from(args: CliCreateArgs) -> Self {
        let typescript = if args.javascript {
            Some(false)
        } else {
            args.typescript.then_some(true)
        };

        CreateArgs {
            directory: args.directory,
            answers_file: args.answers,
            answers: Answers {
                package_manager: args.package_manager,
                name: args.name,
                version: args.project_version,
                description: args.description,
                author: args.author,
                typescript,
                placeholder_directories: args.placeholder_directories.then_some(true),
                web_server: args.web_server.then_some(true),
                websocket_server: args.websocket_server.then_some(true),
                unify_websocket: args.unify.then_some(true),
                status_action: args.status_action.then_some(true),
                documentation_action: args.documentation_action.then_some(true),
            },
            registry: args.registry,
            pinned_versions: args.pinned_versions,
            skip_install: args.skip_install,
            yes: args.yes,
        }
    }
}

/// Initialize diagnostic logging on stderr
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "bitbeat_scaffolder=debug"
    } else {
        "bitbeat_scaffolder=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);
    let config = BitbeatConfig;

    let create_args = match args.command {
        Some(Command::Create(create_args)) => create_args.into(),
        // No subcommand provided, default to create behavior (interactive mode)
        None => CreateArgs::default(),
    };

    let result = bitbeat_scaffolder::run(&config, create_args, CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_flags_become_answers() {
        let args = Args::parse_from([
            "create-bitbeat",
            "create",
            "--web-server",
            "--status-action",
            "--javascript",
            "--package-manager",
            "yarn",
            "--yes",
        ]);
        let Some(Command::Create(create)) = args.command else {
            panic!("expected create subcommand");
        };
        let create: CreateArgs = create.into();

        assert!(create.yes);
        assert_eq!(create.answers.web_server, Some(true));
        assert_eq!(create.answers.status_action, Some(true));
        assert_eq!(create.answers.typescript, Some(false));
        assert_eq!(create.answers.websocket_server, None);
        assert_eq!(create.answers.package_manager.as_deref(), Some("yarn"));
    }

    #[test]
    fn test_typescript_and_javascript_conflict() {
        let result =
            Args::try_parse_from(["create-bitbeat", "create", "--typescript", "--javascript"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_next_steps_for_uninstalled_typescript_project() {
        let flags = FeatureFlags {
            typescript: true,
            package_manager: bitbeat_scaffolder::PackageManager::Yarn,
            ..Default::default()
        };
        let steps = BitbeatConfig.next_steps(Path::new("/tmp/somewhere-else"), &flags, false);

        assert_eq!(steps[0], "cd /tmp/somewhere-else");
        assert!(steps.contains(&"yarn install".to_string()));
        assert!(steps.contains(&"yarn run build".to_string()));
        assert!(steps.contains(&"yarn start".to_string()));
    }
}
