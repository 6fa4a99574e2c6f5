//! The interactive create flow

use crate::config::{default_project_name, validate_version, Answers, DEFAULT_VERSION};
use crate::engine::ProjectMetadata;
use crate::flags::{FeatureFlags, PackageManager};
use crate::product::ProductConfig;
use crate::registry::{PinnedVersions, RegistryResolver, VersionSource};
use crate::runtime::{check, Installer, RuntimeInfo};
use crate::scaffold::{self, ProjectPlan};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Everything the create flow takes from the command line
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project directory to create
    pub directory: Option<PathBuf>,

    /// YAML file with pre-filled answers
    pub answers_file: Option<PathBuf>,

    /// Answers given as flags; these win over the answers file
    pub answers: Answers,

    /// Registry URL overriding the product default and env var
    pub registry: Option<String>,

    /// Use the built-in version constraints instead of querying the registry
    pub pinned_versions: bool,

    /// Do not run the package manager after writing the project
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Prompt, plan, write and install a project
pub async fn run<C: ProductConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(format!("{} {}", config.display_name(), cli_version))?;
    cliclack::log::remark(config.cli_description())?;

    // Step 1: Select directory
    let project_dir = select_directory(&args)?;

    // Step 2: Collect answers (file, then flags, then prompts/defaults)
    let answers = collect_answers(&args).await?;
    let default_name = default_project_name(&project_dir);
    let (meta, flags) = if args.yes {
        let resolved = answers.resolve_defaults(&default_name)?;
        validate_version(&resolved.0.version).map_err(anyhow::Error::msg)?;
        resolved
    } else {
        prompt_missing(&answers, &default_name)?
    };

    let features = flags.active_features();
    cliclack::log::success(format!(
        "{} project{}",
        flags.dialect(),
        if features.is_empty() {
            String::new()
        } else {
            format!(" with {}", features.join(", "))
        }
    ))?;

    // Step 3: Resolve dependencies and assemble the project in memory
    let source = version_source(config, &args)?;
    let plan = plan_project(&meta, &flags, source.as_ref()).await?;

    // Step 4: Write files
    write_project(&plan, &project_dir).await?;

    // Step 5: Install dependencies
    let installed = if args.skip_install {
        cliclack::log::info("Skipping dependency installation")?;
        false
    } else {
        install_dependencies(flags.package_manager, &project_dir).await?
    };

    // Step 6: Show next steps
    print_next_steps(config, &project_dir, &flags, installed)?;

    Ok(())
}

async fn collect_answers(args: &CreateArgs) -> Result<Answers> {
    let from_file = match &args.answers_file {
        Some(path) => {
            cliclack::log::info(format!("Using answers from {}", path.display()))?;
            Answers::load(path).await?
        }
        None => Answers::default(),
    };
    Ok(from_file.overlay(args.answers.clone()))
}

fn version_source<C: ProductConfig>(
    config: &C,
    args: &CreateArgs,
) -> Result<Box<dyn VersionSource>> {
    if args.pinned_versions {
        cliclack::log::info("Using built-in dependency versions")?;
        return Ok(Box::new(PinnedVersions));
    }

    let resolver = RegistryResolver::from_config(config, args.registry.as_deref())?;
    cliclack::log::info(format!("Using registry {}", resolver.base_url()))?;
    Ok(Box::new(resolver))
}

fn absolutize(base: &Path, input: &Path) -> PathBuf {
    if input.as_os_str().is_empty() || input == Path::new(".") {
        base.to_path_buf()
    } else if input.is_absolute() {
        input.to_path_buf()
    } else {
        base.join(input)
    }
}

fn select_directory(args: &CreateArgs) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Cannot read the current directory")?;

    let target = match &args.directory {
        Some(dir) => {
            let target = absolutize(&cwd, dir);
            cliclack::log::info(format!("Target: {}", target.display()))?;
            target
        }
        None if args.yes => cwd,
        None => {
            let input: String = cliclack::input("Where should the project live?")
                .placeholder(".")
                .default_input(".")
                .interact()?;
            absolutize(&cwd, Path::new(input.trim()))
        }
    };

    match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
            anyhow::bail!("{} is not an existing directory", parent.display());
        }
        _ => {}
    }

    // An existing project is extended, never wiped
    if target.join(scaffold::MANIFEST_FILE).is_file() {
        cliclack::log::warning(format!(
            "{} already has a {}; generated keys are merged into it",
            target.display(),
            scaffold::MANIFEST_FILE
        ))?;

        let proceed = args.yes
            || cliclack::confirm("Extend the existing project?")
                .initial_value(true)
                .interact()?;
        if !proceed {
            anyhow::bail!("Aborted, nothing was written.");
        }
    }

    Ok(target)
}

fn ask_text(current: &Option<String>, prompt: &str, default: &str) -> Result<String> {
    if let Some(value) = current {
        return Ok(value.clone());
    }
    let value: String = cliclack::input(prompt)
        .default_input(default)
        .required(false)
        .interact()?;
    Ok(value.trim().to_string())
}

fn ask_confirm(current: Option<bool>, prompt: &str, initial: bool) -> Result<bool> {
    match current {
        Some(value) => Ok(value),
        None => Ok(cliclack::confirm(prompt).initial_value(initial).interact()?),
    }
}

/// Prompt for every answer that was not pre-filled
fn prompt_missing(answers: &Answers, default_name: &str) -> Result<(ProjectMetadata, FeatureFlags)> {
    let manager_name = ask_text(&answers.package_manager, "Using npm or yarn?", "npm")?;
    if !PackageManager::is_known(&manager_name) {
        cliclack::log::warning(format!(
            "Unknown package manager '{}', using npm",
            manager_name
        ))?;
    }
    let package_manager = PackageManager::from_name(&manager_name);

    let name = ask_text(&answers.name, "Your project name", default_name)?;

    let version = match &answers.version {
        Some(version) => {
            validate_version(version).map_err(anyhow::Error::msg)?;
            version.clone()
        }
        None => {
            let version: String = cliclack::input("Your project version")
                .default_input(DEFAULT_VERSION)
                .validate(|input: &String| validate_version(input))
                .interact()?;
            version.trim().to_string()
        }
    };

    let description = ask_text(&answers.description, "Your project description", "")?;
    let author = ask_text(&answers.author, "Your name (author)", "")?;

    let typescript = ask_confirm(
        answers.typescript,
        "Do you want to use typescript? (recommended)",
        true,
    )?;
    let placeholder_directories = ask_confirm(
        answers.placeholder_directories,
        "Do you want to generate empty directories? (optional)",
        false,
    )?;
    let web_server = ask_confirm(
        answers.web_server,
        "Would you like to generate a web server?",
        false,
    )?;
    let websocket_server = ask_confirm(
        answers.websocket_server,
        "Would you like to generate a websocket server?",
        false,
    )?;

    // Dependent questions are only asked when they mean something
    let unify_websocket = if web_server && websocket_server {
        ask_confirm(
            answers.unify_websocket,
            "Would you like to run the websocket server on the web server port?",
            true,
        )?
    } else {
        answers.unify_websocket.unwrap_or(false)
    };

    let (status_action, documentation_action) = if web_server {
        (
            ask_confirm(
                answers.status_action,
                "Would you like to add a status action for the servers?",
                true,
            )?,
            ask_confirm(
                answers.documentation_action,
                "Would you like to add a documentation action for the servers?",
                true,
            )?,
        )
    } else {
        (
            answers.status_action.unwrap_or(false),
            answers.documentation_action.unwrap_or(false),
        )
    };

    let flags = FeatureFlags {
        package_manager,
        typescript,
        web_server,
        websocket_server,
        unify_websocket,
        status_action,
        documentation_action,
        placeholder_directories,
    };
    // pre-filled dependent answers can still contradict the prompted ones
    flags.validate()?;

    let meta = ProjectMetadata {
        name,
        version,
        description,
        author: Some(author).filter(|a| !a.is_empty()),
    };

    Ok((meta, flags))
}

async fn plan_project(
    meta: &ProjectMetadata,
    flags: &FeatureFlags,
    source: &dyn VersionSource,
) -> Result<ProjectPlan> {
    let spinner = cliclack::spinner();
    spinner.start("Resolving dependencies...");

    match scaffold::plan_project(meta, flags, source).await {
        Ok(plan) => {
            spinner.stop(format!(
                "Resolved {} dependencies",
                plan.manifest.dependencies.len() + plan.manifest.dev_dependencies.len()
            ));
            Ok(plan)
        }
        Err(e) => {
            spinner.stop("Could not assemble the project");
            let message = match e.failing_package() {
                Some(package) => format!("Nothing was written. Failing package: {}", package),
                None => "Nothing was written.".to_string(),
            };
            cliclack::log::error(message)?;
            Err(e).context("Project generation aborted")
        }
    }
}

async fn write_project(plan: &ProjectPlan, project_dir: &Path) -> Result<()> {
    if plan.flags.typescript {
        cliclack::log::info("Generating typescript assets and configs...")?;
    }
    if !plan.placeholder_dirs.is_empty() {
        cliclack::log::info("Generating structure...")?;
    }

    let spinner = cliclack::spinner();
    spinner.start("Writing project...");

    let report = scaffold::write_project(plan, project_dir)
        .await
        .with_context(|| format!("Failed to write project to {}", project_dir.display()))?;

    spinner.stop(format!(
        "Created {} entries in {}",
        report.written.len(),
        project_dir.display()
    ));

    for skipped in &report.skipped {
        cliclack::log::info(format!("Skipped creation of {}...", skipped))?;
    }
    if plan.boot.is_none() {
        cliclack::log::info("No server selected, no boot module generated")?;
    }

    Ok(())
}

/// Returns whether dependencies were installed
async fn install_dependencies(manager: PackageManager, project_dir: &Path) -> Result<bool> {
    let installer = Installer::new(manager);

    let spinner = cliclack::spinner();
    spinner.start("Checking runtimes...");
    let runtimes = check::check_runtimes(manager);
    let missing: Vec<String> = runtimes
        .iter()
        .filter(|r| !r.available)
        .map(RuntimeInfo::describe)
        .collect();

    if !missing.is_empty() {
        spinner.stop("Missing runtimes");
        cliclack::log::warning(format!(
            "{} - run '{}' yourself once installed",
            missing.join(", "),
            installer.command_line()
        ))?;
        return Ok(false);
    }

    let detected: Vec<String> = runtimes.iter().map(RuntimeInfo::describe).collect();
    spinner.stop(format!("Detected runtimes: {}", detected.join(", ")));
    installer
        .install(project_dir)
        .await
        .context("Dependency installation failed")?;
    cliclack::log::success("Dependencies installed")?;

    Ok(true)
}

fn print_next_steps<C: ProductConfig>(
    config: &C,
    project_dir: &Path,
    flags: &FeatureFlags,
    installed: bool,
) -> Result<()> {
    let steps = config.next_steps(project_dir, flags, installed);

    println!();
    println!("  {}", console::style("Next steps").bold());
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", console::style(i + 1).cyan(), step);
    }

    cliclack::outro("Happy coding!")?;

    Ok(())
}
