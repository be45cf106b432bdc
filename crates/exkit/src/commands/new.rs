//! `exkit <topic>` command handler

use anyhow::{Context, Result};
use exkit_projects::templates::README_FILE;
use exkit_projects::{
    CommandGenerator, LoadedConfig, ScaffoldPlan, ScaffoldReport, ScaffoldReporter, Scaffolder,
    Stage,
};

use crate::cli::Cli;
use crate::output;

/// Prints one line per stage as the scaffolder reaches it
struct TerminalReporter;

impl ScaffoldReporter for TerminalReporter {
    fn on_stage(&self, stage: Stage, plan: &ScaffoldPlan) {
        let target = match stage {
            Stage::Generate => plan.allocation.name.clone(),
            Stage::Manifest => plan.manifest_path.to_string(),
            Stage::Readme => plan.target_dir.join(README_FILE).to_string(),
        };
        output::step(&format!("{}: {}", stage, target));
    }

    fn on_warning(&self, message: &str) {
        output::warning(message);
    }
}

/// Create a new exercise for `cli.topic`
pub fn run(cli: &Cli) -> Result<()> {
    let config = LoadedConfig::load(&cli.root, cli.config.as_deref())
        .context("Failed to load configuration")?;
    if let Some(source) = &config.source {
        tracing::debug!("Using config {}", source);
    }

    let generator = CommandGenerator::new(&config.config.generator, config.root.clone());
    let scaffolder = Scaffolder::new(config, generator);

    let plan = scaffolder
        .plan(&cli.topic)
        .context("Failed to allocate exercise")?;

    if cli.dry_run {
        return show_plan(&scaffolder, &plan, cli.json);
    }

    output::header("Create New Exercise");
    output::info(&format!(
        "Creating {} on port {}",
        plan.allocation.name, plan.allocation.port
    ));
    println!();

    let report = scaffolder
        .execute(&plan, &TerminalReporter)
        .context("Failed to scaffold exercise")?;
    show_summary(&scaffolder, &report);

    Ok(())
}

/// Print what a run would do
fn show_plan(
    scaffolder: &Scaffolder<CommandGenerator>,
    plan: &ScaffoldPlan,
    json: bool,
) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(plan).context("Failed to serialize plan")?;
        println!("{}", text);
        return Ok(());
    }

    let allocation = &plan.allocation;
    let generator = scaffolder.generator();

    output::header("Dry Run");
    output::kv("Exercise", &allocation.name);
    output::kv("Port", &allocation.port.to_string());
    output::kv("Directory", plan.target_dir.as_str());
    output::kv(
        "Generator",
        &format!(
            "{} (in {})",
            generator.command_line(&allocation.name),
            generator.working_dir()
        ),
    );
    output::kv("Manifest", plan.manifest_path.as_str());
    output::kv(&allocation.start_script(), &plan.start_command);
    output::kv(&allocation.build_script(), &plan.build_command);

    for duplicate in &plan.duplicates {
        output::warning(&format!("Topic already used by {}", duplicate));
    }

    println!();
    output::info("No changes made");
    Ok(())
}

/// Print the final summary and suggested next steps
fn show_summary(scaffolder: &Scaffolder<CommandGenerator>, report: &ScaffoldReport) {
    let plan = &report.plan;
    let allocation = &plan.allocation;
    let runner = &scaffolder.config().config.runner;

    println!();
    output::success(&format!("Exercise '{}' created successfully", allocation.name));
    println!();
    output::kv("Name", &allocation.name);
    output::kv("Port", &allocation.port.to_string());
    output::kv("Start", &allocation.start_script());
    output::kv("Build", &allocation.build_script());
    output::kv("Directory", plan.target_dir.as_str());

    if !report.manifest.replaced.is_empty() {
        output::warning(&format!(
            "Replaced existing scripts: {}",
            report.manifest.replaced.join(", ")
        ));
    }

    println!();
    output::info("Next steps:");
    println!("   1. {} run {}", runner, allocation.start_script());
    println!("   2. Open {}", allocation.url());
    println!("   3. Edit {}", report.readme_path);
}
