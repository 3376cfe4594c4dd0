mod cli;
mod config;
mod demo;
mod logging;
mod ui;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use config::NoiConfig;
use noi_workflow::workflow::{check_transition, Subject};
use noi_workflow::{EntityRef, PrincipalId, Rating, WorkflowKind, WorkflowRegistry};
use ui::Ui;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => NoiConfig::load_from(path)?,
        None => NoiConfig::load()?,
    };
    logging::init_logging(&config.log_level, cli.verbose)?;

    let registry = Arc::new(WorkflowRegistry::standard()?);
    let ui = Ui::default();
    let kind_or_default =
        |arg: Option<cli::WorkflowArg>| arg.map(WorkflowKind::from).unwrap_or(config.default_workflow);

    match cli.command {
        Command::States { workflow } => {
            print!("{}", ui.states(registry.workflow(kind_or_default(workflow))));
        }
        Command::Groups { workflow } => {
            print!("{}", ui.groups(registry.workflow(kind_or_default(workflow))));
        }
        Command::Transitions { workflow } => {
            print!("{}", ui.transitions(registry.workflow(kind_or_default(workflow))));
        }
        Command::Links => {
            print!("{}", ui.links(registry.link_types()));
        }
        Command::Check {
            workflow,
            from,
            to,
            user,
            reporter,
            rating,
        } => {
            let kind = kind_or_default(workflow);
            let wf = registry.workflow(kind);
            let current = wf.get(&from)?;
            let target = wf.get(&to)?;
            let rating = rating.as_deref().map(str::parse::<Rating>).transpose()?;
            let principal = PrincipalId::new(user);
            let subject = Subject {
                entity: EntityRef::new(kind, 0),
                state: current.clone(),
                rating,
                reporter: reporter.map(PrincipalId::new).unwrap_or_else(|| principal.clone()),
            };
            let directory = config.directory();
            let result = check_transition(wf, current, target, &principal, &subject, &directory);
            println!("{}", ui.decision(&current.name, &target.name, &result));
        }
        Command::Demo => {
            let report = demo::run_demo(Arc::clone(&registry), config.directory())?;
            for step in &report.steps {
                match &step.outcome {
                    Ok(()) => println!("  ✓ {}: {} → {}", step.description, step.from, step.to),
                    Err(kind) => println!(
                        "  ✗ {}: {} → {} refused ({kind})",
                        step.description, step.from, step.to
                    ),
                }
            }
            println!("{}", ui.history(&report.history)?);
        }
    }

    Ok(())
}
