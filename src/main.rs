//! Partsmith - Entry Point
//!
//! Interactive CAD agent: type a modelling request, review the plan the
//! engine derives from it, and execute it against the kernel session.
//! Runs against the simulated kernel; a live automation binding plugs in
//! through the same `KernelSession` trait.

use partsmith::core::config::EngineConfig;
use partsmith::core::error::{EngineError, Result};
use partsmith::exec::{ExecutionSequencer, RunReport, RunStatus, SimulatedKernel};
use partsmith::llm::{parse_intent, LlmClient, ModelContext};
use partsmith::plan::{FeaturePlan, FeaturePlanBuilder};
use partsmith::tree::FeatureTreeMirror;

use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;

/// Partsmith - natural language to parametric feature trees
#[derive(Parser, Debug)]
#[command(name = "partsmith")]
#[command(about = "Agentic CAD interface: natural language intents against a feature-tree kernel")]
struct Args {
    /// Engine configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name of the active document, shown in prompts and context
    #[arg(long, default_value = "Part1")]
    document: String,

    /// Execute plans without asking for confirmation
    #[arg(long, short = 'y')]
    yes: bool,

    /// Print run reports as JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    // Initialize tracing for logging
    tracing_subscriber::fmt()
        .with_env_filter("partsmith=info")
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::new(),
    };
    config.validate().map_err(EngineError::Config)?;

    tracing::info!("Partsmith starting...");

    // Create the async runtime for LLM calls
    let rt = Runtime::new()?;

    // Dry-run kernel session and its mirror; both live for the whole session
    let mut kernel = SimulatedKernel::new();
    let mut mirror = FeatureTreeMirror::new();

    // Try to create LLM client (optional - structured commands still work without it)
    let llm_client = LlmClient::from_env().ok();
    if llm_client.is_none() {
        tracing::warn!("LLM_API_KEY not set - running without natural language parsing");
    }

    println!("\n=== PARTSMITH ===");
    println!("Natural language CAD agent (simulated kernel)");
    println!();
    println!("Commands:");
    println!("  tree / t        - Show the confirmed feature tree");
    println!("  status / s      - Show the document summary");
    println!("  quit / q        - Exit");
    if llm_client.is_some() {
        println!("  <any text>      - Modelling request (parsed by LLM)");
    }
    println!();

    loop {
        print!("[{}] > ", args.document);
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        match input {
            "" => continue,
            "q" | "quit" => break,
            "t" | "tree" => {
                print_tree(&mirror);
                continue;
            }
            "s" | "status" => {
                println!("{}", ModelContext::from_mirror(&args.document, &mirror).summary());
                continue;
            }
            _ => {}
        }

        let Some(client) = &llm_client else {
            println!("LLM not configured - set LLM_API_KEY to enable natural language requests");
            continue;
        };

        let context = ModelContext::from_mirror(&args.document, &mirror);
        let intent = match rt.block_on(parse_intent(client, input, &context)) {
            Ok(intent) => intent,
            Err(e) => {
                println!("Could not parse that request: {}", e);
                continue;
            }
        };

        let plan = match FeaturePlanBuilder::new(&config).build(&intent) {
            Ok(plan) => plan,
            Err(e) => {
                println!("Could not plan that request: {}", e);
                continue;
            }
        };

        print_plan(&plan);
        if !args.yes && !confirm()? {
            println!("Cancelled.");
            continue;
        }

        let report = ExecutionSequencer::new(&mut kernel, &config).run(&plan, &mut mirror);
        print_report(&report, args.json)?;
    }

    Ok(())
}

fn print_plan(plan: &FeaturePlan) {
    println!("\nPLAN ({} steps):", plan.len());
    for (i, step) in plan.steps().iter().enumerate() {
        println!(
            "  {}. {} - {:?} {:?}, extent {} mm",
            i + 1,
            step.label,
            step.kind,
            step.profile,
            step.extent
        );
    }
}

fn confirm() -> Result<bool> {
    print!("\nExecute this plan? (y/n): ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn print_report(report: &RunReport, as_json: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    match report.status {
        RunStatus::Completed => println!(
            "Completed: {} feature(s) confirmed.",
            report.confirmed.len()
        ),
        RunStatus::PartialFailure => {
            println!(
                "Stopped early: {} feature(s) confirmed.",
                report.confirmed.len()
            );
            if let Some(failing) = &report.failing_step {
                println!("  step {} failed: {}", failing.index, failing.reason);
            }
        }
    }
    Ok(())
}

fn print_tree(mirror: &FeatureTreeMirror) {
    if mirror.is_empty() {
        println!("(empty document)");
        return;
    }
    for node in mirror.nodes() {
        let parent = match node.parent {
            Some(parent) => format!("on {}", parent.0),
            None => "on datum".to_string(),
        };
        println!(
            "  #{} {:?} id {} ({}, {} faces)",
            node.order,
            node.kind,
            node.handle.0,
            parent,
            node.faces.len()
        );
    }
}
