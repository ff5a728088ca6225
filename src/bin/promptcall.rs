//! promptcall: inspect catalogs and try prompt-driven function calling from
//! the command line.
//!
//! Usage:
//!   promptcall render <catalog>                   Print the system instruction
//!   promptcall check <catalog> <reply>            Interpret and review a model reply
//!   promptcall ask <catalog> <question> [--config <file>]
//!                                                 Run one pass with echo handlers

use ai_lib_promptcall::extract::{interpret_reply, Extraction};
use ai_lib_promptcall::governor::{CallGovernor, Verdict};
use ai_lib_promptcall::prompt::{build_instruction, render_catalog};
use ai_lib_promptcall::registry::FunctionRegistry;
use ai_lib_promptcall::runtime::{PromptCallAgent, Session};
use ai_lib_promptcall::types::Catalog;
use ai_lib_promptcall::PromptCallConfig;
use anyhow::{bail, Context};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "render" => cmd_render(&args[2..]),
        "check" => cmd_check(&args[2..]),
        "ask" => cmd_ask(&args[2..]).await,
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"promptcall: prompt-driven function calling

USAGE:
    promptcall <COMMAND> [OPTIONS]

COMMANDS:
    render <catalog>                      Print the function-selection instruction
    check <catalog> <reply>               Interpret a model reply and review the call
    ask <catalog> <question> [--config <file>]
                                          Run one reasoning pass; handlers echo their arguments
    version                               Show version information
    help                                  Show this help message

ENVIRONMENT:
    PROMPTCALL_BASE_URL                   Chat completion base URL
    PROMPTCALL_MODEL                      Model name
    PROMPTCALL_API_KEY                    Bearer token
    PROMPTCALL_TIMEOUT_SECS               Request timeout
    PROMPTCALL_MAX_ROUNDS                 Extraction rounds per pass
    RUST_LOG                              Log filter (default: warn)"#
    );
}

fn cmd_version() {
    println!("promptcall {}", env!("CARGO_PKG_VERSION"));
}

fn load_catalog(args: &[String]) -> anyhow::Result<Catalog> {
    let path = args.first().context("missing <catalog> argument")?;
    Catalog::from_file(path).with_context(|| format!("failed to load catalog {path}"))
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn cmd_render(args: &[String]) -> anyhow::Result<()> {
    let catalog = load_catalog(args)?;
    print!("{}", build_instruction(&render_catalog(&catalog)));
    Ok(())
}

fn cmd_check(args: &[String]) -> anyhow::Result<()> {
    let catalog = load_catalog(args)?;
    let Some(reply) = args.get(1) else {
        bail!("missing <reply> argument");
    };

    let call = match interpret_reply(reply.clone(), false) {
        Extraction::Candidate(call) => call,
        Extraction::Text(text) => {
            println!("text: {text}");
            return Ok(());
        }
        Extraction::Skipped => {
            println!("skipped");
            return Ok(());
        }
    };

    match CallGovernor::new().review(call, &catalog) {
        Verdict::Approved(call) => println!(
            "approved: {} {}",
            call.name,
            serde_json::to_string(&call.arguments)?
        ),
        Verdict::Rejected { call, reason } => println!("rejected: {} ({reason})", call.name),
        Verdict::SuppressedDuplicate(call) => println!("duplicate: {}", call.name),
    }
    Ok(())
}

async fn cmd_ask(args: &[String]) -> anyhow::Result<()> {
    let catalog = load_catalog(args)?;
    let Some(question) = args.get(1) else {
        bail!("missing <question> argument");
    };

    let mut config = match flag_value(args, "--config") {
        Some(path) => PromptCallConfig::from_file(path)
            .with_context(|| format!("failed to load config {path}"))?,
        None => PromptCallConfig::default(),
    };
    config.apply_env()?;

    let mut registry = FunctionRegistry::new();
    for definition in catalog.iter().cloned() {
        let name = definition.name.clone();
        registry.register_fn(definition, move |arguments| {
            let name = name.clone();
            async move {
                Ok::<_, ai_lib_promptcall::Error>(format!(
                    "{} called with {}",
                    name,
                    serde_json::Value::Object(arguments)
                ))
            }
        })?;
    }

    let agent = PromptCallAgent::from_config(&config, Arc::new(registry))?;
    let mut session = Session::new();
    let reply = agent.respond(&mut session, question.as_str()).await?;

    for executed in &reply.calls {
        let status = if executed.failed { "failed" } else { "ok" };
        eprintln!("[{status}] {}", executed.output);
    }
    println!("{}", reply.text);
    Ok(())
}
