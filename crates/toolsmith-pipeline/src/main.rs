use clap::{value_parser, Arg, Command};
use std::sync::Arc;
use std::time::Duration;
use toolsmith_pipeline::{PipelineConfig, ToolsmithService};
use toolsmith_provider::{KeywordAnalyzer, TemplateProvider};
use toolsmith_store::{seed, ArtifactStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Command::new("toolsmith")
        .version(env!("CARGO_PKG_VERSION"))
        .about("On-demand tool generation pipeline")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("generate")
                .about("Generate a tool from a natural-language spec")
                .arg(Arg::new("spec").required(true).help("What the tool should do"))
                .arg(
                    Arg::new("delay-ms")
                        .long("delay-ms")
                        .default_value("400")
                        .value_parser(value_parser!(u64))
                        .help("Simulated latency per pipeline stage"),
                )
                .arg(
                    Arg::new("deadline-secs")
                        .long("deadline-secs")
                        .default_value("30")
                        .value_parser(value_parser!(u64))
                        .help("Provider call deadline"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Run the compliance probe against a candidate name")
                .arg(Arg::new("name").required(true).help("Candidate tool name")),
        )
        .subcommand(
            Command::new("catalog")
                .about("Show the featured catalog and category counts")
                .arg(
                    Arg::new("top")
                        .long("top")
                        .default_value("6")
                        .value_parser(value_parser!(usize))
                        .help("Number of featured entries"),
                ),
        )
        .subcommand(Command::new("analytics").about("Show the usage analytics snapshot"));

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("generate", args)) => {
            let spec = args.get_one::<String>("spec").expect("required");
            let delay_ms = *args.get_one::<u64>("delay-ms").expect("defaulted");
            let deadline_secs = *args.get_one::<u64>("deadline-secs").expect("defaulted");

            let config = PipelineConfig::new()
                .with_stage_delay(Duration::from_millis(delay_ms))
                .with_provider_deadline(Some(Duration::from_secs(deadline_secs)));
            let service = ToolsmithService::new(
                Arc::new(ArtifactStore::with_catalog(seed::default_catalog())),
                Arc::new(TemplateProvider::new()),
                Arc::new(KeywordAnalyzer::new()),
                Default::default(),
                config,
            );

            let mut events = service.subscribe();
            let id = service.submit(spec, None)?;
            println!("Submitted request {id}");
            println!();

            while let Ok(event) = events.recv().await {
                if event.request_id != id {
                    continue;
                }
                println!(
                    "  [{:>3}%] {:<10} {}",
                    event.progress.progress, event.progress.step, event.progress.message
                );
                if event.progress.step.is_terminal() {
                    break;
                }
            }

            println!();
            let request = service
                .status(id)
                .ok_or_else(|| anyhow::anyhow!("request record missing"))?;
            match request.artifact_id.and_then(|aid| service.artifact(aid)) {
                Some(artifact) => {
                    println!("Tool: {} [{}]", artifact.name, artifact.category);
                    println!("  {}", artifact.description);
                    if let Some(integration) = &artifact.metadata.integration {
                        println!("  integration: {} ({})", integration.name, integration.endpoint);
                    }
                    if !artifact.metadata.features.is_empty() {
                        println!("  features: {}", artifact.metadata.features.join(", "));
                    }
                }
                None => {
                    let reason = request.error_message.unwrap_or_else(|| "unknown".to_string());
                    println!("Generation failed: {reason}");
                    std::process::exit(1);
                }
            }
        }
        Some(("check", args)) => {
            let name = args.get_one::<String>("name").expect("required");
            let service = ToolsmithService::with_defaults(Arc::new(TemplateProvider::new()));
            let verdict = service.check_name(name);
            if verdict.permitted {
                println!("permitted: {name}");
            } else {
                println!("blocked: {}", verdict.reason.unwrap_or_default());
                std::process::exit(1);
            }
        }
        Some(("catalog", args)) => {
            let top = *args.get_one::<usize>("top").expect("defaulted");
            let service = ToolsmithService::with_defaults(Arc::new(TemplateProvider::new()));

            println!("Featured:");
            for artifact in service.list_featured(top) {
                println!("  {:<24} [{}] uses: {}", artifact.name, artifact.category, artifact.usage_count);
            }
            println!();
            println!("Categories:");
            for summary in service.categories() {
                println!("  {:<13} {:>3}  {}", summary.category, summary.count, summary.description);
            }
        }
        Some(("analytics", _)) => {
            let service = ToolsmithService::with_defaults(Arc::new(TemplateProvider::new()));
            let analytics = service.analytics();
            println!("Artifacts generated: {}", analytics.artifacts_generated);
            println!("Total requests:      {}", analytics.total_requests);
            println!("Completed:           {}", analytics.completed_requests);
            println!("Failed:              {}", analytics.failed_requests);
            println!("Success rate:        {}%", analytics.success_rate);
            println!("Active sessions:     {}", analytics.active_sessions);
        }
        _ => {}
    }

    Ok(())
}
