use blogrank_core::{AppConfig, CoreError, ErrorExt};
use database::Database;
use naver_client::{BlogFetcher, SearchClient, VolumeClient};
use pipeline::{AnalysisPipeline, BatchRunner, ResultStore, TracingSink, WebhookRecorder};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const USAGE: &str = "Usage: blogrank <analyze <url> | recent <blog-id> [count] | history | clear>";

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    tracing_subscriber::fmt()
        .with_env_filter("blogrank=info,pipeline=info,naver_client=info,database=info")
        .init();

    tracing::info!("Starting Blogrank - Naver Blog Keyword Rank Analyzer");

    let config_path =
        std::env::var("BLOGRANK_CONFIG").unwrap_or_else(|_| "blogrank.toml".to_string());
    let config = AppConfig::load(Path::new(&config_path))?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = run_command(&config, &args).await;
    if let Err(e) = &outcome {
        e.log_error();
        eprintln!("{}", e.user_friendly_message());
    }
    outcome
}

async fn run_command(config: &AppConfig, args: &[String]) -> Result<(), CoreError> {
    match args.first().map(String::as_str) {
        Some("analyze") => {
            let url = args.get(1).ok_or_else(usage_error)?;
            let runner = build_runner(config).await?;
            let result = runner.analyze_url(url).await?;
            print_result(&result);
            Ok(())
        }
        Some("recent") => {
            let blog_id = args.get(1).ok_or_else(usage_error)?;
            let count: u32 = match args.get(2) {
                Some(raw) => raw.parse().map_err(|_| CoreError::Invalid {
                    message: format!("count must be a number, got '{}'", raw),
                })?,
                None => 5,
            };
            let fetcher = BlogFetcher::new(Duration::from_secs(config.limits.fetch_timeout_secs));
            let runner = build_runner(config).await?;
            let items = runner.analyze_recent(&fetcher, blog_id, count).await?;
            for item in &items {
                match &item.outcome {
                    Ok(result) => print_result(result),
                    Err(e) => println!("실패: {} ({})", item.title, e.user_friendly_message()),
                }
            }
            Ok(())
        }
        Some("history") => {
            let store = open_store(config).await?;
            for stored in store.load_results().await? {
                print_result(&stored.result);
            }
            Ok(())
        }
        Some("clear") => {
            let store = open_store(config).await?;
            let cleared = store.clear_results().await?;
            println!("{} stored analyses cleared", cleared);
            Ok(())
        }
        _ => Err(usage_error()),
    }
}

fn usage_error() -> CoreError {
    CoreError::Invalid {
        message: USAGE.to_string(),
    }
}

async fn build_runner(config: &AppConfig) -> Result<BatchRunner, CoreError> {
    let probe_timeout = Duration::from_secs(config.limits.probe_timeout_secs);
    let fetch_timeout = Duration::from_secs(config.limits.fetch_timeout_secs);

    let search = Arc::new(SearchClient::new(
        config.search.client_id.clone(),
        config.search.client_secret.clone(),
        probe_timeout,
    ));
    let volume = VolumeClient::from_credentials(&config.searchad, probe_timeout)
        .map(|client| Arc::new(client) as Arc<dyn pipeline::VolumeSource>);
    let fetcher = Arc::new(BlogFetcher::new(fetch_timeout));

    let store = open_store(config).await?;
    let recorder = config
        .record
        .webhook_url
        .clone()
        .map(|url| Arc::new(WebhookRecorder::new(url)) as Arc<dyn pipeline::RecordSink>);

    let analysis_pipeline = Arc::new(AnalysisPipeline::new(
        search,
        volume,
        Arc::new(TracingSink),
    ));

    Ok(BatchRunner::new(
        analysis_pipeline,
        fetcher,
        Some(Arc::new(store) as Arc<dyn ResultStore>),
        recorder,
        Duration::from_millis(config.limits.batch_pause_ms),
    ))
}

async fn open_store(config: &AppConfig) -> Result<Database, CoreError> {
    let mut store = Database::new(format!("sqlite://{}", config.storage.database_path));
    store.connect().await?;
    store.run_migrations().await?;
    Ok(store)
}

fn print_result(result: &blogrank_core::AnalysisResult) {
    let keyword = result.final_keyword.as_deref().unwrap_or("(없음)");
    let rank = result
        .best_rank
        .map(|rank| format!("{}위", rank))
        .unwrap_or_else(|| "미노출".to_string());
    println!(
        "[{}] {} / 추천 키워드: {} ({})",
        result.grade, result.title, keyword, rank
    );
    for entry in &result.other_good_keywords {
        if let Some(rank) = entry.rank {
            println!("    상위 노출 키워드: {} ({}위)", entry.keyword, rank);
        }
    }
    if let Some(volume) = result.search_volume {
        println!("    월간 검색량: {}", volume.total);
    }
}
