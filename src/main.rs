// hexpop - 自動プレイでエンジンを走らせるコマンドライン

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use hexpop::application::ProgressManager;
use hexpop::domain::config::EngineConfig;
use hexpop::infrastructure::{
    load_config, EventWriter, FileEventWriter, ParallelConfig, ParallelExecutor,
};
use hexpop::logging;

#[derive(Parser)]
#[command(name = "hexpop", version, about = "六角格子バブルシューターの自動プレイ")]
struct Cli {
    /// 最初のゲームのシード（以降は連番）
    #[arg(long, default_value_t = 1)]
    seed: u64,
    /// ゲーム数
    #[arg(long, default_value_t = 1)]
    games: u64,
    /// 1ゲームあたりの最大発射数
    #[arg(long, default_value_t = 500)]
    max_shots: u64,
    /// 設定ファイル（JSON）
    #[arg(long)]
    config: Option<PathBuf>,
    /// イベントの出力先（JSON Lines）
    #[arg(long)]
    events: Option<PathBuf>,
    /// ログファイル
    #[arg(long)]
    log: Option<PathBuf>,
    /// 詳細ログを有効にする
    #[arg(long)]
    verbose: bool,
    /// ワーカースレッド数（省略時はCPU数）
    #[arg(long)]
    workers: Option<usize>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(path) = &cli.log {
        logging::init_log_file(&path.to_string_lossy())
            .with_context(|| format!("ログファイルを開けません: {}", path.display()))?;
    }
    if cli.verbose {
        logging::enable_verbose_logging();
    }

    let engine = match &cli.config {
        Some(path) => load_config(path)?,
        None => EngineConfig::default(),
    };

    let mut parallel = ParallelConfig::default()
        .with_max_shots(cli.max_shots)
        .with_events(cli.events.is_some());
    if let Some(n) = cli.workers {
        parallel.num_workers = n;
    }

    let seeds: Vec<u64> = (0..cli.games).map(|i| cli.seed.wrapping_add(i)).collect();
    let executor = ParallelExecutor::new(parallel);
    let progress = ProgressManager::new();
    let summaries = executor.run(&engine, &seeds, &progress)?;

    if let Some(path) = &cli.events {
        let mut writer = FileEventWriter::json_lines(path)?;
        for summary in &summaries {
            writer.write_batch(&summary.events)?;
        }
        writer.flush()?;
        println!("イベント {} 件を書き出しました: {}", writer.count(), path.display());
    }

    for s in &summaries {
        println!("{}", serde_json::to_string(s)?);
    }

    let stats = progress.get_stats();
    let average = if stats.games_finished > 0 {
        stats.total_score as f64 / stats.games_finished as f64
    } else {
        0.0
    };
    println!(
        "ゲーム数={} 発射={} 消去={} 平均得点={:.1} 最高得点={} ({:.2}秒, {:.0}発/秒)",
        stats.games_finished,
        stats.shots_fired,
        stats.bubbles_removed,
        average,
        stats.best_score,
        progress.elapsed().as_secs_f64(),
        progress.shots_per_second()
    );
    Ok(())
}
