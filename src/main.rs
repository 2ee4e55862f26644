use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser, Serialize)]
#[command(name = "moraclean")]
#[command(about = "对Mora上下载的音频进行单个或批量的重命名并删掉多余Tag")]
struct Cli {
    /// Mora音频文件或文件夹路径
    #[arg(value_name = "URL")]
    url: PathBuf,

    /// 跳过修改文件名
    #[arg(long, alias = "scf")]
    skip_change_filename: bool,

    /// 跳过纯数字文件名过滤
    #[arg(long, alias = "sff")]
    skip_filename_filtering: bool,

    /// 启用Debug日志输出
    #[arg(long, alias = "debug")]
    debug_log: bool,

    /// Path to config file
    #[arg(short, long)]
    #[serde(skip)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    // clap would exit(2) on a usage error; the contract is 1 for every
    // failure.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                    ExitCode::SUCCESS
                }
                _ => ExitCode::FAILURE,
            };
        }
    };
    init_logging(cli.debug_log);

    let debug_log = cli.debug_log;
    match cli::run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if debug_log {
                eprintln!("{e:?}");
            } else {
                eprintln!("{e}");
            }
            // Let a terminal window that closes with the process paint the
            // message first.
            std::thread::sleep(Duration::from_millis(100));
            ExitCode::FAILURE
        }
    }
}

fn init_logging(debug_log: bool) {
    let filter = if debug_log {
        "moraclean=debug"
    } else {
        "moraclean=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}
