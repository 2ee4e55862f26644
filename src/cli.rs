use std::io::Read;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info};

use moraclean::config::Config;
use moraclean::process::{self, ProcessContext};
use moraclean::ProcessMode;

use crate::Cli;

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;

    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            debug!("程序路径: {}", dir.display());
        }
    }
    debug!("运行参数：{}", serde_json::to_string(&cli)?);

    if let Some(threads) = config.process.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure worker pool")?;
    }

    let ctx = ProcessContext {
        skip_rename: cli.skip_change_filename,
        stop_on_error: config.process.stop_on_error,
        extra_strip_keys: config.tags.extra_strip_keys,
    };

    if cli.url.is_file() {
        debug!("输入路径是文件");
        process::process_one(&cli.url, ProcessMode::Interactive, &ctx)?;
        info!("文件处理完毕,按下任意按键退出程序");
    } else if cli.url.is_dir() {
        debug!("输入路径是文件夹");
        let files = process::collect_files(&cli.url, cli.skip_filename_filtering);
        process::run_batch(&files, &ctx)?;
        info!("文件夹处理完毕，按下任意按键退出程序");
    } else {
        return Err(moraclean::Error::IllegalPath(cli.url).into());
    }

    wait_for_exit_key(Duration::from_secs(1));
    Ok(())
}

// Hold the terminal open so the completion message stays readable in a
// window that closes with the process. Returns on the first keypress or
// after `timeout`, whichever comes first.
fn wait_for_exit_key(timeout: Duration) {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut byte = [0u8; 1];
        if std::io::stdin().read(&mut byte).is_ok() {
            let _ = tx.send(());
        }
    });
    let _ = rx.recv_timeout(timeout);
}
