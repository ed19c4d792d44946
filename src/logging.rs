use std::fs::OpenOptions;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// グローバルな詳細ログフラグ
pub static VERBOSE_LOGGING: AtomicBool = AtomicBool::new(false);

/// ログの出力先
enum LogSink {
    /// ファイル出力（即時フラッシュ）
    File(std::fs::File),
    /// メモリ上に蓄積（テスト用）
    Memory(Vec<String>),
}

static LOG_SINK: Mutex<Option<LogSink>> = Mutex::new(None);

/// ログファイルを初期化する（既存内容は切り詰め）
pub fn init_log_file(path: &str) -> std::io::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    if let Ok(mut sink) = LOG_SINK.lock() {
        *sink = Some(LogSink::File(file));
    }
    Ok(())
}

/// メモリ上のログバッファを初期化する
pub fn init_memory_log() {
    if let Ok(mut sink) = LOG_SINK.lock() {
        *sink = Some(LogSink::Memory(Vec::new()));
    }
}

/// メモリに溜まったログを取り出す（ファイル出力時は空）
pub fn take_memory_log() -> Vec<String> {
    match LOG_SINK.lock() {
        Ok(mut sink) => match sink.as_mut() {
            Some(LogSink::Memory(lines)) => std::mem::take(lines),
            _ => Vec::new(),
        },
        Err(_) => Vec::new(),
    }
}

/// ログを出力先に書き込む（未初期化なら捨てる）
pub fn write_log(message: String) {
    if let Ok(mut sink) = LOG_SINK.lock() {
        match sink.as_mut() {
            Some(LogSink::File(file)) => {
                let _ = writeln!(file, "{}", message);
                let _ = file.flush();
            }
            Some(LogSink::Memory(lines)) => lines.push(message),
            None => {}
        }
    }
}

/// 詳細ログを有効にする
pub fn enable_verbose_logging() {
    VERBOSE_LOGGING.store(true, Ordering::Relaxed);
}

/// 詳細ログを無効にする
pub fn disable_verbose_logging() {
    VERBOSE_LOGGING.store(false, Ordering::Relaxed);
}

/// 詳細ログが有効かチェック
pub fn is_verbose() -> bool {
    VERBOSE_LOGGING.load(Ordering::Relaxed)
}

/// 詳細ログ出力マクロ（有効時のみフォーマットする）
#[macro_export]
macro_rules! vlog {
    ($($arg:tt)*) => {
        if $crate::logging::is_verbose() {
            let message = format!($($arg)*);
            $crate::logging::write_log(message);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    // ログ出力先はグローバルなのでテスト間で直列化する
    static SINK_GUARD: Mutex<()> = Mutex::new(());

    #[test]
    fn memory_sink_collects_verbose_lines() {
        let _guard = SINK_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        init_memory_log();
        enable_verbose_logging();
        crate::vlog!("[テスト] 値={}", 42);
        let lines = take_memory_log();
        disable_verbose_logging();

        assert!(lines.iter().any(|l| l == "[テスト] 値=42"));
    }

    #[test]
    fn take_memory_log_drains_buffer() {
        let _guard = SINK_GUARD.lock().unwrap_or_else(|e| e.into_inner());
        init_memory_log();
        write_log("一行目".to_string());
        let first = take_memory_log();
        let second = take_memory_log();
        assert!(first.iter().any(|l| l == "一行目"));
        assert!(second.iter().all(|l| l != "一行目"));
    }
}
