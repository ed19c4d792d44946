// イベントの書き込み

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::application::EngineEvent;

/// 書き出し単位: どのゲームの何発目で起きたイベントか
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub game: u64,
    pub shot: u64,
    #[serde(flatten)]
    pub event: EngineEvent,
}

impl EventRecord {
    pub fn new(game: u64, shot: u64, event: EngineEvent) -> Self {
        Self { game, shot, event }
    }
}

/// イベントを書き込むためのtrait
pub trait EventWriter: Send {
    /// 単一のイベントを書き込む
    fn write_record(&mut self, record: &EventRecord) -> Result<()>;

    /// 複数のイベントをまとめて書き込む
    fn write_batch(&mut self, records: &[EventRecord]) -> Result<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// 書き込みを完了（フラッシュ）
    fn flush(&mut self) -> Result<()>;

    /// 書き込んだイベント数
    fn count(&self) -> u64;
}

/// 出力フォーマット
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON Lines形式（1行1イベント）
    JsonLines,
    /// JSON配列形式
    JsonArray,
}

/// ファイルへの書き込み実装
pub struct FileEventWriter {
    writer: BufWriter<File>,
    count: u64,
    format: OutputFormat,
    closed: bool,
}

impl FileEventWriter {
    pub fn new(path: &Path, format: OutputFormat) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("イベントファイルを作成できません: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        if format == OutputFormat::JsonArray {
            writer.write_all(b"[\n")?;
        }
        Ok(Self {
            writer,
            count: 0,
            format,
            closed: false,
        })
    }

    pub fn json_lines(path: &Path) -> Result<Self> {
        Self::new(path, OutputFormat::JsonLines)
    }

    pub fn json_array(path: &Path) -> Result<Self> {
        Self::new(path, OutputFormat::JsonArray)
    }
}

impl EventWriter for FileEventWriter {
    fn write_record(&mut self, record: &EventRecord) -> Result<()> {
        let json = serde_json::to_string(record)?;
        match self.format {
            OutputFormat::JsonLines => {
                writeln!(self.writer, "{}", json)?;
            }
            OutputFormat::JsonArray => {
                if self.count > 0 {
                    writeln!(self.writer, ",")?;
                }
                write!(self.writer, "  {}", json)?;
            }
        }
        self.count += 1;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        // 配列の閉じ括弧は一度だけ
        if self.format == OutputFormat::JsonArray && !self.closed {
            writeln!(self.writer, "\n]")?;
            self.closed = true;
        }
        self.writer.flush()?;
        Ok(())
    }

    fn count(&self) -> u64 {
        self.count
    }
}

impl Drop for FileEventWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// メモリ内書き込み実装（テスト用）
#[derive(Default)]
pub struct MemoryEventWriter {
    records: Vec<EventRecord>,
}

impl MemoryEventWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }
}

impl EventWriter for MemoryEventWriter {
    fn write_record(&mut self, record: &EventRecord) -> Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn count(&self) -> u64 {
        self.records.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(shot: u64) -> EventRecord {
        EventRecord::new(1, shot, EngineEvent::LifeLost { remaining: 2 })
    }

    #[test]
    fn memory_writer_stores_records() {
        let mut writer = MemoryEventWriter::new();
        writer.write_record(&record(1)).unwrap();
        writer.write_batch(&[record(2), record(3)]).unwrap();
        assert_eq!(writer.count(), 3);
        assert_eq!(writer.records()[2].shot, 3);
        assert!(writer.flush().is_ok());
    }

    #[test]
    fn record_flattens_event_fields() {
        let json = serde_json::to_string(&record(4)).unwrap();
        assert_eq!(json, r#"{"game":1,"shot":4,"event":"life_lost","remaining":2}"#);
    }

    #[test]
    fn json_lines_file_has_one_record_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        {
            let mut writer = FileEventWriter::json_lines(&path).unwrap();
            writer.write_batch(&[record(1), record(2)]).unwrap();
            writer.flush().unwrap();
        }
        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let back: EventRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(back, record(2));
    }

    #[test]
    fn json_array_file_parses_as_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        {
            let mut writer = FileEventWriter::json_array(&path).unwrap();
            writer.write_record(&record(1)).unwrap();
            writer.write_record(&record(2)).unwrap();
            writer.flush().unwrap();
            // drop でもう一度 flush されても壊れない
        }
        let text = std::fs::read_to_string(&path).unwrap();
        let back: Vec<EventRecord> = serde_json::from_str(&text).unwrap();
        assert_eq!(back.len(), 2);
    }
}
