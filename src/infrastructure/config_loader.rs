// 設定ファイルの読み込み

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::domain::config::EngineConfig;

/// JSON設定を読み込み、検証して返す（省略した項目は既定値）
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("設定ファイルを読めません: {}", path.display()))?;
    parse_config(&text).with_context(|| format!("設定ファイルが不正です: {}", path.display()))
}

/// JSON文字列から設定を作る
pub fn parse_config(text: &str) -> Result<EngineConfig> {
    let config: EngineConfig = serde_json::from_str(text).context("JSONの解析に失敗しました")?;
    config.validate()?;
    Ok(config)
}

/// 設定をJSONで保存する
pub fn save_config(path: &Path, config: &EngineConfig) -> Result<()> {
    let json = serde_json::to_string_pretty(config)?;
    fs::write(path, json)
        .with_context(|| format!("設定ファイルを書けません: {}", path.display()))?;
    Ok(())
}
