// 该文件是 Reco Agent 项目的一部分。
// src/config.rs - 工具包配置
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;

/// 默认的工具包工作目录
pub const DEFAULT_USER_PATH: &str = "./debug/reco-agent";

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("选项不是合法的 JSON: {0}")]
  InvalidJson(#[from] serde_json::Error),
  #[error("选项必须是 JSON 对象，实际为: {0}")]
  NotAnObject(String),
}

/// 传给 `Toolkit::config_init_option` 的配置
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
  user_path: PathBuf,
  options: Map<String, Value>,
}

impl Default for AgentConfig {
  fn default() -> Self {
    Self {
      user_path: PathBuf::from(DEFAULT_USER_PATH),
      options: Map::new(),
    }
  }
}

impl AgentConfig {
  pub fn with_user_path(mut self, user_path: impl Into<PathBuf>) -> Self {
    self.user_path = user_path.into();
    self
  }

  /// 从 JSON 文本设置选项，只接受对象
  pub fn with_options_json(mut self, json: &str) -> Result<Self, ConfigError> {
    match serde_json::from_str::<Value>(json)? {
      Value::Object(options) => {
        self.options = options;
        Ok(self)
      }
      other => Err(ConfigError::NotAnObject(other.to_string())),
    }
  }

  pub fn user_path(&self) -> &Path {
    &self.user_path
  }

  pub fn options(&self) -> &Map<String, Value> {
    &self.options
  }

  /// 序列化后的选项，空选项为 `{}`
  pub fn options_json(&self) -> String {
    Value::Object(self.options.clone()).to_string()
  }
}
