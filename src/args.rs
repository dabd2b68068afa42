// 该文件是 Reco Agent 项目的一部分。
// src/args.rs - 命令行参数
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

use std::{ffi::OsString, path::PathBuf};

use clap::{CommandFactory, Parser};
use tracing::warn;

use crate::config::{AgentConfig, DEFAULT_USER_PATH};

/// MaaFramework 自定义识别 Agent
///
/// 最后一个参数总是 socket_id，不参与选项解析。
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(override_usage = "reco-agent [OPTIONS] <SOCKET_ID>")]
#[command(after_help = "socket_id 由 AgentIdentifier 提供。")]
pub struct Args {
  /// 工具包工作目录
  #[arg(long, value_name = "DIR", default_value = DEFAULT_USER_PATH)]
  pub user_path: PathBuf,

  /// 工具包选项（JSON 对象）
  #[arg(long, value_name = "JSON", default_value = "{}")]
  pub options: String,

  /// 启动方附带的其他参数，忽略
  #[arg(
    hide = true,
    num_args = 0..,
    trailing_var_arg = true,
    allow_hyphen_values = true
  )]
  pub passthrough: Vec<OsString>,
}

/// 拆分后的命令行：socket_id 与选项
#[derive(Debug)]
pub enum CommandLine {
  /// 参数不足两个
  MissingIdentifier,
  /// 帮助或版本信息
  Display(clap::Error),
  Run { identifier: String, args: Args },
}

impl CommandLine {
  /// 取最后一个参数作为 socket_id，其余参数尽量解析为选项
  ///
  /// 选项解析失败只产生警告并使用默认值。
  pub fn parse<I, T>(argv: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
  {
    let argv: Vec<OsString> = argv.into_iter().map(Into::into).collect();
    if argv.len() < 2 {
      return CommandLine::MissingIdentifier;
    }
    let Some((identifier, flags)) = argv.split_last() else {
      return CommandLine::MissingIdentifier;
    };
    let identifier = identifier.to_string_lossy().into_owned();

    let args = match Args::try_parse_from(flags.iter().cloned()) {
      Ok(args) => args,
      Err(e) if !e.use_stderr() => return CommandLine::Display(e),
      Err(e) => {
        warn!("忽略无法解析的选项，使用默认配置: {:?}", e.kind());
        Args::default_flags()
      }
    };
    CommandLine::Run { identifier, args }
  }
}

impl Args {
  fn default_flags() -> Self {
    Self {
      user_path: PathBuf::from(DEFAULT_USER_PATH),
      options: "{}".to_string(),
      passthrough: Vec::new(),
    }
  }

  pub fn usage() -> String {
    Args::command().render_usage().to_string()
  }

  /// 由选项得到工具包配置，`--options` 无效时记录警告并使用空选项
  pub fn config(&self) -> AgentConfig {
    let config = AgentConfig::default().with_user_path(self.user_path.clone());
    match config.clone().with_options_json(&self.options) {
      Ok(config) => config,
      Err(e) => {
        warn!("--options 无效，使用空选项: {}", e);
        config
      }
    }
  }
}
