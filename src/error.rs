// 该文件是 Reco Agent 项目的一部分。
// src/error.rs - 错误定义
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

use thiserror::Error;

/// 正常退出
pub const EXIT_OK: i32 = 0;
/// 参数错误
pub const EXIT_USAGE: i32 = -1;

#[derive(Error, Debug)]
pub enum AgentError {
  #[error("缺少 socket_id\n{usage}\nsocket_id 由 AgentIdentifier 提供。")]
  MissingIdentifier { usage: String },
  /// 帮助或版本信息，不是失败
  #[error("{0}")]
  Display(clap::Error),
}

impl AgentError {
  pub fn exit_code(&self) -> i32 {
    match self {
      AgentError::MissingIdentifier { .. } => EXIT_USAGE,
      AgentError::Display(_) => EXIT_OK,
    }
  }
}
