// 该文件是 Reco Agent 项目的一部分。
// src/framework.rs - 外部框架调用接口
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

use std::{path::Path, sync::Arc};

use crate::{action::CustomAction, recognition::CustomRecognition};

/// 工具包配置
pub trait Toolkit {
  /// 初始化工具包配置，需在其他调用之前执行一次
  fn config_init_option(&mut self, user_path: &Path, default_json: &str) -> bool;
}

/// Agent 服务端
///
/// 调用顺序：注册若干识别/动作，然后 `start_up`、`join`、`shut_down` 各一次。
pub trait AgentServer {
  fn register_custom_recognition(
    &mut self,
    name: &str,
    recognition: Arc<dyn CustomRecognition>,
  ) -> bool;

  fn register_custom_action(&mut self, name: &str, action: Arc<dyn CustomAction>) -> bool;

  fn start_up(&mut self, identifier: &str) -> bool;

  /// 阻塞直到框架通知结束
  fn join(&mut self);

  fn shut_down(&mut self);
}
