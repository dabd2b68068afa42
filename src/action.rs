// 该文件是 Reco Agent 项目的一部分。
// src/action.rs - 自定义动作定义
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

use serde::de::DeserializeOwned;

use crate::recognition::{Rect, decode_param};

/// 一次动作调用的输入
#[derive(Debug, Clone, Copy)]
pub struct ActionRequest<'a> {
  pub task_id: i64,
  pub node_name: &'a str,
  pub action_name: &'a str,
  pub param: &'a str,
  /// 触发该动作的识别 ID
  pub reco_id: i64,
  /// 识别得到的结果框
  pub rect: Rect,
}

impl ActionRequest<'_> {
  /// 将 custom_action_param 解析为 JSON，规则同识别参数
  pub fn param<T: DeserializeOwned + Default>(&self) -> T {
    decode_param(self.node_name, self.param)
  }
}

pub trait CustomAction: Send + Sync {
  fn run(&self, request: &ActionRequest<'_>) -> bool;
}

impl<F> CustomAction for F
where
  F: Fn(&ActionRequest<'_>) -> bool + Send + Sync,
{
  fn run(&self, request: &ActionRequest<'_>) -> bool {
    self(request)
  }
}
