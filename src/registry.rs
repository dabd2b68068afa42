// 该文件是 Reco Agent 项目的一部分。
// src/registry.rs - 自定义识别/动作注册表
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

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
  action::CustomAction,
  framework::AgentServer,
  recognition::{CustomRecognition, MY_RECO_1, MyReco1},
};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
  #[error("名称不能为空")]
  EmptyName,
  #[error("重复注册: {0}")]
  Duplicate(String),
}

/// 按名称保存的识别与动作，按插入顺序注册到框架
#[derive(Default, Clone)]
pub struct Registry {
  recognitions: Vec<(String, Arc<dyn CustomRecognition>)>,
  actions: Vec<(String, Arc<dyn CustomAction>)>,
}

impl std::fmt::Debug for Registry {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Registry")
      .field("recognitions", &self.recognition_names().collect::<Vec<_>>())
      .field("actions", &self.action_names().collect::<Vec<_>>())
      .finish()
  }
}

impl Registry {
  pub fn new() -> Self {
    Self::default()
  }

  /// 内置注册表，仅包含 MyReco1
  pub fn builtin() -> Self {
    let mut registry = Self::new();
    registry
      .recognitions
      .push((MY_RECO_1.to_string(), Arc::new(MyReco1)));
    registry
  }

  pub fn add_recognition(
    &mut self,
    name: &str,
    recognition: impl CustomRecognition + 'static,
  ) -> Result<(), RegistryError> {
    check_name(name, self.recognition_names())?;
    self
      .recognitions
      .push((name.to_string(), Arc::new(recognition)));
    Ok(())
  }

  pub fn add_action(
    &mut self,
    name: &str,
    action: impl CustomAction + 'static,
  ) -> Result<(), RegistryError> {
    check_name(name, self.action_names())?;
    self.actions.push((name.to_string(), Arc::new(action)));
    Ok(())
  }

  pub fn recognition_names(&self) -> impl Iterator<Item = &str> {
    self.recognitions.iter().map(|(name, _)| name.as_str())
  }

  pub fn action_names(&self) -> impl Iterator<Item = &str> {
    self.actions.iter().map(|(name, _)| name.as_str())
  }

  pub fn len(&self) -> usize {
    self.recognitions.len() + self.actions.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// 先注册识别再注册动作，返回框架接受的数量
  pub fn register_into<S: AgentServer + ?Sized>(&self, server: &mut S) -> usize {
    let mut accepted = 0;
    for (name, recognition) in &self.recognitions {
      if server.register_custom_recognition(name, Arc::clone(recognition)) {
        info!("已注册自定义识别: {}", name);
        accepted += 1;
      } else {
        warn!("注册自定义识别失败: {}", name);
      }
    }
    for (name, action) in &self.actions {
      if server.register_custom_action(name, Arc::clone(action)) {
        info!("已注册自定义动作: {}", name);
        accepted += 1;
      } else {
        warn!("注册自定义动作失败: {}", name);
      }
    }
    accepted
  }
}

fn check_name<'a>(
  name: &str,
  mut existing: impl Iterator<Item = &'a str>,
) -> Result<(), RegistryError> {
  if name.is_empty() {
    return Err(RegistryError::EmptyName);
  }
  if existing.any(|n| n == name) {
    return Err(RegistryError::Duplicate(name.to_string()));
  }
  Ok(())
}
