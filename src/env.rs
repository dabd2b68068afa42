// 该文件是 Reco Agent 项目的一部分。
// src/env.rs - 运行环境准备
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

use std::{
  env,
  path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::debug;

/// 与可执行文件同级、存放框架动态库的目录
pub const LIBRARY_DIR_NAME: &str = "maafw";

#[derive(Error, Debug)]
pub enum EnvSetupError {
  #[error("无法定位可执行文件: {0}")]
  CurrentExe(#[from] std::io::Error),
  #[error("可执行文件没有父目录: {0}")]
  NoParent(PathBuf),
  #[error("动态库目录不存在: {0}")]
  MissingDir(PathBuf),
  #[error("无法拼接搜索路径: {0}")]
  JoinPaths(#[from] env::JoinPathsError),
}

/// 可执行文件旁的框架动态库目录
pub fn library_dir(exe: &Path) -> Result<PathBuf, EnvSetupError> {
  let parent = exe
    .parent()
    .ok_or_else(|| EnvSetupError::NoParent(exe.to_path_buf()))?;
  let dir = parent.join(LIBRARY_DIR_NAME);
  if !dir.is_dir() {
    return Err(EnvSetupError::MissingDir(dir));
  }
  Ok(dir)
}

/// 将 `dir` 放到搜索路径变量 `var` 的最前面，已存在则不重复添加
///
/// 修改进程环境变量，只应在启动其他线程之前调用。
pub fn prepend_search_path(var: &str, dir: &Path) -> Result<(), EnvSetupError> {
  let mut paths: Vec<PathBuf> = env::var_os(var)
    .map(|value| env::split_paths(&value).collect())
    .unwrap_or_default();
  if paths.iter().any(|p| p == dir) {
    debug!("{} 已包含 {}", var, dir.display());
    return Ok(());
  }
  paths.insert(0, dir.to_path_buf());
  let joined = env::join_paths(paths)?;
  // SAFETY: 启动阶段单线程调用
  unsafe { env::set_var(var, joined) };
  Ok(())
}

/// 让框架的动态库可以被找到
///
/// 仅 Windows 需要，其他平台直接返回。Windows MSVC 下框架库由 build.rs
/// 设为延迟加载，首次调用框架时才按这里修改后的 PATH 搜索；
/// 因此必须在任何框架调用之前执行。
pub fn setup_library_dir() -> Result<(), EnvSetupError> {
  #[cfg(windows)]
  {
    let dir = library_dir(&env::current_exe()?)?;
    prepend_search_path("PATH", &dir)?;
    debug!("已添加动态库目录: {}", dir.display());
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_library_dir_requires_directory() {
    let root = tempfile::tempdir().expect("tempdir");
    let exe = root.path().join("reco-agent");
    assert!(matches!(library_dir(&exe), Err(EnvSetupError::MissingDir(_))));

    std::fs::create_dir(root.path().join(LIBRARY_DIR_NAME)).expect("mkdir");
    assert_eq!(
      library_dir(&exe).expect("exists"),
      root.path().join(LIBRARY_DIR_NAME)
    );
  }

  #[test]
  fn test_prepend_search_path_is_idempotent() {
    const VAR: &str = "RECO_AGENT_TEST_SEARCH_PATH";
    let dir = PathBuf::from("first-dir");
    prepend_search_path(VAR, &dir).expect("prepend");
    prepend_search_path(VAR, &dir).expect("prepend again");
    let value = env::var_os(VAR).expect("set");
    let paths: Vec<PathBuf> = env::split_paths(&value).collect();
    assert_eq!(paths, vec![dir]);
  }

  #[cfg(not(windows))]
  #[test]
  fn test_setup_is_noop_outside_windows() {
    let before = env::var_os("LD_LIBRARY_PATH");
    setup_library_dir().expect("no-op");
    assert_eq!(env::var_os("LD_LIBRARY_PATH"), before);
  }
}
