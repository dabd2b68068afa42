// 该文件是 Reco Agent 项目的一部分。
// build.rs - 构建脚本
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

use std::env;

/// 延迟加载的框架动态库，首次调用时才由系统加载
const DELAY_LOAD_DLLS: [&str; 2] = ["MaaAgentServer.dll", "MaaToolkit.dll"];

fn main() {
  println!("cargo:rerun-if-changed=build.rs");
  println!("cargo:rerun-if-env-changed=MAAFW_LIB_DIR");

  if env::var_os("CARGO_FEATURE_MAAFW").is_none() {
    return;
  }

  if let Some(dir) = env::var_os("MAAFW_LIB_DIR") {
    println!("cargo:rustc-link-search=native={}", dir.to_string_lossy());
  }

  let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
  let target_env = env::var("CARGO_CFG_TARGET_ENV").unwrap_or_default();
  // Windows 在 main 之前解析导入表；延迟加载后 main 中设置的搜索路径才会生效
  if target_os == "windows" && target_env == "msvc" {
    for dll in DELAY_LOAD_DLLS {
      println!("cargo:rustc-link-arg-bins=/DELAYLOAD:{}", dll);
    }
    println!("cargo:rustc-link-lib=delayimp");
  }
}
