// 该文件是 Reco Agent 项目的一部分。
// src/main.rs - Agent 主程序
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

use reco_agent::{env::setup_library_dir, ffi::MaaFramework};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
  tracing_subscriber::registry()
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
    .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
    .init();

  let mut framework = MaaFramework::new();
  let code = reco_agent::run(std::env::args_os(), &mut framework, setup_library_dir);

  // 退出前释放回调
  drop(framework);
  std::process::exit(code);
}
