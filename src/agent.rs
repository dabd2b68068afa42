// 该文件是 Reco Agent 项目的一部分。
// src/agent.rs - Agent 启动流程
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

use std::ffi::OsString;

use tracing::{info, warn};

use crate::{
  args::{Args, CommandLine},
  config::AgentConfig,
  env::EnvSetupError,
  error::{AgentError, EXIT_OK},
  framework::{AgentServer, Toolkit},
  registry::Registry,
};

/// 一次 Agent 运行：配置工具包、注册识别、启动并等待服务端结束
#[derive(Debug)]
pub struct Agent {
  identifier: String,
  config: AgentConfig,
  registry: Registry,
}

impl Agent {
  pub fn new(identifier: impl Into<String>, config: AgentConfig) -> Self {
    Self {
      identifier: identifier.into(),
      config,
      registry: Registry::builtin(),
    }
  }

  pub fn from_args(identifier: impl Into<String>, args: &Args) -> Self {
    Self::new(identifier, args.config())
  }

  pub fn with_registry(mut self, registry: Registry) -> Self {
    self.registry = registry;
    self
  }

  pub fn identifier(&self) -> &str {
    &self.identifier
  }

  pub fn config(&self) -> &AgentConfig {
    &self.config
  }

  /// 依次执行配置、注册、启动、等待、关闭，各一次
  ///
  /// 框架调用的失败只记录日志，不改变后续流程。
  pub fn run<F: Toolkit + AgentServer + ?Sized>(self, framework: &mut F) {
    info!("Hello, reco-agent!");

    let options = self.config.options_json();
    info!(
      "初始化工具包配置: {}, 选项: {}",
      self.config.user_path().display(),
      options
    );
    if !framework.config_init_option(self.config.user_path(), &options) {
      warn!("工具包配置初始化失败");
    }

    let accepted = self.registry.register_into(framework);
    info!("共注册 {}/{} 项", accepted, self.registry.len());

    info!("启动 Agent 服务端: {}", self.identifier);
    if !framework.start_up(&self.identifier) {
      warn!("Agent 服务端启动失败: {}", self.identifier);
    }

    info!("等待框架结束...");
    framework.join();

    framework.shut_down();
    info!("Agent 服务端已关闭");
  }
}

/// 从命令行启动 Agent，返回进程退出码
///
/// 最后一个参数是 socket_id；参数不足两个时返回 `EXIT_USAGE` 且不调用框架。
/// `prepare_env` 在解析参数前执行，失败只会产生警告。
pub fn run<I, T, F, E>(argv: I, framework: &mut F, prepare_env: E) -> i32
where
  I: IntoIterator<Item = T>,
  T: Into<OsString>,
  F: Toolkit + AgentServer + ?Sized,
  E: FnOnce() -> Result<(), EnvSetupError>,
{
  if let Err(e) = prepare_env() {
    warn!("设置动态库目录失败: {}", e);
  }

  let agent = match parse_agent(argv) {
    Ok(agent) => agent,
    Err(e) => {
      report(&e);
      return e.exit_code();
    }
  };

  agent.run(framework);
  EXIT_OK
}

fn parse_agent<I, T>(argv: I) -> Result<Agent, AgentError>
where
  I: IntoIterator<Item = T>,
  T: Into<OsString>,
{
  match CommandLine::parse(argv) {
    CommandLine::MissingIdentifier => Err(AgentError::MissingIdentifier {
      usage: Args::usage(),
    }),
    CommandLine::Display(e) => Err(AgentError::Display(e)),
    CommandLine::Run { identifier, args } => Ok(Agent::from_args(identifier, &args)),
  }
}

fn report(error: &AgentError) {
  match error {
    // 帮助与版本信息输出到 stdout
    AgentError::Display(e) => {
      if let Err(err) = e.print() {
        warn!("输出帮助信息失败: {}", err);
      }
    }
    AgentError::MissingIdentifier { .. } => eprintln!("{}", error),
  }
}
