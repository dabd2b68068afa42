// 该文件是 Reco Agent 项目的一部分。
// tests/bootstrap.rs - 启动流程测试
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

use std::{cell::Cell, path::Path, rc::Rc, sync::Arc};

use reco_agent::{
  Agent, EXIT_OK, EXIT_USAGE,
  action::CustomAction,
  config::{AgentConfig, DEFAULT_USER_PATH},
  env::EnvSetupError,
  framework::{AgentServer, Toolkit},
  recognition::{
    CustomRecognition, ImageView, MY_RECO_1, Rect, RecognitionOutput, RecognitionRequest,
  },
  registry::Registry,
};

#[derive(Debug, Clone, PartialEq)]
enum Call {
  ConfigInit(String, String),
  RegisterRecognition(String),
  RegisterAction(String),
  StartUp(String),
  Join,
  ShutDown,
}

#[derive(Default)]
struct RecordingFramework {
  calls: Vec<Call>,
  recognitions: Vec<Arc<dyn CustomRecognition>>,
  fail_all: bool,
  env_ready: Rc<Cell<bool>>,
  env_ready_at_config: Option<bool>,
}

impl Toolkit for RecordingFramework {
  fn config_init_option(&mut self, user_path: &Path, default_json: &str) -> bool {
    self.env_ready_at_config = Some(self.env_ready.get());
    self.calls.push(Call::ConfigInit(
      user_path.display().to_string(),
      default_json.to_string(),
    ));
    !self.fail_all
  }
}

impl AgentServer for RecordingFramework {
  fn register_custom_recognition(
    &mut self,
    name: &str,
    recognition: Arc<dyn CustomRecognition>,
  ) -> bool {
    self.calls.push(Call::RegisterRecognition(name.to_string()));
    self.recognitions.push(recognition);
    !self.fail_all
  }

  fn register_custom_action(&mut self, name: &str, _: Arc<dyn CustomAction>) -> bool {
    self.calls.push(Call::RegisterAction(name.to_string()));
    !self.fail_all
  }

  fn start_up(&mut self, identifier: &str) -> bool {
    self.calls.push(Call::StartUp(identifier.to_string()));
    !self.fail_all
  }

  fn join(&mut self) {
    self.calls.push(Call::Join);
  }

  fn shut_down(&mut self) {
    self.calls.push(Call::ShutDown);
  }
}

fn env_ok() -> Result<(), EnvSetupError> {
  Ok(())
}

fn env_fail() -> Result<(), EnvSetupError> {
  Err(EnvSetupError::MissingDir("maafw".into()))
}

fn full_sequence(identifier: &str) -> Vec<Call> {
  vec![
    Call::ConfigInit(DEFAULT_USER_PATH.to_string(), "{}".to_string()),
    Call::RegisterRecognition(MY_RECO_1.to_string()),
    Call::StartUp(identifier.to_string()),
    Call::Join,
    Call::ShutDown,
  ]
}

#[test]
fn missing_socket_id_never_touches_framework() {
  let mut framework = RecordingFramework::default();
  let code = reco_agent::run(["reco-agent"], &mut framework, env_ok);
  assert_eq!(code, EXIT_USAGE);
  assert!(framework.calls.is_empty());
}

#[test]
fn single_identifier_runs_full_sequence_once() {
  let mut framework = RecordingFramework::default();
  let code = reco_agent::run(["reco-agent", "abc123"], &mut framework, env_ok);
  assert_eq!(code, EXIT_OK);
  assert_eq!(framework.calls, full_sequence("abc123"));
}

#[test]
fn last_argument_is_identifier() {
  let mut framework = RecordingFramework::default();
  let code = reco_agent::run(["reco-agent", "first", "abc123"], &mut framework, env_ok);
  assert_eq!(code, EXIT_OK);
  assert_eq!(framework.calls, full_sequence("abc123"));
}

#[test]
fn env_setup_failure_is_not_fatal() {
  let mut framework = RecordingFramework::default();
  let code = reco_agent::run(["reco-agent", "abc123"], &mut framework, env_fail);
  assert_eq!(code, EXIT_OK);
  assert_eq!(framework.calls, full_sequence("abc123"));
}

#[test]
fn env_setup_precedes_first_framework_call() {
  let mut framework = RecordingFramework::default();
  let env_ready = Rc::clone(&framework.env_ready);
  let code = reco_agent::run(["reco-agent", "abc123"], &mut framework, move || {
    env_ready.set(true);
    Ok(())
  });
  assert_eq!(code, EXIT_OK);
  assert_eq!(framework.env_ready_at_config, Some(true));
}

#[test]
fn framework_failures_do_not_change_sequence() {
  let mut framework = RecordingFramework {
    fail_all: true,
    ..Default::default()
  };
  let code = reco_agent::run(["reco-agent", "abc123"], &mut framework, env_ok);
  assert_eq!(code, EXIT_OK);
  assert_eq!(framework.calls, full_sequence("abc123"));
}

#[test]
fn invalid_options_fall_back_to_empty_object() {
  let mut framework = RecordingFramework::default();
  let code = reco_agent::run(
    ["reco-agent", "--options", "\"text\"", "abc123"],
    &mut framework,
    env_ok,
  );
  assert_eq!(code, EXIT_OK);
  assert_eq!(framework.calls, full_sequence("abc123"));
}

#[test]
fn hyphenated_identifier_is_opaque() {
  for identifier in ["-abc123", "-V", "--help", "--user-path"] {
    let mut framework = RecordingFramework::default();
    let code = reco_agent::run(["reco-agent", identifier], &mut framework, env_ok);
    assert_eq!(code, EXIT_OK, "identifier {identifier}");
    assert_eq!(framework.calls, full_sequence(identifier));
  }
}

#[test]
fn unknown_arguments_before_identifier_are_ignored() {
  for argv in [
    vec!["reco-agent", "--foo", "abc123"],
    vec!["reco-agent", "--verbose", "child", "-x", "abc123"],
    vec!["reco-agent", "--user-path", "abc123"],
  ] {
    let mut framework = RecordingFramework::default();
    let code = reco_agent::run(argv.clone(), &mut framework, env_ok);
    assert_eq!(code, EXIT_OK, "argv {argv:?}");
    assert_eq!(framework.calls, full_sequence("abc123"));
  }
}

#[test]
fn identifier_after_trailing_flag_name() {
  let mut framework = RecordingFramework::default();
  let code = reco_agent::run(
    ["reco-agent", "abc123", "--user-path"],
    &mut framework,
    env_ok,
  );
  assert_eq!(code, EXIT_OK);
  assert_eq!(framework.calls, full_sequence("--user-path"));
}

#[test]
fn help_before_identifier_never_touches_framework() {
  let mut framework = RecordingFramework::default();
  let code = reco_agent::run(["reco-agent", "--help", "abc123"], &mut framework, env_ok);
  assert_eq!(code, EXIT_OK);
  assert!(framework.calls.is_empty());
}

#[test]
fn custom_options_and_user_path_reach_toolkit() {
  let mut framework = RecordingFramework::default();
  let code = reco_agent::run(
    [
      "reco-agent",
      "--user-path",
      "./debug/other",
      "--options",
      r#"{"save_draw": false}"#,
      "sock",
    ],
    &mut framework,
    env_ok,
  );
  assert_eq!(code, EXIT_OK);
  assert_eq!(
    framework.calls[0],
    Call::ConfigInit(
      "./debug/other".to_string(),
      r#"{"save_draw":false}"#.to_string()
    )
  );
}

#[test]
fn registered_recognition_reports_no_detection() {
  let mut framework = RecordingFramework::default();
  Agent::new("sock", AgentConfig::default()).run(&mut framework);
  assert_eq!(framework.recognitions.len(), 1);

  let data = [0u8; 2 * 2 * 3];
  let request = RecognitionRequest {
    task_id: 1,
    node_name: "Start",
    recognition_name: MY_RECO_1,
    param: "",
    image: ImageView::new(2, 2, 3, &data).expect("valid image"),
    roi: Rect::default(),
  };
  assert!(framework.recognitions[0].analyze(&request).is_none());
}

#[test]
fn custom_registry_replaces_builtin() {
  let mut registry = Registry::new();
  registry
    .add_recognition("Other", |_: &RecognitionRequest<'_>| -> Option<RecognitionOutput> {
      None
    })
    .expect("unique");
  registry
    .add_action("ScreenShot", |_: &reco_agent::action::ActionRequest<'_>| true)
    .expect("unique");

  let mut framework = RecordingFramework::default();
  Agent::new("sock", AgentConfig::default())
    .with_registry(registry)
    .run(&mut framework);

  assert_eq!(
    framework.calls,
    vec![
      Call::ConfigInit(DEFAULT_USER_PATH.to_string(), "{}".to_string()),
      Call::RegisterRecognition("Other".to_string()),
      Call::RegisterAction("ScreenShot".to_string()),
      Call::StartUp("sock".to_string()),
      Call::Join,
      Call::ShutDown,
    ]
  );
}
