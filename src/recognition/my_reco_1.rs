// 该文件是 Reco Agent 项目的一部分。
// src/recognition/my_reco_1.rs - MyReco1 占位识别
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

use tracing::debug;

use crate::recognition::{CustomRecognition, RecognitionOutput, RecognitionRequest};

/// 注册到框架时使用的识别名称
pub const MY_RECO_1: &str = "MyReco1";

/// 占位识别：识别逻辑尚未定义，始终报告未命中
#[derive(Debug, Default, Clone, Copy)]
pub struct MyReco1;

impl CustomRecognition for MyReco1 {
  fn analyze(&self, request: &RecognitionRequest<'_>) -> Option<RecognitionOutput> {
    let roi = request.image.effective_roi(&request.roi);
    debug!(
      "[{}] 任务 {} 节点 {}: 图像 {}x{}, ROI {:?}, 参数 {:?}",
      MY_RECO_1,
      request.task_id,
      request.node_name,
      request.image.width(),
      request.image.height(),
      roi,
      request.param
    );
    None
  }
}
