// 该文件是 Reco Agent 项目的一部分。
// src/ffi.rs - MaaFramework 原生接口绑定
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
  borrow::Cow,
  ffi::{CStr, CString, c_char, c_void},
  panic::{self, AssertUnwindSafe},
  path::Path,
  sync::Arc,
};

use tracing::{debug, error};

use crate::{
  action::{ActionRequest, CustomAction},
  framework::{AgentServer, Toolkit},
  recognition::{CustomRecognition, ImageView, Rect, RecognitionOutput, RecognitionRequest},
};

pub type MaaBool = u8;
pub type MaaId = i64;
pub type MaaTaskId = MaaId;
pub type MaaRecoId = MaaId;
pub type MaaSize = u64;

pub const MAA_TRUE: MaaBool = 1;
pub const MAA_FALSE: MaaBool = 0;

#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct MaaRect {
  pub x: i32,
  pub y: i32,
  pub width: i32,
  pub height: i32,
}

impl From<MaaRect> for Rect {
  fn from(rect: MaaRect) -> Self {
    Rect::new(rect.x, rect.y, rect.width, rect.height)
  }
}

impl From<Rect> for MaaRect {
  fn from(rect: Rect) -> Self {
    MaaRect {
      x: rect.x,
      y: rect.y,
      width: rect.width,
      height: rect.height,
    }
  }
}

#[repr(C)]
pub struct MaaContext {
  _private: [u8; 0],
}

#[repr(C)]
pub struct MaaImageBuffer {
  _private: [u8; 0],
}

#[repr(C)]
pub struct MaaStringBuffer {
  _private: [u8; 0],
}

pub type MaaCustomRecognitionCallback = unsafe extern "C" fn(
  context: *mut MaaContext,
  task_id: MaaTaskId,
  node_name: *const c_char,
  custom_recognition_name: *const c_char,
  custom_recognition_param: *const c_char,
  image: *const MaaImageBuffer,
  roi: *const MaaRect,
  trans_arg: *mut c_void,
  out_box: *mut MaaRect,
  out_detail: *mut MaaStringBuffer,
) -> MaaBool;

pub type MaaCustomActionCallback = unsafe extern "C" fn(
  context: *mut MaaContext,
  task_id: MaaTaskId,
  node_name: *const c_char,
  custom_action_name: *const c_char,
  custom_action_param: *const c_char,
  reco_id: MaaRecoId,
  box_: *const MaaRect,
  trans_arg: *mut c_void,
) -> MaaBool;

#[allow(non_snake_case)]
#[link(name = "MaaAgentServer")]
unsafe extern "C" {
  pub fn MaaAgentServerRegisterCustomRecognition(
    name: *const c_char,
    recognition: MaaCustomRecognitionCallback,
    trans_arg: *mut c_void,
  ) -> MaaBool;
  pub fn MaaAgentServerRegisterCustomAction(
    name: *const c_char,
    action: MaaCustomActionCallback,
    trans_arg: *mut c_void,
  ) -> MaaBool;
  pub fn MaaAgentServerStartUp(identifier: *const c_char) -> MaaBool;
  pub fn MaaAgentServerShutDown();
  pub fn MaaAgentServerJoin();

  pub fn MaaImageBufferIsEmpty(handle: *const MaaImageBuffer) -> MaaBool;
  pub fn MaaImageBufferGetRawData(handle: *const MaaImageBuffer) -> *mut c_void;
  pub fn MaaImageBufferWidth(handle: *const MaaImageBuffer) -> i32;
  pub fn MaaImageBufferHeight(handle: *const MaaImageBuffer) -> i32;
  pub fn MaaImageBufferChannels(handle: *const MaaImageBuffer) -> i32;

  pub fn MaaStringBufferSetEx(
    handle: *mut MaaStringBuffer,
    str: *const c_char,
    size: MaaSize,
  ) -> MaaBool;
}

#[allow(non_snake_case)]
#[link(name = "MaaToolkit")]
unsafe extern "C" {
  pub fn MaaToolkitConfigInitOption(user_path: *const c_char, default_json: *const c_char)
  -> MaaBool;
}

struct RecognitionSlot {
  name: String,
  recognition: Arc<dyn CustomRecognition>,
}

struct ActionSlot {
  name: String,
  action: Arc<dyn CustomAction>,
}

/// 通过原生库实现的框架
///
/// 注册的回调由本结构体持有，其地址作为 `trans_arg` 交给框架，
/// 因此必须在 `shut_down` 之后才能释放。框架状态是进程级的，只应创建一个实例。
#[derive(Default)]
pub struct MaaFramework {
  recognitions: Vec<Box<RecognitionSlot>>,
  actions: Vec<Box<ActionSlot>>,
}

impl MaaFramework {
  pub fn new() -> Self {
    Self::default()
  }
}

fn to_cstring(s: &str) -> Option<CString> {
  match CString::new(s) {
    Ok(c) => Some(c),
    Err(e) => {
      error!("字符串包含 NUL 字符: {:?}, 错误: {}", s, e);
      None
    }
  }
}

impl Toolkit for MaaFramework {
  fn config_init_option(&mut self, user_path: &Path, default_json: &str) -> bool {
    let (Some(user_path), Some(default_json)) = (
      to_cstring(&user_path.to_string_lossy()),
      to_cstring(default_json),
    ) else {
      return false;
    };
    // SAFETY: 两个参数都是有效的 C 字符串
    unsafe { MaaToolkitConfigInitOption(user_path.as_ptr(), default_json.as_ptr()) != MAA_FALSE }
  }
}

impl AgentServer for MaaFramework {
  fn register_custom_recognition(
    &mut self,
    name: &str,
    recognition: Arc<dyn CustomRecognition>,
  ) -> bool {
    let Some(c_name) = to_cstring(name) else {
      return false;
    };
    let slot = Box::new(RecognitionSlot {
      name: name.to_string(),
      recognition,
    });
    let trans_arg = &*slot as *const RecognitionSlot as *mut c_void;
    self.recognitions.push(slot);
    // SAFETY: trans_arg 指向的 slot 在 self 被释放前一直有效
    unsafe {
      MaaAgentServerRegisterCustomRecognition(c_name.as_ptr(), recognition_callback, trans_arg)
        != MAA_FALSE
    }
  }

  fn register_custom_action(&mut self, name: &str, action: Arc<dyn CustomAction>) -> bool {
    let Some(c_name) = to_cstring(name) else {
      return false;
    };
    let slot = Box::new(ActionSlot {
      name: name.to_string(),
      action,
    });
    let trans_arg = &*slot as *const ActionSlot as *mut c_void;
    self.actions.push(slot);
    // SAFETY: 同上
    unsafe {
      MaaAgentServerRegisterCustomAction(c_name.as_ptr(), action_callback, trans_arg) != MAA_FALSE
    }
  }

  fn start_up(&mut self, identifier: &str) -> bool {
    let Some(identifier) = to_cstring(identifier) else {
      return false;
    };
    // SAFETY: identifier 是有效的 C 字符串
    unsafe { MaaAgentServerStartUp(identifier.as_ptr()) != MAA_FALSE }
  }

  fn join(&mut self) {
    // SAFETY: 无参数
    unsafe { MaaAgentServerJoin() }
  }

  fn shut_down(&mut self) {
    // SAFETY: 无参数
    unsafe { MaaAgentServerShutDown() }
  }
}

/// 空指针视为空字符串
unsafe fn str_arg<'a>(ptr: *const c_char) -> Cow<'a, str> {
  if ptr.is_null() {
    return Cow::Borrowed("");
  }
  // SAFETY: 框架传入以 NUL 结尾的字符串，回调期间有效
  unsafe { CStr::from_ptr(ptr) }.to_string_lossy()
}

unsafe fn rect_arg(ptr: *const MaaRect) -> Rect {
  if ptr.is_null() {
    return Rect::default();
  }
  // SAFETY: 非空且回调期间有效
  unsafe { *ptr }.into()
}

unsafe fn image_arg<'a>(image: *const MaaImageBuffer) -> ImageView<'a> {
  if image.is_null() {
    return ImageView::empty();
  }
  // SAFETY: image 非空且回调期间有效
  unsafe {
    if MaaImageBufferIsEmpty(image) != MAA_FALSE {
      return ImageView::empty();
    }
    let width = MaaImageBufferWidth(image);
    let height = MaaImageBufferHeight(image);
    let channels = MaaImageBufferChannels(image);
    let data = MaaImageBufferGetRawData(image) as *const u8;
    if data.is_null() || width <= 0 || height <= 0 || channels <= 0 {
      return ImageView::empty();
    }
    let len = width as usize * height as usize * channels as usize;
    let bytes = std::slice::from_raw_parts(data, len);
    ImageView::new(width as u32, height as u32, channels as u32, bytes)
      .unwrap_or_else(ImageView::empty)
  }
}

/// 写出命中结果；详情写入失败时按未命中处理
fn write_hit(
  name: &str,
  output: &RecognitionOutput,
  out_box: Option<&mut MaaRect>,
  set_detail: impl FnOnce(&str) -> bool,
) -> MaaBool {
  if let Some(out_box) = out_box {
    *out_box = output.rect.into();
  }
  if !set_detail(&output.detail) {
    error!("[{}] 写入识别详情失败", name);
    return MAA_FALSE;
  }
  MAA_TRUE
}

unsafe extern "C" fn recognition_callback(
  _context: *mut MaaContext,
  task_id: MaaTaskId,
  node_name: *const c_char,
  custom_recognition_name: *const c_char,
  custom_recognition_param: *const c_char,
  image: *const MaaImageBuffer,
  roi: *const MaaRect,
  trans_arg: *mut c_void,
  out_box: *mut MaaRect,
  out_detail: *mut MaaStringBuffer,
) -> MaaBool {
  if trans_arg.is_null() {
    return MAA_FALSE;
  }
  // SAFETY: trans_arg 由 register_custom_recognition 传入，指向 MaaFramework 持有的 slot
  let slot = unsafe { &*(trans_arg as *const RecognitionSlot) };

  let result = panic::catch_unwind(AssertUnwindSafe(|| {
    // SAFETY: 所有指针由框架提供，回调期间有效
    let (node_name, recognition_name, param, image, roi) = unsafe {
      (
        str_arg(node_name),
        str_arg(custom_recognition_name),
        str_arg(custom_recognition_param),
        image_arg(image),
        rect_arg(roi),
      )
    };
    let request = RecognitionRequest {
      task_id,
      node_name: &node_name,
      recognition_name: &recognition_name,
      param: &param,
      image,
      roi,
    };
    slot.recognition.analyze(&request)
  }));

  match result {
    Ok(Some(output)) => {
      debug!("[{}] 命中: {:?}", slot.name, output.rect);
      // SAFETY: 输出指针由框架持有，回调期间有效
      let out_box = unsafe { out_box.as_mut() };
      write_hit(&slot.name, &output, out_box, |detail| {
        out_detail.is_null()
          // SAFETY: 输出缓冲区非空，detail 按长度拷贝
          || unsafe {
            MaaStringBufferSetEx(
              out_detail,
              detail.as_ptr() as *const c_char,
              detail.len() as MaaSize,
            )
          } != MAA_FALSE
      })
    }
    Ok(None) => MAA_FALSE,
    Err(_) => {
      error!("[{}] 识别回调发生 panic", slot.name);
      MAA_FALSE
    }
  }
}

unsafe extern "C" fn action_callback(
  _context: *mut MaaContext,
  task_id: MaaTaskId,
  node_name: *const c_char,
  custom_action_name: *const c_char,
  custom_action_param: *const c_char,
  reco_id: MaaRecoId,
  box_: *const MaaRect,
  trans_arg: *mut c_void,
) -> MaaBool {
  if trans_arg.is_null() {
    return MAA_FALSE;
  }
  // SAFETY: trans_arg 由 register_custom_action 传入
  let slot = unsafe { &*(trans_arg as *const ActionSlot) };

  let result = panic::catch_unwind(AssertUnwindSafe(|| {
    // SAFETY: 所有指针由框架提供，回调期间有效
    let (node_name, action_name, param, rect) = unsafe {
      (
        str_arg(node_name),
        str_arg(custom_action_name),
        str_arg(custom_action_param),
        rect_arg(box_),
      )
    };
    slot.action.run(&ActionRequest {
      task_id,
      node_name: &node_name,
      action_name: &action_name,
      param: &param,
      reco_id,
      rect,
    })
  }));

  match result {
    Ok(true) => MAA_TRUE,
    Ok(false) => MAA_FALSE,
    Err(_) => {
      error!("[{}] 动作回调发生 panic", slot.name);
      MAA_FALSE
    }
  }
}
