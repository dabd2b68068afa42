// 该文件是 Reco Agent 项目的一部分。
// src/recognition.rs - 自定义识别定义
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

use serde::{Serialize, de::DeserializeOwned};
use tracing::error;

/// 矩形区域，与框架的 `MaaRect` 一致
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
  pub x: i32,
  pub y: i32,
  pub width: i32,
  pub height: i32,
}

impl Rect {
  pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
    Self {
      x,
      y,
      width,
      height,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.width <= 0 || self.height <= 0
  }

  /// 两个矩形的交集，无交集时返回空矩形
  ///
  /// 右、下边界按 i64 计算，超大宽高不会溢出。
  pub fn intersect(&self, other: &Rect) -> Rect {
    let x0 = self.x.max(other.x);
    let y0 = self.y.max(other.y);
    let x1 = self.right().min(other.right());
    let y1 = self.bottom().min(other.bottom());
    if x1 <= x0 as i64 || y1 <= y0 as i64 {
      return Rect::default();
    }
    // 交集宽高不超过任一输入的宽高
    Rect::new(x0, y0, (x1 - x0 as i64) as i32, (y1 - y0 as i64) as i32)
  }

  fn right(&self) -> i64 {
    self.x as i64 + self.width as i64
  }

  fn bottom(&self) -> i64 {
    self.y as i64 + self.height as i64
  }
}

/// 框架图像缓冲区的只读视图
///
/// 数据为行优先、通道交错排列的 BGR（3 通道）或 BGRA（4 通道）字节，
/// 只在一次回调期间有效。
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
  width: u32,
  height: u32,
  channels: u32,
  data: &'a [u8],
}

impl<'a> ImageView<'a> {
  /// 从原始字节构造视图，长度与尺寸不符时返回 `None`
  pub fn new(width: u32, height: u32, channels: u32, data: &'a [u8]) -> Option<Self> {
    let expected = width as usize * height as usize * channels as usize;
    if data.len() != expected {
      error!(
        "图像数据长度不匹配: 期望长度 {}, 实际长度 {}",
        expected,
        data.len()
      );
      return None;
    }
    Some(Self {
      width,
      height,
      channels,
      data,
    })
  }

  pub fn empty() -> Self {
    Self {
      width: 0,
      height: 0,
      channels: 0,
      data: &[],
    }
  }

  pub fn width(&self) -> u32 {
    self.width
  }

  pub fn height(&self) -> u32 {
    self.height
  }

  pub fn channels(&self) -> u32 {
    self.channels
  }

  pub fn as_bytes(&self) -> &'a [u8] {
    self.data
  }

  pub fn is_empty(&self) -> bool {
    self.data.is_empty()
  }

  pub fn bounds(&self) -> Rect {
    Rect::new(
      0,
      0,
      i32::try_from(self.width).unwrap_or(i32::MAX),
      i32::try_from(self.height).unwrap_or(i32::MAX),
    )
  }

  /// 实际参与识别的区域：ROI 为空表示整幅图像，否则裁剪到图像范围内
  pub fn effective_roi(&self, roi: &Rect) -> Rect {
    if roi.is_empty() {
      return self.bounds();
    }
    roi.intersect(&self.bounds())
  }

  /// 转换为 RGB 图像，不支持的通道数返回 `None`
  #[cfg(feature = "image_view")]
  pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
    if self.is_empty() || !(self.channels == 3 || self.channels == 4) {
      return None;
    }
    let channels = self.channels as usize;
    let mut rgb = Vec::with_capacity(self.width as usize * self.height as usize * 3);
    for pixel in self.data.chunks_exact(channels) {
      rgb.extend_from_slice(&[pixel[2], pixel[1], pixel[0]]);
    }
    image::RgbImage::from_raw(self.width, self.height, rgb)
  }
}

/// 一次识别调用的输入，由框架在回调期间借出
#[derive(Debug, Clone, Copy)]
pub struct RecognitionRequest<'a> {
  pub task_id: i64,
  pub node_name: &'a str,
  pub recognition_name: &'a str,
  pub param: &'a str,
  pub image: ImageView<'a>,
  pub roi: Rect,
}

impl RecognitionRequest<'_> {
  /// 将 custom_recognition_param 解析为 JSON
  ///
  /// 空参数得到默认值；格式错误时记录日志并回退到默认值。
  pub fn param<T: DeserializeOwned + Default>(&self) -> T {
    decode_param(self.node_name, self.param)
  }
}

pub(crate) fn decode_param<T: DeserializeOwned + Default>(node_name: &str, raw: &str) -> T {
  let raw = raw.trim();
  if raw.is_empty() {
    return T::default();
  }
  match serde_json::from_str(raw) {
    Ok(value) => value,
    Err(e) => {
      error!(
        "节点 {} 的参数解析失败，使用默认值: {}, 原始参数: {}",
        node_name, e, raw
      );
      T::default()
    }
  }
}

/// 识别命中时的输出：结果框与详情字符串
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionOutput {
  pub rect: Rect,
  pub detail: String,
}

impl RecognitionOutput {
  pub fn new(rect: Rect, detail: impl Into<String>) -> Self {
    Self {
      rect,
      detail: detail.into(),
    }
  }

  pub fn with_json_detail<T: Serialize>(rect: Rect, detail: &T) -> Result<Self, serde_json::Error> {
    Ok(Self {
      rect,
      detail: serde_json::to_string(detail)?,
    })
  }
}

/// 按名称注册到框架的自定义识别
///
/// 框架可能在自己的线程上并发调用，实现不应依赖调用之间的可变状态。
/// 返回 `None` 表示未识别到目标。
pub trait CustomRecognition: Send + Sync {
  fn analyze(&self, request: &RecognitionRequest<'_>) -> Option<RecognitionOutput>;
}

impl<F> CustomRecognition for F
where
  F: Fn(&RecognitionRequest<'_>) -> Option<RecognitionOutput> + Send + Sync,
{
  fn analyze(&self, request: &RecognitionRequest<'_>) -> Option<RecognitionOutput> {
    self(request)
  }
}

mod my_reco_1;
pub use self::my_reco_1::{MY_RECO_1, MyReco1};
