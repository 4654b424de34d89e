//! # Target 模块
//!
//! 动画目标适配器：宿主控件的可变状态。
//!
//! ## 核心概念
//!
//! - `Animatable`: 控件暴露给引擎的 getter/setter 接口
//! - `TargetSnapshot`: 控件激活时捕获的"原始值"，既是偏移类动画的锚点，也是硬重置的目标
//! - `WidgetTarget`: 基于 `Rc<RefCell<WidgetState>>` 的内存实现
//!
//! ## 设计说明
//!
//! 引擎只持有 `Rc<dyn Animatable>`，控件从不反向引用引擎。
//! 接口方法都取 `&self`，由实现方负责内部可变性，
//! 这样多个属性类型可以在同一帧交替写入而不违反借用规则。

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::transform::{Color, Vec2};

/// 可动画控件接口
///
/// ## 实现示例
///
/// ```rust,ignore
/// struct Button {
///     inner: Rc<RefCell<ButtonData>>,
/// }
///
/// impl Animatable for Button {
///     fn alpha(&self) -> f32 {
///         self.inner.borrow().alpha
///     }
///
///     fn set_alpha(&self, alpha: f32) {
///         self.inner.borrow_mut().alpha = alpha;
///     }
///
///     // 没有可着色的渲染表面时
///     fn tint(&self) -> Option<Color> {
///         None
///     }
///
///     fn set_tint(&self, _color: Color) -> bool {
///         false
///     }
///
///     // ...
/// }
/// ```
pub trait Animatable {
    /// 当前位置
    fn position(&self) -> Vec2;

    /// 设置位置
    fn set_position(&self, position: Vec2);

    /// 当前缩放
    fn scale(&self) -> Vec2;

    /// 设置缩放
    fn set_scale(&self, scale: Vec2);

    /// 绕法线轴的旋转角度（度）
    fn rotation(&self) -> f32;

    /// 设置旋转角度（度）
    fn set_rotation(&self, degrees: f32);

    /// 当前透明度
    fn alpha(&self) -> f32;

    /// 设置透明度
    fn set_alpha(&self, alpha: f32);

    /// 是否接收交互
    fn interactable(&self) -> bool;

    /// 设置交互开关（透明度容器上的门控）
    fn set_interactable(&self, interactable: bool);

    /// 渲染表面的当前颜色
    ///
    /// # 返回
    /// - `Some(color)`: 存在图像或文本表面
    /// - `None`: 没有可着色的表面
    fn tint(&self) -> Option<Color>;

    /// 设置渲染表面颜色
    ///
    /// # 返回
    /// - `true`: 设置成功
    /// - `false`: 没有可着色的表面，调用被忽略
    fn set_tint(&self, color: Color) -> bool;
}

/// 原始值快照
///
/// 控件首次激活时捕获一次，此后只在显式重新捕获时改变。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSnapshot {
    pub position: Vec2,
    pub scale: Vec2,
    pub rotation: f32,
    pub alpha: f32,
    /// 没有渲染表面时为 `None`
    pub tint: Option<Color>,
}

impl TargetSnapshot {
    /// 从控件当前状态捕获
    pub fn capture(target: &dyn Animatable) -> Self {
        Self {
            position: target.position(),
            scale: target.scale(),
            rotation: target.rotation(),
            alpha: target.alpha(),
            tint: target.tint(),
        }
    }

    /// 立即把控件恢复到快照状态，并解除交互门控
    pub fn restore(&self, target: &dyn Animatable) {
        target.set_position(self.position);
        target.set_scale(self.scale);
        target.set_rotation(self.rotation);
        target.set_alpha(self.alpha);
        target.set_interactable(true);
        if let Some(tint) = self.tint {
            target.set_tint(tint);
        }
    }
}

/// 渲染表面种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// 图像类表面
    Image,
    /// 文本类表面
    Text,
}

/// 可着色的渲染表面
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSurface {
    pub kind: SurfaceKind,
    pub color: Color,
}

impl RenderSurface {
    /// 白色图像表面
    pub fn image() -> Self {
        Self {
            kind: SurfaceKind::Image,
            color: Color::WHITE,
        }
    }

    /// 黑色文本表面
    pub fn text() -> Self {
        Self {
            kind: SurfaceKind::Text,
            color: Color::BLACK,
        }
    }
}

/// 控件的内部数据
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetState {
    pub position: Vec2,
    pub scale: Vec2,
    /// 旋转角度（度）
    pub rotation: f32,
    /// 透明度 (0.0 - 1.0)
    pub alpha: f32,
    pub interactable: bool,
    pub surface: Option<RenderSurface>,
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            position: Vec2::zero(),
            scale: Vec2::one(),
            rotation: 0.0,
            alpha: 1.0,
            interactable: true,
            surface: None,
        }
    }
}

/// 内存中的可动画控件
///
/// 使用 `Rc<RefCell<WidgetState>>` 包装内部数据，克隆得到的句柄共享同一状态，
/// 宿主保留一份用于渲染，另一份交给引擎。
#[derive(Debug, Clone, Default)]
pub struct WidgetTarget {
    inner: Rc<RefCell<WidgetState>>,
}

impl WidgetTarget {
    /// 默认状态的控件（无渲染表面）
    pub fn new() -> Self {
        Self::default()
    }

    /// 从给定状态创建
    pub fn from_state(state: WidgetState) -> Self {
        Self {
            inner: Rc::new(RefCell::new(state)),
        }
    }

    /// 带渲染表面的控件
    pub fn with_surface(surface: RenderSurface) -> Self {
        Self::from_state(WidgetState {
            surface: Some(surface),
            ..WidgetState::default()
        })
    }

    /// 当前状态的副本
    pub fn state(&self) -> WidgetState {
        self.inner.borrow().clone()
    }

    /// 直接修改内部状态（不经过动画）
    pub fn update(&self, f: impl FnOnce(&mut WidgetState)) {
        f(&mut *self.inner.borrow_mut());
    }
}

impl Animatable for WidgetTarget {
    fn position(&self) -> Vec2 {
        self.inner.borrow().position
    }

    fn set_position(&self, position: Vec2) {
        self.inner.borrow_mut().position = position;
    }

    fn scale(&self) -> Vec2 {
        self.inner.borrow().scale
    }

    fn set_scale(&self, scale: Vec2) {
        self.inner.borrow_mut().scale = scale;
    }

    fn rotation(&self) -> f32 {
        self.inner.borrow().rotation
    }

    fn set_rotation(&self, degrees: f32) {
        self.inner.borrow_mut().rotation = degrees;
    }

    fn alpha(&self) -> f32 {
        self.inner.borrow().alpha
    }

    fn set_alpha(&self, alpha: f32) {
        self.inner.borrow_mut().alpha = alpha;
    }

    fn interactable(&self) -> bool {
        self.inner.borrow().interactable
    }

    fn set_interactable(&self, interactable: bool) {
        self.inner.borrow_mut().interactable = interactable;
    }

    fn tint(&self) -> Option<Color> {
        self.inner.borrow().surface.map(|s| s.color)
    }

    fn set_tint(&self, color: Color) -> bool {
        match self.inner.borrow_mut().surface.as_mut() {
            Some(surface) => {
                surface.color = color;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widget_defaults() {
        let widget = WidgetTarget::new();
        assert_eq!(widget.position(), Vec2::zero());
        assert_eq!(widget.scale(), Vec2::one());
        assert_eq!(widget.alpha(), 1.0);
        assert!(widget.interactable());
        assert_eq!(widget.tint(), None);
    }

    #[test]
    fn test_shared_handle() {
        let widget = WidgetTarget::new();
        let engine_side = widget.clone();

        engine_side.set_alpha(0.25);
        assert_eq!(widget.state().alpha, 0.25);
    }

    #[test]
    fn test_tint_without_surface_is_noop() {
        let widget = WidgetTarget::new();
        assert!(!widget.set_tint(Color::BLACK));
        assert_eq!(widget.tint(), None);
    }

    #[test]
    fn test_tint_with_surface() {
        let widget = WidgetTarget::with_surface(RenderSurface::text());
        assert_eq!(widget.tint(), Some(Color::BLACK));
        assert!(widget.set_tint(Color::rgb(1.0, 0.0, 0.0)));
        assert_eq!(widget.tint(), Some(Color::rgb(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_snapshot_capture_and_restore() {
        let widget = WidgetTarget::with_surface(RenderSurface::image());
        widget.update(|s| {
            s.position = Vec2::new(10.0, 20.0);
            s.rotation = 15.0;
        });
        let snapshot = TargetSnapshot::capture(&widget);

        widget.update(|s| {
            s.position = Vec2::new(-5.0, 0.0);
            s.scale = Vec2::splat(2.0);
            s.rotation = 90.0;
            s.alpha = 0.0;
            s.interactable = false;
        });
        widget.set_tint(Color::BLACK);

        snapshot.restore(&widget);

        let state = widget.state();
        assert_eq!(state.position, Vec2::new(10.0, 20.0));
        assert_eq!(state.scale, Vec2::one());
        assert_eq!(state.rotation, 15.0);
        assert_eq!(state.alpha, 1.0);
        assert!(state.interactable);
        assert_eq!(widget.tint(), Some(Color::WHITE));
    }
}
