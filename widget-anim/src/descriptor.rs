//! # Descriptor 模块
//!
//! 单个属性动画的参数集。
//!
//! 每个描述符只有与 `kind` 对应的那一组端点有意义，其余字段被忽略。
//! 运行期间描述符不可变；yoyo 的反向段使用 [`AnimationDescriptor::reversed`] 生成的新值。

use serde::{Deserialize, Serialize};

use crate::easing::EaseKind;
use crate::error::DescriptorError;
use crate::transform::{Color, Vec2};

/// 属性类型
///
/// 既标识动画写入哪部分状态，也是单飞（single-flight）的键。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    /// 透明度
    #[default]
    Fade,
    /// 缩放
    Scale,
    /// 相对原始位置的平移
    Slide,
    /// 旋转
    Rotate,
    /// 缩放冲击，结束时回到起点
    PunchScale,
    /// 位置抖动，幅度随进度衰减
    Shake,
    /// 竖直弹跳
    Bounce,
    /// 渲染表面着色
    ColorTint,
}

impl PropertyKind {
    /// 属性类型数量
    pub const COUNT: usize = 8;

    /// 全部属性类型
    pub const ALL: [PropertyKind; PropertyKind::COUNT] = [
        PropertyKind::Fade,
        PropertyKind::Scale,
        PropertyKind::Slide,
        PropertyKind::Rotate,
        PropertyKind::PunchScale,
        PropertyKind::Shake,
        PropertyKind::Bounce,
        PropertyKind::ColorTint,
    ];

    /// 在固定大小表中的下标
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 非循环运行结束后是否自动回到快照值
    pub fn auto_restores(self) -> bool {
        matches!(
            self,
            PropertyKind::PunchScale | PropertyKind::Shake | PropertyKind::Bounce
        )
    }
}

impl std::fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PropertyKind::Fade => "fade",
            PropertyKind::Scale => "scale",
            PropertyKind::Slide => "slide",
            PropertyKind::Rotate => "rotate",
            PropertyKind::PunchScale => "punch_scale",
            PropertyKind::Shake => "shake",
            PropertyKind::Bounce => "bounce",
            PropertyKind::ColorTint => "color_tint",
        };
        f.write_str(name)
    }
}

/// 动画描述符
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationDescriptor {
    /// 属性类型
    pub kind: PropertyKind,
    /// 是否启用
    pub enabled: bool,
    /// 动画时长（秒）
    pub duration: f32,
    /// 延迟启动（秒）
    pub delay: f32,
    /// 缓动曲线
    pub ease: EaseKind,
    /// 是否循环
    #[serde(rename = "loop")]
    pub looping: bool,
    /// 每次正向播放后是否反向播放一次
    pub yoyo: bool,
    /// 从属性的当前值开始，而不是强制设为 From 值
    pub from_current: bool,

    pub fade_from: f32,
    pub fade_to: f32,
    pub scale_from: Vec2,
    pub scale_to: Vec2,
    /// 相对快照位置的偏移
    pub slide_from: Vec2,
    /// 相对快照位置的偏移
    pub slide_to: Vec2,
    /// 角度（度）
    pub rotate_from: f32,
    pub rotate_to: f32,
    /// 冲击强度（缩放的相对增量）
    pub punch_intensity: f32,
    /// 抖动幅度（像素）
    pub shake_intensity: f32,
    /// 弹跳高度
    pub bounce_height: f32,
    pub tint_from: Color,
    pub tint_to: Color,
}

impl Default for AnimationDescriptor {
    fn default() -> Self {
        Self {
            kind: PropertyKind::Fade,
            enabled: true,
            duration: 0.3,
            delay: 0.0,
            ease: EaseKind::OutQuad,
            looping: false,
            yoyo: false,
            from_current: false,
            fade_from: 0.0,
            fade_to: 1.0,
            scale_from: Vec2::splat(0.8),
            scale_to: Vec2::one(),
            slide_from: Vec2::new(0.0, -50.0),
            slide_to: Vec2::zero(),
            rotate_from: 0.0,
            rotate_to: 360.0,
            punch_intensity: 0.2,
            shake_intensity: 10.0,
            bounce_height: 20.0,
            tint_from: Color::WHITE,
            tint_to: Color::rgb(0.8, 0.8, 0.8),
        }
    }
}

impl AnimationDescriptor {
    /// 指定类型的默认描述符
    pub fn new(kind: PropertyKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// 透明度动画
    pub fn fade(from: f32, to: f32, duration: f32) -> Self {
        Self {
            fade_from: from,
            fade_to: to,
            duration,
            ..Self::new(PropertyKind::Fade)
        }
    }

    /// 缩放动画
    pub fn scale(from: Vec2, to: Vec2, duration: f32) -> Self {
        Self {
            scale_from: from,
            scale_to: to,
            duration,
            ..Self::new(PropertyKind::Scale)
        }
    }

    /// 平移动画（相对快照位置的偏移）
    pub fn slide(from: Vec2, to: Vec2, duration: f32) -> Self {
        Self {
            slide_from: from,
            slide_to: to,
            duration,
            ..Self::new(PropertyKind::Slide)
        }
    }

    /// 旋转动画
    pub fn rotate(from: f32, to: f32, duration: f32) -> Self {
        Self {
            rotate_from: from,
            rotate_to: to,
            duration,
            ..Self::new(PropertyKind::Rotate)
        }
    }

    /// 缩放冲击
    pub fn punch_scale(intensity: f32, duration: f32) -> Self {
        Self {
            punch_intensity: intensity,
            duration,
            ..Self::new(PropertyKind::PunchScale)
        }
    }

    /// 位置抖动
    pub fn shake(intensity: f32, duration: f32) -> Self {
        Self {
            shake_intensity: intensity,
            duration,
            ..Self::new(PropertyKind::Shake)
        }
    }

    /// 竖直弹跳
    pub fn bounce(height: f32, duration: f32) -> Self {
        Self {
            bounce_height: height,
            duration,
            ..Self::new(PropertyKind::Bounce)
        }
    }

    /// 颜色过渡
    pub fn color_tint(from: Color, to: Color, duration: f32) -> Self {
        Self {
            tint_from: from,
            tint_to: to,
            duration,
            ..Self::new(PropertyKind::ColorTint)
        }
    }

    /// 设置缓动曲线
    pub fn with_ease(mut self, ease: EaseKind) -> Self {
        self.ease = ease;
        self
    }

    /// 设置延迟
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// 设置循环
    pub fn with_loop(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// 设置 yoyo
    pub fn with_yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// 设置是否从当前值开始
    pub fn with_from_current(mut self, from_current: bool) -> Self {
        self.from_current = from_current;
        self
    }

    /// 设置启用状态
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// 生成反向副本
    ///
    /// 交换每一组端点并强制 `from_current = true`，其余字段保持不变。
    pub fn reversed(&self) -> Self {
        Self {
            from_current: true,
            fade_from: self.fade_to,
            fade_to: self.fade_from,
            scale_from: self.scale_to,
            scale_to: self.scale_from,
            slide_from: self.slide_to,
            slide_to: self.slide_from,
            rotate_from: self.rotate_to,
            rotate_to: self.rotate_from,
            tint_from: self.tint_to,
            tint_to: self.tint_from,
            ..self.clone()
        }
    }

    /// 校验参数
    ///
    /// # 返回
    /// 第一个不合法字段对应的错误
    pub fn validate(&self) -> Result<(), DescriptorError> {
        for (field, value) in [("duration", self.duration), ("delay", self.delay)] {
            if !value.is_finite() || value < 0.0 {
                return Err(DescriptorError::InvalidTime { field, value });
            }
        }
        if self.kind == PropertyKind::Fade {
            for (field, value) in [("fade_from", self.fade_from), ("fade_to", self.fade_to)] {
                if !(0.0..=1.0).contains(&value) {
                    return Err(DescriptorError::AlphaOutOfRange { field, value });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_index_matches_all() {
        for (i, kind) in PropertyKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_auto_restore_kinds() {
        let restoring: Vec<_> = PropertyKind::ALL
            .into_iter()
            .filter(|k| k.auto_restores())
            .collect();
        assert_eq!(
            restoring,
            vec![
                PropertyKind::PunchScale,
                PropertyKind::Shake,
                PropertyKind::Bounce
            ]
        );
    }

    #[test]
    fn test_reversed_swaps_endpoints() {
        let forward = AnimationDescriptor::fade(0.2, 0.9, 0.5)
            .with_ease(EaseKind::InCubic)
            .with_loop(true)
            .with_yoyo(true)
            .with_delay(0.1);
        let reverse = forward.reversed();

        assert_eq!(reverse.fade_from, 0.9);
        assert_eq!(reverse.fade_to, 0.2);
        assert!(reverse.from_current);
        assert_eq!(reverse.duration, 0.5);
        assert_eq!(reverse.delay, 0.1);
        assert_eq!(reverse.ease, EaseKind::InCubic);
        assert!(reverse.looping);
        assert!(reverse.yoyo);
        // 原描述符不变
        assert!(!forward.from_current);
        assert_eq!(forward.fade_from, 0.2);
    }

    #[test]
    fn test_reversed_twice_restores_endpoints() {
        let forward = AnimationDescriptor::slide(Vec2::new(-10.0, 0.0), Vec2::new(5.0, 5.0), 1.0);
        let back_again = forward.reversed().reversed();
        assert_eq!(back_again.slide_from, forward.slide_from);
        assert_eq!(back_again.slide_to, forward.slide_to);
    }

    #[test]
    fn test_validate() {
        assert!(AnimationDescriptor::fade(0.0, 1.0, 0.3).validate().is_ok());
        assert_eq!(
            AnimationDescriptor::fade(0.0, 1.5, 0.3).validate(),
            Err(DescriptorError::AlphaOutOfRange {
                field: "fade_to",
                value: 1.5
            })
        );
        assert_eq!(
            AnimationDescriptor::fade(0.0, 1.0, -1.0).validate(),
            Err(DescriptorError::InvalidTime {
                field: "duration",
                value: -1.0
            })
        );
        assert!(matches!(
            AnimationDescriptor::fade(0.0, 1.0, f32::NAN).validate(),
            Err(DescriptorError::InvalidTime { field: "duration", .. })
        ));

        let mut d = AnimationDescriptor::shake(5.0, 0.2);
        d.delay = -0.5;
        assert_eq!(
            d.validate(),
            Err(DescriptorError::InvalidTime {
                field: "delay",
                value: -0.5
            })
        );

        // 只校验当前类型的端点
        let mut scale = AnimationDescriptor::scale(Vec2::zero(), Vec2::one(), 0.2);
        scale.fade_to = 7.0;
        assert!(scale.validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{ "kind": "scale", "loop": true, "scale_to": { "x": 2.0, "y": 2.0 } }"#;
        let d: AnimationDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(d.kind, PropertyKind::Scale);
        assert!(d.looping);
        assert!(d.enabled);
        assert_eq!(d.scale_to, Vec2::splat(2.0));
        assert_eq!(d.duration, 0.3);
    }
}
