//! # Easing 模块
//!
//! 缓动函数库，把归一化时间映射为归一化进度。
//!
//! 所有曲线都是纯函数：无状态、无分配，输入在 `[0, 1]` 内时不会产生 NaN。
//! `Back` 与 `Elastic` 族会短暂越过 `[0, 1]`，这是曲线本身的形状。

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// 缓动曲线类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EaseKind {
    /// 线性（匀速）
    Linear,
    InQuad,
    #[default]
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    /// 回拉缓入（起步先反向）
    InBack,
    /// 回拉缓出（末尾越过目标再回落）
    OutBack,
    InOutBack,
    /// 弹性缓入
    InElastic,
    /// 弹性缓出
    OutElastic,
    InOutElastic,
    /// 弹跳缓入
    InBounce,
    /// 弹跳缓出
    OutBounce,
    InOutBounce,
}

impl EaseKind {
    /// 全部曲线，按声明顺序
    pub const ALL: [EaseKind; 31] = [
        EaseKind::Linear,
        EaseKind::InQuad,
        EaseKind::OutQuad,
        EaseKind::InOutQuad,
        EaseKind::InCubic,
        EaseKind::OutCubic,
        EaseKind::InOutCubic,
        EaseKind::InQuart,
        EaseKind::OutQuart,
        EaseKind::InOutQuart,
        EaseKind::InQuint,
        EaseKind::OutQuint,
        EaseKind::InOutQuint,
        EaseKind::InSine,
        EaseKind::OutSine,
        EaseKind::InOutSine,
        EaseKind::InExpo,
        EaseKind::OutExpo,
        EaseKind::InOutExpo,
        EaseKind::InCirc,
        EaseKind::OutCirc,
        EaseKind::InOutCirc,
        EaseKind::InBack,
        EaseKind::OutBack,
        EaseKind::InOutBack,
        EaseKind::InElastic,
        EaseKind::OutElastic,
        EaseKind::InOutElastic,
        EaseKind::InBounce,
        EaseKind::OutBounce,
        EaseKind::InOutBounce,
    ];

    /// 计算缓动值
    ///
    /// # 参数
    /// - `t`: 时间进度，超出 `[0, 1]` 会被限制
    ///
    /// # 返回
    /// - 缓动后的进度值，`apply(0) == 0`，`apply(1) == 1`
    pub fn apply(&self, t: f32) -> f32 {
        // NaN 按 0 处理，保证函数是全的
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        match self {
            EaseKind::Linear => t,
            EaseKind::InQuad => t * t,
            EaseKind::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            EaseKind::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            EaseKind::InCubic => t * t * t,
            EaseKind::OutCubic => 1.0 - (1.0 - t).powi(3),
            EaseKind::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            EaseKind::InQuart => t.powi(4),
            EaseKind::OutQuart => 1.0 - (1.0 - t).powi(4),
            EaseKind::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            EaseKind::InQuint => t.powi(5),
            EaseKind::OutQuint => 1.0 - (1.0 - t).powi(5),
            EaseKind::InOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
            EaseKind::InSine => 1.0 - (t * PI / 2.0).cos(),
            EaseKind::OutSine => (t * PI / 2.0).sin(),
            EaseKind::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
            EaseKind::InExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2.0_f32.powf(10.0 * t - 10.0)
                }
            }
            EaseKind::OutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            }
            EaseKind::InOutExpo => ease_in_out_expo(t),
            EaseKind::InCirc => 1.0 - (1.0 - t * t).max(0.0).sqrt(),
            EaseKind::OutCirc => (1.0 - (t - 1.0).powi(2)).max(0.0).sqrt(),
            EaseKind::InOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).max(0.0).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).max(0.0).sqrt() + 1.0) / 2.0
                }
            }
            EaseKind::InBack => {
                let c1 = BACK_OVERSHOOT;
                let c3 = c1 + 1.0;
                c3 * t * t * t - c1 * t * t
            }
            EaseKind::OutBack => {
                let c1 = BACK_OVERSHOOT;
                let c3 = c1 + 1.0;
                1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
            }
            EaseKind::InOutBack => {
                let c2 = BACK_OVERSHOOT * 1.525;
                if t < 0.5 {
                    ((2.0 * t).powi(2) * ((c2 + 1.0) * 2.0 * t - c2)) / 2.0
                } else {
                    ((2.0 * t - 2.0).powi(2) * ((c2 + 1.0) * (t * 2.0 - 2.0) + c2) + 2.0) / 2.0
                }
            }
            EaseKind::InElastic => ease_in_elastic(t),
            EaseKind::OutElastic => ease_out_elastic(t),
            EaseKind::InOutElastic => ease_in_out_elastic(t),
            EaseKind::InBounce => 1.0 - ease_out_bounce(1.0 - t),
            EaseKind::OutBounce => ease_out_bounce(t),
            EaseKind::InOutBounce => {
                if t < 0.5 {
                    (1.0 - ease_out_bounce(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + ease_out_bounce(2.0 * t - 1.0)) / 2.0
                }
            }
        }
    }
}

/// 计算缓动值（自由函数形式）
pub fn ease(kind: EaseKind, t: f32) -> f32 {
    kind.apply(t)
}

const BACK_OVERSHOOT: f32 = 1.70158;

fn ease_in_out_expo(t: f32) -> f32 {
    if t == 0.0 {
        0.0
    } else if t == 1.0 {
        1.0
    } else if t < 0.5 {
        2.0_f32.powf(20.0 * t - 10.0) / 2.0
    } else {
        (2.0 - 2.0_f32.powf(-20.0 * t + 10.0)) / 2.0
    }
}

/// 弹性缓入
fn ease_in_elastic(t: f32) -> f32 {
    if t == 0.0 {
        0.0
    } else if t == 1.0 {
        1.0
    } else {
        let c4 = (2.0 * PI) / 3.0;
        -(2.0_f32.powf(10.0 * t - 10.0)) * ((t * 10.0 - 10.75) * c4).sin()
    }
}

/// 弹性缓出
fn ease_out_elastic(t: f32) -> f32 {
    if t == 0.0 {
        0.0
    } else if t == 1.0 {
        1.0
    } else {
        let c4 = (2.0 * PI) / 3.0;
        2.0_f32.powf(-10.0 * t) * ((t * 10.0 - 0.75) * c4).sin() + 1.0
    }
}

fn ease_in_out_elastic(t: f32) -> f32 {
    if t == 0.0 {
        0.0
    } else if t == 1.0 {
        1.0
    } else {
        let c5 = (2.0 * PI) / 4.5;
        if t < 0.5 {
            -(2.0_f32.powf(20.0 * t - 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0
        } else {
            (2.0_f32.powf(-20.0 * t + 10.0) * ((20.0 * t - 11.125) * c5).sin()) / 2.0 + 1.0
        }
    }
}

/// 弹跳缓出（四段分段多项式）
fn ease_out_bounce(t: f32) -> f32 {
    let n1 = 7.5625;
    let d1 = 2.75;

    if t < 1.0 / d1 {
        n1 * t * t
    } else if t < 2.0 / d1 {
        let t = t - 1.5 / d1;
        n1 * t * t + 0.75
    } else if t < 2.5 / d1 {
        let t = t - 2.25 / d1;
        n1 * t * t + 0.9375
    } else {
        let t = t - 2.625 / d1;
        n1 * t * t + 0.984375
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        let easing = EaseKind::Linear;
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(0.5), 0.5);
        assert_eq!(easing.apply(1.0), 1.0);
    }

    #[test]
    fn test_endpoints_for_all_curves() {
        for kind in EaseKind::ALL {
            assert!(kind.apply(0.0).abs() < 1e-5, "{kind:?} at 0");
            assert!((kind.apply(1.0) - 1.0).abs() < 1e-5, "{kind:?} at 1");
        }
    }

    #[test]
    fn test_no_nan_in_domain() {
        for kind in EaseKind::ALL {
            for i in 0..=100 {
                let t = i as f32 / 100.0;
                assert!(kind.apply(t).is_finite(), "{kind:?} at {t}");
            }
        }
    }

    #[test]
    fn test_clamp() {
        let easing = EaseKind::Linear;
        // 超出范围应该被限制
        assert_eq!(easing.apply(-0.5), 0.0);
        assert_eq!(easing.apply(1.5), 1.0);
        assert_eq!(easing.apply(f32::NAN), 0.0);
    }

    #[test]
    fn test_out_cubic_closed_form() {
        let t = 0.3_f32;
        let expected = 1.0 - (1.0 - t).powi(3);
        assert!((ease(EaseKind::OutCubic, t) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_in_out_symmetry_midpoint() {
        for kind in [
            EaseKind::InOutQuad,
            EaseKind::InOutCubic,
            EaseKind::InOutQuart,
            EaseKind::InOutQuint,
            EaseKind::InOutSine,
            EaseKind::InOutExpo,
            EaseKind::InOutCirc,
            EaseKind::InOutBounce,
        ] {
            assert!((kind.apply(0.5) - 0.5).abs() < 0.01, "{kind:?}");
        }
    }

    #[test]
    fn test_monotonic_families() {
        // 除 Back/Elastic/Bounce 外，其余曲线单调不减
        let monotonic = EaseKind::ALL.iter().filter(|k| {
            !matches!(
                k,
                EaseKind::InBack
                    | EaseKind::OutBack
                    | EaseKind::InOutBack
                    | EaseKind::InElastic
                    | EaseKind::OutElastic
                    | EaseKind::InOutElastic
                    | EaseKind::InBounce
                    | EaseKind::OutBounce
                    | EaseKind::InOutBounce
            )
        });
        for kind in monotonic {
            let mut prev = kind.apply(0.0);
            for i in 1..=200 {
                let v = kind.apply(i as f32 / 200.0);
                assert!(v + 1e-6 >= prev, "{kind:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_ease_out_bounce() {
        let easing = EaseKind::OutBounce;
        assert_eq!(easing.apply(0.0), 0.0);
        assert!((easing.apply(1.0) - 1.0).abs() < 0.001);
        // 第一段末尾恰好触底
        assert!((easing.apply(1.0 / 2.75) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_out_back_overshoots() {
        let peak = (1..100)
            .map(|i| EaseKind::OutBack.apply(i as f32 / 100.0))
            .fold(f32::MIN, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&EaseKind::InOutElastic).unwrap();
        assert_eq!(json, "\"in_out_elastic\"");
        let parsed: EaseKind = serde_json::from_str("\"out_cubic\"").unwrap();
        assert_eq!(parsed, EaseKind::OutCubic);
    }
}
