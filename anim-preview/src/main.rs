//! # Anim Preview
//!
//! 动画配置无头预览：在内存控件上运行配置，逐帧打印控件状态和事件。
//!
//! ## 用法
//!
//! ```bash
//! # 内置示例配置，分发 on_enable
//! cargo run -p anim-preview
//!
//! # 指定配置与触发器（`@秒数` 指定分发时刻）
//! cargo run -p anim-preview -- --config button.json --trigger click --trigger leave@0.25
//!
//! # 查看调度日志
//! cargo run -p anim-preview -- --trigger manual --verbose
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::str::FromStr;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use widget_anim::{
    AnimationDescriptor, AnimationEvent, AnimatorConfig, Color, EaseKind, GroupConfig, GroupId,
    Orchestrator, RenderSurface, TriggerKind, Vec2, WidgetState, WidgetTarget,
};

#[derive(Parser)]
#[command(name = "anim-preview")]
#[command(about = "控件动画预览 - 在内存控件上运行动画配置并逐帧打印状态")]
#[command(version)]
struct Cli {
    /// 动画配置文件（JSON），省略时使用内置示例
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 要分发的触发器，可重复；`name@秒数` 指定时刻（默认：on_enable）
    #[arg(short, long = "trigger")]
    triggers: Vec<ScheduledTrigger>,

    /// 最多模拟的帧数
    #[arg(short, long, default_value_t = 120)]
    frames: usize,

    /// 帧率
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// 控件不带渲染表面（着色动画将被跳过）
    #[arg(long)]
    no_surface: bool,

    /// 输出调度日志
    #[arg(short, long)]
    verbose: bool,
}

/// 在指定时刻分发的触发器
#[derive(Debug, Clone, Copy, PartialEq)]
struct ScheduledTrigger {
    trigger: TriggerKind,
    at: f32,
}

impl FromStr for ScheduledTrigger {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, at) = match s.split_once('@') {
            Some((name, at)) => {
                let at: f32 = at
                    .trim()
                    .parse()
                    .map_err(|e| format!("无效的时刻 '{at}': {e}"))?;
                if !at.is_finite() || at < 0.0 {
                    return Err(format!("时刻必须是非负数，实际为 {at}"));
                }
                (name, at)
            }
            None => (s, 0.0),
        };
        Ok(Self {
            trigger: name.parse()?,
            at,
        })
    }
}

fn main() -> ExitCode {
    if let Err(e) = real_main() {
        eprintln!("❌ anim-preview: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn real_main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    anyhow::ensure!(
        cli.fps.is_finite() && cli.fps > 0.0,
        "fps 必须为正数，实际为 {}",
        cli.fps
    );

    let config = match &cli.config {
        Some(path) => AnimatorConfig::load(path)
            .with_context(|| format!("加载动画配置失败: {}", path.display()))?,
        None => demo_config(),
    };
    info!(groups = config.groups.len(), "配置就绪");

    let widget = if cli.no_surface {
        WidgetTarget::new()
    } else {
        WidgetTarget::with_surface(RenderSurface::image())
    };
    let mut animator = config.build(Rc::new(widget.clone()));

    let mut pending = if cli.triggers.is_empty() {
        vec![ScheduledTrigger {
            trigger: TriggerKind::OnEnable,
            at: 0.0,
        }]
    } else {
        cli.triggers.clone()
    };
    pending.sort_by(|a, b| a.at.total_cmp(&b.at));

    let dt = 1.0 / cli.fps;
    for frame in 0..=cli.frames {
        let time = frame as f32 * dt;

        // 半帧容差，避免累积误差把触发推迟一帧
        while pending.first().is_some_and(|next| next.at <= time + dt * 0.5) {
            let next = pending.remove(0);
            fire(&mut animator, next.trigger);
        }

        let events = if frame == 0 {
            animator.drain_events()
        } else {
            animator.tick(dt)
        };
        print_frame(frame, time, &widget.state(), &events, &animator);

        if frame > 0 && pending.is_empty() && !animator.is_animating() {
            break;
        }
    }

    Ok(())
}

/// 分发触发器；`on_enable` 走完整的激活流程
fn fire(animator: &mut Orchestrator, trigger: TriggerKind) {
    let started = match trigger {
        TriggerKind::OnEnable => animator.on_enable(),
        other => animator.dispatch(other),
    };
    if started == 0 {
        eprintln!("⚠️ 触发器 {trigger:?} 没有匹配的分组");
    }
}

fn print_frame(
    frame: usize,
    time: f32,
    state: &WidgetState,
    events: &[AnimationEvent],
    animator: &Orchestrator,
) {
    let tint = state
        .surface
        .map(|s| format_color(s.color))
        .unwrap_or_else(|| "-".to_string());

    let mut line = format!(
        "{frame:>4} {time:>7.3}s  pos=({:>8.2}, {:>8.2})  scale=({:.3}, {:.3})  rot={:>7.2}  alpha={:.3}  tint={tint}",
        state.position.x,
        state.position.y,
        state.scale.x,
        state.scale.y,
        state.rotation,
        state.alpha,
    );
    if !state.interactable {
        line.push_str("  [locked]");
    }
    for event in events {
        line.push_str("  ");
        line.push_str(&format_event(event, animator));
    }
    println!("{line}");
}

fn format_color(c: Color) -> String {
    format!("rgba({:.2}, {:.2}, {:.2}, {:.2})", c.r, c.g, c.b, c.a)
}

fn format_event(event: &AnimationEvent, animator: &Orchestrator) -> String {
    let label = |id: GroupId| {
        animator
            .group_by_id(id)
            .map(|g| g.label.clone())
            .unwrap_or_else(|| id.to_string())
    };
    match event {
        AnimationEvent::GroupStarted(id) => format!("▶ {}", label(*id)),
        AnimationEvent::GroupEnded(id) => format!("■ {}", label(*id)),
        AnimationEvent::Superseded { group, kind } => format!("✕ {}/{kind}", label(*group)),
    }
}

/// 内置示例：按钮常见的几组动画
fn demo_config() -> AnimatorConfig {
    let group = |label: &str, trigger, descriptors| GroupConfig {
        label: label.to_string(),
        trigger,
        descriptors,
    };

    AnimatorConfig {
        settings: Default::default(),
        groups: vec![
            group(
                "appear",
                TriggerKind::OnEnable,
                vec![
                    AnimationDescriptor::fade(0.0, 1.0, 0.3),
                    AnimationDescriptor::slide(Vec2::new(0.0, -40.0), Vec2::zero(), 0.4)
                        .with_ease(EaseKind::OutBack),
                ],
            ),
            group(
                "press",
                TriggerKind::OnClick,
                vec![
                    AnimationDescriptor::punch_scale(0.15, 0.25),
                    AnimationDescriptor::color_tint(Color::WHITE, Color::rgb(0.7, 0.7, 0.7), 0.1)
                        .with_yoyo(true),
                ],
            ),
            group(
                "hover",
                TriggerKind::OnPointerEnter,
                vec![
                    AnimationDescriptor::scale(Vec2::one(), Vec2::splat(1.1), 0.15)
                        .with_from_current(true),
                ],
            ),
            group(
                "leave",
                TriggerKind::OnPointerLeave,
                vec![
                    AnimationDescriptor::scale(Vec2::splat(1.1), Vec2::one(), 0.15)
                        .with_from_current(true),
                ],
            ),
            group(
                "error",
                TriggerKind::Manual,
                vec![
                    AnimationDescriptor::shake(6.0, 0.4),
                    AnimationDescriptor::color_tint(Color::WHITE, Color::rgb(1.0, 0.4, 0.4), 0.2)
                        .with_yoyo(true),
                ],
            ),
        ],
    }
}
