//! # Config 模块
//!
//! 动画配置：引擎参数与分组定义，JSON 格式。
//!
//! ```json
//! {
//!   "settings": { "restore_duration": 0.1 },
//!   "groups": [
//!     {
//!       "label": "appear",
//!       "trigger": "on_enable",
//!       "descriptors": [ { "kind": "fade", "duration": 0.2 } ]
//!     }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::descriptor::AnimationDescriptor;
use crate::error::{AnimResult, ConfigError};
use crate::group::{AnimationGroup, TriggerKind};
use crate::orchestrator::Orchestrator;
use crate::rng::DEFAULT_SEED;
use crate::target::Animatable;

/// 引擎参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// 冲击/抖动/弹跳结束后复位的时长（秒）
    #[serde(default = "default_restore_duration")]
    pub restore_duration: f32,

    /// 抖动随机数种子
    #[serde(default = "default_shake_seed")]
    pub shake_seed: u64,

    /// 透明度动画结束于 0 时禁用交互
    #[serde(default = "default_interaction_gating")]
    pub interaction_gating: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            restore_duration: default_restore_duration(),
            shake_seed: default_shake_seed(),
            interaction_gating: default_interaction_gating(),
        }
    }
}

/// 分组配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// 分组标签
    pub label: String,

    /// 触发器，配置文件中必须显式给出
    pub trigger: TriggerKind,

    /// 描述符列表
    #[serde(default)]
    pub descriptors: Vec<AnimationDescriptor>,
}

impl GroupConfig {
    /// 转换为分组（不带任何监听器）
    pub fn to_group(&self) -> AnimationGroup {
        let mut group = AnimationGroup::new(self.label.clone(), self.trigger);
        group.descriptors = self.descriptors.clone();
        group
    }
}

impl From<&AnimationGroup> for GroupConfig {
    fn from(group: &AnimationGroup) -> Self {
        Self {
            label: group.label.clone(),
            trigger: group.trigger,
            descriptors: group.descriptors.clone(),
        }
    }
}

/// 动画配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimatorConfig {
    /// 引擎参数
    #[serde(default)]
    pub settings: EngineSettings,

    /// 分组定义
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
}

impl AnimatorConfig {
    /// 从 JSON 字符串解析并校验
    pub fn from_json_str(json: &str) -> AnimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 从文件加载并校验
    ///
    /// 与宿主配置不同，动画配置缺失或损坏时直接返回错误。
    pub fn load(path: impl AsRef<Path>) -> AnimResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&content)?;
        info!(path = ?path, groups = config.groups.len(), "动画配置加载成功");
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save(&self, path: impl AsRef<Path>) -> AnimResult<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(())
    }

    /// 验证配置有效性
    pub fn validate(&self) -> AnimResult<()> {
        let restore = self.settings.restore_duration;
        if !restore.is_finite() || restore < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "restore_duration 必须是非负有限数，实际为 {restore}"
            )));
        }

        for (index, group) in self.groups.iter().enumerate() {
            if group.label.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("第 {index} 个分组缺少 label")));
            }

            for (descriptor, d) in group.descriptors.iter().enumerate() {
                d.validate()
                    .map_err(|source| ConfigError::InvalidDescriptor {
                        group: group.label.clone(),
                        descriptor,
                        source,
                    })?;
            }
        }

        Ok(())
    }

    /// 构建绑定到目标的 `Orchestrator`
    pub fn build(&self, target: Rc<dyn Animatable>) -> Orchestrator {
        let mut orchestrator = Orchestrator::with_settings(target, self.settings.clone());
        for group in &self.groups {
            orchestrator.add_group(group.to_group());
        }
        orchestrator
    }
}

// 默认值函数
fn default_restore_duration() -> f32 {
    0.1
}

fn default_shake_seed() -> u64 {
    DEFAULT_SEED
}

fn default_interaction_gating() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::PropertyKind;
    use crate::error::DescriptorError;
    use crate::target::WidgetTarget;

    const SAMPLE: &str = r#"{
        "groups": [
            {
                "label": "press",
                "trigger": "on_click",
                "descriptors": [
                    { "kind": "fade", "fade_from": 0.0, "fade_to": 1.0, "duration": 0.2 },
                    { "kind": "punch_scale", "punch_intensity": 0.3, "ease": "out_back" }
                ]
            },
            { "label": "idle", "trigger": "manual" }
        ]
    }"#;

    #[test]
    fn test_default_settings() {
        let settings = EngineSettings::default();
        assert_eq!(settings.restore_duration, 0.1);
        assert!(settings.interaction_gating);
        assert_eq!(settings.shake_seed, DEFAULT_SEED);
    }

    #[test]
    fn test_parse_sample() {
        let config = AnimatorConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(config.settings, EngineSettings::default());
        assert_eq!(config.groups.len(), 2);

        let press = &config.groups[0];
        assert_eq!(press.trigger, TriggerKind::OnClick);
        assert_eq!(press.descriptors[1].kind, PropertyKind::PunchScale);
        assert_eq!(press.descriptors[1].punch_intensity, 0.3);
        assert!(config.groups[1].descriptors.is_empty());
    }

    #[test]
    fn test_invalid_descriptor_reports_position() {
        let json = r#"{ "groups": [ { "label": "bad", "trigger": "on_click", "descriptors": [
            { "kind": "scale" },
            { "kind": "fade", "fade_to": 2.0 }
        ] } ] }"#;

        match AnimatorConfig::from_json_str(json) {
            Err(ConfigError::InvalidDescriptor {
                group,
                descriptor,
                source,
            }) => {
                assert_eq!(group, "bad");
                assert_eq!(descriptor, 1);
                assert_eq!(
                    source,
                    DescriptorError::AlphaOutOfRange {
                        field: "fade_to",
                        value: 2.0
                    }
                );
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_empty_label_rejected() {
        let json = r#"{ "groups": [ { "label": "  ", "trigger": "manual" } ] }"#;
        assert!(matches!(
            AnimatorConfig::from_json_str(json),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_trigger_rejected() {
        let json = r#"{ "groups": [ { "label": "press", "descriptors": [ { "kind": "fade" } ] } ] }"#;
        assert!(matches!(
            AnimatorConfig::from_json_str(json),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            AnimatorConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.json");

        let config = AnimatorConfig::from_json_str(SAMPLE).unwrap();
        config.save(&path).unwrap();
        let loaded = AnimatorConfig::load(&path).unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = AnimatorConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_build_orchestrator() {
        let config = AnimatorConfig::from_json_str(SAMPLE).unwrap();
        let orchestrator = config.build(Rc::new(WidgetTarget::new()));

        assert_eq!(orchestrator.groups().len(), 2);
        assert_eq!(orchestrator.find_group("idle"), Some(1));
        assert_ne!(
            orchestrator.groups()[0].id(),
            orchestrator.groups()[1].id()
        );
    }

    #[test]
    fn test_group_config_from_group() {
        let group = AnimationGroup::new("spin", TriggerKind::OnPointerEnter)
            .with(AnimationDescriptor::rotate(0.0, 90.0, 0.4));
        let config = GroupConfig::from(&group);
        assert_eq!(config.label, "spin");
        assert_eq!(config.to_group().descriptors, group.descriptors);
    }
}
