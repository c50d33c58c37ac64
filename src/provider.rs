use serde::{Deserialize, Serialize};

/// 供应商类型：原生模型厂商，或转发到 Anthropic 协议的代理
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCategory {
    Native,
    Proxy,
}

impl ProviderCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderCategory::Native => "native",
            ProviderCategory::Proxy => "proxy",
        }
    }
}

/// A built-in provider template. Only a credential is needed to make it usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    pub name: &'static str,
    pub display_name: &'static str,
    pub base_url: &'static str,
    pub model: &'static str,
    pub key_url: &'static str,
    pub category: ProviderCategory,
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "doubao",
        display_name: "豆包（字节跳动）",
        base_url: "https://ark.cn-beijing.volces.com/api/compatible",
        model: "doubao-seed-code-preview-latest",
        key_url: "https://console.volcengine.com/ark",
        category: ProviderCategory::Native,
    },
    Preset {
        name: "deepseek",
        display_name: "DeepSeek（深度求索）",
        base_url: "https://api.deepseek.com",
        model: "deepseek-chat",
        key_url: "https://platform.deepseek.com",
        category: ProviderCategory::Native,
    },
    Preset {
        name: "qwen",
        display_name: "通义千问（阿里云）",
        base_url: "https://dashscope.aliyuncs.com/compatible-mode/v1",
        model: "qwen-max",
        key_url: "https://dashscope.console.aliyun.com",
        category: ProviderCategory::Native,
    },
    Preset {
        name: "kimi",
        display_name: "Kimi（月之暗面）",
        base_url: "https://api.moonshot.cn/v1",
        model: "moonshot-v1-auto",
        key_url: "https://platform.moonshot.cn",
        category: ProviderCategory::Native,
    },
    Preset {
        name: "siliconflow",
        display_name: "硅基流动",
        base_url: "https://api.siliconflow.cn/v1",
        model: "deepseek-ai/DeepSeek-V3",
        key_url: "https://cloud.siliconflow.cn",
        category: ProviderCategory::Native,
    },
    Preset {
        name: "glm",
        display_name: "智谱GLM",
        base_url: "https://open.bigmodel.cn/api/paas/v4",
        model: "glm-4-plus",
        key_url: "https://open.bigmodel.cn",
        category: ProviderCategory::Native,
    },
    Preset {
        name: "wanjie",
        display_name: "万界",
        base_url: "https://maas-openapi.wanjiedata.com/api/anthropic",
        model: "claude-opus-4-5-20251101",
        key_url: "https://maas-openapi.wanjiedata.com",
        category: ProviderCategory::Proxy,
    },
];

pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name == name)
}

/// 用户保存的供应商配置（providers.yaml 中的一项）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub model: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key_url: String,
}

impl ProviderRecord {
    pub fn from_preset(preset: &Preset, api_key: impl Into<String>) -> Self {
        Self {
            name: preset.name.to_string(),
            display_name: preset.display_name.to_string(),
            api_key: api_key.into(),
            base_url: preset.base_url.to_string(),
            model: preset.model.to_string(),
            key_url: preset.key_url.to_string(),
        }
    }

    /// Fill blank fields from the preset with the same name, if there is one.
    pub fn with_preset_defaults(mut self) -> Self {
        let Some(preset) = find_preset(&self.name) else {
            return self;
        };
        if self.display_name.trim().is_empty() {
            self.display_name = preset.display_name.to_string();
        }
        if self.base_url.trim().is_empty() {
            self.base_url = preset.base_url.to_string();
        }
        if self.model.trim().is_empty() {
            self.model = preset.model.to_string();
        }
        if self.key_url.trim().is_empty() {
            self.key_url = preset.key_url.to_string();
        }
        self
    }

    pub fn display_label(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_names_are_unique_and_ordered() {
        let names: Vec<_> = PRESETS.iter().map(|p| p.name).collect();
        assert_eq!(
            names,
            vec!["doubao", "deepseek", "qwen", "kimi", "siliconflow", "glm", "wanjie"]
        );
        assert_eq!(find_preset("wanjie").map(|p| p.category), Some(ProviderCategory::Proxy));
        assert!(find_preset("nope").is_none());
    }

    #[test]
    fn preset_defaults_only_fill_blank_fields() {
        let record = ProviderRecord {
            name: "deepseek".into(),
            api_key: "sk-1".into(),
            model: "deepseek-reasoner".into(),
            ..Default::default()
        }
        .with_preset_defaults();

        assert_eq!(record.base_url, "https://api.deepseek.com");
        assert_eq!(record.model, "deepseek-reasoner");
        assert_eq!(record.display_label(), "DeepSeek（深度求索）");
    }
}
