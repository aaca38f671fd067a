use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};

use crate::model::tree::FallbackSpec;

pub fn data_dir() -> PathBuf { dirs::home_dir().unwrap().join(".weft") }
pub fn restore_file() -> PathBuf { data_dir().join("layout.ron") }
pub fn config_file() -> PathBuf { dirs::home_dir().unwrap().join(".weft.toml") }

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[serde(default)]
    pub workspace: WorkspaceSettings,
    #[serde(default)]
    pub fallback: FallbackSettings,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct WorkspaceSettings {
    /// Workspaces created up front. Others can still appear dynamically.
    #[serde(default = "default_workspace_names")]
    pub names: Vec<String>,
    /// Index into `names` selected at startup (0 based).
    #[serde(default)]
    pub default_workspace: usize,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct FallbackSettings {
    /// Icon shown in placeholder slots.
    #[serde(default = "default_fallback_icon")]
    pub icon: String,
    /// Optional caption under the icon.
    #[serde(default)]
    pub label: Option<String>,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            names: default_workspace_names(),
            default_workspace: 0,
        }
    }
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            icon: default_fallback_icon(),
            label: None,
        }
    }
}

fn default_workspace_names() -> Vec<String> {
    (1..=4).map(|i| format!("Workspace {i}")).collect()
}

fn default_fallback_icon() -> String { "missing-app".to_string() }

impl Settings {
    pub fn read(path: &Path) -> anyhow::Result<Settings> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings: Settings = toml::from_str(&text)
            .with_context(|| format!("failed to parse settings from {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.workspace.names.is_empty() {
            bail!("workspace.names must name at least one workspace");
        }
        if self.workspace.default_workspace >= self.workspace.names.len() {
            bail!(
                "workspace.default_workspace {} is out of range for {} configured workspaces",
                self.workspace.default_workspace,
                self.workspace.names.len()
            );
        }
        Ok(())
    }

    /// Descriptor used for placeholder slots the layout does not spell out.
    pub fn default_fallback(&self) -> FallbackSpec {
        FallbackSpec {
            icon: Some(self.fallback.icon.clone()),
            label: self.fallback.label.clone(),
        }
    }
}
