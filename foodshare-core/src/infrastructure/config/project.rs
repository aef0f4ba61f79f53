// foodshare-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use validator::Validate;

use crate::domain::project::configuration::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

pub const CONFIG_CANDIDATES: [&str; 2] = ["foodshare.yaml", "foodshare_project.yaml"];

// --- LOADER ---

#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    // 1. Découverte du fichier principal
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading project configuration");

    // 2. Chargement YAML
    let content = fs::read_to_string(&config_path)?;
    let mut config: ProjectConfig = serde_yaml::from_str(&content)?;

    // 3. Override via Variables d'Environnement (Pattern 'Layering')
    // FOODSHARE_DATABASE_PATH=/tmp/food.duckdb foodshare load
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    // 4. Validation (after overrides, an empty env value is still an error)
    config.validate().map_err(|e| {
        InfrastructureError::ConfigError(format!("{}: {}", config_path.display(), e))
    })?;

    Ok(config)
}

pub fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    for filename in CONFIG_CANDIDATES {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "{} (checked: {})",
        root.display(),
        CONFIG_CANDIDATES.join(", ")
    )))
}

/// Writes a default `foodshare.yaml` unless a project file already exists.
/// Returns the path of the project file either way.
pub fn scaffold_config(project_dir: &Path, name: &str) -> Result<PathBuf, InfrastructureError> {
    if let Ok(existing) = find_main_config(project_dir) {
        return Ok(existing);
    }
    let path = project_dir.join(CONFIG_CANDIDATES[0]);
    let yaml = serde_yaml::to_string(&ProjectConfig::named(name))?;
    atomic_write(&path, yaml)?;
    info!(path = ?path, "📝 Project file created");
    Ok(path)
}

/// Relative paths in the config are resolved against the project directory.
pub fn resolve(project_dir: &Path, configured: &str) -> PathBuf {
    let path = Path::new(configured);
    if path.is_absolute() || configured == ":memory:" {
        path.to_path_buf()
    } else {
        project_dir.join(path)
    }
}

fn apply_env_overrides(config: &mut ProjectConfig, lookup: impl Fn(&str) -> Option<String>) {
    let targets: [(&str, &mut String); 3] = [
        ("FOODSHARE_DATABASE_PATH", &mut config.database_path),
        ("FOODSHARE_DATA_PATH", &mut config.data_path),
        ("FOODSHARE_TARGET_PATH", &mut config.target_path),
    ];
    for (key, slot) in targets {
        if let Some(val) = lookup(key) {
            info!(old = ?slot, new = ?val, "Overriding {} via ENV", key);
            *slot = val;
        }
    }
}
