//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order
const PROJECT_FILES: [&str; 2] = ["philosopher.toml", ".philosopher.toml"];

/// Prefix of environment overrides (`PHILOSOPHER_TIMEOUTS__RESEARCH_SECS=60`)
const ENV_PREFIX: &str = "PHILOSOPHER_";

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `PHILOSOPHER_` environment variables (`__` separates sections)
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./philosopher.toml` or `./.philosopher.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/philosopher/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        Self::figment(config_path).extract().map_err(Box::new)
    }

    fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load only default configuration (for --no-config)
    pub fn load_defaults() -> FileConfig {
        FileConfig::default()
    }

    /// Defaults rendered as TOML (for --print-default-config)
    pub fn default_toml() -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(&FileConfig::default())
    }

    /// Get the global config file path
    ///
    /// `$XDG_CONFIG_HOME/philosopher/config.toml`, falling back to
    /// `~/.config/philosopher/config.toml`
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("philosopher").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        println!("  [ENV  ] {}*", ENV_PREFIX);

        if let Some(path) = config_path {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./{} or ./{}", PROJECT_FILES[0], PROJECT_FILES[1]);
        }

        if let Some(path) = Self::global_config_path() {
            let mark = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", mark, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use philosopher_domain::OutputFormat;

    #[test]
    fn test_load_defaults() {
        let config = ConfigLoader::load_defaults();
        assert!(config.debate.participants.is_empty());
        assert_eq!(config.socratic.max_rounds, 10);
    }

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("philosopher"));
    }

    #[test]
    fn test_project_file_is_picked_up() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "philosopher.toml",
                r#"
[socratic]
max_rounds = 3

[[debate.participants]]
id = "A"
viewpoint = "Monolith"
"#,
            )?;
            let config = ConfigLoader::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.socratic.max_rounds, 3);
            assert_eq!(config.debate.participants.len(), 1);
            assert_eq!(config.timeouts.research_secs, 600);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(".philosopher.toml", "[socratic]\nmax_rounds = 3\n")?;
            jail.create_file("custom.toml", "[socratic]\nmax_rounds = 7\n")?;
            let config =
                ConfigLoader::load(Some(Path::new("custom.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.socratic.max_rounds, 7);
            Ok(())
        });
    }

    #[test]
    fn test_environment_overrides_files() {
        Jail::expect_with(|jail| {
            jail.create_file("philosopher.toml", "[output]\nformat = \"summary\"\n")?;
            jail.set_env("PHILOSOPHER_OUTPUT__FORMAT", "json");
            jail.set_env("PHILOSOPHER_TIMEOUTS__DEBATE_TURN_SECS", "42");
            let config = ConfigLoader::load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.output.format, Some(OutputFormat::Json));
            assert_eq!(config.timeouts.debate_turn_secs, 42);
            Ok(())
        });
    }

    #[test]
    fn test_default_toml_parses_back() {
        let text = ConfigLoader::default_toml().unwrap();
        assert!(text.contains("[timeouts]"));
        let parsed: FileConfig = toml::from_str(&text).unwrap();
        assert!(parsed.debate.topic_gate);
    }
}
