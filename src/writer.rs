// Config writer - points the two external configs at the selected theme
//
// Both targets are TOML files owned by other tools, so edits go through
// toml_edit: parse the whole document, replace exactly one value, and write
// the document back with every other key, comment, and blank line intact.
// A naive text substitution could not guarantee that for files with
// comments or unusual formatting.
//
// Targets:
// - Alacritty references the active theme by path, as the first element of
//   its `import` array (under [general] in current configs, at the top
//   level in older ones).
// - Oh My Posh references it by name, in the `palettes.template` key.
//
// The writer does not check that the identifier names an existing theme
// file; that is the caller's concern, which keeps the writer independently
// testable.

use crate::error::{Error, Result};
use crate::util::write_atomic;
use std::path::{Path, PathBuf};
use toml_edit::{value, Array, DocumentMut, Item};

/// One of the two external config files the selector edits.
#[derive(Debug, Clone)]
pub enum ConfigTarget {
    /// Alacritty: rewrites the first entry of the `import` array to
    /// `<themes_dir>/<identifier>.toml`.
    Alacritty {
        config_path: PathBuf,
        themes_dir: PathBuf,
    },
    /// Oh My Posh: rewrites `palettes.template` to the bare identifier.
    Posh { config_path: PathBuf },
}

impl ConfigTarget {
    pub fn config_path(&self) -> &Path {
        match self {
            ConfigTarget::Alacritty { config_path, .. } => config_path,
            ConfigTarget::Posh { config_path } => config_path,
        }
    }

    /// Rewrite this target's active-theme reference to `identifier`.
    ///
    /// Reads the full file, edits the one designated value, and replaces
    /// the file atomically. Any failure before the final rename leaves the
    /// file exactly as it was.
    pub fn apply_theme(&self, identifier: &str) -> Result<()> {
        let path = self.config_path();

        let contents =
            std::fs::read_to_string(path).map_err(|e| Error::from_io(path, e))?;

        let mut doc = contents
            .parse::<DocumentMut>()
            .map_err(|e| Error::config_format(path, e.to_string()))?;

        self.edit(&mut doc, identifier)?;

        write_atomic(path, &doc.to_string()).map_err(|e| Error::Persistence {
            path: path.to_path_buf(),
            source: e,
        })
    }

    fn edit(&self, doc: &mut DocumentMut, identifier: &str) -> Result<()> {
        match self {
            ConfigTarget::Alacritty {
                config_path,
                themes_dir,
            } => {
                let theme_path = themes_dir.join(format!("{}.toml", identifier));
                let theme_path = theme_path.display().to_string();

                let imports = import_array_mut(doc, config_path)?;
                if imports.is_empty() {
                    imports.push(theme_path);
                } else {
                    imports.replace(0, theme_path);
                }
            }
            ConfigTarget::Posh { config_path } => {
                let template = doc
                    .get_mut("palettes")
                    .and_then(Item::as_table_like_mut)
                    .and_then(|t| t.get_mut("template"))
                    .ok_or_else(|| {
                        Error::config_format(config_path, "missing `palettes.template` key")
                    })?;
                *template = value(identifier);
            }
        }
        Ok(())
    }
}

/// Locate Alacritty's import array: `general.import` in current configs,
/// top-level `import` in pre-0.14 ones.
fn import_array_mut<'a>(doc: &'a mut DocumentMut, config_path: &Path) -> Result<&'a mut Array> {
    let in_general = doc
        .get("general")
        .and_then(Item::as_table_like)
        .map(|general| general.get("import").is_some())
        .unwrap_or(false);

    let item = if in_general {
        doc.get_mut("general")
            .and_then(Item::as_table_like_mut)
            .and_then(|general| general.get_mut("import"))
    } else {
        doc.get_mut("import")
    };

    item.and_then(Item::as_array_mut).ok_or_else(|| {
        Error::config_format(config_path, "missing or non-array `import` key")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Assert that `before` and `after` differ in at most the lines for
    /// which `is_target_line` is true, i.e. everything else survived
    /// byte-identically.
    fn assert_only_target_lines_changed(
        before: &str,
        after: &str,
        is_target_line: fn(&str) -> bool,
    ) {
        let before_rest: Vec<_> = before.lines().filter(|l| !is_target_line(l)).collect();
        let after_rest: Vec<_> = after.lines().filter(|l| !is_target_line(l)).collect();
        assert_eq!(before_rest, after_rest);
    }

    #[test]
    fn test_alacritty_general_import_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("alacritty.toml");
        let before = "\
# Alacritty configuration
live_config_reload = true

[general]
import = [\"/home/u/.config/alacritty/themes/nord.toml\"]

[font]
size = 12.5  # bumped for the laptop screen
";
        std::fs::write(&config_path, before).unwrap();

        let target = ConfigTarget::Alacritty {
            config_path: config_path.clone(),
            themes_dir: PathBuf::from("/home/u/.config/alacritty/themes"),
        };
        target.apply_theme("gruvbox").unwrap();

        let after = std::fs::read_to_string(&config_path).unwrap();
        assert!(after.contains("/home/u/.config/alacritty/themes/gruvbox.toml"));
        assert!(!after.contains("nord.toml"));
        assert_only_target_lines_changed(before, &after, |l| l.trim_start().starts_with("import"));
    }

    #[test]
    fn test_alacritty_legacy_root_import() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("alacritty.toml");
        std::fs::write(
            &config_path,
            "import = [\"/themes/old.toml\"]\n\n[window]\nopacity = 0.95\n",
        )
        .unwrap();

        let target = ConfigTarget::Alacritty {
            config_path: config_path.clone(),
            themes_dir: PathBuf::from("/themes"),
        };
        target.apply_theme("new_one").unwrap();

        let after = std::fs::read_to_string(&config_path).unwrap();
        assert!(after.contains("/themes/new_one.toml"));
        assert!(after.contains("opacity = 0.95"));
    }

    #[test]
    fn test_alacritty_replaces_only_first_import() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("alacritty.toml");
        std::fs::write(
            &config_path,
            "[general]\nimport = [\"/themes/a.toml\", \"/extra/keybinds.toml\"]\n",
        )
        .unwrap();

        let target = ConfigTarget::Alacritty {
            config_path: config_path.clone(),
            themes_dir: PathBuf::from("/themes"),
        };
        target.apply_theme("b").unwrap();

        let after = std::fs::read_to_string(&config_path).unwrap();
        assert!(after.contains("/themes/b.toml"));
        assert!(after.contains("/extra/keybinds.toml"));
        assert!(!after.contains("/themes/a.toml"));
    }

    #[test]
    fn test_alacritty_empty_import_gets_entry() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("alacritty.toml");
        std::fs::write(&config_path, "[general]\nimport = []\n").unwrap();

        let target = ConfigTarget::Alacritty {
            config_path: config_path.clone(),
            themes_dir: PathBuf::from("/themes"),
        };
        target.apply_theme("nord").unwrap();

        let after = std::fs::read_to_string(&config_path).unwrap();
        assert!(after.contains("/themes/nord.toml"));
    }

    #[test]
    fn test_alacritty_missing_import_key() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("alacritty.toml");
        let before = "[font]\nsize = 11\n";
        std::fs::write(&config_path, before).unwrap();

        let target = ConfigTarget::Alacritty {
            config_path: config_path.clone(),
            themes_dir: PathBuf::from("/themes"),
        };
        match target.apply_theme("nord") {
            Err(Error::ConfigFormat { .. }) => {}
            other => panic!("expected ConfigFormat, got {:?}", other),
        }
        // File untouched on failure
        assert_eq!(std::fs::read_to_string(&config_path).unwrap(), before);
    }

    #[test]
    fn test_posh_template_rewritten_preserving_rest() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("posh.toml");
        let before = "\
version = 2
final_space = true

# palette switching
[palettes]
template = \"frappe\"

[palettes.list.frappe]
base = \"#303446\"
";
        std::fs::write(&config_path, before).unwrap();

        let target = ConfigTarget::Posh {
            config_path: config_path.clone(),
        };
        target.apply_theme("gruvbox").unwrap();

        let after = std::fs::read_to_string(&config_path).unwrap();
        assert!(after.contains("template = \"gruvbox\""));
        assert_only_target_lines_changed(before, &after, |l| {
            l.trim_start().starts_with("template")
        });
    }

    #[test]
    fn test_posh_missing_template_key() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("posh.toml");
        std::fs::write(&config_path, "version = 2\n").unwrap();

        let target = ConfigTarget::Posh {
            config_path: config_path.clone(),
        };
        match target.apply_theme("gruvbox") {
            Err(Error::ConfigFormat { .. }) => {}
            other => panic!("expected ConfigFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_target_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("alacritty.toml");
        let before = "[general\nimport = [";
        std::fs::write(&config_path, before).unwrap();

        let target = ConfigTarget::Alacritty {
            config_path: config_path.clone(),
            themes_dir: PathBuf::from("/themes"),
        };
        match target.apply_theme("nord") {
            Err(Error::ConfigFormat { .. }) => {}
            other => panic!("expected ConfigFormat, got {:?}", other),
        }
        assert_eq!(std::fs::read_to_string(&config_path).unwrap(), before);
    }

    #[test]
    fn test_missing_target_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("absent.toml");

        let target = ConfigTarget::Posh {
            config_path: config_path.clone(),
        };
        match target.apply_theme("nord") {
            Err(Error::NotFound(path)) => assert_eq!(path, config_path),
            other => panic!("expected NotFound, got {:?}", other),
        }
    }
}
