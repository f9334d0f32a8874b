//! Server configuration
//!
//! Settings arrive as JSON through `initializationOptions` and
//! `workspace/didChangeConfiguration`, with camelCase field names matching
//! the client side. Glob patterns are compiled to regular expressions once,
//! at load time; characters the glob syntax does not claim match
//! themselves, so no pattern is rejected as malformed.

use std::path::Path;

use regex::Regex;
use serde::Deserialize;
use tower_lsp::lsp_types::Url;

use crate::error::{NavError, NavResult};

/// Which side of the style/markup linkage a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageFamily {
    /// HTML, JSX/TSX, Vue and friends: documents that consume selectors
    Html,
    /// CSS, SCSS, Sass and Less: documents that define selectors
    Css,
}

/// Raw settings as the client sends them. Missing fields fall back to the
/// defaults below, so a partial settings object is always acceptable.
/// Field names keep the client's capitalized acronyms where they have them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    /// File extensions treated as markup documents
    #[serde(rename = "activeHTMLFileExtensions")]
    pub active_html_file_extensions: Vec<String>,
    /// File extensions treated as stylesheet documents
    #[serde(rename = "activeCSSFileExtensions")]
    pub active_css_file_extensions: Vec<String>,
    /// Glob patterns (relative to the workspace root) excluded from scanning
    pub exclude_glob_patterns: Vec<String>,
    /// Glob patterns that win over `exclude_glob_patterns`
    pub always_include_glob_patterns: Vec<String>,
    /// Skip `x.css` when a sibling `x.scss`/`x.sass`/`x.less` is tracked,
    /// since the compiled output would double every search result
    #[serde(rename = "ignoreSameNameCSSFile")]
    pub ignore_same_name_css_file: bool,
    /// Do not treat hyphenated tag names as selector usages
    pub ignore_custom_element: bool,
    /// When resolving a definition from markup, also offer matches from the
    /// requesting document's own `<style>` blocks
    pub also_search_definitions_in_style_tag: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            active_html_file_extensions: to_string_vec(&[
                "html", "ejs", "erb", "php", "hbs", "js", "ts", "jsx", "tsx", "vue", "twig",
            ]),
            active_css_file_extensions: to_string_vec(&["css", "scss", "sass", "less"]),
            exclude_glob_patterns: to_string_vec(&[
                "**/node_modules/**",
                "**/bower_components/**",
                "**/vendor/**",
                "**/.git/**",
            ]),
            always_include_glob_patterns: Vec::new(),
            ignore_same_name_css_file: true,
            ignore_custom_element: false,
            also_search_definitions_in_style_tag: false,
        }
    }
}

fn to_string_vec(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Validated configuration with glob patterns compiled.
#[derive(Debug)]
pub struct Configuration {
    pub active_html_file_extensions: Vec<String>,
    pub active_css_file_extensions: Vec<String>,
    pub ignore_same_name_css_file: bool,
    pub ignore_custom_element: bool,
    pub also_search_definitions_in_style_tag: bool,
    exclude_matchers: Vec<Regex>,
    always_include_matchers: Vec<Regex>,
}

impl Configuration {
    /// Compile `settings` into a usable configuration, translating each
    /// glob pattern into an anchored regex once up front.
    pub fn new(settings: Settings) -> NavResult<Self> {
        let exclude_matchers = compile_globs(&settings.exclude_glob_patterns)?;
        let always_include_matchers = compile_globs(&settings.always_include_glob_patterns)?;
        Ok(Configuration {
            active_html_file_extensions: lowercase_all(settings.active_html_file_extensions),
            active_css_file_extensions: lowercase_all(settings.active_css_file_extensions),
            ignore_same_name_css_file: settings.ignore_same_name_css_file,
            ignore_custom_element: settings.ignore_custom_element,
            also_search_definitions_in_style_tag: settings.also_search_definitions_in_style_tag,
            exclude_matchers,
            always_include_matchers,
        })
    }

    /// Decode a JSON settings object as sent by the client.
    pub fn from_json(value: serde_json::Value) -> NavResult<Self> {
        let settings: Settings = serde_json::from_value(value).map_err(|e| NavError::Config {
            message: e.to_string(),
        })?;
        Configuration::new(settings)
    }

    /// Classify a document by its file extension, or `None` when neither
    /// family claims it.
    pub fn family_of_url(&self, uri: &Url) -> Option<LanguageFamily> {
        let path = uri.path();
        let name = path.rsplit('/').next().unwrap_or(path);
        let (_, extension) = name.rsplit_once('.')?;
        self.family_of_extension(extension)
    }

    /// Classify a filesystem path by extension.
    pub fn family_of_path(&self, path: &Path) -> Option<LanguageFamily> {
        let extension = path.extension()?.to_str()?;
        self.family_of_extension(extension)
    }

    fn family_of_extension(&self, extension: &str) -> Option<LanguageFamily> {
        let matches_any =
            |list: &[String]| list.iter().any(|e| e.eq_ignore_ascii_case(extension));
        if matches_any(&self.active_css_file_extensions) {
            Some(LanguageFamily::Css)
        } else if matches_any(&self.active_html_file_extensions) {
            Some(LanguageFamily::Html)
        } else {
            None
        }
    }

    /// Whether a workspace-relative path (forward slashes) is excluded from
    /// scanning. Always-include patterns override excludes.
    pub fn is_excluded(&self, relative_path: &str) -> bool {
        if !self.exclude_matchers.iter().any(|m| m.is_match(relative_path)) {
            return false;
        }
        !self
            .always_include_matchers
            .iter()
            .any(|m| m.is_match(relative_path))
    }

    /// Whether the always-include list is empty, which allows directory
    /// pruning during scans (nothing below an excluded directory can be
    /// re-admitted).
    pub fn can_prune_directories(&self) -> bool {
        self.always_include_matchers.is_empty()
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new(Settings::default()).expect("default glob patterns must compile")
    }
}

fn lowercase_all(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|s| s.trim_start_matches('.').to_ascii_lowercase())
        .collect()
}

fn compile_globs(patterns: &[String]) -> NavResult<Vec<Regex>> {
    patterns.iter().map(|p| glob_to_regex(p)).collect()
}

/// Translate one glob pattern to an anchored regex over a forward-slash
/// relative path. `**` crosses directory separators, `*` and `?` do not;
/// every other character matches itself.
fn glob_to_regex(glob: &str) -> NavResult<Regex> {
    let mut pattern = String::with_capacity(glob.len() * 2 + 2);
    pattern.push('^');
    let mut chars = glob.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '*' => {
                if chars.peek() == Some(&'*') {
                    chars.next();
                    if chars.peek() == Some(&'/') {
                        chars.next();
                        // "**/" also matches an empty leading path
                        pattern.push_str("(?:.*/)?");
                    } else {
                        pattern.push_str(".*");
                    }
                } else {
                    pattern.push_str("[^/]*");
                }
            }
            '?' => pattern.push_str("[^/]"),
            '.' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '^' | '$' | '|' | '\\' => {
                pattern.push('\\');
                pattern.push(ch);
            }
            other => pattern.push(other),
        }
    }
    pattern.push('$');
    // metacharacters are escaped above, so only the compiled size limit can
    // reject a pattern here
    Regex::new(&pattern).map_err(|e| NavError::Config {
        message: format!("glob pattern {:?}: {}", glob, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> Configuration {
        Configuration::default()
    }

    #[test]
    fn test_default_extension_classification() {
        let config = default_config();
        let css = Url::parse("file:///project/styles/main.scss").unwrap();
        let html = Url::parse("file:///project/src/App.tsx").unwrap();
        let other = Url::parse("file:///project/README.md").unwrap();

        assert_eq!(config.family_of_url(&css), Some(LanguageFamily::Css));
        assert_eq!(config.family_of_url(&html), Some(LanguageFamily::Html));
        assert_eq!(config.family_of_url(&other), None);
    }

    #[test]
    fn test_extension_classification_is_case_insensitive() {
        let config = default_config();
        let uri = Url::parse("file:///project/Index.HTML").unwrap();
        assert_eq!(config.family_of_url(&uri), Some(LanguageFamily::Html));
    }

    #[test]
    fn test_file_without_extension_is_unclassified() {
        let config = default_config();
        let uri = Url::parse("file:///project/Makefile").unwrap();
        assert_eq!(config.family_of_url(&uri), None);
    }

    #[test]
    fn test_glob_translation_double_star() {
        let regex = glob_to_regex("**/node_modules/**").unwrap();
        assert!(regex.is_match("node_modules/pkg/index.css"));
        assert!(regex.is_match("deep/nested/node_modules/pkg/a.css"));
        assert!(!regex.is_match("src/not_node_modules/a.css"));
    }

    #[test]
    fn test_glob_translation_single_star_stays_in_directory() {
        let regex = glob_to_regex("src/*.css").unwrap();
        assert!(regex.is_match("src/main.css"));
        assert!(!regex.is_match("src/sub/main.css"));
    }

    #[test]
    fn test_glob_translation_escapes_regex_metacharacters() {
        let regex = glob_to_regex("src/file+(1).css").unwrap();
        assert!(regex.is_match("src/file+(1).css"));
        assert!(!regex.is_match("src/fileX(1).css"));
    }

    #[test]
    fn test_glob_translation_question_mark() {
        let regex = glob_to_regex("a?.css").unwrap();
        assert!(regex.is_match("ab.css"));
        assert!(!regex.is_match("a/b.css"));
        assert!(!regex.is_match("a.css"));
    }

    #[test]
    fn test_unbalanced_bracket_is_taken_literally() {
        let settings = Settings {
            exclude_glob_patterns: vec!["***[".to_string()],
            ..Settings::default()
        };
        let config = Configuration::new(settings).unwrap();
        assert!(config.is_excluded("src/["));
        assert!(!config.is_excluded("src/x.css"));
    }

    #[test]
    fn test_always_include_overrides_exclude() {
        let settings = Settings {
            exclude_glob_patterns: vec!["**/node_modules/**".to_string()],
            always_include_glob_patterns: vec!["**/node_modules/my-lib/**".to_string()],
            ..Settings::default()
        };
        let config = Configuration::new(settings).unwrap();
        assert!(config.is_excluded("node_modules/other/a.css"));
        assert!(!config.is_excluded("node_modules/my-lib/a.css"));
        assert!(!config.can_prune_directories());
    }

    #[test]
    fn test_settings_deserialize_client_field_names() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "activeCSSFileExtensions": ["css"],
            "ignoreCustomElement": true,
        }))
        .unwrap();
        assert_eq!(settings.active_css_file_extensions, vec!["css".to_string()]);
        assert!(settings.ignore_custom_element);
        // untouched fields keep their defaults
        assert!(settings.ignore_same_name_css_file);
        assert!(settings
            .active_html_file_extensions
            .contains(&"vue".to_string()));
    }

    #[test]
    fn test_extension_lists_normalized() {
        let settings = Settings {
            active_css_file_extensions: vec![".CSS".to_string(), "Less".to_string()],
            ..Settings::default()
        };
        let config = Configuration::new(settings).unwrap();
        let uri = Url::parse("file:///p/a.less").unwrap();
        assert_eq!(config.family_of_url(&uri), Some(LanguageFamily::Css));
    }
}
