//! Default scoped class-name generation.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! CSS Modules rewrite every local class name through a generator. Callers
//! may bring their own; otherwise [`NextLocalIdent`] interpolates the naming
//! convention the way the host's CSS loader does:
//!
//! | token              | replaced by                                         |
//! |--------------------|-----------------------------------------------------|
//! | `[local]`          | the class name as written                           |
//! | `[name]`           | file name up to its first dot (`button.module.less` → `button`) |
//! | `[folder]`         | name of the directory holding the file              |
//! | `[ext]`            | file extension with its dot                         |
//! | `[hash]`           | 8 characters of the digest                          |
//! | `[hash:base64:N]`  | N characters of the digest                          |
//!
//! The digest is SHA-256 over the project-relative path and the local name,
//! encoded as URL-safe base64 so that results are valid identifier text.

use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use sha2::{Digest, Sha256};
use webpack_rules::{LocalIdentContext, LocalIdentFn};

/// Naming convention used for development builds.
pub const DEV_LOCAL_IDENT_NAME: &str = "[local]--[hash:base64:4]";

/// Naming convention used for release builds.
pub const RELEASE_LOCAL_IDENT_NAME: &str = "[hash:base64:8]";

const DEFAULT_HASH_LENGTH: usize = 8;

static TEMPLATE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(local|name|folder|ext|hash(?::base64(?::(\d+))?)?)\]").unwrap()
});

/// Produces the scoped class name for a local class.
pub trait LocalIdentGenerator: Send + Sync {
    fn generate(
        &self,
        context: &LocalIdentContext,
        local_ident_name: &str,
        local_name: &str,
    ) -> String;
}

/// Wrap a generator as the callback stored in loader options.
pub fn local_ident_fn(generator: impl LocalIdentGenerator + 'static) -> LocalIdentFn {
    Arc::new(
        move |context: &LocalIdentContext, local_ident_name: &str, local_name: &str| {
            generator.generate(context, local_ident_name, local_name)
        },
    )
}

/// The default naming convention for the current build mode.
pub fn default_local_ident_name(dev: bool) -> &'static str {
    if dev {
        DEV_LOCAL_IDENT_NAME
    } else {
        RELEASE_LOCAL_IDENT_NAME
    }
}

/// Generator matching the host's class-name conventions.
///
/// Release builds use hash-only names unless `follow_dev` is set, in which
/// case the configured naming convention is honoured as in development.
#[derive(Debug, Clone, Copy)]
pub struct NextLocalIdent {
    dev: bool,
    follow_dev: bool,
}

impl NextLocalIdent {
    pub fn new(dev: bool, follow_dev: bool) -> Self {
        Self { dev, follow_dev }
    }
}

impl LocalIdentGenerator for NextLocalIdent {
    fn generate(
        &self,
        context: &LocalIdentContext,
        local_ident_name: &str,
        local_name: &str,
    ) -> String {
        let template = if self.dev || self.follow_dev {
            local_ident_name
        } else {
            RELEASE_LOCAL_IDENT_NAME
        };
        sanitize(&interpolate(template, context, local_name))
    }
}

fn interpolate(template: &str, context: &LocalIdentContext, local_name: &str) -> String {
    let relative = context
        .resource_path
        .strip_prefix(&context.root_context)
        .unwrap_or(&context.resource_path);
    let relative = relative.to_string_lossy().replace('\\', "/");
    let digest = digest(&relative, local_name);

    TEMPLATE_TOKEN
        .replace_all(template, |captures: &Captures<'_>| match &captures[1] {
            "local" => local_name.to_string(),
            "name" => file_name_stem(&context.resource_path),
            "folder" => folder_name(&context.resource_path),
            "ext" => context
                .resource_path
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_default(),
            _ => {
                let length = captures
                    .get(2)
                    .and_then(|len| len.as_str().parse().ok())
                    .unwrap_or(DEFAULT_HASH_LENGTH);
                digest.chars().take(length).collect()
            }
        })
        .into_owned()
}

fn digest(relative_path: &str, local_name: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(relative_path.as_bytes());
    hasher.update([0u8]);
    hasher.update(local_name.as_bytes());
    URL_SAFE_NO_PAD.encode(hasher.finalize())
}

fn file_name_stem(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('.').next().map(str::to_string))
        .unwrap_or_default()
}

fn folder_name(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Make `ident` a valid CSS class name.
fn sanitize(ident: &str) -> String {
    let mut out: String = ident
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut chars = out.chars();
    let needs_prefix = match (chars.next(), chars.next()) {
        (None, _) => true,
        (Some(first), _) if first.is_ascii_digit() => true,
        (Some('-'), Some(second)) => second.is_ascii_digit() || second == '-',
        _ => false,
    };
    if needs_prefix {
        out.insert(0, '_');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn context() -> LocalIdentContext {
        LocalIdentContext {
            resource_path: PathBuf::from("/app/components/button.module.less"),
            root_context: PathBuf::from("/app"),
        }
    }

    #[test]
    fn test_dev_convention_keeps_local_name() {
        let generator = NextLocalIdent::new(true, false);
        let ident = generator.generate(&context(), DEV_LOCAL_IDENT_NAME, "primary");
        assert!(ident.starts_with("primary--"));
        assert_eq!(ident.len(), "primary--".len() + 4);
    }

    #[test]
    fn test_release_ignores_convention_unless_following_dev() {
        let release = NextLocalIdent::new(false, false);
        let ident = release.generate(&context(), "[local]_[hash]", "primary");
        assert!(!ident.contains("primary"));
        // 8 digest characters, plus a `_` when the digest starts like a number
        assert!(ident.len() == 8 || ident.len() == 9);

        let follow = NextLocalIdent::new(false, true);
        let ident = follow.generate(&context(), "[local]_[hash]", "primary");
        assert!(ident.starts_with("primary_"));
    }

    #[test]
    fn test_generation_is_deterministic_and_file_scoped() {
        let generator = NextLocalIdent::new(true, false);
        let a = generator.generate(&context(), "[hash:base64:8]", "primary");
        let b = generator.generate(&context(), "[hash:base64:8]", "primary");
        assert_eq!(a, b);

        let other = LocalIdentContext {
            resource_path: PathBuf::from("/app/components/card.module.less"),
            root_context: PathBuf::from("/app"),
        };
        assert_ne!(a, generator.generate(&other, "[hash:base64:8]", "primary"));
    }

    #[test]
    fn test_path_tokens() {
        let generator = NextLocalIdent::new(true, false);
        let ident = generator.generate(&context(), "[folder]-[name][ext]-[local]", "title");
        assert_eq!(ident, "components-button_less-title");
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("1abc"), "_1abc");
        assert_eq!(sanitize("-1abc"), "_-1abc");
        assert_eq!(sanitize("a.b c"), "a_b_c");
        assert_eq!(sanitize(""), "_");
        assert_eq!(sanitize("ok-name_1"), "ok-name_1");
    }

    #[test]
    fn test_local_ident_fn_wraps_generator() {
        let f = local_ident_fn(NextLocalIdent::new(true, false));
        assert_eq!(f(&context(), "[local]", "header"), "header");
    }
}
