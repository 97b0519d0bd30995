//! Server-bundle handling of the UI library's stylesheet imports.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! On the server, the component library's JS is normally left external and
//! `require`d at runtime. Its stylesheet sub-paths cannot be required by the
//! server runtime, so those requests must not be externalized. They are kept
//! in the module graph instead, where a `null-loader` rule turns them into
//! empty modules.
//!
//! The externals function is replaced by a wrapper that declines stylesheet
//! requests and delegates everything else to what the host declared.

use once_cell::sync::Lazy;
use regex::Regex;
use webpack_rules::{
    CallConvention, Configuration, ExternalItem, ExternalRequest, ExternalResolution,
    ExternalsFn, LeafRule, Pattern, Use,
};

/// Source of the rule test matching the UI library's stylesheet imports.
pub const UI_STYLE_PATTERN: &str = r"(antd\/.*?\/style|@ant-design).*(?<![.]js)$";

/// [`UI_STYLE_PATTERN`] up to its `.js` lookbehind.
const UI_STYLE_STEM: &str = r"(antd\/.*?\/style|@ant-design).*";

/// Suffix the lookbehind rejects; checked outside the regex.
const SCRIPT_SUFFIX: &str = ".js";

/// Loader emitting an empty module.
pub const NULL_LOADER: &str = "null-loader";

static UI_STYLE_REQUEST: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("{UI_STYLE_STEM}$")).unwrap());

/// Whether `request` imports a stylesheet sub-path of the UI library.
pub fn is_ui_style_request(request: &str) -> bool {
    UI_STYLE_REQUEST.is_match(request) && !request.ends_with(SCRIPT_SUFFIX)
}

/// Route the UI library's stylesheet imports around server externals.
///
/// Does nothing for client builds.
pub fn rewrite_server_externals(config: &mut Configuration) {
    if !config.is_server() {
        return;
    }

    let original = std::mem::take(&mut config.externals);
    let delegate = original.first().and_then(ExternalItem::as_function).cloned();
    let convention = config.bundler_version.externals_convention();

    let mut externals = Vec::with_capacity(original.len() + 1);
    externals.push(ExternalItem::Function(wrap_externals(
        delegate.clone(),
        convention,
    )));
    // A leading function is delegated to; static lists stay after the wrapper
    if delegate.is_none() {
        externals.extend(original);
    }
    config.externals = externals;

    config.rules.insert(
        0,
        LeafRule::new()
            .with_test(Pattern::new(UI_STYLE_PATTERN))
            .with_use(Use::Loader(NULL_LOADER.to_string()))
            .into(),
    );

    tracing::debug!(
        ?convention,
        delegated = delegate.is_some(),
        "Rewrote server externals"
    );
}

/// Build the externals wrapper in the host's call convention.
pub fn wrap_externals(delegate: Option<ExternalsFn>, convention: CallConvention) -> ExternalsFn {
    match convention {
        CallConvention::Contextual => {
            ExternalsFn::contextual(move |request| resolve(delegate.as_ref(), request))
        }
        CallConvention::Legacy => ExternalsFn::legacy(move |context, request| {
            resolve(delegate.as_ref(), &ExternalRequest::new(context, request))
        }),
    }
}

fn resolve(delegate: Option<&ExternalsFn>, request: &ExternalRequest) -> ExternalResolution {
    if is_ui_style_request(&request.request) {
        return ExternalResolution::Skip;
    }
    match delegate {
        Some(f) => f.call(request),
        None => ExternalResolution::Skip,
    }
}
