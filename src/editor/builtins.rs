use super::EditorResolver;

/// Well-known editors and their URL templates
pub fn builtin_editors() -> &'static [(&'static str, &'static str)] {
    &[
        ("sublime", "subl://open?url=file://%file&line=%line"),
        ("textmate", "txmt://open?url=file://%file&line=%line"),
        ("emacs", "emacs://open?url=file://%file&line=%line"),
        ("macvim", "mvim://open/?url=file://%file&line=%line"),
    ]
}

/// Resolver built from the debugger's file link format, which uses `%f`
/// and `%l` for the file and line.
pub fn xdebug_resolver(format: String) -> EditorResolver {
    EditorResolver::callable(move |file, line| {
        Some(format.replace("%f", file).replace("%l", &line.to_string()))
    })
}
