use prettypage::{EditorResolver, EditorResolverRegistry, EditorSelector, PageError};

#[test]
fn test_builtin_editors() {
    let registry = EditorResolverRegistry::default();
    assert_eq!(
        registry.identifiers(),
        vec!["sublime", "textmate", "emacs", "macvim"]
    );
    assert!(!registry.contains("xdebug"));
}

#[test]
fn test_no_active_editor_resolves_to_none() {
    let registry = EditorResolverRegistry::default();
    assert_eq!(registry.resolve("/a/b.php", 42).unwrap(), None);
}

#[test]
fn test_sublime_link() {
    let mut registry = EditorResolverRegistry::default();
    registry.set_active("sublime").unwrap();
    assert_eq!(
        registry.resolve("/a/b.php", 42).unwrap().as_deref(),
        Some("subl://open?url=file://%2Fa%2Fb.php&line=42")
    );
}

#[test]
fn test_macvim_link_encodes_spaces() {
    let mut registry = EditorResolverRegistry::default();
    registry.set_active("macvim").unwrap();
    assert_eq!(
        registry.resolve("/My Code/x.php", 3).unwrap().as_deref(),
        Some("mvim://open/?url=file://%2FMy%20Code%2Fx.php&line=3")
    );
}

#[test]
fn test_unknown_editor_lists_known_ones() {
    let mut registry = EditorResolverRegistry::default();
    registry.add_editor("phpstorm", "phpstorm://open?file=%file&line=%line");

    let err = registry.set_active("unknown-id").unwrap_err();
    let PageError::InvalidArgument(message) = err else {
        panic!("expected InvalidArgument");
    };
    assert!(message.contains("unknown-id"));
    for id in ["sublime", "textmate", "emacs", "macvim", "phpstorm"] {
        assert!(message.contains(id), "{} missing from: {}", id, message);
    }
    assert!(registry.active().is_none());
}

#[test]
fn test_callable_selector() {
    let mut registry = EditorResolverRegistry::new();
    registry
        .set_active(EditorSelector::callable(|file, line| {
            Some(format!("file://{}#L{}", file, line))
        }))
        .unwrap();
    assert_eq!(
        registry.resolve("/src/main.rs", 9).unwrap().as_deref(),
        Some("file:///src/main.rs#L9")
    );
}

#[test]
fn test_callable_result_gets_placeholders_replaced() {
    let mut registry = EditorResolverRegistry::new();
    registry.add_editor(
        "remote",
        EditorResolver::callable(|_, _| Some("https://code.example/%file?l=%line".to_string())),
    );
    registry.set_active("remote").unwrap();
    assert_eq!(
        registry.resolve("/a/b.rs", 5).unwrap().as_deref(),
        Some("https://code.example/%2Fa%2Fb.rs?l=5")
    );
}

#[test]
fn test_callable_without_string_fails() {
    let mut registry = EditorResolverRegistry::default();
    registry
        .set_active(EditorSelector::callable(|_, _| None))
        .unwrap();
    let err = registry.resolve("/a/b.php", 1).unwrap_err();
    assert!(matches!(err, PageError::InvalidArgument(ref m) if m.contains("resolve")));
}

#[test]
fn test_registered_callable_without_string_fails() {
    let mut registry = EditorResolverRegistry::default();
    registry.add_editor("broken", EditorResolver::callable(|_, _| None));
    registry.set_active("broken").unwrap();
    assert!(matches!(
        registry.resolve("/a/b.php", 1),
        Err(PageError::InvalidArgument(_))
    ));
}

#[test]
fn test_add_editor_overwrites() {
    let mut registry = EditorResolverRegistry::default();
    registry.add_editor("sublime", "subl://%file:%line");
    assert_eq!(registry.len(), 4);

    registry.set_active("sublime").unwrap();
    assert_eq!(
        registry.resolve("/x", 2).unwrap().as_deref(),
        Some("subl://%2Fx:2")
    );
}

#[test]
fn test_xdebug_editor_registered_from_format() {
    let mut registry =
        EditorResolverRegistry::with_builtin_editors(Some("ide://open?f=%f&l=%l".to_string()));
    assert!(registry.contains("xdebug"));

    registry.set_active("xdebug").unwrap();
    assert_eq!(
        registry.resolve("/srv/app.php", 17).unwrap().as_deref(),
        Some("ide://open?f=/srv/app.php&l=17")
    );
}

#[test]
fn test_switching_active_editor() {
    let mut registry = EditorResolverRegistry::default();
    registry.set_active("emacs").unwrap();
    registry.set_active("textmate").unwrap();
    assert_eq!(
        registry.resolve("/a", 1).unwrap().as_deref(),
        Some("txmt://open?url=file://%2Fa&line=1")
    );

    registry.clear_active();
    assert_eq!(registry.resolve("/a", 1).unwrap(), None);
}
