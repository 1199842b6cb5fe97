use panelstack::theme::{
    from_file, Color, Theme, ThemeRole, BUILTIN_THEMES, DEFAULT_DARK_YAML, DEFAULT_LIGHT_YAML,
};

#[test]
fn test_color_from_hex_6() {
    let color = Color::from_hex("#1E1E1E").unwrap();
    assert_eq!(color.r, 0x1E);
    assert_eq!(color.g, 0x1E);
    assert_eq!(color.b, 0x1E);
    assert_eq!(color.a, 255);
}

#[test]
fn test_color_from_hex_8() {
    let color = Color::from_hex("#1E1E1E80").unwrap();
    assert_eq!(color.a, 0x80);
}

#[test]
fn test_color_from_hex_rejects_garbage() {
    assert!(Color::from_hex("#12").is_err());
    assert!(Color::from_hex("#GGGGGG").is_err());
}

#[test]
fn test_shade_saturates() {
    let color = Color::rgb(250, 10, 128);
    assert_eq!(color.shade(20), Color::rgb(255, 30, 148));
    assert_eq!(color.shade(-20), Color::rgb(230, 0, 108));
}

#[test]
fn test_default_dark_yaml_parses() {
    let theme = Theme::from_yaml(DEFAULT_DARK_YAML).unwrap();
    assert_eq!(theme.color(ThemeRole::PanelBack), theme.panel_back);
}

#[test]
fn test_default_light_yaml_parses() {
    assert!(Theme::from_yaml(DEFAULT_LIGHT_YAML).is_ok());
}

#[test]
fn test_from_builtin() {
    assert!(Theme::from_builtin("default-dark").is_ok());
    assert!(Theme::from_builtin("nonexistent").is_err());
}

#[test]
fn test_all_builtin_themes_parse() {
    for builtin in BUILTIN_THEMES {
        let theme = Theme::from_yaml(builtin.yaml)
            .unwrap_or_else(|e| panic!("Failed to parse theme '{}': {}", builtin.id, e));
        assert!(
            !theme.name.is_empty(),
            "Theme '{}' has empty name",
            builtin.id
        );
    }
}

#[test]
fn test_theme_from_user_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.yaml");
    std::fs::write(
        &path,
        r##"
version: 1
name: Custom
ui:
  region:
    background: "#101010"
    text: "#C0C0C0"
    text_highlight: "#FFFFFF"
  panel:
    header: "#202020"
    background: "#181818"
    title: "#E0E0E0"
    search_match: "#3366CC"
  tabs:
    background: "#0A0A0A"
    active: "#181818"
    inactive: "#121212"
    outline: "#000000"
"##,
    )
    .unwrap();

    let theme = from_file(&path).unwrap();
    assert_eq!(theme.name, "Custom");
    // Optional colors derive from the panel background
    assert_eq!(theme.panel_sub_back, theme.panel_back);
    assert_eq!(theme.box_outline, theme.panel_back.shade(-24));
}
