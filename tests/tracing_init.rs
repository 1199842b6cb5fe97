//! Subscriber installation, kept in its own test binary because it sets
//! process-wide state

#[test]
#[cfg(not(target_os = "windows"))]
fn test_init_twice_keeps_first_subscriber() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", dir.path());

    panelstack::tracing::init();
    // A second install is refused and logged instead of panicking
    panelstack::tracing::init();

    assert!(dir.path().join("panelstack").join("logs").is_dir());
}
