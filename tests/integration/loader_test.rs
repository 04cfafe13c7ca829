use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

use modwalk::{
    load_each, BoxError, FlowControl, LoadConfig, LoadMode, Unit, UnitError, UnitLoader,
    WalkError, WalkSettings, Walker,
};

fn write_module(dir: &Path, module: &str) -> io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join("go.mod"), format!("module {module}\n\ngo 1.22\n"))
}

/// Loader double recording every invocation and replaying canned units.
#[derive(Default)]
struct StubLoader {
    calls: RefCell<Vec<(PathBuf, LoadConfig)>>,
    units: Vec<Unit>,
    fail_for: Option<String>,
}

impl UnitLoader for StubLoader {
    fn load(&self, dir: &Path, config: &LoadConfig) -> Result<Vec<Unit>, BoxError> {
        self.calls
            .borrow_mut()
            .push((dir.to_path_buf(), config.clone()));
        if let Some(name) = &self.fail_for {
            if dir.file_name().is_some_and(|n| n == name.as_str()) {
                return Err(format!("loader refused {}", dir.display()).into());
            }
        }
        Ok(self.units.clone())
    }
}

fn unit_with_errors(unit_path: &str, errors: &[&str]) -> Unit {
    Unit {
        errors: errors
            .iter()
            .map(|message| UnitError::new("", *message))
            .collect(),
        ..Unit::new(unit_path)
    }
}

#[test]
fn test_load_each_passes_units() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();
    write_module(&base.join("m"), "example.com/m")?;

    let loader = StubLoader {
        units: vec![Unit::new("example.com/m"), Unit::new("example.com/m/sub")],
        ..Default::default()
    };

    let mut seen = Vec::new();
    Walker::default().load_each(base, &loader, |subdir, units| {
        seen.push((subdir.to_path_buf(), units));
        Ok(FlowControl::Continue)
    })?;

    assert_eq!(seen.len(), 1);
    let (dir, units) = &seen[0];
    assert_eq!(dir, &base.join("m"));
    assert_eq!(units.len(), 2);
    assert_eq!(units[1].unit_path, "example.com/m/sub");
    Ok(())
}

#[test]
fn test_loader_receives_module_root_and_default_config(
) -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();
    write_module(&base.join("m"), "example.com/m")?;

    let loader = StubLoader::default();
    Walker::default().load_each(base, &loader, |_subdir, _units| Ok(FlowControl::Continue))?;

    let calls = loader.calls.borrow();
    assert_eq!(calls.len(), 1);
    let (dir, config) = &calls[0];
    assert_eq!(dir, &base.join("m"));
    assert_eq!(config, &LoadConfig::default());
    assert_eq!(config.mode, LoadMode::DEFAULT);
    Ok(())
}

#[test]
fn test_empty_mode_resolves_to_default() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();
    write_module(&base.join("m"), "example.com/m")?;

    let walker = Walker::new(WalkSettings {
        load_config: Some(LoadConfig {
            mode: LoadMode::empty(),
            include_tests: true,
        }),
        ..Default::default()
    });

    let loader = StubLoader::default();
    walker.load_each(base, &loader, |_subdir, _units| Ok(FlowControl::Continue))?;

    let calls = loader.calls.borrow();
    let (_, config) = &calls[0];
    assert_eq!(config.mode, LoadMode::DEFAULT);
    assert!(config.include_tests);
    Ok(())
}

#[test]
fn test_explicit_mode_is_preserved() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();
    write_module(&base.join("m"), "example.com/m")?;

    let walker = Walker::new(WalkSettings {
        load_config: Some(LoadConfig {
            mode: LoadMode::NAME | LoadMode::FILES,
            include_tests: false,
        }),
        ..Default::default()
    });

    let loader = StubLoader::default();
    walker.load_each(base, &loader, |_subdir, _units| Ok(FlowControl::Continue))?;

    let calls = loader.calls.borrow();
    let (_, config) = &calls[0];
    assert_eq!(config.mode, LoadMode::NAME | LoadMode::FILES);
    Ok(())
}

#[test]
fn test_fail_on_unit_errors_aggregates_and_skips_callback() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();
    write_module(&base.join("m"), "example.com/m").unwrap();

    let loader = StubLoader {
        units: vec![
            unit_with_errors("example.com/m/a", &["undefined: Foo"]),
            unit_with_errors("example.com/m/b", &["no source files"]),
        ],
        ..Default::default()
    };
    let walker = Walker::new(WalkSettings {
        fail_on_unit_errors: true,
        ..Default::default()
    });

    let mut visited = Vec::new();
    let err = walker
        .load_each(base, &loader, |subdir, _units| {
            visited.push(subdir.to_path_buf());
            Ok(FlowControl::Continue)
        })
        .unwrap_err();

    assert!(visited.is_empty());

    match err.root_walk_error() {
        WalkError::UnitErrors(set) => {
            assert_eq!(set.len(), 2);
            let units: Vec<&str> = set.iter().map(|e| e.unit.as_str()).collect();
            assert_eq!(units, vec!["example.com/m/a", "example.com/m/b"]);
            assert!(set.to_string().contains("undefined: Foo"));
            assert!(set.to_string().contains("no source files"));
        }
        other => panic!("expected UnitErrors, got {other:?}"),
    }
}

#[test]
fn test_unit_errors_are_passed_through_without_flag() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();
    write_module(&base.join("m"), "example.com/m")?;

    let loader = StubLoader {
        units: vec![unit_with_errors("example.com/m", &["undefined: Foo"])],
        ..Default::default()
    };

    let mut seen_errors = 0;
    Walker::default().load_each(base, &loader, |_subdir, units| {
        seen_errors += units.iter().map(|u| u.errors.len()).sum::<usize>();
        Ok(FlowControl::Continue)
    })?;

    assert_eq!(seen_errors, 1);
    Ok(())
}

#[test]
fn test_loader_failure_aborts_walk() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();
    write_module(&base.join("a"), "example.com/a").unwrap();
    write_module(&base.join("bad"), "example.com/bad").unwrap();
    write_module(&base.join("c"), "example.com/c").unwrap();

    let loader = StubLoader {
        fail_for: Some("bad".to_string()),
        ..Default::default()
    };

    let mut visited = Vec::new();
    let err = Walker::default()
        .load_each(base, &loader, |subdir, _units| {
            visited.push(subdir.to_path_buf());
            Ok(FlowControl::Continue)
        })
        .unwrap_err();

    assert_eq!(visited, vec![base.join("a")]);
    match err.root_walk_error() {
        WalkError::UnitLoad { path, .. } => assert_eq!(path, &base.join("bad")),
        other => panic!("expected UnitLoad, got {other:?}"),
    }
}

#[test]
fn test_load_each_manifest_passes_both() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();
    write_module(&base.join("m"), "example.com/m")?;

    let loader = StubLoader {
        units: vec![Unit::new("example.com/m")],
        ..Default::default()
    };

    let mut seen = Vec::new();
    Walker::default().load_each_manifest(base, &loader, |subdir, manifest, units| {
        seen.push((subdir.to_path_buf(), manifest, units));
        Ok(FlowControl::Continue)
    })?;

    assert_eq!(seen.len(), 1);
    let (dir, manifest, units) = &seen[0];
    assert_eq!(dir, &base.join("m"));
    assert_eq!(manifest.module.as_deref(), Some("example.com/m"));
    assert_eq!(units[0].unit_path, "example.com/m");
    Ok(())
}

#[test]
fn test_units_load_before_manifest_parse() {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();
    fs::create_dir_all(base.join("m")).unwrap();
    fs::write(base.join("m").join("go.mod"), "module broken\nfrobnicate\n").unwrap();

    let loader = StubLoader::default();
    let err = Walker::default()
        .load_each_manifest(base, &loader, |_subdir, _manifest, _units| {
            Ok(FlowControl::Continue)
        })
        .unwrap_err();

    // the loader ran for the root, then the parse failure aborted the walk
    assert_eq!(loader.calls.borrow().len(), 1);
    assert!(matches!(
        err.root_walk_error(),
        WalkError::ManifestParse { .. }
    ));
}

#[test]
fn test_stop_all_through_loader_layer() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();
    write_module(&base.join("a"), "example.com/a")?;
    write_module(&base.join("b"), "example.com/b")?;

    let loader = StubLoader::default();

    let mut visited = Vec::new();
    Walker::default().load_each(base, &loader, |subdir, _units| {
        visited.push(subdir.to_path_buf());
        Ok(FlowControl::StopAll)
    })?;

    assert_eq!(visited, vec![base.join("a")]);
    Ok(())
}

fn empty_loader(_dir: &Path, _config: &LoadConfig) -> Result<Vec<Unit>, BoxError> {
    Ok(Vec::new())
}

#[test]
fn test_closure_loaders_satisfy_the_trait() -> Result<(), Box<dyn std::error::Error>> {
    let temp_dir = tempdir().unwrap();
    let base = temp_dir.path();
    write_module(&base.join("m"), "example.com/m")?;

    let mut count = 0;
    load_each(base, &empty_loader, |_subdir, units| {
        assert!(units.is_empty());
        count += 1;
        Ok(FlowControl::Continue)
    })?;

    assert_eq!(count, 1);
    Ok(())
}
