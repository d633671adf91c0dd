//! Tests for environment types

use super::environment::*;
use super::version::Version;

#[test]
fn test_platform_aliases() {
    assert_eq!(Platform::from_name("Windows"), Platform::Windows);
    assert_eq!(Platform::from_name("win32"), Platform::Windows);
    assert_eq!(Platform::from_name("Darwin"), Platform::Darwin);
    assert_eq!(Platform::from_name("macos"), Platform::Darwin);
    assert_eq!(Platform::from_name("linux"), Platform::Linux);
    assert_eq!(
        Platform::from_name("FreeBSD"),
        Platform::Other("FreeBSD".to_string())
    );
}

#[test]
fn test_marker_spellings() {
    assert_eq!(Platform::Windows.sys_platform(), "win32");
    assert_eq!(Platform::Windows.os_name(), "nt");
    assert_eq!(Platform::Darwin.os_name(), "posix");
    assert_eq!(Platform::Other("FreeBSD".into()).sys_platform(), "freebsd");
}

#[test]
fn test_host_platform_is_known_on_ci_targets() {
    let host = Platform::host();
    if cfg!(target_os = "linux") {
        assert_eq!(host, Platform::Linux);
    } else if cfg!(target_os = "macos") {
        assert_eq!(host, Platform::Darwin);
    } else if cfg!(target_os = "windows") {
        assert_eq!(host, Platform::Windows);
    }
}

#[test]
fn test_python_version_is_major_minor() {
    let env = Environment::parse("3.8.10", "Linux").unwrap();
    assert_eq!(env.python_version(), Version::parse("3.8").unwrap());
    assert_eq!(
        env.python_full_version(),
        &Version::parse("3.8.10").unwrap()
    );
}

#[test]
fn test_machine_is_optional() {
    let env = Environment::parse("3.10", "Darwin").unwrap();
    assert_eq!(env.machine(), None);
    let env = env.with_machine("arm64");
    assert_eq!(env.machine(), Some("arm64"));
    assert_eq!(env.to_string(), "python 3.10 on Darwin (arm64)");
}

#[test]
fn test_invalid_interpreter_version() {
    assert!(Environment::parse("three", "Linux").is_err());
}
