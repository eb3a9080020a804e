#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const CONFIG: &str = "\
Host web
  HostName web.example.com
  User deploy

Host bastion
  ProxyCommand ssh -W %h:%p gw.example.com
";

fn sshs(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sshs"))
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .unwrap()
}

fn write_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config");
    fs::write(&path, CONFIG).unwrap();
    path
}

#[test]
fn list_prints_rows_with_proxy_placeholder() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let out = sshs(&config, &["--list"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.lines().next().unwrap().starts_with("Hostname"));
    assert!(stdout.contains("web.example.com"));
    assert!(stdout.contains("(Proxy)"));
    assert!(!stdout.contains("gw.example.com"));
}

#[test]
fn list_honours_search_and_full_proxy() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let out = sshs(&config, &["--list", "--proxy", "--search", "BAST"]);
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.contains("ssh -W %h:%p gw.example.com"));
    assert!(!stdout.contains("web.example.com"));
}

#[test]
fn connect_propagates_child_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let out = sshs(&config, &["--connect", "web", "--template", "sh -c 'exit 3'"]);
    assert_eq!(out.status.code(), Some(3));
}

#[test]
fn connect_runs_session_hooks_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());
    let log = dir.path().join("hooks.log");
    let path = log.display();

    let out = sshs(
        &config,
        &[
            "--connect",
            "web",
            "--template",
            &format!("sh -c 'echo session:$0 >> {path}; exit 2' %h"),
            "--on-session-start-template",
            &format!("sh -c 'echo start:$0 >> {path}' %n"),
            "--on-session-end-template",
            &format!("sh -c 'echo end:$0 >> {path}' %u"),
        ],
    );
    assert_eq!(out.status.code(), Some(2));
    assert_eq!(
        fs::read_to_string(&log).unwrap(),
        "start:web\nsession:web.example.com\nend:deploy\n"
    );
}

#[test]
fn connect_unknown_host_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_config(dir.path());

    let out = sshs(&config, &["--connect", "nope"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("nope"));
}

#[test]
fn missing_custom_config_is_fatal() {
    let dir = tempfile::tempdir().unwrap();

    let out = sshs(&dir.path().join("absent"), &["--list"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.path().join("absent").exists());
}
