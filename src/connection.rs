use std::path::Path;
use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::error::LaunchError;
use crate::ssh_config::model::Host;

/// A program and its arguments, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

/// Build the command that connects to `host`.
///
/// With an empty template this is `ssh -F <config> <name>`. Otherwise the
/// template is split like a shell would, and each token has its
/// placeholders replaced (see [`expand_placeholders`]).
pub fn command_line(
    host: &Host,
    config_path: &Path,
    template: &str,
) -> Result<CommandLine, LaunchError> {
    let config_path = config_path.to_string_lossy();
    if template.trim().is_empty() {
        return Ok(CommandLine {
            program: "ssh".to_string(),
            args: vec![
                "-F".to_string(),
                config_path.into_owned(),
                host.display_name.trim().to_string(),
            ],
        });
    }

    let tokens =
        shlex::split(template).ok_or_else(|| LaunchError::InvalidTemplate(template.to_string()))?;
    let mut tokens = tokens
        .iter()
        .map(|token| expand_placeholders(token, host, &config_path));
    let program = tokens
        .next()
        .filter(|program| !program.is_empty())
        .ok_or(LaunchError::EmptyCommand)?;
    Ok(CommandLine {
        program,
        args: tokens.collect(),
    })
}

/// Replace `%u` (user), `%h` (hostname), `%p` (port), `%r` (proxy command),
/// `%n` (display name) and `%c` (config path) in one token, in that order.
///
/// Values are not escaped: a value that itself contains a later placeholder
/// gets substituted again.
pub fn expand_placeholders(token: &str, host: &Host, config_path: &str) -> String {
    token
        .replace("%u", &host.user)
        .replace("%h", &host.host_name)
        .replace("%p", &host.port.to_string())
        .replace("%r", &host.proxy_command)
        .replace("%n", &host.display_name)
        .replace("%c", config_path)
}

/// Commands run just before and just after a connection. Empty templates
/// are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionHooks<'a> {
    pub on_start: &'a str,
    pub on_end: &'a str,
}

/// Run the connection command for `host` with inherited stdio and wait for
/// it. Returns the child's exit code; a child killed by a signal counts as 1.
///
/// The caller must release the terminal first.
pub fn launch(host: &Host, config_path: &Path, template: &str) -> Result<i32, LaunchError> {
    let command = command_line(host, config_path, template)?;
    info!(program = %command.program, args = ?command.args, "Launching connection");
    let code = run(&command)?;
    info!(code, "Connection ended");
    Ok(code)
}

/// Like [`launch`], with the start hook before and the end hook after the
/// connection. The end hook runs even when the connection failed to spawn.
/// Hook failures are logged and never change the result.
pub fn run_session(
    host: &Host,
    config_path: &Path,
    template: &str,
    hooks: &SessionHooks<'_>,
) -> Result<i32, LaunchError> {
    run_hook("start", host, config_path, hooks.on_start);
    let result = launch(host, config_path, template);
    run_hook("end", host, config_path, hooks.on_end);
    result
}

fn run_hook(stage: &str, host: &Host, config_path: &Path, template: &str) {
    if template.trim().is_empty() {
        return;
    }
    let outcome = command_line(host, config_path, template).and_then(|command| {
        debug!(stage, program = %command.program, args = ?command.args, "Running session hook");
        run(&command)
    });
    match outcome {
        Ok(0) => {}
        Ok(code) => warn!(stage, code, "Session hook exited with a non-zero code"),
        Err(e) => warn!(stage, error = %e, "Session hook failed"),
    }
}

fn run(command: &CommandLine) -> Result<i32, LaunchError> {
    let status = Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .map_err(|source| LaunchError::Spawn {
            program: command.program.clone(),
            source,
        })?;
    Ok(status.code().unwrap_or(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Host {
        Host {
            patterns: vec!["\"My server\"".to_string()],
            display_name: "My server".to_string(),
            user: "root".to_string(),
            host_name: "web.example.com".to_string(),
            proxy_command: "nc gw 22".to_string(),
            port: 2222,
        }
    }

    #[test]
    fn default_command_uses_config_and_name() {
        let mut host = host();
        host.display_name = "  web  ".to_string();
        let command = command_line(&host, Path::new("/home/me/.ssh/config"), "").unwrap();
        assert_eq!(command.program, "ssh");
        assert_eq!(command.args, vec!["-F", "/home/me/.ssh/config", "web"]);
    }

    #[test]
    fn template_placeholders_are_substituted_per_token() {
        let command = command_line(
            &host(),
            Path::new("/cfg"),
            "ssh -F %c -p %p %u@%h -o \"ProxyCommand=%r\" -- %n",
        )
        .unwrap();
        assert_eq!(command.program, "ssh");
        assert_eq!(
            command.args,
            vec![
                "-F",
                "/cfg",
                "-p",
                "2222",
                "root@web.example.com",
                "-o",
                "ProxyCommand=nc gw 22",
                "--",
                "My server",
            ]
        );
    }

    #[test]
    fn substituted_values_are_not_resplit() {
        let command = command_line(&host(), Path::new("/cfg"), "echo %n").unwrap();
        assert_eq!(command.args, vec!["My server"]);
    }

    #[test]
    fn substitution_is_blind() {
        let mut host = host();
        host.host_name = "odd%pname".to_string();
        assert_eq!(expand_placeholders("%h", &host, "/cfg"), "odd2222name");
    }

    #[test]
    fn unbalanced_quotes_are_rejected() {
        let err = command_line(&host(), Path::new("/cfg"), "ssh \"%h").unwrap_err();
        assert!(matches!(err, LaunchError::InvalidTemplate(_)));
    }

    #[test]
    fn whitespace_template_falls_back_to_ssh() {
        let command = command_line(&host(), Path::new("/cfg"), "   ").unwrap();
        assert_eq!(command.program, "ssh");
    }

    #[test]
    fn empty_program_is_rejected() {
        let err = command_line(&host(), Path::new("/cfg"), "'' -v").unwrap_err();
        assert!(matches!(err, LaunchError::EmptyCommand));
    }

    #[cfg(unix)]
    #[test]
    fn exit_code_is_returned() {
        let code = launch(&host(), Path::new("/cfg"), "sh -c 'exit 3'").unwrap();
        assert_eq!(code, 3);
        let code = launch(&host(), Path::new("/cfg"), "true").unwrap();
        assert_eq!(code, 0);
    }

    #[cfg(unix)]
    #[test]
    fn placeholders_reach_the_child() {
        let code = launch(&host(), Path::new("/cfg"), "sh -c 'test \"$0\" = root' %u").unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let err = launch(&host(), Path::new("/cfg"), "definitely-not-a-real-program-4242")
            .unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { .. }));
        assert_eq!(err.exit_code(), 127);
    }

    #[cfg(unix)]
    #[test]
    fn hooks_run_around_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("log");
        let path = log.display();
        let on_start = format!("sh -c 'echo start:$0 >> {path}' %u");
        let on_end = format!("sh -c 'echo end:$0 >> {path}' %p");
        let session = format!("sh -c 'echo session >> {path}; exit 4'");
        let hooks = SessionHooks {
            on_start: &on_start,
            on_end: &on_end,
        };

        let code = run_session(&host(), Path::new("/cfg"), &session, &hooks).unwrap();
        assert_eq!(code, 4);
        assert_eq!(
            std::fs::read_to_string(&log).unwrap(),
            "start:root\nsession\nend:2222\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn hook_failures_do_not_change_the_result() {
        let hooks = SessionHooks {
            on_start: "definitely-not-a-real-program-4242",
            on_end: "sh -c 'exit 9'",
        };
        let code = run_session(&host(), Path::new("/cfg"), "true", &hooks).unwrap();
        assert_eq!(code, 0);

        let hooks = SessionHooks {
            on_start: "sh \"",
            on_end: "",
        };
        let code = run_session(&host(), Path::new("/cfg"), "sh -c 'exit 5'", &hooks).unwrap();
        assert_eq!(code, 5);
    }

    #[cfg(unix)]
    #[test]
    fn end_hook_runs_when_spawn_fails() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ended");
        let on_end = format!("touch {}", marker.display());
        let hooks = SessionHooks {
            on_start: "",
            on_end: &on_end,
        };

        let err = run_session(
            &host(),
            Path::new("/cfg"),
            "definitely-not-a-real-program-4242",
            &hooks,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 127);
        assert!(marker.exists());
    }
}
