// ABOUTME: External cf CLI collaborator used by the CLI deployment strategy.
// ABOUTME: Wraps a command runner and file locator behind `invoke` and `oauth_token`.

mod locator;
mod process;

pub use locator::{FileLocator, PathLocator};
pub use process::{CapturedOutput, CommandLine, CommandOutcome, CommandRunner, ProcessRunner};

use std::path::Path;
use std::sync::Arc;

pub const CF_NOT_FOUND_MESSAGE: &str = "Unable to locate cf executable.";
const BEARER_PREFIX: &str = "bearer ";

/// Drives the `cf` executable.
#[derive(Clone)]
pub struct CfCli {
    runner: Arc<dyn CommandRunner>,
    locator: Arc<dyn FileLocator>,
}

impl std::fmt::Debug for CfCli {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CfCli").finish_non_exhaustive()
    }
}

impl CfCli {
    pub fn new(runner: Arc<dyn CommandRunner>, locator: Arc<dyn FileLocator>) -> Self {
        Self { runner, locator }
    }

    pub fn locator(&self) -> &dyn FileLocator {
        self.locator.as_ref()
    }

    /// Run `cf ARGS`, streaming its stdout to `on_stdout_line`.
    pub async fn invoke(
        &self,
        args: &[&str],
        working_dir: Option<&Path>,
        on_stdout_line: &mut (dyn for<'l> FnMut(&'l str) + Send),
    ) -> CommandOutcome {
        let Some(cf) = self.locator.cf_executable() else {
            return CommandOutcome::failure(CF_NOT_FOUND_MESSAGE);
        };

        let command = CommandLine::new(cf, args.iter().copied());
        let outcome = self.runner.run(&command, working_dir, on_stdout_line).await;
        if outcome.succeeded {
            return CommandOutcome::success();
        }

        if let Some(ref detail) = outcome.explanation {
            tracing::debug!(%command, %detail, "cf command failed");
        }
        CommandOutcome::failure(format!("Unable to execute `cf {}`.", args.join(" ")))
    }

    /// Current token from the CLI's own login, without the `bearer ` prefix.
    ///
    /// `None` if the CLI is missing, fails, or writes anything to stderr.
    pub async fn oauth_token(&self) -> Option<String> {
        let cf = self.locator.cf_executable()?;
        let command = CommandLine::new(cf, ["oauth-token"]);
        let output = self.runner.capture(&command, None).await;

        if !output.success || !output.stderr.trim().is_empty() {
            tracing::warn!(stderr = %output.stderr.trim(), "cf oauth-token failed");
            return None;
        }

        let token = output.stdout.trim();
        let token = token.strip_prefix(BEARER_PREFIX).unwrap_or(token);
        (!token.is_empty()).then(|| token.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::PathBuf;

    struct FixedLocator(Option<PathBuf>);

    impl FileLocator for FixedLocator {
        fn cf_executable(&self) -> Option<PathBuf> {
            self.0.clone()
        }

        fn directory_contains_files(&self, _dir: &Path) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct ScriptedRunner {
        succeed: bool,
        stdout: String,
        stderr: String,
        seen: Mutex<Vec<CommandLine>>,
    }

    #[async_trait]
    impl CommandRunner for ScriptedRunner {
        async fn run(
            &self,
            command: &CommandLine,
            _working_dir: Option<&Path>,
            on_stdout_line: &mut (dyn for<'l> FnMut(&'l str) + Send),
        ) -> CommandOutcome {
            self.seen.lock().push(command.clone());
            for line in self.stdout.lines() {
                on_stdout_line(line);
            }
            if self.succeed {
                CommandOutcome::success()
            } else {
                CommandOutcome::failure(self.stderr.clone())
            }
        }

        async fn capture(&self, command: &CommandLine, _working_dir: Option<&Path>) -> CapturedOutput {
            self.seen.lock().push(command.clone());
            CapturedOutput {
                success: self.succeed,
                stdout: self.stdout.clone(),
                stderr: self.stderr.clone(),
            }
        }
    }

    fn cli(runner: ScriptedRunner, cf: Option<&str>) -> (CfCli, Arc<ScriptedRunner>) {
        let runner = Arc::new(runner);
        let cli = CfCli::new(
            runner.clone(),
            Arc::new(FixedLocator(cf.map(PathBuf::from))),
        );
        (cli, runner)
    }

    #[tokio::test]
    async fn missing_executable_is_reported() {
        let (cli, runner) = cli(ScriptedRunner::default(), None);
        let outcome = cli.invoke(&["push", "web"], None, &mut |_: &str| {}).await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.explanation.as_deref(), Some(CF_NOT_FOUND_MESSAGE));
        assert!(runner.seen.lock().is_empty());
    }

    #[tokio::test]
    async fn failed_command_names_arguments() {
        let runner = ScriptedRunner {
            stderr: "FAILED".to_string(),
            ..Default::default()
        };
        let (cli, _) = cli(runner, Some("/usr/bin/cf"));
        let outcome = cli
            .invoke(&["target", "-o", "acme", "-s", "dev"], None, &mut |_: &str| {})
            .await;

        assert_eq!(
            outcome.explanation.as_deref(),
            Some("Unable to execute `cf target -o acme -s dev`.")
        );
    }

    #[tokio::test]
    async fn successful_command_streams_output() {
        let runner = ScriptedRunner {
            succeed: true,
            stdout: "Pushing app web...\nOK".to_string(),
            ..Default::default()
        };
        let (cli, runner) = cli(runner, Some("/usr/bin/cf"));
        let mut lines = Vec::new();
        let outcome = cli
            .invoke(&["push", "web"], None, &mut |l: &str| lines.push(l.to_string()))
            .await;

        assert!(outcome.succeeded);
        assert_eq!(lines, ["Pushing app web...", "OK"]);
        assert_eq!(runner.seen.lock()[0].args, ["push", "web"]);
    }

    #[tokio::test]
    async fn oauth_token_strips_bearer_prefix() {
        let runner = ScriptedRunner {
            succeed: true,
            stdout: "bearer eyJhbGciOi\n".to_string(),
            ..Default::default()
        };
        let (cli, _) = cli(runner, Some("/usr/bin/cf"));
        assert_eq!(cli.oauth_token().await.as_deref(), Some("eyJhbGciOi"));
    }

    #[tokio::test]
    async fn oauth_token_is_none_when_stderr_written() {
        let runner = ScriptedRunner {
            succeed: true,
            stdout: "bearer abc".to_string(),
            stderr: "Not logged in.".to_string(),
            ..Default::default()
        };
        let (cli, _) = cli(runner, Some("/usr/bin/cf"));
        assert!(cli.oauth_token().await.is_none());
    }
}
