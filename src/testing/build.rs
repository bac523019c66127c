//! Build step and executable resolution

use std::path::{Path, PathBuf};

use colored::Colorize;
use tokio::process::Command;

use crate::common::{Error, HarnessConfig, Result};

use super::exec::run_process;

/// Compile the target with the configured compiler
///
/// Any failure is fatal for the run: a missing compiler, a non-zero exit or
/// a compiler that outlives `compile_timeout_secs`.
pub async fn compile(config: &HarnessConfig, verbose: bool) -> Result<()> {
    let compiler = resolve_compiler(&config.compiler)?;
    let args = config.expanded_compiler_args();

    println!("\n{}", "Compiling...".cyan());
    if verbose {
        println!("  $ {} {}", compiler.display(), args.join(" ").dimmed());
    }
    tracing::info!(compiler = %compiler.display(), ?args, "Running build step");

    let mut command = Command::new(&compiler);
    command.args(&args).current_dir(&config.work_dir);

    let output = run_process(command, None, config.compile_timeout())
        .await
        .map_err(|e| match e {
            Error::Invocation(reason) => Error::CompilerSpawn {
                compiler: config.compiler.clone(),
                reason,
            },
            other => other,
        })?;

    if verbose {
        for line in output.stdout.lines().chain(output.stderr.lines()) {
            println!("  {}", line.dimmed());
        }
    }

    if output.timed_out {
        return Err(Error::CompileTimeout(config.compile_timeout_secs));
    }
    if output.exit_code != 0 {
        return Err(Error::Compile {
            code: Some(output.exit_code),
            stderr: output.stderr.trim_end().to_string(),
        });
    }

    println!("  {} Compilation succeeded", "✓".green());
    Ok(())
}

/// Find the compiler on PATH
///
/// A name with a path separator is taken relative to the current directory
/// and made absolute, since the compiler itself runs inside `work_dir`.
fn resolve_compiler(compiler: &str) -> Result<PathBuf> {
    let path = Path::new(compiler);
    if path.components().count() > 1 {
        return path
            .canonicalize()
            .map_err(|_| Error::CompilerNotFound(compiler.to_string()));
    }
    which::which(compiler).map_err(|_| Error::CompilerNotFound(compiler.to_string()))
}

/// Every path the executable may live at, in lookup order
pub fn executable_candidates(config: &HarnessConfig) -> Vec<PathBuf> {
    config
        .platform_suffix_candidates
        .iter()
        .map(|suffix| {
            config
                .work_dir
                .join(format!("{}{}", config.binary_name, suffix))
        })
        .collect()
}

/// Pick the first candidate that exists on disk
pub fn resolve_executable(config: &HarnessConfig) -> Result<PathBuf> {
    let candidates = executable_candidates(config);
    if let Some(found) = candidates.iter().find(|c| c.is_file()) {
        tracing::debug!(path = %found.display(), "Resolved executable");
        return Ok(found.clone());
    }

    let searched: Vec<String> = candidates
        .iter()
        .map(|c| c.display().to_string())
        .collect();
    Err(Error::executable_not_found(&searched))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_in(dir: &Path) -> HarnessConfig {
        HarnessConfig {
            work_dir: dir.to_path_buf(),
            binary_name: "prog".to_string(),
            platform_suffix_candidates: vec![String::new(), ".exe".to_string()],
            ..HarnessConfig::default()
        }
    }

    #[test]
    fn test_candidates_follow_suffix_order() {
        let config = config_in(Path::new("/work"));
        assert_eq!(
            executable_candidates(&config),
            vec![PathBuf::from("/work/prog"), PathBuf::from("/work/prog.exe")]
        );
    }

    #[test]
    fn test_resolve_falls_back_to_second_candidate() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("prog.exe"), "").unwrap();
        let config = config_in(dir.path());
        assert_eq!(resolve_executable(&config).unwrap(), dir.path().join("prog.exe"));
    }

    #[test]
    fn test_resolve_prefers_first_candidate() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("prog"), "").unwrap();
        std::fs::write(dir.path().join("prog.exe"), "").unwrap();
        let config = config_in(dir.path());
        assert_eq!(resolve_executable(&config).unwrap(), dir.path().join("prog"));
    }

    #[test]
    fn test_resolve_fails_when_nothing_exists() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let err = resolve_executable(&config).unwrap_err();
        match err {
            Error::ExecutableNotFound { searched } => {
                assert!(searched.contains("prog.exe"));
            }
            other => panic!("Expected ExecutableNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_compiler_is_fatal() {
        let config = HarnessConfig {
            compiler: "definitely-not-a-compiler-xyz".to_string(),
            ..HarnessConfig::default()
        };
        let err = compile(&config, false).await.unwrap_err();
        assert!(matches!(err, Error::CompilerNotFound(_)));
    }

    #[test]
    fn test_compiler_path_is_made_absolute() {
        let resolved = resolve_compiler("./Cargo.toml").unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("Cargo.toml"));

        assert!(matches!(
            resolve_compiler("./no/such/compiler"),
            Err(Error::CompilerNotFound(_))
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_unstartable_compiler_is_fatal_with_exit_two() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = dir.path().join("not-executable");
        std::fs::write(&compiler, "").unwrap();
        let config = HarnessConfig {
            work_dir: dir.path().to_path_buf(),
            compiler: compiler.display().to_string(),
            ..HarnessConfig::default()
        };
        let err = compile(&config, false).await.unwrap_err();
        assert!(matches!(err, Error::CompilerSpawn { .. }), "{err:?}");
        assert_eq!(err.exit_code(), 2);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_compiler_reports_exit_code_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarnessConfig {
            work_dir: dir.path().to_path_buf(),
            compiler: "sh".to_string(),
            compiler_args: vec!["-c".into(), "echo 'syntax error' >&2; exit 4".into()],
            ..HarnessConfig::default()
        };
        let err = compile(&config, false).await.unwrap_err();
        match err {
            Error::Compile { code, stderr } => {
                assert_eq!(code, Some(4));
                assert_eq!(stderr, "syntax error");
            }
            other => panic!("Expected Compile error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_compiler_times_out() {
        let config = HarnessConfig {
            compiler: "sh".to_string(),
            compiler_args: vec!["-c".into(), "exec sleep 30".into()],
            compile_timeout_secs: 1,
            ..HarnessConfig::default()
        };
        let err = compile(&config, false).await.unwrap_err();
        assert!(matches!(err, Error::CompileTimeout(1)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_compiler_runs_in_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarnessConfig {
            work_dir: dir.path().to_path_buf(),
            binary_name: "built".to_string(),
            compiler: "sh".to_string(),
            compiler_args: vec!["-c".into(), "touch {binary}".into()],
            ..HarnessConfig::default()
        };
        compile(&config, false).await.unwrap();
        assert!(dir.path().join("built").exists());
    }
}
