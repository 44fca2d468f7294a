// tests/process_spawn.rs
//
// End-to-end tests against real processes. They rely on a POSIX `sh`.
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, sh};

use std::error::Error;

use procrun::invoke::FaultKind;
use procrun::{spawn, InvokeError, InvokeOptions, StdioMode, NO_ARGS};
use procrun_test_utils::RecordingLogger;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn returns_stdout() -> TestResult {
    init_tracing();

    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let logger = RecordingLogger::new();
    let options = InvokeOptions::new().logger(logger.hook());

    let out = spawn("ls", [format!("{manifest_dir}/tests")], &options).await?;

    assert!(out.contains("process_spawn.rs"), "unexpected ls output: {out}");
    assert_eq!(
        logger.messages(),
        vec![format!("Executing command ls {manifest_dir}/tests")]
    );
    Ok(())
}

#[tokio::test]
async fn does_not_split_utf8_characters_across_chunks() -> TestResult {
    init_tracing();

    let out = spawn(
        "sh",
        sh(r"printf '\345\245'; sleep 0.1; printf '\275'"),
        &InvokeOptions::new(),
    )
    .await?;

    assert_eq!(out, "好");
    Ok(())
}

#[tokio::test]
async fn returns_empty_string_if_stdio_is_ignored() -> TestResult {
    let options = InvokeOptions::new().stdio(StdioMode::Ignore);
    let out = spawn("sh", sh("echo visible; echo also >&2"), &options).await?;
    assert_eq!(out, "");
    Ok(())
}

#[tokio::test]
async fn can_return_the_stderr() -> TestResult {
    let options = InvokeOptions::new().return_stderr(true);
    let out = spawn("sh", sh("echo 'I went there' >&2"), &options).await?;
    assert_eq!(out.trim(), "I went there");
    Ok(())
}

#[tokio::test]
async fn throws_when_it_cannot_find_an_executable() {
    init_tracing();

    let err = spawn("does-not-exist", NO_ARGS, &InvokeOptions::new())
        .await
        .unwrap_err();

    assert!(err.message().starts_with("Error executing command"));
    match err {
        InvokeError::Launch(e) => {
            assert_eq!(e.fault, FaultKind::Spawn);
            assert_eq!(e.original_error.code.as_deref(), Some("ENOENT"));
            assert_eq!(e.original_error.syscall, "spawn does-not-exist");
            assert_eq!(e.original_error.path.as_deref(), Some("does-not-exist"));
            assert_eq!(e.original_error.spawnargs, vec!["does-not-exist".to_string()]);
            assert_eq!(
                e.message,
                "Error executing command (does-not-exist):\nspawn does-not-exist ENOENT"
            );
        }
        other => panic!("expected Launch error, got {:?}", other),
    }
}

#[tokio::test]
async fn nonzero_exit_carries_code_and_output() {
    let err = spawn(
        "sh",
        sh("echo partial; echo broken >&2; exit 3"),
        &InvokeOptions::new(),
    )
    .await
    .unwrap_err();

    match err {
        InvokeError::ExitCode(e) => {
            assert_eq!(e.code, 3);
            assert_eq!(e.cmd, "sh");
            assert_eq!(e.stdout, "partial\n");
            assert_eq!(e.stderr, "broken\n");
            assert!(
                e.message
                    .starts_with("Command failed with a non-zero return code (3):\nsh -c echo partial"),
                "unexpected message: {}",
                e.message
            );
            assert!(e.message.ends_with("partial\n\nbroken"));
        }
        other => panic!("expected ExitCode error, got {:?}", other),
    }
}

#[tokio::test]
async fn throws_when_terminated_via_a_signal() {
    init_tracing();

    let err = spawn("sh", sh("kill -KILL $$"), &InvokeOptions::new())
        .await
        .unwrap_err();

    assert!(err.message().starts_with("Command terminated via a signal (SIGKILL):"));
    match err {
        InvokeError::ExitSignal(e) => assert_eq!(e.signal, "SIGKILL"),
        other => panic!("expected ExitSignal error, got {:?}", other),
    }
}

#[tokio::test]
async fn update_error_callback_modifies_the_exception() {
    let options = InvokeOptions::new().update_error(|err, _| {
        err.message = Some("I am an error".to_string());
    });

    let err = spawn("does-not-exist", NO_ARGS, &options).await.unwrap_err();

    assert_eq!(err.message().matches("I am an error").count(), 1);
}

#[tokio::test]
async fn update_error_callback_removes_the_message() {
    let options = InvokeOptions::new().update_error(|err, _| {
        err.message = None;
    });

    let err = spawn("does-not-exist", NO_ARGS, &options).await.unwrap_err();

    assert!(
        err.message()
            .starts_with("Error executing command (does-not-exist):\nError"),
        "unexpected message: {}",
        err.message()
    );
}

#[tokio::test]
async fn respects_the_format_output_callback() -> TestResult {
    let options = InvokeOptions::new()
        .return_stderr(true)
        .format_output(|stdout, _stderr| redact(stdout));

    let out = spawn(
        "sh",
        sh("echo 'authToken=Tm9zeSBsaXR0bGUgZGV2LCBhcmVuJ3QgeW91PyE='"),
        &options,
    )
    .await?;

    assert_eq!(out.trim(), "authToken=REDACTED");
    Ok(())
}

#[tokio::test]
async fn custom_log_formatter_does_not_break_anything() -> TestResult {
    let logger = RecordingLogger::new();
    let options = InvokeOptions::new()
        .return_stderr(true)
        .logger(logger.hook())
        .stringify_command(|cmd, args| {
            let mut parts = vec![format!("{cmd:?}")];
            parts.extend(args.iter().map(|a| format!("{:?}", redact(a))));
            format!("[{}]", parts.join(", "))
        })
        .format_output(|stdout, _stderr| redact(stdout));

    let out = spawn("sh", sh("echo authToken=SSBzYXcgdGhhdA=="), &options).await?;

    assert_eq!(out.trim(), "authToken=REDACTED");
    let messages = logger.messages();
    assert_eq!(messages.len(), 1);
    assert!(!messages[0].contains("SSBzYXcgdGhhdA=="));
    Ok(())
}

#[tokio::test]
async fn concurrent_invocations_do_not_share_output() -> TestResult {
    let options = InvokeOptions::new().format_output(|stdout, stderr| format!("{stdout}|{stderr}"));

    let (first, second) = tokio::join!(
        spawn("sh", sh("echo one; sleep 0.05; echo err-one >&2"), &options),
        spawn("sh", sh("echo two; echo err-two >&2; sleep 0.05"), &options),
    );

    assert_eq!(first?, "one\n|err-one\n");
    assert_eq!(second?, "two\n|err-two\n");
    Ok(())
}

#[tokio::test]
async fn passes_cwd_and_env_through() -> TestResult {
    let dir = tempfile::tempdir()?;
    let options = InvokeOptions::new()
        .cwd(dir.path())
        .env("PROCRUN_TEST_VALUE", "forty-two");

    let out = spawn("sh", sh("pwd; echo $PROCRUN_TEST_VALUE"), &options).await?;
    let mut lines = out.lines();

    let pwd = std::fs::canonicalize(lines.next().unwrap_or_default())?;
    assert_eq!(pwd, std::fs::canonicalize(dir.path())?);
    assert_eq!(lines.next(), Some("forty-two"));
    Ok(())
}

#[tokio::test]
async fn env_clear_drops_inherited_variables() -> TestResult {
    let options = InvokeOptions::new()
        .env_clear(true)
        .env("ONLY_ME", "1");

    let out = spawn("/bin/sh", sh("echo \"${HOME:-unset} $ONLY_ME\""), &options).await?;
    assert_eq!(out, "unset 1\n");
    Ok(())
}

fn redact(input: &str) -> String {
    regex::Regex::new(r"authToken=\S*")
        .map(|re| re.replace(input, "authToken=REDACTED").into_owned())
        .unwrap_or_else(|_| input.to_string())
}
