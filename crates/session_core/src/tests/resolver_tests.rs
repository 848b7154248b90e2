use super::*;
use std::fs;

#[tokio::test]
async fn literal_input_is_returned_unchanged() {
    let command = CommandResolver::new()
        .resolve("ls -la /tmp")
        .await
        .expect("resolve");
    assert_eq!(command.resolved, "ls -la /tmp");
    assert_eq!(command.source, CommandSource::Literal);
    assert!(!command.is_file_indirection());
}

#[tokio::test]
async fn directive_substitutes_file_contents() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("cmd.txt");
    fs::write(&path, "echo hi").expect("write");

    let raw = format!("loadCommand({})", path.display());
    let command = CommandResolver::new().resolve(&raw).await.expect("resolve");

    assert_eq!(command.resolved, "echo hi");
    assert!(command.is_file_indirection());
    assert_eq!(command.source, CommandSource::File(path));
    assert_eq!(command.raw, raw);
}

#[tokio::test]
async fn relative_paths_use_base_dir() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("deploy.sh"), "uptime\n").expect("write");

    let command = CommandResolver::with_base_dir(dir.path())
        .resolve("loadCommand(deploy.sh)")
        .await
        .expect("resolve");

    assert_eq!(command.resolved, "uptime\n");
}

#[tokio::test]
async fn missing_file_is_a_read_error() {
    let err = CommandResolver::new()
        .resolve("loadCommand(/no/such/file)")
        .await
        .expect_err("should fail");
    assert!(matches!(err, CommandLoadError::Read { ref path, .. } if path == Path::new("/no/such/file")));
}

#[test]
fn directive_requires_closing_paren() {
    assert!(matches!(
        parse_directive("loadCommand(/tmp/x"),
        Err(CommandLoadError::MissingClosingParen)
    ));
    assert!(matches!(
        parse_directive("loadCommand(/tmp/x) "),
        Err(CommandLoadError::MissingClosingParen)
    ));
}

#[test]
fn directive_must_be_the_whole_input() {
    assert!(matches!(
        parse_directive("echo loadCommand(/tmp/x)"),
        Err(CommandLoadError::MisplacedDirective)
    ));
    assert!(matches!(
        parse_directive("loadCommand(loadCommand(/tmp/x))"),
        Err(CommandLoadError::MisplacedDirective)
    ));
}

#[test]
fn directive_needs_a_path() {
    assert!(matches!(
        parse_directive("loadCommand()"),
        Err(CommandLoadError::EmptyPath)
    ));
    assert!(matches!(
        parse_directive("loadCommand(  )"),
        Err(CommandLoadError::EmptyPath)
    ));
}

#[test]
fn extracted_path_drops_wrapper_tokens() {
    assert_eq!(
        parse_directive("loadCommand(/srv/cmds/restart)").expect("parse"),
        Some("/srv/cmds/restart")
    );
    assert_eq!(parse_directive("help").expect("parse"), None);
    assert_eq!(parse_directive("loadCommand").expect("parse"), None);
}
