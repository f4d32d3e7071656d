//! Library integration tests.

use requisite::config::{build_requirement_set, parse_config};
use requisite::requirements::CommandContext;
use requisite::{Fulfillment, RequisiteError};
use std::path::Path;

#[test]
fn error_types_are_public() {
    let err = RequisiteError::CircularDependency {
        cycle: "a -> b -> a".into(),
    };
    assert!(err.to_string().contains("a -> b -> a"));
    assert!(err.is_configuration_error());
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> requisite::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use requisite::cli::{Cli, Commands};

    let cli = Cli::parse_from(["requisite", "list", "--json"]);
    match cli.command {
        Commands::List(args) => assert!(args.json),
        other => panic!("Expected List command, got {other:?}"),
    }
}

#[cfg(unix)]
#[test]
fn config_driven_resolution_records_history() {
    let config = parse_config(
        r#"
settings:
  env:
    GREETING: hello
requirements:
  - name: greet
    check: exit 1
    apply: test "$GREETING" = hello
"#,
        Path::new("requisite.yml"),
    )
    .unwrap();
    let set = build_requirement_set(&config).unwrap();

    let temp = tempfile::TempDir::new().unwrap();
    let mut ctx = CommandContext::new(temp.path()).with_env(config.settings.env.clone());
    let mut events = Vec::new();
    let outcome = set
        .fulfill_requirement("greet", &mut ctx, &mut |e: requisite::ProgressEvent<'_>| {
            events.push(e.to_record())
        })
        .unwrap();

    assert!(matches!(outcome, Fulfillment::Completed(_)));
    assert_eq!(ctx.history().len(), 2);
    assert_eq!(ctx.history()[1].exit_code, Some(0));
    assert_eq!(events.len(), 5);
}
