use crate::helpers::cli::*;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_diff_prints_sql() {
    let helper = CliTestHelper::new();
    helper.write_file("before.yaml", BLOGS);
    helper.write_file("after.yaml", BLOGS_AND_POSTS);

    helper
        .command()
        .args(["diff", "--from", "before.yaml", "--to", "after.yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"CREATE TABLE "dbo"."Post" ("#))
        .stdout(predicate::str::contains(
            r#"ADD CONSTRAINT "FK_Post_Blog_BlogId" FOREIGN KEY ("BlogId")"#,
        ));
}

#[test]
fn test_diff_exit_code() {
    let helper = CliTestHelper::new();
    helper.write_file("before.yaml", BLOGS);
    helper.write_file("after.yaml", BLOGS_AND_POSTS);

    helper
        .command()
        .args(["diff", "--from", "before.yaml", "--to", "after.yaml", "--exit-code"])
        .assert()
        .code(1);

    helper
        .command()
        .args(["diff", "--from", "before.yaml", "--to", "before.yaml", "--exit-code"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-- No changes detected"));
}

#[test]
fn test_diff_formats() {
    let helper = CliTestHelper::new();
    helper.write_file("before.yaml", BLOGS);
    helper.write_file("after.yaml", BLOGS_AND_POSTS);

    helper
        .command()
        .args(["diff", "--from", "after.yaml", "--to", "before.yaml"])
        .args(["--format", "summary"])
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("- DropTable dbo.Post (destructive)"))
        .stdout(predicate::str::contains("2 operation(s), 1 destructive"));

    helper
        .command()
        .args(["diff", "--from", "before.yaml", "--to", "after.yaml"])
        .args(["--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""kind": "CreateTable""#));

    helper
        .command()
        .args(["diff", "--from", "before.yaml", "--to", "after.yaml"])
        .args(["--format", "code"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            r#"migration_builder.create_table("dbo.Post", |table| {"#,
        ));
}

#[test]
fn test_create_uses_dialect() {
    let helper = CliTestHelper::new();
    helper.write_file("models/blogs.yaml", BLOGS);

    helper
        .command()
        .args(["create", "--dialect", "sqlserver"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE TABLE [dbo].[Blog] ("));
}

#[test]
fn test_drop_script() {
    let helper = CliTestHelper::new();
    helper.write_file("models/blogs.yaml", BLOGS_AND_POSTS);

    helper
        .command()
        .arg("drop")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"DROP TABLE "dbo"."Blog";"#))
        .stdout(predicate::str::contains(r#"DROP TABLE "dbo"."Post";"#));
}

#[test]
fn test_table_filter() {
    let helper = CliTestHelper::new();
    helper.write_file("models/blogs.yaml", BLOGS_AND_POSTS);

    helper
        .command()
        .args(["create", "--exclude-tables", "Post"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"CREATE TABLE "dbo"."Blog" ("#))
        .stdout(predicate::str::contains("Post").not());
}

#[test]
fn test_migrate_new_writes_migration_and_snapshot() {
    let helper = CliTestHelper::new();
    helper.write_file("models/blogs.yaml", BLOGS);

    helper
        .command()
        .args(["migrate", "new", "initial"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created migration"));

    let files = helper.files_in("migrations");
    assert_eq!(files.len(), 2, "unexpected files {:?}", files);
    assert!(files.iter().any(|f| f == "model_snapshot.yaml"));
    let migration = files
        .iter()
        .find(|f| f.ends_with("_initial.rs"))
        .expect("migration file");
    let code = fs::read_to_string(helper.root().join("migrations").join(migration)).unwrap();
    assert!(code.contains(r#"migration_builder.create_table("dbo.Blog", |table| {"#));

    helper
        .command()
        .args(["migrate", "new", "again"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No changes detected"));
    assert_eq!(helper.files_in("migrations").len(), 2);

    helper.write_file("models/blogs.yaml", BLOGS_AND_POSTS);
    helper
        .command()
        .args(["migrate", "new", "add posts"])
        .assert()
        .success();
    let files = helper.files_in("migrations");
    assert_eq!(files.len(), 3);
    let migration = files
        .iter()
        .find(|f| f.ends_with("_add_posts.rs"))
        .expect("second migration file");
    let code = fs::read_to_string(helper.root().join("migrations").join(migration)).unwrap();
    assert!(code.contains(r#"migration_builder.create_table("dbo.Post", |table| {"#));
    assert!(!code.contains(r#"create_table("dbo.Blog""#));
}

#[test]
fn test_config_file_is_used() {
    let helper = CliTestHelper::new();
    helper.write_file(
        "modeldiff.yaml",
        "dialect: sqlserver\ndirectories:\n  models: schema\n",
    );
    helper.write_file("schema/blogs.yaml", BLOGS);

    helper
        .command()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("dialect: sqlserver"));

    helper
        .command()
        .arg("create")
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE TABLE [dbo].[Blog] ("));
}

#[test]
fn test_missing_model_fails() {
    let helper = CliTestHelper::new();

    helper
        .command()
        .args(["diff", "--from", "nope.yaml", "--to", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Model path does not exist"));
}
