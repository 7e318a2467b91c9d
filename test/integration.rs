// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{boil, RepoFixture, RepoKind};

use anyhow::Result;
use git2::Repository;
use indoc::indoc;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use sealed_test::prelude::*;
use std::{
    env::current_dir,
    fs::{read_to_string, write},
    path::Path,
};

/// Boilerplate with one commit, empty bare origin, and settings pointing at
/// the boilerplate's main branch.
fn seed() -> Result<RepoFixture> {
    let template = RepoFixture::new("template", RepoKind::Normal)?;
    template.stage_and_commit("README.md", "# Boilerplate\n")?;
    RepoFixture::new("origin.git", RepoKind::Bare)?;

    let settings = serde_json::json!({
        "boilerplate_repo": current_dir()?.join("template"),
        "boilerplate_branch": "main",
    });
    write(".boil.json", settings.to_string())?;

    Ok(template)
}

fn origin_url() -> Result<String> {
    Ok(current_dir()?.join("origin.git").to_string_lossy().into_owned())
}

#[sealed_test]
fn help_shows_settings_example() -> Result<()> {
    boil()?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("~/.boil.json"));

    Ok(())
}

#[sealed_test]
fn unknown_or_missing_command_fails() -> Result<()> {
    boil()?.assert().code(1);
    boil()?.arg("frobnicate").assert().code(1);

    Ok(())
}

#[sealed_test]
fn new_requires_project_name_and_origin() -> Result<()> {
    seed()?;

    boil()?
        .args(["new", &format!("--origin={}", origin_url()?)])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("boil new requires a <project-name>"));

    boil()?
        .args(["new", "app"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no origin repo provided"));
    assert!(!Path::new("app").exists());

    Ok(())
}

#[sealed_test]
fn update_rejects_unknown_strategy() -> Result<()> {
    boil()?
        .args(["update", "--strategy=squash"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid strategy \"squash\""));

    Ok(())
}

#[sealed_test]
fn commands_outside_repository_fail() -> Result<()> {
    boil()?
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is not a git repository"));

    Ok(())
}

#[sealed_test]
fn new_seeds_project_and_pushes_to_origin() -> Result<()> {
    seed()?;

    boil()?
        .args(["new", "app", &format!("--origin={}", origin_url()?)])
        .assert()
        .success();

    assert!(Path::new("app/README.md").exists());
    let app = RepoFixture::open("app")?;
    assert_eq!(app.remote_url("origin")?, Some(origin_url()?));
    assert_eq!(
        app.remote_url("upstream")?,
        Some(current_dir()?.join("template").to_string_lossy().into_owned())
    );

    let origin = Repository::open_bare("origin.git")?;
    assert!(origin.find_reference("refs/heads/main").is_ok());

    Ok(())
}

#[sealed_test]
fn new_accepts_flags_before_project_name() -> Result<()> {
    seed()?;

    boil()?
        .args([
            "new",
            &format!("--origin={}", origin_url()?),
            &format!("--boilerplate={}", current_dir()?.join("template").display()),
            "app",
        ])
        .assert()
        .success();
    assert!(Path::new("app/README.md").exists());
    assert_eq!(RepoFixture::open("app")?.remote_url("origin")?, Some(origin_url()?));

    Ok(())
}

#[sealed_test]
fn status_then_update_pulls_boilerplate_changes() -> Result<()> {
    let template = seed()?;
    boil()?
        .args(["new", "app", &format!("--origin={}", origin_url()?)])
        .assert()
        .success();

    boil()?
        .arg("status")
        .current_dir("app")
        .assert()
        .success()
        .stdout(predicate::str::contains("Current branch:      main"))
        .stdout(predicate::str::contains("Up to date with upstream/main"));

    template.stage_and_commit("CHANGELOG.md", "## v1.1.0\n")?;

    boil()?
        .arg("status")
        .current_dir("app")
        .assert()
        .success()
        .stdout(predicate::str::contains("Your branch is 1 commits behind upstream/main"));

    boil()?
        .arg("update")
        .current_dir("app")
        .assert()
        .success()
        .stdout(predicate::str::contains("update completed successfully"));
    assert_eq!(read_to_string("app/CHANGELOG.md")?, "## v1.1.0\n");

    Ok(())
}

#[sealed_test]
fn diff_lists_project_changes() -> Result<()> {
    seed()?;
    boil()?
        .args(["new", "app", &format!("--origin={}", origin_url()?)])
        .assert()
        .success();

    boil()?
        .arg("diff")
        .current_dir("app")
        .assert()
        .success()
        .stdout(predicate::str::contains("No files differ from upstream/main."));

    RepoFixture::open("app")?.stage_and_commit("NOTES.md", "local notes\n")?;

    boil()?
        .arg("diff")
        .current_dir("app")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Differences between upstream/main and your current HEAD:",
        ))
        .stdout(predicate::str::contains("  [Added]    NOTES.md"));

    Ok(())
}

#[sealed_test]
fn diff_against_missing_ref_lists_nothing() -> Result<()> {
    seed()?;
    boil()?
        .args(["new", "app", &format!("--origin={}", origin_url()?)])
        .assert()
        .success();

    boil()?
        .args(["diff", "--ref=nope"])
        .current_dir("app")
        .assert()
        .success()
        .stdout(predicate::str::contains("(could not diff against upstream/nope)"))
        .stdout(predicate::str::contains("fatal:").not());

    Ok(())
}

#[sealed_test]
fn link_twice_keeps_first_upstream() -> Result<()> {
    let project = RepoFixture::new("project", RepoKind::Normal)?;

    boil()?
        .args(["link", "--boilerplate=/srv/templates/base.git"])
        .current_dir(project.path())
        .assert()
        .success();
    boil()?
        .args(["link", "--boilerplate=/srv/templates/other.git"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to do"));

    let project = RepoFixture::open("project")?;
    assert_eq!(project.remote_names()?, vec!["upstream"]);
    assert_eq!(
        project.remote_url("upstream")?,
        Some("/srv/templates/base.git".into())
    );

    Ok(())
}

#[sealed_test]
fn lock_declares_each_path_once() -> Result<()> {
    let project = RepoFixture::new("project", RepoKind::Normal)?;
    write("project/.gitattributes", "* text=auto")?;

    boil()?
        .args(["lock", "README.md", "config/app.php", "README.md"])
        .current_dir(project.path())
        .assert()
        .success();
    boil()?
        .args(["lock", "README.md"])
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("README.md already locked"));

    let expect = indoc! {"
        * text=auto
        README.md merge=ours
        config/app.php merge=ours
    "};
    assert_eq!(read_to_string("project/.gitattributes")?, expect);
    assert_eq!(
        RepoFixture::open("project")?.config_value("merge.ours.driver")?,
        "true"
    );

    Ok(())
}

#[sealed_test]
fn lock_from_subdirectory_declares_at_top_level() -> Result<()> {
    let project = RepoFixture::new("project", RepoKind::Normal)?;
    std::fs::create_dir_all(project.path().join("src"))?;

    boil()?
        .args(["lock", "main.rs", "../README.md"])
        .current_dir(project.path().join("src"))
        .assert()
        .success();

    let expect = indoc! {"
        src/main.rs merge=ours
        README.md merge=ours
    "};
    assert_eq!(read_to_string("project/.gitattributes")?, expect);
    assert!(!Path::new("project/src/.gitattributes").exists());

    Ok(())
}

#[sealed_test]
fn lock_summary_survives_quiet_logging() -> Result<()> {
    let project = RepoFixture::new("project", RepoKind::Normal)?;

    boil()?
        .args(["lock", "composer.json"])
        .env("RUST_LOG", "warn")
        .current_dir(project.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("locked composer.json"));

    Ok(())
}

#[sealed_test]
fn lock_without_paths_prints_usage() -> Result<()> {
    boil()?
        .arg("lock")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage: boil lock <path>..."));
    assert!(!Path::new(".gitattributes").exists());

    Ok(())
}
