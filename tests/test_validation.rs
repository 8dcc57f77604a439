//! Hostile-input tests for the validation layer.
//!
//! Everything here goes through the crate's public surface exactly the way
//! command code uses it: branch names through `validate_branch_name` and the
//! `Git` methods, argument vectors through `validate_git_arg`, and generated
//! names through `sanitize_branch_name`. The invariant under test is that no
//! attacker-controlled string ever reaches a `git` subprocess.

use git_branch_delete::git::{
    sanitize_branch_name, validate_branch_name, validate_git_arg, MAX_BRANCH_NAME_LENGTH,
};
use git_branch_delete::{Git, GitError};
use std::process::Command;
use tempfile::TempDir;

fn init_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let status = Command::new("git")
        .args(["init", "--quiet"])
        .current_dir(dir.path())
        .status()
        .unwrap();
    assert!(status.success());
    dir
}

#[test]
fn test_command_injection_names_rejected() {
    let names = vec![
        // Shell metacharacters
        "branch;reboot",
        "branch;rm -rf /",
        "branch&&curl evil.example.com",
        "branch||true",
        "branch|tee /tmp/pwned",
        "branch`id`",
        "branch$(whoami)",
        "branch$PATH",
        // Redirection and quoting
        "branch>overwrite",
        "branch<input",
        "branch'single",
        "branch\"double",
        "back\\slash",
        // Embedded line breaks smuggle extra arguments past line parsers
        "branch\ndelete-everything",
        "branch\r\nsecond-line",
        "branch\tcolumn",
    ];
    for name in names {
        assert!(
            validate_branch_name(name).is_err(),
            "injection name was accepted: {}",
            name.escape_default()
        );
    }
}

#[test]
fn test_path_traversal_names_rejected() {
    let names = vec![
        "../../../etc/passwd",
        "..\\windows\\system32",
        "branch/../../hooks/pre-commit",
        "refs/../../config",
        ".git/config",
        ".hidden",
        "nested/.git/HEAD",
    ];
    for name in names {
        assert!(
            validate_branch_name(name).is_err(),
            "traversal name was accepted: {name}"
        );
    }
}

#[test]
fn test_option_like_names_rejected() {
    // A name starting with a dash would be parsed by git as a flag.
    let names = vec!["-D", "-d", "--delete", "--force", "-rf", "-", "--"];
    for name in names {
        assert!(
            validate_branch_name(name).is_err(),
            "option-like name was accepted: {name}"
        );
    }
}

#[test]
fn test_control_and_null_names_rejected() {
    let names = vec![
        "null\0byte",
        "\0",
        "bell\x07ring",
        "esc\x1b[31mred",
        "vertical\x0btab",
        "form\x0cfeed",
    ];
    for name in names {
        assert!(
            validate_branch_name(name).is_err(),
            "control-character name was accepted: {}",
            name.escape_default()
        );
    }
}

#[test]
fn test_unicode_confusable_names_rejected() {
    let names = vec![
        // Non-ASCII letters
        "café",
        "ブランチ",
        // Fullwidth lookalike of "main"
        "ｍａｉｎ",
        // Zero-width space, invisible in most terminals
        "main\u{200B}",
        // Bidi override reorders how the name renders
        "main\u{202E}cod.sh",
        // Greek capital mu lookalike of an ASCII M
        "Μain",
        // Combining accent
        "mai\u{0301}n",
    ];
    for name in names {
        assert!(
            validate_branch_name(name).is_err(),
            "confusable name was accepted: {}",
            name.escape_default()
        );
    }
}

#[test]
fn test_git_reserved_sequences_rejected() {
    let names = vec![
        "branch..other",
        "HEAD@{1}",
        "branch@{upstream}",
        "branch.lock",
        "a//b",
        "trailing/",
        "trailing.",
    ];
    for name in names {
        assert!(
            validate_branch_name(name).is_err(),
            "reserved sequence was accepted: {name}"
        );
    }
}

#[test]
fn test_oversized_names_rejected_without_panic() {
    let long_valid_chars = "a".repeat(10_000);
    assert!(validate_branch_name(&long_valid_chars).is_err());

    let long_hostile = ";".repeat(100_000);
    assert!(validate_branch_name(&long_hostile).is_err());

    let exact = "a".repeat(MAX_BRANCH_NAME_LENGTH);
    assert!(validate_branch_name(&exact).is_ok());

    let one_over = "a".repeat(MAX_BRANCH_NAME_LENGTH + 1);
    assert!(validate_branch_name(&one_over).is_err());
}

#[test]
fn test_legitimate_names_accepted() {
    let names = vec![
        "main",
        "develop",
        "feature/user-auth",
        "bugfix/issue-42",
        "release/v2",
        "hotfix_2024",
        "user/nested/deep/branch",
        "JIRA-1234-fix-login",
        "a",
        "x1",
    ];
    for name in names {
        assert!(
            validate_branch_name(name).is_ok(),
            "legitimate name was rejected: {name}"
        );
    }
}

/// Hostile names must be refused by validation, never by a failing git call.
/// `InvalidName` is returned before any subprocess is spawned; seeing any
/// other variant would mean the name reached git.
#[test]
fn test_hostile_names_never_reach_git() {
    let repo = init_repo();
    let git = Git::open(repo.path()).unwrap();

    let hostile = [
        "branch;id",
        "../../etc/passwd",
        "--delete",
        "a b",
        "x\0y",
        "branch`touch /tmp/pwned`",
    ];
    for name in hostile {
        for (force, remote) in [(false, false), (true, false), (false, true), (true, true)] {
            match git.delete_branch(name, force, remote) {
                Err(GitError::InvalidName { .. }) => {}
                other => panic!(
                    "hostile name {} (force={force}, remote={remote}) got past validation: {other:?}",
                    name.escape_default()
                ),
            }
        }
    }

    assert!(matches!(
        git.create_branch("new;branch"),
        Err(GitError::InvalidName { .. })
    ));
    assert!(matches!(
        git.checkout("../elsewhere"),
        Err(GitError::InvalidName { .. })
    ));
    assert!(matches!(
        git.push_branch("--mirror"),
        Err(GitError::InvalidName { .. })
    ));
    assert!(matches!(
        git.local_branch_exists("a b"),
        Err(GitError::InvalidName { .. })
    ));
}

#[test]
fn test_argument_allow_list_blocks_option_injection() {
    let hostile = vec![
        "--upload-pack=touch /tmp/pwned",
        "--receive-pack=/tmp/evil",
        "--exec=sh",
        "--force-with-lease=main",
        "-c",
        "core.sshCommand",
        "branch;id",
        "refs/heads/bad name",
    ];
    for arg in hostile {
        assert!(
            matches!(validate_git_arg(arg), Err(GitError::InvalidArgument(_))),
            "hostile argument was allowed: {arg}"
        );
    }

    let allowed = vec![
        "branch",
        "push",
        "for-each-ref",
        "--delete",
        "--merged",
        "--quiet",
        "origin",
        "HEAD",
        "refs/heads/feature/login",
        "refs/remotes/origin/main",
        "--format=%(refname:short)",
        "branch-delete.protected",
        "feature/login",
    ];
    for arg in allowed {
        assert!(
            validate_git_arg(arg).is_ok(),
            "legitimate argument was refused: {arg}"
        );
    }
}

#[test]
fn test_sanitized_hostile_input_is_safe() {
    let inputs = vec![
        "; rm -rf /",
        "../../etc/passwd",
        "feature branch!",
        "🚀 launch",
        "--flag--",
        "@{upstream}",
        "()`$",
        "\0\0\0",
    ];
    for input in inputs {
        let sanitized = sanitize_branch_name(input);
        if !sanitized.is_empty() {
            assert!(
                validate_branch_name(&sanitized).is_ok(),
                "sanitize({}) produced invalid name: {sanitized}",
                input.escape_default()
            );
        }
        for forbidden in [';', '&', '|', '`', '$', '(', ')', '\\', '\0', ' '] {
            assert!(
                !sanitized.contains(forbidden),
                "sanitize({}) kept {forbidden:?}",
                input.escape_default()
            );
        }
    }
}
