use std::fmt;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use crate::cms_config::DuplicateScope;
use crate::config::BaseUrl;
use crate::tester::Tester;
use crate::types::CheckResult;

/// A set of checks sharing one tester and its counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    /// REST API: root, status list, status creation
    Backend,
    /// Static CMS admin: admin page, config.yml
    Frontend,
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Group::Backend => write!(f, "backend"),
            Group::Frontend => write!(f, "frontend"),
        }
    }
}

pub const ALL_GROUPS: &[Group] = &[Group::Backend, Group::Frontend];

/// Groups to run for a `--group` selection: all of them when none are named,
/// otherwise each named group once, in the order first given.
pub fn selected_groups(requested: &[Group]) -> Vec<Group> {
    if requested.is_empty() {
        return ALL_GROUPS.to_vec();
    }
    let mut groups = Vec::new();
    for &group in requested {
        if !groups.contains(&group) {
            groups.push(group);
        }
    }
    groups
}

#[derive(Debug)]
pub struct GroupReport {
    pub group: Group,
    pub run: usize,
    pub passed: usize,
    pub results: Vec<CheckResult>,
}

impl GroupReport {
    /// True when the tester counted every check as passed and no check was
    /// downgraded afterwards by body validation.
    pub fn all_passed(&self) -> bool {
        self.passed == self.run && self.results.iter().all(CheckResult::passed)
    }
}

#[derive(Debug)]
pub struct RunReport {
    pub base_url: BaseUrl,
    pub duplicate_scope: DuplicateScope,
    pub groups: Vec<GroupReport>,
}

impl RunReport {
    pub fn total_run(&self) -> usize {
        self.groups.iter().map(|g| g.run).sum()
    }

    pub fn total_passed(&self) -> usize {
        self.groups.iter().map(|g| g.passed).sum()
    }

    pub fn all_passed(&self) -> bool {
        self.groups.iter().all(GroupReport::all_passed)
    }

    pub fn exit_code(&self) -> i32 {
        if self.all_passed() { 0 } else { 1 }
    }
}

/// Run one group's checks in order on a fresh tester.
pub fn run_group(
    group: Group,
    base: &BaseUrl,
    scope: DuplicateScope,
    verbose: bool,
) -> Result<GroupReport> {
    let mut tester = Tester::new(base.clone(), verbose)?;

    let results = match group {
        Group::Backend => vec![
            tester.api_root(),
            tester.status_list(),
            tester.create_status(),
        ],
        Group::Frontend => vec![tester.admin_page(), tester.cms_config(scope)],
    };

    for r in &results {
        if r.passed() {
            println!("{} Response: {}", r.name, r.outcome.legacy_payload());
        }
    }

    Ok(GroupReport {
        group,
        run: tester.checks_run(),
        passed: tester.checks_passed(),
        results,
    })
}

/// Run the requested groups one after another, in the order given.
pub fn run_groups(
    base: &BaseUrl,
    groups: &[Group],
    scope: DuplicateScope,
    verbose: bool,
) -> Result<RunReport> {
    let mut reports = Vec::new();
    for &group in groups {
        eprintln!("\n=== Testing {group} at {} ===", base.as_str());
        reports.push(run_group(group, base, scope, verbose)?);
    }
    Ok(RunReport {
        base_url: base.clone(),
        duplicate_scope: scope,
        groups: reports,
    })
}
