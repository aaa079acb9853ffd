use cibctl_core::model::{ResourceIndex, ResourceKind};
use cibctl_core::render::{constraint_show, LocationView};
use cibctl_core::{apply, parse_constraint_args, Cib, CommandOptions, Document, Outcome, Result};

/// Split a command line on whitespace
#[allow(dead_code)]
pub fn args(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}

/// Configuration with plain primitives A-D, a group, a clone and a master
///
/// `web` lives in `web-clone`, `db` in `db-master`.
#[allow(dead_code)]
pub fn sample_cib() -> Cib {
    let mut resources = ResourceIndex::new();
    for id in ["A", "B", "C", "D"] {
        resources.insert(id, ResourceKind::Primitive, None);
    }
    resources.insert("G", ResourceKind::Group, None);
    resources.insert("g1", ResourceKind::Primitive, Some("G"));
    resources.insert("web-clone", ResourceKind::Clone, None);
    resources.insert("web", ResourceKind::Primitive, Some("web-clone"));
    resources.insert("db-master", ResourceKind::Master, None);
    resources.insert("db", ResourceKind::Primitive, Some("db-master"));
    let mut cib = Cib::new(resources, Document::new());
    cib.add_foreign_id("cib-bootstrap-options");
    cib
}

/// Parse and apply `constraint <line>` with default flags
#[allow(dead_code)]
pub fn run(cib: Cib, line: &str) -> Result<Outcome> {
    run_with(cib, line, CommandOptions::default())
}

#[allow(dead_code)]
pub fn run_with(cib: Cib, line: &str, opts: CommandOptions) -> Result<Outcome> {
    apply(cib, parse_constraint_args(&args(line))?, &opts)
}

/// Apply every line in order, panicking on the first failure
#[allow(dead_code)]
pub fn setup(lines: &[&str]) -> Cib {
    lines.iter().fold(sample_cib(), |cib, line| {
        run(cib, line)
            .unwrap_or_else(|e| panic!("setup '{}' failed: {}", line, e))
            .cib
    })
}

/// Full listing as printed by `constraint show`
#[allow(dead_code)]
pub fn show(cib: &Cib, full: bool) -> Vec<String> {
    constraint_show(&cib.constraints, LocationView::ByResource, &[], full)
}
