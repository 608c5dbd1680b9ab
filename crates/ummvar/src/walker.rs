//! Group hierarchy traversal.

use netcdf_parser::{Group, Variable};

/// A variable together with the groups its rules may consult.
#[derive(Debug, Clone, Copy)]
pub struct VariableContext<'a> {
    pub variable: &'a Variable,
    /// The group that owns the variable.
    pub group: &'a Group,
    /// The owning group's parent, `None` for root-level variables.
    pub parent: Option<&'a Group>,
}

impl<'a> VariableContext<'a> {
    /// The group geospatial bounds are read from: the owning group's parent
    /// when it has one, otherwise the owning group itself.
    pub fn bounds_group(&self) -> &'a Group {
        self.parent.unwrap_or(self.group)
    }
}

/// Flatten the hierarchy under `root` into conversion order.
///
/// Child groups are visited depth-first in source order before a group's
/// own variables, so variables of deeper groups come first. Every group is
/// visited once and nothing is deduplicated.
pub fn walk(root: &Group) -> Vec<VariableContext<'_>> {
    let mut out = Vec::with_capacity(root.variable_count());
    walk_group(root, None, &mut out);
    out
}

fn walk_group<'a>(group: &'a Group, parent: Option<&'a Group>, out: &mut Vec<VariableContext<'a>>) {
    for child in &group.groups {
        walk_group(child, Some(group), out);
    }
    out.extend(group.variables.iter().map(|variable| VariableContext {
        variable,
        group,
        parent,
    }));
}
