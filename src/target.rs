/// How a known template name maps to its destination name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rename {
    /// Replace the name outright.
    Literal(&'static str),
    /// Project name followed by this suffix.
    ProjectSuffix(&'static str),
}

/// Known template names, matched exactly and case-sensitively.
pub const RENAMES: &[(&str, Rename)] = &[
    ("readme.txt", Rename::Literal("ReadMe.txt")),
    ("sample.txt", Rename::Literal("Sample.txt")),
    ("main.idl", Rename::ProjectSuffix(".idl")),
    ("main.rc", Rename::ProjectSuffix(".rc")),
    ("main.def", Rename::ProjectSuffix(".def")),
    ("main.cpp", Rename::ProjectSuffix(".cpp")),
];

/// Map a template's logical name to the file name written into the project.
///
/// Names absent from [`RENAMES`] pass through unchanged.
pub fn resolve(logical_name: &str, project_name: &str) -> String {
    match RENAMES
        .iter()
        .find(|(name, _)| *name == logical_name)
        .map(|(_, rule)| rule)
    {
        Some(Rename::Literal(target)) => (*target).to_string(),
        Some(Rename::ProjectSuffix(suffix)) => format!("{project_name}{suffix}"),
        None => logical_name.to_string(),
    }
}
