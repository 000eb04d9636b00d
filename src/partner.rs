//! Partner-data parsing.
//!
//! The host attaches an opaque partner-data string to each playlist entry.
//! An interactive entry carries `"<marker>;<projectId>"`; the marker is
//! matched case-sensitively and the remainder of the string (which may
//! itself contain `;`) is the project identifier.

use interstitch_common::ProjectId;

/// Extract the project id from a partner-data string.
///
/// Returns `None` when the string is absent, carries no marker, or carries
/// an empty project id — in all of which cases the entry is not interactive.
pub fn parse_project_id(partner_data: Option<&str>, marker: &str) -> Option<ProjectId> {
    let data = partner_data?;
    let mut parts = data.split(';');

    if parts.next()? != marker {
        return None;
    }

    let project = parts.collect::<Vec<_>>().join(";");
    if project.is_empty() {
        return None;
    }

    Some(ProjectId::new(project))
}
