use bollard::models::ContainerSummary;

/// Container identity as reported by the list API.
///
/// Fetched fresh on every (re)connection since a name may resolve to a new
/// id after the container is recreated.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ContainerDefinition {
    pub id: String,     // Full container ID 64-char hash
    pub names: Vec<String>, // With leading slash, as the API returns them
}

impl ContainerDefinition {
    pub fn new(id: impl Into<String>, names: &[&str]) -> Self {
        Self {
            id: id.into(),
            names: names.iter().map(|n| n.to_string()).collect(),
        }
    }

    pub fn has_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

impl From<ContainerSummary> for ContainerDefinition {
    fn from(s: ContainerSummary) -> Self {
        Self {
            id: s.id.unwrap_or_default(),
            names: s.names.unwrap_or_default(),
        }
    }
}

/// The API reports names with a leading `/`; configuration may omit it.
pub fn normalize_container_name(name: &str) -> String {
    if name.starts_with('/') {
        name.to_string()
    } else {
        format!("/{}", name)
    }
}

/// First container whose name set contains `name` (already normalized).
pub fn find_by_name<'a>(containers: &'a [ContainerDefinition], name: &str) -> Option<&'a ContainerDefinition> {
    containers.iter().find(|c| c.has_name(name))
}
