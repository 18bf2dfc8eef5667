use std::path::{Component, Path, PathBuf};

/// Where a command's icon comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconRef {
    File(PathBuf),
    Resource(String),
}

impl IconRef {
    /// Absolute paths are files on disk, anything else names a host resource.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let path = Path::new(trimmed);
        if path.is_absolute() {
            Self::File(normalize_path(path))
        } else {
            Self::Resource(trimmed.to_string())
        }
    }

    /// String handed to the shell for rendering. Resources use the host `:` prefix.
    pub fn locator(&self) -> String {
        match self {
            Self::File(path) => path.to_string_lossy().into_owned(),
            Self::Resource(name) => format!(":{name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    pub name: String,
    pub icon: IconRef,
    pub invocation_target: String,
    normalized_name: String,
}

impl CommandEntry {
    pub fn new(name: &str, icon: &str, invocation_target: &str) -> Self {
        Self::from_owned(
            name.to_string(),
            IconRef::parse(icon),
            invocation_target.to_string(),
        )
    }

    pub fn from_owned(name: String, icon: IconRef, invocation_target: String) -> Self {
        let normalized_name = normalize_for_search(&name);
        Self {
            name,
            icon,
            invocation_target,
            normalized_name,
        }
    }

    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }
}

/// Case folding used by the filter. Unlike a fuzzy matcher, nothing is stripped:
/// spaces and punctuation must match literally.
pub fn normalize_for_search(input: &str) -> String {
    input.to_lowercase()
}

/// Label shown for a stored history name: first character upper-cased, rest untouched.
pub fn display_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_capitalizes_only_first_char() {
        assert_eq!(display_name("moveTool"), "MoveTool");
        assert_eq!(display_name("Move Tool"), "Move Tool");
        assert_eq!(display_name("éclat"), "Éclat");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn relative_icon_is_a_host_resource() {
        let icon = IconRef::parse("move_M.png");
        assert_eq!(icon, IconRef::Resource("move_M.png".to_string()));
        assert_eq!(icon.locator(), ":move_M.png");
    }

    #[cfg(unix)]
    #[test]
    fn absolute_icon_is_normalized() {
        let icon = IconRef::parse("/opt/icons/./tools/../move.png");
        assert_eq!(icon, IconRef::File(PathBuf::from("/opt/icons/move.png")));
    }

    #[test]
    fn normalized_name_keeps_spaces() {
        let entry = CommandEntry::new("Move Tool", "move.png", "moveTool");
        assert_eq!(entry.normalized_name(), "move tool");
    }
}
