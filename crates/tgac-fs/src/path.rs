//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Every constructor lexically cleans the path: `.` components and empty
/// components are dropped and `..` pops the previous component. Leading `..`
/// components of a relative path are kept, and `..` never climbs above the
/// root of an absolute path. Symlinks are not consulted.
///
/// Watch patterns and dependency paths are produced from this type, so the
/// strings handed to callers use `/` on every host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: clean(&path_str.replace('\\', "/")),
        }
    }

    /// The process working directory.
    pub fn current_dir() -> Result<Self> {
        std::env::current_dir()
            .map(Self::new)
            .map_err(|e| Error::io(".", e))
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment and clean the result.
    ///
    /// The segment is appended even when it looks absolute, matching how
    /// module sources are always interpreted relative to their directory.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self {
            inner: clean(&joined),
        }
    }

    /// Whether the path is rooted (`/x`, `//server/share`, or `C:/x`).
    pub fn is_absolute(&self) -> bool {
        !root_prefix(&self.inner).is_empty()
    }

    /// Resolve a relative path against `base`; absolute paths are returned as is.
    pub fn absolutize(&self, base: &NormalizedPath) -> Self {
        if self.is_absolute() {
            self.clone()
        } else {
            base.join(&self.inner)
        }
    }

    /// Resolve symlinks and make the path absolute through the filesystem.
    pub fn canonicalize(&self) -> Result<Self> {
        let native = self.to_native();
        dunce::canonicalize(&native)
            .map(Self::new)
            .map_err(|e| Error::io(native, e))
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let prefix = root_prefix(&self.inner);
        if self.inner.len() <= prefix.len() {
            return None;
        }
        match self.inner.rfind('/') {
            Some(idx) if idx + 1 > prefix.len() => Some(Self {
                inner: self.inner[..idx].to_string(),
            }),
            Some(_) => Some(Self {
                inner: prefix.to_string(),
            }),
            None => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let prefix = root_prefix(&self.inner);
        if self.inner.len() <= prefix.len() {
            return None;
        }
        self.inner.rsplit('/').next()
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 {
                None
            } else {
                Some(&name[idx + 1..])
            }
        })
    }

    /// Express this path relative to `base`, using `..` where needed.
    ///
    /// Returns `None` when the two paths do not share a root.
    pub fn relative_to(&self, base: &NormalizedPath) -> Option<String> {
        if root_prefix(&self.inner) != root_prefix(&base.inner) {
            return None;
        }
        let ours = components(&self.inner);
        let theirs = components(&base.inner);
        let common = ours
            .iter()
            .zip(theirs.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = Vec::new();
        parts.extend(std::iter::repeat("..").take(theirs.len() - common));
        parts.extend(ours[common..].iter().copied());
        if parts.is_empty() {
            Some(".".to_string())
        } else {
            Some(parts.join("/"))
        }
    }
}

/// The rooted prefix of an already slash-normalized path, or `""` if relative.
fn root_prefix(path: &str) -> &str {
    if path.starts_with("//") && !path.starts_with("///") {
        return "//";
    }
    if path.starts_with('/') {
        return "/";
    }
    let bytes = path.as_bytes();
    if bytes.len() >= 3 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' && bytes[2] == b'/'
    {
        return &path[..3];
    }
    ""
}

fn components(path: &str) -> Vec<&str> {
    path[root_prefix(path).len()..]
        .split('/')
        .filter(|c| !c.is_empty() && *c != ".")
        .collect()
}

fn clean(path: &str) -> String {
    let prefix = root_prefix(path);
    let mut parts: Vec<&str> = Vec::new();

    for component in path[prefix.len()..].split('/') {
        match component {
            "" | "." => {}
            ".." => match parts.last() {
                Some(last) if *last != ".." => {
                    parts.pop();
                }
                // `..` at the root of an absolute path stays at the root
                _ if !prefix.is_empty() => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        return if prefix.is_empty() {
            ".".to_string()
        } else {
            prefix.to_string()
        };
    }
    format!("{}{}", prefix, parts.join("/"))
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_keeps_leading_parent_components_of_relative_paths() {
        assert_eq!(clean("../../a/./b"), "../../a/b");
        assert_eq!(clean("a/../../b"), "../b");
    }

    #[test]
    fn clean_does_not_climb_above_root() {
        assert_eq!(clean("/../a"), "/a");
        assert_eq!(clean("C:/x/../../y"), "C:/y");
    }

    #[test]
    fn root_prefix_detects_network_and_drive_roots() {
        assert_eq!(root_prefix("//server/share"), "//");
        assert_eq!(root_prefix("D:/work"), "D:/");
        assert_eq!(root_prefix("work"), "");
    }
}
