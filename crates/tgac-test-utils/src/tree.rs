//! [`TestTree`] builder for Terragrunt repository layouts on disk.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use tgac_fs::{ConfigFamily, NormalizedPath};

/// A temporary directory with helpers to lay out config files and modules.
///
/// # Example
///
/// ```rust,no_run
/// use tgac_test_utils::TestTree;
///
/// let tree = TestTree::new();
/// tree.write("root.hcl", "locals {\n  atlantis_workflow = \"default\"\n}\n");
/// let child = tree.write(
///     "live/app/terragrunt.hcl",
///     "include \"root\" {\n  path = find_in_parent_folders(\"root.hcl\")\n}\n",
/// );
/// assert!(child.is_file());
/// ```
pub struct TestTree {
    temp_dir: TempDir,
    root: NormalizedPath,
}

impl Default for TestTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTree {
    /// Create an empty temporary directory.
    ///
    /// The root is canonicalized so paths compare equal to the ones the
    /// resolver produces on platforms where the temp dir is a symlink.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = NormalizedPath::new(temp_dir.path())
            .canonicalize()
            .expect("TestTree::new: failed to canonicalize temp dir");
        Self { temp_dir, root }
    }

    /// Root of the tree as a native path.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Root of the tree as a normalized path.
    pub fn root_path(&self) -> &NormalizedPath {
        &self.root
    }

    /// The normalized path of `relative` inside the tree.
    pub fn path(&self, relative: &str) -> NormalizedPath {
        self.root.join(relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> NormalizedPath {
        let path = self.path(relative);
        let native = path.to_native();
        if let Some(parent) = native.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&native, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {e}", native.display()));
        path
    }

    /// Create the directory `relative` (and its parents).
    pub fn mkdir(&self, relative: &str) -> NormalizedPath {
        let path = self.path(relative);
        fs::create_dir_all(path.to_native()).unwrap();
        path
    }

    /// Write a module directory holding a single `main.tf` with `content`.
    pub fn module(&self, relative: &str, content: &str) -> NormalizedPath {
        self.write(&format!("{relative}/main.tf"), content);
        self.path(relative)
    }

    /// Watch pattern strings the walker produces for `relative`.
    pub fn patterns(&self, relative: &str) -> [String; 2] {
        ConfigFamily::watch_patterns(&self.path(relative))
    }

    /// Assert that `relative` exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_exists(&self, relative: &str) {
        let path = self.path(relative);
        assert!(path.exists(), "Expected path to exist: {path}");
    }
}
