//! Syntax detection

use tgac_fs::NormalizedPath;

/// The two HCL syntaxes a configuration file can use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syntax {
    /// Native HCL (`terragrunt.hcl`, `main.tf`, `main.tofu`)
    Native,
    /// HCL JSON (`terragrunt.hcl.json`, `main.tf.json`, `main.tofu.json`)
    Json,
}

impl Syntax {
    /// Detect the syntax from the file name: a `.json` extension selects JSON.
    pub fn from_path(path: &NormalizedPath) -> Self {
        match path.extension() {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Native,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_extension_selects_json() {
        for name in ["terragrunt.hcl.json", "main.tf.json", "x.tofu.JSON"] {
            assert_eq!(Syntax::from_path(&NormalizedPath::new(name)), Syntax::Json, "{name}");
        }
    }

    #[test]
    fn everything_else_is_native() {
        for name in ["terragrunt.hcl", "main.tf", "main.tofu", "root.hcl", "Makefile"] {
            assert_eq!(Syntax::from_path(&NormalizedPath::new(name)), Syntax::Native, "{name}");
        }
    }
}
