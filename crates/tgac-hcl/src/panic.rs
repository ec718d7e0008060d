//! Converts panics raised inside the HCL crates into errors.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tgac_fs::NormalizedPath;

use crate::{Error, Result};

/// Run `f`, turning a panic into [`Error::ParsePanic`] for `path`.
pub(crate) fn guard<T>(path: &NormalizedPath, f: impl FnOnce() -> Result<T>) -> Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let payload = payload_text(payload.as_ref());
            tracing::debug!(%path, %payload, "Recovered panic from HCL parser");
            Err(Error::ParsePanic {
                path: path.clone(),
                payload,
            })
        }
    }
}

fn payload_text(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_passes_through_results() {
        let path = NormalizedPath::new("/x/terragrunt.hcl");
        assert_eq!(guard(&path, || Ok(7)).unwrap(), 7);
    }

    #[test]
    fn guard_converts_panics() {
        let path = NormalizedPath::new("/x/terragrunt.hcl");
        let err = guard::<()>(&path, || panic!("cty conversion failed")).unwrap_err();
        match err {
            Error::ParsePanic { path: p, payload } => {
                assert_eq!(p, path);
                assert_eq!(payload, "cty conversion failed");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn guard_reports_formatted_payloads() {
        let path = NormalizedPath::new("/x/terragrunt.hcl");
        let err = guard::<()>(&path, || panic!("index {} out of range", 3)).unwrap_err();
        assert!(err.to_string().contains("index 3 out of range"));
    }
}
