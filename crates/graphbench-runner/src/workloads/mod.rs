//! Workload registry.
//!
//! Platforms plug in by implementing [`Workload`] and registering here.

pub mod reference;

use std::sync::Arc;

use graphbench_core::Workload;

/// Resolve a platform name to its workload implementation.
pub fn resolve(platform: &str) -> Option<Arc<dyn Workload>> {
    match platform {
        reference::PLATFORM => Some(Arc::new(reference::ReferenceWorkload::new())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_platform() {
        let workload = resolve("reference").unwrap();
        assert_eq!(workload.platform(), "reference");
    }

    #[test]
    fn test_resolve_unknown_platform() {
        assert!(resolve("no-such-platform").is_none());
    }
}
