/// Request-scoped organization/doctor filters, threaded explicitly into
/// every execution call instead of living in process-wide mutable state, so
/// concurrent sessions cannot interfere with each other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryScope {
    pub organization_ids: Vec<String>,
    pub doctor_ids: Vec<String>,
}

impl QueryScope {
    pub fn unscoped() -> Self {
        Self::default()
    }

    pub fn for_organizations(ids: Vec<String>) -> Self {
        Self {
            organization_ids: ids,
            doctor_ids: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.organization_ids.is_empty() && self.doctor_ids.is_empty()
    }

    pub(crate) fn organization_param(&self) -> Option<String> {
        (!self.organization_ids.is_empty()).then(|| self.organization_ids.join(","))
    }

    pub(crate) fn doctor_param(&self) -> Option<String> {
        (!self.doctor_ids.is_empty()).then(|| self.doctor_ids.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_scope_sends_no_params() {
        let scope = QueryScope::unscoped();
        assert!(scope.is_empty());
        assert_eq!(scope.organization_param(), None);
        assert_eq!(scope.doctor_param(), None);
    }

    #[test]
    fn params_are_comma_joined() {
        let scope = QueryScope {
            organization_ids: vec!["org-1".to_string(), "org-2".to_string()],
            doctor_ids: vec!["doc-9".to_string()],
        };
        assert_eq!(scope.organization_param().as_deref(), Some("org-1,org-2"));
        assert_eq!(scope.doctor_param().as_deref(), Some("doc-9"));
    }
}
