//! Fixed endpoint paths and server-side action names.

/// Base URL of the hosted YMM service.
pub const DEFAULT_SERVICE_DOMAIN: &str = "https://www.ymmshopify.capacitywebservices.com";

/// Logical endpoints. Every route except bulk assignment shares one script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    GetYmm,
    PostYmm,
    AssignYmm,
    GetProdYmm,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::GetYmm | Route::PostYmm | Route::GetProdYmm => "/ajax/manage_ymm.php",
            Route::AssignYmm => "/ajax/bulk_ymm.php",
        }
    }
}

/// Value of the `action` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Get,
    Save,
    Edit,
    Delete,
    DeleteAll,
    BulkAssign,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Get => "get",
            Action::Save => "save",
            Action::Edit => "edit",
            Action::Delete => "delete",
            Action::DeleteAll => "delete_all",
            Action::BulkAssign => "bulk_assign",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manage_routes_share_a_path() {
        assert_eq!(Route::GetYmm.path(), "/ajax/manage_ymm.php");
        assert_eq!(Route::PostYmm.path(), Route::GetYmm.path());
        assert_eq!(Route::GetProdYmm.path(), Route::GetYmm.path());
        assert_eq!(Route::AssignYmm.path(), "/ajax/bulk_ymm.php");
    }

    #[test]
    fn action_wire_names() {
        assert_eq!(Action::DeleteAll.as_str(), "delete_all");
        assert_eq!(Action::BulkAssign.as_str(), "bulk_assign");
        assert_eq!(Action::Edit.as_str(), "edit");
    }
}
