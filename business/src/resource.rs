use ustr::Ustr;

/// Backend-owned collections the console works with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Customers,
    Plans,
    AdditionalServices,
    Packages,
    Subscriptions,
    /// Binary billing documents, addressed by subscription id.
    Booklets,
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Customers,
        Resource::Plans,
        Resource::AdditionalServices,
        Resource::Packages,
        Resource::Subscriptions,
        Resource::Booklets,
    ];

    /// Collection path relative to the API base.
    pub fn path(&self) -> Ustr {
        Ustr::from(match self {
            Resource::Customers => "/customers",
            Resource::Plans => "/plans",
            // Backend spelling.
            Resource::AdditionalServices => "/adicional_services",
            Resource::Packages => "/packages",
            Resource::Subscriptions => "/subscriptions",
            Resource::Booklets => "/booklets",
        })
    }

    /// Key wrapping the record in a POST body: `{ "<key>": { ... } }`.
    pub fn wrapper_key(&self) -> Option<&'static str> {
        match self {
            Resource::Customers => Some("customer"),
            Resource::Plans => Some("plan"),
            Resource::AdditionalServices => Some("adicional_service"),
            Resource::Packages => Some("package"),
            Resource::Subscriptions => Some("subscription"),
            Resource::Booklets => None,
        }
    }

    /// `path` or `path/{id}`.
    pub fn member_path(&self, id: Option<i64>) -> String {
        match id {
            Some(id) => format!("{}/{id}", self.path()),
            None => self.path().to_string(),
        }
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path().trim_start_matches('/'))
    }
}
