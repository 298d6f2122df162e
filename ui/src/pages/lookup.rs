use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Names of related records by id, readable from column formatters.
///
/// Pages refresh it from their related clients every frame the clients change.
#[derive(Debug, Clone, Default)]
pub struct NameLookup {
    names: Arc<RwLock<HashMap<i64, String>>>,
}

impl NameLookup {
    pub fn replace<'a>(&self, entries: impl IntoIterator<Item = (i64, &'a str)>) {
        let fresh: HashMap<i64, String> = entries
            .into_iter()
            .map(|(id, name)| (id, name.to_string()))
            .collect();
        match self.names.write() {
            Ok(mut names) => *names = fresh,
            Err(err) => log::error!("name lookup poisoned: {err}"),
        }
    }

    pub fn get(&self, id: i64) -> Option<String> {
        self.names.read().ok()?.get(&id).cloned()
    }

    /// The name for `id`, or the id itself while the related list is not loaded.
    pub fn name_or_id(&self, id: i64) -> String {
        self.get(id).unwrap_or_else(|| id.to_string())
    }
}
