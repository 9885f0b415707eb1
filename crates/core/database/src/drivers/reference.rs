use std::{collections::HashMap, sync::Arc};

use futures::lock::Mutex;

use crate::UserStats;

database_derived!(
    /// Reference implementation
    ///
    /// Reports are held as raw JSON documents, the same schemaless shape
    /// the production store serves, so fetch exercises the defensive
    /// per-record parse.
    #[derive(Default)]
    pub struct ReferenceDb {
        pub reports: Arc<Mutex<HashMap<String, serde_json::Value>>>,
        pub user_stats: Arc<Mutex<HashMap<String, UserStats>>>,
    }
);
