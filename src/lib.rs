mod config;
pub use config::DuplicatePolicy;
pub use config::TableConfig;
pub use config::DEFAULT_BUCKETS;

mod error;
pub use error::KvsError;
pub use error::Result;

mod table;
pub use table::bucket_index;
pub use table::KeyValueTable;

mod shared;
pub use shared::SharedTable;

pub mod script;
