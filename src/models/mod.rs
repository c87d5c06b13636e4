pub mod record;

pub use record::RecordCollection;
